pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::domain::ports::ConfigProvider;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "spec-compare")]
#[command(about = "Compares extracted datasheet specifications across entities")]
pub struct CliConfig {
    #[arg(long, default_value = "http://127.0.0.1:8600/extractions")]
    pub extractor_endpoint: String,

    /// Pre-extracted aggregate JSON files; when given, the extractor
    /// endpoint is not called
    #[arg(long, value_delimiter = ',')]
    pub entity_files: Vec<String>,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, default_value = "30")]
    pub request_timeout_secs: u64,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Enable system monitoring")]
    pub monitor: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn extractor_endpoint(&self) -> &str {
        &self.extractor_endpoint
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn entity_files(&self) -> &[String] {
        &self.entity_files
    }

    fn request_timeout_secs(&self) -> u64 {
        self.request_timeout_secs
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if self.entity_files.is_empty() {
            validation::validate_url("extractor_endpoint", &self.extractor_endpoint)?;
        } else {
            validation::validate_file_extensions("entity_files", &self.entity_files, &["json"])?;
        }
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_positive_number(
            "request_timeout_secs",
            self.request_timeout_secs as usize,
            1,
        )?;
        Ok(())
    }
}
