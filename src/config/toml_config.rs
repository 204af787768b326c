use crate::domain::ports::ConfigProvider;
use crate::utils::error::{CompareError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

const DEFAULT_BUNDLE_NAME: &str = "comparison_output.zip";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub job: JobConfig,
    pub source: SourceConfig,
    pub load: LoadConfig,
    pub monitoring: Option<MonitoringConfig>,
    pub environment: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    pub name: String,
    pub description: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub endpoint: Option<String>,
    pub entity_files: Option<Vec<String>>,
    pub timeout_seconds: Option<u64>,
    pub headers: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    pub bundle_filename: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub log_level: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CompareError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| CompareError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${API_KEY})
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn extractor_endpoint(&self) -> &str {
        self.source.endpoint.as_deref().unwrap_or_default()
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn entity_files(&self) -> &[String] {
        self.source.entity_files.as_deref().unwrap_or(&[])
    }

    fn request_timeout_secs(&self) -> u64 {
        self.source.timeout_seconds.unwrap_or(30)
    }

    fn request_headers(&self) -> Option<&HashMap<String, String>> {
        self.source.headers.as_ref()
    }

    fn bundle_name(&self) -> &str {
        self.load
            .bundle_filename
            .as_deref()
            .unwrap_or(DEFAULT_BUNDLE_NAME)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("job.name", &self.job.name)?;

        let has_files = self
            .source
            .entity_files
            .as_ref()
            .map(|files| !files.is_empty())
            .unwrap_or(false);
        if has_files {
            validation::validate_file_extensions(
                "source.entity_files",
                self.entity_files(),
                &["json"],
            )?;
        } else {
            let endpoint =
                self.source
                    .endpoint
                    .as_deref()
                    .ok_or(CompareError::MissingConfigError {
                        field: "source.endpoint".to_string(),
                    })?;
            validation::validate_url("source.endpoint", endpoint)?;
        }

        validation::validate_path("load.output_path", &self.load.output_path)?;
        if let Some(timeout) = self.source.timeout_seconds {
            validation::validate_positive_number("source.timeout_seconds", timeout as usize, 1)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
[job]
name = "reed-relay-comparison"
description = "Compare reed relay datasheets"
version = "1.0"

[source]
endpoint = "http://127.0.0.1:8600/extractions"
timeout_seconds = 10

[load]
output_path = "./output"
"#;

    #[test]
    fn test_parse_minimal_config() {
        let config = TomlConfig::from_toml_str(MINIMAL).unwrap();
        assert_eq!(config.job.name, "reed-relay-comparison");
        assert_eq!(config.request_timeout_secs(), 10);
        assert_eq!(config.bundle_name(), "comparison_output.zip");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("SPEC_COMPARE_TEST_ENDPOINT", "http://extractor.internal");
        let content = r#"
[job]
name = "job"
description = ""
version = "1.0"

[source]
endpoint = "${SPEC_COMPARE_TEST_ENDPOINT}/extractions"

[load]
output_path = "./output"
"#;
        let config = TomlConfig::from_toml_str(content).unwrap();
        assert_eq!(
            config.extractor_endpoint(),
            "http://extractor.internal/extractions"
        );
    }

    #[test]
    fn test_missing_endpoint_and_files_fails_validation() {
        let content = r#"
[job]
name = "job"
description = ""
version = "1.0"

[source]

[load]
output_path = "./output"
"#;
        let config = TomlConfig::from_toml_str(content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_entity_files_mode_skips_endpoint_check() {
        let content = r#"
[job]
name = "job"
description = ""
version = "1.0"

[source]
entity_files = ["a.json", "b.json"]

[load]
output_path = "./output"
bundle_filename = "relays.zip"
"#;
        let config = TomlConfig::from_toml_str(content).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.bundle_name(), "relays.zip");
        assert_eq!(config.entity_files().len(), 2);
    }
}
