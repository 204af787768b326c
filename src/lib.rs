pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, toml_config::TomlConfig};

pub use crate::core::{
    comparison::ComparisonResult, engine::CompareEngine, pipeline::ComparePipeline,
};
pub use domain::model::EntitySpecs;
pub use utils::error::{CompareError, Result};
