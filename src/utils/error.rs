use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompareError {
    #[error("Extractor request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Extractor response error: {message}")]
    ExtractorError { message: String },

    #[error("CSV output error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

/// 錯誤嚴重程度，決定 CLI 的退出碼
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Validation,
    Processing,
    System,
}

impl CompareError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 網路錯誤通常可以重試
            CompareError::ApiError(_) | CompareError::ExtractorError { .. } => {
                ErrorSeverity::Medium
            }
            CompareError::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            CompareError::ApiError(_) | CompareError::ExtractorError { .. } => {
                ErrorCategory::Network
            }
            CompareError::ConfigValidationError { .. }
            | CompareError::InvalidConfigValueError { .. }
            | CompareError::MissingConfigError { .. } => ErrorCategory::Configuration,
            CompareError::ValidationError { .. } => ErrorCategory::Validation,
            CompareError::CsvError(_)
            | CompareError::ZipError(_)
            | CompareError::SerializationError(_)
            | CompareError::ProcessingError { .. } => ErrorCategory::Processing,
            CompareError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            CompareError::ApiError(_) => {
                "Check that the extractor service is reachable and retry".to_string()
            }
            CompareError::ExtractorError { .. } => {
                "Verify the extractor endpoint returns the expected JSON contract".to_string()
            }
            CompareError::ConfigValidationError { field, .. }
            | CompareError::InvalidConfigValueError { field, .. }
            | CompareError::MissingConfigError { field } => {
                format!("Fix the '{}' setting and run again", field)
            }
            CompareError::ValidationError { .. } => {
                "Check the extracted input data for duplicate or missing entity names".to_string()
            }
            CompareError::IoError(_) => {
                "Check file permissions and available disk space".to_string()
            }
            _ => "Inspect the log output for details".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            CompareError::ApiError(_) => "Could not reach the extractor service".to_string(),
            CompareError::ExtractorError { message } => {
                format!("Extractor returned unusable data: {}", message)
            }
            CompareError::ConfigValidationError { field, message } => {
                format!("Configuration problem ({}): {}", field, message)
            }
            CompareError::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration problem ({}): {}", field, reason)
            }
            CompareError::MissingConfigError { field } => {
                format!("Missing configuration: {}", field)
            }
            CompareError::ValidationError { message } => {
                format!("Input data rejected: {}", message)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CompareError>;
