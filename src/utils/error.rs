use std::fmt;
use thiserror::Error;

pub const INVALID_COVERAGE_MESSAGE: &str = "⚠ Invalid coverage area. Please enter a numeric value.";
pub const INVALID_LOCATION_MESSAGE: &str =
    "⚠ Invalid coordinate format. Please enter in 'lat, lon' format.";
pub const NO_RESPONSE_MESSAGE: &str = "⚠ No response received.";
pub const UNAVAILABLE_MESSAGE: &str = "❌ Model is unavailable after multiple attempts.";

/// 使用者輸入中可被驗證的欄位
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    CoverageArea,
    Location,
}

impl fmt::Display for InputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputField::CoverageArea => write!(f, "coverage_area"),
            InputField::Location => write!(f, "location"),
        }
    }
}

#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("Invalid {field}: {value:?}")]
    InvalidInput { field: InputField, value: String },

    #[error("Model is busy (attempt {attempt}/{max_retries})")]
    ServiceBusy { attempt: u32, max_retries: u32 },

    #[error("Model is unavailable after {attempts} attempts")]
    ServiceUnavailable { attempts: u32 },

    #[error("Inference service returned status {status}: {payload}")]
    ServiceError { status: u16, payload: String },

    #[error("Inference service returned no usable text")]
    EmptyResponse,

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: {value:?} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Service,
    Network,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AssistantError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AssistantError::InvalidInput { .. } => ErrorCategory::Input,
            AssistantError::ServiceBusy { .. }
            | AssistantError::ServiceUnavailable { .. }
            | AssistantError::ServiceError { .. }
            | AssistantError::EmptyResponse => ErrorCategory::Service,
            AssistantError::ApiError(_) => ErrorCategory::Network,
            AssistantError::ConfigError { .. }
            | AssistantError::InvalidConfigValueError { .. }
            | AssistantError::MissingConfigError { .. } => ErrorCategory::Configuration,
            AssistantError::IoError(_) | AssistantError::SerializationError(_) => {
                ErrorCategory::System
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AssistantError::InvalidInput { .. } | AssistantError::EmptyResponse => {
                ErrorSeverity::Low
            }
            AssistantError::ServiceBusy { .. }
            | AssistantError::ServiceUnavailable { .. }
            | AssistantError::ApiError(_) => ErrorSeverity::Medium,
            AssistantError::ServiceError { .. }
            | AssistantError::ConfigError { .. }
            | AssistantError::InvalidConfigValueError { .. }
            | AssistantError::MissingConfigError { .. } => ErrorSeverity::High,
            AssistantError::IoError(_) | AssistantError::SerializationError(_) => {
                ErrorSeverity::Critical
            }
        }
    }

    /// 顯示給使用者的訊息，前端直接呈現此字串
    pub fn user_friendly_message(&self) -> String {
        match self {
            AssistantError::InvalidInput {
                field: InputField::CoverageArea,
                ..
            } => INVALID_COVERAGE_MESSAGE.to_string(),
            AssistantError::InvalidInput {
                field: InputField::Location,
                ..
            } => INVALID_LOCATION_MESSAGE.to_string(),
            AssistantError::ServiceBusy {
                attempt,
                max_retries,
            } => format!(
                "⚠ Model is busy, please try again later. (Attempt {}/{})",
                attempt, max_retries
            ),
            AssistantError::ServiceUnavailable { .. } => UNAVAILABLE_MESSAGE.to_string(),
            AssistantError::ServiceError { payload, .. } => format!("⚠ Error: {}", payload),
            AssistantError::EmptyResponse => NO_RESPONSE_MESSAGE.to_string(),
            AssistantError::ApiError(e) if e.is_timeout() => {
                "⚠ Error: the inference request timed out.".to_string()
            }
            other => format!("⚠ Error: {}", other),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            AssistantError::InvalidInput {
                field: InputField::CoverageArea,
                ..
            } => "Enter the coverage area as a non-negative number, e.g. 10",
            AssistantError::InvalidInput {
                field: InputField::Location,
                ..
            } => "Enter the location as decimal coordinates, e.g. 40.7128, -74.0060",
            AssistantError::ServiceBusy { .. } | AssistantError::ServiceUnavailable { .. } => {
                "The model is loading or overloaded; wait a minute and try again"
            }
            AssistantError::ServiceError { .. } => {
                "Check the endpoint URL and that the API token has inference access"
            }
            AssistantError::EmptyResponse => "Try again or rephrase the request",
            AssistantError::ApiError(_) => "Check network connectivity or raise --timeout-seconds",
            AssistantError::ConfigError { .. }
            | AssistantError::InvalidConfigValueError { .. }
            | AssistantError::MissingConfigError { .. } => {
                "Fix the configuration file or command-line flags"
            }
            AssistantError::IoError(_) | AssistantError::SerializationError(_) => {
                "Check file paths and permissions"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, AssistantError>;
