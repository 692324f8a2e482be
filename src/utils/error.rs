use thiserror::Error;

#[derive(Error, Debug)]
pub enum ComponentError {
    #[error("Cannot access artifact attribute \"{attribute}\".")]
    AttributeAccessError { attribute: String },

    #[error("Invalid argument: {message}")]
    ArgumentError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("HTTP request to {url} failed with status {status}")]
    HttpStatusError {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("Component text is not valid UTF-8: {0}")]
    DecodeError(#[from] std::string::FromUtf8Error),

    #[error("Component parsing error: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for '{field}': '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Component validation error: {message}")]
    ValidationError { message: String },
}

/// Coarse grouping used by callers that only care about the kind of failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    AttributeAccess,
    Argument,
    Io,
    Request,
    Parse,
    Config,
    Validation,
}

impl ComponentError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ComponentError::AttributeAccessError { .. } => ErrorCategory::AttributeAccess,
            ComponentError::ArgumentError { .. } => ErrorCategory::Argument,
            ComponentError::IoError(_) => ErrorCategory::Io,
            ComponentError::RequestError(_) | ComponentError::HttpStatusError { .. } => {
                ErrorCategory::Request
            }
            ComponentError::DecodeError(_) | ComponentError::ParseError(_) => ErrorCategory::Parse,
            ComponentError::ConfigError { .. }
            | ComponentError::InvalidConfigValueError { .. }
            | ComponentError::MissingConfigError { .. } => ErrorCategory::Config,
            ComponentError::ValidationError { .. } => ErrorCategory::Validation,
        }
    }

    pub(crate) fn argument(message: impl Into<String>) -> Self {
        ComponentError::ArgumentError {
            message: message.into(),
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        ComponentError::ValidationError {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ComponentError>;
