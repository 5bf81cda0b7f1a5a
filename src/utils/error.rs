use thiserror::Error;

#[derive(Error, Debug)]
pub enum CheckerError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Email {email} is outside the allowed domain {domain}")]
    Unauthorized { email: String, domain: String },

    #[error("No user is logged in")]
    NotLoggedIn,

    #[error("{email} is not allowed to view the login history")]
    Forbidden { email: String },

    #[error("Invalid header {name}: {reason}")]
    InvalidHeader { name: String, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Storage,
    Configuration,
    Input,
    Access,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CheckerError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CheckerError::HttpError(_) | CheckerError::InvalidHeader { .. } => {
                ErrorCategory::Network
            }
            CheckerError::IoError(_) | CheckerError::SerializationError(_) => {
                ErrorCategory::Storage
            }
            CheckerError::ConfigError { .. }
            | CheckerError::ConfigValidationError { .. }
            | CheckerError::InvalidConfigValueError { .. }
            | CheckerError::MissingConfigError { .. } => ErrorCategory::Configuration,
            CheckerError::ValidationError { .. } => ErrorCategory::Input,
            CheckerError::Unauthorized { .. }
            | CheckerError::NotLoggedIn
            | CheckerError::Forbidden { .. } => ErrorCategory::Access,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Access => ErrorSeverity::Low,
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Storage => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::Critical,
        }
    }

    /// Message shown to the person at the keyboard, without internals.
    pub fn user_friendly_message(&self) -> String {
        match self {
            CheckerError::Unauthorized { domain, .. } => {
                format!("Only {} emails are allowed to login.", domain)
            }
            CheckerError::NotLoggedIn => "Please login first.".to_string(),
            CheckerError::Forbidden { .. } => "Only the admin can view the login history.".to_string(),
            CheckerError::ValidationError { message } => message.clone(),
            CheckerError::HttpError(_) | CheckerError::InvalidHeader { .. } => {
                "Failed to reach the script checker webhook.".to_string()
            }
            CheckerError::IoError(e) => format!("File access failed: {}", e),
            CheckerError::SerializationError(_) => "Couldn't load login data.".to_string(),
            _ => format!("Configuration problem: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check your internet connection and try again",
            ErrorCategory::Storage => "Check that the file exists and is readable",
            ErrorCategory::Configuration => "Fix the configuration file or command-line flags",
            ErrorCategory::Input => "Correct the input and try again",
            ErrorCategory::Access => "Login with an allowed email address",
        }
    }
}

pub type Result<T> = std::result::Result<T, CheckerError>;
