use thiserror::Error;

#[derive(Error, Debug)]
pub enum VoyageError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("{method} {path} returned HTTP {status}")]
    HttpStatusError {
        method: String,
        path: String,
        status: u16,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

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

    #[error("A {operation} request is already in flight for '{target}'")]
    MutationInFlight { operation: String, target: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Validation,
    Data,
    Concurrency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl VoyageError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            VoyageError::ApiError(_) | VoyageError::HttpStatusError { .. } => {
                ErrorCategory::Network
            }
            VoyageError::ConfigValidationError { .. }
            | VoyageError::InvalidConfigValueError { .. }
            | VoyageError::MissingConfigError { .. }
            | VoyageError::UrlError(_) => ErrorCategory::Configuration,
            VoyageError::ValidationError { .. } => ErrorCategory::Validation,
            VoyageError::IoError(_) | VoyageError::SerializationError(_) => ErrorCategory::Data,
            VoyageError::MutationInFlight { .. } => ErrorCategory::Concurrency,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            VoyageError::MutationInFlight { .. } => ErrorSeverity::Low,
            // 可由使用者重試
            VoyageError::ApiError(_) | VoyageError::HttpStatusError { .. } => {
                ErrorSeverity::Medium
            }
            VoyageError::ValidationError { .. }
            | VoyageError::SerializationError(_)
            | VoyageError::IoError(_) => ErrorSeverity::High,
            VoyageError::ConfigValidationError { .. }
            | VoyageError::InvalidConfigValueError { .. }
            | VoyageError::MissingConfigError { .. }
            | VoyageError::UrlError(_) => ErrorSeverity::Critical,
        }
    }

    /// 給終端使用者看的簡短訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            VoyageError::ApiError(e) if e.is_connect() => {
                "Could not reach the voyage API.".to_string()
            }
            VoyageError::ApiError(e) if e.is_timeout() => {
                "The voyage API did not answer in time.".to_string()
            }
            VoyageError::ApiError(_) => "The request to the voyage API failed.".to_string(),
            VoyageError::HttpStatusError { status, .. } => {
                format!("The voyage API rejected the request (HTTP {}).", status)
            }
            VoyageError::SerializationError(_) => {
                "The voyage API returned data in an unexpected format.".to_string()
            }
            VoyageError::MutationInFlight { operation, .. } => {
                format!("A {} request is still running.", operation)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check the API base URL and try again.",
            ErrorCategory::Configuration => "Fix the configuration file or command line flags.",
            ErrorCategory::Validation => "Correct the highlighted fields and submit again.",
            ErrorCategory::Data => "Check that the API version matches this client.",
            ErrorCategory::Concurrency => "Wait for the pending request to finish.",
        }
    }

    /// 是否屬於可透過 "Try again" 重送的錯誤
    pub fn is_retryable(&self) -> bool {
        self.category() == ErrorCategory::Network
    }
}

pub type Result<T> = std::result::Result<T, VoyageError>;
