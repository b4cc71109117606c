use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("Not found")]
    NotFound,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Server error ({status})")]
    ServerError { status: u16, message: Option<String> },

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Decode error: {0}")]
    DecodeError(String),

    #[error("Another request for this action is still in flight")]
    MutationInFlight,
}

/// Error body the backend sends alongside non-2xx responses.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorResponse {
    pub error: Option<String>,
    pub code: Option<u16>,
    pub details: Option<String>,
}

/// Content of a full-panel error state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorView {
    pub title: String,
    pub message: String,
    pub retryable: bool,
    pub offer_home: bool,
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::ValidationError(msg.into())
    }

    /// Classify a non-success HTTP status. `message` is the backend's own
    /// `error` text, when the body carried one.
    pub fn from_status(status: u16, message: Option<String>) -> Self {
        match status {
            401 => ApiError::Unauthorized,
            403 => ApiError::Forbidden,
            404 => ApiError::NotFound,
            400..=499 => ApiError::BadRequest(message.unwrap_or_else(|| "Bad Request".to_string())),
            _ => ApiError::ServerError { status, message },
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized => Some(401),
            ApiError::Forbidden => Some(403),
            ApiError::NotFound => Some(404),
            ApiError::ServerError { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, ApiError::ServerError { .. } | ApiError::NetworkError(_))
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, ApiError::Unauthorized | ApiError::Forbidden)
    }

    /// Text for a transient error notification.
    pub fn notification_message(&self) -> String {
        match self {
            ApiError::ValidationError(msg) => msg.clone(),
            ApiError::BadRequest(msg) => msg.clone(),
            ApiError::Unauthorized => "Unauthorized - Please login again".to_string(),
            ApiError::Forbidden => "You don't have permission to do this".to_string(),
            ApiError::NotFound => "Resource not found".to_string(),
            ApiError::ServerError {
                message: Some(msg), ..
            } => msg.clone(),
            ApiError::ServerError { .. } => "Server error - Try again later".to_string(),
            ApiError::NetworkError(_) => "Network Error - Check your connection".to_string(),
            ApiError::DecodeError(_) => "An unexpected error occurred".to_string(),
            ApiError::MutationInFlight => "Please wait for the current request to finish".to_string(),
        }
    }

    /// Full-panel presentation used when a whole view fails to load.
    pub fn error_view(&self) -> ErrorView {
        let (title, message) = match self {
            ApiError::NotFound => (
                "Page Not Found",
                "The page or resource you are looking for has vanished into the void.".to_string(),
            ),
            ApiError::Forbidden => (
                "Access Denied",
                "You don't have the rank or permissions to view this area.".to_string(),
            ),
            ApiError::Unauthorized => (
                "Session Expired",
                "Your session has expired. Please log in again to continue.".to_string(),
            ),
            ApiError::ServerError { .. } => (
                "System Failure",
                "Our servers just hit a net ball. We are working on fixing it.".to_string(),
            ),
            other => ("Something went wrong", other.to_string()),
        };

        ErrorView {
            title: title.to_string(),
            message,
            retryable: self.is_retryable(),
            offer_home: true,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::DecodeError(err.to_string())
        } else if let Some(status) = err.status() {
            ApiError::from_status(status.as_u16(), None)
        } else {
            ApiError::NetworkError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::DecodeError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        ApiError::ValidationError(err.to_string())
    }
}
