/// Failures talking to the booking platform API.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Request rejected: {0}")]
    Rejected(String),

    #[error("JSON parse error: {0}")]
    JsonParse(String),
}

impl ApiError {
    /// Status code returned by the platform, when it answered at all.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Rejected(_) | ApiError::JsonParse(_) => Some(200),
            ApiError::Network(_) => None,
        }
    }

    /// Text suitable for a toast or inline error row.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network(_) => "Could not reach the server. Please try again.".to_string(),
            ApiError::Status { message, .. } | ApiError::Rejected(message) => message.clone(),
            ApiError::JsonParse(_) => "The server sent an unreadable response.".to_string(),
        }
    }
}
