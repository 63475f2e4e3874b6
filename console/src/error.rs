//! Error handling for the Warehouse Operations Console
//!
//! Every failure is caught at the boundary of the operation that issued
//! the request and turned into state the host view can render; nothing
//! propagates as an uncaught failure. A superseded fetch cycle is not an
//! error at all — see `services::cycle`.

use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Transport-level failure (DNS, connect, timeout, body read).
    /// Retryable by the user; never retried automatically.
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response from the external API. The server's `detail`
    /// message is carried verbatim; it is authoritative and never
    /// reinterpreted.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The backend does not implement this endpoint yet. Kept distinct
    /// from `Api` so operators can tell a backend gap from a transient
    /// failure.
    #[error("{endpoint} is not available on the backend yet")]
    FeatureUnavailable { endpoint: String },

    /// Could not obtain or decode an access token
    #[error("Authentication error: {0}")]
    Auth(String),

    /// The draft cannot be turned into a request payload
    #[error(transparent)]
    Draft(#[from] shared::DraftError),

    /// A payload failed its declarative constraints before sending
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("CSV export error: {0}")]
    CsvExport(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Whether this is the "backend gap" case the UI surfaces with its
    /// own explicit message
    pub fn is_feature_gap(&self) -> bool {
        matches!(self, AppError::FeatureUnavailable { .. })
    }

    /// Message shown to the user. API rejections pass through verbatim;
    /// transport failures collapse into a generic retryable message.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Transport(_) => {
                "Network error — please check your connection and try again".to_string()
            }
            other => other.to_string(),
        }
    }
}

/// Result type alias for console operations
pub type AppResult<T> = Result<T, AppError>;
