//! Error types for submissions and collaborator stores.

/// Rejections raised before any collaborator is contacted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Index above [`crate::MAX_INDEX`].
    #[error("Index too high")]
    IndexTooHigh { raw: String },

    /// Index below zero.
    #[error("Index must be a non-negative integer")]
    Negative { raw: String },

    /// Missing, fractional or non-numeric index.
    #[error("Index must be a non-negative integer")]
    NotAnInteger { raw: String },
}

impl ValidationError {
    /// The submitted value as received, for logging.
    pub fn raw(&self) -> &str {
        match self {
            Self::IndexTooHigh { raw } | Self::Negative { raw } | Self::NotAnInteger { raw } => {
                raw
            }
        }
    }
}

/// Collaborator failures. These never reach a client; callers recover locally.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Durable scan, insert or connection failed.
    #[error("durable store unavailable: {message}")]
    DurableUnavailable { message: String },

    /// Cache read or write failed.
    #[error("cache store unavailable: {message}")]
    CacheUnavailable { message: String },

    /// Publish failed.
    #[error("event channel unavailable: {message}")]
    ChannelUnavailable { message: String },

    /// Table creation failed.
    #[error("schema initialization failed: {message}")]
    SchemaInit { message: String },
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        Self::DurableUnavailable {
            message: err.to_string(),
        }
    }
}

/// Result type for collaborator operations.
pub type StoreResult<T> = Result<T, StoreError>;
