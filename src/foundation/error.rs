/// Crate-wide result alias.
pub type ReelResult<T> = Result<T, ReelError>;

/// Error type shared by every scrollreel component.
#[derive(thiserror::Error, Debug)]
pub enum ReelError {
    /// Invalid configuration or argument; detected before any resource is allocated.
    #[error("validation error: {0}")]
    Validation(String),

    /// A single viewport rasterization failed.
    #[error("capture error: {0}")]
    Capture(String),

    /// The streaming encoder failed to start, accept a frame, or finalize.
    #[error("encode error: {0}")]
    Encode(String),

    /// Reading or writing the persisted content slot failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// Configuration or storage (de)serialization failed.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Any other error, usually IO with context attached.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReelError {
    /// Build a [`ReelError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ReelError::Capture`].
    pub fn capture(msg: impl Into<String>) -> Self {
        Self::Capture(msg.into())
    }

    /// Build a [`ReelError::Encode`].
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`ReelError::Storage`].
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Build a [`ReelError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}
