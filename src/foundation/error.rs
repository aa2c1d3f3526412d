pub type FrameSeqResult<T> = Result<T, FrameSeqError>;

/// Error type for construction and configuration boundaries.
///
/// The playback path itself never returns these: fetch failures degrade to broken frames and
/// render preconditions degrade to silent skips.
#[derive(thiserror::Error, Debug)]
pub enum FrameSeqError {
    /// Invalid caller-supplied value (frame count, control points, sizes).
    #[error("validation error: {0}")]
    Validation(String),

    /// Unreadable or malformed configuration document.
    #[error("config error: {0}")]
    Config(String),

    /// Frame bytes that could not be decoded into pixels.
    #[error("decode error: {0}")]
    Decode(String),

    /// Filesystem failure while reading a frame or config.
    #[error("io error: {0}")]
    Io(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FrameSeqError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
