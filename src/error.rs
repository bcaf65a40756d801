use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Error type for the node statistics agent
#[derive(Error, Debug)]
pub enum NodeStatsError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Path unavailable: {}", .0.display())]
    PathUnavailable(PathBuf),

    #[error("Sub-reading '{reading}' unavailable: {reason}")]
    SubReadingUnavailable { reading: String, reason: String },

    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Cancellation failure: {0}")]
    Cancellation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for the node statistics agent
pub type Result<T> = std::result::Result<T, NodeStatsError>;

impl NodeStatsError {
    /// Create an invalid argument error
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        NodeStatsError::InvalidArgument(msg.into())
    }

    /// Create a path unavailable error
    pub fn path_unavailable<P: Into<PathBuf>>(path: P) -> Self {
        NodeStatsError::PathUnavailable(path.into())
    }

    /// Create a sub-reading unavailable error
    pub fn sub_reading<R: Into<String>, S: Into<String>>(reading: R, reason: S) -> Self {
        NodeStatsError::SubReadingUnavailable {
            reading: reading.into(),
            reason: reason.into(),
        }
    }

    pub fn transport<S: Into<String>>(msg: S) -> Self {
        NodeStatsError::Transport(msg.into())
    }

    pub fn cancellation<S: Into<String>>(msg: S) -> Self {
        NodeStatsError::Cancellation(msg.into())
    }

    pub fn config<S: Into<String>>(msg: S) -> Self {
        NodeStatsError::Config(msg.into())
    }
}
