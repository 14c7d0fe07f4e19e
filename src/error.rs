use std::fmt;
use thiserror::Error;
use tonic::{Code, Status};

/// The RPC an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Version,
    ListModels,
    CreateSession,
    DeleteSession,
    UpdateSession,
    StreamAsr,
    StreamTts,
    Transcribe,
}

impl Operation {
    #[must_use]
    pub const fn rpc_name(self) -> &'static str {
        match self {
            Self::Version => "Version",
            Self::ListModels => "ListModels",
            Self::CreateSession => "CreateSession",
            Self::DeleteSession => "DeleteSession",
            Self::UpdateSession => "UpdateSession",
            Self::StreamAsr => "StreamASR",
            Self::StreamTts => "StreamTTS",
            Self::Transcribe => "Transcribe",
        }
    }

    const fn carries_token(self) -> bool {
        matches!(self, Self::DeleteSession | Self::UpdateSession | Self::StreamAsr)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.rpc_name())
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("gRPC connection error: {0}")]
    Connect(#[from] tonic::transport::Error),

    #[error("{operation} failed: {status}")]
    Transport { operation: Operation, status: Status },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Session token is stale; only the most recently issued token may be used")]
    StaleToken,

    #[error("The session has ended")]
    SessionEnded,

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Request rejected by the server: {0}")]
    Rejected(String),

    #[error("The stream is closed")]
    StreamClosed,

    #[error("Out of order: {0}")]
    OutOfOrder(String),

    #[error("Stream task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse or serialize JSON: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Action handler failed: {0}")]
    Handler(String),
}

impl Error {
    /// Map a gRPC status returned by `operation` onto the SDK taxonomy.
    #[must_use]
    pub fn from_status(operation: Operation, status: Status) -> Self {
        match status.code() {
            Code::NotFound if operation == Operation::CreateSession => {
                Self::ModelNotFound(status.message().to_string())
            }
            Code::NotFound if operation.carries_token() => Self::SessionEnded,
            Code::FailedPrecondition | Code::Aborted if operation.carries_token() => Self::StaleToken,
            Code::InvalidArgument => Self::Rejected(status.message().to_string()),
            _ => Self::Transport { operation, status },
        }
    }

    /// Whether the failed call left the session untouched, so the same
    /// operation may be attempted again from scratch.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Connect(_) | Self::Task(_))
    }

    /// Whether the session this error came from can no longer be advanced.
    #[must_use]
    pub const fn ends_session(&self) -> bool {
        matches!(self, Self::StaleToken | Self::SessionEnded)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
