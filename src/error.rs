use std::error::Error as StdError;
use std::path::PathBuf;

use thiserror::Error;

/// Broad classification of a failed completion, for callers that branch on
/// the failure rather than display it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Transport,
    Http,
    MalformedResponse,
}

// Errors raised while talking to the completions endpoint.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("Request to LLM API failed: {0}")]
    Transport(String), // DNS, refused connection, timeout, broken body.

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Error parsing LLM response: {0}")]
    MalformedResponse(String),
}

impl CompletionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CompletionError::Transport(_) => ErrorKind::Transport,
            CompletionError::Http { .. } => ErrorKind::Http,
            CompletionError::MalformedResponse(_) => ErrorKind::MalformedResponse,
        }
    }

    /// reqwest keeps the useful part ("connection refused", "timed out") in
    /// the source chain, so flatten it into the message.
    pub fn transport(err: reqwest::Error) -> Self {
        let mut detail = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            detail.push_str(": ");
            detail.push_str(&cause.to_string());
            source = cause.source();
        }
        CompletionError::Transport(detail)
    }
}

#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error("Advice coordinator has been shut down")]
    ShutDown,

    #[error("Failed to start advice worker: {0}")]
    Spawn(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}
