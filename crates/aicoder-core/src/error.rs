use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("missing API credential: set OPENAI_API_KEY in the environment")]
    MissingCredential,

    #[error("change instructions must not be empty")]
    EmptyInstruction,

    #[error("file not found: {}{}", .path.display(), io_reason(.source))]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("completion service error: {0}")]
    Service(#[from] ServiceError),

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("prompt error: {0}")]
    Prompt(#[from] aicoder_pm::PmError),
}

impl CoreError {
    /// Process exit code for this failure category.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Prompt(_) => 1,
            Self::EmptyInstruction => 2,
            Self::MissingCredential => 3,
            Self::FileNotFound { .. } => 4,
            Self::Service(_) => 5,
            Self::Write { .. } => 6,
        }
    }
}

fn io_reason(source: &Option<std::io::Error>) -> String {
    source
        .as_ref()
        .map(|e| format!(" ({e})"))
        .unwrap_or_default()
}

/// Failures of a single completion call.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("authentication rejected (HTTP {status}): {message}")]
    Unauthorized { status: u16, message: String },

    #[error("rate limited: {message}")]
    RateLimited { message: String },

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("model refused the request: {0}")]
    Refused(String),

    #[error("completion was cut off at the token limit")]
    Truncated,

    #[error("model returned an empty completion")]
    EmptyCompletion,
}
