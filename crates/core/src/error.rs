use thiserror::Error;

#[derive(Error, Debug)]
pub enum LecsumError {
    #[error("API request rejected: HTTP {status}")]
    RemoteRejected { status: u16 },

    #[error("Invalid API response: {reason}")]
    InvalidResponse { reason: String },

    #[error("Transcription response has no 'segments' field")]
    MissingSegments,

    #[error("Unknown summary mode: {0} (expected \"simple\" or \"detailed\")")]
    UnknownSummaryMode(String),

    #[error("Summarization task failed: {reason}")]
    TaskFailed { reason: String },

    #[error("Missing API key: {env_var} environment variable is not set")]
    MissingApiKey { env_var: &'static str },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, LecsumError>;
