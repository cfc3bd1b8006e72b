use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceError {
    #[error("Image reference is empty")]
    Empty,

    #[error("Image reference '{0}' is pinned by digest and has no tag")]
    DigestPinned(String),

    #[error("Invalid repository in image reference '{0}'")]
    InvalidRepository(String),

    #[error("Invalid tag in image reference '{0}'")]
    InvalidTag(String),
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Rate limited: retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Token cache lock poisoned")]
    LockPoisoned,
}

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Failed to run '{command}': {source}")]
    Io {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{command}' exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("Unexpected output from '{command}': {message}")]
    InvalidOutput { command: String, message: String },
}
