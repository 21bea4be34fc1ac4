use thiserror::Error;

/// Errors surfaced by collaborator implementations.
#[derive(Error, Debug)]
pub enum ConnectorError {
    /// Document source unreachable or rejecting requests (transport, auth,
    /// rate-limit exhaustion).
    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),

    /// Object store unreachable or rejecting requests.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// A named resource does not exist on the remote side.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The remote service answered, but the payload could not be understood.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConnectorError {
    /// Whether a retry has any chance of succeeding.
    ///
    /// Missing resources and malformed payloads are permanent; availability
    /// problems are worth another attempt.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ConnectorError::SourceUnavailable(_)
                | ConnectorError::StoreUnavailable(_)
                | ConnectorError::Io(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ConnectorError>;
