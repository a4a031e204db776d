/// Failure reported by a remote pod service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// The service understood the request and refused it.
    #[error("rejected: {0}")]
    Rejected(String),

    /// The service could not be reached or did not answer.
    #[error("unavailable: {0}")]
    Unavailable(String),
}

impl ServiceError {
    /// The message carried by the error, without the kind prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::Rejected(msg) | Self::Unavailable(msg) => msg,
        }
    }
}
