//! High-level error types

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Nothing came back within the read timeout, or the stream closed
    #[error("No response from device")]
    NoResponse,

    #[error("Malformed response from device: {0}")]
    MalformedResponse(#[from] zkaccess_core::Error),

    #[error("Transport error: {0}")]
    Transport(#[from] zkaccess_transport::Error),

    #[error("Schema error: {0}")]
    Schema(#[from] zkaccess_types::SchemaError),

    /// Request could not be encoded
    #[error("Invalid request: {0}")]
    InvalidRequest(#[source] zkaccess_core::Error),

    #[error("Response larger than {max} bytes")]
    ResponseTooLarge {
        max: usize,
    },
}

impl Error {
    /// Check if error is recoverable (retry might succeed)
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::NoResponse | Self::Transport(_) => true,
            Self::MalformedResponse(e) => e.is_incomplete(),
            _ => false,
        }
    }
}
