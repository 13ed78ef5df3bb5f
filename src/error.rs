use std::io;

/// Errors produced while issuing a request or reading its response.
///
/// A URL without a host or port is not an error: the request is skipped and
/// the call returns `Ok(None)`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Name resolution, connect, send or receive failed.
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// The network location carried a port that is not a valid `u16`.
    #[error("invalid port: {0:?}")]
    InvalidPort(String),

    /// The first response line has no numeric status code.
    #[error("malformed status line: {0:?}")]
    MalformedStatusLine(String),
}

/// Shorthand for results carrying an [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
