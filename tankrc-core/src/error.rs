use thiserror::Error;

/// Transport-level failure of a link.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum LinkError {
    /// The link is not in a state that allows the operation.
    #[error("link is not connected")]
    NotConnected,
    /// The send buffer cannot take the outgoing line whole.
    #[error("send buffer full, write refused")]
    OutputOverflow,
    /// The peer failed the identity/version exchange.
    #[error("handshake failed: {0}")]
    Handshake(String),
    /// The peer sent something the wire protocol cannot account for.
    #[error("protocol corruption: {0}")]
    Protocol(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Why a message rejected its argument tokens.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseFailure {
    #[error("expected {expected} arguments, got {got}")]
    InvalidArgumentCount { expected: usize, got: usize },
    /// Tokens were lexically fine but semantically unacceptable.
    #[error("invalid argument: {0}")]
    InvalidArguments(String),
    /// A token could not be read as the expected type at all.
    #[error("unparseable token {0:?}")]
    ParseError(String),
}

/// Outcome of asking a registry for a message it cannot deliver.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CreateError {
    #[error("unknown command {0:?}")]
    NotFound(String),
    #[error(transparent)]
    Parse(#[from] ParseFailure),
}
