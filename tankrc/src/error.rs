use tankrc_core::error::LinkError;
use thiserror::Error;

/// Failure surfaced to bot code.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum BotError {
    #[error(transparent)]
    Link(#[from] LinkError),
    /// The bot thread could not be spawned.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
