use thiserror::Error;

/// An error whose message is shown directly to the user who invoked a command.
///
/// The message is expected to be translated already (see [`crate::CommandContext::translate`]).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct RelayedError(String);

impl RelayedError {
    /// Create a relayed error from a user-facing message.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    /// The user-facing message.
    pub fn message(&self) -> &str {
        &self.0
    }
}

/// Error for an invalid bot configuration.
///
/// These are raised while commands are declared or registered, never while handling an invocation.
#[derive(Debug, Error)]
#[error("Config error: {0}")]
pub struct ConfigError(pub(crate) String);

impl ConfigError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// The error returned by command actions.
#[derive(Debug, Error)]
pub enum CommandError {
    /// A failure the user should see.
    #[error(transparent)]
    Relayed(#[from] RelayedError),
    /// A failure the user should not see the details of.
    #[error("internal command error: {0}")]
    Internal(Box<dyn std::error::Error + Send + Sync>),
}

impl CommandError {
    /// Wrap any error as an internal failure.
    pub fn internal(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        CommandError::Internal(error.into())
    }
}
