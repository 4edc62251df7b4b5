//! Error types for the management-command engine.

use thiserror::Error;

/// Errors that can occur while validating, dispatching or rewriting a command.
///
/// "Not a management command" and "block rewrite skipped" are ordinary outcomes
/// and are reported through [`crate::command::Outcome`], not here.
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Unrecognized management command: {0}")]
    UnrecognizedCommand(String),

    #[error("Command '{0}' produced output but the event has no DESCRIPTION")]
    NarrativePropertyMissing(String),

    #[error("Command '{command}' failed: {message}")]
    Handler { command: String, message: String },

    #[error("ICS parse error: {0}")]
    IcsParse(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl CommandError {
    /// Whether the error reflects bad input rather than an engine or handler failure.
    pub fn is_input_error(&self) -> bool {
        matches!(self, CommandError::IcsParse(_))
    }
}

/// Result type alias for engine operations.
pub type CommandResult<T> = Result<T, CommandError>;
