use crate::models::{CompletionConfig, Turn};
use serde::Serialize;
use tokio::sync::oneshot;

/// Defines errors that can occur within the actor system.
#[derive(Debug, thiserror::Error, Serialize, Clone)]
pub enum ActorError {
    /// An error originating from the completion actor.
    #[error("Completion request failed: {0}")]
    CompletionError(String),
    /// A generic internal error within an actor.
    #[error("Internal system error: {0}")]
    Internal(String),
    /// An error indicating that an actor operation timed out.
    #[error("Operation timed out: {0}")]
    Timeout(String),
}

impl From<tokio::time::error::Elapsed> for ActorError {
    fn from(err: tokio::time::error::Elapsed) -> Self {
        ActorError::Timeout(format!("Actor operation timed out: {}", err))
    }
}

// Re-export AppError for convenience
pub use crate::error::AppError;

/// Messages that can be sent to the `CompletionActor`.
#[derive(Debug)]
pub enum CompletionMessage {
    /// A request for one assistant reply body from the remote model.
    Complete {
        /// The persona / system instruction for the model.
        system_prompt: String,
        /// Prior conversation turns, oldest first. May be empty.
        history: Vec<Turn>,
        /// The latest user message.
        message: String,
        /// Model id and sampling parameters for this request.
        config: CompletionConfig,
        /// A channel to send the reply body back.
        responder: oneshot::Sender<Result<String, AppError>>,
    },
}

/// Messages that can be sent to the `ComposerActor`.
#[derive(Debug)]
pub enum ComposerMessage {
    /// A request to produce the full assistant reply for a user message.
    Respond {
        /// The latest user message.
        message: String,
        /// Prior conversation turns, oldest first. May be empty.
        history: Vec<Turn>,
        /// Completion configuration of the owning conversation.
        config: CompletionConfig,
        /// A channel to send the final composed reply back.
        responder: oneshot::Sender<Result<String, AppError>>,
    },
}
