use crate::actors::messages::AppError;
use crate::models::{CompletionConfig, Turn};
use async_trait::async_trait;

/// Defines the public interface for the external completion actor.
///
/// This trait abstracts the specific implementation of the completion service,
/// allowing for different backends (remote API, test double) to be used
/// interchangeably by the composer.
#[async_trait]
pub trait CompletionActor: Send + Sync + 'static {
    /// Requests one assistant reply body for the given system instruction,
    /// prior turns, and latest user message.
    async fn complete(
        &self,
        system_prompt: String,
        history: Vec<Turn>,
        message: String,
        config: CompletionConfig,
    ) -> Result<String, AppError>;
}
