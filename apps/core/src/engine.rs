//! Caller-facing engine façade.
//!
//! The single service a web transport layer drives: it owns the database
//! pool, the actor handles, and the request throttle, and exposes the
//! "latest user text in, assistant reply text out" operation. Conversation
//! history is always loaded from storage and passed explicitly; no module
//! holds a process-wide transcript.

use crate::actors::completion::{CompletionServiceConfig, DEFAULT_API_BASE};
use crate::actors::composer::ComposerHandle;
use crate::database;
use crate::error::AppError;
use crate::models::{Conversation, Message, Role, Turn};
use crate::rate_limiter::RequestThrottle;
use sqlx::sqlite::SqlitePool;
use std::env;
use std::sync::Mutex;
use tracing::{info, instrument};
use validator::Validate;

/// Environment variable holding the completion service credential.
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
/// Environment variable overriding the completion service base URL.
pub const API_BASE_VAR: &str = "OPENAI_API_BASE";
/// Environment variable overriding the database location.
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";

/// Startup configuration for the engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Credential for the completion service. Required.
    pub api_key: String,
    /// Base URL of the completion service.
    pub base_url: String,
    /// Database URL; `None` uses the default on-disk database.
    pub database_url: Option<String>,
}

impl EngineConfig {
    /// Loads configuration from `.env` and the process environment.
    ///
    /// A missing or empty credential is a fatal configuration error at
    /// startup; it is never discovered per request.
    pub fn from_env() -> Result<Self, AppError> {
        dotenv::dotenv().ok();

        let api_key = env::var(API_KEY_VAR)
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                AppError::Config(format!(
                    "{} is not set. The engine cannot reach the completion service without it.",
                    API_KEY_VAR
                ))
            })?;

        let base_url = env::var(API_BASE_VAR)
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        Ok(Self {
            api_key,
            base_url,
            database_url: env::var(DATABASE_URL_VAR).ok(),
        })
    }
}

/// The backend engine: persistence plus reply generation behind one handle.
pub struct ChatEngine {
    composer: ComposerHandle,
    pool: SqlitePool,
    throttle: Mutex<RequestThrottle>,
}

impl ChatEngine {
    /// Initializes the database and spawns the actor system.
    pub async fn start(config: EngineConfig) -> Result<Self, AppError> {
        if config.api_key.trim().is_empty() {
            return Err(AppError::Config(
                "Completion service credential is empty".to_string(),
            ));
        }

        let pool = database::init_db(config.database_url.as_deref()).await?;

        let service =
            CompletionServiceConfig::new(config.api_key).with_base_url(config.base_url);
        let composer = ComposerHandle::new(service);

        info!("Engine started");

        Ok(Self {
            composer,
            pool,
            throttle: Mutex::new(RequestThrottle::default()),
        })
    }

    /// The underlying pool, for callers that list conversations or replay
    /// transcripts through `database` directly.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Creates a new conversation with the default completion configuration.
    pub async fn create_conversation(&self, title: String) -> Result<Conversation, AppError> {
        let conversation =
            database::create_conversation(&self.pool, title, Default::default()).await?;
        Ok(conversation)
    }

    /// Lists all conversations, most recent first.
    pub async fn conversations(&self) -> Result<Vec<Conversation>, AppError> {
        Ok(database::get_all_conversations(&self.pool).await?)
    }

    /// Replays a conversation's messages in chronological order.
    pub async fn conversation_messages(
        &self,
        conversation_id: &str,
    ) -> Result<Vec<Message>, AppError> {
        Ok(database::get_conversation_messages(&self.pool, conversation_id).await?)
    }

    /// Processes one user message:
    /// 1. Admits the request through the per-conversation throttle.
    /// 2. Loads the conversation and its prior turns.
    /// 3. Persists the user turn.
    /// 4. Composes the assistant reply (analysis + knowledge base and/or
    ///    completion service).
    /// 5. Persists the assistant turn and returns the reply text.
    #[instrument(skip(self, content))]
    pub async fn process_message(
        &self,
        conversation_id: &str,
        content: &str,
    ) -> Result<String, AppError> {
        if content.trim().is_empty() {
            return Err(AppError::Validation("Message text is empty".to_string()));
        }

        let admitted = {
            let mut throttle = self
                .throttle
                .lock()
                .map_err(|_| AppError::Internal("Throttle lock poisoned".to_string()))?;
            throttle.try_acquire(conversation_id)
        };
        if !admitted {
            return Err(AppError::RateLimited);
        }

        let conversation = database::get_conversation(&self.pool, conversation_id).await?;
        let config = conversation.completion_config.0.clone();
        config.validate()?;

        let prior = database::get_conversation_messages(&self.pool, conversation_id).await?;
        let history: Vec<Turn> = prior.iter().filter_map(Message::as_turn).collect();

        database::add_message(&self.pool, conversation_id, Role::User.as_str(), content).await?;

        let reply = self
            .composer
            .respond_with_history(content.to_string(), history, config)
            .await?;

        database::add_message(&self.pool, conversation_id, Role::Assistant.as_str(), &reply)
            .await?;

        Ok(reply)
    }
}
