use crate::actors::messages::{AppError, CompletionMessage};
use crate::actors::traits::CompletionActor;
use crate::models::{CompletionConfig, Turn};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, AUTHORIZATION};
use reqwest::Client;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::timeout;
use tracing::{info, warn};

/// Default base URL of the completion service (OpenAI-compatible).
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

// --- Constants ---
const COMPLETION_TIMEOUT: Duration = Duration::from_secs(45);
const HANDLE_TIMEOUT: Duration = Duration::from_secs(120);
/// At most one extra attempt, and only on transport failures - never on an
/// HTTP error status the service actually returned.
const MAX_TRANSPORT_RETRIES: u32 = 1;

/// Connection settings for the remote completion service.
#[derive(Debug, Clone)]
pub struct CompletionServiceConfig {
    /// Bearer credential for the service. Required.
    pub api_key: String,
    /// Base URL, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
}

impl CompletionServiceConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_API_BASE.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

// OpenAI-compatible request/response payloads
#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

/// A handle to the `CompletionActor`.
///
/// This struct provides a public, cloneable interface for sending messages to
/// the running completion actor. It abstracts away the `mpsc::Sender`.
#[derive(Clone)]
pub struct CompletionActorHandle {
    sender: mpsc::Sender<CompletionMessage>,
}

impl CompletionActorHandle {
    /// Creates a new `CompletionActor` and returns a handle to it.
    ///
    /// This will spawn the `CompletionActorRunner` in a new Tokio task.
    pub fn new(config: CompletionServiceConfig) -> Self {
        let (sender, receiver) = mpsc::channel(32);
        let actor = CompletionActorRunner::new(receiver, config);
        tokio::spawn(async move { actor.run().await });
        Self { sender }
    }
}

#[async_trait]
impl CompletionActor for CompletionActorHandle {
    async fn complete(
        &self,
        system_prompt: String,
        history: Vec<Turn>,
        message: String,
        config: CompletionConfig,
    ) -> Result<String, AppError> {
        let (send, recv) = oneshot::channel();
        let msg = CompletionMessage::Complete {
            system_prompt,
            history,
            message,
            config,
            responder: send,
        };

        self.sender
            .send(msg)
            .await
            .map_err(|e| AppError::Actor(crate::actors::messages::ActorError::Internal(e.to_string())))?;
        timeout(HANDLE_TIMEOUT, recv)
            .await?
            .map_err(|e| AppError::Actor(crate::actors::messages::ActorError::Internal(e.to_string())))?
    }
}

// --- Actor Runner (Internal Logic) ---
struct CompletionActorRunner {
    receiver: mpsc::Receiver<CompletionMessage>,
    client: Client,
    base_url: String,
    api_key: String,
}

impl CompletionActorRunner {
    fn new(receiver: mpsc::Receiver<CompletionMessage>, config: CompletionServiceConfig) -> Self {
        Self {
            receiver,
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
        }
    }

    async fn run(mut self) {
        info!("CompletionActor started");

        while let Some(msg) = self.receiver.recv().await {
            self.handle_message(msg).await;
        }

        info!("CompletionActor stopped");
    }

    async fn handle_message(&mut self, msg: CompletionMessage) {
        match msg {
            CompletionMessage::Complete {
                system_prompt,
                history,
                message,
                config,
                responder,
            } => {
                let result = self
                    .generate_completion(system_prompt, history, message, config)
                    .await;
                let _ = responder.send(result);
            }
        }
    }

    fn build_request(&self, payload: &ChatRequest) -> reqwest::RequestBuilder {
        let mut headers = HeaderMap::new();
        let auth_value = format!("Bearer {}", self.api_key);
        if let Ok(value) = auth_value.parse() {
            headers.insert(AUTHORIZATION, value);
        }

        self.client
            .post(format!("{}/chat/completions", self.base_url))
            .headers(headers)
            .json(payload)
    }

    /// Flattens system prompt, prior turns, and the latest user message into
    /// the wire message list, oldest turn first.
    fn build_messages(system_prompt: String, history: Vec<Turn>, message: String) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage {
            role: "system".to_string(),
            content: system_prompt,
        });
        for turn in history {
            messages.push(ChatMessage {
                role: turn.role.as_str().to_string(),
                content: turn.content,
            });
        }
        messages.push(ChatMessage {
            role: "user".to_string(),
            content: message,
        });
        messages
    }

    async fn generate_completion(
        &self,
        system_prompt: String,
        history: Vec<Turn>,
        message: String,
        config: CompletionConfig,
    ) -> Result<String, AppError> {
        info!(model = %config.model_id, turns = history.len(), "Requesting completion");

        let payload = ChatRequest {
            model: config.model_id,
            temperature: config.temperature,
            messages: Self::build_messages(system_prompt, history, message),
        };

        let mut attempt = 0;
        let res = loop {
            attempt += 1;
            match timeout(COMPLETION_TIMEOUT, self.build_request(&payload).send()).await {
                Ok(Ok(res)) => break res,
                Ok(Err(e)) if attempt <= MAX_TRANSPORT_RETRIES => {
                    warn!("Completion transport failure (attempt {}): {}", attempt, e);
                }
                Ok(Err(e)) => return Err(AppError::Completion(e.to_string())),
                Err(_) if attempt <= MAX_TRANSPORT_RETRIES => {
                    warn!("Completion request timed out (attempt {})", attempt);
                }
                Err(elapsed) => return Err(AppError::Timeout(elapsed.to_string())),
            }
        };

        let status = res.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(AppError::RateLimited);
        }

        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(AppError::Completion(format!(
                "Completion request failed with status {}: {}",
                status, body
            )));
        }

        let json: ChatResponse = res
            .json()
            .await
            .map_err(|e| AppError::Completion(format!("Malformed completion payload: {}", e)))?;

        let content = json
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        // An empty body is a failure, not a reply.
        if content.trim().is_empty() {
            return Err(AppError::Completion(
                "Completion service returned an empty reply body".to_string(),
            ));
        }

        Ok(content)
    }
}
