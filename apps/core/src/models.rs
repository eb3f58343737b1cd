use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use validator::Validate;

/// Represents the configuration for the completion model backing a conversation.
#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
pub struct CompletionConfig {
    /// The identifier of the remote model (e.g., "gpt-4o").
    #[validate(length(min = 1))]
    pub model_id: String,
    /// Controls the creativity of the model's responses. Value between 0.0 and 2.0.
    #[validate(range(min = 0.0, max = 2.0))]
    pub temperature: f32,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            model_id: "gpt-4o".to_string(),
            temperature: 0.3,
        }
    }
}

/// The role of a conversation turn's author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Returns the database representation of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    /// Parses a role from its database representation.
    pub fn parse(value: &str) -> Option<Role> {
        match value {
            "user" => Some(Role::User),
            "assistant" => Some(Role::Assistant),
            _ => None,
        }
    }
}

/// One prior conversation turn, as handed to the response composer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Represents a persisted conversation.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Conversation {
    /// The unique identifier for the conversation (UUID).
    pub id: String,
    /// The user-defined title of the conversation.
    pub title: String,
    /// Unix timestamp of when the conversation was created.
    pub created_at: i64,
    /// The completion model configuration associated with this conversation.
    pub completion_config: Json<CompletionConfig>,
}

/// Represents a single persisted message within a conversation.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Message {
    /// The unique identifier for the message.
    pub id: i64,
    /// The ID of the conversation this message belongs to.
    pub conversation_id: String,
    /// The role of the message sender ("user" or "assistant").
    pub role: String,
    /// The text content of the message.
    pub content: String,
    /// Unix timestamp of when the message was created.
    pub created_at: i64,
}

impl Message {
    /// Converts the persisted row into an in-memory turn. Rows with an
    /// unrecognized role column are dropped by the caller.
    pub fn as_turn(&self) -> Option<Turn> {
        Role::parse(&self.role).map(|role| Turn::new(role, self.content.clone()))
    }
}
