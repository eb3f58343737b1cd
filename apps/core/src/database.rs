use crate::models::{CompletionConfig, Conversation, Message};
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::types::Json;
use std::str::FromStr;
use tracing::info;
use uuid::Uuid;

/// Database URL used when the caller does not supply one.
const DEFAULT_DB_URL: &str = "sqlite://cybershield.sqlite";

/// Opens (creating if missing) the SQLite database and ensures the schema
/// exists. Pass `Some("sqlite::memory:")` for an ephemeral test database.
pub async fn init_db(db_url: Option<&str>) -> Result<SqlitePool, sqlx::Error> {
    let db_url = db_url.unwrap_or(DEFAULT_DB_URL);

    info!("Initializing database at: {}", db_url);

    let options = SqliteConnectOptions::from_str(db_url)?.create_if_missing(true);

    // An in-memory SQLite database exists per connection; more than one
    // connection in the pool would each see an empty schema.
    let max_connections = if db_url.contains(":memory:") { 1 } else { 5 };

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS conversations (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            created_at DATETIME NOT NULL,
            completion_config JSON NOT NULL
        );
        "#,
    )
    .execute(&pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS messages (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            conversation_id TEXT NOT NULL,
            role TEXT NOT NULL,
            content TEXT NOT NULL,
            created_at DATETIME NOT NULL,
            FOREIGN KEY(conversation_id) REFERENCES conversations(id)
        );
        "#,
    )
    .execute(&pool)
    .await?;

    info!("Database initialized");

    Ok(pool)
}

// --- Conversations CRUD ---

pub async fn create_conversation(
    pool: &SqlitePool,
    title: String,
    completion_config: CompletionConfig,
) -> Result<Conversation, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let created_at = Utc::now().timestamp();
    let config_json = Json(completion_config);

    sqlx::query_as::<_, Conversation>(
        r#"
        INSERT INTO conversations (id, title, created_at, completion_config)
        VALUES (?, ?, ?, ?)
        RETURNING id, title, created_at, completion_config
        "#,
    )
    .bind(&id)
    .bind(&title)
    .bind(created_at)
    .bind(config_json)
    .fetch_one(pool)
    .await
}

pub async fn get_conversation(pool: &SqlitePool, id: &str) -> Result<Conversation, sqlx::Error> {
    sqlx::query_as::<_, Conversation>(
        r#"
        SELECT id, title, created_at, completion_config
        FROM conversations
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_one(pool)
    .await
}

pub async fn get_all_conversations(pool: &SqlitePool) -> Result<Vec<Conversation>, sqlx::Error> {
    sqlx::query_as::<_, Conversation>(
        r#"
        SELECT id, title, created_at, completion_config
        FROM conversations
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await
}

// --- Messages CRUD ---

pub async fn add_message(
    pool: &SqlitePool,
    conversation_id: &str,
    role: &str,
    content: &str,
) -> Result<Message, sqlx::Error> {
    let created_at = Utc::now().timestamp();

    sqlx::query_as::<_, Message>(
        r#"
        INSERT INTO messages (conversation_id, role, content, created_at)
        VALUES (?, ?, ?, ?)
        RETURNING id, conversation_id, role, content, created_at
        "#,
    )
    .bind(conversation_id)
    .bind(role)
    .bind(content)
    .bind(created_at)
    .fetch_one(pool)
    .await
}

pub async fn get_conversation_messages(
    pool: &SqlitePool,
    conversation_id: &str,
) -> Result<Vec<Message>, sqlx::Error> {
    sqlx::query_as::<_, Message>(
        r#"
        SELECT id, conversation_id, role, content, created_at
        FROM messages
        WHERE conversation_id = ?
        ORDER BY created_at ASC, id ASC
        "#,
    )
    .bind(conversation_id)
    .fetch_all(pool)
    .await
}
