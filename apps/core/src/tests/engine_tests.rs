//! Engine Tests
//!
//! End-to-end flows through `ChatEngine` with the completion service mocked
//! at the HTTP level: composition paths, persistence of both turns,
//! degradation on outages, and throttling.

use crate::engine::{ChatEngine, EngineConfig};
use crate::error::AppError;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Test Fixtures
// ============================================================================

async fn start_engine(base_url: String) -> ChatEngine {
    let config = EngineConfig {
        api_key: "test-key".to_string(),
        base_url,
        database_url: Some("sqlite::memory:".to_string()),
    };
    ChatEngine::start(config).await.expect("engine should start")
}

fn completion_body(content: &str) -> serde_json::Value {
    json!({
        "choices": [
            { "message": { "role": "assistant", "content": content } }
        ]
    })
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_free_form_message_round_trip() {
    // 1. Arrange
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(
            "Change the default router password and enable WPA3.",
        )))
        .mount(&mock_server)
        .await;

    let engine = start_engine(mock_server.uri()).await;
    let conversation = engine
        .create_conversation("Router help".to_string())
        .await
        .unwrap();

    // 2. Act
    let reply = engine
        .process_message(&conversation.id, "How do I secure my home Wi-Fi router?")
        .await
        .unwrap();

    // 3. Assert
    assert!(reply.contains("Risk Level: Low"));
    assert!(reply.contains("Risk Score: 10/100"));
    assert!(reply.contains("Change the default router password"));
    assert!(reply.contains("General Protection Checklist"));

    let messages = engine.conversation_messages(&conversation.id).await.unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, "user");
    assert_eq!(messages[0].content, "How do I secure my home Wi-Fi router?");
    assert_eq!(messages[1].role, "assistant");
    assert_eq!(messages[1].content, reply);
}

#[tokio::test]
async fn test_knowledge_topic_never_reaches_the_service() {
    let mock_server = MockServer::start().await;
    let engine = start_engine(mock_server.uri()).await;
    let conversation = engine
        .create_conversation("KB".to_string())
        .await
        .unwrap();

    let reply = engine
        .process_message(&conversation.id, "What is fraud and how do I avoid it?")
        .await
        .unwrap();

    assert!(reply.contains("Knowledge Base Match: FRAUD"));
    assert!(reply.contains("Awareness Advice"));

    let requests = mock_server.received_requests().await.unwrap();
    assert!(requests.is_empty(), "KB replies must not call the completion service");
}

#[tokio::test]
async fn test_service_outage_degrades_but_persists() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&mock_server)
        .await;

    let engine = start_engine(mock_server.uri()).await;
    let conversation = engine
        .create_conversation("Outage".to_string())
        .await
        .unwrap();

    let reply = engine
        .process_message(&conversation.id, "Is this message from my bank genuine?")
        .await
        .unwrap();

    // The locally computed banner survives the outage
    assert!(reply.contains("Risk Level:"));
    assert!(reply.contains("could not be reached"));

    let messages = engine.conversation_messages(&conversation.id).await.unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].content, reply);
}

#[tokio::test]
async fn test_prior_turns_are_forwarded() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("Answer.")))
        .mount(&mock_server)
        .await;

    let engine = start_engine(mock_server.uri()).await;
    let conversation = engine
        .create_conversation("History".to_string())
        .await
        .unwrap();

    engine
        .process_message(&conversation.id, "What is smishing?")
        .await
        .unwrap();
    engine
        .process_message(&conversation.id, "How is it different from phishing?")
        .await
        .unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);

    // Second request carries system + two persisted turns + the new message
    let body: serde_json::Value = serde_json::from_slice(&requests[1].body).unwrap();
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 4);
    assert_eq!(messages[0]["role"], "system");
    assert_eq!(messages[1]["content"], "What is smishing?");
    assert_eq!(messages[2]["role"], "assistant");
    assert_eq!(messages[3]["content"], "How is it different from phishing?");
}

#[tokio::test]
async fn test_empty_message_is_rejected_before_persisting() {
    let mock_server = MockServer::start().await;
    let engine = start_engine(mock_server.uri()).await;
    let conversation = engine
        .create_conversation("Empty".to_string())
        .await
        .unwrap();

    let result = engine.process_message(&conversation.id, "   ").await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    let messages = engine.conversation_messages(&conversation.id).await.unwrap();
    assert!(messages.is_empty());
}

#[tokio::test]
async fn test_unknown_conversation_is_a_database_error() {
    let mock_server = MockServer::start().await;
    let engine = start_engine(mock_server.uri()).await;

    let result = engine.process_message("no-such-id", "hello").await;
    assert!(matches!(result, Err(AppError::Database(_))));
}

#[tokio::test]
async fn test_throttle_limits_a_conversation() {
    let mock_server = MockServer::start().await;
    let engine = start_engine(mock_server.uri()).await;
    let conversation = engine
        .create_conversation("Chatty".to_string())
        .await
        .unwrap();

    // KB-answered message, so no HTTP traffic is involved
    for _ in 0..10 {
        engine
            .process_message(&conversation.id, "what is fraud?")
            .await
            .unwrap();
    }

    let result = engine
        .process_message(&conversation.id, "what is fraud?")
        .await;
    assert!(matches!(result, Err(AppError::RateLimited)));
}

#[tokio::test]
async fn test_engine_refuses_to_start_without_credential() {
    let config = EngineConfig {
        api_key: "   ".to_string(),
        base_url: "http://localhost:1".to_string(),
        database_url: Some("sqlite::memory:".to_string()),
    };

    let result = ChatEngine::start(config).await;
    assert!(matches!(result, Err(AppError::Config(_))));
}
