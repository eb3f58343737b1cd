//! Preflight Tests
//!
//! Startup checks and environment-driven configuration loading.

use crate::engine::{EngineConfig, API_BASE_VAR, API_KEY_VAR};
use crate::error::AppError;
use crate::preflight::run_preflight_checks;

fn test_config() -> EngineConfig {
    EngineConfig {
        api_key: "test-key".to_string(),
        base_url: "https://api.openai.com/v1".to_string(),
        database_url: Some("sqlite::memory:".to_string()),
    }
}

#[tokio::test]
async fn test_preflight_passes_on_valid_config() {
    let report = run_preflight_checks(&test_config()).await;

    assert!(report.all_passed, "unexpected failures: {}", report.summary);
    assert_eq!(report.checks.len(), 4);
    assert!(report.summary.contains("ready"));
}

#[tokio::test]
async fn test_preflight_flags_missing_credential() {
    let mut config = test_config();
    config.api_key = String::new();

    let report = run_preflight_checks(&config).await;

    assert!(!report.all_passed);
    let credential_check = report
        .checks
        .iter()
        .find(|c| c.name == "credentials")
        .expect("credentials check present");
    assert!(!credential_check.passed);
    assert!(report.summary.contains("credentials"));
}

#[tokio::test]
async fn test_preflight_flags_invalid_endpoint() {
    let mut config = test_config();
    config.base_url = "not a url".to_string();

    let report = run_preflight_checks(&config).await;

    assert!(!report.all_passed);
    let endpoint_check = report
        .checks
        .iter()
        .find(|c| c.name == "endpoint")
        .expect("endpoint check present");
    assert!(!endpoint_check.passed);
}

#[tokio::test]
async fn test_preflight_validates_knowledge_base() {
    let report = run_preflight_checks(&test_config()).await;

    let kb_check = report
        .checks
        .iter()
        .find(|c| c.name == "knowledge_base")
        .expect("knowledge base check present");
    assert!(kb_check.passed);
    assert!(kb_check.message.contains("topics"));
}

#[test]
fn test_config_from_env_requires_credential() {
    temp_env::with_vars([(API_KEY_VAR, None::<&str>), (API_BASE_VAR, None::<&str>)], || {
        let result = EngineConfig::from_env();
        assert!(matches!(result, Err(AppError::Config(_))));
    });
}

#[test]
fn test_config_from_env_reads_overrides() {
    temp_env::with_vars(
        [
            (API_KEY_VAR, Some("sk-test")),
            (API_BASE_VAR, Some("https://llm.internal/v1")),
        ],
        || {
            let config = EngineConfig::from_env().expect("config should load");
            assert_eq!(config.api_key, "sk-test");
            assert_eq!(config.base_url, "https://llm.internal/v1");
        },
    );
}

#[test]
fn test_config_from_env_defaults_base_url() {
    temp_env::with_vars(
        [(API_KEY_VAR, Some("sk-test")), (API_BASE_VAR, None)],
        || {
            let config = EngineConfig::from_env().expect("config should load");
            assert_eq!(config.base_url, crate::actors::DEFAULT_API_BASE);
        },
    );
}
