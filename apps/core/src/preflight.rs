//! Preflight Check System
//!
//! Verifies configuration and collaborators before the engine starts serving:
//! completion credentials, endpoint URL, database, and knowledge base
//! integrity. No assumptions - everything is verified.

use crate::analysis::KnowledgeBase;
use crate::database;
use crate::engine::EngineConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{info, warn};
use url::Url;

/// Result of a single check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    pub name: String,
    pub passed: bool,
    pub message: String,
    pub details: Option<String>,
}

impl CheckResult {
    fn pass(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            passed: true,
            message: message.to_string(),
            details: None,
        }
    }

    fn fail(name: &str, message: &str, details: Option<String>) -> Self {
        Self {
            name: name.to_string(),
            passed: false,
            message: message.to_string(),
            details,
        }
    }
}

/// Complete preflight check report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreflightReport {
    pub all_passed: bool,
    pub checks: Vec<CheckResult>,
    pub summary: String,
}

/// Performs all preflight checks and returns a comprehensive report.
pub async fn run_preflight_checks(config: &EngineConfig) -> PreflightReport {
    info!("Running preflight checks");

    let mut checks = Vec::new();

    checks.push(check_credentials(config));
    checks.push(check_endpoint(config));
    checks.push(check_database(config).await);
    checks.push(check_knowledge_base());

    let all_passed = checks.iter().all(|c| c.passed);

    let summary = if all_passed {
        "All checks passed. Engine ready.".to_string()
    } else {
        let failed: Vec<String> = checks
            .iter()
            .filter(|c| !c.passed)
            .map(|c| c.name.clone())
            .collect();
        format!("Checks failed: {}", failed.join(", "))
    };

    if !all_passed {
        warn!("{}", summary);
    }

    PreflightReport {
        all_passed,
        checks,
        summary,
    }
}

fn check_credentials(config: &EngineConfig) -> CheckResult {
    if config.api_key.trim().is_empty() {
        CheckResult::fail(
            "credentials",
            "Completion service credential is missing",
            Some("Set OPENAI_API_KEY in the environment or .env file".to_string()),
        )
    } else {
        CheckResult::pass("credentials", "Completion service credential present")
    }
}

fn check_endpoint(config: &EngineConfig) -> CheckResult {
    match Url::parse(&config.base_url) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {
            CheckResult::pass("endpoint", "Completion endpoint URL is valid")
        }
        Ok(url) => CheckResult::fail(
            "endpoint",
            "Completion endpoint URL has an unsupported scheme",
            Some(format!("Scheme: {}", url.scheme())),
        ),
        Err(e) => CheckResult::fail(
            "endpoint",
            "Completion endpoint URL does not parse",
            Some(e.to_string()),
        ),
    }
}

async fn check_database(config: &EngineConfig) -> CheckResult {
    match database::init_db(config.database_url.as_deref()).await {
        Ok(pool) => {
            pool.close().await;
            CheckResult::pass("database", "Database reachable and schema ensured")
        }
        Err(e) => CheckResult::fail(
            "database",
            "Database initialization failed",
            Some(e.to_string()),
        ),
    }
}

fn check_knowledge_base() -> CheckResult {
    let kb = KnowledgeBase::new();

    if kb.is_empty() {
        return CheckResult::fail("knowledge_base", "Knowledge base is empty", None);
    }

    let mut seen = HashSet::new();
    for entry in kb.entries() {
        if entry.topic.is_empty() || entry.topic != entry.topic.to_lowercase() {
            return CheckResult::fail(
                "knowledge_base",
                "Knowledge base topic keys must be non-empty lowercase",
                Some(format!("Offending topic: {:?}", entry.topic)),
            );
        }
        if !seen.insert(entry.topic) {
            return CheckResult::fail(
                "knowledge_base",
                "Knowledge base contains a duplicate topic",
                Some(format!("Duplicate topic: {:?}", entry.topic)),
            );
        }
        if entry.controls.is_empty() {
            return CheckResult::fail(
                "knowledge_base",
                "Knowledge base topic has no prevention controls",
                Some(format!("Topic: {:?}", entry.topic)),
            );
        }
    }

    CheckResult::pass(
        "knowledge_base",
        &format!("Knowledge base loaded with {} topics", kb.len()),
    )
}
