//! # Analysis Module
//!
//! Fast, non-LLM analysis system for CyberShield.
//! Analyzes user input BEFORE deciding whether to call the completion service.
//!
//! ## Components
//! - `risk`: keyword/URL risk scoring of inbound messages
//! - `knowledge`: static topic knowledge base with ordered-priority lookup
//!
//! Both components are pure and total: they never fail and hold no mutable
//! state, so they are safe to call from any task without synchronization.

pub mod knowledge;
pub mod risk;

pub use knowledge::{KnowledgeBase, KnowledgeEntry};
pub use risk::{RiskAssessment, RiskLevel, RiskScorer, HIGH_RISK_PHRASES};
