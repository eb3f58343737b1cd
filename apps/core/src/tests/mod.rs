//! Test Module
//!
//! Cross-module test suite for the CyberShield backend.
//!
//! ## Test Categories
//! - `analysis_tests`: risk scoring and knowledge base lookup
//! - `database_tests`: CRUD operations for conversations and messages
//! - `engine_tests`: end-to-end engine flows against a mock completion service
//! - `preflight_tests`: startup checks and environment configuration

pub mod engine_tests;
pub mod preflight_tests;
