//! # CyberShield Backend Engine
//!
//! Reply generation core for the CyberShield security assistant. A web
//! transport layer links against this crate and drives [`ChatEngine`]: given
//! a conversation id and the latest user text, the engine scores the message
//! for risk, answers from the static knowledge base when a topic matches,
//! and otherwise consults the remote completion service, persisting both
//! turns of the exchange.
//!
//! Routing, authentication, and rendering live in the host application; this
//! crate performs no side effects beyond its own database and the completion
//! service call.

pub mod actors;
pub mod analysis;
pub mod database;
pub mod engine;
pub mod error;
pub mod models;
pub mod preflight;
pub mod rate_limiter;
pub mod telemetry;

#[cfg(test)]
mod tests;

pub use engine::{ChatEngine, EngineConfig};
pub use error::AppError;
