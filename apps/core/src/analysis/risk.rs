//! Risk scoring using keyword heuristics.
//!
//! Fast phrase-based scoring of inbound messages for fraud/scam indicators.
//! No ML model required - pure substring and regex matching.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// High-risk phrases. Each distinct phrase found in a message adds
/// [`PHRASE_WEIGHT`] to the score, counted once regardless of repetitions.
pub const HIGH_RISK_PHRASES: &[&str] = &[
    "bank password",
    "otp",
    "one time password",
    "credit card",
    "debit card",
    "wire transfer",
    "urgent payment",
    "click this link",
    "verify account",
    "bitcoin",
    "crypto investment",
    "lottery winner",
    "send money",
    "account suspended",
    "login immediately",
];

/// Every message starts at this score; nothing ever subtracts from it.
const BASE_SCORE: u32 = 10;
/// Added per distinct high-risk phrase present in the message.
const PHRASE_WEIGHT: u32 = 15;
/// Added when the message carries an embedded link.
const URL_WEIGHT: u32 = 20;
/// Scores are clamped to this ceiling.
const MAX_SCORE: u32 = 100;

// Compiled once at startup
static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)https?://").expect("Invalid regex: URL pattern"));

/// Discretized severity bucket derived from the risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Returns a human-readable label for the level.
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
            RiskLevel::Critical => "Critical",
        }
    }

    /// Maps a clamped score to its severity bucket.
    pub fn from_score(score: u8) -> Self {
        match score {
            75..=u8::MAX => RiskLevel::Critical,
            50..=74 => RiskLevel::High,
            30..=49 => RiskLevel::Medium,
            _ => RiskLevel::Low,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Result of scoring one inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Heuristic score in [10, 100].
    pub score: u8,
    /// Severity bucket derived from the score.
    pub level: RiskLevel,
}

impl RiskAssessment {
    /// Renders the banner placed at the top of every composed reply.
    pub fn banner(&self) -> String {
        format!("Risk Level: {}\nRisk Score: {}/100", self.level, self.score)
    }
}

/// Scores messages for fraud/scam indicators.
///
/// Pure and stateless: the same message always yields the same assessment.
pub struct RiskScorer;

impl Default for RiskScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl RiskScorer {
    pub fn new() -> Self {
        Self
    }

    /// Scores a message.
    ///
    /// Starts at the base score, adds a fixed weight per distinct high-risk
    /// phrase present as a case-insensitive substring, adds a link weight if
    /// the message embeds an `http://` or `https://` URL, then clamps to 100.
    pub fn score(&self, message: &str) -> RiskAssessment {
        let message_lower = message.to_lowercase();

        let mut score = BASE_SCORE;
        for phrase in HIGH_RISK_PHRASES {
            if message_lower.contains(phrase) {
                score += PHRASE_WEIGHT;
            }
        }
        if URL_PATTERN.is_match(message) {
            score += URL_WEIGHT;
        }

        let score = score.min(MAX_SCORE) as u8;
        RiskAssessment {
            score,
            level: RiskLevel::from_score(score),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_benign_message_stays_at_base() {
        let scorer = RiskScorer::new();

        let assessment = scorer.score("What time is the meeting tomorrow?");
        assert_eq!(assessment.score, 10);
        assert_eq!(assessment.level, RiskLevel::Low);
    }

    #[test]
    fn test_phrase_counted_once_despite_repetition() {
        let scorer = RiskScorer::new();

        let assessment = scorer.score("send money now, please send money fast");
        assert_eq!(assessment.score, 25);
    }

    #[test]
    fn test_url_adds_weight() {
        let scorer = RiskScorer::new();

        let assessment = scorer.score("see https://example.com for details");
        assert_eq!(assessment.score, 30);
        assert_eq!(assessment.level, RiskLevel::Medium);
    }

    #[test]
    fn test_level_boundaries() {
        assert_eq!(RiskLevel::from_score(29), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(30), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(49), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(50), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(74), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(75), RiskLevel::Critical);
        assert_eq!(RiskLevel::from_score(100), RiskLevel::Critical);
    }
}
