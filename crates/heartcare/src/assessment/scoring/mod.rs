mod config;
mod policy;
mod rules;

pub use config::{PolicyError, ScoringPolicy};
pub use policy::{Recommendation, RiskThresholds};
pub use rules::{RiskPredicate, ScoreBand, ScoreRule};

use super::domain::{CompletePatientRecord, RiskLevel};
use policy::recommendations_for;
use serde::{Deserialize, Serialize};

/// Stateless scorer applying one policy to complete records.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    policy: ScoringPolicy,
}

impl ScoringEngine {
    pub fn new(policy: ScoringPolicy) -> Result<Self, PolicyError> {
        policy.validate()?;
        Ok(Self { policy })
    }

    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    pub fn score(&self, record: &CompletePatientRecord) -> RiskResult {
        let (components, raw_score) = rules::score_record(record, &self.policy.rules);
        let max_score = self.policy.max_score();
        let risk_score = f64::from(raw_score) / f64::from(max_score);

        RiskResult {
            risk_score,
            raw_score,
            max_score,
            risk_level: self.policy.thresholds.classify(risk_score),
            recommendations: recommendations_for(record, &self.policy.recommendations),
            components,
        }
    }
}

/// A rule that fired, kept so the result view can list contributing factors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub label: String,
    pub weight: u16,
}

/// Derived assessment outcome; rebuilt from scratch on every scoring call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskResult {
    /// Normalized score in `[0, 1]`.
    pub risk_score: f64,
    pub raw_score: u16,
    pub max_score: u16,
    pub risk_level: RiskLevel,
    pub recommendations: Vec<String>,
    pub components: Vec<ScoreComponent>,
}

impl RiskResult {
    pub fn risk_percentage(&self) -> f64 {
        self.risk_score * 100.0
    }
}
