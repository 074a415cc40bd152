use serde::{Deserialize, Serialize};

use super::super::domain::{PatientRecord, RiskLevel};
use super::rules::RiskPredicate;

/// Normalized-score cut-offs. Both comparisons are strictly greater-than.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskThresholds {
    pub moderate: f64,
    pub high: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            moderate: 0.3,
            high: 0.6,
        }
    }
}

impl RiskThresholds {
    pub fn classify(&self, normalized: f64) -> RiskLevel {
        if normalized > self.high {
            RiskLevel::High
        } else if normalized > self.moderate {
            RiskLevel::Moderate
        } else {
            RiskLevel::Low
        }
    }
}

/// Advice line, shown always or only when its predicate holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when: Option<RiskPredicate>,
}

impl Recommendation {
    pub fn always(text: &str) -> Self {
        Self {
            text: text.to_string(),
            when: None,
        }
    }

    pub fn when(text: &str, predicate: RiskPredicate) -> Self {
        Self {
            text: text.to_string(),
            when: Some(predicate),
        }
    }
}

pub(crate) fn recommendations_for(
    record: &PatientRecord,
    recommendations: &[Recommendation],
) -> Vec<String> {
    recommendations
        .iter()
        .filter(|recommendation| {
            recommendation
                .when
                .as_ref()
                .map(|predicate| predicate.matches(record))
                .unwrap_or(true)
        })
        .map(|recommendation| recommendation.text.trim())
        .filter(|text| !text.is_empty())
        .map(str::to_string)
        .collect()
}
