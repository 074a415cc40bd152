use serde::{Deserialize, Serialize};

use super::super::domain::{Field, FieldValue, MedicalCondition, PatientRecord};
use super::ScoreComponent;

/// Condition over a complete record that a rule or recommendation is gated on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskPredicate {
    /// Toggle answered "yes".
    Flag(Field),
    /// Numeric answer strictly greater than the threshold.
    Above { field: Field, threshold: f64 },
    /// Answer equal to a specific typed value.
    Equals { field: Field, value: FieldValue },
    /// Condition ticked on the checklist.
    HasCondition(MedicalCondition),
}

impl RiskPredicate {
    pub fn matches(&self, record: &PatientRecord) -> bool {
        match self {
            RiskPredicate::Flag(field) => record.flag(*field),
            RiskPredicate::Above { field, threshold } => record
                .number(*field)
                .map(|value| value > *threshold)
                .unwrap_or(false),
            RiskPredicate::Equals { field, value } => record.get(*field) == Some(value),
            RiskPredicate::HasCondition(condition) => record.has_condition(*condition),
        }
    }
}

/// Weight awarded when a numeric answer clears `above`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBand {
    pub above: f64,
    pub weight: u16,
}

/// One row of a scoring table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScoreRule {
    /// Fixed weight whenever the predicate holds.
    Weighted {
        label: String,
        weight: u16,
        when: RiskPredicate,
    },
    /// Mutually exclusive bands over one numeric field; the first band cleared wins,
    /// so list them from the highest threshold down.
    Banded {
        label: String,
        field: Field,
        bands: Vec<ScoreBand>,
    },
}

impl ScoreRule {
    pub fn weighted(label: &str, weight: u16, when: RiskPredicate) -> Self {
        ScoreRule::Weighted {
            label: label.to_string(),
            weight,
            when,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            ScoreRule::Weighted { label, .. } | ScoreRule::Banded { label, .. } => label,
        }
    }

    /// Largest contribution this rule can make.
    pub fn max_weight(&self) -> u16 {
        match self {
            ScoreRule::Weighted { weight, .. } => *weight,
            ScoreRule::Banded { bands, .. } => {
                bands.iter().map(|band| band.weight).max().unwrap_or(0)
            }
        }
    }

    pub fn evaluate(&self, record: &PatientRecord) -> Option<ScoreComponent> {
        match self {
            ScoreRule::Weighted {
                label,
                weight,
                when,
            } => when.matches(record).then(|| ScoreComponent {
                label: label.clone(),
                weight: *weight,
            }),
            ScoreRule::Banded {
                label,
                field,
                bands,
            } => {
                let value = record.number(*field)?;
                bands
                    .iter()
                    .find(|band| value > band.above)
                    .filter(|band| band.weight > 0)
                    .map(|band| ScoreComponent {
                        label: label.clone(),
                        weight: band.weight,
                    })
            }
        }
    }
}

pub(crate) fn score_record(record: &PatientRecord, rules: &[ScoreRule]) -> (Vec<ScoreComponent>, u16) {
    let components: Vec<ScoreComponent> = rules
        .iter()
        .filter_map(|rule| rule.evaluate(record))
        .collect();
    let total = components
        .iter()
        .fold(0u16, |total, component| total.saturating_add(component.weight));
    (components, total)
}
