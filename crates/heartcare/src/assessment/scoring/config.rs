use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::super::domain::{ActivityLevel, AlcoholIntake, Field, FieldValue, MedicalCondition, SmokingStatus};
use super::policy::{Recommendation, RiskThresholds};
use super::rules::{RiskPredicate, ScoreBand, ScoreRule};

/// Rule table, thresholds and advice making up one scoring configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringPolicy {
    pub name: String,
    pub rules: Vec<ScoreRule>,
    #[serde(default)]
    pub thresholds: RiskThresholds,
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
}

/// Raised when a custom policy cannot be loaded or would not normalize.
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    #[error("failed to read scoring policy: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid scoring policy JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("scoring policy '{0}' has no attainable score")]
    EmptyScale(String),
    #[error("scoring policy '{0}' weights add up to more than 65535")]
    ScaleOverflow(String),
    #[error("scoring policy '{name}' thresholds must satisfy 0 <= moderate ({moderate}) <= high ({high}) <= 1")]
    InvalidThresholds {
        name: String,
        moderate: f64,
        high: f64,
    },
}

impl ScoringPolicy {
    /// Sum of every rule's largest weight; the denominator for normalization.
    /// Saturates at `u16::MAX`; `validate` rejects policies that would.
    pub fn max_score(&self) -> u16 {
        self.checked_max_score().unwrap_or(u16::MAX)
    }

    fn checked_max_score(&self) -> Option<u16> {
        self.rules
            .iter()
            .map(ScoreRule::max_weight)
            .try_fold(0u16, u16::checked_add)
    }

    pub fn validate(&self) -> Result<(), PolicyError> {
        match self.checked_max_score() {
            None => return Err(PolicyError::ScaleOverflow(self.name.clone())),
            Some(0) => return Err(PolicyError::EmptyScale(self.name.clone())),
            Some(_) => {}
        }

        let RiskThresholds { moderate, high } = self.thresholds;
        let ordered = (0.0..=1.0).contains(&moderate)
            && (0.0..=1.0).contains(&high)
            && moderate <= high;
        if !ordered {
            return Err(PolicyError::InvalidThresholds {
                name: self.name.clone(),
                moderate,
                high,
            });
        }

        Ok(())
    }

    pub fn from_json(raw: &str) -> Result<Self, PolicyError> {
        let policy: ScoringPolicy = serde_json::from_str(raw)?;
        policy.validate()?;
        Ok(policy)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, PolicyError> {
        let raw = fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Weights of the stroke questionnaire; the maximum attainable score is 19.
    pub fn stroke() -> Self {
        Self {
            name: "stroke".to_string(),
            rules: vec![
                age_bands(),
                ScoreRule::weighted("Hypertension", 2, RiskPredicate::Flag(Field::Hypertension)),
                ScoreRule::weighted("Heart disease", 2, RiskPredicate::Flag(Field::HeartDisease)),
                ScoreRule::weighted(
                    "Previous stroke history",
                    3,
                    RiskPredicate::Flag(Field::StrokeHistory),
                ),
                ScoreRule::weighted(
                    "Family history of stroke",
                    1,
                    RiskPredicate::Flag(Field::FamilyHistory),
                ),
                ScoreRule::weighted("Current smoker", 2, current_smoker()),
                ScoreRule::weighted("Frequent drinker", 1, frequent_drinker()),
                ScoreRule::weighted(
                    "Low physical activity",
                    1,
                    activity_is(ActivityLevel::Low),
                ),
                ScoreRule::weighted("BMI above 30", 1, above(Field::Bmi, 30.0)),
                ScoreRule::weighted(
                    "Average glucose above 200 mg/dL",
                    2,
                    above(Field::AvgGlucoseLevel, 200.0),
                ),
                ScoreRule::weighted(
                    "Blood pressure above 140",
                    2,
                    above(Field::BloodPressureLevel, 140.0),
                ),
            ],
            thresholds: RiskThresholds::default(),
            recommendations: {
                let mut recommendations = baseline_recommendations();
                recommendations.extend([
                    Recommendation::when("Consider smoking cessation programs", current_smoker()),
                    Recommendation::when("Reduce alcohol consumption", frequent_drinker()),
                    Recommendation::when(
                        "Work with a healthcare provider on weight management",
                        above(Field::Bmi, 30.0),
                    ),
                    Recommendation::when(
                        "Increase daily physical activity levels",
                        activity_is(ActivityLevel::Low),
                    ),
                ]);
                recommendations
            },
        }
    }

    /// Weights of the cardio form, keyed off the conditions checklist; maximum 21.
    pub fn cardio() -> Self {
        Self {
            name: "cardio".to_string(),
            rules: vec![
                age_bands(),
                ScoreRule::weighted(
                    "Hypertension",
                    2,
                    RiskPredicate::HasCondition(MedicalCondition::Hypertension),
                ),
                ScoreRule::weighted(
                    "Heart disease",
                    2,
                    RiskPredicate::HasCondition(MedicalCondition::HeartDisease),
                ),
                ScoreRule::weighted(
                    "Previous stroke",
                    3,
                    RiskPredicate::HasCondition(MedicalCondition::PreviousStroke),
                ),
                ScoreRule::weighted(
                    "Diabetes",
                    2,
                    RiskPredicate::HasCondition(MedicalCondition::Diabetes),
                ),
                ScoreRule::weighted(
                    "High cholesterol",
                    1,
                    RiskPredicate::HasCondition(MedicalCondition::HighCholesterol),
                ),
                ScoreRule::weighted(
                    "Obesity",
                    1,
                    RiskPredicate::HasCondition(MedicalCondition::Obesity),
                ),
                ScoreRule::weighted(
                    "Family history of heart disease",
                    1,
                    RiskPredicate::Flag(Field::FamilyHistory),
                ),
                ScoreRule::weighted("Current smoker", 2, current_smoker()),
                ScoreRule::weighted(
                    "Sedentary lifestyle",
                    1,
                    activity_is(ActivityLevel::Sedentary),
                ),
                ScoreRule::weighted("BMI above 30", 1, above(Field::Bmi, 30.0)),
                ScoreRule::weighted(
                    "Systolic pressure above 140 mmHg",
                    2,
                    above(Field::SystolicBp, 140.0),
                ),
                ScoreRule::weighted(
                    "Diastolic pressure above 90 mmHg",
                    1,
                    above(Field::DiastolicBp, 90.0),
                ),
            ],
            thresholds: RiskThresholds::default(),
            recommendations: {
                let mut recommendations = baseline_recommendations();
                recommendations.extend([
                    Recommendation::when("Consider smoking cessation programs", current_smoker()),
                    Recommendation::when(
                        "Work with a healthcare provider on weight management",
                        above(Field::Bmi, 30.0),
                    ),
                    Recommendation::when(
                        "Increase daily physical activity levels",
                        activity_is(ActivityLevel::Sedentary),
                    ),
                    Recommendation::when(
                        "Discuss blood pressure treatment options with your doctor",
                        above(Field::SystolicBp, 140.0),
                    ),
                    Recommendation::when(
                        "Keep blood sugar within the range agreed with your care team",
                        RiskPredicate::HasCondition(MedicalCondition::Diabetes),
                    ),
                    Recommendation::when(
                        "Share your family history of heart disease with your doctor",
                        RiskPredicate::Flag(Field::FamilyHistory),
                    ),
                ]);
                recommendations
            },
        }
    }
}

fn age_bands() -> ScoreRule {
    ScoreRule::Banded {
        label: "Age".to_string(),
        field: Field::Age,
        bands: vec![
            ScoreBand {
                above: 65.0,
                weight: 2,
            },
            ScoreBand {
                above: 45.0,
                weight: 1,
            },
        ],
    }
}

fn baseline_recommendations() -> Vec<Recommendation> {
    vec![
        Recommendation::always("Maintain regular blood pressure monitoring"),
        Recommendation::always("Follow a balanced, heart-healthy diet"),
        Recommendation::always("Engage in regular physical activity"),
        Recommendation::always("Schedule regular check-ups with your healthcare provider"),
    ]
}

fn above(field: Field, threshold: f64) -> RiskPredicate {
    RiskPredicate::Above { field, threshold }
}

fn current_smoker() -> RiskPredicate {
    RiskPredicate::Equals {
        field: Field::SmokingStatus,
        value: FieldValue::Smoking(SmokingStatus::Current),
    }
}

fn frequent_drinker() -> RiskPredicate {
    RiskPredicate::Equals {
        field: Field::AlcoholIntake,
        value: FieldValue::Alcohol(AlcoholIntake::Frequent),
    }
}

fn activity_is(level: ActivityLevel) -> RiskPredicate {
    RiskPredicate::Equals {
        field: Field::PhysicalActivity,
        value: FieldValue::Activity(level),
    }
}
