use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::domain::{CompletePatientRecord, Field, PatientRecord, UnknownToken};
use super::scoring::ScoringPolicy;

/// Named questionnaire + scoring pairings shipped with the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentPreset {
    /// Demographics, glucose, alcohol, diet and medical-history toggles.
    Stroke,
    /// Blood pressure pair, BMI and a checklist of existing conditions.
    Cardio,
}

impl AssessmentPreset {
    pub const ALL: [AssessmentPreset; 2] = [AssessmentPreset::Stroke, AssessmentPreset::Cardio];

    pub const fn name(self) -> &'static str {
        match self {
            AssessmentPreset::Stroke => "stroke",
            AssessmentPreset::Cardio => "cardio",
        }
    }

    pub fn blueprint(self) -> AssessmentBlueprint {
        match self {
            AssessmentPreset::Stroke => AssessmentBlueprint::stroke(),
            AssessmentPreset::Cardio => AssessmentBlueprint::cardio(),
        }
    }

    pub fn scoring_policy(self) -> ScoringPolicy {
        match self {
            AssessmentPreset::Stroke => ScoringPolicy::stroke(),
            AssessmentPreset::Cardio => ScoringPolicy::cardio(),
        }
    }
}

impl fmt::Display for AssessmentPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AssessmentPreset {
    type Err = UnknownToken;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "stroke" => Ok(AssessmentPreset::Stroke),
            "cardio" | "cardiac" => Ok(AssessmentPreset::Cardio),
            other => Err(UnknownToken(other.to_string())),
        }
    }
}

/// How a single field's raw input is checked and typed.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldRule {
    /// Whole number within an inclusive range.
    Integer { min: i64, max: i64 },
    /// Decimal within an inclusive range.
    Decimal { min: f64, max: f64 },
    /// Exactly one of the listed tokens.
    Choice(&'static [&'static str]),
    /// Toggle; absent means `false`.
    Flag,
    /// Any subset of the medical condition checklist.
    Conditions,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub field: Field,
    pub rule: FieldRule,
    pub required: bool,
}

impl FieldSpec {
    pub const fn integer(field: Field, min: i64, max: i64) -> Self {
        Self {
            field,
            rule: FieldRule::Integer { min, max },
            required: true,
        }
    }

    pub const fn decimal(field: Field, min: f64, max: f64) -> Self {
        Self {
            field,
            rule: FieldRule::Decimal { min, max },
            required: true,
        }
    }

    pub const fn choice(field: Field, options: &'static [&'static str]) -> Self {
        Self {
            field,
            rule: FieldRule::Choice(options),
            required: true,
        }
    }

    pub const fn flag(field: Field) -> Self {
        Self {
            field,
            rule: FieldRule::Flag,
            required: false,
        }
    }

    pub const fn conditions(field: Field) -> Self {
        Self {
            field,
            rule: FieldRule::Conditions,
            required: false,
        }
    }
}

/// One page of the questionnaire.
#[derive(Debug, Clone, PartialEq)]
pub struct StepDefinition {
    pub id: &'static str,
    pub title: &'static str,
    pub fields: Vec<FieldSpec>,
}

impl StepDefinition {
    pub fn spec(&self, field: Field) -> Option<&FieldSpec> {
        self.fields.iter().find(|spec| spec.field == field)
    }
}

/// Raised when a record is finalized before every required field is present.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("assessment is missing required answers: {}", format_fields(.missing))]
pub struct IncompleteRecord {
    pub missing: Vec<Field>,
}

fn format_fields(fields: &[Field]) -> String {
    fields
        .iter()
        .map(|field| field.key())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Ordered step definitions for one questionnaire.
#[derive(Debug, Clone, PartialEq)]
pub struct AssessmentBlueprint {
    preset: Option<AssessmentPreset>,
    steps: Vec<StepDefinition>,
}

impl AssessmentBlueprint {
    /// Custom questionnaires; must contain at least one step.
    pub fn new(steps: Vec<StepDefinition>) -> Option<Self> {
        if steps.is_empty() {
            return None;
        }
        Some(Self {
            preset: None,
            steps,
        })
    }

    pub fn stroke() -> Self {
        Self {
            preset: Some(AssessmentPreset::Stroke),
            steps: stroke_steps(),
        }
    }

    pub fn cardio() -> Self {
        Self {
            preset: Some(AssessmentPreset::Cardio),
            steps: cardio_steps(),
        }
    }

    pub fn preset(&self) -> Option<AssessmentPreset> {
        self.preset
    }

    pub fn steps(&self) -> &[StepDefinition] {
        &self.steps
    }

    pub fn step(&self, index: usize) -> Option<&StepDefinition> {
        self.steps.get(index)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn required_fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.steps
            .iter()
            .flat_map(|step| step.fields.iter())
            .filter(|spec| spec.required)
            .map(|spec| spec.field)
    }

    /// Promote a record to a scoreable one once every required field is present.
    pub fn finalize(&self, record: &PatientRecord) -> Result<CompletePatientRecord, IncompleteRecord> {
        let missing: Vec<Field> = self
            .required_fields()
            .filter(|field| !record.contains(*field))
            .collect();

        if missing.is_empty() {
            Ok(CompletePatientRecord::new(record.clone()))
        } else {
            Err(IncompleteRecord { missing })
        }
    }
}

fn stroke_steps() -> Vec<StepDefinition> {
    vec![
        StepDefinition {
            id: "basic",
            title: "Basic Info",
            fields: vec![
                FieldSpec::integer(Field::Age, 18, 120),
                FieldSpec::choice(Field::Gender, &["male", "female"]),
                FieldSpec::choice(Field::MaritalStatus, &["married", "single", "divorced"]),
            ],
        },
        StepDefinition {
            id: "work",
            title: "Work & Home",
            fields: vec![
                FieldSpec::choice(Field::WorkType, &["private", "self-employed", "Govt_job"]),
                FieldSpec::choice(Field::ResidenceType, &["urban", "rural"]),
            ],
        },
        StepDefinition {
            id: "health",
            title: "Health Metrics",
            fields: vec![
                FieldSpec::decimal(Field::AvgGlucoseLevel, 50.0, 300.0),
                FieldSpec::decimal(Field::Bmi, 10.0, 50.0),
                FieldSpec::decimal(Field::BloodPressureLevel, 70.0, 200.0),
            ],
        },
        StepDefinition {
            id: "lifestyle",
            title: "Lifestyle",
            fields: vec![
                FieldSpec::choice(
                    Field::SmokingStatus,
                    &["non-smoker", "formerly smoker", "currently"],
                ),
                FieldSpec::choice(
                    Field::AlcoholIntake,
                    &["never", "rarely", "social drinking", "frequent drinker"],
                ),
                FieldSpec::choice(Field::PhysicalActivity, &["low", "moderate", "high"]),
                FieldSpec::choice(
                    Field::DietaryHabits,
                    &["vegan", "paleo", "pescatarian", "gluten-free", "non-vegetarian"],
                ),
            ],
        },
        StepDefinition {
            id: "medical",
            title: "Medical History",
            fields: vec![
                FieldSpec::flag(Field::Hypertension),
                FieldSpec::flag(Field::HeartDisease),
                FieldSpec::flag(Field::StrokeHistory),
                FieldSpec::flag(Field::FamilyHistory),
            ],
        },
    ]
}

fn cardio_steps() -> Vec<StepDefinition> {
    vec![
        StepDefinition {
            id: "identity",
            title: "About You",
            fields: vec![
                FieldSpec::integer(Field::Age, 18, 120),
                FieldSpec::choice(Field::Gender, &["male", "female", "other"]),
            ],
        },
        StepDefinition {
            id: "vitals",
            title: "Vitals",
            fields: vec![
                FieldSpec::integer(Field::SystolicBp, 70, 200),
                FieldSpec::integer(Field::DiastolicBp, 40, 130),
                FieldSpec::decimal(Field::Bmi, 10.0, 50.0),
            ],
        },
        StepDefinition {
            id: "lifestyle",
            title: "Lifestyle",
            fields: vec![
                FieldSpec::choice(Field::SmokingStatus, &["never", "former", "current"]),
                FieldSpec::choice(
                    Field::PhysicalActivity,
                    &["sedentary", "light", "moderate", "active"],
                ),
            ],
        },
        StepDefinition {
            id: "medical",
            title: "Medical History",
            fields: vec![
                FieldSpec::conditions(Field::MedicalConditions),
                FieldSpec::flag(Field::FamilyHistory),
            ],
        },
    ]
}
