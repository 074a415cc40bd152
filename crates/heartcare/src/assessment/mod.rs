//! Multi-step heart-health questionnaire.
//!
//! A blueprint lists the steps of a questionnaire, each step validates its own
//! fields into a typed fragment, the wizard merges fragments into one record,
//! and once the last step succeeds the scoring engine derives a risk tier and
//! recommendations from the complete record.

pub mod blueprint;
pub mod domain;
pub mod scoring;
pub mod validation;
pub mod wizard;

#[cfg(test)]
mod tests;

pub use blueprint::{
    AssessmentBlueprint, AssessmentPreset, FieldRule, FieldSpec, IncompleteRecord, StepDefinition,
};
pub use domain::{
    ActivityLevel, AlcoholIntake, CompletePatientRecord, DietaryHabit, Field, FieldValue, Gender,
    MaritalStatus, MedicalCondition, PatientRecord, ResidenceType, RiskLevel, SmokingStatus,
    UnknownToken, WorkType,
};
pub use scoring::{
    PolicyError, Recommendation, RiskPredicate, RiskResult, RiskThresholds, ScoreBand,
    ScoreComponent, ScoreRule, ScoringEngine, ScoringPolicy,
};
pub use validation::{validate_step, FieldError, RawInput, StepErrors, StepInput};
pub use wizard::{AssessmentWizard, StepProgress, StepStatus, WizardError, WizardState};
