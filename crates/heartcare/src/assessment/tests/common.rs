use crate::assessment::blueprint::{AssessmentBlueprint, AssessmentPreset};
use crate::assessment::domain::{CompletePatientRecord, Field, PatientRecord};
use crate::assessment::scoring::{ScoringEngine, ScoringPolicy};
use crate::assessment::validation::{validate_step, StepInput};
use crate::assessment::wizard::{AssessmentWizard, WizardState};

/// Every stroke-questionnaire answer, filled in with a low-risk profile.
pub(super) fn low_risk_stroke_answers() -> StepInput {
    StepInput::new()
        .with(Field::Age, "30")
        .with(Field::Gender, "female")
        .with(Field::MaritalStatus, "single")
        .with(Field::WorkType, "private")
        .with(Field::ResidenceType, "urban")
        .with(Field::AvgGlucoseLevel, "90")
        .with(Field::Bmi, "22")
        .with(Field::BloodPressureLevel, "110")
        .with(Field::SmokingStatus, "non-smoker")
        .with(Field::AlcoholIntake, "never")
        .with(Field::PhysicalActivity, "moderate")
        .with(Field::DietaryHabits, "pescatarian")
        .with(Field::Hypertension, false)
        .with(Field::HeartDisease, false)
        .with(Field::StrokeHistory, false)
        .with(Field::FamilyHistory, false)
}

/// Age 70, hypertension, prior stroke, family history, current smoker with low
/// activity and elevated BMI, glucose and blood pressure.
pub(super) fn high_risk_stroke_answers() -> StepInput {
    StepInput::new()
        .with(Field::Age, "70")
        .with(Field::Gender, "male")
        .with(Field::MaritalStatus, "married")
        .with(Field::WorkType, "self-employed")
        .with(Field::ResidenceType, "rural")
        .with(Field::AvgGlucoseLevel, "210")
        .with(Field::Bmi, "32")
        .with(Field::BloodPressureLevel, "150")
        .with(Field::SmokingStatus, "currently")
        .with(Field::AlcoholIntake, "never")
        .with(Field::PhysicalActivity, "low")
        .with(Field::DietaryHabits, "non-vegetarian")
        .with(Field::Hypertension, true)
        .with(Field::HeartDisease, false)
        .with(Field::StrokeHistory, true)
        .with(Field::FamilyHistory, true)
}

pub(super) fn cardio_answers() -> StepInput {
    StepInput::new()
        .with(Field::Age, "58")
        .with(Field::Gender, "other")
        .with(Field::SystolicBp, "150")
        .with(Field::DiastolicBp, "85")
        .with(Field::Bmi, "31.5")
        .with(Field::SmokingStatus, "former")
        .with(Field::PhysicalActivity, "sedentary")
        .with_selections(Field::MedicalConditions, ["Hypertension", "Diabetes"])
        .with(Field::FamilyHistory, false)
}

pub(super) fn stroke_engine() -> ScoringEngine {
    ScoringEngine::new(ScoringPolicy::stroke()).expect("stroke policy is valid")
}

pub(super) fn cardio_engine() -> ScoringEngine {
    ScoringEngine::new(ScoringPolicy::cardio()).expect("cardio policy is valid")
}

pub(super) fn wizard(preset: AssessmentPreset) -> AssessmentWizard {
    AssessmentWizard::for_preset(preset).expect("preset policy is valid")
}

/// Validate every step of the blueprint against one answer sheet and finalize.
pub(super) fn complete_record(
    blueprint: &AssessmentBlueprint,
    answers: &StepInput,
) -> CompletePatientRecord {
    let mut record = PatientRecord::new();
    for step in blueprint.steps() {
        let fragment = validate_step(step, &answers.for_step(step))
            .unwrap_or_else(|errors| panic!("step {} rejected answers: {errors:?}", step.id));
        record.merge(fragment);
    }
    blueprint.finalize(&record).expect("record is complete")
}

/// Submit each step in order until the wizard completes.
pub(super) fn run_to_completion(wizard: &mut AssessmentWizard, answers: &StepInput) {
    while let Some(step) = wizard.current_step() {
        let input = answers.for_step(step);
        wizard.submit(&input).expect("step accepted");
    }
    assert_eq!(wizard.state(), WizardState::Complete);
}
