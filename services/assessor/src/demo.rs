use crate::answers::submit_sheet;
use crate::render::{describe_rule, describe_score_rule, write_result};
use heartcare::assessment::{AssessmentPreset, AssessmentWizard, Field, StepInput};
use heartcare::error::AppError;
use std::io::{self, Write};

/// Reference profile scored by `heartcare demo`.
struct Scenario {
    title: &'static str,
    preset: AssessmentPreset,
    answers: StepInput,
}

fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            title: "Elderly smoker with hypertension and a previous stroke",
            preset: AssessmentPreset::Stroke,
            answers: StepInput::new()
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
                .with(Field::StrokeHistory, true)
                .with(Field::FamilyHistory, true),
        },
        Scenario {
            title: "Active thirty-year-old without risk factors",
            preset: AssessmentPreset::Stroke,
            answers: StepInput::new()
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
                .with(Field::DietaryHabits, "pescatarian"),
        },
        Scenario {
            title: "Sedentary adult with hypertension and diabetes",
            preset: AssessmentPreset::Cardio,
            answers: StepInput::new()
                .with(Field::Age, "58")
                .with(Field::Gender, "other")
                .with(Field::SystolicBp, "150")
                .with(Field::DiastolicBp, "85")
                .with(Field::Bmi, "31.5")
                .with(Field::SmokingStatus, "former")
                .with(Field::PhysicalActivity, "sedentary")
                .with_selections(Field::MedicalConditions, ["Hypertension", "Diabetes"]),
        },
    ]
}

pub(crate) fn run_demo() -> Result<(), AppError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    writeln!(out, "HeartCare assessment demo")?;
    for scenario in scenarios() {
        let mut wizard = AssessmentWizard::for_preset(scenario.preset)?;
        submit_sheet(&mut wizard, &scenario.answers)?;

        writeln!(out, "\n== {} ==", scenario.title)?;
        write_result(&mut out, &wizard, false)?;
    }

    Ok(())
}

pub(crate) fn run_presets() -> Result<(), AppError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for preset in AssessmentPreset::ALL {
        let blueprint = preset.blueprint();
        let policy = preset.scoring_policy();

        writeln!(
            out,
            "{} ({} steps, maximum score {})",
            preset,
            blueprint.len(),
            policy.max_score()
        )?;
        for (index, step) in blueprint.steps().iter().enumerate() {
            writeln!(out, "  {}. {} [{}]", index + 1, step.title, step.id)?;
            for spec in &step.fields {
                let optional = if spec.required { "" } else { ", optional" };
                writeln!(
                    out,
                    "     - {} ({}{optional}): {}",
                    spec.field.label(),
                    spec.field,
                    describe_rule(&spec.rule)
                )?;
            }
        }
        writeln!(out, "  Scoring")?;
        for rule in &policy.rules {
            writeln!(out, "     - {}", describe_score_rule(rule))?;
        }
        writeln!(out)?;
    }

    Ok(())
}
