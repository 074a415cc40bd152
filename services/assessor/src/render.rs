use heartcare::assessment::{
    AssessmentWizard, FieldRule, MedicalCondition, RawInput, RiskResult, ScoreRule, StepErrors,
    StepProgress, StepStatus,
};
use heartcare::error::AppError;
use serde::Serialize;
use std::io::Write;

pub(crate) const DISCLAIMER: &str = "This assessment is for informational purposes only and \
should not be considered as medical advice. Please consult with a healthcare professional for \
proper medical evaluation and advice. If you experience any symptoms of a stroke, seek immediate \
medical attention.";

#[derive(Serialize)]
struct ResultReport<'a> {
    questionnaire: &'a str,
    policy: &'a str,
    risk_percentage: f64,
    risk_label: &'static str,
    risk_color: &'static str,
    #[serde(flatten)]
    result: &'a RiskResult,
    disclaimer: &'static str,
}

/// Print the wizard's result, if it has one. Nothing is written before completion.
pub(crate) fn write_result<W: Write>(
    out: &mut W,
    wizard: &AssessmentWizard,
    json: bool,
) -> Result<(), AppError> {
    let Some(result) = wizard.result() else {
        return Ok(());
    };
    let questionnaire = wizard
        .blueprint()
        .preset()
        .map(|preset| preset.name())
        .unwrap_or("custom");
    let policy = wizard.policy().name.as_str();

    if json {
        let report = ResultReport {
            questionnaire,
            policy,
            risk_percentage: result.risk_percentage(),
            risk_label: result.risk_level.label(),
            risk_color: result.risk_level.color(),
            result,
            disclaimer: DISCLAIMER,
        };
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(
        out,
        "\nAssessment results ({questionnaire} questionnaire, {policy} policy)"
    )?;
    writeln!(
        out,
        "Risk score: {:.1}% ({} of {} points)",
        result.risk_percentage(),
        result.raw_score,
        result.max_score
    )?;
    writeln!(
        out,
        "Risk level: {} risk ({})",
        result.risk_level.label(),
        result.risk_level.color()
    )?;

    if result.components.is_empty() {
        writeln!(out, "\nKey risk factors: none")?;
    } else {
        writeln!(out, "\nKey risk factors")?;
        for component in &result.components {
            writeln!(out, "- {} (+{})", component.label, component.weight)?;
        }
    }

    if !result.recommendations.is_empty() {
        writeln!(out, "\nRecommendations")?;
        for (index, text) in result.recommendations.iter().enumerate() {
            writeln!(out, "{}. {}", index + 1, text)?;
        }
    }

    writeln!(out, "\nImportant note: {DISCLAIMER}")?;
    Ok(())
}

pub(crate) fn write_progress<W: Write>(out: &mut W, progress: &[StepProgress]) -> std::io::Result<()> {
    let header: Vec<String> = progress
        .iter()
        .map(|entry| {
            let marker = match entry.status {
                StepStatus::Done => "x",
                StepStatus::Current => ">",
                StepStatus::Upcoming => " ",
            };
            format!("[{marker}] {} {}", entry.number, entry.title)
        })
        .collect();
    writeln!(out, "\n{}", header.join("  "))?;

    if let Some(current) = progress
        .iter()
        .find(|entry| entry.status == StepStatus::Current)
    {
        writeln!(
            out,
            "Step {} of {}: {}",
            current.number,
            progress.len(),
            current.title
        )?;
    }
    Ok(())
}

pub(crate) fn write_errors<W: Write>(out: &mut W, errors: &StepErrors) -> std::io::Result<()> {
    for (_, error) in errors.iter() {
        writeln!(out, "  ! {error}")?;
    }
    Ok(())
}

/// Short description of what a field accepts, shown next to its prompt.
pub(crate) fn describe_rule(rule: &FieldRule) -> String {
    match rule {
        FieldRule::Integer { min, max } => format!("{min}-{max}"),
        FieldRule::Decimal { min, max } => format!("{min}-{max}"),
        FieldRule::Choice(options) => options.join("/"),
        FieldRule::Flag => "y/n".to_string(),
        FieldRule::Conditions => {
            let tokens: Vec<&str> = MedicalCondition::ALL
                .iter()
                .map(|condition| condition.token())
                .collect();
            format!("comma-separated, any of {}", tokens.join(", "))
        }
    }
}

pub(crate) fn describe_raw(raw: &RawInput) -> String {
    match raw {
        RawInput::Flag(true) => "yes".to_string(),
        RawInput::Flag(false) => "no".to_string(),
        RawInput::Number(number) => number.to_string(),
        RawInput::Text(text) => text.clone(),
        RawInput::Selections(items) if items.is_empty() => "none".to_string(),
        RawInput::Selections(items) => items.join(", "),
    }
}

pub(crate) fn describe_score_rule(rule: &ScoreRule) -> String {
    match rule {
        ScoreRule::Weighted { label, weight, .. } => format!("+{weight} {label}"),
        ScoreRule::Banded {
            label,
            field,
            bands,
        } => {
            let bands: Vec<String> = bands
                .iter()
                .map(|band| format!("+{} above {}", band.weight, band.above))
                .collect();
            format!("{label} ({field}): {}", bands.join(", "))
        }
    }
}
