use crate::cli::ScoreArgs;
use crate::render::{write_errors, write_result};
use crate::session::prepare;
use heartcare::assessment::{AssessmentWizard, StepInput, WizardError};
use heartcare::config::AppConfig;
use heartcare::error::AppError;
use std::fs;
use std::io::{self, Write};

pub(crate) fn run_score(config: AppConfig, args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs { answers, session } = args;

    let raw = fs::read_to_string(&answers)?;
    let sheet: StepInput = serde_json::from_str(&raw)?;
    let mut session = prepare(config, session)?;

    if let Err(err) = submit_sheet(&mut session.wizard, &sheet) {
        if let WizardError::Validation(errors) = &err {
            let title = session
                .wizard
                .current_step()
                .map(|step| step.title)
                .unwrap_or_default();
            let stderr = io::stderr();
            let mut out = stderr.lock();
            writeln!(out, "Answers rejected at step '{title}':")?;
            write_errors(&mut out, errors)?;
        }
        return Err(err.into());
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_result(&mut out, &session.wizard, session.json)
}

/// Feed one answer sheet through every remaining step. Stops at the first
/// step that rejects its answers.
pub(crate) fn submit_sheet(
    wizard: &mut AssessmentWizard,
    sheet: &StepInput,
) -> Result<(), WizardError> {
    while let Some(step) = wizard.current_step() {
        let input = sheet.for_step(step);
        wizard.submit(&input)?;
    }
    Ok(())
}
