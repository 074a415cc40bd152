use crate::cli::AssessArgs;
use crate::render::{describe_raw, describe_rule, write_errors, write_progress, write_result};
use crate::session::prepare;
use heartcare::assessment::{AssessmentWizard, FieldSpec, StepInput, WizardError};
use heartcare::config::AppConfig;
use heartcare::error::AppError;
use std::io::{self, BufRead, Write};
use tracing::debug;

/// How a prompt loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    Completed,
    Cancelled,
}

pub(crate) fn run_assess(config: AppConfig, args: AssessArgs) -> Result<(), AppError> {
    let mut session = prepare(config, args.session)?;

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let stdout = io::stdout();
    let mut output = stdout.lock();

    writeln!(
        output,
        "HeartCare {} assessment. Press enter to keep a bracketed answer, type 'back' for the previous step.",
        session.preset
    )?;

    match walk(&mut session.wizard, &mut input, &mut output)? {
        Outcome::Completed => write_result(&mut output, &session.wizard, session.json),
        Outcome::Cancelled => {
            writeln!(output, "\nAssessment cancelled.")?;
            Ok(())
        }
    }
}

/// Ask every field of the current step, submit, and repeat until the wizard
/// completes or input runs out.
pub(crate) fn walk<R: BufRead, W: Write>(
    wizard: &mut AssessmentWizard,
    input: &mut R,
    output: &mut W,
) -> Result<Outcome, AppError> {
    // Answers of a rejected submission, offered again instead of the record's.
    let mut draft: Option<StepInput> = None;

    while let Some(step) = wizard.current_step().cloned() {
        write_progress(output, &wizard.progress())?;

        let mut answers = draft.take().unwrap_or_else(|| wizard.prefill());
        let mut went_back = false;

        for spec in &step.fields {
            prompt(output, spec, &answers)?;
            let Some(line) = read_answer(input)? else {
                return Ok(Outcome::Cancelled);
            };
            let answer = line.trim();

            if answer.eq_ignore_ascii_case("back") {
                went_back = true;
                break;
            }
            if !answer.is_empty() {
                answers.set(spec.field, answer);
            }
        }

        if went_back {
            if wizard.current_index() == Some(0) {
                writeln!(output, "Already on the first step.")?;
            }
            wizard.retreat();
            continue;
        }

        match wizard.submit(&answers) {
            Ok(state) => debug!(?state, step = step.id, "interactive step accepted"),
            Err(WizardError::Validation(errors)) => {
                writeln!(output, "Please correct the following:")?;
                write_errors(output, &errors)?;
                draft = Some(answers);
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(Outcome::Completed)
}

fn prompt<W: Write>(output: &mut W, spec: &FieldSpec, answers: &StepInput) -> io::Result<()> {
    let label = spec.field.label();
    let hint = describe_rule(&spec.rule);
    match answers.get(spec.field) {
        Some(current) => write!(output, "{label} ({hint}) [{}]: ", describe_raw(current))?,
        None => write!(output, "{label} ({hint}): ")?,
    }
    output.flush()
}

fn read_answer<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}
