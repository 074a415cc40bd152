use serde::Serialize;
use tracing::{debug, info};

use super::blueprint::{AssessmentBlueprint, AssessmentPreset, IncompleteRecord, StepDefinition};
use super::domain::PatientRecord;
use super::scoring::{PolicyError, RiskResult, ScoringEngine, ScoringPolicy};
use super::validation::{validate_step, StepErrors, StepInput};

/// Position of the wizard: on a step, or done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "index", rename_all = "snake_case")]
pub enum WizardState {
    Step(usize),
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Done,
    Current,
    Upcoming,
}

/// Entry of the numbered header shown above the active step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepProgress {
    pub number: usize,
    pub id: &'static str,
    pub title: &'static str,
    pub status: StepStatus,
}

#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error(transparent)]
    Validation(#[from] StepErrors),
    #[error("assessment is already complete")]
    AlreadyComplete,
    #[error(transparent)]
    Incomplete(#[from] IncompleteRecord),
}

/// Controller owning the step index, the answers collected so far and, once
/// the last step succeeds, the derived result.
#[derive(Debug, Clone)]
pub struct AssessmentWizard {
    blueprint: AssessmentBlueprint,
    engine: ScoringEngine,
    state: WizardState,
    record: PatientRecord,
    result: Option<RiskResult>,
}

impl AssessmentWizard {
    pub fn new(blueprint: AssessmentBlueprint, engine: ScoringEngine) -> Self {
        Self {
            blueprint,
            engine,
            state: WizardState::Step(0),
            record: PatientRecord::new(),
            result: None,
        }
    }

    pub fn for_preset(preset: AssessmentPreset) -> Result<Self, PolicyError> {
        let engine = ScoringEngine::new(preset.scoring_policy())?;
        Ok(Self::new(preset.blueprint(), engine))
    }

    pub fn blueprint(&self) -> &AssessmentBlueprint {
        &self.blueprint
    }

    pub fn policy(&self) -> &ScoringPolicy {
        self.engine.policy()
    }

    pub fn state(&self) -> WizardState {
        self.state
    }

    pub fn is_complete(&self) -> bool {
        self.state == WizardState::Complete
    }

    pub fn current_index(&self) -> Option<usize> {
        match self.state {
            WizardState::Step(index) => Some(index),
            WizardState::Complete => None,
        }
    }

    pub fn current_step(&self) -> Option<&StepDefinition> {
        self.current_index()
            .and_then(|index| self.blueprint.step(index))
    }

    pub fn record(&self) -> &PatientRecord {
        &self.record
    }

    pub fn result(&self) -> Option<&RiskResult> {
        self.result.as_ref()
    }

    /// Answers already given for the current step, in raw form.
    pub fn prefill(&self) -> StepInput {
        self.current_step()
            .map(|step| StepInput::prefill(step, &self.record))
            .unwrap_or_default()
    }

    pub fn progress(&self) -> Vec<StepProgress> {
        let current = self.current_index().unwrap_or(self.blueprint.len());
        self.blueprint
            .steps()
            .iter()
            .enumerate()
            .map(|(index, step)| StepProgress {
                number: index + 1,
                id: step.id,
                title: step.title,
                status: match index.cmp(&current) {
                    std::cmp::Ordering::Less => StepStatus::Done,
                    std::cmp::Ordering::Equal => StepStatus::Current,
                    std::cmp::Ordering::Greater => StepStatus::Upcoming,
                },
            })
            .collect()
    }

    /// Validate the current step's input and advance on success. On failure the
    /// wizard is left untouched.
    pub fn submit(&mut self, input: &StepInput) -> Result<WizardState, WizardError> {
        let step = self.current_step().ok_or(WizardError::AlreadyComplete)?;
        let fragment = validate_step(step, input)?;
        self.advance(fragment)
    }

    /// Merge an already validated fragment and move forward. Leaving the last
    /// step requires every required answer to be present; the result is scored then.
    pub fn advance(&mut self, fragment: PatientRecord) -> Result<WizardState, WizardError> {
        let WizardState::Step(index) = self.state else {
            return Err(WizardError::AlreadyComplete);
        };

        self.record.merge(fragment);

        if index + 1 < self.blueprint.len() {
            self.state = WizardState::Step(index + 1);
            debug!(from = index, to = index + 1, "assessment step advanced");
            return Ok(self.state);
        }

        let complete = self.blueprint.finalize(&self.record)?;
        let result = self.engine.score(&complete);
        info!(
            policy = %self.engine.policy().name,
            raw_score = result.raw_score,
            max_score = result.max_score,
            risk_level = result.risk_level.label(),
            "assessment complete"
        );

        self.result = Some(result);
        self.state = WizardState::Complete;
        Ok(self.state)
    }

    /// Step back one page; no-op on the first step and once complete.
    pub fn retreat(&mut self) -> WizardState {
        if let WizardState::Step(index) = self.state {
            if index > 0 {
                self.state = WizardState::Step(index - 1);
                debug!(from = index, to = index - 1, "assessment step retreated");
            }
        }
        self.state
    }

    /// Start over with an empty record.
    pub fn reset(&mut self) {
        self.state = WizardState::Step(0);
        self.record = PatientRecord::new();
        self.result = None;
    }
}
