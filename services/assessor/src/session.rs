use crate::cli::SessionArgs;
use heartcare::assessment::{AssessmentPreset, AssessmentWizard, ScoringEngine, ScoringPolicy};
use heartcare::config::AppConfig;
use heartcare::error::AppError;
use tracing::{debug, info};

/// A wizard ready to take answers, plus how its result should be printed.
pub(crate) struct Session {
    pub(crate) wizard: AssessmentWizard,
    pub(crate) preset: AssessmentPreset,
    pub(crate) json: bool,
}

/// Apply command line overrides to the loaded configuration and build the wizard.
pub(crate) fn prepare(mut config: AppConfig, args: SessionArgs) -> Result<Session, AppError> {
    let SessionArgs {
        preset,
        policy,
        json,
    } = args;

    if let Some(preset) = preset {
        config.assessment.preset = preset;
    }
    if let Some(path) = policy {
        config.assessment.policy_path = Some(path);
    }

    let preset = config.assessment.preset;
    let policy = match &config.assessment.policy_path {
        Some(path) => {
            debug!(path = %path.display(), "loading custom scoring policy");
            ScoringPolicy::from_path(path)?
        }
        None => preset.scoring_policy(),
    };
    let engine = ScoringEngine::new(policy)?;

    info!(
        ?config.environment,
        %preset,
        policy = %engine.policy().name,
        max_score = engine.policy().max_score(),
        "assessment session ready"
    );

    Ok(Session {
        wizard: AssessmentWizard::new(preset.blueprint(), engine),
        preset,
        json,
    })
}
