use crate::answers::run_score;
use crate::demo::{run_demo, run_presets};
use crate::interactive::run_assess;
use clap::{Args, Parser, Subcommand};
use heartcare::assessment::AssessmentPreset;
use heartcare::config::AppConfig;
use heartcare::error::AppError;
use heartcare::telemetry;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "HeartCare",
    about = "Step through a heart-health questionnaire and score the answers",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Answer the questionnaire step by step (default command)
    Assess(AssessArgs),
    /// Score a JSON answer sheet without prompting
    Score(ScoreArgs),
    /// List the built-in questionnaires and their scoring weights
    Presets,
    /// Score three reference profiles, one per risk tier
    Demo,
}

/// Options shared by every command that runs a questionnaire.
#[derive(Args, Debug, Default, Clone)]
pub(crate) struct SessionArgs {
    /// Override the configured questionnaire preset (stroke or cardio)
    #[arg(long)]
    pub(crate) preset: Option<AssessmentPreset>,
    /// Override the configured JSON scoring policy
    #[arg(long)]
    pub(crate) policy: Option<PathBuf>,
    /// Print the result as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct AssessArgs {
    #[command(flatten)]
    pub(crate) session: SessionArgs,
}

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// JSON object mapping field keys (e.g. "age", "systolicBP") to answers
    #[arg(long)]
    pub(crate) answers: PathBuf,
    #[command(flatten)]
    pub(crate) session: SessionArgs,
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let command = cli
        .command
        .unwrap_or_else(|| Command::Assess(AssessArgs::default()));

    match command {
        Command::Assess(args) => run_assess(config, args),
        Command::Score(args) => run_score(config, args),
        Command::Presets => run_presets(),
        Command::Demo => run_demo(),
    }
}
