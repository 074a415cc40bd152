use std::env;
use std::fmt;
use std::path::PathBuf;

use crate::assessment::AssessmentPreset;

/// Distinguishes runtime behavior for different stages of the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub assessment: AssessmentConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let preset_name = env::var("HEARTCARE_PRESET").unwrap_or_else(|_| "stroke".to_string());
        let preset = preset_name
            .parse::<AssessmentPreset>()
            .map_err(|_| ConfigError::UnknownPreset(preset_name.clone()))?;

        let policy_path = env::var("HEARTCARE_POLICY_PATH")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "warn".to_string());

        Ok(Self {
            environment,
            assessment: AssessmentConfig {
                preset,
                policy_path,
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Which questionnaire runs and which rule table scores it.
#[derive(Debug, Clone)]
pub struct AssessmentConfig {
    pub preset: AssessmentPreset,
    /// JSON scoring policy replacing the preset's rule table.
    pub policy_path: Option<PathBuf>,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    UnknownPreset(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::UnknownPreset(value) => write!(
                f,
                "HEARTCARE_PRESET must be 'stroke' or 'cardio' (found '{}')",
                value
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env_guard;
    use std::env;

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("HEARTCARE_PRESET");
        env::remove_var("HEARTCARE_POLICY_PATH");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.assessment.preset, AssessmentPreset::Stroke);
        assert!(config.assessment.policy_path.is_none());
        assert_eq!(config.telemetry.log_level, "warn");
    }

    #[test]
    fn selects_cardio_preset_and_policy_path() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ENV", "ci");
        env::set_var("HEARTCARE_PRESET", "Cardio");
        env::set_var("HEARTCARE_POLICY_PATH", "/etc/heartcare/policy.json");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.environment, AppEnvironment::Test);
        assert_eq!(config.assessment.preset, AssessmentPreset::Cardio);
        assert_eq!(
            config.assessment.policy_path,
            Some(PathBuf::from("/etc/heartcare/policy.json"))
        );
        reset_env();
    }

    #[test]
    fn rejects_unknown_preset() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("HEARTCARE_PRESET", "diabetes");
        match AppConfig::load() {
            Err(ConfigError::UnknownPreset(value)) => assert_eq!(value, "diabetes"),
            other => panic!("expected unknown preset error, got {other:?}"),
        }
        reset_env();
    }
}
