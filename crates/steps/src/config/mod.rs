use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::appraisal::parameters::{load_cost_templates, load_epi_parameters};
use crate::appraisal::report::{CurrencyMode, UnknownCurrency};
use crate::appraisal::ParameterSet;

const DEFAULT_SCENARIO_STORE: &str = "steps_scenarios.json";

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

/// Top-level configuration for the calculator.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub telemetry: TelemetryConfig,
    pub parameters: ParameterSources,
    pub scenarios: ScenarioStoreConfig,
    pub display: DisplayConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let parameters = ParameterSources {
            epi_config: optional_path("STEPS_EPI_CONFIG"),
            cost_templates: optional_path("STEPS_COST_TEMPLATES"),
        };

        let store_path = optional_path("STEPS_SCENARIO_STORE")
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SCENARIO_STORE));

        let currency = match env::var("STEPS_CURRENCY") {
            Ok(value) if !value.trim().is_empty() => value
                .parse::<CurrencyMode>()
                .map_err(|source| ConfigError::InvalidCurrency { source })?,
            _ => CurrencyMode::default(),
        };

        Ok(Self {
            environment,
            telemetry: TelemetryConfig { log_level },
            parameters,
            scenarios: ScenarioStoreConfig { path: store_path },
            display: DisplayConfig { currency },
        })
    }
}

fn optional_path(key: &str) -> Option<PathBuf> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// Optional external parameter documents. Missing entries use built-in tables.
#[derive(Debug, Clone, Default)]
pub struct ParameterSources {
    pub epi_config: Option<PathBuf>,
    pub cost_templates: Option<PathBuf>,
}

impl ParameterSources {
    /// Builds the parameter set, falling back per document on any load error.
    pub fn load(&self) -> ParameterSet {
        ParameterSet::builtin()
            .with_epi(load_epi_parameters(self.epi_config.as_deref()))
            .with_cost_templates(load_cost_templates(self.cost_templates.as_deref()))
    }
}

/// Location of the saved scenario list.
#[derive(Debug, Clone)]
pub struct ScenarioStoreConfig {
    pub path: PathBuf,
}

impl ScenarioStoreConfig {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Presentation defaults.
#[derive(Debug, Clone, Copy)]
pub struct DisplayConfig {
    pub currency: CurrencyMode,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidCurrency { source: UnknownCurrency },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidCurrency { source } => {
                write!(f, "STEPS_CURRENCY must be INR or USD: {source}")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidCurrency { source } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("STEPS_EPI_CONFIG");
        env::remove_var("STEPS_COST_TEMPLATES");
        env::remove_var("STEPS_SCENARIO_STORE");
        env::remove_var("STEPS_CURRENCY");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.telemetry.log_level, "info");
        assert!(config.parameters.epi_config.is_none());
        assert_eq!(config.scenarios.path(), Path::new("steps_scenarios.json"));
        assert_eq!(config.display.currency, CurrencyMode::Inr);
    }

    #[test]
    fn reads_paths_and_currency() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ENV", "ci");
        env::set_var("STEPS_EPI_CONFIG", " /tmp/epi.json ");
        env::set_var("STEPS_CURRENCY", "usd");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.environment, AppEnvironment::Test);
        assert_eq!(
            config.parameters.epi_config.as_deref(),
            Some(Path::new("/tmp/epi.json"))
        );
        assert_eq!(config.display.currency, CurrencyMode::Usd);
        reset_env();
    }

    #[test]
    fn rejects_unknown_currency() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("STEPS_CURRENCY", "eur");
        match AppConfig::load() {
            Err(ConfigError::InvalidCurrency { source }) => assert_eq!(source.0, "eur"),
            other => panic!("expected invalid currency, got {other:?}"),
        }
        reset_env();
    }

    #[test]
    fn missing_documents_fall_back_to_builtin_tables() {
        let sources = ParameterSources {
            epi_config: Some(PathBuf::from("/nonexistent/steps/epi.json")),
            cost_templates: None,
        };
        assert_eq!(sources.load(), ParameterSet::builtin());
    }
}
