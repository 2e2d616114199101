use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use steps::appraisal::scenarios::{
    SavedScenario, ScenarioId, ScenarioRepository, ScenarioStoreError,
};
use steps::appraisal::AdvancedOverrides;
use steps::error::AppError;

/// Scenario list persisted as a pretty-printed JSON array.
pub(crate) struct JsonFileScenarioRepository {
    path: PathBuf,
    guard: Mutex<()>,
}

impl JsonFileScenarioRepository {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            guard: Mutex::new(()),
        }
    }

    fn read_all(&self) -> Result<Vec<SavedScenario>, ScenarioStoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(unavailable(&self.path, err)),
        };
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&raw).map_err(|err| unavailable(&self.path, err))
    }

    fn write_all(&self, scenarios: &[SavedScenario]) -> Result<(), ScenarioStoreError> {
        let body =
            serde_json::to_string_pretty(scenarios).map_err(|err| unavailable(&self.path, err))?;
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, body).map_err(|err| unavailable(&staging, err))?;
        fs::rename(&staging, &self.path).map_err(|err| unavailable(&self.path, err))
    }

    fn with_scenarios<T>(
        &self,
        apply: impl FnOnce(&mut Vec<SavedScenario>) -> Result<(T, bool), ScenarioStoreError>,
    ) -> Result<T, ScenarioStoreError> {
        let _lock = self
            .guard
            .lock()
            .map_err(|_| ScenarioStoreError::Unavailable("scenario file lock poisoned".into()))?;
        let mut scenarios = self.read_all()?;
        let (value, dirty) = apply(&mut scenarios)?;
        if dirty {
            self.write_all(&scenarios)?;
        }
        Ok(value)
    }
}

fn unavailable(path: &Path, err: impl std::fmt::Display) -> ScenarioStoreError {
    ScenarioStoreError::Unavailable(format!("{}: {err}", path.display()))
}

impl ScenarioRepository for JsonFileScenarioRepository {
    fn insert(&self, scenario: SavedScenario) -> Result<SavedScenario, ScenarioStoreError> {
        self.with_scenarios(|scenarios| {
            if scenarios.iter().any(|existing| existing.id == scenario.id) {
                return Err(ScenarioStoreError::Conflict);
            }
            scenarios.push(scenario.clone());
            Ok((scenario, true))
        })
    }

    fn list(&self) -> Result<Vec<SavedScenario>, ScenarioStoreError> {
        self.with_scenarios(|scenarios| Ok((scenarios.clone(), false)))
    }

    fn fetch(&self, id: &ScenarioId) -> Result<Option<SavedScenario>, ScenarioStoreError> {
        self.with_scenarios(|scenarios| {
            let found = scenarios.iter().find(|scenario| &scenario.id == id).cloned();
            Ok((found, false))
        })
    }

    fn update(&self, scenario: SavedScenario) -> Result<(), ScenarioStoreError> {
        self.with_scenarios(|scenarios| {
            let slot = scenarios
                .iter_mut()
                .find(|existing| existing.id == scenario.id)
                .ok_or(ScenarioStoreError::NotFound)?;
            *slot = scenario;
            Ok(((), true))
        })
    }

    fn remove(&self, id: &ScenarioId) -> Result<SavedScenario, ScenarioStoreError> {
        self.with_scenarios(|scenarios| {
            let index = scenarios
                .iter()
                .position(|scenario| &scenario.id == id)
                .ok_or(ScenarioStoreError::NotFound)?;
            Ok((scenarios.remove(index), true))
        })
    }
}

/// Reads an advanced overrides document; an absent path means no overrides.
pub(crate) fn load_overrides(path: Option<&Path>) -> Result<AdvancedOverrides, AppError> {
    let Some(path) = path else {
        return Ok(AdvancedOverrides::default());
    };
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}
