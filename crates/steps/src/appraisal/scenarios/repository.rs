use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Mutex};

use crate::appraisal::domain::ScenarioConfig;
use crate::appraisal::engine::AppraisalResults;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScenarioId(pub String);

impl fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Snapshot of a configuration and the results it produced when saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedScenario {
    pub id: ScenarioId,
    pub name: String,
    pub tags: Vec<String>,
    #[serde(default)]
    pub shortlisted: bool,
    #[serde(default)]
    pub notes: String,
    pub saved_at: DateTime<Utc>,
    pub config: ScenarioConfig,
    pub results: AppraisalResults,
}

/// Storage abstraction for the scenario list.
pub trait ScenarioRepository: Send + Sync {
    fn insert(&self, scenario: SavedScenario) -> Result<SavedScenario, ScenarioStoreError>;
    fn list(&self) -> Result<Vec<SavedScenario>, ScenarioStoreError>;
    fn fetch(&self, id: &ScenarioId) -> Result<Option<SavedScenario>, ScenarioStoreError>;
    fn update(&self, scenario: SavedScenario) -> Result<(), ScenarioStoreError>;
    fn remove(&self, id: &ScenarioId) -> Result<SavedScenario, ScenarioStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ScenarioStoreError {
    #[error("scenario already exists")]
    Conflict,
    #[error("scenario not found")]
    NotFound,
    #[error("scenario store unavailable: {0}")]
    Unavailable(String),
}

/// Ordered, in-process scenario list.
#[derive(Debug, Default, Clone)]
pub struct InMemoryScenarioRepository {
    scenarios: Arc<Mutex<Vec<SavedScenario>>>,
}

impl InMemoryScenarioRepository {
    pub fn with_scenarios(scenarios: Vec<SavedScenario>) -> Self {
        Self {
            scenarios: Arc::new(Mutex::new(scenarios)),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<SavedScenario>>, ScenarioStoreError> {
        self.scenarios
            .lock()
            .map_err(|_| ScenarioStoreError::Unavailable("scenario list lock poisoned".to_string()))
    }
}

impl ScenarioRepository for InMemoryScenarioRepository {
    fn insert(&self, scenario: SavedScenario) -> Result<SavedScenario, ScenarioStoreError> {
        let mut guard = self.lock()?;
        if guard.iter().any(|existing| existing.id == scenario.id) {
            return Err(ScenarioStoreError::Conflict);
        }
        guard.push(scenario.clone());
        Ok(scenario)
    }

    fn list(&self) -> Result<Vec<SavedScenario>, ScenarioStoreError> {
        Ok(self.lock()?.clone())
    }

    fn fetch(&self, id: &ScenarioId) -> Result<Option<SavedScenario>, ScenarioStoreError> {
        Ok(self.lock()?.iter().find(|scenario| &scenario.id == id).cloned())
    }

    fn update(&self, scenario: SavedScenario) -> Result<(), ScenarioStoreError> {
        let mut guard = self.lock()?;
        let slot = guard
            .iter_mut()
            .find(|existing| existing.id == scenario.id)
            .ok_or(ScenarioStoreError::NotFound)?;
        *slot = scenario;
        Ok(())
    }

    fn remove(&self, id: &ScenarioId) -> Result<SavedScenario, ScenarioStoreError> {
        let mut guard = self.lock()?;
        let index = guard
            .iter()
            .position(|scenario| &scenario.id == id)
            .ok_or(ScenarioStoreError::NotFound)?;
        Ok(guard.remove(index))
    }
}
