use chrono::{DateTime, Utc};
use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::info;

use super::export::{write_csv, ExportError};
use super::repository::{ScenarioId, ScenarioRepository, SavedScenario, ScenarioStoreError};
use crate::appraisal::aggregate::RecommendationThresholds;
use crate::appraisal::domain::{MentorshipIntensity, ProgrammeTier, ScenarioConfig};
use crate::appraisal::engine::{AppraisalEngine, AppraisalResults};

static SCENARIO_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_scenario_id(now: DateTime<Utc>) -> ScenarioId {
    let sequence = SCENARIO_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ScenarioId(format!("SC{}-{sequence:03}", now.timestamp_millis()))
}

/// Short labels that make a saved scenario easy to spot in the list.
pub fn scenario_tags(
    config: &ScenarioConfig,
    results: &AppraisalResults,
    thresholds: &RecommendationThresholds,
) -> Vec<String> {
    let mut tags = Vec::new();
    if results
        .benefit_cost_ratio()
        .is_some_and(|bcr| bcr >= thresholds.attractive_bcr)
    {
        tags.push("Good value".to_string());
    }
    if results.endorse_probability() >= thresholds.attractive_endorsement {
        tags.push("High endorsement".to_string());
    }
    if config.tier == ProgrammeTier::Advanced {
        tags.push("Advanced".to_string());
    }
    if config.mentorship == MentorshipIntensity::High {
        tags.push("High mentorship".to_string());
    }
    tags
}

/// Input for saving the current configuration.
#[derive(Debug, Clone, Default)]
pub struct SaveScenario {
    pub name: Option<String>,
    pub notes: Option<String>,
    pub config: ScenarioConfig,
}

/// Outcome of re-evaluating a saved configuration with the live tables.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioRecheck {
    pub scenario: SavedScenario,
    pub current: AppraisalResults,
}

impl ScenarioRecheck {
    /// True when the live tables reproduce the saved results exactly.
    pub fn unchanged(&self) -> bool {
        self.scenario.results == self.current
    }
}

/// Service composing the evaluation engine and the scenario repository.
pub struct ScenarioService<R> {
    repository: Arc<R>,
    engine: AppraisalEngine,
}

impl<R> ScenarioService<R>
where
    R: ScenarioRepository + 'static,
{
    pub fn new(repository: Arc<R>, engine: AppraisalEngine) -> Self {
        Self { repository, engine }
    }

    pub fn engine(&self) -> &AppraisalEngine {
        &self.engine
    }

    /// Evaluates the configuration and stores the snapshot.
    pub fn save(&self, request: SaveScenario) -> Result<SavedScenario, ScenarioServiceError> {
        self.save_at(request, Utc::now())
    }

    pub(crate) fn save_at(
        &self,
        request: SaveScenario,
        saved_at: DateTime<Utc>,
    ) -> Result<SavedScenario, ScenarioServiceError> {
        let SaveScenario {
            name,
            notes,
            config,
        } = request;

        let results = self.engine.evaluate(&config);
        let tags = scenario_tags(&config, &results, &self.engine.parameters().thresholds);
        let name = name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| config.default_scenario_name());

        let scenario = SavedScenario {
            id: next_scenario_id(saved_at),
            name,
            tags,
            shortlisted: false,
            notes: notes.unwrap_or_default(),
            saved_at,
            config,
            results,
        };

        let stored = self.repository.insert(scenario)?;
        info!(id = %stored.id, name = stored.name.as_str(), "saved scenario");
        Ok(stored)
    }

    pub fn list(&self) -> Result<Vec<SavedScenario>, ScenarioServiceError> {
        Ok(self.repository.list()?)
    }

    pub fn get(&self, id: &ScenarioId) -> Result<SavedScenario, ScenarioServiceError> {
        let scenario = self
            .repository
            .fetch(id)?
            .ok_or(ScenarioStoreError::NotFound)?;
        Ok(scenario)
    }

    pub fn set_shortlisted(
        &self,
        id: &ScenarioId,
        shortlisted: bool,
    ) -> Result<SavedScenario, ScenarioServiceError> {
        let mut scenario = self.get(id)?;
        scenario.shortlisted = shortlisted;
        self.repository.update(scenario.clone())?;
        Ok(scenario)
    }

    pub fn remove(&self, id: &ScenarioId) -> Result<SavedScenario, ScenarioServiceError> {
        Ok(self.repository.remove(id)?)
    }

    /// Re-evaluates a saved configuration against the current tables.
    pub fn recheck(&self, id: &ScenarioId) -> Result<ScenarioRecheck, ScenarioServiceError> {
        let scenario = self.get(id)?;
        let current = self.engine.evaluate(&scenario.config);
        Ok(ScenarioRecheck { scenario, current })
    }

    /// Writes the scenario list as CSV; shortlisted-only when requested.
    pub fn export_csv<W: io::Write>(
        &self,
        writer: W,
        shortlisted_only: bool,
    ) -> Result<usize, ScenarioServiceError> {
        let scenarios: Vec<SavedScenario> = self
            .list()?
            .into_iter()
            .filter(|scenario| !shortlisted_only || scenario.shortlisted)
            .collect();
        write_csv(&scenarios, writer)?;
        Ok(scenarios.len())
    }
}

/// Error raised by the scenario service.
#[derive(Debug, thiserror::Error)]
pub enum ScenarioServiceError {
    #[error(transparent)]
    Store(#[from] ScenarioStoreError),
    #[error(transparent)]
    Export(#[from] ExportError),
}
