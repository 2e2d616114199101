use std::sync::Arc;

use crate::appraisal::domain::{
    DeliveryMode, MentorshipIntensity, ProgrammeTier, ResponseTime, ScenarioConfig,
};
use crate::appraisal::scenarios::{
    InMemoryScenarioRepository, SavedScenario, ScenarioId, ScenarioRepository, ScenarioService,
    ScenarioStoreError,
};
use crate::appraisal::{AppraisalEngine, ParameterSet};

pub(super) fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected} +/- {tolerance}, got {actual}"
    );
}

pub(super) fn reference_config() -> ScenarioConfig {
    ScenarioConfig::default()
}

/// Cheap, intensive frontline design that clears both attractive thresholds.
pub(super) fn strong_config() -> ScenarioConfig {
    ScenarioConfig {
        tier: ProgrammeTier::Frontline,
        mentorship: MentorshipIntensity::High,
        delivery: DeliveryMode::Blended,
        response: ResponseTime::Within7Days,
        cost_per_trainee_per_month: 20_000.0,
        ..ScenarioConfig::default()
    }
}

pub(super) fn engine() -> AppraisalEngine {
    AppraisalEngine::new(Arc::new(ParameterSet::builtin()))
}

pub(super) fn build_service() -> (
    ScenarioService<InMemoryScenarioRepository>,
    Arc<InMemoryScenarioRepository>,
) {
    let repository = Arc::new(InMemoryScenarioRepository::default());
    let service = ScenarioService::new(repository.clone(), engine());
    (service, repository)
}

pub(super) struct UnavailableRepository;

impl ScenarioRepository for UnavailableRepository {
    fn insert(&self, _scenario: SavedScenario) -> Result<SavedScenario, ScenarioStoreError> {
        Err(ScenarioStoreError::Unavailable("store offline".to_string()))
    }

    fn list(&self) -> Result<Vec<SavedScenario>, ScenarioStoreError> {
        Err(ScenarioStoreError::Unavailable("store offline".to_string()))
    }

    fn fetch(&self, _id: &ScenarioId) -> Result<Option<SavedScenario>, ScenarioStoreError> {
        Err(ScenarioStoreError::Unavailable("store offline".to_string()))
    }

    fn update(&self, _scenario: SavedScenario) -> Result<(), ScenarioStoreError> {
        Err(ScenarioStoreError::Unavailable("store offline".to_string()))
    }

    fn remove(&self, _id: &ScenarioId) -> Result<SavedScenario, ScenarioStoreError> {
        Err(ScenarioStoreError::Unavailable("store offline".to_string()))
    }
}
