use super::domain::ScenarioConfig;
use super::engine::{AppraisalEngine, AppraisalResults};
use super::parameters::{AdvancedOverrides, ParameterSet};
use std::sync::Arc;
use tracing::info;

/// Current configuration, live parameter tables and the last results.
///
/// Parameter tables are only ever replaced whole, so an evaluation always
/// reads one consistent set.
#[derive(Debug, Default)]
pub struct AppraisalSession {
    engine: AppraisalEngine,
    current: Option<(ScenarioConfig, AppraisalResults)>,
}

impl AppraisalSession {
    pub fn new(parameters: ParameterSet) -> Self {
        Self {
            engine: AppraisalEngine::new(Arc::new(parameters)),
            current: None,
        }
    }

    pub fn parameters(&self) -> &ParameterSet {
        self.engine.parameters()
    }

    pub fn evaluate(&mut self, config: ScenarioConfig) -> &AppraisalResults {
        let results = self.engine.evaluate(&config);
        &self.current.insert((config, results)).1
    }

    pub fn current_config(&self) -> Option<&ScenarioConfig> {
        self.current.as_ref().map(|(config, _)| config)
    }

    pub fn last_results(&self) -> Option<&AppraisalResults> {
        self.current.as_ref().map(|(_, results)| results)
    }

    /// Swaps in a new parameter set and recomputes the current configuration.
    pub fn replace_parameters(&mut self, parameters: ParameterSet) {
        self.engine = AppraisalEngine::new(Arc::new(parameters));
        if let Some((config, results)) = self.current.as_mut() {
            *results = self.engine.evaluate(config);
        }
    }

    pub fn apply_overrides(&mut self, overrides: &AdvancedOverrides) {
        if overrides.is_empty() {
            return;
        }
        let current = self.parameters();
        let next = ParameterSet {
            epi: overrides.apply(&current.epi),
            ..current.clone()
        };
        info!(exchange_rate = next.epi.exchange_rate, "applied advanced overrides");
        self.replace_parameters(next);
    }
}
