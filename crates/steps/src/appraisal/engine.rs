use super::aggregate::{aggregate, classify, Aggregate, Recommendation};
use super::benefit::{compute_epi_and_benefit, EpiBenefit};
use super::costing::{compute_costs, CostBreakdown};
use super::domain::ScenarioConfig;
use super::parameters::ParameterSet;
use super::preference::{compute_endorsement, Endorsement};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Everything derived from one configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppraisalResults {
    pub endorsement: Endorsement,
    pub costs: CostBreakdown,
    pub epi: EpiBenefit,
    pub summary: Aggregate,
    pub recommendation: Recommendation,
}

impl AppraisalResults {
    pub fn endorse_probability(&self) -> f64 {
        self.endorsement.endorse_probability
    }

    pub fn benefit_cost_ratio(&self) -> Option<f64> {
        self.summary.benefit_cost_ratio
    }
}

/// Runs the full pipeline: endorsement, costs, benefit, aggregation.
pub fn evaluate(config: &ScenarioConfig, parameters: &ParameterSet) -> AppraisalResults {
    let endorsement = compute_endorsement(config, &parameters.models);
    let costs = compute_costs(config, &parameters.epi, &parameters.cost_templates);
    let epi = compute_epi_and_benefit(config, &parameters.epi, endorsement.endorse_probability);
    let summary = aggregate(&costs, &epi, config.cohorts);
    let recommendation = classify(
        summary.benefit_cost_ratio,
        endorsement.endorse_probability,
        &parameters.thresholds,
    );

    debug!(
        tier = config.tier.key(),
        model = endorsement.model.key(),
        endorse = endorsement.endorse_probability,
        bcr = ?summary.benefit_cost_ratio,
        "evaluated scenario"
    );

    AppraisalResults {
        endorsement,
        costs,
        epi,
        summary,
        recommendation,
    }
}

/// Stateless evaluator bound to one parameter set.
#[derive(Debug, Clone)]
pub struct AppraisalEngine {
    parameters: Arc<ParameterSet>,
}

impl AppraisalEngine {
    pub fn new(parameters: Arc<ParameterSet>) -> Self {
        Self { parameters }
    }

    pub fn parameters(&self) -> &Arc<ParameterSet> {
        &self.parameters
    }

    pub fn evaluate(&self, config: &ScenarioConfig) -> AppraisalResults {
        evaluate(config, &self.parameters)
    }
}

impl Default for AppraisalEngine {
    fn default() -> Self {
        Self::new(Arc::new(ParameterSet::builtin()))
    }
}
