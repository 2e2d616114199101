mod recommendation;

pub use recommendation::{classify, Recommendation, RecommendationThresholds};

use super::benefit::EpiBenefit;
use super::costing::CostBreakdown;
use serde::{Deserialize, Serialize};

/// Combined cost/benefit figures per cohort and nationally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregate {
    pub net_benefit_per_cohort: f64,
    /// `None` when total cost is zero; shown as "n/a".
    pub benefit_cost_ratio: Option<f64>,
    pub total_cost_all_cohorts: f64,
    pub total_benefit_all_cohorts: f64,
    pub total_net_benefit_all_cohorts: f64,
}

pub fn benefit_cost_ratio(total_benefit: f64, total_cost: f64) -> Option<f64> {
    if total_cost <= 0.0 || !total_cost.is_finite() {
        return None;
    }
    let ratio = total_benefit / total_cost;
    ratio.is_finite().then_some(ratio)
}

pub fn aggregate(costs: &CostBreakdown, benefit: &EpiBenefit, cohorts: u32) -> Aggregate {
    let cohorts = f64::from(cohorts);
    let net_benefit_per_cohort = benefit.benefit_per_cohort - costs.total_economic_cost_per_cohort;
    let total_cost_all_cohorts = costs.total_economic_cost_per_cohort * cohorts;
    let total_benefit_all_cohorts = benefit.benefit_per_cohort * cohorts;

    Aggregate {
        net_benefit_per_cohort,
        benefit_cost_ratio: benefit_cost_ratio(total_benefit_all_cohorts, total_cost_all_cohorts),
        total_cost_all_cohorts,
        total_benefit_all_cohorts,
        total_net_benefit_all_cohorts: net_benefit_per_cohort * cohorts,
    }
}
