use super::domain::ScenarioConfig;
use super::parameters::{CostTemplateSet, EpiParameters};
use serde::{Deserialize, Serialize};

/// One named share of the direct programme cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentCost {
    pub name: String,
    pub share: f64,
    pub amount_per_cohort: f64,
    pub amount_per_trainee_per_month: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub duration_months: f64,
    /// Template actually applied, if the tier offers one.
    pub template: Option<String>,
    /// Opportunity-cost rate applied to direct cost; 0 when excluded.
    pub opportunity_cost_rate: f64,
    pub direct_cost_per_cohort: f64,
    pub opportunity_cost_per_cohort: f64,
    pub total_economic_cost_per_cohort: f64,
    pub components: Vec<ComponentCost>,
}

impl CostBreakdown {
    pub fn component_total(&self) -> f64 {
        self.components
            .iter()
            .map(|component| component.amount_per_cohort)
            .sum()
    }
}

pub fn compute_costs(
    config: &ScenarioConfig,
    epi: &EpiParameters,
    templates: &CostTemplateSet,
) -> CostBreakdown {
    let duration_months = epi.duration_months(&config.tier);
    let trainees = f64::from(config.trainees_per_cohort);
    let direct_cost_per_cohort = config.monthly_cost() * trainees * duration_months;
    let trainee_months = duration_months * trainees;

    let resolved = templates.resolve(&config.tier, config.cost_template.as_deref());

    let opportunity_cost_rate = match resolved {
        Some((_, template)) if config.include_opportunity_cost => template.opportunity_cost_rate,
        _ => 0.0,
    };
    let opportunity_cost_per_cohort = direct_cost_per_cohort * opportunity_cost_rate;

    let components = resolved
        .map(|(_, template)| {
            template
                .components
                .iter()
                .map(|(name, share)| {
                    let amount_per_cohort = direct_cost_per_cohort * share;
                    let amount_per_trainee_per_month = if trainee_months > 0.0 {
                        amount_per_cohort / trainee_months
                    } else {
                        0.0
                    };
                    ComponentCost {
                        name: name.clone(),
                        share: *share,
                        amount_per_cohort,
                        amount_per_trainee_per_month,
                    }
                })
                .collect()
        })
        .unwrap_or_default();

    CostBreakdown {
        duration_months,
        template: resolved.map(|(name, _)| name.to_string()),
        opportunity_cost_rate,
        direct_cost_per_cohort,
        opportunity_cost_per_cohort,
        total_economic_cost_per_cohort: direct_cost_per_cohort + opportunity_cost_per_cohort,
        components,
    }
}
