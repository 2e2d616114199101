use super::currency::{format_count, format_percent, format_ratio, MoneyFormatter};
use crate::appraisal::domain::ScenarioConfig;
use crate::appraisal::engine::AppraisalResults;
use serde::Serialize;

/// Headline figures as shown on the results panel.
#[derive(Debug, Clone, Serialize)]
pub struct ResultsSummaryView {
    pub model_label: String,
    pub model_fallback: bool,
    pub endorsement: String,
    pub opt_out: String,
    pub total_cost_per_cohort: String,
    pub benefit_per_cohort: String,
    pub net_benefit_per_cohort: String,
    pub benefit_cost_ratio: String,
    pub graduates_all_cohorts: String,
    pub outbreak_responses_per_year: String,
    pub recommendation: &'static str,
    pub headline: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct CostComponentView {
    pub name: String,
    pub share: String,
    pub amount_per_cohort: String,
    pub amount_per_trainee_per_month: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CostBreakdownView {
    pub template: String,
    pub duration_months: f64,
    pub opportunity_cost_share: String,
    pub programme_cost_per_cohort: String,
    pub opportunity_cost_per_cohort: String,
    pub economic_cost_per_cohort: String,
    pub components: Vec<CostComponentView>,
}

/// Totals scaled across every cohort.
#[derive(Debug, Clone, Serialize)]
pub struct NationalView {
    pub cohorts: u32,
    pub total_cost: String,
    pub total_benefit: String,
    pub net_benefit: String,
    pub benefit_cost_ratio: String,
    pub graduates: String,
    pub outbreak_responses_per_year: String,
}

impl ResultsSummaryView {
    pub fn build(results: &AppraisalResults, money: &MoneyFormatter) -> Self {
        let endorsement = &results.endorsement;
        Self {
            model_label: endorsement.model.label().to_string(),
            model_fallback: endorsement.model_fallback,
            endorsement: format_percent(endorsement.endorse_probability),
            opt_out: format_percent(endorsement.opt_out_probability),
            total_cost_per_cohort: money.format(results.costs.total_economic_cost_per_cohort),
            benefit_per_cohort: money.format(results.epi.benefit_per_cohort),
            net_benefit_per_cohort: money.format(results.summary.net_benefit_per_cohort),
            benefit_cost_ratio: format_ratio(results.summary.benefit_cost_ratio),
            graduates_all_cohorts: format_count(results.epi.graduates_display()),
            outbreak_responses_per_year: format!("{:.1}", results.epi.outbreak_responses_display()),
            recommendation: results.recommendation.label(),
            headline: results.recommendation.headline(),
        }
    }
}

impl CostBreakdownView {
    pub fn build(results: &AppraisalResults, money: &MoneyFormatter) -> Self {
        let costs = &results.costs;
        Self {
            template: costs.template.clone().unwrap_or_else(|| "-".to_string()),
            duration_months: costs.duration_months,
            opportunity_cost_share: format!("{:.0} %", costs.opportunity_cost_rate * 100.0),
            programme_cost_per_cohort: money.format(costs.direct_cost_per_cohort),
            opportunity_cost_per_cohort: money.format(costs.opportunity_cost_per_cohort),
            economic_cost_per_cohort: money.format(costs.total_economic_cost_per_cohort),
            components: costs
                .components
                .iter()
                .map(|component| CostComponentView {
                    name: component.name.clone(),
                    share: format!("{:.1} %", component.share * 100.0),
                    amount_per_cohort: money.format(component.amount_per_cohort),
                    amount_per_trainee_per_month: money
                        .format(component.amount_per_trainee_per_month),
                })
                .collect(),
        }
    }
}

impl NationalView {
    pub fn build(
        config: &ScenarioConfig,
        results: &AppraisalResults,
        money: &MoneyFormatter,
    ) -> Self {
        let summary = &results.summary;
        Self {
            cohorts: config.cohorts,
            total_cost: money.format(summary.total_cost_all_cohorts),
            total_benefit: money.format(summary.total_benefit_all_cohorts),
            net_benefit: money.format(summary.total_net_benefit_all_cohorts),
            benefit_cost_ratio: format_ratio(summary.benefit_cost_ratio),
            graduates: format_count(results.epi.graduates_display()),
            outbreak_responses_per_year: format!("{:.1}", results.epi.outbreak_responses_display()),
        }
    }
}
