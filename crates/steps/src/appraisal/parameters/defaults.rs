use super::{CostTemplate, CostTemplateSet, EpiParameters, TierParameters, TierTemplates};
use indexmap::IndexMap;
use std::collections::BTreeMap;

pub(super) const DEFAULT_EXCHANGE_RATE: f64 = 83.0;
pub(super) const DEFAULT_PLANNING_HORIZON_YEARS: f64 = 1.0;

const COMPONENT_NAMES: [&str; 6] = [
    "Staff and trainers",
    "Travel and per diem",
    "Training materials",
    "Supervision and mentorship",
    "Management and overheads",
    "Other",
];

fn tier(
    duration_months: f64,
    graduation_share: f64,
    outbreaks_per_cohort_per_year: f64,
    value_per_graduate: f64,
    value_per_outbreak_response: f64,
) -> TierParameters {
    TierParameters {
        duration_months,
        graduation_share,
        outbreaks_per_cohort_per_year,
        value_per_graduate,
        value_per_outbreak_response,
    }
}

pub(super) fn epi_parameters() -> EpiParameters {
    let mut tiers = BTreeMap::new();
    tiers.insert(
        "frontline".to_string(),
        tier(3.0, 0.90, 0.3, 300_000.0, 20_000_000.0),
    );
    tiers.insert(
        "intermediate".to_string(),
        tier(12.0, 0.92, 0.5, 500_000.0, 25_000_000.0),
    );
    tiers.insert(
        "advanced".to_string(),
        tier(24.0, 0.95, 0.8, 800_000.0, 30_000_000.0),
    );

    EpiParameters {
        tiers,
        planning_horizon_years: DEFAULT_PLANNING_HORIZON_YEARS,
        exchange_rate: DEFAULT_EXCHANGE_RATE,
    }
}

fn template(opportunity_cost_rate: f64, shares: [f64; 6]) -> CostTemplate {
    CostTemplate {
        opportunity_cost_rate,
        components: COMPONENT_NAMES
            .iter()
            .zip(shares)
            .map(|(name, share)| ((*name).to_string(), share))
            .collect(),
    }
}

pub(super) fn cost_templates() -> CostTemplateSet {
    let mut tiers = BTreeMap::new();
    tiers.insert(
        "frontline".to_string(),
        TierTemplates(IndexMap::from([(
            "WHO".to_string(),
            template(0.20, [0.45, 0.15, 0.10, 0.15, 0.10, 0.05]),
        )])),
    );
    tiers.insert(
        "intermediate".to_string(),
        TierTemplates(IndexMap::from([
            (
                "WHO".to_string(),
                template(0.20, [0.40, 0.18, 0.08, 0.18, 0.11, 0.05]),
            ),
            (
                "NIE".to_string(),
                template(0.18, [0.42, 0.14, 0.09, 0.20, 0.10, 0.05]),
            ),
            (
                "NCDC".to_string(),
                template(0.22, [0.38, 0.20, 0.08, 0.19, 0.10, 0.05]),
            ),
        ])),
    );
    tiers.insert(
        "advanced".to_string(),
        TierTemplates(IndexMap::from([
            (
                "NIE".to_string(),
                template(0.22, [0.44, 0.16, 0.07, 0.18, 0.10, 0.05]),
            ),
            (
                "NCDC".to_string(),
                template(0.25, [0.42, 0.17, 0.08, 0.18, 0.10, 0.05]),
            ),
        ])),
    );

    CostTemplateSet { tiers }
}
