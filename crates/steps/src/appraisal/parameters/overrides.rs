use super::EpiParameters;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

/// Per-tier values from the advanced settings form.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TierOverride {
    #[serde(default)]
    pub graduation_share: Option<f64>,
    #[serde(default)]
    pub outbreaks_per_cohort_per_year: Option<f64>,
    #[serde(default)]
    pub value_per_graduate: Option<f64>,
    #[serde(default)]
    pub value_per_outbreak_response: Option<f64>,
}

/// Advanced settings. A value is applied only when it is a finite, positive
/// number; anything else keeps the current value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AdvancedOverrides {
    #[serde(default)]
    pub exchange_rate: Option<f64>,
    #[serde(default)]
    pub planning_horizon_years: Option<f64>,
    #[serde(default)]
    pub tiers: BTreeMap<String, TierOverride>,
}

fn pick(candidate: Option<f64>, current: f64, field: &str) -> f64 {
    match candidate {
        Some(value) if value.is_finite() && value > 0.0 => value,
        Some(value) => {
            warn!(field, value, "ignoring non-positive override");
            current
        }
        None => current,
    }
}

impl AdvancedOverrides {
    pub fn is_empty(&self) -> bool {
        self.exchange_rate.is_none() && self.planning_horizon_years.is_none() && self.tiers.is_empty()
    }

    /// Produces a new parameter table; `base` is left untouched.
    pub fn apply(&self, base: &EpiParameters) -> EpiParameters {
        let mut next = base.clone();
        next.exchange_rate = pick(self.exchange_rate, base.exchange_rate, "exchange_rate");
        next.planning_horizon_years = pick(
            self.planning_horizon_years,
            base.planning_horizon_years,
            "planning_horizon_years",
        );

        for (tier, overrides) in &self.tiers {
            let Some(params) = next.tiers.get_mut(tier) else {
                warn!(tier = tier.as_str(), "ignoring overrides for unknown tier");
                continue;
            };
            params.graduation_share = pick(
                overrides.graduation_share,
                params.graduation_share,
                "graduation_share",
            )
            .min(1.0);
            params.outbreaks_per_cohort_per_year = pick(
                overrides.outbreaks_per_cohort_per_year,
                params.outbreaks_per_cohort_per_year,
                "outbreaks_per_cohort_per_year",
            );
            params.value_per_graduate = pick(
                overrides.value_per_graduate,
                params.value_per_graduate,
                "value_per_graduate",
            );
            params.value_per_outbreak_response = pick(
                overrides.value_per_outbreak_response,
                params.value_per_outbreak_response,
                "value_per_outbreak_response",
            );
        }

        next
    }
}
