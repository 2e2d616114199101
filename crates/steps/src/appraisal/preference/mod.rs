//! Discrete-choice endorsement model.
//!
//! Endorsement is the probability that a stakeholder picks the configured
//! programme over the opt-out alternative in a binary logit.

pub mod coefficients;
mod wtp;

pub use wtp::{willingness_to_pay, WtpEntry};

use super::domain::{Attribute, PreferenceModelId, ScenarioConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

/// Monthly costs enter the utility in thousands of currency units.
pub const COST_UNIT_SCALE: f64 = 1_000.0;
/// Utility differences are clamped to this magnitude before exponentiation.
pub const UTILITY_CLAMP: f64 = 40.0;
pub const MIN_PROBABILITY: f64 = 1e-4;
pub const MAX_PROBABILITY: f64 = 1.0 - 1e-4;

/// Level effects for each attribute, keyed by canonical level key.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AttributeEffects {
    pub tier: BTreeMap<String, f64>,
    pub career: BTreeMap<String, f64>,
    pub mentorship: BTreeMap<String, f64>,
    pub delivery: BTreeMap<String, f64>,
    pub response: BTreeMap<String, f64>,
}

impl AttributeEffects {
    pub fn table(&self, attribute: Attribute) -> &BTreeMap<String, f64> {
        match attribute {
            Attribute::Tier => &self.tier,
            Attribute::Career => &self.career,
            Attribute::Mentorship => &self.mentorship,
            Attribute::Delivery => &self.delivery,
            Attribute::ResponseTime => &self.response,
        }
    }

    /// Total lookup: any level missing from the table has no effect.
    pub fn effect(&self, attribute: Attribute, level_key: &str) -> f64 {
        self.table(attribute)
            .get(level_key)
            .copied()
            .filter(|value| value.is_finite())
            .unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreferenceModel {
    pub id: PreferenceModelId,
    pub program_intercept: f64,
    pub opt_out_intercept: f64,
    pub effects: AttributeEffects,
    /// Utility per thousand currency units per trainee per month.
    pub cost_per_thousand: f64,
}

impl PreferenceModel {
    pub fn non_cost_utility(&self, config: &ScenarioConfig) -> f64 {
        Attribute::ordered()
            .into_iter()
            .fold(self.program_intercept, |acc, attribute| {
                acc + self.effects.effect(attribute, config.level_key(attribute))
            })
    }

    pub fn cost_utility(&self, monthly_cost: f64) -> f64 {
        self.cost_per_thousand * (monthly_cost / COST_UNIT_SCALE)
    }

    pub fn endorsement(&self, config: &ScenarioConfig) -> Endorsement {
        let non_cost_utility = self.non_cost_utility(config);
        let cost_utility = self.cost_utility(config.monthly_cost());
        let utility_delta = -self.opt_out_intercept + non_cost_utility + cost_utility;
        let endorse_probability = logistic(utility_delta);

        Endorsement {
            model: self.id.clone(),
            model_fallback: false,
            non_cost_utility,
            cost_utility,
            utility_delta,
            endorse_probability,
            opt_out_probability: 1.0 - endorse_probability,
        }
    }
}

/// Clamped logistic: never returns exactly 0 or 1.
pub fn logistic(delta: f64) -> f64 {
    let delta = if delta.is_nan() {
        0.0
    } else {
        delta.clamp(-UTILITY_CLAMP, UTILITY_CLAMP)
    };
    let probability = 1.0 / (1.0 + (-delta).exp());
    probability.clamp(MIN_PROBABILITY, MAX_PROBABILITY)
}

/// Result of the binary logit for one configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endorsement {
    /// Model actually used; differs from the requested one on fallback.
    pub model: PreferenceModelId,
    pub model_fallback: bool,
    pub non_cost_utility: f64,
    pub cost_utility: f64,
    pub utility_delta: f64,
    pub endorse_probability: f64,
    pub opt_out_probability: f64,
}

/// Named preference models. The primary model always exists and serves
/// configurations that name an unknown model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelCatalog {
    primary: PreferenceModel,
    others: Vec<PreferenceModel>,
}

impl Default for ModelCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ModelCatalog {
    pub fn builtin() -> Self {
        Self::new(
            coefficients::average_model(),
            vec![coefficients::supportive_model()],
        )
    }

    pub fn new(primary: PreferenceModel, others: Vec<PreferenceModel>) -> Self {
        Self { primary, others }
    }

    pub fn primary(&self) -> &PreferenceModel {
        &self.primary
    }

    pub fn models(&self) -> impl Iterator<Item = &PreferenceModel> {
        std::iter::once(&self.primary).chain(self.others.iter())
    }

    pub fn get(&self, id: &PreferenceModelId) -> Option<&PreferenceModel> {
        self.models().find(|model| &model.id == id)
    }

    /// Returns the requested model, or the primary model flagged as a fallback.
    pub fn resolve(&self, id: &PreferenceModelId) -> (&PreferenceModel, bool) {
        match self.get(id) {
            Some(model) => (model, false),
            None => {
                warn!(
                    requested = id.key(),
                    fallback = self.primary.id.key(),
                    "unknown preference model, using primary model"
                );
                (&self.primary, true)
            }
        }
    }
}

/// Endorsement for `config` under the model it names.
pub fn compute_endorsement(config: &ScenarioConfig, catalog: &ModelCatalog) -> Endorsement {
    let (model, model_fallback) = catalog.resolve(&config.model);
    let mut endorsement = model.endorsement(config);
    endorsement.model_fallback = model_fallback;
    endorsement
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appraisal::domain::{
        CareerIncentive, DeliveryMode, MentorshipIntensity, ProgrammeTier, ResponseTime,
    };

    fn close(a: f64, b: f64, tolerance: f64) -> bool {
        (a - b).abs() <= tolerance
    }

    #[test]
    fn reference_scenario_matches_hand_computation() {
        let catalog = ModelCatalog::builtin();
        let config = ScenarioConfig::default();

        let endorsement = compute_endorsement(&config, &catalog);

        assert!(close(endorsement.utility_delta, -0.481, 1e-9));
        assert!(close(endorsement.cost_utility, -1.25, 1e-12));
        assert!(close(endorsement.endorse_probability, 0.382, 5e-4));
        assert!(close(endorsement.opt_out_probability, 0.618, 5e-4));
        assert!(!endorsement.model_fallback);
    }

    #[test]
    fn unknown_levels_contribute_nothing() {
        let catalog = ModelCatalog::builtin();
        let baseline = compute_endorsement(&ScenarioConfig::default(), &catalog);
        let config = ScenarioConfig {
            career: CareerIncentive::parse("apprenticeship"),
            delivery: DeliveryMode::parse("hybrid-plus"),
            ..ScenarioConfig::default()
        };

        let endorsement = compute_endorsement(&config, &catalog);
        assert_eq!(endorsement.utility_delta, baseline.utility_delta);
    }

    #[test]
    fn unknown_model_falls_back_to_primary() {
        let catalog = ModelCatalog::builtin();
        let config = ScenarioConfig {
            model: PreferenceModelId::parse("probit"),
            ..ScenarioConfig::default()
        };

        let endorsement = compute_endorsement(&config, &catalog);
        assert!(endorsement.model_fallback);
        assert_eq!(endorsement.model, PreferenceModelId::Average);
    }

    #[test]
    fn logistic_is_clamped_at_extremes() {
        assert_eq!(logistic(1e6), MAX_PROBABILITY);
        assert_eq!(logistic(-1e6), MIN_PROBABILITY);
        assert_eq!(logistic(f64::NAN), 0.5);
        assert!(logistic(0.0) > 0.499 && logistic(0.0) < 0.501);
    }

    #[test]
    fn huge_costs_stay_inside_open_interval() {
        let catalog = ModelCatalog::builtin();
        let config = ScenarioConfig {
            cost_per_trainee_per_month: 1e12,
            ..ScenarioConfig::default()
        };
        let endorsement = compute_endorsement(&config, &catalog);
        assert!(endorsement.endorse_probability > 0.0);
        assert!(endorsement.endorse_probability < 1.0);
    }

    #[test]
    fn supportive_class_reacts_to_tier_and_response() {
        let catalog = ModelCatalog::builtin();
        let base = ScenarioConfig {
            model: PreferenceModelId::Supportive,
            ..ScenarioConfig::default()
        };
        let upgraded = ScenarioConfig {
            tier: ProgrammeTier::Advanced,
            mentorship: MentorshipIntensity::High,
            response: ResponseTime::Within7Days,
            ..base.clone()
        };

        let low = compute_endorsement(&base, &catalog).endorse_probability;
        let high = compute_endorsement(&upgraded, &catalog).endorse_probability;
        assert!(high > low);
    }
}
