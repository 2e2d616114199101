//! Parameter tables consumed by the appraisal pipeline.
//!
//! Tables are plain values. Callers that need to change them build a new
//! [`ParameterSet`] and swap it in whole.

mod defaults;
mod document;
mod overrides;

pub use document::{load_cost_templates, load_epi_parameters, ParameterLoadError};
pub use overrides::{AdvancedOverrides, TierOverride};

use super::aggregate::RecommendationThresholds;
use super::domain::ProgrammeTier;
use super::preference::ModelCatalog;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Epidemiological and programme parameters for one tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierParameters {
    pub duration_months: f64,
    #[serde(rename = "gradRate")]
    pub graduation_share: f64,
    pub outbreaks_per_cohort_per_year: f64,
    pub value_per_graduate: f64,
    #[serde(rename = "valuePerOutbreak")]
    pub value_per_outbreak_response: f64,
}

impl TierParameters {
    fn validate(&self, tier: &str) -> Result<(), ParameterLoadError> {
        let fields = [
            ("durationMonths", self.duration_months),
            ("gradRate", self.graduation_share),
            ("outbreaksPerCohortPerYear", self.outbreaks_per_cohort_per_year),
            ("valuePerGraduate", self.value_per_graduate),
            ("valuePerOutbreak", self.value_per_outbreak_response),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(ParameterLoadError::Invalid(format!(
                    "tiers.{tier}.{field} must be a non-negative number"
                )));
            }
        }
        if self.graduation_share > 1.0 {
            return Err(ParameterLoadError::Invalid(format!(
                "tiers.{tier}.gradRate must not exceed 1"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpiParameters {
    pub tiers: BTreeMap<String, TierParameters>,
    /// Carried for reporting; the benefit formula is annual.
    pub planning_horizon_years: f64,
    /// Native currency units per display (converted) unit.
    pub exchange_rate: f64,
}

impl Default for EpiParameters {
    fn default() -> Self {
        defaults::epi_parameters()
    }
}

impl EpiParameters {
    pub fn tier(&self, tier: &ProgrammeTier) -> Option<&TierParameters> {
        self.tiers.get(tier.key())
    }

    /// Programme duration for `tier`; unknown tiers run for zero months.
    pub fn duration_months(&self, tier: &ProgrammeTier) -> f64 {
        self.tier(tier)
            .map(|params| params.duration_months)
            .unwrap_or(0.0)
    }

    pub(crate) fn validate(&self) -> Result<(), ParameterLoadError> {
        if self.tiers.is_empty() {
            return Err(ParameterLoadError::Invalid(
                "at least one tier is required".to_string(),
            ));
        }
        for (tier, params) in &self.tiers {
            params.validate(tier)?;
        }
        if !self.exchange_rate.is_finite() || self.exchange_rate <= 0.0 {
            return Err(ParameterLoadError::Invalid(
                "exchange rate must be positive".to_string(),
            ));
        }
        if !self.planning_horizon_years.is_finite() || self.planning_horizon_years < 0.0 {
            return Err(ParameterLoadError::Invalid(
                "planning horizon must be non-negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Opportunity-cost rate and ordered component shares of direct cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostTemplate {
    #[serde(rename = "opportunityCostShare", default)]
    pub opportunity_cost_rate: f64,
    #[serde(default)]
    pub components: IndexMap<String, f64>,
}

impl CostTemplate {
    pub fn declared_share(&self) -> f64 {
        self.components.values().sum()
    }

    fn validate(&self, tier: &str, name: &str) -> Result<(), ParameterLoadError> {
        let shares = self
            .components
            .values()
            .copied()
            .chain(std::iter::once(self.opportunity_cost_rate));
        for share in shares {
            if !share.is_finite() || share < 0.0 {
                return Err(ParameterLoadError::Invalid(format!(
                    "costTemplates.{tier}.{name} contains a negative or non-numeric share"
                )));
            }
        }
        Ok(())
    }
}

/// Named cost templates for one tier, in document order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TierTemplates(pub IndexMap<String, CostTemplate>);

impl TierTemplates {
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn get(&self, name: &str) -> Option<&CostTemplate> {
        self.0.get(name)
    }

    pub fn first(&self) -> Option<(&str, &CostTemplate)> {
        self.0
            .first()
            .map(|(name, template)| (name.as_str(), template))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CostTemplate)> {
        self.0
            .iter()
            .map(|(name, template)| (name.as_str(), template))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CostTemplateSet {
    pub tiers: BTreeMap<String, TierTemplates>,
}

impl Default for CostTemplateSet {
    fn default() -> Self {
        defaults::cost_templates()
    }
}

impl CostTemplateSet {
    pub fn for_tier(&self, tier: &ProgrammeTier) -> Option<&TierTemplates> {
        self.tiers.get(tier.key())
    }

    pub fn template_names(&self, tier: &ProgrammeTier) -> Vec<String> {
        self.for_tier(tier)
            .map(|templates| templates.names().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Picks the named template, or the tier's first template when no name is
    /// given. A name that the tier does not offer resolves to nothing.
    pub fn resolve<'a>(
        &'a self,
        tier: &ProgrammeTier,
        name: Option<&str>,
    ) -> Option<(&'a str, &'a CostTemplate)> {
        let templates = self.for_tier(tier)?;
        match name {
            Some(name) => templates
                .iter()
                .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name.trim())),
            None => templates.first(),
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ParameterLoadError> {
        if self.tiers.is_empty() {
            return Err(ParameterLoadError::Invalid(
                "no cost templates defined".to_string(),
            ));
        }
        for (tier, templates) in &self.tiers {
            for (name, template) in templates.iter() {
                template.validate(tier, name)?;
            }
        }
        Ok(())
    }
}

/// Everything an evaluation reads besides the scenario itself.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParameterSet {
    pub models: ModelCatalog,
    pub epi: EpiParameters,
    pub cost_templates: CostTemplateSet,
    pub thresholds: RecommendationThresholds,
}

impl ParameterSet {
    pub fn builtin() -> Self {
        Self::default()
    }

    pub fn with_epi(self, epi: EpiParameters) -> Self {
        Self { epi, ..self }
    }

    pub fn with_cost_templates(self, cost_templates: CostTemplateSet) -> Self {
        Self {
            cost_templates,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_tables_cover_every_tier() {
        let params = ParameterSet::builtin();
        for tier in ProgrammeTier::ordered() {
            assert!(params.epi.tier(&tier).is_some(), "missing epi for {tier}");
            assert!(
                !params.cost_templates.template_names(&tier).is_empty(),
                "missing templates for {tier}"
            );
        }
        assert!(params.epi.validate().is_ok());
        assert!(params.cost_templates.validate().is_ok());
    }

    #[test]
    fn resolve_defaults_to_first_template_in_document_order() {
        let templates = CostTemplateSet::default();
        let (name, template) = templates
            .resolve(&ProgrammeTier::Intermediate, None)
            .expect("intermediate has templates");
        assert_eq!(name, "WHO");
        assert_eq!(template.opportunity_cost_rate, 0.2);
        assert_eq!(
            templates.template_names(&ProgrammeTier::Intermediate),
            vec!["WHO", "NIE", "NCDC"]
        );
    }

    #[test]
    fn resolve_rejects_template_missing_from_tier() {
        let templates = CostTemplateSet::default();
        assert!(templates
            .resolve(&ProgrammeTier::Advanced, Some("WHO"))
            .is_none());
        assert!(templates
            .resolve(&ProgrammeTier::Advanced, Some("ncdc"))
            .is_some());
        assert!(templates
            .resolve(&ProgrammeTier::parse("regional"), None)
            .is_none());
    }

    #[test]
    fn template_documents_keep_key_order() {
        let templates: TierTemplates = serde_json::from_str(
            r#"{
                "NCDC": { "opportunityCostShare": 0.1, "components": { "Staff": 0.5, "Travel": 0.2 } },
                "WHO": { "opportunityCostShare": 0.2 },
                "NCDC": { "opportunityCostShare": 0.3, "components": { "Travel": 0.4, "Staff": 0.6 } }
            }"#,
        )
        .expect("parses");

        assert_eq!(templates.names().collect::<Vec<_>>(), vec!["NCDC", "WHO"]);
        let (name, template) = templates.first().expect("first template");
        assert_eq!(name, "NCDC");
        assert_eq!(template.opportunity_cost_rate, 0.3);
        assert_eq!(
            template.components.keys().collect::<Vec<_>>(),
            vec!["Travel", "Staff"]
        );
        assert!(templates.get("WHO").is_some_and(|who| who.components.is_empty()));

        let encoded = serde_json::to_string(&templates).expect("serializes");
        assert!(encoded.starts_with(r#"{"NCDC":{"#));
    }

    #[test]
    fn unknown_tier_has_zero_duration() {
        let epi = EpiParameters::default();
        assert_eq!(epi.duration_months(&ProgrammeTier::parse("regional")), 0.0);
        assert_eq!(epi.duration_months(&ProgrammeTier::Advanced), 24.0);
    }
}
