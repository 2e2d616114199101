use super::defaults::{DEFAULT_EXCHANGE_RATE, DEFAULT_PLANNING_HORIZON_YEARS};
use super::{CostTemplateSet, EpiParameters, TierParameters};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Reasons an external parameter document was not applied.
#[derive(Debug, thiserror::Error)]
pub enum ParameterLoadError {
    #[error("unable to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed parameter document: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("invalid parameter document: {0}")]
    Invalid(String),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EpiDocument {
    #[serde(default)]
    display: Option<DisplayDocument>,
    #[serde(default)]
    planning_horizon_years: Option<f64>,
    tiers: BTreeMap<String, TierParameters>,
}

#[derive(Debug, Deserialize)]
struct DisplayDocument {
    #[serde(rename = "inrPerUSD", alias = "exchangeRate", default)]
    inr_per_usd: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CostTemplateDocument {
    #[serde(rename_all = "camelCase")]
    Embedded { cost_templates: CostTemplateSet },
    Bare(CostTemplateSet),
}

impl EpiParameters {
    /// Parses an epidemiological parameter document. Values the document
    /// leaves out (exchange rate, horizon) take their built-in defaults.
    pub fn from_json_str(raw: &str) -> Result<Self, ParameterLoadError> {
        let document: EpiDocument = serde_json::from_str(raw)?;
        let params = EpiParameters {
            tiers: document.tiers,
            planning_horizon_years: document
                .planning_horizon_years
                .unwrap_or(DEFAULT_PLANNING_HORIZON_YEARS),
            exchange_rate: document
                .display
                .and_then(|display| display.inr_per_usd)
                .unwrap_or(DEFAULT_EXCHANGE_RATE),
        };
        params.validate()?;
        Ok(params)
    }
}

impl CostTemplateSet {
    /// Accepts the bare per-tier map or the same map under `costTemplates`.
    pub fn from_json_str(raw: &str) -> Result<Self, ParameterLoadError> {
        let templates = match serde_json::from_str(raw)? {
            CostTemplateDocument::Embedded { cost_templates } => cost_templates,
            CostTemplateDocument::Bare(templates) => templates,
        };
        templates.validate()?;
        Ok(templates)
    }
}

fn read_document(path: &Path) -> Result<String, ParameterLoadError> {
    fs::read_to_string(path).map_err(|source| ParameterLoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads epidemiological parameters, falling back to the built-in table when
/// the document is absent or unusable.
pub fn load_epi_parameters(path: Option<&Path>) -> EpiParameters {
    let Some(path) = path else {
        return EpiParameters::default();
    };

    match read_document(path).and_then(|raw| EpiParameters::from_json_str(&raw)) {
        Ok(params) => {
            info!(path = %path.display(), tiers = params.tiers.len(), "loaded epidemiological parameters");
            params
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "using built-in epidemiological parameters");
            EpiParameters::default()
        }
    }
}

/// Loads cost templates with the same fallback rule as [`load_epi_parameters`].
pub fn load_cost_templates(path: Option<&Path>) -> CostTemplateSet {
    let Some(path) = path else {
        return CostTemplateSet::default();
    };

    match read_document(path).and_then(|raw| CostTemplateSet::from_json_str(&raw)) {
        Ok(templates) => {
            info!(path = %path.display(), tiers = templates.tiers.len(), "loaded cost templates");
            templates
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "using built-in cost templates");
            CostTemplateSet::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appraisal::domain::ProgrammeTier;

    const EPI_DOCUMENT: &str = r#"{
        "display": { "inrPerUSD": 84.5 },
        "tiers": {
            "frontline": {
                "durationMonths": 3,
                "gradRate": 0.8,
                "outbreaksPerCohortPerYear": 0.4,
                "valuePerGraduate": 350000,
                "valuePerOutbreak": 21000000
            }
        }
    }"#;

    #[test]
    fn epi_document_uses_original_field_names() {
        let params = EpiParameters::from_json_str(EPI_DOCUMENT).expect("document parses");
        assert_eq!(params.exchange_rate, 84.5);
        assert_eq!(params.planning_horizon_years, 1.0);
        let frontline = params
            .tier(&ProgrammeTier::Frontline)
            .expect("frontline present");
        assert_eq!(frontline.graduation_share, 0.8);
        assert_eq!(frontline.value_per_outbreak_response, 21_000_000.0);
        assert!(params.tier(&ProgrammeTier::Advanced).is_none());
    }

    #[test]
    fn epi_document_rejects_out_of_range_values() {
        let raw = EPI_DOCUMENT.replace("\"gradRate\": 0.8", "\"gradRate\": 1.4");
        assert!(matches!(
            EpiParameters::from_json_str(&raw),
            Err(ParameterLoadError::Invalid(_))
        ));
    }

    #[test]
    fn cost_templates_accept_embedded_and_bare_forms() {
        let bare = r#"{
            "frontline": {
                "Ministry": {
                    "opportunityCostShare": 0.1,
                    "components": { "Staff": 0.7, "Travel": 0.3 }
                }
            }
        }"#;
        let embedded = format!(r#"{{ "display": {{}}, "costTemplates": {bare} }}"#);

        let from_bare = CostTemplateSet::from_json_str(bare).expect("bare parses");
        let from_embedded = CostTemplateSet::from_json_str(&embedded).expect("embedded parses");
        assert_eq!(from_bare, from_embedded);

        let (name, template) = from_bare
            .resolve(&ProgrammeTier::Frontline, None)
            .expect("template present");
        assert_eq!(name, "Ministry");
        assert_eq!(
            template.components.get_index(0).map(|(name, _)| name.as_str()),
            Some("Staff")
        );
    }

    #[test]
    fn missing_or_malformed_documents_fall_back_to_builtins() {
        let dir = tempfile::tempdir().expect("temp dir");
        let missing = dir.path().join("absent.json");
        assert_eq!(load_epi_parameters(Some(&missing)), EpiParameters::default());

        let malformed = dir.path().join("broken.json");
        fs::write(&malformed, "{ not json").expect("write fixture");
        assert_eq!(load_epi_parameters(Some(&malformed)), EpiParameters::default());
        assert_eq!(
            load_cost_templates(Some(&malformed)),
            CostTemplateSet::default()
        );
        assert_eq!(load_cost_templates(None), CostTemplateSet::default());
    }
}
