use serde::Serialize;
use std::io;

use super::repository::SavedScenario;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("csv export failed: {0}")]
    Io(#[from] io::Error),
}

/// Whole rupees stay integral; anything else keeps two decimals.
fn plain_amount(value: f64) -> String {
    if !value.is_finite() {
        "n/a".to_string()
    } else if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

#[derive(Debug, Serialize)]
struct ScenarioRow<'a> {
    id: &'a str,
    name: &'a str,
    tags: String,
    shortlisted: bool,
    programme_tier: &'a str,
    career_incentive: &'a str,
    mentorship: &'a str,
    delivery: &'a str,
    response_time: &'a str,
    cohorts: u32,
    trainees: u32,
    cost_per_trainee_per_month: String,
    preference_model: &'a str,
    endorsement_pct: String,
    bcr: String,
    total_cost: String,
    total_benefit: String,
    notes: &'a str,
}

impl<'a> ScenarioRow<'a> {
    fn from_scenario(scenario: &'a SavedScenario) -> Self {
        let config = &scenario.config;
        let results = &scenario.results;
        Self {
            id: &scenario.id.0,
            name: &scenario.name,
            tags: scenario.tags.join(", "),
            shortlisted: scenario.shortlisted,
            programme_tier: config.tier.label(),
            career_incentive: config.career.label(),
            mentorship: config.mentorship.label(),
            delivery: config.delivery.label(),
            response_time: config.response.label(),
            cohorts: config.cohorts,
            trainees: config.trainees_per_cohort,
            cost_per_trainee_per_month: plain_amount(config.monthly_cost()),
            preference_model: results.endorsement.model.label(),
            endorsement_pct: format!("{:.1}", results.endorse_probability() * 100.0),
            bcr: results
                .benefit_cost_ratio()
                .map(|bcr| format!("{bcr:.2}"))
                .unwrap_or_else(|| "n/a".to_string()),
            total_cost: plain_amount(results.summary.total_cost_all_cohorts),
            total_benefit: plain_amount(results.summary.total_benefit_all_cohorts),
            notes: &scenario.notes,
        }
    }
}

/// Serializes scenarios, one row each, with a header row.
pub fn write_csv<W: io::Write>(scenarios: &[SavedScenario], writer: W) -> Result<(), ExportError> {
    let mut csv_writer = csv::WriterBuilder::new().has_headers(true).from_writer(writer);
    if scenarios.is_empty() {
        csv_writer.write_record(EMPTY_HEADER)?;
    }
    for scenario in scenarios {
        csv_writer.serialize(ScenarioRow::from_scenario(scenario))?;
    }
    csv_writer.flush()?;
    Ok(())
}

const EMPTY_HEADER: [&str; 18] = [
    "id",
    "name",
    "tags",
    "shortlisted",
    "programme_tier",
    "career_incentive",
    "mentorship",
    "delivery",
    "response_time",
    "cohorts",
    "trainees",
    "cost_per_trainee_per_month",
    "preference_model",
    "endorsement_pct",
    "bcr",
    "total_cost",
    "total_benefit",
    "notes",
];
