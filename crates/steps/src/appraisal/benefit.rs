use super::domain::ScenarioConfig;
use super::parameters::EpiParameters;
use serde::{Deserialize, Serialize};

/// Epidemiological outputs and their monetised value.
///
/// Benefit is annual: the outbreak term counts one year of responses and is
/// not multiplied by the planning horizon. A cohort without trainees responds
/// to no outbreaks. All values stay unrounded here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpiBenefit {
    pub graduates_per_cohort: f64,
    pub graduates_all_cohorts: f64,
    pub outbreak_responses_per_cohort_per_year: f64,
    pub outbreak_responses_per_year_all_cohorts: f64,
    pub benefit_per_cohort: f64,
    pub total_benefit_all_cohorts: f64,
}

impl EpiBenefit {
    /// Graduates rounded to whole people for display.
    pub fn graduates_display(&self) -> u64 {
        let rounded = self.graduates_all_cohorts.round();
        if rounded.is_finite() && rounded > 0.0 {
            rounded as u64
        } else {
            0
        }
    }

    /// Outbreak responses per year rounded to one decimal for display.
    pub fn outbreak_responses_display(&self) -> f64 {
        let value = (self.outbreak_responses_per_year_all_cohorts * 10.0).round() / 10.0;
        if value.is_finite() {
            value
        } else {
            0.0
        }
    }
}

pub fn compute_epi_and_benefit(
    config: &ScenarioConfig,
    epi: &EpiParameters,
    endorse_probability: f64,
) -> EpiBenefit {
    let cohorts = f64::from(config.cohorts);
    let trainees = f64::from(config.trainees_per_cohort);

    let Some(tier) = epi.tier(&config.tier) else {
        return EpiBenefit {
            graduates_per_cohort: 0.0,
            graduates_all_cohorts: 0.0,
            outbreak_responses_per_cohort_per_year: 0.0,
            outbreak_responses_per_year_all_cohorts: 0.0,
            benefit_per_cohort: 0.0,
            total_benefit_all_cohorts: 0.0,
        };
    };

    let graduates_per_cohort = trainees * tier.graduation_share * endorse_probability;
    let outbreak_responses_per_cohort_per_year = if config.trainees_per_cohort == 0 {
        0.0
    } else {
        tier.outbreaks_per_cohort_per_year * endorse_probability
    };
    let benefit_per_cohort = graduates_per_cohort * tier.value_per_graduate
        + outbreak_responses_per_cohort_per_year * tier.value_per_outbreak_response;

    EpiBenefit {
        graduates_per_cohort,
        graduates_all_cohorts: graduates_per_cohort * cohorts,
        outbreak_responses_per_cohort_per_year,
        outbreak_responses_per_year_all_cohorts: outbreak_responses_per_cohort_per_year * cohorts,
        benefit_per_cohort,
        total_benefit_all_cohorts: benefit_per_cohort * cohorts,
    }
}
