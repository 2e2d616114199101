use super::{AttributeEffects, PreferenceModel};
use crate::appraisal::domain::PreferenceModelId;

fn levels(entries: &[(&str, f64)]) -> std::collections::BTreeMap<String, f64> {
    entries
        .iter()
        .map(|(key, value)| ((*key).to_string(), *value))
        .collect()
}

/// Mixed logit estimates for the full stakeholder sample.
pub fn average_model() -> PreferenceModel {
    PreferenceModel {
        id: PreferenceModelId::Average,
        program_intercept: 0.168,
        opt_out_intercept: -0.601,
        effects: AttributeEffects {
            tier: levels(&[("frontline", 0.0), ("intermediate", 0.220), ("advanced", 0.487)]),
            career: levels(&[("certificate", 0.0), ("uniqual", 0.017), ("career_path", -0.122)]),
            mentorship: levels(&[("low", 0.0), ("medium", 0.453), ("high", 0.640)]),
            delivery: levels(&[("blended", 0.0), ("inperson", -0.232), ("online", -1.073)]),
            response: levels(&[("30", 0.0), ("15", 0.546), ("7", 0.610)]),
        },
        cost_per_thousand: -0.005,
    }
}

/// Second latent class: supportive stakeholders with a flatter cost response.
/// Career and delivery levels were not significant in this class and are 0.
pub fn supportive_model() -> PreferenceModel {
    PreferenceModel {
        id: PreferenceModelId::Supportive,
        program_intercept: 0.098,
        opt_out_intercept: -2.543,
        effects: AttributeEffects {
            tier: levels(&[("frontline", 0.0), ("intermediate", 0.0), ("advanced", 0.422)]),
            career: levels(&[("certificate", 0.0), ("uniqual", 0.0), ("career_path", 0.0)]),
            mentorship: levels(&[("low", 0.0), ("medium", 0.342), ("high", 0.486)]),
            delivery: levels(&[("blended", 0.0), ("inperson", 0.0), ("online", 0.0)]),
            response: levels(&[("30", 0.0), ("15", 0.317), ("7", 0.504)]),
        },
        cost_per_thousand: -0.001,
    }
}
