use super::{PreferenceModel, COST_UNIT_SCALE};
use crate::appraisal::domain::{
    Attribute, CareerIncentive, DeliveryMode, MentorshipIntensity, ProgrammeTier, ResponseTime,
};
use serde::Serialize;

/// Willingness to pay for moving an attribute from its reference level.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WtpEntry {
    pub attribute: Attribute,
    pub attribute_label: &'static str,
    pub level_key: String,
    pub level_label: String,
    pub coefficient: f64,
    /// Native currency per trainee per month.
    pub value_per_trainee_per_month: f64,
}

fn non_reference_levels(attribute: Attribute) -> Vec<(String, String)> {
    fn pairs<T, K: Fn(&T) -> (String, String)>(levels: Vec<T>, describe: K) -> Vec<(String, String)> {
        levels.iter().skip(1).map(describe).collect()
    }

    match attribute {
        Attribute::Tier => pairs(ProgrammeTier::ordered(), |level| {
            (level.key().to_string(), level.label().to_string())
        }),
        Attribute::Career => pairs(CareerIncentive::ordered(), |level| {
            (level.key().to_string(), level.label().to_string())
        }),
        Attribute::Mentorship => pairs(MentorshipIntensity::ordered(), |level| {
            (level.key().to_string(), level.label().to_string())
        }),
        Attribute::Delivery => pairs(DeliveryMode::ordered(), |level| {
            (level.key().to_string(), level.label().to_string())
        }),
        Attribute::ResponseTime => pairs(ResponseTime::ordered(), |level| {
            (level.key().to_string(), level.label().to_string())
        }),
    }
}

/// WTP table for every non-reference level. Empty when the model has no
/// cost sensitivity, since the ratio is undefined.
pub fn willingness_to_pay(model: &PreferenceModel) -> Vec<WtpEntry> {
    let cost = model.cost_per_thousand;
    if cost == 0.0 || !cost.is_finite() {
        return Vec::new();
    }

    Attribute::ordered()
        .into_iter()
        .flat_map(|attribute| {
            non_reference_levels(attribute)
                .into_iter()
                .map(move |(level_key, level_label)| {
                    let coefficient = model.effects.effect(attribute, &level_key);
                    WtpEntry {
                        attribute,
                        attribute_label: attribute.label(),
                        value_per_trainee_per_month: -coefficient / cost * COST_UNIT_SCALE,
                        level_key,
                        level_label,
                        coefficient,
                    }
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appraisal::preference::coefficients::{average_model, supportive_model};

    #[test]
    fn average_model_values_mentorship_in_currency() {
        let table = willingness_to_pay(&average_model());
        assert_eq!(table.len(), 10);

        let high = table
            .iter()
            .find(|entry| entry.attribute == Attribute::Mentorship && entry.level_key == "high")
            .expect("high mentorship row");
        assert!((high.value_per_trainee_per_month - 128_000.0).abs() < 1e-6);

        let online = table
            .iter()
            .find(|entry| entry.level_key == "online")
            .expect("online row");
        assert!(online.value_per_trainee_per_month < 0.0);
    }

    #[test]
    fn flat_cost_model_produces_empty_table() {
        let mut model = supportive_model();
        model.cost_per_thousand = 0.0;
        assert!(willingness_to_pay(&model).is_empty());
    }
}
