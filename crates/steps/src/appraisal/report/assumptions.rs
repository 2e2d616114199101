use super::currency::{format_count, CurrencyMode, MoneyFormatter};
use crate::appraisal::domain::{ProgrammeTier, ScenarioConfig};
use crate::appraisal::parameters::{EpiParameters, TierParameters};
use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt::Write;

fn tier_rows<F>(epi: &EpiParameters, out: &mut String, heading: &str, value: F)
where
    F: Fn(&TierParameters) -> String,
{
    writeln!(out, "{heading}:").expect("write table heading");
    for tier in ProgrammeTier::ordered() {
        let rendered = epi
            .tier(&tier)
            .map(&value)
            .unwrap_or_else(|| "-".to_string());
        writeln!(out, "  {:<14}{}", format!("{}:", capitalize(tier.key())), rendered)
            .expect("write tier row");
    }
    out.push('\n');
}

fn capitalize(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// Plain-text record of every assumption behind the current results.
pub fn assumption_log(
    epi: &EpiParameters,
    config: &ScenarioConfig,
    currency: CurrencyMode,
    generated_at: DateTime<Utc>,
) -> String {
    let native = MoneyFormatter::new(CurrencyMode::Inr, epi.exchange_rate);
    let mut out = String::new();

    writeln!(
        &mut out,
        "STEPS assumption log - {}\n",
        generated_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    )
    .expect("write log heading");
    writeln!(&mut out, "Exchange rate (INR per USD): {}", epi.exchange_rate)
        .expect("write exchange rate");
    writeln!(&mut out, "Currency display mode:       {}", currency.code())
        .expect("write currency mode");
    writeln!(
        &mut out,
        "Planning horizon (years):    {} (benefits are annual and not discounted)\n",
        epi.planning_horizon_years
    )
    .expect("write planning horizon");

    tier_rows(epi, &mut out, "Programme duration (months)", |t| {
        format!("{}", t.duration_months)
    });
    tier_rows(epi, &mut out, "Graduates per cohort (share)", |t| {
        format!("{:.2}", t.graduation_share)
    });
    tier_rows(epi, &mut out, "Outbreak responses per cohort per year", |t| {
        format!("{}", t.outbreaks_per_cohort_per_year)
    });
    tier_rows(epi, &mut out, "Value per graduate (INR)", |t| {
        format_count(t.value_per_graduate.max(0.0).round() as u64)
    });
    tier_rows(epi, &mut out, "Value per outbreak response (INR)", |t| {
        format_count(t.value_per_outbreak_response.max(0.0).round() as u64)
    });

    let rows = [
        ("Programme tier", config.tier.label().to_string()),
        ("Career incentive", config.career.label().to_string()),
        ("Mentorship intensity", config.mentorship.label().to_string()),
        ("Delivery mode", config.delivery.label().to_string()),
        ("Expected response time", config.response.label().to_string()),
        ("Preference model", config.model.label().to_string()),
        ("Trainees per cohort", config.trainees_per_cohort.to_string()),
        ("Number of cohorts", config.cohorts.to_string()),
        (
            "Cost per trainee per month",
            native.format(config.monthly_cost()),
        ),
        (
            "Include opportunity cost",
            if config.include_opportunity_cost { "Yes" } else { "No" }.to_string(),
        ),
        (
            "Cost template",
            config
                .cost_template
                .clone()
                .unwrap_or_else(|| "tier default".to_string()),
        ),
    ];

    out.push_str("Current configuration snapshot:\n");
    for (label, value) in rows {
        writeln!(&mut out, "  {:<28}{}", format!("{label}:"), value)
            .expect("write configuration row");
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn log_lists_tier_parameters_and_configuration() {
        let stamp = Utc
            .with_ymd_and_hms(2025, 3, 1, 9, 30, 0)
            .single()
            .expect("valid timestamp");
        let log = assumption_log(
            &EpiParameters::default(),
            &ScenarioConfig::default(),
            CurrencyMode::Usd,
            stamp,
        );

        assert!(log.starts_with("STEPS assumption log - 2025-03-01T09:30:00Z"));
        assert!(log.contains("Currency display mode:       USD"));
        assert!(log.contains("Frontline:    0.90"));
        assert!(log.contains("2,00,00,000"));
        assert!(log.contains("Preference model:           Average mixed logit"));
        assert!(log.contains("Cost per trainee per month: ₹2,50,000"));
    }
}
