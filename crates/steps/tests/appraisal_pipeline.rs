use steps::appraisal::domain::{
    CareerIncentive, DeliveryMode, MentorshipIntensity, PreferenceModelId, ProgrammeTier,
    ResponseTime,
};
use steps::appraisal::report::{
    format_percent, format_ratio, CostBreakdownView, CurrencyMode, MoneyFormatter, NationalView,
    ResultsSummaryView,
};
use steps::appraisal::{
    willingness_to_pay, AdvancedOverrides, AppraisalSession, Attribute, ParameterSet,
    Recommendation, ScenarioConfig, TierOverride,
};
use std::collections::BTreeMap;

fn scale_up_design() -> ScenarioConfig {
    ScenarioConfig {
        tier: ProgrammeTier::parse("Intermediate"),
        career: CareerIncentive::parse("university qualification"),
        mentorship: MentorshipIntensity::parse("medium"),
        delivery: DeliveryMode::parse("in-person"),
        response: ResponseTime::parse("15"),
        cost_per_trainee_per_month: 120_000.0,
        trainees_per_cohort: 25,
        cohorts: 4,
        model: PreferenceModelId::parse("mxl"),
        cost_template: Some("who".to_string()),
        include_opportunity_cost: true,
    }
}

#[test]
fn free_text_levels_resolve_to_canonical_keys() {
    let config = scale_up_design();
    assert_eq!(config.tier, ProgrammeTier::Intermediate);
    assert_eq!(config.level_key(Attribute::Career), "uniqual");
    assert_eq!(config.level_key(Attribute::Delivery), "inperson");
    assert_eq!(config.model, PreferenceModelId::Average);
}

#[test]
fn session_reports_consistent_national_totals() {
    let mut session = AppraisalSession::new(ParameterSet::builtin());
    let config = scale_up_design();
    let results = session.evaluate(config.clone()).clone();

    assert_eq!(results.costs.duration_months, 12.0);
    assert_eq!(results.costs.template.as_deref(), Some("WHO"));
    assert_eq!(results.costs.direct_cost_per_cohort, 36_000_000.0);
    let component_total = results.costs.component_total();
    assert!((component_total - results.costs.direct_cost_per_cohort).abs() < 1e-3);

    let money = MoneyFormatter::new(CurrencyMode::Inr, session.parameters().epi.exchange_rate);
    let national = NationalView::build(&config, &results, &money);
    let summary = ResultsSummaryView::build(&results, &money);
    let breakdown = CostBreakdownView::build(&results, &money);

    assert_eq!(summary.endorsement, format_percent(results.endorse_probability()));
    assert_eq!(summary.benefit_cost_ratio, format_ratio(results.benefit_cost_ratio()));
    assert_eq!(breakdown.components.len(), 6);
    assert_eq!(national.cohorts, 4);
    assert!(national.total_cost.starts_with('₹'));
}

#[test]
fn overrides_flow_into_benefit_but_not_endorsement() {
    let mut session = AppraisalSession::default();
    let before = session.evaluate(scale_up_design()).clone();

    let mut tiers = BTreeMap::new();
    tiers.insert(
        "intermediate".to_string(),
        TierOverride {
            graduation_share: Some(3.0),
            value_per_outbreak_response: Some(-1.0),
            ..TierOverride::default()
        },
    );
    session.apply_overrides(&AdvancedOverrides {
        exchange_rate: Some(90.0),
        tiers,
        ..AdvancedOverrides::default()
    });

    let epi = &session.parameters().epi;
    let intermediate = epi
        .tier(&ProgrammeTier::Intermediate)
        .expect("intermediate tier");
    assert_eq!(intermediate.graduation_share, 1.0);
    assert_eq!(intermediate.value_per_outbreak_response, 25_000_000.0);
    assert_eq!(epi.exchange_rate, 90.0);

    let after = session.last_results().expect("recomputed");
    assert_eq!(after.endorsement, before.endorsement);
    assert!(after.epi.graduates_per_cohort > before.epi.graduates_per_cohort);
}

#[test]
fn willingness_to_pay_lists_non_reference_levels() {
    let params = ParameterSet::builtin();
    let rows = willingness_to_pay(params.models.primary());

    assert_eq!(rows.len(), 10);
    let online = rows
        .iter()
        .find(|row| row.attribute == Attribute::Delivery && row.level_key == "online")
        .expect("online delivery row");
    assert!((online.value_per_trainee_per_month + 214_600.0).abs() < 1e-6);
}

#[test]
fn cheap_intensive_design_is_recommended() {
    let mut session = AppraisalSession::default();
    let results = session.evaluate(ScenarioConfig {
        mentorship: MentorshipIntensity::High,
        response: ResponseTime::Within7Days,
        cost_per_trainee_per_month: 20_000.0,
        ..ScenarioConfig::default()
    });
    assert_eq!(results.recommendation, Recommendation::Attractive);
}
