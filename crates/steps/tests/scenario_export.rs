use std::sync::Arc;

use steps::appraisal::domain::{MentorshipIntensity, ProgrammeTier};
use steps::appraisal::scenarios::{InMemoryScenarioRepository, SaveScenario, ScenarioService};
use steps::appraisal::{AppraisalEngine, ScenarioConfig};

const HEADER: &str = "id,name,tags,shortlisted,programme_tier,career_incentive,mentorship,\
delivery,response_time,cohorts,trainees,cost_per_trainee_per_month,preference_model,\
endorsement_pct,bcr,total_cost,total_benefit,notes";

fn service() -> ScenarioService<InMemoryScenarioRepository> {
    ScenarioService::new(
        Arc::new(InMemoryScenarioRepository::default()),
        AppraisalEngine::default(),
    )
}

#[test]
fn empty_list_exports_only_the_header() {
    let mut buffer = Vec::new();
    let written = service().export_csv(&mut buffer, false).expect("export");

    assert_eq!(written, 0);
    assert_eq!(String::from_utf8(buffer).expect("utf8").trim_end(), HEADER);
}

#[test]
fn rows_carry_labels_percentages_and_ratio() {
    let service = service();
    service
        .save(SaveScenario {
            name: Some("Reference".to_string()),
            notes: Some("baseline, as costed".to_string()),
            config: ScenarioConfig::default(),
        })
        .expect("saved");
    service
        .save(SaveScenario {
            name: Some("Free advanced".to_string()),
            notes: None,
            config: ScenarioConfig {
                tier: ProgrammeTier::Advanced,
                mentorship: MentorshipIntensity::High,
                cost_per_trainee_per_month: 0.0,
                ..ScenarioConfig::default()
            },
        })
        .expect("saved");

    let mut buffer = Vec::new();
    service.export_csv(&mut buffer, false).expect("export");
    let text = String::from_utf8(buffer).expect("utf8");

    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let headers = reader.headers().expect("headers").clone();
    assert_eq!(headers.iter().collect::<Vec<_>>().join(","), HEADER);

    let rows: Vec<csv::StringRecord> = reader
        .records()
        .collect::<Result<_, _>>()
        .expect("rows parse");
    assert_eq!(rows.len(), 2);

    let reference = &rows[0];
    assert_eq!(&reference[1], "Reference");
    assert_eq!(&reference[4], "Frontline (3 months)");
    assert_eq!(&reference[12], "Average mixed logit");
    assert_eq!(&reference[13], "38.2");
    assert_eq!(&reference[14], "0.24");
    assert_eq!(&reference[15], "180000000");
    assert_eq!(&reference[17], "baseline, as costed");

    let free = &rows[1];
    assert_eq!(&free[2], "High endorsement, Advanced, High mentorship");
    assert_eq!(&free[14], "n/a");
    assert_eq!(&free[15], "0");
}

#[test]
fn extreme_costs_stay_finite_in_results_and_export() {
    let service = service();
    let saved = service
        .save(SaveScenario {
            name: Some("Runaway budget".to_string()),
            notes: None,
            config: ScenarioConfig {
                tier: ProgrammeTier::Advanced,
                cost_per_trainee_per_month: 1e306,
                ..ScenarioConfig::default()
            },
        })
        .expect("saved");

    let summary = &saved.results.summary;
    assert!(saved.results.costs.direct_cost_per_cohort.is_finite());
    assert!(summary.total_cost_all_cohorts.is_finite());
    assert!(summary.total_net_benefit_all_cohorts.is_finite());
    assert!(saved.results.benefit_cost_ratio().is_some());

    let mut buffer = Vec::new();
    service.export_csv(&mut buffer, false).expect("export");
    let text = String::from_utf8(buffer).expect("utf8");
    assert!(!text.contains("inf"));
    assert!(!text.contains("NaN"));

    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let row = reader
        .records()
        .next()
        .expect("one row")
        .expect("row parses");
    assert_eq!(&row[11], "1000000000000");
    let total_cost: f64 = row[15].parse().expect("numeric total cost");
    assert!(total_cost.is_finite() && total_cost > 0.0);
}
