use crate::cli::{
    AssumptionsArgs, EvaluateArgs, ExportArgs, SaveArgs, ScenarioCommand, TemplatesArgs, WtpArgs,
};
use crate::infra::{load_overrides, JsonFileScenarioRepository};
use chrono::Utc;
use serde_json::json;
use std::fmt::Write as _;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;
use std::sync::Arc;
use steps::appraisal::domain::ProgrammeTier;
use steps::appraisal::report::{
    assumption_log, format_percent, format_ratio, CostBreakdownView, CurrencyMode,
    MoneyFormatter, NationalView, ResultsSummaryView,
};
use steps::appraisal::scenarios::{
    SaveScenario, SavedScenario, ScenarioId, ScenarioRecheck, ScenarioService,
};
use steps::appraisal::{
    willingness_to_pay, AppraisalEngine, AppraisalResults, AppraisalSession, ParameterSet,
    ScenarioConfig,
};
use steps::config::AppConfig;
use steps::error::AppError;
use tracing::info;

/// Loaded configuration plus the parameter tables every command reads.
pub(crate) struct Runtime {
    pub(crate) config: AppConfig,
    pub(crate) parameters: ParameterSet,
}

impl Runtime {
    pub(crate) fn new(config: AppConfig) -> Self {
        let parameters = config.parameters.load();
        Self { config, parameters }
    }

    fn currency(&self, requested: Option<CurrencyMode>) -> CurrencyMode {
        requested.unwrap_or(self.config.display.currency)
    }

    /// Parameter tables with an optional overrides document applied.
    fn session(&self, overrides: Option<&Path>) -> Result<AppraisalSession, AppError> {
        let mut session = AppraisalSession::new(self.parameters.clone());
        session.apply_overrides(&load_overrides(overrides)?);
        Ok(session)
    }

    fn scenario_service(
        &self,
        overrides: Option<&Path>,
    ) -> Result<ScenarioService<JsonFileScenarioRepository>, AppError> {
        let parameters = self.session(overrides)?.parameters().clone();
        Ok(ScenarioService::new(
            Arc::new(JsonFileScenarioRepository::new(self.config.scenarios.path())),
            AppraisalEngine::new(Arc::new(parameters)),
        ))
    }
}

pub(crate) fn run_evaluate(runtime: &Runtime, args: EvaluateArgs) -> Result<(), AppError> {
    let EvaluateArgs {
        design,
        currency,
        overrides,
        json,
    } = args;

    let mut session = runtime.session(overrides.as_deref())?;

    let config = design.to_config();
    let results = session.evaluate(config.clone()).clone();

    if json {
        let body = json!({ "config": config, "results": results });
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    let money = MoneyFormatter::new(
        runtime.currency(currency),
        session.parameters().epi.exchange_rate,
    );
    print!("{}", render_evaluation(&config, &results, &money));
    Ok(())
}

fn render_evaluation(
    config: &ScenarioConfig,
    results: &AppraisalResults,
    money: &MoneyFormatter,
) -> String {
    let summary = ResultsSummaryView::build(results, money);
    let costs = CostBreakdownView::build(results, money);
    let national = NationalView::build(config, results, money);
    let mut out = String::new();

    writeln!(&mut out, "STEPS appraisal ({})", money.mode()).expect("write title");
    writeln!(
        &mut out,
        "- Design: {} | {} | {} mentorship | {} | {}",
        config.tier.label(),
        config.career.label(),
        config.mentorship.label(),
        config.delivery.label(),
        config.response.label()
    )
    .expect("write design");
    let fallback = if summary.model_fallback {
        " (requested model unavailable)"
    } else {
        ""
    };
    writeln!(
        &mut out,
        "- Preference model: {}{fallback}",
        summary.model_label
    )
    .expect("write model");
    writeln!(
        &mut out,
        "- Endorsement: {} | opt-out {}",
        summary.endorsement, summary.opt_out
    )
    .expect("write endorsement");

    writeln!(&mut out, "\nCost per cohort (template {})", costs.template)
        .expect("write cost heading");
    writeln!(
        &mut out,
        "- Programme cost: {}",
        costs.programme_cost_per_cohort
    )
    .expect("write programme cost");
    writeln!(
        &mut out,
        "- Opportunity cost ({}): {}",
        costs.opportunity_cost_share, costs.opportunity_cost_per_cohort
    )
    .expect("write opportunity cost");
    writeln!(&mut out, "- Economic cost: {}", costs.economic_cost_per_cohort)
        .expect("write economic cost");
    for component in &costs.components {
        writeln!(
            &mut out,
            "  - {}: {} | {} per cohort | {} per trainee-month",
            component.name,
            component.share,
            component.amount_per_cohort,
            component.amount_per_trainee_per_month
        )
        .expect("write cost component");
    }

    writeln!(&mut out, "\nPer cohort").expect("write cohort heading");
    writeln!(&mut out, "- Benefit: {}", summary.benefit_per_cohort).expect("write benefit");
    writeln!(&mut out, "- Net benefit: {}", summary.net_benefit_per_cohort)
        .expect("write net benefit");

    writeln!(&mut out, "\nAll {} cohorts", national.cohorts).expect("write national heading");
    writeln!(&mut out, "- Total cost: {}", national.total_cost).expect("write total cost");
    writeln!(&mut out, "- Total benefit: {}", national.total_benefit)
        .expect("write total benefit");
    writeln!(&mut out, "- Net benefit: {}", national.net_benefit)
        .expect("write national net benefit");
    writeln!(
        &mut out,
        "- Benefit-cost ratio: {}",
        national.benefit_cost_ratio
    )
    .expect("write ratio");
    writeln!(&mut out, "- Graduates: {}", national.graduates).expect("write graduates");
    writeln!(
        &mut out,
        "- Outbreak responses per year: {}",
        national.outbreak_responses_per_year
    )
    .expect("write outbreak responses");

    writeln!(&mut out, "\nRecommendation: {}", summary.recommendation)
        .expect("write recommendation");
    writeln!(&mut out, "{}", summary.headline).expect("write headline");
    out
}

pub(crate) fn run_wtp(runtime: &Runtime, args: WtpArgs) -> Result<(), AppError> {
    let (model, fallback) = runtime.parameters.models.resolve(&args.model);
    let money = MoneyFormatter::new(
        runtime.currency(args.currency),
        runtime.parameters.epi.exchange_rate,
    );

    let rows = willingness_to_pay(model);
    let suffix = if fallback { " (fallback)" } else { "" };
    println!(
        "Willingness to pay per trainee per month - {}{suffix}",
        model.id.label()
    );
    if rows.is_empty() {
        println!("- model has no cost coefficient; willingness to pay is undefined");
        return Ok(());
    }
    for row in rows {
        println!(
            "- {}: {} -> {} (coefficient {:.3})",
            row.attribute_label,
            row.level_label,
            money.format(row.value_per_trainee_per_month),
            row.coefficient
        );
    }
    Ok(())
}

pub(crate) fn run_templates(runtime: &Runtime, args: TemplatesArgs) -> Result<(), AppError> {
    let tiers = match args.tier {
        Some(tier) => vec![tier],
        None => ProgrammeTier::ordered(),
    };
    let templates = &runtime.parameters.cost_templates;

    for tier in tiers {
        println!("{}", tier.label());
        let Some(available) = templates.for_tier(&tier) else {
            println!("- no templates configured");
            continue;
        };
        for (index, (name, template)) in available.iter().enumerate() {
            let marker = if index == 0 { " (default)" } else { "" };
            println!(
                "- {name}{marker}: opportunity cost {:.0} %, components {:.0} % of direct cost",
                template.opportunity_cost_rate * 100.0,
                template.declared_share() * 100.0
            );
            for (component, share) in &template.components {
                println!("  - {component}: {:.1} %", share * 100.0);
            }
        }
    }
    Ok(())
}

pub(crate) fn run_assumptions(runtime: &Runtime, args: AssumptionsArgs) -> Result<(), AppError> {
    let session = runtime.session(args.overrides.as_deref())?;

    let log = assumption_log(
        &session.parameters().epi,
        &args.design.to_config(),
        runtime.currency(args.currency),
        Utc::now(),
    );
    print!("{log}");
    Ok(())
}

pub(crate) fn run_scenario(runtime: &Runtime, command: ScenarioCommand) -> Result<(), AppError> {
    let service = runtime.scenario_service(command.overrides())?;

    match command {
        ScenarioCommand::Save(args) => save_scenario(&service, args),
        ScenarioCommand::List => {
            let scenarios = service.list()?;
            if scenarios.is_empty() {
                println!("No saved scenarios.");
            }
            for scenario in &scenarios {
                println!("{}", scenario_line(scenario));
            }
            Ok(())
        }
        ScenarioCommand::Shortlist { id, clear } => {
            let scenario = service.set_shortlisted(&ScenarioId(id), !clear)?;
            let state = if scenario.shortlisted {
                "added to"
            } else {
                "removed from"
            };
            println!("{} {state} the shortlist", scenario.name);
            Ok(())
        }
        ScenarioCommand::Remove { id } => {
            let removed = service.remove(&ScenarioId(id))?;
            println!("Removed {} ({})", removed.name, removed.id);
            Ok(())
        }
        ScenarioCommand::Recheck { id, .. } => {
            let recheck = service.recheck(&ScenarioId(id))?;
            print!("{}", render_recheck(&recheck));
            Ok(())
        }
        ScenarioCommand::Export(args) => export_scenarios(&service, args),
    }
}

fn save_scenario(
    service: &ScenarioService<JsonFileScenarioRepository>,
    args: SaveArgs,
) -> Result<(), AppError> {
    let SaveArgs {
        design,
        name,
        notes,
        ..
    } = args;
    let saved = service.save(SaveScenario {
        name,
        notes,
        config: design.to_config(),
    })?;
    println!("Saved {}", scenario_line(&saved));
    Ok(())
}

fn export_scenarios(
    service: &ScenarioService<JsonFileScenarioRepository>,
    args: ExportArgs,
) -> Result<(), AppError> {
    match args.output {
        Some(path) => {
            let writer = BufWriter::new(File::create(&path)?);
            let written = service.export_csv(writer, args.shortlisted)?;
            info!(path = %path.display(), rows = written, "exported scenarios");
            println!("Wrote {written} scenario(s) to {}", path.display());
        }
        None => {
            service.export_csv(io::stdout().lock(), args.shortlisted)?;
        }
    }
    Ok(())
}

fn scenario_line(scenario: &SavedScenario) -> String {
    let marker = if scenario.shortlisted { "*" } else { " " };
    let tags = if scenario.tags.is_empty() {
        String::new()
    } else {
        format!(" [{}]", scenario.tags.join(", "))
    };
    format!(
        "{marker} {} | {} | endorsement {} | BCR {} | {}{tags}",
        scenario.id,
        scenario.name,
        format_percent(scenario.results.endorse_probability()),
        format_ratio(scenario.results.benefit_cost_ratio()),
        scenario.results.recommendation.label()
    )
}

fn render_recheck(recheck: &ScenarioRecheck) -> String {
    let saved = &recheck.scenario.results;
    let current = &recheck.current;
    let mut out = String::new();

    writeln!(
        &mut out,
        "{} ({}) saved {}",
        recheck.scenario.name,
        recheck.scenario.id,
        recheck.scenario.saved_at.format("%Y-%m-%d %H:%M UTC")
    )
    .expect("write recheck heading");
    if recheck.unchanged() {
        writeln!(&mut out, "- Results match the current parameter tables.")
            .expect("write match");
        return out;
    }
    writeln!(
        &mut out,
        "- Endorsement: {} -> {}",
        format_percent(saved.endorse_probability()),
        format_percent(current.endorse_probability())
    )
    .expect("write endorsement change");
    writeln!(
        &mut out,
        "- Benefit-cost ratio: {} -> {}",
        format_ratio(saved.benefit_cost_ratio()),
        format_ratio(current.benefit_cost_ratio())
    )
    .expect("write ratio change");
    writeln!(
        &mut out,
        "- Recommendation: {} -> {}",
        saved.recommendation.label(),
        current.recommendation.label()
    )
    .expect("write recommendation change");
    out
}
