use crate::commands::{
    run_assumptions, run_evaluate, run_scenario, run_templates, run_wtp, Runtime,
};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use steps::appraisal::domain::{
    CareerIncentive, DeliveryMode, MentorshipIntensity, PreferenceModelId, ProgrammeTier,
    ResponseTime,
};
use steps::appraisal::report::CurrencyMode;
use steps::appraisal::ScenarioConfig;
use steps::config::AppConfig;
use steps::error::AppError;
use steps::telemetry;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "steps",
    about = "Appraise field epidemiology training programme designs from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate one programme design and print endorsement, costs and value for money
    Evaluate(EvaluateArgs),
    /// Willingness to pay for each non-reference attribute level
    Wtp(WtpArgs),
    /// List the cost templates available for each tier
    Templates(TemplatesArgs),
    /// Print the assumption log for a design
    Assumptions(AssumptionsArgs),
    /// Manage the saved scenario list
    Scenario {
        #[command(subcommand)]
        command: ScenarioCommand,
    },
}

#[derive(Subcommand, Debug)]
pub(crate) enum ScenarioCommand {
    /// Evaluate a design and add it to the saved list
    Save(SaveArgs),
    /// Show every saved scenario
    List,
    /// Mark a scenario for the shortlist (or clear the mark with --clear)
    Shortlist {
        id: String,
        #[arg(long)]
        clear: bool,
    },
    /// Delete a saved scenario
    Remove { id: String },
    /// Re-evaluate a saved scenario against the current parameter tables
    Recheck {
        id: String,
        /// JSON file of advanced overrides applied before re-evaluating
        #[arg(long)]
        overrides: Option<PathBuf>,
    },
    /// Write the saved list as CSV
    Export(ExportArgs),
}

impl ScenarioCommand {
    /// Overrides document for commands that evaluate a design.
    pub(crate) fn overrides(&self) -> Option<&Path> {
        match self {
            ScenarioCommand::Save(args) => args.overrides.as_deref(),
            ScenarioCommand::Recheck { overrides, .. } => overrides.as_deref(),
            _ => None,
        }
    }
}

macro_rules! strict_level {
    ($parser:ident, $level:ty) => {
        fn $parser(raw: &str) -> Result<$level, String> {
            let level = <$level>::parse(raw);
            if level.is_recognized() {
                return Ok(level);
            }
            let options: Vec<String> = <$level>::ordered()
                .iter()
                .map(|option| option.key().to_string())
                .collect();
            Err(format!("expected one of: {}", options.join(", ")))
        }
    };
}

strict_level!(parse_tier, ProgrammeTier);
strict_level!(parse_career, CareerIncentive);
strict_level!(parse_mentorship, MentorshipIntensity);
strict_level!(parse_delivery, DeliveryMode);
strict_level!(parse_response, ResponseTime);

fn parse_model(raw: &str) -> Result<PreferenceModelId, String> {
    Ok(PreferenceModelId::parse(raw))
}

fn parse_monthly_cost(raw: &str) -> Result<f64, String> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|err| format!("'{raw}' is not a number ({err})"))?;
    if !value.is_finite() || value < 0.0 {
        return Err("cost must be a non-negative amount".to_string());
    }
    if value > ScenarioConfig::MAX_MONTHLY_COST {
        return Err(format!(
            "cost must not exceed {} per trainee per month",
            ScenarioConfig::MAX_MONTHLY_COST
        ));
    }
    Ok(value)
}

/// Scenario attributes shared by every command that evaluates a design.
#[derive(Args, Debug, Clone)]
pub(crate) struct DesignArgs {
    /// Programme tier: frontline, intermediate or advanced
    #[arg(long, default_value = "frontline", value_parser = parse_tier)]
    pub(crate) tier: ProgrammeTier,
    /// Career incentive: certificate, uniqual or career_path
    #[arg(long, default_value = "certificate", value_parser = parse_career)]
    pub(crate) career: CareerIncentive,
    /// Mentorship intensity: low, medium or high
    #[arg(long, default_value = "low", value_parser = parse_mentorship)]
    pub(crate) mentorship: MentorshipIntensity,
    /// Delivery mode: blended, inperson or online
    #[arg(long, default_value = "blended", value_parser = parse_delivery)]
    pub(crate) delivery: DeliveryMode,
    /// Expected response time in days: 30, 15 or 7
    #[arg(long, default_value = "30", value_parser = parse_response)]
    pub(crate) response: ResponseTime,
    /// Cost per trainee per month in INR
    #[arg(long, default_value = "250000", value_parser = parse_monthly_cost)]
    pub(crate) cost_per_month: f64,
    /// Trainees per cohort
    #[arg(long, default_value_t = 20)]
    pub(crate) trainees: u32,
    /// Number of cohorts
    #[arg(long, default_value_t = 10)]
    pub(crate) cohorts: u32,
    /// Preference model: average or supportive
    #[arg(long, default_value = "average", value_parser = parse_model)]
    pub(crate) model: PreferenceModelId,
    /// Cost template name; defaults to the tier's first template
    #[arg(long)]
    pub(crate) template: Option<String>,
    /// Leave the opportunity cost of trainee time out of the economic cost
    #[arg(long)]
    pub(crate) no_opportunity_cost: bool,
}

impl DesignArgs {
    pub(crate) fn to_config(&self) -> ScenarioConfig {
        ScenarioConfig {
            tier: self.tier.clone(),
            career: self.career.clone(),
            mentorship: self.mentorship.clone(),
            delivery: self.delivery.clone(),
            response: self.response.clone(),
            cost_per_trainee_per_month: self.cost_per_month,
            trainees_per_cohort: self.trainees,
            cohorts: self.cohorts,
            model: self.model.clone(),
            cost_template: self.template.clone(),
            include_opportunity_cost: !self.no_opportunity_cost,
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    #[command(flatten)]
    pub(crate) design: DesignArgs,
    /// Display currency (INR or USD); defaults to STEPS_CURRENCY
    #[arg(long)]
    pub(crate) currency: Option<CurrencyMode>,
    /// JSON file of advanced overrides applied before evaluating
    #[arg(long)]
    pub(crate) overrides: Option<PathBuf>,
    /// Print the raw results as JSON instead of formatted tables
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct WtpArgs {
    /// Preference model: average or supportive
    #[arg(long, default_value = "average", value_parser = parse_model)]
    pub(crate) model: PreferenceModelId,
    /// Display currency (INR or USD); defaults to STEPS_CURRENCY
    #[arg(long)]
    pub(crate) currency: Option<CurrencyMode>,
}

#[derive(Args, Debug)]
pub(crate) struct TemplatesArgs {
    /// Only list templates for this tier
    #[arg(long, value_parser = parse_tier)]
    pub(crate) tier: Option<ProgrammeTier>,
}

#[derive(Args, Debug)]
pub(crate) struct AssumptionsArgs {
    #[command(flatten)]
    pub(crate) design: DesignArgs,
    /// Display currency (INR or USD); defaults to STEPS_CURRENCY
    #[arg(long)]
    pub(crate) currency: Option<CurrencyMode>,
    /// JSON file of advanced overrides applied before logging
    #[arg(long)]
    pub(crate) overrides: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct SaveArgs {
    #[command(flatten)]
    pub(crate) design: DesignArgs,
    /// Scenario name; defaults to "<tier> - <mentorship>"
    #[arg(long)]
    pub(crate) name: Option<String>,
    /// Free-text notes stored with the scenario
    #[arg(long)]
    pub(crate) notes: Option<String>,
    /// JSON file of advanced overrides applied before evaluating
    #[arg(long)]
    pub(crate) overrides: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct ExportArgs {
    /// Output file; writes to stdout when omitted
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
    /// Only export shortlisted scenarios
    #[arg(long)]
    pub(crate) shortlisted: bool,
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    let runtime = Runtime::new(config);
    info!(environment = ?runtime.config.environment, "steps calculator ready");

    match cli.command {
        Command::Evaluate(args) => run_evaluate(&runtime, args),
        Command::Wtp(args) => run_wtp(&runtime, args),
        Command::Templates(args) => run_templates(&runtime, args),
        Command::Assumptions(args) => run_assumptions(&runtime, args),
        Command::Scenario { command } => run_scenario(&runtime, command),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_reference_design() {
        let cli = Cli::try_parse_from(["steps", "evaluate"]).expect("parses");
        let Command::Evaluate(args) = cli.command else {
            panic!("expected evaluate command");
        };
        assert_eq!(args.design.to_config(), ScenarioConfig::default());
        assert!(args.currency.is_none());
    }

    #[test]
    fn levels_accept_aliases_and_reject_unknowns() {
        let cli = Cli::try_parse_from([
            "steps",
            "scenario",
            "save",
            "--tier",
            "Advanced",
            "--delivery",
            "in-person",
            "--no-opportunity-cost",
            "--name",
            "Pilot",
        ])
        .expect("parses");
        let Command::Scenario {
            command: ScenarioCommand::Save(args),
        } = cli.command
        else {
            panic!("expected scenario save");
        };
        let config = args.design.to_config();
        assert_eq!(config.tier, ProgrammeTier::Advanced);
        assert_eq!(config.delivery, DeliveryMode::InPerson);
        assert!(!config.include_opportunity_cost);
        assert_eq!(args.name.as_deref(), Some("Pilot"));

        assert!(Cli::try_parse_from(["steps", "evaluate", "--tier", "expert"]).is_err());
        assert!(Cli::try_parse_from(["steps", "evaluate", "--cost-per-month", "-5"]).is_err());
        assert!(Cli::try_parse_from(["steps", "evaluate", "--cost-per-month", "1e306"]).is_err());
        assert!(Cli::try_parse_from(["steps", "evaluate", "--cost-per-month", "1e12"]).is_ok());
    }

    #[test]
    fn save_and_recheck_accept_overrides() {
        let cli = Cli::try_parse_from([
            "steps",
            "scenario",
            "save",
            "--overrides",
            "advanced.json",
        ])
        .expect("parses");
        let Command::Scenario { command } = cli.command else {
            panic!("expected scenario command");
        };
        assert_eq!(command.overrides(), Some(Path::new("advanced.json")));

        let cli = Cli::try_parse_from([
            "steps",
            "scenario",
            "recheck",
            "SC1-001",
            "--overrides",
            "advanced.json",
        ])
        .expect("parses");
        let Command::Scenario { command } = cli.command else {
            panic!("expected scenario command");
        };
        assert_eq!(command.overrides(), Some(Path::new("advanced.json")));

        let cli = Cli::try_parse_from(["steps", "scenario", "list"]).expect("parses");
        let Command::Scenario { command } = cli.command else {
            panic!("expected scenario command");
        };
        assert!(command.overrides().is_none());
    }

    #[test]
    fn unknown_models_are_passed_through() {
        let cli = Cli::try_parse_from(["steps", "evaluate", "--model", "regional", "--json"])
            .expect("parses");
        let Command::Evaluate(args) = cli.command else {
            panic!("expected evaluate command");
        };
        assert!(!args.design.model.is_recognized());
        assert!(args.json);
    }
}
