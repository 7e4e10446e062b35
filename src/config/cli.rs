use crate::config::toml_config::OUTPUT_FORMATS;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "plan-check")]
#[command(about = "Automated quality checks for radiotherapy treatment plans")]
pub struct CliConfig {
    #[arg(long, short, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run the plan checks and print the findings
    Evaluate(EvaluateArgs),
    /// Load a constraint template and resolve its structures
    Objectives(ObjectivesArgs),
}

#[derive(Debug, Clone, Args)]
pub struct PlanSelection {
    /// JSON file with exported plan snapshots
    #[arg(long)]
    pub snapshot: String,

    /// Course id of the plan to check
    #[arg(long, requires = "plan")]
    pub course: Option<String>,

    /// Plan id to check; defaults to the active plan, then every plan
    #[arg(long, requires = "course")]
    pub plan: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct EvaluateArgs {
    #[command(flatten)]
    pub selection: PlanSelection,

    /// TOML file with check thresholds
    #[arg(long)]
    pub config: Option<String>,

    /// Output format, overrides the config file (table or json)
    #[arg(long)]
    pub format: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct ObjectivesArgs {
    #[command(flatten)]
    pub selection: PlanSelection,

    /// Comma-separated constraint template
    #[arg(long)]
    pub template: String,
}

impl Validate for PlanSelection {
    fn validate(&self) -> Result<()> {
        validation::validate_path("snapshot", &self.snapshot)?;
        validation::validate_file_extension("snapshot", &self.snapshot, &["json"])
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        match &self.command {
            Command::Evaluate(args) => {
                args.selection.validate()?;
                if let Some(config) = &args.config {
                    validation::validate_path("config", config)?;
                }
                if let Some(format) = &args.format {
                    validation::validate_one_of("format", format, &OUTPUT_FORMATS)?;
                }
                Ok(())
            }
            Command::Objectives(args) => {
                args.selection.validate()?;
                validation::validate_path("template", &args.template)?;
                validation::validate_file_extension("template", &args.template, &["csv", "txt"])
            }
        }
    }
}
