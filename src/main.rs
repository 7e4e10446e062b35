use clap::Parser;
use plan_check::config::cli::{Command, EvaluateArgs, ObjectivesArgs, PlanSelection};
use plan_check::core::{Finding, PlanSnapshot, ResolvedObjective, SnapshotProvider, Status};
use plan_check::utils::{logger, validation::Validate};
use plan_check::{
    CliConfig, ConsoleNotifier, JsonSnapshotFile, ObjectivePipeline, PlanCheckError, Result,
    RuleEngine, TomlConfig,
};
use serde::Serialize;

#[derive(Serialize)]
struct PlanReport<'a> {
    course_id: &'a str,
    plan_id: &'a str,
    findings: &'a [Finding],
}

fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting plan-check");
    tracing::debug!("CLI config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let outcome = match &config.command {
        Command::Evaluate(args) => run_evaluate(args),
        Command::Objectives(args) => run_objectives(args),
    };

    match outcome {
        Ok(worst) => {
            tracing::info!("✅ plan-check completed");
            // 有警告時以 4 結束，方便外部流程判斷
            if worst == Some(Status::Warning) {
                std::process::exit(4);
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ plan-check failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            std::process::exit(e.exit_code());
        }
    }
}

fn select_plans(provider: &JsonSnapshotFile, selection: &PlanSelection) -> Result<Vec<PlanSnapshot>> {
    if let (Some(course), Some(plan)) = (&selection.course, &selection.plan) {
        return Ok(vec![provider.plan(course, plan)?]);
    }
    provider.default_selection()
}

fn run_evaluate(args: &EvaluateArgs) -> Result<Option<Status>> {
    let toml_config = match &args.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            TomlConfig::from_file(path)?
        }
        None => TomlConfig::default(),
    };
    toml_config.validate()?;
    let format = args
        .format
        .clone()
        .unwrap_or_else(|| toml_config.output_format().to_string());

    let provider = JsonSnapshotFile::from_file(&args.selection.snapshot)?;
    let plans = select_plans(&provider, &args.selection)?;
    if plans.is_empty() {
        tracing::warn!("No plans found in {}", args.selection.snapshot);
    }

    let engine = RuleEngine::new(&toml_config.thresholds);
    let mut worst: Option<Status> = None;
    let mut reports = Vec::with_capacity(plans.len());
    for plan in &plans {
        tracing::debug!("Treatment beams: {:?}", plan.treatment_beam_ids());
        let findings = engine.evaluate(plan)?;
        if let Some(first) = findings.first() {
            worst = Some(worst.map_or(first.status(), |w| w.min(first.status())));
        }
        reports.push((plan, findings));
    }

    if format == "json" {
        let documents: Vec<PlanReport> = reports
            .iter()
            .map(|(plan, findings)| PlanReport {
                course_id: &plan.course_id,
                plan_id: &plan.id,
                findings,
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&documents)?);
    } else {
        for (plan, findings) in &reports {
            println!("📋 {} / {}", plan.course_id, plan.id);
            for finding in findings {
                println!("  {:<14} {}", finding.status().label(), finding.description());
            }
            println!();
        }
    }

    Ok(worst)
}

fn run_objectives(args: &ObjectivesArgs) -> Result<Option<Status>> {
    let provider = JsonSnapshotFile::from_file(&args.selection.snapshot)?;
    let plan = select_plans(&provider, &args.selection)?
        .into_iter()
        .next()
        .ok_or_else(|| PlanCheckError::PlanNotFound {
            course_id: args.selection.course.clone().unwrap_or_default(),
            plan_id: args.selection.plan.clone().unwrap_or_default(),
        })?;

    // 沒有結構組時無從比對，直接回報
    let structure_set = plan
        .structure_set
        .as_ref()
        .ok_or_else(|| PlanCheckError::MissingStructureSet {
            plan_id: plan.id.clone(),
        })?;

    let notifier = ConsoleNotifier;
    let resolved = ObjectivePipeline::new(&notifier).run(&args.template, Some(structure_set))?;
    print_objectives(&plan, &resolved);
    Ok(None)
}

fn print_objectives(plan: &PlanSnapshot, resolved: &[ResolvedObjective]) {
    println!("🎯 Objectives for {} / {}", plan.course_id, plan.id);
    for objective in resolved {
        let t = &objective.template;
        let structure = objective
            .structure
            .as_ref()
            .map(|s| s.id.as_str())
            .unwrap_or("-");
        println!(
            "  {:<20} -> {:<20} {:<16} goal {:<10} variation {:<10} priority {}",
            t.template_id, structure, t.dvh_objective, t.goal, t.variation, t.priority
        );
    }
}
