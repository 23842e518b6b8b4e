mod cli;
mod output;
mod telemetry;

use std::path::Path;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tokio::sync::watch;

use leadscore_core::{LeadBatch, LeadProfile, OfferProfile, RuleEvaluator};
use leadscore_runtime::prompts::build_intent_prompt;
use leadscore_runtime::{ProviderRegistry, RuntimeConfig, ScoringEngine};

use cli::{Cli, Command, InputArgs, OutputFormat, PromptArgs, RulesArgs, ScoreArgs, ValidateArgs};
use output::{rules_table, score_rows, score_table, RulesRow};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    telemetry::init(&cli.log_level)?;

    match cli.command {
        Command::Score(args) => score(args).await,
        Command::Rules(args) => rules(args),
        Command::Validate(args) => validate(args).await,
        Command::Prompt(args) => prompt(args),
    }
}

fn load_offer(path: &Path) -> Result<OfferProfile> {
    OfferProfile::from_file(path).with_context(|| format!("loading offer from {}", path.display()))
}

fn load_leads(path: &Path) -> Result<LeadBatch> {
    LeadProfile::batch_from_file(path)
        .with_context(|| format!("loading leads from {}", path.display()))
}

fn load_inputs(input: &InputArgs) -> Result<(OfferProfile, LeadBatch)> {
    Ok((load_offer(&input.offer)?, load_leads(&input.leads)?))
}

fn load_config(path: Option<&Path>) -> Result<RuntimeConfig> {
    match path {
        Some(path) => RuntimeConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display())),
        None => Ok(RuntimeConfig::default()),
    }
}

async fn score(args: ScoreArgs) -> Result<ExitCode> {
    let (offer, leads) = load_inputs(&args.input)?;
    let config = load_config(args.config.as_deref())?;
    let engine = ScoringEngine::from_config(&config, &ProviderRegistry::with_defaults())
        .context("building scoring engine")?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, finishing in-flight leads");
            let _ = shutdown_tx.send(true);
        }
    });

    let report = engine.score_batch_until(leads, &offer, shutdown_rx).await?;

    match args.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&score_rows(&report))?);
        }
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&score_rows(&report))?),
        OutputFormat::Table => print!("{}", score_table(&report)),
    }

    if report.failed() > 0 || report.cancelled() > 0 {
        return Ok(ExitCode::from(2));
    }
    Ok(ExitCode::SUCCESS)
}

fn rules(args: RulesArgs) -> Result<ExitCode> {
    // Rejected records were already logged by the loader
    let (offer, batch) = load_inputs(&args.input)?;
    let evaluator = RuleEvaluator::new();
    let rows: Vec<_> = batch
        .leads()
        .map(|lead| (lead, evaluator.evaluate(lead, &offer)))
        .collect();

    let structured = || {
        rows.iter()
            .map(|(lead, breakdown)| RulesRow {
                name: &lead.name,
                rule_score: breakdown.total(),
                breakdown,
            })
            .collect::<Vec<_>>()
    };

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&structured())?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&structured())?),
        OutputFormat::Table => print!("{}", rules_table(&rows)),
    }
    Ok(ExitCode::SUCCESS)
}

async fn validate(args: ValidateArgs) -> Result<ExitCode> {
    let offer = load_offer(&args.offer)?;
    println!(
        "offer '{}' is valid ({} value props, {} use cases)",
        offer.name,
        offer.value_props.len(),
        offer.ideal_use_cases.len()
    );

    let mut rejected = 0;
    if let Some(path) = &args.leads {
        let batch = load_leads(path)?;
        let incomplete = batch.leads().filter(|l| !l.missing_fields().is_empty()).count();
        println!(
            "{} of {} leads are valid ({} incomplete)",
            batch.leads().count(),
            batch.len(),
            incomplete
        );
        for (index, lead) in batch.rejected() {
            println!("  leads[{}] '{}' rejected: {}", index, lead.name, lead.error);
            rejected += 1;
        }
    }

    if let Some(path) = &args.config {
        let config = load_config(Some(path))?;
        config.validate().context("checking runtime config")?;
        let registry = ProviderRegistry::with_defaults();
        registry
            .validate(&config.provider)
            .context("checking provider settings")?;
        let provider = registry
            .create(&config.provider)
            .context("building provider")?;
        if !provider.health_check().await {
            bail!("provider '{}' failed its health check", provider.name());
        }
        println!(
            "config is valid (provider {}: {}, model {})",
            config.provider.kind,
            registry.description(&config.provider.kind).unwrap_or("unknown"),
            config.provider.model
        );
    }

    if rejected > 0 {
        return Ok(ExitCode::from(2));
    }
    Ok(ExitCode::SUCCESS)
}

fn prompt(args: PromptArgs) -> Result<ExitCode> {
    let (offer, batch) = load_inputs(&args.input)?;
    let lead = match batch.records.get(args.index) {
        Some(Ok(lead)) => lead,
        Some(Err(rejected)) => bail!("lead {} was rejected: {}", args.index, rejected.error),
        None => bail!(
            "lead index {} is out of range: {} leads loaded",
            args.index,
            batch.len()
        ),
    };
    println!("{}", build_intent_prompt(lead, &offer));
    Ok(ExitCode::SUCCESS)
}
