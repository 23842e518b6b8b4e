use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "leadscore",
    about = "Score sales leads for buying intent against an offer",
    version
)]
pub struct Cli {
    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Score every lead with rules plus model reasoning
    Score(ScoreArgs),
    /// Show the rule breakdown for every lead, no model calls
    Rules(RulesArgs),
    /// Check offer, lead and config files without scoring
    Validate(ValidateArgs),
    /// Print the reasoning prompt that would be sent for one lead
    Prompt(PromptArgs),
}

#[derive(Args, Debug)]
pub struct InputArgs {
    /// Offer file (.yaml, .yml or .json)
    #[arg(long)]
    pub offer: PathBuf,

    /// Lead list file (.yaml, .yml or .json)
    #[arg(long)]
    pub leads: PathBuf,
}

#[derive(Args, Debug)]
pub struct ScoreArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Runtime config file; defaults apply when omitted
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

#[derive(Args, Debug)]
pub struct RulesArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[derive(Args, Debug)]
pub struct ValidateArgs {
    #[arg(long)]
    pub offer: PathBuf,

    #[arg(long)]
    pub leads: Option<PathBuf>,

    /// Also check the runtime config and provider credentials
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct PromptArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Position of the lead in the lead file
    #[arg(long, default_value_t = 0)]
    pub index: usize,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
    Table,
}
