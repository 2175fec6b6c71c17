use std::path::PathBuf;

use clap::{Parser, Subcommand};

use driftnorm::config::OutputFormat;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Normalize an observed/declared snapshot pair before diffing
    Normalize(NormalizeArgs),
    /// List pipeline stages in execution order
    Stages(StagesArgs),
}

#[derive(clap::Args, Debug)]
pub struct NormalizeArgs {
    #[arg(long)]
    pub observed: PathBuf,

    #[arg(long)]
    pub declared: PathBuf,

    /// Keep provider-created default resources
    #[arg(long, env = "DRIFTNORM_STRICT")]
    pub strict: bool,

    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    #[arg(long, env = "DRIFTNORM_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct StagesArgs {
    #[arg(long, env = "DRIFTNORM_STRICT")]
    pub strict: bool,
}
