mod cli;

use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command, NormalizeArgs};
use driftnorm::config::{Config, OutputFormat};
use driftnorm::{DefaultResourceFactory, Pipeline, PipelineOptions, output, snapshot};

fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Normalize(args) => normalize(args)?,
        Command::Stages(args) => {
            let pipeline = Pipeline::standard(
                Arc::new(DefaultResourceFactory),
                PipelineOptions {
                    strict_mode: args.strict,
                },
            );
            println!("{}", output::render_stage_names(&pipeline.stage_names()));
        }
    }

    Ok(())
}

fn normalize(args: NormalizeArgs) -> Result<()> {
    let config = Config::load(args.config.as_deref())?.with_overrides(args.strict, args.format);

    let mut observed = snapshot::load(&args.observed)?;
    let mut declared = snapshot::load(&args.declared)?;

    tracing::info!(
        observed = observed.len(),
        declared = declared.len(),
        strict_mode = config.strict_mode,
        "snapshots loaded"
    );

    let pipeline = Pipeline::standard(
        Arc::new(DefaultResourceFactory),
        PipelineOptions {
            strict_mode: config.strict_mode,
        },
    );
    let report = pipeline.execute(&mut observed, &mut declared)?;

    match config.format {
        OutputFormat::Table => {
            println!("{}", output::render_table("Observed", &observed));
            println!("{}", output::render_table("Declared", &declared));
        }
        OutputFormat::Json => println!("{}", output::render_json(&observed, &declared)?),
        OutputFormat::Tree => println!("{}", output::render_report(&report)),
    }

    Ok(())
}
