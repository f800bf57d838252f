pub mod classifier;
pub mod cli;
pub mod config;
pub mod data;
pub mod dataset;
pub mod filter;
pub mod io_utils;
pub mod loader;
pub mod preview;
pub mod profile;
pub mod render;
pub mod report;
pub mod roles;
pub mod rules;
pub mod table;

use std::{env, fs, path::Path, sync::OnceLock};

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::{LevelFilter, debug, error, info};

use crate::{
    cli::{ClassifyArgs, Cli, Commands, ConfigArgs},
    config::ClassifierConfig,
    report::{SchemaReport, analyze},
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("column_roles", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Classify(args) => handle_classify(&args),
        Commands::Preview(args) => preview::execute(&args),
        Commands::Filter(args) => filter::execute(&args),
        Commands::Config(args) => handle_config(&args),
    }
}

fn handle_classify(args: &ClassifyArgs) -> Result<()> {
    if !args.labels.is_empty() && args.labels.len() != args.inputs.len() {
        bail!(
            "Got {} --label value(s) for {} input(s); give one label per input or none",
            args.labels.len(),
            args.inputs.len()
        );
    }
    let mut config = match &args.config {
        Some(path) => ClassifierConfig::load(path)
            .with_context(|| format!("Loading configuration from {path:?}"))?,
        None => ClassifierConfig::default(),
    };
    if let Some(sample_rows) = args.sample_rows {
        config = config.with_sample_rows(sample_rows);
    }
    debug!("Classifier configuration: {config:?}");
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;

    for input in &args.inputs {
        let state = if input.exists() { "EXISTS" } else { "NOT FOUND" };
        info!("{}: {state}", input.display());
    }

    let mut reports: Vec<SchemaReport> = Vec::with_capacity(args.inputs.len());
    let mut failures = 0usize;
    for (idx, input) in args.inputs.iter().enumerate() {
        let options = loader::LoadOptions {
            label: args.labels.get(idx).cloned(),
            delimiter: args.delimiter,
            encoding,
            sheet: args.sheet.clone(),
        };
        match loader::load_dataset(input, &options) {
            Ok(dataset) => {
                info!(
                    "Classifying '{}' ({} row(s), {} column(s))",
                    dataset.label(),
                    dataset.row_count(),
                    dataset.column_count()
                );
                reports.push(analyze(&dataset, &config));
            }
            Err(err) => {
                error!("Skipping {}: {err}", input.display());
                failures += 1;
            }
        }
    }

    let rendered = render::render_reports(&reports, args.format)?;
    write_output(args.output.as_deref(), &rendered)?;
    info!(
        "Classified {} of {} input(s)",
        reports.len(),
        args.inputs.len()
    );
    if failures > 0 {
        bail!("{failures} of {} input(s) could not be loaded", args.inputs.len());
    }
    Ok(())
}

fn handle_config(args: &ConfigArgs) -> Result<()> {
    let config = ClassifierConfig::default().with_sample_rows(args.sample_rows);
    match &args.output {
        Some(path) if !io_utils::is_dash(path) => {
            config
                .save(path)
                .with_context(|| format!("Writing configuration to {path:?}"))?;
            info!("Default configuration written to {path:?}");
        }
        _ => {
            let yaml = config
                .to_yaml_string()
                .context("Serializing default configuration")?;
            print!("{yaml}");
        }
    }
    Ok(())
}

fn write_output(path: Option<&Path>, contents: &str) -> Result<()> {
    match path {
        Some(path) if !io_utils::is_dash(path) => {
            fs::write(path, contents).with_context(|| format!("Writing {path:?}"))
        }
        _ => {
            print!("{contents}");
            Ok(())
        }
    }
}
