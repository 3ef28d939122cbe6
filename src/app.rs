//! Command dispatch.
//!
//! Builds the store/engine once per invocation and routes each subcommand
//! through the same public contracts a web front-end would use.

use std::fs;
use std::sync::Arc;

use clap::Parser;

use crate::batch::BatchProcessor;
use crate::cli::{BatchArgs, Cli, Command, PredictArgs, SampleCsvArgs, TrainArgs};
use crate::domain::Record;
use crate::engine::{EngineConfig, PredictionEngine};
use crate::error::{ModelError, Result};
use crate::io::{read_csv_table, sample_csv};
use crate::report::{format_batch_summary, format_status};
use crate::store::ModelStore;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Train(args) => train(args),
        Command::Status => status(),
        Command::Predict(args) => predict(args),
        Command::Batch(args) => batch(args),
        Command::SampleCsv(args) => sample(args),
    }
}

fn train(args: TrainArgs) -> Result<()> {
    let store = ModelStore::new();
    match args.domain {
        Some(domain) => store.retrain(domain)?,
        None => store.retrain_all()?,
    }
    print!("{}", format_status(&store.status_all()));
    Ok(())
}

fn status() -> Result<()> {
    // A fresh process has no trained models; status reflects this store
    // instance, matching the in-memory lifecycle of the artifacts.
    let store = ModelStore::new();
    print!("{}", format_status(&store.status_all()));
    Ok(())
}

fn load_record(args: &PredictArgs) -> Result<Record> {
    let raw = match (&args.data, &args.file) {
        (Some(data), _) => data.clone(),
        (None, Some(path)) => fs::read_to_string(path)?,
        (None, None) => return Err(ModelError::EmptyInput),
    };
    Ok(serde_json::from_str(&raw)?)
}

fn predict(args: PredictArgs) -> Result<()> {
    let record = load_record(&args)?;
    let store = Arc::new(ModelStore::new());
    let engine = PredictionEngine::with_config(
        store,
        EngineConfig {
            strict_unknowns: args.strict,
        },
    );

    let prediction = engine.predict(args.domain, &record)?;
    println!("{}", serde_json::to_string_pretty(&prediction)?);
    Ok(())
}

fn batch(args: BatchArgs) -> Result<()> {
    let table = read_csv_table(&args.csv)?;
    let store = Arc::new(ModelStore::new());
    let engine = PredictionEngine::with_config(
        store,
        EngineConfig {
            strict_unknowns: args.strict,
        },
    );

    let report = BatchProcessor::new(engine).process(args.domain, &table)?;

    let rows_json = serde_json::to_string_pretty(&report.rows)?;
    match &args.out {
        Some(path) => fs::write(path, rows_json)?,
        None => println!("{rows_json}"),
    }
    eprint!("{}", format_batch_summary(&report));
    Ok(())
}

fn sample(args: SampleCsvArgs) -> Result<()> {
    print!("{}", sample_csv(args.domain));
    Ok(())
}
