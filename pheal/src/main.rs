//! # Pheal CLI Entry Point
//!
//! The main executable for the Pheal tool. This file drives the application lifecycle:
//!
//! 1. **Initialization**: Sets up logging and parses command-line arguments using [`cli::Cli`].
//! 2. **Connection**: Opens a connection on the query server via `pheal_core`.
//! 3. **Execution**: Runs the statement through a self-healing cursor, committing on success.
//! 4. **Presentation**: Formats and prints the outcome, the columns that had to be added, or the error.

mod cli;
mod formatter;
mod statement;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands, ExecArgs};
use formatter::{AddedColumns, FormattedString, Inferred};
use pheal_core::{ColumnHint, ConnectOptions, ExecuteOutcome, connect};
use serde_json::Value;
use std::{path::Path, process};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    init_tracing();

    let args = Cli::parse();

    match args.command {
        Commands::Exec(args) => run_exec(args).await,
        Commands::Infer { value } => run_infer(&value),
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .init();
}

fn run_infer(value: &Value) {
    match pheal_core::infer(value) {
        Ok((declaration, value)) => {
            println!("{}", FormattedString::from(Inferred(declaration, value)));
        }
        Err(err) => {
            eprintln!("{}", FormattedString::from(err));
            process::exit(1);
        }
    }
}

async fn run_exec(args: ExecArgs) {
    match exec(args).await {
        Ok((outcome, added)) => {
            println!("{}", FormattedString::from(outcome));
            if let Some(added) = added {
                println!("{}", FormattedString::from(added));
            }
        }
        Err(err) => {
            eprintln!("{}", FormattedString::from(err));
            process::exit(1);
        }
    }
}

async fn exec(args: ExecArgs) -> anyhow::Result<(ExecuteOutcome, Option<AddedColumns>)> {
    let mut hint = load_hint(args.hint, args.hint_file.as_deref())?;
    let original_hint = hint.clone();

    let mut options = ConnectOptions::default();
    if let Some(max_retries) = args.max_retries {
        options = options.max_retries(max_retries);
    }
    if args.autocommit {
        options = options.autocommit(true);
    }
    if args.readonly {
        options = options.readonly(true);
    }
    for (key, value) in args.info {
        options = options.info(key, value);
    }

    let mut connection = connect(&args.url, options)
        .await
        .with_context(|| format!("Failed to connect to {}", args.url))?;

    let params = (!args.params.is_empty()).then_some(args.params.as_slice());
    let result = statement::execute(
        &connection,
        &args.sql,
        params,
        hint.as_mut(),
        !args.autocommit,
    )
    .await;

    if let Err(err) = connection.close().await {
        warn!(error = %err, "failed to close the connection");
    }

    let outcome = result?;
    let added = original_hint.zip(hint).and_then(|(before, after)| added_columns(before, &after));

    Ok((outcome, added))
}

fn load_hint(hint: Option<ColumnHint>, path: Option<&Path>) -> anyhow::Result<Option<ColumnHint>> {
    let Some(path) = path else {
        return Ok(hint);
    };

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read hint file {}", path.display()))?;
    let hint = serde_json::from_str(&content)
        .with_context(|| format!("Invalid hint in {}", path.display()))?;

    Ok(Some(hint))
}

/// Columns present in the hint before execution and consumed by it.
fn added_columns(before: ColumnHint, after: &ColumnHint) -> Option<AddedColumns> {
    let added: Vec<_> = before
        .columns
        .into_iter()
        .filter(|(name, _)| !after.columns.contains_key(name))
        .collect();

    (!added.is_empty()).then_some(AddedColumns(before.table, added))
}
