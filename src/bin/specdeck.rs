use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "specdeck")]
#[command(about = "Convert OpenAPI documents into request collections", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import an OpenAPI 2.0 / 3.x document and emit collection JSON
    Import {
        /// OpenAPI document (JSON or YAML)
        #[arg(short, long)]
        spec: PathBuf,

        /// Output file; stdout when omitted
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Pretty-print the collection JSON
        #[arg(short, long, default_value_t = false)]
        pretty: bool,
    },
}

fn main() -> anyhow::Result<()> {
    // Keep stdout clean for the emitted collection; diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Import { spec, out, pretty } => run_import(&spec, out.as_deref(), pretty),
    }
}

fn run_import(spec_path: &Path, out: Option<&Path>, pretty: bool) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(spec_path)
        .with_context(|| format!("failed to read {}", spec_path.display()))?;
    let report = specdeck::import_text(&text)
        .with_context(|| format!("failed to import {}", spec_path.display()))?;

    for skip in &report.skipped {
        tracing::warn!(
            path = %skip.path,
            method = %skip.method,
            reason = %skip.reason,
            "operation skipped"
        );
    }

    let json = if pretty {
        serde_json::to_string_pretty(&report.collection)?
    } else {
        serde_json::to_string(&report.collection)?
    };
    match out {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => println!("{json}"),
    }
    Ok(())
}
