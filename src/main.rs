use std::io::{self, Write};

use anyhow::{Context, Result};
use sepsis_survival::{KnnClassifier, RunConfig, RunContext, load_csv, run_study};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    let config = RunConfig::from_env().context("Invalid SEPSIS_* configuration")?;

    init_logging(config.log_level)?;

    let source = config
        .dataset_source(&mut io::stdin().lock(), &mut io::stdout())
        .context("No dataset selected")?;

    info!("📦 Loading dataset from {:?}", source.path);
    let records = load_csv(&source.path)
        .with_context(|| format!("Cannot load dataset {}", source.path.display()))?;

    let ctx = RunContext::start(&config.output_dir, source.size_label);
    let mut knn = KnnClassifier::new(config.neighbours);
    let outcome = run_study(&records, &mut knn, &config, &ctx)
        .with_context(|| format!("Study run for {} failed", source.path.display()))?;

    println!("Incorrect predictions detected: {}", outcome.summary.mismatches);
    io::stdout().flush()?;
    Ok(())
}

/// Logs go to stderr; stdout carries only the prompt and the result line.
fn init_logging(level: Level) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to install log subscriber")
}
