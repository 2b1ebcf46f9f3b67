use anyhow::Context;
use clap::Parser;
use encounter_catalogue::adapter::FileRecordSource;
use encounter_catalogue::audit::DEFAULT_SAMPLE_LIMIT;
use encounter_catalogue::{AuditOptions, CatalogueStore, ExternalRecordSource, run_audit};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "catalogue_audit",
    about = "Sweep the encounter catalogue and a live record set for data defects"
)]
struct Cli {
    /// Catalogue file (.json, .yaml or .yml)
    #[arg(long)]
    catalogue: PathBuf,
    /// Live record set to check (.json, .yaml or .yml)
    #[arg(long)]
    records: Option<PathBuf>,
    /// Only check records belonging to this owner
    #[arg(long)]
    owner: Option<String>,
    /// Catalogue failures kept in the report sample
    #[arg(long, default_value_t = DEFAULT_SAMPLE_LIMIT)]
    sample_limit: usize,
    /// Where the full JSON report is written
    #[arg(long, default_value = "catalogue-audit-report.json")]
    out: PathBuf,
    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let store = CatalogueStore::from_path(&cli.catalogue)
        .with_context(|| format!("loading catalogue {}", cli.catalogue.display()))?;
    let records = cli.records.as_ref().map(FileRecordSource::new);
    let options = AuditOptions {
        owner: cli.owner.clone(),
        sample_limit: cli.sample_limit,
        ..AuditOptions::default()
    };

    let report = run_audit(
        Arc::new(store),
        records.as_ref().map(|r| r as &dyn ExternalRecordSource),
        &options,
    );

    let rendered = serde_json::to_string_pretty(&report).context("serializing audit report")?;
    fs::write(&cli.out, rendered)
        .with_context(|| format!("writing report to {}", cli.out.display()))?;

    println!("Audit complete");
    for line in report.summary_lines(Some(&cli.out)) {
        println!("{line}");
    }
    if !report.failures_by_method.is_empty() {
        println!("Catalogue failures by method:");
        let mut items: Vec<_> = report.failures_by_method.iter().collect();
        items.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        for (method, count) in items {
            println!("  {count}x {method}");
        }
    }

    Ok(ExitCode::from(report.exit_code()))
}
