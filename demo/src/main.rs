//! medwatch — Analyst Console Demo
//!
//! Drives the full analytics core from the command line: dataset listing
//! with search and pagination, the aggregation pipeline against mock (or
//! configured HTTP) backends, and PDF report export.
//!
//! Usage:
//!   cargo run -p demo -- list --data combined_features_2010.csv --search 0043
//!   cargo run -p demo -- analyze 0043E27DA2B94535
//!   cargo run -p demo -- report 0043E27DA2B94535 --out patient_report.pdf
//!   cargo run -p demo -- export --data combined_features_2010.csv --out table.pdf

use std::{fs, path::PathBuf, sync::Arc};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use medwatch_contracts::{
    error::{MedwatchError, MedwatchResult},
    identifier::BeneficiaryId,
};
use medwatch_dataset::{paginate, Dataset};
use medwatch_report::{export_table, render, synthesize, ReportContext, EXPORT_ROW_LIMIT};
use medwatch_services::{HttpCareService, HttpRecencyService, HttpRiskService, ServiceEndpoints};
use medwatch_session::{
    traits::{CareService, RecencyService, RiskService},
    Aggregator, OperationState, SessionSnapshot,
};

mod mock;

// ── CLI definition ────────────────────────────────────────────────────────────

/// medwatch — member risk stratification and care management console.
#[derive(Parser)]
#[command(
    name = "medwatch",
    about = "medwatch analyst console demo",
    long_about = "Runs the medwatch analytics core end to end: dataset listing,\n\
                  risk/care aggregation with the dependent ROI pipeline, and\n\
                  PDF report export."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load a dataset and print one page of the (optionally filtered) listing.
    List {
        /// Path to the delimited dataset file.
        #[arg(long)]
        data: PathBuf,
        /// Case-insensitive substring filter on the beneficiary ID.
        #[arg(long, default_value = "")]
        search: String,
        /// 1-based page number.
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Rows per page.
        #[arg(long, default_value_t = 10)]
        page_size: usize,
    },
    /// Run the aggregation pipeline for one beneficiary and print the session state.
    Analyze {
        /// Beneficiary ID to analyze.
        bene_id: String,
        /// TOML endpoint file; without it the canned mock backends are used.
        #[arg(long)]
        endpoints: Option<PathBuf>,
    },
    /// Analyze, synthesize the patient report, and write it as a PDF.
    Report {
        /// Beneficiary ID to report on.
        bene_id: String,
        /// TOML endpoint file; without it the canned mock backends are used.
        #[arg(long)]
        endpoints: Option<PathBuf>,
        /// Dataset file whose fingerprint is embedded in the report footer.
        #[arg(long)]
        data: Option<PathBuf>,
        /// Output PDF path.
        #[arg(long, default_value = "patient_report.pdf")]
        out: PathBuf,
    },
    /// Load a dataset and export the filtered listing as a PDF table.
    Export {
        /// Path to the delimited dataset file.
        #[arg(long)]
        data: PathBuf,
        /// Case-insensitive substring filter on the beneficiary ID.
        #[arg(long, default_value = "")]
        search: String,
        /// Output PDF path.
        #[arg(long, default_value = "med_analytics.pdf")]
        out: PathBuf,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Structured logging; set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::List { data, search, page, page_size } => {
            run_list(&data, &search, page, page_size)
        }
        Command::Analyze { bene_id, endpoints } => run_analyze(&bene_id, endpoints.as_deref())
            .await
            .map(|snapshot| print_snapshot(&snapshot)),
        Command::Report { bene_id, endpoints, data, out } => {
            run_report(&bene_id, endpoints.as_deref(), data.as_deref(), &out).await
        }
        Command::Export { data, search, out } => run_export(&data, &search, &out),
    };

    if let Err(e) = result {
        eprintln!("medwatch error: {}", e);
        std::process::exit(1);
    }
}

// ── Dataset listing ───────────────────────────────────────────────────────────

fn load_dataset(path: &std::path::Path) -> MedwatchResult<Dataset> {
    let raw = fs::read_to_string(path).map_err(|e| MedwatchError::DatasetParse {
        reason: format!("failed to read '{}': {}", path.display(), e),
    })?;
    Dataset::load(&raw)
}

fn run_list(
    data: &std::path::Path,
    search: &str,
    page: usize,
    page_size: usize,
) -> MedwatchResult<()> {
    let dataset = load_dataset(data)?;
    let filtered = dataset.search(search);
    let current = paginate(&filtered, page_size, page)?;

    println!(
        "Patient Details (Page {} of {}) — {} matching record(s)",
        current.page,
        current.total_pages,
        filtered.len()
    );
    for record in &current.items {
        let flags: Vec<&str> = medwatch_dataset::FLAG_COLUMNS
            .iter()
            .filter(|c| record.field(c) == "1")
            .copied()
            .collect();
        println!(
            "  {}  visits={}  total={}  flags=[{}]",
            record.id,
            record.field("total_visits"),
            record.field("total_amount"),
            flags.join(", ")
        );
    }
    Ok(())
}

fn run_export(
    data: &std::path::Path,
    search: &str,
    out: &std::path::Path,
) -> MedwatchResult<()> {
    let dataset = load_dataset(data)?;
    let filtered = dataset.search(search);
    let document = export_table(&filtered, dataset.columns(), EXPORT_ROW_LIMIT);
    let bytes = render(&document)?;
    fs::write(out, &bytes).map_err(|e| MedwatchError::Report {
        reason: format!("failed to write '{}': {}", out.display(), e),
    })?;
    println!(
        "Exported {} of {} matching record(s) to {}",
        filtered.len().min(EXPORT_ROW_LIMIT),
        filtered.len(),
        out.display()
    );
    Ok(())
}

// ── Aggregation pipeline ──────────────────────────────────────────────────────

type Services = (
    Arc<dyn RiskService>,
    Arc<dyn CareService>,
    Arc<dyn RecencyService>,
);

fn build_services(endpoints: Option<&std::path::Path>) -> MedwatchResult<Services> {
    match endpoints {
        Some(path) => {
            let endpoints = ServiceEndpoints::from_file(path)?;
            let client = reqwest::Client::new();
            Ok((
                Arc::new(HttpRiskService::new(client.clone(), &endpoints)),
                Arc::new(HttpCareService::new(client.clone(), &endpoints)),
                Arc::new(HttpRecencyService::new(client, &endpoints)),
            ))
        }
        None => Ok((
            Arc::new(mock::MockRiskService),
            Arc::new(mock::MockCareService),
            Arc::new(mock::MockRecencyService),
        )),
    }
}

async fn run_analyze(
    bene_id: &str,
    endpoints: Option<&std::path::Path>,
) -> MedwatchResult<SessionSnapshot> {
    let beneficiary = BeneficiaryId::new(bene_id)?;
    let (risk, care, recency) = build_services(endpoints)?;
    let aggregator = Aggregator::new(risk, care, recency);

    aggregator.set_identifier(beneficiary)?;
    // Independent fan-out: neither result blocks the other.
    aggregator.run_care_insight().await?;
    aggregator.run_risk_prediction().await?;

    Ok(aggregator.snapshot())
}

fn describe<T>(state: &OperationState<T>, on_success: impl Fn(&T) -> String) -> String {
    match state {
        OperationState::Idle => "idle".to_string(),
        OperationState::Loading => "loading".to_string(),
        OperationState::Success(value) => on_success(value),
        OperationState::Error(message) => format!("ERROR: {}", message),
    }
}

fn print_snapshot(snapshot: &SessionSnapshot) {
    let id = snapshot
        .beneficiary
        .as_ref()
        .map(|b| b.to_string())
        .unwrap_or_default();
    println!("Session state for {}", id);
    println!(
        "  risk:    {}",
        describe(&snapshot.risk, |p| format!(
            "tier {} (30d {:.1} / 60d {:.1} / 90d {:.1})",
            p.tier, p.risk_30, p.risk_60, p.risk_90
        ))
    );
    println!(
        "  care:    {}",
        describe(&snapshot.care, |c| format!(
            "{} condition(s), {} suggestion(s)",
            c.diseases.len(),
            c.suggestions.len()
        ))
    );
    println!(
        "  roi:     {}",
        describe(&snapshot.roi, |outcome| match outcome.estimate() {
            Some(est) => format!(
                "proxy ROI {:.4} (reduction {:.2} at tier {})",
                est.proxy_roi, est.reduction, est.tier
            ),
            None => "unavailable".to_string(),
        })
    );
}

async fn run_report(
    bene_id: &str,
    endpoints: Option<&std::path::Path>,
    data: Option<&std::path::Path>,
    out: &std::path::Path,
) -> MedwatchResult<()> {
    let snapshot = run_analyze(bene_id, endpoints).await?;
    print_snapshot(&snapshot);

    let mut context = ReportContext::from_snapshot(&snapshot)?;
    if let Some(path) = data {
        let dataset = load_dataset(path)?;
        context = context.with_dataset_fingerprint(dataset.fingerprint());
    }

    let document = synthesize(&context);
    let bytes = render(&document)?;
    fs::write(out, &bytes).map_err(|e| MedwatchError::Report {
        reason: format!("failed to write '{}': {}", out.display(), e),
    })?;
    println!("Report written to {}", out.display());
    Ok(())
}
