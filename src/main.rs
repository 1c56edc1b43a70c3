//! Benchmark driver: builds both indexes on every configured dataset and
//! writes `results_lookup.csv` and `results_build.csv`.
//!
//! Run with:
//! ```bash
//! cargo run --release -- [config.json]
//! RUST_LOG=lindex=debug cargo run --release --features tracing
//! ```
//!
//! Without a config file the built-in defaults are used (SOSD datasets under
//! `data/`, 100M keys, 100K queries).

use std::path::PathBuf;
use std::process::ExitCode;

use lindex::harness::{BenchConfig, IndexResult, RunSummary, run};

fn main() -> ExitCode {
    #[cfg(feature = "tracing")]
    init_tracing();

    let config = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => match BenchConfig::from_file(&path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("Error: {}: {err}", path.display());
                return ExitCode::FAILURE;
            }
        },
        None => BenchConfig::default(),
    };

    match run(&config) {
        Ok(summary) => {
            print_summary(&summary);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(feature = "tracing")]
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .compact()
        .try_init();
}

fn print_summary(summary: &RunSummary) {
    for (name, reason) in &summary.skipped {
        eprintln!("Skipped dataset {name}: {reason}");
    }

    let mut current: Option<&str> = None;
    for result in &summary.results {
        if current != Some(result.dataset.as_str()) {
            println!("\n==== Dataset: {} ({} keys) ====", result.dataset, result.num_keys);
            current = Some(result.dataset.as_str());
        }
        println!(
            "{:<10} build {:>9.4} s  mem {:>10.1} KB  lookup mean {:>8.1} ns  p95 {:>8.1} ns  p99 {:>8.1} ns{}",
            label(result),
            result.build_time_s,
            result.mem_bytes as f64 / 1024.0,
            result.lookup.mean_ns,
            result.lookup.p95_ns,
            result.lookup.p99_ns,
            sanity_note(result),
        );
    }
}

fn label(result: &IndexResult) -> String {
    result
        .num_leaves
        .map_or_else(|| result.index.to_string(), |leaves| format!("{}({leaves})", result.index))
}

fn sanity_note(result: &IndexResult) -> String {
    match result.sanity.and_then(|s| s.mismatch) {
        Some(m) => format!(
            "  [SANITY] {} mismatch on key {} (got {:?})",
            m.index, m.key, m.position
        ),
        None => String::new(),
    }
}
