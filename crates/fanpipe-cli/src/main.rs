#![doc = include_str!("../README.md")]

mod config;
mod telemetry;

use clap::Parser;
use config::{CliArgs, RunConfig};
use fanpipe::{Pipeline, Report};
use std::io::Write;
use telemetry::init_telemetry;

// Using mimalloc for better performance under contention, especially in musl
// environments.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = RunConfig::try_from(args)?;

    init_telemetry()?;
    log_startup_info(&config);

    let pipeline = Pipeline::new(config.pipeline)?;
    let report = pipeline.execute().await?;

    report_and_verify(&report, config.json, &mut std::io::stdout().lock())
}

fn log_startup_info(_config: &RunConfig) {
    if cfg!(debug_assertions) {
        #[cfg(feature = "tracing")]
        tracing::info!("Starting pipeline with full config: {:#?}", _config);
    } else {
        #[cfg(feature = "tracing")]
        tracing::info!(
            "Starting pipeline with {} workers for {:?}",
            _config.pipeline.num_workers,
            _config.pipeline.timeout
        );
    }
}

/// Writes the report, then checks it.
///
/// The report is written even when verification fails, so a broken run still
/// shows its numbers. A failed invariant is returned as the error, which makes
/// the process exit non-zero with a message naming the failed equality.
fn report_and_verify(report: &Report, json: bool, out: &mut impl Write) -> anyhow::Result<()> {
    if json {
        serde_json::to_writer(&mut *out, report)?;
        writeln!(out)?;
    } else {
        writeln!(out, "{report}")?;
    }
    out.flush()?;

    report.verify()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::time::Duration;
    use fanpipe::{Error, Tally, WorkerCounts};

    fn sample(collected: Tally) -> Report {
        Report {
            generated: Tally { count: 3, sum: 6 },
            collected,
            workers: WorkerCounts::from(vec![2, 1]),
            forwarded: WorkerCounts::from(vec![2, 1]),
            elapsed: Duration::from_millis(5),
        }
    }

    #[test]
    fn consistent_run_prints_report_and_succeeds() {
        let mut out = Vec::new();
        let report = sample(Tally { count: 3, sum: 6 });
        report_and_verify(&report, false, &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Items: generated 3 collected 3\n\
             Sum: generated 6 collected 6\n\
             Per-worker: [2, 1]\n"
        );
    }

    #[test]
    fn failed_check_still_prints_report_then_errors() {
        let mut out = Vec::new();
        let report = sample(Tally { count: 2, sum: 3 });
        let err = report_and_verify(&report, false, &mut out).unwrap_err();

        let printed = String::from_utf8(out).unwrap();
        assert!(printed.starts_with("Items: generated 3 collected 2\n"));
        assert!(printed.contains("Sum: generated 6 collected 3"));

        assert_eq!(
            err.downcast_ref::<Error>(),
            Some(&Error::SumMismatch {
                generated: 6,
                collected: 3
            })
        );
        assert_eq!(err.to_string(), "sums differ: generated 6 != collected 3");
    }

    #[test]
    fn json_output_is_a_single_line() {
        let mut out = Vec::new();
        let report = sample(Tally { count: 3, sum: 6 });
        report_and_verify(&report, true, &mut out).unwrap();

        let printed = String::from_utf8(out).unwrap();
        assert_eq!(printed.lines().count(), 1);
        let json: serde_json::Value = serde_json::from_str(&printed).unwrap();
        assert_eq!(json["workers"], serde_json::json!([2, 1]));
    }
}
