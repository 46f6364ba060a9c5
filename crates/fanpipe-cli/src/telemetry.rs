//! # Telemetry
//!
//! Structured logging for the `fanpipe` binary via `tracing-subscriber`.
//!
//! ## Feature matrix
//!
//! - `tracing` (default): Enables the `tracing` events emitted by the
//!   `fanpipe` library (stage lifecycle, run summary, verification outcome).
//!
//! Without `tracing` the subscriber is still installed, but nothing in the
//! pipeline emits events.
//!
//! ## Output
//!
//! Logs go to stderr so that stdout carries only the run report. The level is
//! taken from `RUST_LOG` and defaults to `info`:
//!
//! ```bash
//! RUST_LOG=fanpipe=trace cargo run --bin fanpipe -- --timeout-ms 100
//! ```

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub fn init_telemetry() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_thread_ids(true)
                .with_line_number(true)
                .with_target(false)
                .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
                .with_file(true),
        )
        .try_init()?;

    Ok(())
}
