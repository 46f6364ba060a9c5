use anyhow::bail;
use clap::Parser;
use core::time::Duration;
use fanpipe::{PipelineConfig, config};

/// Runtime configuration for the `fanpipe` binary.
///
/// These settings control the length of the generation window, the width of
/// the fan-out and the per-item work delay. All values are parsed from CLI
/// arguments or environment variables (a `.env` file is honoured), with
/// defaults matching the reference run: one second, five workers, one
/// millisecond per item.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "fanpipe",
    version,
    about = "Runs a fan-out/fan-in integer pipeline and verifies nothing was lost in transit"
)]
pub struct CliArgs {
    /// How long the generator produces items, in milliseconds.
    ///
    /// Only the generator is time-bounded; every downstream stage drains
    /// whatever was generated before exiting, so a run takes slightly longer
    /// than this.
    ///
    /// Environment variable: `FANPIPE_TIMEOUT_MS`
    #[arg(long, env = "FANPIPE_TIMEOUT_MS", default_value_t = config::DEFAULT_TIMEOUT.as_millis() as u64)]
    pub timeout_ms: u64,

    /// Number of worker tasks sharing the intake channel.
    ///
    /// Environment variable: `FANPIPE_NUM_WORKERS`
    #[arg(short = 'n', long, env = "FANPIPE_NUM_WORKERS", default_value_t = config::DEFAULT_NUM_WORKERS)]
    pub num_workers: usize,

    /// Time each worker spends on an item before forwarding it, in
    /// microseconds. Zero disables the delay.
    ///
    /// Environment variable: `FANPIPE_DELAY_US`
    #[arg(long, env = "FANPIPE_DELAY_US", default_value_t = config::DEFAULT_DELAY.as_micros() as u64)]
    pub delay_us: u64,

    /// Print the run report as a single JSON object instead of three lines.
    ///
    /// Environment variable: `FANPIPE_JSON`
    #[arg(long, env = "FANPIPE_JSON", default_value_t = false)]
    pub json: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct RunConfig {
    pub pipeline: PipelineConfig,
    pub json: bool,
}

impl TryFrom<CliArgs> for RunConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.num_workers == 0 {
            bail!("FANPIPE_NUM_WORKERS must be greater than 0");
        }

        if args.timeout_ms == 0 {
            bail!("FANPIPE_TIMEOUT_MS must be greater than 0");
        }

        let pipeline = PipelineConfig::default()
            .with_timeout(Duration::from_millis(args.timeout_ms))
            .with_num_workers(args.num_workers)
            .with_delay(Duration::from_micros(args.delay_us));

        Ok(Self {
            pipeline,
            json: args.json,
        })
    }
}
