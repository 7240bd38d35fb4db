//! Command-line interface components.

use crate::config::{CompressionAlgorithm, EmissionMode, OutputConfig, OutputFormat, ProcessorConfig};
use crate::models::ProcessingStats;
use crate::runner::BatchRunner;
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "rw5")]
#[command(about = "Convert Carlson RW5 total-station logs to point tables")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// RW5 file, or a directory scanned recursively for .rw5 files
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output file (single input) or directory (directory input)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Emit final coordinates or raw observations
    #[arg(long, value_enum, default_value_t = EmissionMode::Computed)]
    pub mode: EmissionMode,

    /// Output table format
    #[arg(long, value_enum, default_value_t = OutputFormat::Parquet)]
    pub format: OutputFormat,

    /// Parquet compression algorithm (snappy, zstd, lz4, none)
    #[arg(long, default_value = "snappy")]
    pub compression: String,

    /// Fail a file on degenerate shot geometry instead of skipping the shot
    #[arg(long)]
    pub strict_geometry: bool,

    /// Maximum number of files converted concurrently
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Build the processor configuration from the command line
    pub fn to_config(&self) -> Result<ProcessorConfig> {
        let compression = CompressionAlgorithm::parse(&self.compression)?;

        let mut config = ProcessorConfig::default()
            .with_mode(self.mode)
            .with_output(OutputConfig {
                format: self.format,
                compression,
            });
        if self.strict_geometry {
            config = config.with_strict_geometry();
        }
        if let Some(jobs) = self.jobs {
            config = config.with_max_concurrent_files(jobs);
        }

        config.validate()?;
        Ok(config)
    }
}

/// Install the stderr log subscriber
pub fn init_logging(verbose: bool) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("rw5_processor={}", level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

/// Run a conversion; any failed file fails the command
pub async fn run(args: Args) -> Result<ProcessingStats> {
    init_logging(args.verbose);
    debug!("Command line arguments: {:?}", args);

    let config = args.to_config()?;
    let runner = BatchRunner::new(args.input.clone(), args.output.clone())?.with_config(config);
    let stats = runner
        .run()
        .await
        .with_context(|| format!("Failed to convert {}", args.input.display()))?;

    if stats.files_failed > 0 {
        anyhow::bail!(
            "{} of {} files failed to convert",
            stats.files_failed,
            stats.files_failed + stats.files_processed
        );
    }
    Ok(stats)
}
