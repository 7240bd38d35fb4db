//! Configuration management and validation.
//!
//! Provides configuration structures for the survey stream processor,
//! the batch driver and the feature table writer.

use crate::constants::{RW5_EXTENSION, TEXT_COMMENT_PREFIX};
use crate::error::{Result, Rw5Error};
use polars::prelude::ParquetCompression;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Which feature stream the processor emits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EmissionMode {
    /// Final coordinates only
    Computed,
    /// Stations, backsights and observations with full provenance
    Raw,
}

/// What to do when a shot resolves to degenerate geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeometryPolicy {
    /// Skip the offending shot and record a diagnostic
    SkipShot,
    /// Fail the whole run
    Abort,
}

/// Output table formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Parquet,
    Csv,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Parquet => "parquet",
            OutputFormat::Csv => "csv",
        }
    }
}

/// Supported compression algorithms for parquet files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompressionAlgorithm {
    /// Snappy compression - good balance of speed and compression
    Snappy,
    /// ZSTD compression - better compression ratio, slower
    Zstd,
    /// LZ4 compression - fastest, lower compression ratio
    Lz4,
    /// No compression
    Uncompressed,
}

impl CompressionAlgorithm {
    /// Convert to polars ParquetCompression type
    pub fn to_polars_compression(&self) -> ParquetCompression {
        match self {
            CompressionAlgorithm::Snappy => ParquetCompression::Snappy,
            CompressionAlgorithm::Zstd => ParquetCompression::Zstd(None),
            CompressionAlgorithm::Lz4 => ParquetCompression::Lz4Raw,
            CompressionAlgorithm::Uncompressed => ParquetCompression::Uncompressed,
        }
    }

    /// Parse the CLI spelling of a compression algorithm
    pub fn parse(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "snappy" => Ok(CompressionAlgorithm::Snappy),
            "zstd" => Ok(CompressionAlgorithm::Zstd),
            "lz4" => Ok(CompressionAlgorithm::Lz4),
            "none" | "uncompressed" => Ok(CompressionAlgorithm::Uncompressed),
            other => Err(Rw5Error::Configuration {
                message: format!(
                    "Unknown compression '{}' (expected snappy, zstd, lz4 or none)",
                    other
                ),
            }),
        }
    }
}

/// Feature table output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub compression: CompressionAlgorithm,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Parquet,
            compression: CompressionAlgorithm::Snappy,
        }
    }
}

/// Global configuration for RW5 processing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessorConfig {
    /// Feature stream to emit
    pub mode: EmissionMode,

    /// Handling of shots with degenerate geometry
    pub geometry_policy: GeometryPolicy,

    /// Prefix of free-text comment lines dropped before classification
    pub comment_prefix: String,

    /// File extension scanned for when the input is a directory
    pub input_extension: String,

    /// Maximum number of files converted concurrently
    pub max_concurrent_files: usize,

    /// Output table configuration
    pub output: OutputConfig,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            mode: EmissionMode::Computed,
            geometry_policy: GeometryPolicy::SkipShot,
            comment_prefix: TEXT_COMMENT_PREFIX.to_string(),
            input_extension: RW5_EXTENSION.to_string(),
            max_concurrent_files: num_cpus::get(),
            output: OutputConfig::default(),
        }
    }
}

impl ProcessorConfig {
    /// Create configuration with a specific emission mode
    pub fn with_mode(mut self, mode: EmissionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Fail the run on degenerate geometry instead of skipping the shot
    pub fn with_strict_geometry(mut self) -> Self {
        self.geometry_policy = GeometryPolicy::Abort;
        self
    }

    /// Set maximum concurrent files
    pub fn with_max_concurrent_files(mut self, max_files: usize) -> Self {
        self.max_concurrent_files = max_files;
        self
    }

    /// Configure the output table
    pub fn with_output(mut self, output: OutputConfig) -> Self {
        self.output = output;
        self
    }

    /// Check settings that would make a run meaningless
    pub fn validate(&self) -> Result<()> {
        if self.max_concurrent_files == 0 {
            return Err(Rw5Error::Configuration {
                message: "max_concurrent_files must be at least 1".to_string(),
            });
        }
        if self.comment_prefix.is_empty() {
            return Err(Rw5Error::Configuration {
                message: "comment_prefix must not be empty".to_string(),
            });
        }
        debug!(
            "Configuration: mode={:?}, geometry={:?}, jobs={}, output={:?}",
            self.mode, self.geometry_policy, self.max_concurrent_files, self.output
        );
        Ok(())
    }
}
