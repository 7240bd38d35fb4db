//! Batch conversion of RW5 files.
//!
//! Discovers input files, runs one [`SurveyProcessor`] per file on the
//! blocking pool with bounded concurrency, and writes one feature table per
//! input. A failing file is reported and counted without stopping the batch.

use crate::config::ProcessorConfig;
use crate::error::{Result, Rw5Error};
use crate::models::ProcessingStats;
use crate::processor::SurveyProcessor;
use crate::writer::FeatureTableWriter;

use colored::*;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::task;
use tracing::{debug, error, info};
use walkdir::WalkDir;

/// Outcome of converting a single file
#[derive(Debug, Clone)]
pub struct FileReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub features: usize,
    pub diagnostics: usize,
}

/// Drives conversion of a file or a directory tree of RW5 files
pub struct BatchRunner {
    input_path: PathBuf,
    output_path: Option<PathBuf>,
    config: ProcessorConfig,
}

impl BatchRunner {
    pub fn new(input_path: PathBuf, output_path: Option<PathBuf>) -> Result<Self> {
        if !input_path.exists() {
            return Err(Rw5Error::InputNotFound { path: input_path });
        }

        Ok(Self {
            input_path,
            output_path,
            config: ProcessorConfig::default(),
        })
    }

    pub fn with_config(mut self, config: ProcessorConfig) -> Self {
        self.config = config;
        self
    }

    /// Find every input file, sorted for stable output ordering
    pub fn discover_files(&self) -> Result<Vec<PathBuf>> {
        if self.input_path.is_file() {
            return Ok(vec![self.input_path.clone()]);
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&self.input_path) {
            let entry = entry.map_err(|e| Rw5Error::ProcessingFailed {
                path: self.input_path.clone(),
                reason: format!("Failed to walk directory: {}", e),
            })?;
            if entry.file_type().is_file() && has_extension(entry.path(), &self.config.input_extension)
            {
                files.push(entry.into_path());
            }
        }
        files.sort();

        debug!(
            "Found {} .{} files under {}",
            files.len(),
            self.config.input_extension,
            self.input_path.display()
        );
        Ok(files)
    }

    /// Output table path for one input file
    ///
    /// A single-file input writes to the `-o` path verbatim. Directory inputs
    /// mirror their relative layout under the output directory.
    pub fn output_path_for(&self, file: &Path) -> PathBuf {
        let extension = self.config.output.format.extension();

        if self.input_path.is_file() {
            return match &self.output_path {
                Some(path) => path.clone(),
                None => file.with_extension(extension),
            };
        }

        let relative = file.strip_prefix(&self.input_path).unwrap_or(file);
        self.output_path
            .as_deref()
            .unwrap_or(&self.input_path)
            .join(relative)
            .with_extension(extension)
    }

    /// Convert every discovered file
    pub async fn run(&self) -> Result<ProcessingStats> {
        let start_time = Instant::now();
        self.config.validate()?;

        println!(
            "{}",
            "Starting RW5 conversion".bright_green().bold()
        );
        println!("  {} {}", "Input:".bright_cyan(), self.input_path.display());
        println!("  {} {:?}", "Mode:".bright_cyan(), self.config.mode);

        let files = self.discover_files()?;
        println!(
            "  {} {} RW5 files",
            "Found".bright_green(),
            files.len().to_string().bright_white().bold()
        );

        let mut stats = ProcessingStats::default();
        if files.is_empty() {
            return Ok(stats);
        }

        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .map_err(|e| Rw5Error::Configuration {
                    message: format!("Invalid progress template: {}", e),
                })?
                .progress_chars("#>-"),
        );

        let concurrent_limit = self.config.max_concurrent_files.min(files.len());
        let results: Vec<Result<FileReport>> = stream::iter(files)
            .map(|file| {
                let output = self.output_path_for(&file);
                let config = self.config.clone();
                let pb = pb.clone();
                async move {
                    if let Some(name) = file.file_name() {
                        pb.set_message(format!("Processing: {}", name.to_string_lossy()));
                    }
                    let result = task::spawn_blocking({
                        let file = file.clone();
                        move || convert_file(&file, output, config)
                    })
                    .await
                    .map_err(|e| Rw5Error::ProcessingFailed {
                        path: file.clone(),
                        reason: format!("Conversion task failed: {}", e),
                    })
                    .and_then(|result| result);
                    pb.inc(1);

                    if let Err(e) = &result {
                        error!("Failed to process {}: {}", file.display(), e);
                    }
                    result
                }
            })
            .buffer_unordered(concurrent_limit)
            .collect()
            .await;

        pb.finish_with_message("All RW5 files processed");

        for result in results {
            match result {
                Ok(report) => {
                    stats.files_processed += 1;
                    stats.total_features += report.features;
                    stats.total_diagnostics += report.diagnostics;
                    stats.output_paths.push(report.output);
                }
                Err(_) => stats.files_failed += 1,
            }
        }
        stats.output_paths.sort();
        stats.processing_time_ms = start_time.elapsed().as_millis();

        print_summary(&stats);
        Ok(stats)
    }
}

/// Parse one file and write its feature table
pub fn convert_file(input: &Path, output: PathBuf, config: ProcessorConfig) -> Result<FileReport> {
    let bytes = std::fs::read(input)?;
    let text = String::from_utf8_lossy(&bytes);

    let writer = FeatureTableWriter::new(output, config.output.clone());
    let survey = SurveyProcessor::new(config).process_text(&text).map_err(|e| match e {
        Rw5Error::Io(_) | Rw5Error::Polars(_) => e,
        other => Rw5Error::ProcessingFailed {
            path: input.to_path_buf(),
            reason: other.to_string(),
        },
    })?;
    let features = writer.write(&survey.features)?;

    info!(
        "{}: {} features, {} diagnostics -> {}",
        input.display(),
        features,
        survey.diagnostics.len(),
        writer.output_path().display()
    );

    Ok(FileReport {
        input: input.to_path_buf(),
        output: writer.output_path().to_path_buf(),
        features,
        diagnostics: survey.diagnostics.len(),
    })
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}

fn print_summary(stats: &ProcessingStats) {
    println!("\n{}", "Conversion Summary".bright_green().bold());
    println!(
        "  {} {}ms",
        "Time elapsed:".bright_cyan(),
        stats.processing_time_ms.to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Files processed:".bright_cyan(),
        stats.files_processed.to_string().bright_white()
    );
    if stats.files_failed > 0 {
        println!(
            "  {} {}",
            "Files failed:".bright_red(),
            stats.files_failed.to_string().bright_red().bold()
        );
    }
    println!(
        "  {} {}",
        "Features written:".bright_cyan(),
        stats.total_features.to_string().bright_white().bold()
    );
    if stats.total_diagnostics > 0 {
        println!(
            "  {} {}",
            "Diagnostics:".bright_yellow(),
            stats.total_diagnostics.to_string().bright_yellow()
        );
    }
}
