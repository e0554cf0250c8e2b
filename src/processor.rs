//! File-level processing pipeline.
//!
//! Orchestrates the conversion of extracted tsf files: input discovery,
//! decoding, timestamp materialization, table flattening and export to
//! `<output>/<dataset>/<dataset>.<ext>`. A failing file is reported and
//! counted without stopping the remaining files.

use crate::config::{DecodeConfig, ExportConfig, MaterializeConfig};
use crate::constants::{DEFAULT_OUTPUT_DIR, TSF_EXTENSION};
use crate::error::{Result, TsfError};
use crate::frame::{materialization_to_frame, write_frame};
use crate::materialize::Materializer;
use crate::models::Dataset;
use crate::tsf::{DecodeStats, TsfDecoder};

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Processing statistics across all input files
#[derive(Debug, Clone, Default)]
pub struct ProcessingStats {
    pub files_processed: usize,
    pub files_failed: usize,
    pub series_written: usize,
    pub series_skipped: usize,
    pub records_written: usize,
    pub output_paths: Vec<PathBuf>,
    pub failures: Vec<FileFailure>,
    pub processing_time: Duration,
}

impl ProcessingStats {
    fn record(&mut self, outcome: FileOutcome) {
        self.files_processed += 1;
        self.series_written += outcome.series_written;
        self.series_skipped += outcome.series_skipped;
        self.records_written += outcome.records_written;
        self.output_paths.push(outcome.output_path);
    }
}

/// A file that could not be converted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub path: PathBuf,
    /// Line where decoding stopped, when the failure came from the decoder
    pub line: Option<usize>,
    pub message: String,
}

/// Result of converting one tsf file
#[derive(Debug, Clone)]
pub struct FileOutcome {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub series_written: usize,
    pub series_skipped: usize,
    pub records_written: usize,
}

/// Open and decode one tsf file
pub fn decode_file(path: &Path, config: &DecodeConfig) -> Result<(Dataset, DecodeStats)> {
    let file = File::open(path)?;
    TsfDecoder::new(config.clone())
        .decode_with_stats(BufReader::new(file))
        .map_err(|source| TsfError::Decode {
            path: path.to_path_buf(),
            source,
        })
}

/// Find the tsf files designated by `input_path`
///
/// A file is taken as is; a directory is scanned (non-recursively) for
/// `*.tsf` files, sorted by name.
pub fn discover_tsf_files(input_path: &Path) -> Result<Vec<PathBuf>> {
    if !input_path.exists() {
        return Err(TsfError::InvalidInputPath {
            path: input_path.to_path_buf(),
        });
    }
    if input_path.is_file() {
        return Ok(vec![input_path.to_path_buf()]);
    }

    let pattern = input_path.join(format!("*.{}", TSF_EXTENSION));
    let pattern_str = pattern.to_string_lossy();
    debug!("Searching for tsf files with pattern: {}", pattern_str);

    let entries = glob::glob(&pattern_str).map_err(|e| TsfError::Configuration {
        message: format!("Invalid search pattern {}: {}", pattern_str, e),
    })?;

    let mut files = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) if path.is_file() => files.push(path),
            Ok(_) => {}
            Err(e) => warn!("Skipping unreadable path: {}", e),
        }
    }
    files.sort();

    if files.is_empty() {
        return Err(TsfError::NoInputFiles {
            path: input_path.to_path_buf(),
        });
    }
    Ok(files)
}

/// Name of the dataset a tsf file holds (its file stem)
pub fn dataset_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "dataset".to_string())
}

/// Converter from tsf files to long-format tables
#[derive(Debug, Clone)]
pub struct TsfProcessor {
    input_path: PathBuf,
    output_dir: PathBuf,
    decode_config: DecodeConfig,
    materialize_config: MaterializeConfig,
    export_config: ExportConfig,
    show_progress: bool,
}

impl TsfProcessor {
    /// Create a processor for a tsf file or a directory of tsf files
    pub fn new(input_path: PathBuf, output_dir: Option<PathBuf>) -> Result<Self> {
        if !input_path.exists() {
            return Err(TsfError::InvalidInputPath { path: input_path });
        }

        Ok(Self {
            input_path,
            output_dir: output_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            decode_config: DecodeConfig::default(),
            materialize_config: MaterializeConfig::default(),
            export_config: ExportConfig::default(),
            show_progress: false,
        })
    }

    pub fn with_decode_config(mut self, config: DecodeConfig) -> Self {
        self.decode_config = config;
        self
    }

    pub fn with_materialize_config(mut self, config: MaterializeConfig) -> Self {
        self.materialize_config = config;
        self
    }

    pub fn with_export_config(mut self, config: ExportConfig) -> Self {
        self.export_config = config;
        self
    }

    /// Show a progress bar while processing
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Where the table for `input` is written
    pub fn output_path_for(&self, input: &Path) -> PathBuf {
        let name = dataset_name(input);
        self.output_dir
            .join(&name)
            .join(format!("{}.{}", name, self.export_config.format.extension()))
    }

    /// Convert every discovered file
    pub fn process(&self) -> Result<ProcessingStats> {
        let start_time = Instant::now();
        let files = discover_tsf_files(&self.input_path)?;
        info!(
            "Found {} tsf files under {}",
            files.len(),
            self.input_path.display()
        );

        let pb = if self.show_progress {
            let pb = ProgressBar::new(files.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("#>-"),
            );
            pb
        } else {
            ProgressBar::hidden()
        };

        let mut stats = ProcessingStats::default();
        for path in &files {
            pb.set_message(dataset_name(path));
            match self.process_file(path) {
                Ok(outcome) => stats.record(outcome),
                Err(e) => {
                    error!("Failed to process {}: {}", path.display(), e);
                    stats.files_failed += 1;
                    stats.failures.push(FileFailure {
                        path: path.clone(),
                        line: e.line(),
                        message: e.to_string(),
                    });
                }
            }
            pb.inc(1);
        }
        pb.finish_and_clear();

        if stats.files_processed == 0 {
            warn!("No files were successfully processed");
        }

        stats.processing_time = start_time.elapsed();
        Ok(stats)
    }

    /// Convert a single tsf file
    pub fn process_file(&self, path: &Path) -> Result<FileOutcome> {
        info!("Parsing file: {}", path.display());
        let (dataset, decode_stats) = decode_file(path, &self.decode_config)?;

        debug!(
            "Decoded {} series from {} lines ({:.1}% missing values)",
            decode_stats.series_decoded,
            decode_stats.lines_read,
            decode_stats.missing_rate()
        );
        if dataset.meta.contains_equal_length == Some(true) && !dataset.has_equal_lengths() {
            warn!(
                "{} declares @equallength true but series lengths differ",
                path.display()
            );
        }

        let materialization = Materializer::new(self.materialize_config.clone()).materialize(&dataset)?;
        info!(
            "Identified frequency: {}, forecast horizon: {}",
            materialization.frequency(),
            dataset
                .meta
                .forecast_horizon
                .map(|h| h.to_string())
                .unwrap_or_else(|| "-".to_string())
        );
        let mut df =
            materialization_to_frame(&materialization, &self.decode_config.value_column_name)?;

        let output_path = self.output_path_for(path);
        self.prepare_dataset_dir(path, &output_path)?;
        let records_written = write_frame(&mut df, &output_path, &self.export_config)?;

        Ok(FileOutcome {
            input_path: path.to_path_buf(),
            output_path,
            series_written: materialization.series_count(),
            series_skipped: materialization.diagnostics().len(),
            records_written,
        })
    }

    /// Create the dataset directory, recreating it when `force` is set
    ///
    /// A dataset directory that contains the input file is never removed.
    fn prepare_dataset_dir(&self, input: &Path, output_path: &Path) -> Result<()> {
        let Some(dataset_dir) = output_path.parent() else {
            return Ok(());
        };

        if dataset_dir.exists() {
            let input = fs::canonicalize(input)?;
            if input.starts_with(fs::canonicalize(dataset_dir)?) {
                return Err(TsfError::Configuration {
                    message: format!(
                        "Output directory {} contains the input file {}; choose another output root",
                        dataset_dir.display(),
                        input.display()
                    ),
                });
            }
            if !self.export_config.force {
                return Err(TsfError::OutputExists {
                    path: dataset_dir.to_path_buf(),
                });
            }
            debug!("Recreating dataset directory {}", dataset_dir.display());
            fs::remove_dir_all(dataset_dir)?;
        }

        fs::create_dir_all(dataset_dir)?;
        Ok(())
    }
}

/// Print a processing summary to stdout
pub fn print_summary(stats: &ProcessingStats) {
    println!("\n{}", "Processing Summary".bright_green().bold());
    println!(
        "  {} {}ms",
        "Time elapsed:".bright_cyan(),
        stats.processing_time.as_millis().to_string().bright_white()
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
        "Series written:".bright_cyan(),
        stats.series_written.to_string().bright_white()
    );
    if stats.series_skipped > 0 {
        println!(
            "  {} {}",
            "Series skipped:".bright_yellow(),
            stats.series_skipped.to_string().bright_yellow()
        );
    }
    println!(
        "  {} {}",
        "Records written:".bright_cyan(),
        stats.records_written.to_string().bright_white().bold()
    );
    for path in &stats.output_paths {
        println!("  {} {}", "Output:".bright_cyan(), path.display());
    }
    for failure in &stats.failures {
        let location = failure
            .line
            .map(|line| format!(" (line {})", line))
            .unwrap_or_default();
        println!(
            "  {} {}{}",
            "Failed:".bright_red(),
            failure.path.display(),
            location
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExportFormat;
    use tempfile::TempDir;

    const YEARLY: &str = "@attribute series_name string\n\
                          @attribute start_timestamp date\n\
                          @frequency yearly\n\
                          @horizon 4\n\
                          @data\n\
                          T1:1979-01-01 00-00-00:10,20,?,40\n\
                          T2:1980-01-01 00-00-00:1,2\n";

    fn write_tsf(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_nonexistent_input_path() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nonexistent");

        match TsfProcessor::new(missing.clone(), None).unwrap_err() {
            TsfError::InvalidInputPath { path } => assert_eq!(path, missing),
            other => panic!("Expected InvalidInputPath error, got {:?}", other),
        }
    }

    #[test]
    fn test_discover_directory() {
        let temp_dir = TempDir::new().unwrap();
        write_tsf(temp_dir.path(), "b_dataset.tsf", YEARLY);
        write_tsf(temp_dir.path(), "a_dataset.tsf", YEARLY);
        write_tsf(temp_dir.path(), "notes.txt", "not a dataset");

        let files = discover_tsf_files(temp_dir.path()).unwrap();
        let names: Vec<String> = files.iter().map(|p| dataset_name(p)).collect();
        assert_eq!(names, vec!["a_dataset", "b_dataset"]);
    }

    #[test]
    fn test_discover_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        assert!(matches!(
            discover_tsf_files(temp_dir.path()).unwrap_err(),
            TsfError::NoInputFiles { .. }
        ));
    }

    #[test]
    fn test_process_single_file() {
        let temp_dir = TempDir::new().unwrap();
        let input = write_tsf(temp_dir.path(), "m1_yearly_dataset.tsf", YEARLY);
        let output_dir = temp_dir.path().join("out");

        let processor = TsfProcessor::new(input, Some(output_dir.clone())).unwrap();
        let stats = processor.process().unwrap();

        assert_eq!(stats.files_processed, 1);
        assert_eq!(stats.files_failed, 0);
        assert_eq!(stats.series_written, 2);
        assert_eq!(stats.records_written, 6);

        let expected = output_dir
            .join("m1_yearly_dataset")
            .join("m1_yearly_dataset.csv");
        assert_eq!(stats.output_paths, vec![expected.clone()]);

        let content = fs::read_to_string(expected).unwrap();
        assert_eq!(content.lines().count(), 7);
        assert!(content.starts_with("unique_id,ds,series_value"));
    }

    #[test]
    fn test_failed_file_does_not_stop_others() {
        let temp_dir = TempDir::new().unwrap();
        let input_dir = temp_dir.path().join("staging");
        fs::create_dir_all(&input_dir).unwrap();
        write_tsf(&input_dir, "good.tsf", YEARLY);
        write_tsf(&input_dir, "bad.tsf", "@data\nT1:1,2\n");

        let processor =
            TsfProcessor::new(input_dir.clone(), Some(temp_dir.path().join("out"))).unwrap();
        let stats = processor.process().unwrap();

        assert_eq!(stats.files_processed, 1);
        assert_eq!(stats.files_failed, 1);
        assert_eq!(stats.failures.len(), 1);
        assert_eq!(stats.failures[0].path, input_dir.join("bad.tsf"));
        assert_eq!(stats.failures[0].line, Some(1));
    }

    #[test]
    fn test_existing_output_requires_force() {
        let temp_dir = TempDir::new().unwrap();
        let input = write_tsf(temp_dir.path(), "tourism.tsf", YEARLY);
        let output_dir = temp_dir.path().join("out");

        let processor = TsfProcessor::new(input.clone(), Some(output_dir.clone())).unwrap();
        processor.process_file(&input).unwrap();

        assert!(matches!(
            processor.process_file(&input).unwrap_err(),
            TsfError::OutputExists { .. }
        ));

        let forced = processor.with_export_config(ExportConfig::default().with_force());
        forced.process_file(&input).unwrap();
    }

    #[test]
    fn test_force_never_removes_input_directory() {
        let temp_dir = TempDir::new().unwrap();
        let output_dir = temp_dir.path().join("data");
        let dataset_dir = output_dir.join("m4");
        fs::create_dir_all(&dataset_dir).unwrap();
        let input = write_tsf(&dataset_dir, "m4.tsf", YEARLY);

        let processor = TsfProcessor::new(input.clone(), Some(output_dir))
            .unwrap()
            .with_export_config(ExportConfig::default().with_force());

        assert!(matches!(
            processor.process_file(&input).unwrap_err(),
            TsfError::Configuration { .. }
        ));
        assert_eq!(fs::read_to_string(&input).unwrap(), YEARLY);
    }

    #[test]
    fn test_parquet_output_path() {
        let temp_dir = TempDir::new().unwrap();
        let input = write_tsf(temp_dir.path(), "m4.tsf", YEARLY);

        let processor = TsfProcessor::new(input.clone(), Some(PathBuf::from("/tmp/out")))
            .unwrap()
            .with_export_config(ExportConfig::default().with_format(ExportFormat::Parquet));
        assert_eq!(
            processor.output_path_for(&input),
            PathBuf::from("/tmp/out/m4/m4.parquet")
        );
    }

    #[test]
    fn test_decode_file_error_carries_path() {
        let temp_dir = TempDir::new().unwrap();
        let input = write_tsf(temp_dir.path(), "empty.tsf", "");

        match decode_file(&input, &DecodeConfig::default()).unwrap_err() {
            TsfError::Decode { path, source } => {
                assert_eq!(path, input);
                assert!(matches!(source, crate::error::DecodeError::EmptyFile));
            }
            other => panic!("Expected Decode error, got {:?}", other),
        }
    }
}
