//! Command runners for the tsf processor CLI

use crate::cli::args::{Commands, ConvertArgs, InspectArgs};
use crate::config::DecodeConfig;
use crate::materialize::Frequency;
use crate::models::Dataset;
use crate::processor::{TsfProcessor, decode_file, print_summary};
use crate::tsf::DecodeStats;

use anyhow::{Context, Result};
use colored::*;
use tracing::{debug, info};

/// Dispatch a parsed subcommand
pub fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Convert(args) => run_convert(&args),
        Commands::Inspect(args) => run_inspect(&args),
    }
}

/// Set up structured logging on stderr
pub fn setup_logging(log_level: &str, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tsf_processor={}", log_level)));

    if quiet {
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
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    debug!("Logging initialized at level: {}", log_level);
}

/// Convert tsf files into long-format tables
pub fn run_convert(args: &ConvertArgs) -> Result<()> {
    setup_logging(args.get_log_level(), args.quiet);
    debug!("Command line arguments: {:?}", args);

    let processor = TsfProcessor::new(args.input_path.clone(), args.output_path.clone())?
        .with_decode_config(args.decode_config())
        .with_materialize_config(args.materialize_config())
        .with_export_config(args.export_config())
        .with_progress(args.show_progress());

    let stats = processor
        .process()
        .with_context(|| format!("Failed to convert {}", args.input_path.display()))?;
    info!(
        "Converted {} files ({} failed)",
        stats.files_processed, stats.files_failed
    );

    if !args.quiet {
        print_summary(&stats);
    }
    Ok(())
}

/// Print the metadata and shape of a tsf file
pub fn run_inspect(args: &InspectArgs) -> Result<()> {
    setup_logging(args.get_log_level(), false);

    let config = DecodeConfig::default();
    let (dataset, stats) = decode_file(&args.input_path, &config)
        .with_context(|| format!("Failed to inspect {}", args.input_path.display()))?;
    print_inspection(&args.input_path.display().to_string(), &dataset, &stats);
    Ok(())
}

fn print_inspection(name: &str, dataset: &Dataset, stats: &DecodeStats) {
    println!("\n{} {}", "Dataset".bright_green().bold(), name.bright_white());

    println!("  {}", "Attributes:".bright_cyan());
    for attribute in &dataset.schema {
        let note = if attribute.kind().is_none() {
            " (unsupported)".bright_red().to_string()
        } else {
            String::new()
        };
        println!("    {} {}{}", attribute.name, attribute.type_name, note);
    }

    let frequency = match dataset.meta.frequency.as_deref() {
        Some(declared) if declared.parse::<Frequency>().is_ok() => declared.bright_white(),
        Some(declared) => format!("{} (not materializable)", declared).bright_yellow(),
        None => "-".normal(),
    };
    println!("  {} {}", "Frequency:".bright_cyan(), frequency);
    println!(
        "  {} {}",
        "Forecast horizon:".bright_cyan(),
        dataset
            .meta
            .forecast_horizon
            .map(|h| h.to_string())
            .unwrap_or_else(|| "-".to_string())
    );
    println!(
        "  {} {}",
        "Missing values declared:".bright_cyan(),
        flag(dataset.meta.contains_missing)
    );
    println!(
        "  {} {}",
        "Equal length declared:".bright_cyan(),
        flag(dataset.meta.contains_equal_length)
    );

    println!(
        "  {} {}",
        "Series:".bright_cyan(),
        dataset.series.len().to_string().bright_white().bold()
    );
    if let Some((shortest, longest)) = dataset.length_range() {
        println!(
            "  {} {} - {}",
            "Series length:".bright_cyan(),
            shortest,
            longest
        );
    }
    println!(
        "  {} {} ({} missing, {:.1}%)",
        "Values:".bright_cyan(),
        stats.values_decoded,
        stats.missing_values,
        stats.missing_rate()
    );

    if dataset.meta.contains_equal_length == Some(true) && !dataset.has_equal_lengths() {
        println!(
            "  {}",
            "Warning: @equallength is true but series lengths differ".bright_yellow()
        );
    }
    if dataset.meta.contains_missing == Some(false) && stats.missing_values > 0 {
        println!(
            "  {}",
            "Warning: @missing is false but the data contains '?' values".bright_yellow()
        );
    }
}

fn flag(value: Option<bool>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}
