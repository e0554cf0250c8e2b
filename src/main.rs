use clap::Parser;
use std::process;
use tsf_processor::cli::{args::Args, commands};

fn main() {
    let args = Args::parse();

    let Some(command) = args.command else {
        show_help_and_commands();
        process::exit(0);
    };

    if let Err(error) = commands::run(command) {
        eprintln!("Error: {:#}", error);
        process::exit(1);
    }
}

/// Show usage when no subcommand is provided
fn show_help_and_commands() {
    println!("tsf processor - forecasting dataset converter");
    println!("=============================================");
    println!();
    println!("Decode time series archives in the tsf text format and write them");
    println!("as long-format tables (unique_id, ds, value) in CSV or Parquet.");
    println!();
    println!("USAGE:");
    println!("    tsf-processor <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    convert     Convert tsf files into long-format tables");
    println!("    inspect     Print the metadata of a tsf file");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("EXAMPLES:");
    println!("    # Convert every tsf file in a directory into ./data/<name>/<name>.csv:");
    println!("    tsf-processor convert staging/");
    println!();
    println!("    # Convert one file to Parquet, replacing earlier output:");
    println!("    tsf-processor convert m4_yearly_dataset.tsf --format parquet --force");
    println!();
    println!("For detailed help on any command, use:");
    println!("    tsf-processor <COMMAND> --help");
}
