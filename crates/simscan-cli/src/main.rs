mod commands;
mod logging;
mod progress;

use std::process;

use clap::{CommandFactory, Parser};
use colored::*;
use commands::{Cli, Commands};
use dotenv::dotenv;
use progress::CliReporter;
use simscan_core::filter::PathFilter;
use simscan_core::ScanEngine;
use tracing::{error, info};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    let _guard = logging::init_logger();

    let config = match simscan_core::config::load_configuration() {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            process::exit(1);
        }
    };

    let args = Cli::parse();

    match args.command {
        Some(Commands::Process) => {
            if let Err(err) = run_process(&config) {
                error!("Error: {}", err);
                process::exit(1);
            }
        }
        Some(Commands::CheckPatterns) => match PathFilter::from_config(&config) {
            Ok(_) => println!("All patterns compile"),
            Err(err) => {
                error!("{}", err);
                process::exit(1);
            }
        },
        Some(Commands::PrintConfig) => {
            println!("Configuration: {:?}", config);
        }
        None => {
            let _ = Cli::command().print_long_help();
        }
    }

    Ok(())
}

fn run_process(config: &simscan_core::AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let engine = ScanEngine::new(config.clone());
    let reporter = CliReporter::new();
    let summary = engine.run(&reporter)?;

    println!();
    info!(
        "Extract: {}, Compare: {}, Report: {}",
        format!("{:.2}s", summary.extract_duration.as_secs_f64()).green(),
        format!("{:.2}s", summary.compare_duration.as_secs_f64()).green(),
        format!("{:.2}s", summary.report_duration.as_secs_f64()).green(),
    );
    info!(
        "{} fingerprints, {} after filter, {} candidate pairs",
        format!("{}", summary.total_fingerprints).cyan(),
        format!("{}", summary.filtered_fingerprints).cyan(),
        format!("{}", summary.candidate_pairs).red(),
    );

    Ok(())
}
