use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "simscan")]
#[command(about = "Fuzzy-fingerprint plagiarism scanner for submission archives", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan the configured input archive and write the pair report
    Process,
    /// Compile all configured path patterns and report the first invalid one
    CheckPatterns,
    /// Print configuration values
    PrintConfig,
}
