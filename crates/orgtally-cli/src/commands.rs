use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "orgtally")]
#[command(about = "Aggregates file-organization runs into site artifacts", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Merge labeled records from the database into an organization report
    MergeLabels {
        /// Base report to merge into (defaults to the latest in the results dir)
        #[arg(short, long)]
        report: Option<PathBuf>,
        /// Output path (defaults to a timestamped file in the results dir)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Session id of the automated run whose records are already in the report
        #[arg(long)]
        exclude_session: String,
    },
    /// Generate timeline data for the run history view
    Timeline {
        /// Output path (defaults to timeline_data.json in the site dir)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Refresh site data files from the latest organization report
    UpdateSite {
        /// Specific report file to use instead of the latest
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Print configuration values
    PrintConfig,
}
