mod commands;
mod logging;

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{CommandFactory, Parser};
use colored::*;
use commands::{Cli, Commands};
use dotenv::dotenv;
use orgtally_core::report::discover::find_latest_report;
use orgtally_core::report::merge::merge_labeling_data;
use orgtally_core::storage::Database;
use orgtally_core::{site, timeline, AppConfig};
use tracing::{error, info};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    let _guard = logging::init_logger();

    let config = match orgtally_core::config::load_configuration() {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            process::exit(1);
        }
    };

    let args = Cli::parse();

    let result = match args.command {
        Some(Commands::MergeLabels {
            report,
            output,
            exclude_session,
        }) => run_merge_labels(&config, report, output, &exclude_session),
        Some(Commands::Timeline { output }) => run_timeline(&config, output),
        Some(Commands::UpdateSite { report }) => run_update_site(&config, report),
        Some(Commands::PrintConfig) => {
            println!("Configuration: {:?}", config);
            Ok(())
        }
        None => {
            let _ = Cli::command().print_long_help();
            Ok(())
        }
    };

    if let Err(err) = result {
        error!("Error: {}", err);
        process::exit(1);
    }

    Ok(())
}

fn run_merge_labels(
    config: &AppConfig,
    report: Option<PathBuf>,
    output: Option<PathBuf>,
    exclude_session: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open(&config.db_path)?;

    info!("Fetching labeled data from database...");
    let labeling_data = db.labeled_records(exclude_session)?;
    info!(
        "Found {} labeled records from labeling sessions",
        labeling_data.len()
    );

    let report_path = match report {
        Some(path) => path,
        None => find_latest_report(Path::new(&config.results_dir))?,
    };
    let output_path = output.unwrap_or_else(|| {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        Path::new(&config.results_dir)
            .join(format!("content_organization_report_merged_{}.json", timestamp))
    });

    let mut report = orgtally_core::report::load_report(&report_path)?;
    let stats = merge_labeling_data(&mut report, labeling_data);
    orgtally_core::report::save_report(&output_path, &report)?;

    println!();
    info!(
        "Merged: {} added, {} duplicate paths, {} duplicate filenames",
        format!("{}", stats.added).green(),
        format!("{}", stats.skipped_duplicate_path).yellow(),
        format!("{}", stats.skipped_duplicate_filename).yellow(),
    );
    info!(
        "Final total: {} files",
        format!("{}", report.total_files).green()
    );

    if !stats.categories_added.is_empty() {
        let mut by_count: Vec<_> = stats.categories_added.iter().collect();
        by_count.sort_by(|a, b| b.1.cmp(a.1));
        for (category, count) in by_count {
            info!("  {}: {} files", category, count);
        }
    }

    info!("Merged report saved to {}", output_path.display());
    Ok(())
}

fn run_timeline(
    config: &AppConfig,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open(&config.db_path)?;
    let document = timeline::build_timeline(&db)?;

    let output_path =
        output.unwrap_or_else(|| Path::new(&config.site_dir).join("timeline_data.json"));
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&output_path, serde_json::to_string_pretty(&document)?)?;

    info!(
        "{} sessions, {} total files",
        format!("{}", document.session_count).green(),
        format!("{}", document.cumulative.total_files).green(),
    );
    info!("Timeline data saved to {}", output_path.display());
    Ok(())
}

fn run_update_site(
    config: &AppConfig,
    report: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let results_dir = Path::new(&config.results_dir);
    let site_dir = Path::new(&config.site_dir);

    let report_path = match report {
        Some(path) => path,
        None => find_latest_report(results_dir)?,
    };
    info!("Using report: {}", report_path.display());

    let report = orgtally_core::report::load_report(&report_path)?;
    let metadata = site::extract_metadata(&report);
    let stats = site::calculate_stats(&metadata);

    fs::create_dir_all(site_dir)?;
    fs::write(
        site_dir.join("metadata.json"),
        serde_json::to_string(&metadata)?,
    )?;

    let mut summary = serde_json::to_value(&stats)?;
    summary["last_updated"] =
        serde_json::Value::String(chrono::Local::now().format("%B %d, %Y").to_string());
    fs::write(
        site_dir.join("summary_stats.json"),
        serde_json::to_string_pretty(&summary)?,
    )?;

    let db = Database::open(&config.db_path)?;
    let document = timeline::build_timeline(&db)?;
    fs::write(
        site_dir.join("timeline_data.json"),
        serde_json::to_string_pretty(&document)?,
    )?;

    println!();
    info!(
        "{} files, {} success rate, {} categories",
        format!("{}", stats.total_files).green(),
        format!("{}%", stats.success_rate).green(),
        format!("{}", stats.category_count).cyan(),
    );
    info!("Site data updated in {}", site_dir.display());
    Ok(())
}
