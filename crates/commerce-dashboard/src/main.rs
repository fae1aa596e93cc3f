mod bootstrap;
mod report;

use std::path::PathBuf;

use anyhow::Result;
use dashboard_core::error::DashboardError;
use dashboard_core::settings::Settings;
use dashboard_data::analysis::analyze_orders;

use report::ReportOptions;

fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("Commerce Dashboard v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!("Metric: {}, Year: {}", settings.metric, settings.year);

    let metric = settings.metric()?;
    let year = settings.year_filter()?;

    // Explicit --data-file beats working-directory discovery.
    let data_file = match settings.data_file.clone().or_else(bootstrap::discover_data_file) {
        Some(path) => path,
        None => {
            return Err(DashboardError::DataFileNotFound(PathBuf::from("all_data.csv")).into());
        }
    };

    tracing::info!("Loading dataset from {}", data_file.display());

    let analysis = analyze_orders(&data_file)?;

    tracing::info!(
        "Loaded {} order lines, {} distinct orders",
        analysis.record_count,
        analysis.distinct_orders
    );

    let options = ReportOptions {
        metric,
        year,
        top_locations: settings.top_locations as usize,
        top_categories: settings.top_categories as usize,
        top_customers: settings.top_customers as usize,
    };

    let stdout = std::io::stdout();
    report::render_report(&mut stdout.lock(), &analysis, &options)?;

    Ok(())
}
