use clap::{CommandFactory, Parser};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{DashboardError, Result};
use crate::models::{Metric, YearFilter};

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Exploratory analytics over an e-commerce order dataset
#[derive(Parser, Debug, Clone)]
#[command(
    name = "commerce-dashboard",
    about = "Exploratory analytics over an e-commerce order dataset",
    version
)]
pub struct Settings {
    /// Path to the order dataset CSV (auto-discovered if not given)
    #[arg(long)]
    pub data_file: Option<PathBuf>,

    /// Metric shown in the monthly trend section
    #[arg(long, default_value = "order-count", value_parser = ["order-count", "revenue"])]
    pub metric: String,

    /// Year shown in the monthly trend section ("all" or a 4-digit year)
    #[arg(long, default_value = "all")]
    pub year: String,

    /// How many states/cities to list in the customer sections
    #[arg(long, default_value = "10", value_parser = clap::value_parser!(u32).range(1..=100))]
    pub top_locations: u32,

    /// How many categories to list in the best/worst sections
    #[arg(long, default_value = "8", value_parser = clap::value_parser!(u32).range(1..=100))]
    pub top_categories: u32,

    /// How many customers to list in each RFM ranking
    #[arg(long, default_value = "5", value_parser = clap::value_parser!(u32).range(1..=100))]
    pub top_customers: u32,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Clear saved configuration
    #[arg(long)]
    pub clear: bool,
}

impl Settings {
    /// The metric selector as a typed value.
    pub fn metric(&self) -> Result<Metric> {
        self.metric
            .parse::<Metric>()
            .map_err(DashboardError::Config)
    }

    /// The year selector as a typed value.
    pub fn year_filter(&self) -> Result<YearFilter> {
        self.year
            .parse::<YearFilter>()
            .map_err(DashboardError::Config)
    }
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Persisted last-used parameters saved to
/// `~/.commerce-dashboard/last_used.json`.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metric: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_locations: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_categories: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_customers: Option<u32>,
}

impl LastUsedParams {
    /// Return the default path to the persisted config file.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Return the config path rooted at `base_dir` (used for testing).
    pub fn config_path_in(base_dir: &std::path::Path) -> PathBuf {
        base_dir.join(".commerce-dashboard").join("last_used.json")
    }

    /// Load persisted params from an explicit path.
    /// Returns `Default` when the file is absent or cannot be parsed.
    pub fn load_from(path: &std::path::Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    /// Atomically write params to an explicit path, creating parent
    /// directories if needed.
    pub fn save_to(&self, path: &std::path::Path) -> std::result::Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;

        // Write to a temp file then rename for atomicity.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the config file at an explicit path if it exists.
    pub fn clear_at(path: &std::path::Path) -> std::result::Result<(), std::io::Error> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments, merge with last-used params where no explicit
    /// CLI value was provided, and persist the result.
    pub fn load_with_last_used() -> Self {
        Self::load_with_last_used_impl(
            std::env::args_os().collect(),
            &LastUsedParams::config_path(),
        )
    }

    /// Full implementation – accepts args and an explicit config path so
    /// that tests can redirect to a temporary directory.
    pub fn load_with_last_used_impl(
        args: Vec<std::ffi::OsString>,
        config_path: &std::path::Path,
    ) -> Self {
        // Build raw ArgMatches so we can query ValueSource.
        let matches = Settings::command().get_matches_from(args.clone());

        // Parse into the typed struct using the same args.
        let mut settings = Settings::parse_from(args);

        if settings.clear {
            let _ = LastUsedParams::clear_at(config_path);
            return Self::apply_debug_override(settings);
        }

        let last = LastUsedParams::load_from(config_path);

        // Merge last-used values for fields that were NOT explicitly set on
        // the command line (CLI always wins). `data_file` is never persisted.
        if !is_arg_explicitly_set(&matches, "metric") {
            if let Some(v) = last.metric {
                settings.metric = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "year") {
            if let Some(v) = last.year {
                settings.year = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "top_locations") {
            if let Some(v) = last.top_locations {
                settings.top_locations = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "top_categories") {
            if let Some(v) = last.top_categories {
                settings.top_categories = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "top_customers") {
            if let Some(v) = last.top_customers {
                settings.top_customers = v;
            }
        }

        settings = Self::apply_debug_override(settings);

        // Persist current settings for next run.
        let params = LastUsedParams::from(&settings);
        let _ = params.save_to(config_path);

        settings
    }

    /// `--debug` overrides the log level.
    fn apply_debug_override(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }
}

// ── Conversion ─────────────────────────────────────────────────────────────────

impl From<&Settings> for LastUsedParams {
    fn from(s: &Settings) -> Self {
        LastUsedParams {
            metric: Some(s.metric.clone()),
            year: Some(s.year.clone()),
            top_locations: Some(s.top_locations),
            top_categories: Some(s.top_categories),
            top_customers: Some(s.top_customers),
        }
    }
}

// ── Helper: check if an arg was explicitly set on the command line ─────────────

/// Returns `true` when `name` was supplied explicitly on the command line
/// (not via default value or environment variable).
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
