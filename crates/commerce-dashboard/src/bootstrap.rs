use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Directory bootstrap ────────────────────────────────────────────────────────

/// Ensure the standard `~/.commerce-dashboard/` directory hierarchy exists.
///
/// Creates the following directories if absent (including any missing
/// parents):
/// - `~/.commerce-dashboard/`
/// - `~/.commerce-dashboard/logs/`
pub fn ensure_directories() -> anyhow::Result<()> {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    let dashboard_dir = home.join(".commerce-dashboard");
    std::fs::create_dir_all(&dashboard_dir)?;
    std::fs::create_dir_all(dashboard_dir.join("logs"))?;
    Ok(())
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Initialise the global `tracing` subscriber.
///
/// `log_level` uses the conventional upper-case level names and is
/// mapped to a [`tracing_subscriber::EnvFilter`] directive. Falls back
/// to `"info"` if the level string is not recognised.
///
/// The `log_file` parameter is accepted for forward-compatibility but
/// file logging is not yet wired – all output currently goes to stderr.
pub fn setup_logging(log_level: &str, _log_file: Option<&PathBuf>) -> anyhow::Result<()> {
    let upper = log_level.to_uppercase();
    let normalised = match upper.as_str() {
        "DEBUG" | "CRITICAL" => "debug",
        "INFO" => "info",
        "WARNING" => "warn",
        "ERROR" => "error",
        other => other,
    };

    let filter = EnvFilter::try_new(normalised).unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = fmt::layer().with_target(false).with_thread_ids(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .init();

    Ok(())
}

// ── Data-file discovery ────────────────────────────────────────────────────────

/// Attempt to locate the order dataset relative to the working directory.
///
/// Checks the following paths in order and returns the first that exists:
/// 1. `all_data.csv`
/// 2. `data/all_data.csv`
///
/// Returns `None` when neither exists.
pub fn discover_data_file() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    discover_data_file_in(&cwd)
}

/// Same as [`discover_data_file`] but rooted at `base_dir` (used for
/// testing).
pub fn discover_data_file_in(base_dir: &Path) -> Option<PathBuf> {
    let candidates = [
        base_dir.join("all_data.csv"),
        base_dir.join("data").join("all_data.csv"),
    ];
    candidates.into_iter().find(|p| p.exists())
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_discover_data_file_returns_none_when_absent() {
        let tmp = TempDir::new().expect("tempdir");
        assert!(discover_data_file_in(tmp.path()).is_none());
    }

    #[test]
    fn test_discover_data_file_finds_root_candidate() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp.path().join("all_data.csv");
        std::fs::write(&path, "header\n").expect("write");

        assert_eq!(discover_data_file_in(tmp.path()), Some(path));
    }

    #[test]
    fn test_discover_data_file_finds_data_subdir() {
        let tmp = TempDir::new().expect("tempdir");
        let data_dir = tmp.path().join("data");
        std::fs::create_dir_all(&data_dir).expect("mkdir");
        let path = data_dir.join("all_data.csv");
        std::fs::write(&path, "header\n").expect("write");

        assert_eq!(discover_data_file_in(tmp.path()), Some(path));
    }

    #[test]
    fn test_discover_data_file_prefers_root_over_subdir() {
        let tmp = TempDir::new().expect("tempdir");
        let root = tmp.path().join("all_data.csv");
        std::fs::write(&root, "header\n").expect("write");
        let data_dir = tmp.path().join("data");
        std::fs::create_dir_all(&data_dir).expect("mkdir");
        std::fs::write(data_dir.join("all_data.csv"), "header\n").expect("write");

        assert_eq!(discover_data_file_in(tmp.path()), Some(root));
    }

    #[test]
    fn test_ensure_directories() {
        let tmp = TempDir::new().expect("tempdir");

        // Override HOME so that dirs::home_dir() resolves to our temp dir.
        let original_home = std::env::var_os("HOME");
        std::env::set_var("HOME", tmp.path());

        let result = ensure_directories();

        match original_home {
            Some(v) => std::env::set_var("HOME", v),
            None => std::env::remove_var("HOME"),
        }

        result.expect("ensure_directories should succeed");

        let dashboard_dir = tmp.path().join(".commerce-dashboard");
        assert!(dashboard_dir.is_dir());
        assert!(dashboard_dir.join("logs").is_dir());
    }
}
