// Logging module - console logger setup and HTTP request logging
pub mod request_logger;

use std::env;
use std::path::PathBuf;
use anyhow::{Result, Context};

// Re-export request logging functions
pub use request_logger::{
    log_request_to_file,
    log_response_to_file,
    mask_api_key,
    request_logging_enabled,
};

/// Environment variable that relocates the gocodeo home directory
pub const GOCODEO_HOME_ENV: &str = "GOCODEO_HOME";

/// Initialize the `log` backend. `RUST_LOG` wins over the verbosity flag.
pub fn init_logger(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .try_init();
}

/// Safely truncate a string to a maximum number of characters
pub fn safe_truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        // Reserve space for "..." suffix
        let trunc_chars = max_chars.saturating_sub(3);
        format!("{}...", s.chars().take(trunc_chars).collect::<String>())
    }
}

/// Resolve the gocodeo home directory (`$GOCODEO_HOME` or `~/.gocodeo`) without creating it
pub fn gocodeo_home() -> Result<PathBuf> {
    if let Ok(home) = env::var(GOCODEO_HOME_ENV) {
        if !home.trim().is_empty() {
            return Ok(PathBuf::from(home));
        }
    }

    let home_dir = env::var("HOME")
        .or_else(|_| env::var("USERPROFILE"))
        .context("Failed to get home directory")?;

    Ok(PathBuf::from(home_dir).join(".gocodeo"))
}

/// Get or create the gocodeo home directory
pub fn get_gocodeo_dir() -> Result<PathBuf> {
    let gocodeo_dir = gocodeo_home()?;

    if !gocodeo_dir.exists() {
        std::fs::create_dir_all(&gocodeo_dir)
            .context("Failed to create gocodeo directory")?;
    }

    Ok(gocodeo_dir)
}

/// Get or create the logs directory (`<gocodeo home>/logs`)
pub fn get_logs_dir() -> Result<PathBuf> {
    let logs_dir = get_gocodeo_dir()?.join("logs");

    if !logs_dir.exists() {
        std::fs::create_dir_all(&logs_dir)
            .context("Failed to create logs directory")?;
    }

    Ok(logs_dir)
}
