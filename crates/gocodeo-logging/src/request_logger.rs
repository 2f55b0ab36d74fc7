use anyhow::{Context, Result};
use chrono::Utc;
use colored::Colorize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::get_logs_dir;

/// Set to `1`/`true` to write every LLM request and response under the logs directory
pub const LOG_REQUESTS_ENV: &str = "GOCODEO_LOG_REQUESTS";

pub fn request_logging_enabled() -> bool {
    env::var(LOG_REQUESTS_ENV)
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}

const MASK_PREFIX_LEN: usize = 6;
const MASK_MIN_KEY_LEN: usize = 16;

/// Keep only a short prefix of an API key for display. Short keys are hidden entirely.
pub fn mask_api_key(api_key: &str) -> String {
    if api_key.is_empty() {
        return "<empty>".to_string();
    }
    if api_key.chars().count() < MASK_MIN_KEY_LEN {
        return "***".to_string();
    }
    format!("{}***", api_key.chars().take(MASK_PREFIX_LEN).collect::<String>())
}

fn file_stem(kind: &str, timestamp_ms: i64, model: &str) -> String {
    let model_name = model.replace(['/', ':', '\\'], "-");
    format!("{}-{}-{}.txt", kind, timestamp_ms, model_name)
}

/// Log an HTTP request to `<logs>/req-<ts>-<model>.txt`. Returns the request timestamp
/// so the matching response log can share it.
pub fn log_request_to_file(url: &str, body: &serde_json::Value, model: &str, api_key: &str) -> Result<i64> {
    let logs_dir = get_logs_dir()?;
    let timestamp = Utc::now().timestamp_millis();
    let file_path = logs_dir.join(file_stem("req", timestamp, model));
    write_request_log(&file_path, url, body, model, api_key, timestamp)?;
    log::debug!("request logged to {}", file_path.display());
    Ok(timestamp)
}

pub(crate) fn write_request_log(
    file_path: &Path,
    url: &str,
    body: &serde_json::Value,
    model: &str,
    api_key: &str,
    timestamp: i64,
) -> Result<()> {
    let mut log_content = String::new();
    log_content.push_str("HTTP REQUEST LOG\n");
    log_content.push_str("================\n\n");
    log_content.push_str(&format!("Timestamp: {}\n", timestamp));
    log_content.push_str(&format!("Model: {}\n", model));
    log_content.push_str(&format!("URL: {}\n\n", url));
    log_content.push_str("Headers:\n");
    log_content.push_str("  Content-Type: application/json\n");
    log_content.push_str(&format!("  Credential: {}\n\n", mask_api_key(api_key)));
    log_content.push_str("Request Body:\n");
    match serde_json::to_string_pretty(body) {
        Ok(json) => {
            log_content.push_str(&json);
            log_content.push('\n');
        }
        Err(e) => {
            log_content.push_str(&format!("Error serializing request: {}\n", e));
        }
    }

    fs::write(file_path, log_content)
        .with_context(|| format!("Failed to write request log to {}", file_path.display()))
}

/// Log an HTTP response to `<logs>/resp-<ts>-<model>.txt`
pub fn log_response_to_file(status: u16, body: &str, request_timestamp: i64, model: &str) -> Result<PathBuf> {
    let logs_dir = get_logs_dir()?;
    let file_path = logs_dir.join(file_stem("resp", request_timestamp, model));
    write_response_log(&file_path, status, body, request_timestamp, model)?;

    if status >= 400 {
        println!("{}", format!("📝 Error response logged to: {}", file_path.display()).bright_blue());
    }

    Ok(file_path)
}

pub(crate) fn write_response_log(
    file_path: &Path,
    status: u16,
    body: &str,
    request_timestamp: i64,
    model: &str,
) -> Result<()> {
    let mut log_content = String::new();
    log_content.push_str("HTTP RESPONSE LOG\n");
    log_content.push_str("=================\n\n");
    log_content.push_str(&format!("Request Timestamp: {}\n", request_timestamp));
    log_content.push_str(&format!("Model: {}\n", model));
    log_content.push_str(&format!("Status: {}\n\n", status));
    log_content.push_str("Response Body:\n");

    // Pretty-print JSON bodies when possible
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(json) => log_content.push_str(&serde_json::to_string_pretty(&json).unwrap_or_else(|_| body.to_string())),
        Err(_) => log_content.push_str(body),
    }
    log_content.push('\n');

    fs::write(file_path, log_content)
        .with_context(|| format!("Failed to write response log to {}", file_path.display()))
}
