//! CLI Output Formatting Module
//! Colorized terminal output for the text format

use colored::Colorize;

use crate::engine::updater::UpdateError;

pub struct CliFormatter;

impl CliFormatter {
    pub fn success(message: &str) {
        println!("{} {}", "✓".green().bold(), message);
    }

    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red().bold(), message);
    }

    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow().bold(), message);
    }

    pub fn info(message: &str) {
        println!("{} {}", "ℹ".blue().bold(), message);
    }

    pub fn header(title: &str) {
        println!("\n{}", title.bright_cyan().bold());
        println!("{}", "─".repeat(title.chars().count()).bright_black());
    }

    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", key.bright_white().bold(), value);
    }

    /// Notices print as info, real failures as errors
    pub fn update_error(err: &UpdateError) {
        if err.is_notice() {
            Self::info(&err.to_string());
        } else {
            Self::error(&err.to_string());
        }
    }
}

/// JSON payload for an update result
pub fn update_result_json(result: &Result<String, UpdateError>) -> serde_json::Value {
    match result {
        Ok(version) => serde_json::json!({
            "success": true,
            "updated": true,
            "version": version,
        }),
        Err(err) if err.is_notice() => serde_json::json!({
            "success": true,
            "updated": false,
            "message": err.to_string(),
        }),
        Err(err) => serde_json::json!({
            "success": false,
            "updated": false,
            "error": err.error_code(),
            "message": err.to_string(),
        }),
    }
}
