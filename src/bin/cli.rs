//! assetsync CLI - Main entry point for CLI binary
//!
//! This binary provides the `assetsync` CLI tool for checking and updating
//! the synced asset.

use anyhow::Context;
use assetsync_lib::engine::{
    cli::{
        formatter::{update_result_json, CliFormatter},
        Cli, Commands, OutputFormat,
    },
    config::SyncConfig,
    http::ReqwestHttpClient,
    updater::{format_label, Updater},
};
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run_cli(cli) {
        Ok(code) => code,
        Err(e) => {
            CliFormatter::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run_cli(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = cli.load_config().context("Failed to load config")?;
    let json_output = cli.format == OutputFormat::Json;
    let updater = build_updater(&config)?;

    match cli.command {
        Commands::Check => cmd_check(&updater, json_output),
        Commands::Update { force } => Ok(cmd_update(&updater, force, json_output)),
        Commands::Status => cmd_status(&updater, &config, json_output),
    }
}

fn build_updater(config: &SyncConfig) -> anyhow::Result<Updater> {
    let client = ReqwestHttpClient::new(config.timeout(), &config.user_agent)
        .context("Failed to build HTTP client")?;
    Ok(Updater::new(
        Arc::new(client),
        config.endpoints(),
        config.asset(),
    ))
}

fn cmd_check(updater: &Updater, json: bool) -> anyhow::Result<ExitCode> {
    let remote = updater.remote_version()?;
    let staleness = updater.is_update_available()?;
    let local = updater.asset().version_label()?;

    if json {
        println!(
            "{}",
            serde_json::json!({
                "remote_tag": remote.tag,
                "remote_version": format_label(remote.update_time),
                "local_version": local,
                "update_available": staleness.update_needed(),
            })
        );
    } else {
        CliFormatter::header("Asset check");
        CliFormatter::kv("Remote tag", &remote.tag);
        CliFormatter::kv("Remote version", &format_label(remote.update_time));
        CliFormatter::kv("Local version", local.as_deref().unwrap_or("not installed"));
        if staleness.update_needed() {
            CliFormatter::warning("Update available, run `assetsync update`");
        } else {
            CliFormatter::success("Up to date");
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_update(updater: &Updater, force: bool, json: bool) -> ExitCode {
    let result = if force {
        updater.update_artifact()
    } else {
        updater.check_and_update()
    };

    if json {
        println!("{}", update_result_json(&result));
    } else {
        match &result {
            Ok(version) => CliFormatter::success(&format!("Updated to {}", version)),
            Err(err) => CliFormatter::update_error(err),
        }
    }

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) if err.is_notice() => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}

fn cmd_status(updater: &Updater, config: &SyncConfig, json: bool) -> anyhow::Result<ExitCode> {
    let local = updater.asset().version_label()?;
    let path = updater.asset().artifact_path();

    if json {
        println!(
            "{}",
            serde_json::json!({
                "asset": config.asset_label,
                "path": path.display().to_string(),
                "installed": local.is_some(),
                "version": local,
            })
        );
    } else {
        CliFormatter::header(&config.asset_label);
        CliFormatter::kv("Path", &path.display().to_string());
        CliFormatter::kv("Version", local.as_deref().unwrap_or("not installed"));
    }
    Ok(ExitCode::SUCCESS)
}
