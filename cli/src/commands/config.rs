// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Configuration management commands
//!
//! Commands: show, validate, generate

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::path::PathBuf;

use cluster_lcm_core::domain::lcm_config::{LcmConfigManifest, CONFIG_PATH_ENV};

use super::overrides::{load_config, ConfigOverrides};

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration with secrets masked
    Show {
        /// Show config file paths checked
        #[arg(long)]
        paths: bool,
    },

    /// Validate configuration file
    Validate {
        /// Path to config file (default: discover)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Generate sample configuration
    Generate {
        /// Output path
        #[arg(short, long, default_value = "./cluster-lcm.yaml")]
        output: PathBuf,
    },
}

pub async fn handle_command(
    command: ConfigCommand,
    config_override: Option<PathBuf>,
    overrides: &ConfigOverrides,
) -> Result<()> {
    match command {
        ConfigCommand::Show { paths } => show(config_override, overrides, paths).await,
        ConfigCommand::Validate { file } => validate(file.or(config_override), overrides).await,
        ConfigCommand::Generate { output } => generate(output).await,
    }
}

async fn show(config_override: Option<PathBuf>, overrides: &ConfigOverrides, show_paths: bool) -> Result<()> {
    if show_paths {
        println!("{}", "Configuration discovery paths:".bold());
        if let Some(path) = &config_override {
            println!("  1. --config flag: {}", path.display());
        } else {
            println!("  1. --config flag: {}", "(not set)".dimmed());
        }
        println!(
            "  2. {}: {}",
            CONFIG_PATH_ENV,
            std::env::var(CONFIG_PATH_ENV)
                .unwrap_or_else(|_| "(not set)".to_string())
                .dimmed()
        );
        println!("  3. ./cluster-lcm.yaml");
        println!("  4. /etc/cluster-lcm/config.yaml");
        match LcmConfigManifest::discover_config() {
            Some(path) => println!("  Discovered: {}", path.display().to_string().green()),
            None => println!("  Discovered: {}", "(none, using defaults)".dimmed()),
        }
        println!();
    }

    let config = load_config(config_override, overrides)?;

    println!("{}", "Current configuration:".bold());
    println!();
    print!("{}", config.to_redacted_yaml().context("Failed to render configuration")?);

    Ok(())
}

async fn validate(config_path: Option<PathBuf>, overrides: &ConfigOverrides) -> Result<()> {
    println!("Validating configuration...");

    let config = load_config(config_path, overrides)?;

    config
        .validate()
        .context("Configuration validation failed")?;

    println!("{}", "✓ Configuration is valid".green());

    Ok(())
}

async fn generate(output: PathBuf) -> Result<()> {
    let sample = include_str!("../../templates/cluster-lcm.yaml");

    std::fs::write(&output, sample)
        .with_context(|| format!("Failed to write config to {:?}", output))?;

    println!(
        "{}",
        format!("✓ Configuration generated: {}", output.display()).green()
    );

    Ok(())
}
