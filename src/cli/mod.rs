// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::ServiceConfig;

/// PlantCare API server
#[derive(Parser, Debug)]
#[command(name = "plantcare-api")]
#[command(version = crate::version::VERSION_NUMBER)]
#[command(about = "Plant leaf disease detection service", long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, env = "PLANTCARE_CONFIG", default_value = "plantcare.toml")]
    pub config: PathBuf,

    /// Listen address (overrides config and API_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Listen port (overrides config and API_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Run the HTTP server (default)
    Serve,

    /// Load every configured model and report, then exit
    CheckConfig,
}

impl Cli {
    /// File config, then environment, then command-line flags; validated
    pub fn load_config(&self) -> Result<ServiceConfig> {
        let mut config = ServiceConfig::from_file(&self.config)
            .with_context(|| format!("loading {}", self.config.display()))?;
        config.apply_env()?;

        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Serve)
    }
}
