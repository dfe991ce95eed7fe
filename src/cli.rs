use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands::{requests::RequestsArgs, system_metrics::SystemMetricsArgs};

#[derive(Parser, Debug)]
#[command(name = "timeglass", version, about = "TimeGlass request telemetry dashboard")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "timeglass.toml", global = true)]
    pub config: PathBuf,

    /// Backend base URL (overrides api.base_url)
    #[arg(short, long, global = true, env = "TIMEGLASS_URL")]
    pub url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Interactive terminal dashboard (default)
    Dashboard,

    /// Print the statistics summary
    Stats,

    /// Print one page of recorded requests
    Requests(RequestsArgs),

    /// Print system metrics samples as JSON
    SystemMetrics(SystemMetricsArgs),

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Display the effective configuration
    Show,

    /// Validate configuration file
    Validate,
}

impl Cli {
    /// Get the command to execute, defaulting to Dashboard if none provided
    pub fn get_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Dashboard)
    }
}
