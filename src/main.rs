use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use timeglass_dashboard::{config, init_tracing, log_error_reporter};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = cli::Cli::parse();
    let command = args.get_command();

    if matches!(command, cli::Commands::Version) {
        println!("TimeGlass Dashboard v{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let mut cfg = config::load_config(&args.config)?;
    if let Some(url) = &args.url {
        cfg.api.base_url = url.clone();
        config::validate_config(&cfg)?;
    }

    // stderr output would tear through the alternate screen
    let mut logging = cfg.logging.clone();
    if matches!(command, cli::Commands::Dashboard) && logging.file.is_none() {
        logging.level = "off".to_string();
    }
    init_tracing(&logging)?;

    // Dispatch to appropriate command handler
    match command {
        cli::Commands::Dashboard => {
            commands::dashboard::execute(&cfg, log_error_reporter()).await?;
        }
        cli::Commands::Stats => commands::stats::execute(&cfg).await?,
        cli::Commands::Requests(req_args) => commands::requests::execute(&cfg, req_args).await?,
        cli::Commands::SystemMetrics(sm_args) => {
            commands::system_metrics::execute(&cfg, sm_args).await?
        }
        cli::Commands::Config { action } => match action {
            cli::ConfigCommands::Show => commands::config::show(&cfg)?,
            cli::ConfigCommands::Validate => commands::config::validate(&cfg)?,
        },
        cli::Commands::Version => unreachable!("handled above"),
    }

    Ok(())
}
