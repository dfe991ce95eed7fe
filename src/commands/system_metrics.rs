//! System metrics command implementation

use anyhow::Result;
use clap::Parser;

use timeglass_dashboard::{api::ApiClient, config::Config};

/// Print system metrics samples
#[derive(Debug, Clone, Parser)]
pub struct SystemMetricsArgs {
    /// Maximum number of samples
    #[arg(short, long, default_value = "100")]
    pub limit: usize,

    /// Only samples at or after this ISO timestamp
    #[arg(long)]
    pub start_time: Option<String>,

    /// Only samples at or before this ISO timestamp
    #[arg(long)]
    pub end_time: Option<String>,
}

impl SystemMetricsArgs {
    fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![("limit".to_string(), self.limit.to_string())];
        if let Some(start) = &self.start_time {
            params.push(("start_time".to_string(), start.clone()));
        }
        if let Some(end) = &self.end_time {
            params.push(("end_time".to_string(), end.clone()));
        }
        params
    }
}

/// Execute the system-metrics command
pub async fn execute(cfg: &Config, args: SystemMetricsArgs) -> Result<()> {
    let api = ApiClient::new(cfg.api.base_url.clone());
    let metrics = api.get_system_metrics(&args.to_params()).await?;
    println!("{}", serde_json::to_string_pretty(&metrics)?);
    Ok(())
}
