//! Stats command implementation
//!
//! Prints the full statistics summary from `/api/stats`.

use anyhow::Result;
use colored::Colorize;

use timeglass_dashboard::{
    api::ApiClient,
    config::Config,
    format::{format_duration, format_number, format_percent},
    models::StatsSummary,
};

/// Execute the stats command
pub async fn execute(cfg: &Config) -> Result<()> {
    let api = ApiClient::new(cfg.api.base_url.clone());
    let summary = api.get_stats().await?;
    print_summary(&summary);
    Ok(())
}

fn print_summary(summary: &StatsSummary) {
    println!();
    println!("{}", "Profiling Statistics".green().bold().underline());
    println!();
    for (label, value) in summary_lines(summary) {
        println!("{:<24} {:>15}", label.cyan(), value);
    }
    println!();
}

fn summary_lines(summary: &StatsSummary) -> Vec<(&'static str, String)> {
    vec![
        ("Total Requests:", format_number(summary.total_requests)),
        ("Avg Duration:", format_duration(summary.avg_duration_ms)),
        ("Max Duration:", format_duration(summary.max_duration_ms)),
        ("Min Duration:", format_duration(summary.min_duration_ms)),
        ("Avg CPU Usage:", format_percent(summary.avg_cpu_percent)),
        ("Avg Memory Usage:", format_percent(summary.avg_memory_percent)),
        ("Current CPU:", format_percent(summary.current_cpu_percent)),
        ("Current Memory:", format_percent(summary.current_memory_percent)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_lines() {
        let lines = summary_lines(&StatsSummary {
            total_requests: 1200,
            avg_duration_ms: Some(45.2),
            max_duration_ms: Some(1500.0),
            avg_cpu_percent: Some(33.1),
            ..Default::default()
        });

        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0].1, "1,200");
        assert_eq!(lines[1].1, "45.20ms");
        assert_eq!(lines[2].1, "1.50s");
        assert_eq!(lines[3].1, "N/A");
        assert_eq!(lines[4].1, "33.1%");
        assert_eq!(lines[7].1, "N/A");
    }
}
