//! Requests command implementation
//!
//! Prints one page of recorded requests, filtered the same way as the
//! dashboard's filter editor.

use anyhow::Result;
use clap::Parser;
use colored::{ColoredString, Colorize};

use timeglass_dashboard::{
    api::{ApiClient, QueryParams},
    config::{Config, MAX_PAGE_SIZE},
    dashboard::{view::RequestRow, FilterInputs, FilterSet},
    format::{PerfClass, StatusClass},
};

/// Print recorded requests
#[derive(Debug, Clone, Parser)]
pub struct RequestsArgs {
    /// Page size (defaults to dashboard.page_size)
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Number of records to skip
    #[arg(short, long, default_value = "0")]
    pub offset: usize,

    /// Only paths containing this substring
    #[arg(short, long)]
    pub path: Option<String>,

    /// Only this HTTP method
    #[arg(short, long)]
    pub method: Option<String>,

    /// Only this status code
    #[arg(short, long)]
    pub status: Option<String>,

    /// Output format (text, json)
    #[arg(short = 'f', long, default_value = "text")]
    pub format: String,
}

/// Execute the requests command
pub async fn execute(cfg: &Config, args: RequestsArgs) -> Result<()> {
    if !matches!(args.format.as_str(), "text" | "json") {
        anyhow::bail!("Invalid format: '{}'. Must be one of: text, json", args.format);
    }

    let limit = resolve_limit(args.limit, cfg.dashboard.page_size)?;
    let filters = FilterSet::from_inputs(&FilterInputs {
        path: args.path.clone(),
        method: args.method.clone(),
        status: args.status.clone(),
    });
    let params = build_params(limit, args.offset, &filters);

    let api = ApiClient::new(cfg.api.base_url.clone());
    let records = api.get_requests(&params).await?;

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("{}", "No requests found".yellow());
        return Ok(());
    }

    println!(
        "{:<20} {:<7} {:<40} {:>6} {:>10} {:>7} {:>7}",
        "Time".bold(),
        "Method".bold(),
        "Path".bold(),
        "Status".bold(),
        "Duration".bold(),
        "CPU".bold(),
        "Memory".bold()
    );
    for record in &records {
        let row = RequestRow::from_record(record);
        println!(
            "{:<20} {:<7} {:<40} {:>6} {:>10} {:>7} {:>7}",
            row.start_time,
            row.method,
            truncate(&row.path, 40),
            paint_status(&row.status, row.status_class),
            paint_perf(&row.duration, row.duration_class),
            paint_perf(&row.cpu, row.cpu_class),
            paint_perf(&row.memory, row.memory_class),
        );
    }

    println!();
    println!("{} requests shown (offset {})", records.len(), args.offset);
    if records.len() == limit {
        println!(
            "{}",
            format!("More available: --offset {}", args.offset + records.len()).dimmed()
        );
    }

    Ok(())
}

/// `--limit` if given, else the configured page size; must be within 1..=MAX_PAGE_SIZE
fn resolve_limit(limit: Option<usize>, page_size: usize) -> Result<usize> {
    let limit = limit.unwrap_or(page_size);
    if limit == 0 || limit > MAX_PAGE_SIZE {
        anyhow::bail!("Invalid limit: {}. Must be between 1 and {}", limit, MAX_PAGE_SIZE);
    }
    Ok(limit)
}

fn build_params(limit: usize, offset: usize, filters: &FilterSet) -> QueryParams {
    let mut params = vec![
        ("limit".to_string(), limit.to_string()),
        ("offset".to_string(), offset.to_string()),
    ];
    params.extend(filters.to_params());
    params
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

fn paint_status(text: &str, class: StatusClass) -> ColoredString {
    match class {
        StatusClass::Success => text.green(),
        StatusClass::Redirect => text.blue(),
        StatusClass::ClientError => text.yellow(),
        StatusClass::ServerError => text.red(),
        StatusClass::Default => text.normal(),
    }
}

fn paint_perf(text: &str, class: PerfClass) -> ColoredString {
    match class {
        PerfClass::Good => text.green(),
        PerfClass::Warning => text.yellow(),
        PerfClass::Critical => text.red(),
        PerfClass::Neutral => text.normal(),
    }
}
