//! View model for the dashboard: summary cards, table rows and the
//! request detail panel, all pre-formatted for display

use crate::format::{
    format_bytes, format_duration, format_number, format_percent, format_timestamp,
    performance_class, MethodClass, PerfClass, PerfMetric, StatusClass, NOT_AVAILABLE,
};
use crate::models::{RequestRecord, StatsSummary};

/// Accent colour of a summary card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accent {
    Blue,
    Green,
    Yellow,
    Red,
}

/// One summary statistic card
#[derive(Debug, Clone, PartialEq)]
pub struct StatCard {
    pub title: &'static str,
    pub value: String,
    pub accent: Accent,
}

/// The four summary cards shown above the request table
pub fn stat_cards(stats: &StatsSummary) -> Vec<StatCard> {
    vec![
        StatCard {
            title: "Total Requests",
            value: format_number(stats.total_requests),
            accent: Accent::Blue,
        },
        StatCard {
            title: "Avg Duration",
            value: format_duration(stats.avg_duration_ms),
            accent: Accent::Green,
        },
        StatCard {
            title: "Avg CPU",
            value: format_percent(stats.avg_cpu_percent),
            accent: Accent::Yellow,
        },
        StatCard {
            title: "Avg Memory",
            value: format_percent(stats.avg_memory_percent),
            accent: Accent::Red,
        },
    ]
}

/// A rendered table row. Keeps the source record for the detail view.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestRow {
    pub record: RequestRecord,
    pub detail_path: String,
    pub start_time: String,
    pub method: String,
    pub method_class: MethodClass,
    pub path: String,
    pub status: String,
    pub status_class: StatusClass,
    pub duration: String,
    pub duration_class: PerfClass,
    pub cpu: String,
    pub cpu_class: PerfClass,
    pub memory: String,
    pub memory_class: PerfClass,
}

impl RequestRow {
    pub fn from_record(record: &RequestRecord) -> Self {
        Self {
            detail_path: record.detail_path(),
            start_time: format_timestamp(record.start_time.as_deref().unwrap_or("")),
            method: dash_if_missing(record.method.as_deref()),
            method_class: MethodClass::from_method(record.method.as_deref()),
            path: dash_if_missing(record.path.as_deref()),
            status: match record.status_code {
                Some(code) if code != 0 => code.to_string(),
                _ => "-".to_string(),
            },
            status_class: StatusClass::from_code(record.status_code),
            duration: format_duration(record.duration_ms),
            duration_class: performance_class(record.duration_ms, PerfMetric::Duration),
            cpu: format_percent(record.cpu_usage_percent),
            cpu_class: performance_class(record.cpu_usage_percent, PerfMetric::Cpu),
            memory: format_percent(record.memory_usage_percent),
            memory_class: performance_class(record.memory_usage_percent, PerfMetric::Memory),
            record: record.clone(),
        }
    }
}

fn dash_if_missing(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => "-".to_string(),
    }
}

fn or_not_available(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Label/value pairs for the per-request detail panel
pub fn request_detail(record: &RequestRecord) -> Vec<(&'static str, String)> {
    vec![
        ("Request ID", record.request_id.clone()),
        ("Method", or_not_available(record.method.as_deref())),
        ("Path", or_not_available(record.path.as_deref())),
        (
            "Status",
            match record.status_code {
                Some(code) if code != 0 => code.to_string(),
                _ => NOT_AVAILABLE.to_string(),
            },
        ),
        ("Start Time", format_timestamp(record.start_time.as_deref().unwrap_or(""))),
        ("End Time", format_timestamp(record.end_time.as_deref().unwrap_or(""))),
        ("Duration", format_duration(record.duration_ms)),
        ("CPU Usage", format_percent(record.cpu_usage_percent)),
        (
            "Memory Usage",
            match record.memory_usage_mb {
                Some(mb) if mb != 0.0 => format!("{:.2} MB", mb),
                _ => NOT_AVAILABLE.to_string(),
            },
        ),
        ("Memory Percent", format_percent(record.memory_usage_percent)),
        (
            "Response Size",
            format_bytes(record.response_size_bytes.unwrap_or(0)),
        ),
        ("User Agent", or_not_available(record.user_agent.as_deref())),
        ("Client IP", or_not_available(record.client_ip.as_deref())),
        ("Link", record.detail_path()),
    ]
}
