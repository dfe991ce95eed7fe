//! Display formatting and classification helpers
//!
//! Pure functions that turn raw telemetry values into display strings and
//! styling buckets. Missing or invalid input always yields [`NOT_AVAILABLE`]
//! rather than an error.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use std::str::FromStr;

/// Sentinel shown for missing values
pub const NOT_AVAILABLE: &str = "N/A";

const BYTE_UNITS: [&str; 6] = ["Bytes", "KB", "MB", "GB", "TB", "PB"];

const TIMESTAMP_DISPLAY: &str = "%Y-%m-%d %H:%M:%S";

/// Format a duration given in milliseconds
///
/// Sub-second values keep millisecond precision, everything else is shown in
/// seconds. Zero counts as missing.
pub fn format_duration(ms: Option<f64>) -> String {
    match ms {
        Some(ms) if ms != 0.0 && !ms.is_nan() => {
            if ms < 1000.0 {
                format!("{:.2}ms", ms)
            } else {
                format!("{:.2}s", ms / 1000.0)
            }
        }
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Format a byte count using the largest unit that keeps the value >= 1
///
/// Values past the last unit stay in PB.
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return NOT_AVAILABLE.to_string();
    }

    let mut index = 0;
    let mut scale: u64 = 1;
    while index + 1 < BYTE_UNITS.len() {
        match scale.checked_mul(1024) {
            Some(next) if next <= bytes => {
                scale = next;
                index += 1;
            }
            _ => break,
        }
    }

    format!("{:.2} {}", bytes as f64 / scale as f64, BYTE_UNITS[index])
}

/// Format a percentage with one decimal place
pub fn format_percent(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.1}%", v),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Format number with thousand separators
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let len = s.len();

    for (i, c) in s.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }

    result
}

/// Format an ISO-8601 timestamp for display in local time
///
/// Offset-aware inputs are converted to the local zone; naive inputs are
/// taken as already local. Unparseable input is returned unchanged.
pub fn format_timestamp(iso: &str) -> String {
    if iso.is_empty() {
        return NOT_AVAILABLE.to_string();
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(iso) {
        return dt.with_timezone(&Local).format(TIMESTAMP_DISPLAY).to_string();
    }

    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(iso, pattern) {
            return naive.format(TIMESTAMP_DISPLAY).to_string();
        }
    }

    if let Some(naive) = NaiveDate::parse_from_str(iso, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return naive.format(TIMESTAMP_DISPLAY).to_string();
    }

    iso.to_string()
}

/// HTTP status bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Default,
    Success,
    Redirect,
    ClientError,
    ServerError,
}

impl StatusClass {
    /// Classify a status code. Absent and zero codes land in `Default`, as do
    /// values below 200.
    pub fn from_code(code: Option<i64>) -> Self {
        match code {
            None | Some(0) => Self::Default,
            Some(200..=299) => Self::Success,
            Some(300..=399) => Self::Redirect,
            Some(400..=499) => Self::ClientError,
            Some(c) if c >= 500 => Self::ServerError,
            Some(_) => Self::Default,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Success => "2xx",
            Self::Redirect => "3xx",
            Self::ClientError => "4xx",
            Self::ServerError => "5xx",
        }
    }
}

/// HTTP method bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodClass {
    Get,
    Post,
    Put,
    Delete,
    Default,
}

impl MethodClass {
    pub fn from_method(method: Option<&str>) -> Self {
        match method.map(str::to_ascii_uppercase).as_deref() {
            Some("GET") => Self::Get,
            Some("POST") => Self::Post,
            Some("PUT") => Self::Put,
            Some("DELETE") => Self::Delete,
            _ => Self::Default,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Post => "post",
            Self::Put => "put",
            Self::Delete => "delete",
            Self::Default => "default",
        }
    }
}

/// Metric families with their own severity thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerfMetric {
    Duration,
    Cpu,
    Memory,
}

impl PerfMetric {
    /// (good_below, warning_below)
    fn thresholds(&self) -> (f64, f64) {
        match self {
            Self::Duration => (100.0, 500.0),
            Self::Cpu => (50.0, 80.0),
            Self::Memory => (60.0, 85.0),
        }
    }
}

impl FromStr for PerfMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "duration" => Ok(Self::Duration),
            "cpu" => Ok(Self::Cpu),
            "memory" => Ok(Self::Memory),
            other => Err(format!("unknown performance metric '{}'", other)),
        }
    }
}

/// Performance severity bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerfClass {
    Good,
    Warning,
    Critical,
    Neutral,
}

impl PerfClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Warning => "warning",
            Self::Critical => "critical",
            Self::Neutral => "neutral",
        }
    }
}

/// Classify a metric value against its two-threshold ladder
pub fn performance_class(value: Option<f64>, metric: PerfMetric) -> PerfClass {
    let Some(value) = value else {
        return PerfClass::Neutral;
    };

    let (good, warning) = metric.thresholds();
    if value < good {
        PerfClass::Good
    } else if value < warning {
        PerfClass::Warning
    } else {
        PerfClass::Critical
    }
}

/// Same as [`performance_class`] but keyed by metric name; unknown names are neutral
pub fn performance_class_by_name(value: Option<f64>, metric: &str) -> PerfClass {
    match metric.parse::<PerfMetric>() {
        Ok(metric) => performance_class(value, metric),
        Err(_) => PerfClass::Neutral,
    }
}

/// A display area whose content is replaced wholesale: a loading indicator,
/// an error panel, or the rendered content itself
#[derive(Debug, Clone, PartialEq)]
pub enum Region<T> {
    Loading(String),
    Error(String),
    Ready(T),
}

impl<T> Region<T> {
    pub const DEFAULT_LOADING: &'static str = "Loading...";
    pub const DEFAULT_ERROR: &'static str = "An error occurred";

    /// Replace the content with a loading indicator
    pub fn show_loading(&mut self, message: Option<&str>) {
        *self = Self::Loading(message.unwrap_or(Self::DEFAULT_LOADING).to_string());
    }

    /// Replace the content with an error panel
    pub fn show_error(&mut self, message: Option<&str>) {
        *self = Self::Error(message.unwrap_or(Self::DEFAULT_ERROR).to_string());
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(content) => Some(content),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(None), "N/A");
        assert_eq!(format_duration(Some(0.0)), "N/A");
        assert_eq!(format_duration(Some(45.2)), "45.20ms");
        assert_eq!(format_duration(Some(999.994)), "999.99ms");
        assert_eq!(format_duration(Some(1000.0)), "1.00s");
        assert_eq!(format_duration(Some(2500.0)), "2.50s");
    }

    #[test]
    fn test_format_duration_unit_boundary() {
        for d in [0.5, 1.0, 99.9, 500.0, 999.0] {
            assert!(format_duration(Some(d)).ends_with("ms"), "{}", d);
        }
        for d in [1000.0, 1500.0, 60_000.0] {
            let s = format_duration(Some(d));
            assert!(s.ends_with('s') && !s.ends_with("ms"), "{}", d);
        }
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "N/A");
        assert_eq!(format_bytes(1), "1.00 Bytes");
        assert_eq!(format_bytes(1023), "1023.00 Bytes");
        assert_eq!(format_bytes(1024), "1.00 KB");
        assert_eq!(format_bytes(1536), "1.50 KB");
        assert_eq!(format_bytes(1024 * 1024), "1.00 MB");
        assert_eq!(format_bytes(5 * 1024 * 1024 * 1024), "5.00 GB");
    }

    #[test]
    fn test_format_bytes_large_values_clamp() {
        assert_eq!(format_bytes(1024u64.pow(4)), "1.00 TB");
        assert_eq!(format_bytes(1024u64.pow(5)), "1.00 PB");
        assert_eq!(format_bytes(1024u64.pow(6)), "1024.00 PB");
        assert!(format_bytes(u64::MAX).ends_with(" PB"));
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(None), "N/A");
        assert_eq!(format_percent(Some(0.0)), "0.0%");
        assert_eq!(format_percent(Some(33.14)), "33.1%");
        assert_eq!(format_percent(Some(61.66)), "61.7%");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(123), "123");
        assert_eq!(format_number(1200), "1,200");
        assert_eq!(format_number(1234567), "1,234,567");
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(""), "N/A");
        assert_eq!(format_timestamp("2024-01-15T10:30:00"), "2024-01-15 10:30:00");
        assert_eq!(
            format_timestamp("2024-01-15T10:30:00.123456"),
            "2024-01-15 10:30:00"
        );
        assert_eq!(format_timestamp("2024-01-15"), "2024-01-15 00:00:00");
        assert_eq!(format_timestamp("not a date"), "not a date");
    }

    #[test]
    fn test_format_timestamp_with_offset_parses() {
        let formatted = format_timestamp("2024-01-15T10:30:00+00:00");
        assert_ne!(formatted, "2024-01-15T10:30:00+00:00");
        assert_eq!(formatted.len(), "2024-01-15 10:30:00".len());
    }

    #[test]
    fn test_status_class_buckets() {
        assert_eq!(StatusClass::from_code(None), StatusClass::Default);
        assert_eq!(StatusClass::from_code(Some(0)), StatusClass::Default);
        assert_eq!(StatusClass::from_code(Some(101)), StatusClass::Default);
        assert_eq!(StatusClass::from_code(Some(-1)), StatusClass::Default);
        assert_eq!(StatusClass::from_code(Some(200)), StatusClass::Success);
        assert_eq!(StatusClass::from_code(Some(299)), StatusClass::Success);
        assert_eq!(StatusClass::from_code(Some(301)), StatusClass::Redirect);
        assert_eq!(StatusClass::from_code(Some(404)), StatusClass::ClientError);
        assert_eq!(StatusClass::from_code(Some(500)), StatusClass::ServerError);
        assert_eq!(StatusClass::from_code(Some(999)), StatusClass::ServerError);
    }

    #[test]
    fn test_method_class() {
        assert_eq!(MethodClass::from_method(Some("get")), MethodClass::Get);
        assert_eq!(MethodClass::from_method(Some("Post")), MethodClass::Post);
        assert_eq!(MethodClass::from_method(Some("PUT")), MethodClass::Put);
        assert_eq!(MethodClass::from_method(Some("delete")), MethodClass::Delete);
        assert_eq!(MethodClass::from_method(Some("PATCH")), MethodClass::Default);
        assert_eq!(MethodClass::from_method(None), MethodClass::Default);
    }

    #[test]
    fn test_performance_class_thresholds() {
        use PerfClass::*;
        use PerfMetric::*;

        assert_eq!(performance_class(Some(99.9), Duration), Good);
        assert_eq!(performance_class(Some(100.0), Duration), Warning);
        assert_eq!(performance_class(Some(500.0), Duration), Critical);

        assert_eq!(performance_class(Some(49.0), Cpu), Good);
        assert_eq!(performance_class(Some(50.0), Cpu), Warning);
        assert_eq!(performance_class(Some(80.0), Cpu), Critical);

        assert_eq!(performance_class(Some(59.9), Memory), Good);
        assert_eq!(performance_class(Some(84.9), Memory), Warning);
        assert_eq!(performance_class(Some(85.0), Memory), Critical);

        assert_eq!(performance_class(None, Cpu), Neutral);
    }

    #[test]
    fn test_performance_class_by_name() {
        assert_eq!(performance_class_by_name(Some(10.0), "cpu"), PerfClass::Good);
        assert_eq!(performance_class_by_name(Some(10.0), "disk"), PerfClass::Neutral);
        assert_eq!(performance_class_by_name(None, "memory"), PerfClass::Neutral);
    }

    #[test]
    fn test_region_helpers() {
        let mut region: Region<Vec<u8>> = Region::Ready(vec![1]);
        region.show_loading(None);
        assert_eq!(region, Region::Loading("Loading...".to_string()));

        region.show_error(Some("Failed to load statistics"));
        assert!(region.is_error());
        assert!(region.ready().is_none());

        region.show_error(None);
        assert_eq!(region, Region::Error("An error occurred".to_string()));
    }
}
