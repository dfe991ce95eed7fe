//! Wire types for the TimeGlass HTTP API

use serde::{Deserialize, Serialize};

/// One profiled HTTP request as reported by `/api/requests`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RequestRecord {
    pub request_id: String,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub status_code: Option<i64>,
    #[serde(default)]
    pub duration_ms: Option<f64>,
    #[serde(default)]
    pub cpu_usage_percent: Option<f64>,
    #[serde(default)]
    pub memory_usage_percent: Option<f64>,
    #[serde(default)]
    pub memory_usage_mb: Option<f64>,
    #[serde(default)]
    pub response_size_bytes: Option<u64>,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub client_ip: Option<String>,
}

impl RequestRecord {
    /// Navigation target for the per-request detail view
    pub fn detail_path(&self) -> String {
        format!("/request/{}", self.request_id)
    }
}

/// Aggregate numbers from `/api/stats`
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct StatsSummary {
    #[serde(default)]
    pub total_requests: u64,
    #[serde(default)]
    pub avg_duration_ms: Option<f64>,
    #[serde(default)]
    pub avg_cpu_percent: Option<f64>,
    #[serde(default)]
    pub avg_memory_percent: Option<f64>,
    #[serde(default)]
    pub max_duration_ms: Option<f64>,
    #[serde(default)]
    pub min_duration_ms: Option<f64>,
    #[serde(default)]
    pub current_cpu_percent: Option<f64>,
    #[serde(default)]
    pub current_memory_percent: Option<f64>,
}

/// `/api/requests` answers either with a bare array or with `{"data": [...]}`
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RequestsEnvelope {
    Bare(Vec<RequestRecord>),
    Wrapped { data: Vec<RequestRecord> },
}

impl RequestsEnvelope {
    pub fn into_records(self) -> Vec<RequestRecord> {
        match self {
            Self::Bare(records) => records,
            Self::Wrapped { data } => data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> serde_json::Value {
        json!({
            "request_id": "req-1",
            "start_time": "2024-01-15T10:30:00",
            "end_time": null,
            "duration_ms": 12.5,
            "cpu_usage_percent": 3.2,
            "memory_usage_mb": 48.0,
            "memory_usage_percent": 40.1,
            "method": "GET",
            "path": "/health",
            "status_code": 200,
            "response_size_bytes": 2048,
            "user_agent": "curl/8.0",
            "client_ip": "127.0.0.1"
        })
    }

    #[test]
    fn test_request_record_full_payload() {
        let record: RequestRecord = serde_json::from_value(sample()).unwrap();
        assert_eq!(record.request_id, "req-1");
        assert_eq!(record.status_code, Some(200));
        assert_eq!(record.response_size_bytes, Some(2048));
        assert!(record.end_time.is_none());
        assert_eq!(record.detail_path(), "/request/req-1");
    }

    #[test]
    fn test_request_record_minimal_payload() {
        let record: RequestRecord = serde_json::from_value(json!({"request_id": "x"})).unwrap();
        assert!(record.method.is_none());
        assert!(record.duration_ms.is_none());
    }

    #[test]
    fn test_envelope_shapes_normalise_identically() {
        let bare: RequestsEnvelope = serde_json::from_value(json!([sample()])).unwrap();
        let wrapped: RequestsEnvelope =
            serde_json::from_value(json!({ "data": [sample()] })).unwrap();
        assert_eq!(bare.into_records(), wrapped.into_records());
    }

    #[test]
    fn test_envelope_rejects_other_shapes() {
        assert!(serde_json::from_value::<RequestsEnvelope>(json!({"items": []})).is_err());
    }

    #[test]
    fn test_stats_summary_tolerates_missing_fields() {
        let stats: StatsSummary = serde_json::from_value(json!({
            "total_requests": 1200,
            "avg_duration_ms": 45.2,
            "avg_cpu_percent": 33.1,
            "avg_memory_percent": 61.7
        }))
        .unwrap();
        assert_eq!(stats.total_requests, 1200);
        assert!(stats.max_duration_ms.is_none());
    }
}
