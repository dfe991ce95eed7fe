//! HTTP client for the TimeGlass backend API
//!
//! Thin wrapper over `reqwest`: every call goes through [`ApiClient::request`],
//! which applies default headers, maps non-success statuses to
//! [`ApiError::Status`], and logs failures before handing them back.

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;

use crate::error::{ApiError, ApiResult};
use crate::models::{RequestRecord, RequestsEnvelope, StatsSummary};

pub const STATS_ENDPOINT: &str = "/api/stats";
pub const REQUESTS_ENDPOINT: &str = "/api/requests";
pub const SYSTEM_METRICS_ENDPOINT: &str = "/api/system-metrics";

/// Ordered query parameters, sent exactly as given
pub type QueryParams = Vec<(String, String)>;

/// Per-call overrides for [`ApiClient::request`]
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Defaults to GET
    pub method: Option<Method>,
    /// Merged over the default headers; entries here win
    pub headers: HeaderMap,
    pub body: Option<serde_json::Value>,
}

/// HTTP client bound to one backend base URL
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `base_url` - Backend origin (e.g., "http://127.0.0.1:8000"); a trailing slash is dropped
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Perform a request against `endpoint` and decode the JSON body
    ///
    /// # Errors
    /// Returns an error if:
    /// - The URL is invalid or the network request fails
    /// - Response status is not successful (2xx)
    /// - Response body cannot be decoded as `T`
    ///
    /// Every failure is logged with the endpoint before being returned.
    pub async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> ApiResult<T> {
        let result = self.send(endpoint, options).await;
        if let Err(e) = &result {
            tracing::error!(endpoint = %endpoint, error = %e, "API request failed");
        }
        result
    }

    async fn send<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> ApiResult<T> {
        let raw_url = format!("{}{}", self.base_url, endpoint);
        let url = Url::parse(&raw_url).map_err(|_| ApiError::InvalidUrl(raw_url.clone()))?;
        let method = options.method.unwrap_or(Method::GET);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for (name, value) in options.headers.iter() {
            headers.insert(name.clone(), value.clone());
        }

        tracing::debug!(method = %method, url = %url, "Sending API request");

        let mut builder = self.client.request(method, url);
        if let Some(body) = &options.body {
            builder = builder.json(body);
        }
        let response = builder.headers(headers).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::from_status(status));
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|source| ApiError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
    }

    /// Fetch the summary statistics
    pub async fn get_stats(&self) -> ApiResult<StatsSummary> {
        self.request(STATS_ENDPOINT, RequestOptions::default()).await
    }

    /// Fetch one page of request records
    ///
    /// Both response shapes (bare array and `{data: [...]}`) are normalised here.
    pub async fn get_requests(&self, params: &[(String, String)]) -> ApiResult<Vec<RequestRecord>> {
        let endpoint = with_query(REQUESTS_ENDPOINT, params);
        let envelope: RequestsEnvelope = self.request(&endpoint, RequestOptions::default()).await?;
        Ok(envelope.into_records())
    }

    /// Fetch system metrics samples as opaque JSON
    pub async fn get_system_metrics(
        &self,
        params: &[(String, String)],
    ) -> ApiResult<serde_json::Value> {
        let endpoint = with_query(SYSTEM_METRICS_ENDPOINT, params);
        self.request(&endpoint, RequestOptions::default()).await
    }
}

/// Encode parameters as a query string, preserving order, duplicates and empty values
pub fn build_query(params: &[(String, String)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

fn with_query(endpoint: &str, params: &[(String, String)]) -> String {
    if params.is_empty() {
        endpoint.to_string()
    } else {
        format!("{}?{}", endpoint, build_query(params))
    }
}
