//! Request list filters
//!
//! Raw control values are collected in [`FilterInputs`]; [`FilterSet`] keeps
//! only the non-empty ones, keyed by the fixed set of filter names the
//! backend understands.

use std::collections::BTreeMap;
use std::fmt;

use crate::api::QueryParams;

/// Filter names accepted by `/api/requests`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FilterKey {
    PathContains,
    Method,
    StatusCode,
}

impl FilterKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PathContains => "path_contains",
            Self::Method => "method",
            Self::StatusCode => "status_code",
        }
    }
}

impl fmt::Display for FilterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current values of the three filter controls. `None` means the control is absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterInputs {
    pub path: Option<String>,
    pub method: Option<String>,
    pub status: Option<String>,
}

/// Active filters; a key is present only when its control had a value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    values: BTreeMap<FilterKey, String>,
}

impl FilterSet {
    /// Build the filter set from control values
    ///
    /// Empty values are omitted. Values are trimmed and the method is
    /// uppercased, since the backend matches it exactly. A status that is not
    /// an integer is omitted too.
    pub fn from_inputs(inputs: &FilterInputs) -> Self {
        let mut values = BTreeMap::new();

        if let Some(path) = non_empty(inputs.path.as_deref()) {
            values.insert(FilterKey::PathContains, path.to_string());
        }
        if let Some(method) = non_empty(inputs.method.as_deref()) {
            values.insert(FilterKey::Method, method.to_ascii_uppercase());
        }
        if let Some(status) = non_empty(inputs.status.as_deref()) {
            match status.parse::<i64>() {
                Ok(code) => {
                    values.insert(FilterKey::StatusCode, code.to_string());
                }
                Err(_) => {
                    tracing::warn!(status = %status, "Ignoring non-numeric status filter");
                }
            }
        }

        Self { values }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, key: FilterKey) -> Option<&str> {
        self.values.get(&key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Query parameters in key order
    pub fn to_params(&self) -> QueryParams {
        self.values
            .iter()
            .map(|(k, v)| (k.as_str().to_string(), v.clone()))
            .collect()
    }
}

impl fmt::Display for FilterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.values.is_empty() {
            return f.write_str("none");
        }
        let parts: Vec<String> = self
            .values
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        f.write_str(&parts.join(" "))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
