//! Request telemetry dashboard
//!
//! This module provides the controller that fetches stats and paginated
//! request records, the view model it renders into, and the terminal UI
//! that draws it.

pub mod controller;
pub mod filters;
pub mod ui;
pub mod view;

// Re-export commonly used types
pub use controller::{Dashboard, RequestsQuery, RequestsState, StatsState};
pub use filters::{FilterInputs, FilterKey, FilterSet};
pub use ui::{Action, DashboardApp};
