//! Command implementations for the CLI
//!
//! - dashboard: interactive terminal dashboard
//! - stats: print the statistics summary
//! - requests: print one page of request records
//! - system_metrics: print system metrics samples
//! - config: configuration display and validation

pub mod config;
pub mod dashboard;
pub mod requests;
pub mod stats;
pub mod system_metrics;
