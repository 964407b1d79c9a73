//! Brand-tracking survey data: CSV ingestion, normalization into typed
//! records, and the aggregate figures each dashboard page shows.
//!
//! The `brand-tracker` binary is a thin wrapper that loads a session once and
//! prints page summaries.

pub mod config;
pub mod error;
pub mod loader;
pub mod metrics;
pub mod normalize;
pub mod output;
pub mod reports;
pub mod source;
pub mod types;
pub mod util;
