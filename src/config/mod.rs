//! Rate table configuration for the fiscal document auditor.
//!
//! This module provides the time-versioned [`RateTable`] and the
//! [`RateTableLoader`] that reads it from JSON or YAML sources with fallback.
//!
//! # Example
//!
//! ```no_run
//! use fiscal_audit::config::RateTableLoader;
//!
//! # async fn run() {
//! let table = RateTableLoader::new()
//!     .with_default_candidates()
//!     .load()
//!     .await
//!     .unwrap();
//! println!("Loaded {} rate schedules", table.len());
//! # }
//! ```

mod loader;
mod types;

pub use loader::{DEFAULT_RATE_FILE, RateSource, RateTableLoader, default_candidates};
pub(crate) use types::parse_iso_day;
pub use types::{RateEntry, RateSchedule, RateTable, RateTableWarning};
