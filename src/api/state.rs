//! Application state for the audit API.

use std::sync::Arc;

use crate::config::RateTableLoader;

/// Shared application state.
///
/// Holds the rate table loader. The table itself is loaded per request, so a
/// changed rate file is picked up without restarting the server.
#[derive(Clone)]
pub struct AppState {
    loader: Arc<RateTableLoader>,
}

impl AppState {
    /// Creates a new application state with the given loader.
    pub fn new(loader: RateTableLoader) -> Self {
        Self {
            loader: Arc::new(loader),
        }
    }

    /// Returns a reference to the rate table loader.
    pub fn loader(&self) -> &RateTableLoader {
        &self.loader
    }
}
