use std::sync::Arc;

use axum::extract::FromRef;

mod stats;
pub use stats::*;

use crate::cli::Cli;

#[derive(Debug, Clone)]
pub struct AppState {
    pub args: Arc<Cli>,
    pub stats: StatsStore,
}

impl AppState {
    pub fn new(args: Cli) -> Self {
        Self {
            stats: StatsStore::with_max_ids(args.max_tracked_notifications),
            args: Arc::new(args),
        }
    }
}

impl FromRef<AppState> for StatsStore {
    fn from_ref(state: &AppState) -> Self {
        // The store is an Arc internally so clone is cheap
        state.stats.clone()
    }
}
