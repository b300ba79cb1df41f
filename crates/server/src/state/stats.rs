use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use shared::api::payloads::{NotificationCounters, NotificationStatsSummary, StatsAction};
use tracing::warn;

/// Key used for reports that don't carry a notification id
pub const UNKNOWN_ID: &str = "unknown";

/// Default limit on distinct notification ids held by a [`StatsStore`]
pub const MAX_TRACKED_IDS: usize = 10_000;

/// In-memory counters per notification id
///
/// At most `max_ids` ids get their own counters (plus [`UNKNOWN_ID`]). Once
/// full, reports for ids not already tracked are counted under [`UNKNOWN_ID`]
/// while tracked ids keep counting. Concurrent first reports may overshoot
/// the limit by a few entries.
#[derive(Debug, Clone)]
pub struct StatsStore {
    counters: Arc<DashMap<String, NotificationCounters>>,
    max_ids: usize,
}

impl Default for StatsStore {
    fn default() -> Self {
        Self::with_max_ids(MAX_TRACKED_IDS)
    }
}

impl StatsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_ids(max_ids: usize) -> Self {
        Self {
            counters: Arc::new(DashMap::new()),
            max_ids,
        }
    }

    pub fn record(&self, notification_id: Option<&str>, action: StatsAction, at: DateTime<Utc>) {
        let id = match notification_id {
            Some(id) if !id.is_empty() => id,
            _ => UNKNOWN_ID,
        };

        if let Some(mut counters) = self.counters.get_mut(id) {
            counters.record(action, at);
            return;
        }

        let tracked = self.counters.len() - usize::from(self.counters.contains_key(UNKNOWN_ID));
        let id = if id == UNKNOWN_ID || tracked < self.max_ids {
            id
        } else {
            warn!("Stats store is full ({} ids), counting {id:?} as {UNKNOWN_ID:?}", self.max_ids);
            UNKNOWN_ID
        };
        self.counters.entry(id.to_string()).or_default().record(action, at);
    }

    pub fn get(&self, notification_id: &str) -> Option<NotificationCounters> {
        self.counters.get(notification_id).map(|c| c.value().clone())
    }

    pub fn summary(&self) -> NotificationStatsSummary {
        NotificationStatsSummary {
            notifications: self
                .counters
                .iter()
                .map(|e| (e.key().clone(), e.value().clone()))
                .collect(),
        }
    }
}
