use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// What the user did with a displayed notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatsAction {
    Closed,
    Clicked,
    Dismissed,
}

/// Body of `POST /api/fcm/notification-stats`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationStatsReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_id: Option<String>,
    pub action: StatsAction,
    /// ISO-8601, millisecond precision with a `Z` suffix
    pub timestamp: String,
}

impl NotificationStatsReport {
    pub fn closed(notification_id: Option<String>, at: DateTime<Utc>) -> Self {
        Self {
            notification_id,
            action: StatsAction::Closed,
            timestamp: at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotificationCounters {
    pub closed: u64,
    pub clicked: u64,
    pub dismissed: u64,
    pub last_seen: Option<DateTime<Utc>>,
}

impl NotificationCounters {
    pub fn record(&mut self, action: StatsAction, at: DateTime<Utc>) {
        match action {
            StatsAction::Closed => self.closed += 1,
            StatsAction::Clicked => self.clicked += 1,
            StatsAction::Dismissed => self.dismissed += 1,
        }
        if self.last_seen.map_or(true, |seen| seen < at) {
            self.last_seen = Some(at);
        }
    }
}

/// Body of `GET /api/fcm/notification-stats`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotificationStatsSummary {
    pub notifications: BTreeMap<String, NotificationCounters>,
}
