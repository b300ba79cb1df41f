use serde::{Deserialize, Serialize};

use super::config::{RelayConfig, CRITICAL_VIBRATE, NORMAL_VIBRATE};
use crate::api::payloads::{Priority, PushPayload};

/// Returns `value` unless it is missing or empty
pub fn resolve<'a>(value: Option<&'a str>, default: &'a str) -> &'a str {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => default,
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// The `data` object attached to a displayed notification and handed back by
/// the host on click
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationAction {
    pub action: String,
    pub title: String,
    pub icon: String,
}

/// Options passed to the host's `showNotification`. Field names match the
/// browser's `NotificationOptions` dictionary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayOptions {
    pub body: String,
    pub icon: String,
    pub badge: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub data: NotificationData,
    pub require_interaction: bool,
    pub actions: Vec<NotificationAction>,
    pub tag: String,
    pub renotify: bool,
    pub vibrate: Vec<u32>,
    pub silent: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayedNotification {
    pub title: String,
    pub options: DisplayOptions,
}

impl DisplayedNotification {
    pub fn from_payload(payload: &PushPayload, config: &RelayConfig) -> Self {
        let priority = match payload.priority() {
            Some(p) if !p.as_str().is_empty() => p.clone(),
            _ => Priority::default(),
        };
        let critical = priority.is_critical();

        let vibrate = if critical {
            CRITICAL_VIBRATE.to_vec()
        } else {
            NORMAL_VIBRATE.to_vec()
        };

        let actions = [&config.view, &config.dismiss]
            .into_iter()
            .map(|b| NotificationAction {
                action: b.action.to_string(),
                title: b.title.to_string(),
                icon: b.icon.to_string(),
            })
            .collect();

        Self {
            title: resolve(payload.title(), config.fallback_title).to_string(),
            options: DisplayOptions {
                body: payload.body().unwrap_or_default().to_string(),
                icon: config.icon.to_string(),
                badge: config.badge.to_string(),
                image: non_empty(payload.image()).map(str::to_string),
                data: NotificationData {
                    url: Some(resolve(payload.action_url(), config.fallback_url).to_string()),
                    notification_id: payload.id().map(str::to_string),
                    priority: Some(priority),
                },
                require_interaction: critical,
                actions,
                tag: resolve(payload.id(), config.default_tag).to_string(),
                renotify: true,
                vibrate,
                silent: false,
            },
        }
    }
}
