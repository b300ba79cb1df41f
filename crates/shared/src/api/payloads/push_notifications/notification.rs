use std::fmt;

use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use tracing::{error, warn};

/// Message delivered by the push service to the worker
///
/// Every field is optional, readers are expected to fall back to defaults. A
/// field with an unexpected type is treated as missing without affecting its
/// siblings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PushPayload {
    #[serde(default, deserialize_with = "lenient_object")]
    pub notification: Option<PushNotification>,
    #[serde(default, deserialize_with = "lenient_object")]
    pub data: Option<PushData>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PushNotification {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub body: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushData {
    #[serde(default, deserialize_with = "lenient_string")]
    pub action_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_priority")]
    pub priority: Option<Priority>,
}

/// Strings pass through, truthy numbers and `true` are stringified, anything
/// else (falsy scalars, null, arrays, objects) is missing
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        Some(Value::Bool(true)) => Some("true".to_string()),
        _ => None,
    })
}

fn lenient_priority<'de, D>(deserializer: D) -> Result<Option<Priority>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_string(deserializer)?.map(|s| Priority::from(s.as_str())))
}

fn lenient_object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(v @ Value::Object(_)) => T::deserialize(v).ok(),
        _ => None,
    })
}

impl PushPayload {
    pub fn title(&self) -> Option<&str> {
        self.notification.as_ref()?.title.as_deref()
    }

    pub fn body(&self) -> Option<&str> {
        self.notification.as_ref()?.body.as_deref()
    }

    pub fn image(&self) -> Option<&str> {
        self.notification.as_ref()?.image.as_deref()
    }

    pub fn action_url(&self) -> Option<&str> {
        self.data.as_ref()?.action_url.as_deref()
    }

    pub fn id(&self) -> Option<&str> {
        self.data.as_ref()?.id.as_deref()
    }

    pub fn priority(&self) -> Option<&Priority> {
        self.data.as_ref()?.priority.as_ref()
    }
}

impl PushPayload {
    /// Decodes the raw push data. Missing data, non-json and non-object json
    /// are logged and give the empty payload, which displays the generic
    /// notification
    pub fn from_push_data(text: Option<&str>) -> Self {
        let Some(text) = text else {
            warn!("Push message with no data");
            return Self::default();
        };

        let json: Value = match serde_json::from_str(text) {
            Ok(json) => json,
            Err(e) => {
                error!("Push data isn't json ({text:?}): {e}");
                return Self::default();
            }
        };

        if !json.is_object() {
            error!("Push data isn't an object: {json}");
            return Self::default();
        }

        match Self::deserialize(json) {
            Ok(payload) => payload,
            Err(e) => {
                error!("Push data isn't a push payload: {e}");
                Self::default()
            }
        }
    }
}

/// Notification priority as sent in `data.priority`
///
/// Values outside the known set are kept verbatim so they can be passed back
/// to the host untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
    Other(String),
}

impl Priority {
    pub fn as_str(&self) -> &str {
        use Priority::*;
        match self {
            Low => "low",
            Medium => "medium",
            High => "high",
            Critical => "critical",
            Other(s) => s,
        }
    }

    pub fn is_critical(&self) -> bool {
        matches!(self, Priority::Critical)
    }
}

impl From<&str> for Priority {
    fn from(value: &str) -> Self {
        use Priority::*;
        match value {
            "low" => Low,
            "medium" => Medium,
            "high" => High,
            "critical" => Critical,
            other => Other(other.to_string()),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Priority {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Priority::from(s.as_str()))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_empty_object_decodes() {
        let payload: PushPayload = serde_json::from_str("{}").unwrap();
        assert_eq!(payload, PushPayload::default());
        assert_eq!(payload.title(), None);
        assert_eq!(payload.priority(), None);
    }

    #[test]
    fn test_fcm_shaped_payload_decodes() {
        let payload: PushPayload = serde_json::from_value(serde_json::json!({
            "from": "123456789",
            "collapseKey": "do_not_collapse",
            "notification": { "title": "T", "body": "B", "image": "https://cdn/x.png" },
            "data": { "id": "n1", "priority": "critical", "actionUrl": "/x", "extra": "ignored" },
        }))
        .unwrap();

        assert_eq!(payload.title(), Some("T"));
        assert_eq!(payload.body(), Some("B"));
        assert_eq!(payload.image(), Some("https://cdn/x.png"));
        assert_eq!(payload.id(), Some("n1"));
        assert_eq!(payload.action_url(), Some("/x"));
        assert_eq!(payload.priority(), Some(&Priority::Critical));
    }

    #[test]
    fn test_unknown_priority_is_kept() {
        let data: PushData = serde_json::from_str(r#"{"priority":"urgent"}"#).unwrap();
        let priority = data.priority.unwrap();
        assert_eq!(priority, Priority::Other("urgent".to_string()));
        assert!(!priority.is_critical());
        assert_eq!(serde_json::to_string(&priority).unwrap(), r#""urgent""#);
    }

    #[test]
    fn test_mistyped_field_only_loses_itself() {
        let payload: PushPayload = serde_json::from_value(serde_json::json!({
            "notification": { "title": "T", "body": "B", "image": { "url": "x" } },
            "data": { "id": "n1", "priority": 3, "actionUrl": null },
        }))
        .unwrap();

        assert_eq!(payload.title(), Some("T"));
        assert_eq!(payload.body(), Some("B"));
        assert_eq!(payload.image(), None);
        assert_eq!(payload.id(), Some("n1"));
        assert_eq!(payload.action_url(), None);
        assert_eq!(payload.priority(), Some(&Priority::Other("3".to_string())));
    }

    #[test]
    fn test_scalars_follow_js_truthiness() {
        let data: PushData = serde_json::from_value(serde_json::json!({
            "id": 42,
            "actionUrl": false,
            "priority": 0,
        }))
        .unwrap();

        assert_eq!(data.id.as_deref(), Some("42"));
        assert_eq!(data.action_url, None);
        assert_eq!(data.priority, None);
    }

    #[test]
    fn test_mistyped_sections_are_missing() {
        let payload: PushPayload = serde_json::from_value(serde_json::json!({
            "notification": "T",
            "data": { "id": "n1" },
        }))
        .unwrap();

        assert_eq!(payload.notification, None);
        assert_eq!(payload.id(), Some("n1"));
    }

    #[test]
    fn test_push_data_without_body_is_empty() {
        assert_eq!(PushPayload::from_push_data(None), PushPayload::default());
    }

    #[test]
    fn test_push_data_not_json_is_empty() {
        assert_eq!(PushPayload::from_push_data(Some("hello")), PushPayload::default());
        assert_eq!(PushPayload::from_push_data(Some("")), PushPayload::default());
    }

    #[test]
    fn test_push_data_not_object_is_empty() {
        assert_eq!(PushPayload::from_push_data(Some(r#""just a string""#)), PushPayload::default());
        assert_eq!(PushPayload::from_push_data(Some("[1, 2]")), PushPayload::default());
        assert_eq!(PushPayload::from_push_data(Some("null")), PushPayload::default());
    }

    #[test]
    fn test_push_data_keeps_valid_fields() {
        let payload = PushPayload::from_push_data(Some(
            r#"{"notification":{"title":"T"},"data":{"id":"n1","priority":3}}"#,
        ));

        assert_eq!(payload.title(), Some("T"));
        assert_eq!(payload.id(), Some("n1"));
    }
}
