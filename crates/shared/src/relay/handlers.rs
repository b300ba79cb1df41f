use chrono::Utc;
use tracing::{debug, error, info, instrument};

use super::{
    config::{RelayConfig, DISMISS_ACTION, VIEW_ACTION},
    host::{ClientHost, HostNotification, NotificationHost, TelemetrySink, WindowClientHandle},
    notification::{resolve, DisplayedNotification},
};
use crate::api::{
    error::HostError,
    payloads::{NotificationStatsReport, PushPayload},
};

/// Which part of the notification was clicked
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickAction {
    /// The body of the notification rather than a button
    Default,
    View,
    Dismiss,
    Other(String),
}

impl From<&str> for ClickAction {
    fn from(value: &str) -> Self {
        match value {
            "" => ClickAction::Default,
            VIEW_ACTION => ClickAction::View,
            DISMISS_ACTION => ClickAction::Dismiss,
            other => ClickAction::Other(other.to_string()),
        }
    }
}

#[derive(Debug)]
pub struct ClickEvent<N> {
    pub action: ClickAction,
    pub notification: N,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CloseEvent {
    pub notification_id: Option<String>,
}

impl CloseEvent {
    pub fn from_notification<N: HostNotification>(notification: &N) -> Self {
        Self {
            notification_id: notification.data().and_then(|d| d.notification_id),
        }
    }
}

/// What a click ended up doing. Carries the resolved target url
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    Dismissed,
    Focused(String),
    Opened(String),
    /// No matching window and the host can't open one
    Unsupported(String),
}

/// Builds the notification for a push message and waits for the host to show it
#[instrument(skip_all)]
pub async fn handle_background_message<H: NotificationHost>(
    host: &H,
    config: &RelayConfig,
    payload: &PushPayload,
) -> Result<DisplayedNotification, HostError> {
    debug!(?payload, "Received background message");

    let notification = DisplayedNotification::from_payload(payload, config);
    host.show_notification(&notification).await?;

    info!(tag = %notification.options.tag, "Notification shown");
    Ok(notification)
}

/// Closes the notification then focuses or opens the window it points at
///
/// Tabs match when their url contains the target anywhere, so query strings
/// and fragments on the open tab don't prevent a match. The first match in the
/// host's enumeration order wins
#[instrument(skip_all, fields(action = ?event.action))]
pub async fn handle_notification_click<H, N>(
    host: &H,
    config: &RelayConfig,
    event: &ClickEvent<N>,
) -> Result<ClickOutcome, HostError>
where
    H: ClientHost,
    N: HostNotification,
{
    // Chrome doesn't close it by itself
    event.notification.close();

    if event.action == ClickAction::Dismiss {
        debug!("Dismissed");
        return Ok(ClickOutcome::Dismissed);
    }

    let data = event.notification.data().unwrap_or_default();
    let url = resolve(data.url.as_deref(), config.fallback_url).to_string();

    let clients = host.match_all_windows().await?;
    debug!("{} window clients open", clients.len());

    if let Some(client) = clients.iter().find(|c| c.url().contains(&url)) {
        info!(client = %client.url(), "Focusing existing window");
        host.focus(client).await?;
        return Ok(ClickOutcome::Focused(url));
    }

    if !host.can_open_window() {
        info!(%url, "No matching window and open_window isn't supported");
        return Ok(ClickOutcome::Unsupported(url));
    }

    info!(%url, "Opening new window");
    host.open_window(&url).await?;
    Ok(ClickOutcome::Opened(url))
}

/// Reports the close to the telemetry endpoint. Failures are logged and dropped
#[instrument(skip_all, fields(notification_id = ?event.notification_id))]
pub async fn handle_notification_close<S: TelemetrySink>(
    sink: &S,
    config: &RelayConfig,
    event: &CloseEvent,
) {
    let report = NotificationStatsReport::closed(event.notification_id.clone(), Utc::now());

    match sink.report(config.telemetry_endpoint, &report).await {
        Ok(()) => debug!("Close reported"),
        Err(e) => error!("Failed to report notification close: {e}"),
    }
}

#[cfg(test)]
mod test {
    use std::cell::{Cell, RefCell};

    use chrono::DateTime;
    use futures::executor::block_on;

    use super::*;
    use crate::{
        api::payloads::{Priority, StatsAction},
        relay::notification::NotificationData,
    };

    #[derive(Default)]
    struct FakeHost {
        windows: Vec<String>,
        can_open: bool,
        fail_show: bool,
        shown: RefCell<Vec<DisplayedNotification>>,
        enumerated: Cell<usize>,
        focused: RefCell<Vec<String>>,
        opened: RefCell<Vec<String>>,
    }

    impl FakeHost {
        fn with_windows(windows: &[&str]) -> Self {
            Self {
                windows: windows.iter().map(|w| w.to_string()).collect(),
                can_open: true,
                ..Default::default()
            }
        }
    }

    struct FakeClient(String);

    impl WindowClientHandle for FakeClient {
        fn url(&self) -> String {
            self.0.clone()
        }
    }

    impl NotificationHost for FakeHost {
        async fn show_notification(&self, notification: &DisplayedNotification) -> Result<(), HostError> {
            if self.fail_show {
                return Err(HostError::rejected("show_notification", "permission denied"));
            }
            self.shown.borrow_mut().push(notification.clone());
            Ok(())
        }
    }

    impl ClientHost for FakeHost {
        type Client = FakeClient;

        async fn match_all_windows(&self) -> Result<Vec<FakeClient>, HostError> {
            self.enumerated.set(self.enumerated.get() + 1);
            Ok(self.windows.iter().cloned().map(FakeClient).collect())
        }

        async fn focus(&self, client: &FakeClient) -> Result<(), HostError> {
            self.focused.borrow_mut().push(client.0.clone());
            Ok(())
        }

        fn can_open_window(&self) -> bool {
            self.can_open
        }

        async fn open_window(&self, url: &str) -> Result<(), HostError> {
            self.opened.borrow_mut().push(url.to_string());
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeNotification {
        data: Option<NotificationData>,
        closed: Cell<bool>,
        close_calls: Cell<u32>,
    }

    impl FakeNotification {
        fn with_url(url: &str) -> Self {
            Self {
                data: Some(NotificationData {
                    url: Some(url.to_string()),
                    notification_id: Some("n1".to_string()),
                    priority: Some(Priority::Medium),
                }),
                ..Default::default()
            }
        }
    }

    impl HostNotification for FakeNotification {
        fn close(&self) {
            // Closing a closed notification is a no-op in browsers
            self.close_calls.set(self.close_calls.get() + 1);
            self.closed.set(true);
        }

        fn data(&self) -> Option<NotificationData> {
            self.data.clone()
        }
    }

    #[derive(Default)]
    struct FakeSink {
        fail: bool,
        reports: RefCell<Vec<(String, NotificationStatsReport)>>,
    }

    impl TelemetrySink for FakeSink {
        async fn report(&self, endpoint: &str, report: &NotificationStatsReport) -> Result<(), HostError> {
            self.reports.borrow_mut().push((endpoint.to_string(), report.clone()));
            if self.fail {
                Err(HostError::Status {
                    method: "POST",
                    url: endpoint.to_string(),
                    status: 503,
                })
            } else {
                Ok(())
            }
        }
    }

    fn click(action: &str, notification: FakeNotification) -> ClickEvent<FakeNotification> {
        ClickEvent {
            action: ClickAction::from(action),
            notification,
        }
    }

    #[test]
    fn test_click_action_from_str() {
        assert_eq!(ClickAction::from(""), ClickAction::Default);
        assert_eq!(ClickAction::from("view"), ClickAction::View);
        assert_eq!(ClickAction::from("dismiss"), ClickAction::Dismiss);
        assert_eq!(ClickAction::from("snooze"), ClickAction::Other("snooze".to_string()));
    }

    #[test]
    fn test_background_message_shows_notification() {
        let host = FakeHost::default();
        let payload: PushPayload = serde_json::from_value(serde_json::json!({
            "notification": { "title": "T", "body": "B" },
            "data": { "id": "n1", "priority": "critical", "actionUrl": "/x" },
        }))
        .unwrap();

        let shown = block_on(handle_background_message(&host, &RelayConfig::default(), &payload)).unwrap();

        assert_eq!(host.shown.borrow().as_slice(), &[shown.clone()]);
        assert_eq!(shown.title, "T");
        assert_eq!(shown.options.tag, "n1");
        assert!(shown.options.require_interaction);
        assert_eq!(shown.options.vibrate.len(), 3);
    }

    #[test]
    fn test_background_message_propagates_host_failure() {
        let host = FakeHost {
            fail_show: true,
            ..Default::default()
        };
        let result = block_on(handle_background_message(
            &host,
            &RelayConfig::default(),
            &PushPayload::default(),
        ));

        assert!(matches!(result, Err(HostError::Rejected { operation: "show_notification", .. })));
    }

    #[test]
    fn test_dismiss_touches_no_windows() {
        let host = FakeHost::with_windows(&["https://app/admin/notifications"]);
        let event = click("dismiss", FakeNotification::with_url("/admin/notifications"));

        let outcome = block_on(handle_notification_click(&host, &RelayConfig::default(), &event)).unwrap();

        assert_eq!(outcome, ClickOutcome::Dismissed);
        assert!(event.notification.closed.get());
        assert_eq!(host.enumerated.get(), 0);
        assert!(host.focused.borrow().is_empty());
        assert!(host.opened.borrow().is_empty());
    }

    #[test]
    fn test_view_focuses_matching_window() {
        let host = FakeHost::with_windows(&["https://app/other", "https://app/x?ref=1"]);
        let event = click("view", FakeNotification::with_url("/x"));

        let outcome = block_on(handle_notification_click(&host, &RelayConfig::default(), &event)).unwrap();

        assert_eq!(outcome, ClickOutcome::Focused("/x".to_string()));
        assert!(event.notification.closed.get());
        assert_eq!(host.focused.borrow().as_slice(), &["https://app/x?ref=1".to_string()]);
        assert!(host.opened.borrow().is_empty());
    }

    #[test]
    fn test_first_matching_window_wins() {
        let host = FakeHost::with_windows(&["https://app/x?tab=1", "https://app/x?tab=2"]);
        let event = click("", FakeNotification::with_url("/x"));

        block_on(handle_notification_click(&host, &RelayConfig::default(), &event)).unwrap();

        assert_eq!(host.focused.borrow().as_slice(), &["https://app/x?tab=1".to_string()]);
    }

    #[test]
    fn test_no_match_opens_window() {
        let host = FakeHost::with_windows(&["https://app/other"]);
        let event = click("view", FakeNotification::with_url("/x"));

        let outcome = block_on(handle_notification_click(&host, &RelayConfig::default(), &event)).unwrap();

        assert_eq!(outcome, ClickOutcome::Opened("/x".to_string()));
        assert!(host.focused.borrow().is_empty());
        assert_eq!(host.opened.borrow().as_slice(), &["/x".to_string()]);
    }

    #[test]
    fn test_bare_click_without_data_uses_fallback_url() {
        let host = FakeHost::with_windows(&[]);
        let event = click("", FakeNotification::default());

        let outcome = block_on(handle_notification_click(&host, &RelayConfig::default(), &event)).unwrap();

        assert_eq!(outcome, ClickOutcome::Opened("/admin/notifications".to_string()));
    }

    #[test]
    fn test_unknown_action_behaves_like_view() {
        let host = FakeHost::with_windows(&["https://app/admin/notifications"]);
        let event = click("snooze", FakeNotification::default());

        let outcome = block_on(handle_notification_click(&host, &RelayConfig::default(), &event)).unwrap();

        assert_eq!(outcome, ClickOutcome::Focused("/admin/notifications".to_string()));
    }

    #[test]
    fn test_open_window_unsupported_is_a_noop() {
        let host = FakeHost {
            can_open: false,
            ..Default::default()
        };
        let event = click("view", FakeNotification::with_url("/x"));

        let outcome = block_on(handle_notification_click(&host, &RelayConfig::default(), &event)).unwrap();

        assert_eq!(outcome, ClickOutcome::Unsupported("/x".to_string()));
        assert!(host.opened.borrow().is_empty());
    }

    #[test]
    fn test_click_on_closed_notification_is_fine() {
        let host = FakeHost::with_windows(&[]);
        let notification = FakeNotification::with_url("/x");
        notification.closed.set(true);
        let event = click("view", notification);
        let config = RelayConfig::default();

        let first = block_on(handle_notification_click(&host, &config, &event)).unwrap();
        let second = block_on(handle_notification_click(&host, &config, &event)).unwrap();

        assert_eq!(first, ClickOutcome::Opened("/x".to_string()));
        assert_eq!(second, ClickOutcome::Opened("/x".to_string()));
        assert!(event.notification.closed.get());
        assert_eq!(event.notification.close_calls.get(), 2);
        assert_eq!(host.opened.borrow().len(), 2);
    }

    #[test]
    fn test_close_reports_once() {
        let sink = FakeSink::default();
        let notification = FakeNotification::with_url("/x");
        let event = CloseEvent::from_notification(&notification);

        block_on(handle_notification_close(&sink, &RelayConfig::default(), &event));

        let reports = sink.reports.borrow();
        assert_eq!(reports.len(), 1);
        let (endpoint, report) = &reports[0];
        assert_eq!(endpoint, "/api/fcm/notification-stats");
        assert_eq!(report.action, StatsAction::Closed);
        assert_eq!(report.notification_id.as_deref(), Some("n1"));
        assert!(report.timestamp.ends_with('Z'));
        assert!(DateTime::parse_from_rfc3339(&report.timestamp).is_ok());
    }

    #[test]
    fn test_close_swallows_report_failure() {
        let sink = FakeSink {
            fail: true,
            ..Default::default()
        };

        block_on(handle_notification_close(&sink, &RelayConfig::default(), &CloseEvent::default()));

        let reports = sink.reports.borrow();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].1.notification_id, None);
    }
}
