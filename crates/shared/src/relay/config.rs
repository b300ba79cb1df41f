use crate::api::Object;

pub const FALLBACK_TITLE: &str = "예쁘네 알림";
pub const ICON: &str = "/favicon.ico";
pub const BADGE: &str = "/notification-badge.png";
pub const FALLBACK_URL: &str = "/admin/notifications";
pub const DEFAULT_TAG: &str = "default";

pub const VIEW_ACTION: &str = "view";
pub const DISMISS_ACTION: &str = "dismiss";

pub const CRITICAL_VIBRATE: [u32; 3] = [200, 100, 200];
pub const NORMAL_VIBRATE: [u32; 1] = [100];

/// A button shown on the notification
#[derive(Debug, Clone, PartialEq)]
pub struct ActionButton {
    pub action: &'static str,
    pub title: &'static str,
    pub icon: &'static str,
}

/// Static identifiers used by the relay
///
/// These are fixed for a deployment. `Default` returns the production values
#[derive(Debug, Clone, PartialEq)]
pub struct RelayConfig {
    pub fallback_title: &'static str,
    pub icon: &'static str,
    pub badge: &'static str,
    pub fallback_url: &'static str,
    pub default_tag: &'static str,
    pub view: ActionButton,
    pub dismiss: ActionButton,
    pub telemetry_endpoint: &'static str,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            fallback_title: FALLBACK_TITLE,
            icon: ICON,
            badge: BADGE,
            fallback_url: FALLBACK_URL,
            default_tag: DEFAULT_TAG,
            view: ActionButton {
                action: VIEW_ACTION,
                title: "확인",
                icon: "/icons/view.png",
            },
            dismiss: ActionButton {
                action: DISMISS_ACTION,
                title: "닫기",
                icon: "/icons/close.png",
            },
            telemetry_endpoint: Object::NotificationStats.path(),
        }
    }
}
