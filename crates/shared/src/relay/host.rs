//! Capabilities the relay needs from its host environment
//!
//! The relay owns no state. Everything it reads or changes (the notification
//! list keyed by tag, the set of open windows) belongs to the host and is only
//! reached through these traits. Futures returned here are not `Send`: the
//! worker host is single-threaded.
#![allow(async_fn_in_trait)]

use super::notification::{DisplayedNotification, NotificationData};
use crate::api::{error::HostError, payloads::NotificationStatsReport};

pub trait NotificationHost {
    /// Resolves when the host has displayed the notification
    async fn show_notification(&self, notification: &DisplayedNotification) -> Result<(), HostError>;
}

/// An open tab or window
pub trait WindowClientHandle {
    fn url(&self) -> String;
}

pub trait ClientHost {
    type Client: WindowClientHandle;

    /// All window clients, including ones this worker doesn't control. Order is
    /// whatever the host returns
    async fn match_all_windows(&self) -> Result<Vec<Self::Client>, HostError>;

    async fn focus(&self, client: &Self::Client) -> Result<(), HostError>;

    fn can_open_window(&self) -> bool;

    async fn open_window(&self, url: &str) -> Result<(), HostError>;
}

/// The notification a click or close event refers to
pub trait HostNotification {
    /// Must be safe to call on an already closed notification
    fn close(&self);

    fn data(&self) -> Option<NotificationData>;
}

pub trait TelemetrySink {
    async fn report(&self, endpoint: &str, report: &NotificationStatsReport) -> Result<(), HostError>;
}
