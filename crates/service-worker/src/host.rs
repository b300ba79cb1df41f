use gloo::utils::format::JsValueSerdeExt;
use shared::{
    api::{
        error::{HostError, JsResultExt},
        payloads::NotificationStatsReport,
    },
    relay::{
        host::{ClientHost, HostNotification, NotificationHost, TelemetrySink, WindowClientHandle},
        DisplayedNotification, NotificationData,
    },
    utils::fetch::post_json,
};
use tracing::warn;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    js_sys::{Array, Reflect},
    ClientQueryOptions, ClientType, Notification, NotificationOptions, ServiceWorkerGlobalScope,
    WindowClient,
};

/// The relay's view of the service worker global scope
pub struct ServiceWorkerHost {
    sw: ServiceWorkerGlobalScope,
}

impl ServiceWorkerHost {
    pub fn new(sw: ServiceWorkerGlobalScope) -> Self {
        Self { sw }
    }
}

pub struct Window(WindowClient);

impl WindowClientHandle for Window {
    fn url(&self) -> String {
        self.0.url()
    }
}

/// The notification attached to a click or close event
pub struct EventNotification(Notification);

impl EventNotification {
    pub fn new(notification: Notification) -> Self {
        Self(notification)
    }
}

impl HostNotification for EventNotification {
    fn close(&self) {
        self.0.close();
    }

    fn data(&self) -> Option<NotificationData> {
        let data = self.0.data();
        if data.is_undefined() || data.is_null() {
            return None;
        }

        match JsValueSerdeExt::into_serde(&data) {
            Ok(data) => Some(data),
            Err(e) => {
                warn!("Ignoring notification data that doesn't match NotificationData: {e}");
                None
            }
        }
    }
}

impl NotificationHost for ServiceWorkerHost {
    async fn show_notification(&self, notification: &DisplayedNotification) -> Result<(), HostError> {
        let options: NotificationOptions = <JsValue as JsValueSerdeExt>::from_serde(&notification.options)
            .map_err(|e| HostError::unexpected("show_notification::options", e.to_string()))?
            .unchecked_into();

        let promise = self
            .sw
            .registration()
            .show_notification_with_options(&notification.title, &options)
            .host_op("registration::show_notification")?;

        JsFuture::from(promise)
            .await
            .host_op("registration::show_notification")?;
        Ok(())
    }
}

impl ClientHost for ServiceWorkerHost {
    type Client = Window;

    async fn match_all_windows(&self) -> Result<Vec<Window>, HostError> {
        let mut options = ClientQueryOptions::new();
        options.include_uncontrolled(true);
        options.type_(ClientType::Window);

        let clients: Array = JsFuture::from(self.sw.clients().match_all_with_options(&options))
            .await
            .host_op("clients::match_all")?
            .into();

        Ok(clients
            .iter()
            .filter_map(|c| c.dyn_into::<WindowClient>().ok())
            .map(Window)
            .collect())
    }

    async fn focus(&self, client: &Window) -> Result<(), HostError> {
        let promise = client.0.focus().host_op("window_client::focus")?;
        JsFuture::from(promise).await.host_op("window_client::focus")?;
        Ok(())
    }

    fn can_open_window(&self) -> bool {
        Reflect::has(&self.sw.clients(), &JsValue::from_str("openWindow")).unwrap_or(false)
    }

    async fn open_window(&self, url: &str) -> Result<(), HostError> {
        // This is broken in firefox android and it doesn't seem to be being worked on
        // <https://bugzilla.mozilla.org/show_bug.cgi?id=1717431>
        JsFuture::from(self.sw.clients().open_window(url))
            .await
            .host_op("clients::open_window")?;
        Ok(())
    }
}

impl TelemetrySink for ServiceWorkerHost {
    async fn report(&self, endpoint: &str, report: &NotificationStatsReport) -> Result<(), HostError> {
        post_json(endpoint, report).await
    }
}
