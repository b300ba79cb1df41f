use console_error_panic_hook::set_once as set_panic_hook;
use shared::{
    api::{error::JsResultExt, payloads::PushPayload},
    relay::{
        handle_background_message, handle_notification_click, handle_notification_close,
        ClickAction, ClickEvent, CloseEvent, RelayConfig,
    },
    utils::tracing::configure_tracing_once as configure_tracing,
};
use tracing::{debug, info, instrument, warn};
use wasm_bindgen::{prelude::wasm_bindgen, JsValue};
use wasm_bindgen_futures::{future_to_promise, spawn_local, JsFuture};
use web_sys::{
    js_sys::{Promise, Reflect},
    MessageEvent, NotificationEvent, PushEvent, ServiceWorkerGlobalScope,
};

mod host;
pub use host::*;

const SKIP_WAITING: &str = "SKIP_WAITING";

fn init() {
    set_panic_hook();
    configure_tracing();
}

#[wasm_bindgen]
pub fn worker_install(sw: ServiceWorkerGlobalScope, version: String) -> Result<Promise, JsValue> {
    init();
    info!(%version, "Installing");

    // Take over from any older worker straight away so pushes are handled by
    // this version
    Ok(sw.skip_waiting()?)
}

async fn activate(sw: ServiceWorkerGlobalScope, version: String) -> Result<JsValue, JsValue> {
    // Claim the clients so we can control them in response to a push notificiation
    // click
    JsFuture::from(sw.clients().claim())
        .await
        .host_op("clients::claim")?;

    info!(%version, "Activated");
    Ok(JsValue::undefined())
}

#[wasm_bindgen]
pub fn worker_activate(sw: ServiceWorkerGlobalScope, version: String) -> Promise {
    init();
    future_to_promise(activate(sw, version))
}

#[wasm_bindgen]
pub fn worker_message(sw: ServiceWorkerGlobalScope, event: MessageEvent) -> Result<(), JsValue> {
    init();

    if let Some(value) = event.data().as_string() {
        if value == SKIP_WAITING {
            debug!("worker_message got SKIP_WAITING");

            // MDN states the promise returned can be safely ignored
            let _ = sw.skip_waiting()?;
            return Ok(());
        }
    }

    warn!("worker_message got unexpected message: {:?}", event.data());
    Ok(())
}

/// Reads the push data as a PushPayload. Anything unreadable gets the generic
/// notification rather than no notification
fn read_payload(event: &PushEvent) -> PushPayload {
    let text = event.data().map(|data| data.text());
    PushPayload::from_push_data(text.as_deref())
}

#[instrument(skip_all)]
async fn push(sw: ServiceWorkerGlobalScope, event: PushEvent) -> Result<JsValue, JsValue> {
    let payload = read_payload(&event);
    let host = ServiceWorkerHost::new(sw);

    handle_background_message(&host, &RelayConfig::default(), &payload).await?;
    Ok(JsValue::undefined())
}

/// The returned promise must be passed to `event.waitUntil`
#[wasm_bindgen]
pub fn worker_push(sw: ServiceWorkerGlobalScope, _version: String, event: PushEvent) -> Promise {
    init();
    future_to_promise(push(sw, event))
}

async fn notification_click(sw: ServiceWorkerGlobalScope, event: NotificationEvent) -> Result<JsValue, JsValue> {
    // Not every web-sys build exposes NotificationEvent.action
    let action = Reflect::get(&event, &JsValue::from_str("action"))
        .ok()
        .and_then(|v| v.as_string())
        .unwrap_or_default();

    let event = ClickEvent {
        action: ClickAction::from(action.as_str()),
        notification: EventNotification::new(event.notification()),
    };
    let host = ServiceWorkerHost::new(sw);

    let outcome = handle_notification_click(&host, &RelayConfig::default(), &event).await?;
    debug!(?outcome);
    Ok(JsValue::undefined())
}

/// The returned promise must be passed to `event.waitUntil`
#[wasm_bindgen]
pub fn worker_notification_click(
    sw: ServiceWorkerGlobalScope,
    _version: String,
    event: NotificationEvent,
) -> Promise {
    init();
    future_to_promise(notification_click(sw, event))
}

/// Fire and forget. The report is best effort so the worker isn't kept alive
/// for it
#[wasm_bindgen]
pub fn worker_notification_close(sw: ServiceWorkerGlobalScope, _version: String, event: NotificationEvent) {
    init();

    let close = CloseEvent::from_notification(&EventNotification::new(event.notification()));
    let host = ServiceWorkerHost::new(sw);

    spawn_local(async move {
        handle_notification_close(&host, &RelayConfig::default(), &close).await;
    });
}
