use std::fmt::Debug;

use gloo::net::http::{Method, RequestBuilder};
use http::header::{ACCEPT, CACHE_CONTROL};
use mime::APPLICATION_JSON;
use serde::Serialize;
use tracing::debug;

use crate::api::error::HostError;

/// POST `body` as json and check for a 2xx status. The response body is ignored
///
/// Single attempt, callers decide what a failure means
pub async fn post_json<B>(url: &str, body: &B) -> Result<(), HostError>
where
    B: Serialize + Debug,
{
    debug!("post_json({url})");

    let request = RequestBuilder::new(url)
        .method(Method::POST)
        .header(ACCEPT.as_str(), APPLICATION_JSON.essence_str())
        .header(CACHE_CONTROL.as_str(), "no-store")
        .json(body)
        .map_err(|e| HostError::unexpected("fetch::json", format!("{e} (body: {body:?})")))?;

    let response = request
        .send()
        .await
        .map_err(|e| HostError::rejected("fetch", format!("POST {url}: {e}")))?;

    if !response.ok() {
        return Err(HostError::Status {
            method: "POST",
            url: url.to_string(),
            status: response.status(),
        });
    }

    debug!("post_json({url}) -> {}", response.status());
    Ok(())
}
