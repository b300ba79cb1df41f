use axum::{
    http::{HeaderName, HeaderValue},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    services::{ServeDir, ServeFile},
    set_header::SetResponseHeaderLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

pub mod cli;

mod errors;
pub use errors::*;

mod state;
pub use state::*;

pub mod routes;

pub const SERVICE_WORKER_PATH: &str = "/service_worker.js";

/// The whole http surface: the stats api plus the static assets
pub fn app(state: AppState) -> Router {
    let assets_dir = state.args.assets_dir.clone();

    Router::new()
        .merge(routes::notifications::router())
        // Add the header to allow a service worker in a non-root path to set a root scope
        .route_service(
            SERVICE_WORKER_PATH,
            ServiceBuilder::new()
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("service-worker-allowed"),
                    HeaderValue::from_static("/"),
                ))
                .service(ServeFile::new(assets_dir.join("service_worker.js"))),
        )
        .fallback_service(ServeDir::new(&assets_dir))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

#[cfg(test)]
mod test {
    use std::fs;

    use axum::{body::Body, http::{Request, StatusCode}};
    use tower::ServiceExt;

    use super::*;
    use crate::cli::Cli;

    #[tokio::test]
    async fn test_service_worker_served_with_root_scope() {
        let assets_dir = std::env::temp_dir().join(format!("push-relay-assets-{}", std::process::id()));
        fs::create_dir_all(&assets_dir).unwrap();
        fs::write(assets_dir.join("service_worker.js"), "// worker").unwrap();

        let state = AppState::new(Cli {
            assets_dir: assets_dir.clone(),
            port: 0,
            bind_addr: "127.0.0.1".to_string(),
            max_tracked_notifications: MAX_TRACKED_IDS,
        });

        let response = app(state)
            .oneshot(Request::builder().uri(SERVICE_WORKER_PATH).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["service-worker-allowed"], "/");

        fs::remove_dir_all(&assets_dir).unwrap();
    }
}
