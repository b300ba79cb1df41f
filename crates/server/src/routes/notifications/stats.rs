use axum::{
    extract::{rejection::JsonRejection, FromRef, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use shared::api::{
    payloads::{NotificationCounters, NotificationStatsReport, NotificationStatsSummary},
    Object,
};
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{debug, instrument};

use crate::{AppError, StatsStore};

/// Reports are a few short fields, anything bigger isn't one
const REPORT_MAX_BYTES: usize = 1024;

pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    StatsStore: FromRef<S>,
{
    Router::new()
        .route(Object::NotificationStats.path(), get(summary).post(record))
        .route(Object::NotificationStatsId.path(), get(fetch))
        .layer(RequestBodyLimitLayer::new(REPORT_MAX_BYTES))
}

#[instrument(skip_all)]
async fn record(
    State(stats): State<StatsStore>,
    report: Result<Json<NotificationStatsReport>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let Json(report) = report.map_err(AppError::from_rejection)?;

    let at = DateTime::parse_from_rfc3339(&report.timestamp)
        .map_err(|e| AppError::bad_request(format!("Invalid timestamp {:?}: {e}", report.timestamp)))?
        .with_timezone(&Utc);

    stats.record(report.notification_id.as_deref(), report.action, at);
    debug!("Recorded {:?} for {:?}", report.action, report.notification_id);

    Ok(StatusCode::NO_CONTENT)
}

async fn summary(State(stats): State<StatsStore>) -> Json<NotificationStatsSummary> {
    Json(stats.summary())
}

async fn fetch(
    State(stats): State<StatsStore>,
    Path(id): Path<String>,
) -> Result<Json<NotificationCounters>, AppError> {
    stats
        .get(&id)
        .map(Json)
        .ok_or_else(|| AppError::not_found(format!("No stats for notification {id}")))
}
