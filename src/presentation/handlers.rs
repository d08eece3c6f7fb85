// HTTP request handlers
use crate::application::dashboard_service::DashboardControls;
use crate::domain::error::{load_error_detail, LoadError};
use crate::infrastructure::chunked_stream::stream_from_receiver;
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

/// Control selections carried in the query string.
/// `metrics` is comma separated; present but empty means "no series".
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub metrics: Option<String>,
    pub category: Option<String>,
}

impl DashboardQuery {
    pub fn into_controls(self) -> DashboardControls {
        DashboardControls {
            metrics: self.metrics.map(|m| {
                m.split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(str::to_string)
                    .collect()
            }),
            category: self.category,
        }
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Full dashboard for the current control selections
pub async fn get_dashboard(
    Query(query): Query<DashboardQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let compress = accepts_brotli(&headers);

    let result = match state.dashboard_service.build(&query.into_controls()).await {
        Ok(dashboard) => json_response(StatusCode::OK, &dashboard, compress).await,
        Err(e) => load_failure(&state, &e, compress).await,
    };
    result.unwrap_or_else(|status| status.into_response())
}

/// Options for the category selector
pub async fn list_categories(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let compress = accepts_brotli(&headers);

    let result = match state.dashboard_service.categories().await {
        Ok(categories) => {
            let body = json!({ "categories": categories.unwrap_or_default() });
            json_response(StatusCode::OK, &body, compress).await
        }
        Err(e) => load_failure(&state, &e, compress).await,
    };
    result.unwrap_or_else(|status| status.into_response())
}

/// Stream dashboard sections as they are built (progressive loading)
pub async fn stream_dashboard(
    Query(query): Query<DashboardQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let compress = accepts_brotli(&headers);

    let rx = state
        .streaming_service
        .stream_dashboard(query.into_controls())
        .await;
    stream_from_receiver(rx, compress).await
}

/// 503 carrying the dashboard's load failure message and the cause
async fn load_failure(
    state: &AppState,
    error: &LoadError,
    compress: bool,
) -> Result<Response, StatusCode> {
    let body = json!({
        "error": state.dashboard_service.labels().load_failure,
        "detail": load_error_detail(error),
    });
    json_response(StatusCode::SERVICE_UNAVAILABLE, &body, compress).await
}
