use crate::api::chart::{self, AppState};
use crate::api::errors::ApiError;
use crate::query::bounds;
use axum::extract::State;
use axum::http::{header, HeaderValue};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Build the Axum router with all routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    let timeout = std::time::Duration::from_secs(state.config.request_timeout_secs);

    Router::new()
        .route("/chart", get(chart::get_chart).post(chart::post_chart))
        .route("/health", get(health_check))
        .route("/health/detailed", get(detailed_health_check))
        .layer(axum::middleware::map_response(add_security_headers))
        .layer(TimeoutLayer::with_status_code(
            axum::http::StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Inject security headers on every HTTP response.
async fn add_security_headers(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(
        "referrer-policy",
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    // The count page and SVG charts carry no scripts
    let is_document = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.contains("text/html") || ct.contains("image/svg+xml"));
    if is_document {
        headers.insert(
            "content-security-policy",
            HeaderValue::from_static("default-src 'none'; style-src 'unsafe-inline'"),
        );
    }
    response
}

/// GET /health: Simple health check endpoint.
async fn health_check() -> &'static str {
    "ok"
}

/// GET /health/detailed: Version, table and the days it covers.
async fn detailed_health_check(
    State(state): State<Arc<AppState>>,
) -> Result<axum::Json<serde_json::Value>, ApiError> {
    let state2 = Arc::clone(&state);
    let available = tokio::task::spawn_blocking(move || {
        let conn = state2.connection()?;
        bounds::query_date_bounds(&conn, &state2.config.table_name)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Health task panicked: {e}")))??;

    Ok(axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "table": state.config.table_name,
        "first_date": available.map(|b| b.first),
        "last_date": available.map(|b| b.last),
        "chart_types": state.config.chart_types,
    })))
}
