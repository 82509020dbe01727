use crate::api::errors::ApiError;
use crate::api::params::{self, RawParams};
use crate::chart::{html, svg};
use crate::config::Config;
use crate::query::request::{ChartRequest, ChartShape};
use crate::query::{bounds, builder, reshape, rows};
use axum::extract::{Form, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use duckdb::Connection;
use parking_lot::Mutex;
use std::sync::Arc;

/// Shared application state for the chart handlers.
pub struct AppState {
    /// Root connection. Requests never query it directly; each one works on
    /// its own clone.
    db: Mutex<Connection>,
    pub config: Config,
}

impl AppState {
    pub fn new(conn: Connection, config: Config) -> Self {
        Self {
            db: Mutex::new(conn),
            config,
        }
    }

    /// A fresh connection to the same database, owned by the caller.
    pub fn connection(&self) -> Result<Connection, duckdb::Error> {
        self.db.lock().try_clone()
    }
}

/// A rendered chart document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartOutput {
    Svg(String),
    Html(String),
}

impl ChartOutput {
    fn into_http_response(self, charset: &str) -> Response {
        match self {
            Self::Svg(body) => ([(header::CONTENT_TYPE, "image/svg+xml".to_string())], body)
                .into_response(),
            Self::Html(body) => (
                [(header::CONTENT_TYPE, format!("text/html; charset={charset}"))],
                body,
            )
                .into_response(),
        }
    }
}

/// GET /chart: Chart selected by query parameters.
pub async fn get_chart(
    State(state): State<Arc<AppState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    serve_chart(state, RawParams::from(pairs)).await
}

/// POST /chart: Same as GET, parameters sent as a urlencoded form.
pub async fn post_chart(
    State(state): State<Arc<AppState>>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    serve_chart(state, RawParams::from(pairs)).await
}

async fn serve_chart(state: Arc<AppState>, raw: RawParams) -> Result<Response, ApiError> {
    let request = params::parse_chart_request(&raw, &state.config)?;
    tracing::debug!(
        chart = %request.chart,
        start = %request.range.start(),
        end = %request.range.end(),
        "Chart requested"
    );

    let state2 = Arc::clone(&state);
    let output = tokio::task::spawn_blocking(move || {
        let conn = state2.connection()?;
        render_chart(&conn, &state2.config, &request)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Chart task panicked: {e}")))??;

    Ok(output.into_http_response(&state.config.charset))
}

/// Check the range against the table, aggregate, and draw.
pub fn render_chart(
    conn: &Connection,
    config: &Config,
    request: &ChartRequest,
) -> Result<ChartOutput, ApiError> {
    let table = config.table_name.as_str();
    let available = bounds::query_date_bounds(conn, table)?;
    params::check_within_bounds(&request.range, available)?;

    let query = builder::build_query(table, request);
    tracing::debug!(
        chart = %request.chart,
        sql = %query.sql,
        params = query.params.len(),
        "Aggregation query"
    );

    match request.chart.shape() {
        ChartShape::Count => {
            let total = rows::fetch_count(conn, &query)?;
            Ok(ChartOutput::Html(html::render_count_page(
                total,
                &config.page_title,
                &config.charset,
            )))
        }
        ChartShape::Pie(_) => {
            let fetched = rows::fetch_pie_rows(conn, &query)?;
            let chart = if request.chart.groups_os_families() {
                reshape::os_family_slices(&fetched)
            } else {
                reshape::pie_slices(fetched)
            };
            Ok(ChartOutput::Svg(svg::render_pie(
                &chart,
                config.pie_percentages,
            )?))
        }
        ChartShape::Line(_) => {
            let fetched = rows::fetch_line_rows(conn, &query)?;
            let chart = reshape::line_series(&fetched, &request.range);
            Ok(ChartOutput::Svg(svg::render_line(&chart)?))
        }
    }
}
