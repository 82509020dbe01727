use bouncer_charts::api::chart::AppState;
use bouncer_charts::config::Config;
use bouncer_charts::server;
use bouncer_charts::storage::schema;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bouncer_charts=info,tower_http=info".into()),
        )
        .init();

    // Load configuration
    let config_path = std::env::args().nth(1);
    let config = Config::load(config_path.as_deref().map(std::path::Path::new));
    if let Err(e) = config.validate() {
        panic!("Invalid configuration: {e}");
    }

    tracing::info!(
        host = %config.host,
        port = config.port,
        table = %config.table_name,
        database = %config
            .database_path
            .as_deref()
            .map_or_else(|| "(in-memory)".into(), |p| p.display().to_string()),
        "Starting Bouncer charts"
    );

    let conn = schema::open_database(config.database_path.as_deref(), &config.table_name)
        .expect("Failed to open DuckDB");
    if config.database_path.is_none() {
        tracing::warn!("No database configured; serving an empty in-memory table");
    }

    let addr = format!("{}:{}", config.host, config.port);
    let state = Arc::new(AppState::new(conn, config));
    let app = server::build_router(state);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| panic!("Failed to bind to {addr}: {e}"));

    tracing::info!(addr = %addr, "Listening");
    axum::serve(listener, app).await.expect("Server error");
}
