use taskboard_server::{app_state::AppState, data_access::task_db::TaskDb, map_routes, settings::Settings};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() {
    init_tracing();

    // ── Settings ───────────────────────────────────────────────
    let settings = Settings::load().expect("Failed to load settings");

    // ── Store ──────────────────────────────────────────────────
    let task_db = TaskDb::open(&settings.database_url)
        .expect("Failed to open task store");

    match task_db.list_tasks() {
        Ok(tasks) => tracing::info!(tasks = tasks.len(), path = %settings.database_url, "task store opened"),
        Err(e) => tracing::warn!(error = %e, "task store opened but could not be listed"),
    }

    // ── Router ─────────────────────────────────────────────────
    let app = map_routes(AppState::shared(task_db));

    // ── Start ──────────────────────────────────────────────────
    let address = settings.socket_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .expect("Failed to bind listener");

    tracing::info!("Server is running on {address}");
    tracing::info!("API endpoint: http://localhost:{}/api/tasks", settings.tcp_socket_port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
