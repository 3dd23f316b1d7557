use anyhow::Result;
use club_api::{config, database, shutdown, tracing as app_tracing, web};
use tracing_appender::non_blocking::WorkerGuard;

#[tokio::main]
async fn main() -> Result<()> {
    // Pick up a local .env file in development; ignored when absent
    dotenvy::dotenv().ok();

    let config = config::AppConfig::load()?;
    let _guard: Option<WorkerGuard> = app_tracing::init_tracing(&config)?;

    tracing::info!(
        environment = %config.environment,
        "Configuration loaded and tracing initialized"
    );

    let pool = database::create_pool(&config.database).await?;
    database::run_migrations(&pool).await?;

    let addr = config.server.socket_addr()?;
    let state = web::router::AppState::new(config, pool.clone());
    let app = web::router::create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown::shutdown_signal())
        .await?;

    tracing::info!("Server stopped, closing database pool");
    pool.close().await;

    Ok(())
}
