//! # usermgmt API Server
//!
//! Serves the user CRUD API on `API_HOST:API_PORT` (default `0.0.0.0:8080`).
//!
//! Startup order: configuration, tracing, database pool, migrations, then the
//! listener. A failure in any step aborts the process with a non-zero exit.
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgresql://localhost/usermgmt cargo run -p usermgmt-api
//! ```

use std::sync::Arc;
use usermgmt_api::{
    app::{build_router, AppState},
    config::Config,
    telemetry::{init_tracing, LogFormat},
};
use usermgmt_shared::{
    db::{
        migrations::{ensure_database_exists, run_migrations},
        pool::{close_pool, create_pool, DatabaseConfig},
    },
    repository::PgUserRepository,
    service::UserService,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing(LogFormat::from_env());

    tracing::info!(
        "usermgmt API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    ensure_database_exists(&config.database.url).await?;
    let pool = create_pool(DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;
    run_migrations(&pool).await?;

    let users = UserService::new(Arc::new(PgUserRepository::new(pool.clone())))
        .with_delete_policy(config.users.delete_policy)
        .with_name_policy(config.users.name_policy);
    tracing::info!(
        delete_mode = %users.delete_policy(),
        name_policy = ?config.users.name_policy,
        "User service configured"
    );

    let addr = config.bind_address();
    let app = build_router(AppState::new(users, config));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    close_pool(pool).await;
    tracing::info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, exiting...");
}
