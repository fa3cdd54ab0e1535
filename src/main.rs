mod cli;

use anyhow::Result;
use clap::Parser;
use sqlx::migrate::Migrator;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use finanzas_core::adapters::{
    PostgresEntryRepository, PostgresGoalRepository, PostgresUserRepository,
};
use finanzas_core::config::Config;
use finanzas_core::{create_app, db, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Args::parse();
    let mut config = Config::from_env()?;
    if let Some(port) = args.port {
        config.server_port = port;
    }

    // Setup logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database pool
    let pool = db::create_pool(&config).await?;

    // Run migrations
    let migrator = Migrator::new(Path::new("./migrations")).await?;
    migrator.run(&pool).await?;
    tracing::info!("migraciones aplicadas");

    let server_port = config.server_port;
    let state = AppState {
        users: Arc::new(PostgresUserRepository::new(pool.clone())),
        entries: Arc::new(PostgresEntryRepository::new(pool.clone())),
        goals: Arc::new(PostgresGoalRepository::new(pool)),
        config: Arc::new(config),
    };

    let app = create_app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], server_port));
    tracing::info!("escuchando en {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}
