use actix_web::{web, App, HttpServer};
use anyhow::Context;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use compras::config::Config;
use compras::modules::health;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Configuration validation failed")?;

    // Initialize tracing; RUST_LOG wins over LOG_LEVEL
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("compras={},actix_web=info", config.app.log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(env = %config.app.env, "Starting purchase order service");

    let db_pool = config
        .database
        .create_pool()
        .await
        .context("Failed to create database pool")?;

    tracing::info!(
        pool_size = config.database.pool_size,
        max_connections = config.database.max_connections,
        "Database pool initialized"
    );

    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .context("Failed to run migrations")?;

    // The engines are library APIs wired by the embedding application; this binary
    // owns the schema and serves health and readiness only.
    if config.exchange_rate.api_key.is_empty() {
        tracing::warn!("DECOLECTA_API_KEY is not set; USD operations will be rejected");
    }

    let bind_address = config.server.bind_address();
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(db_pool.clone()))
            .configure(health::configure)
    })
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .run();

    tracing::info!("Server started at http://{}", bind_address);

    server.await?;
    Ok(())
}
