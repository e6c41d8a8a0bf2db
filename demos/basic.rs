//! Basic example showing how to use sea-orm-sql-tracing.
//!
//! Run with: cargo run --example basic

use sea_orm::{ConnectionTrait, Database, Statement};
use sea_orm_sql_tracing::prelude::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,sea_orm_sql_tracing=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "postgres://localhost/test".into());

    tracing::info!("Connecting to database...");

    let db = Database::connect(&database_url).await?;

    // Dialect comes from the backend; connection details end up on every span.
    let traced_db = db.with_tracing_config(
        TracingConfig::production().with_peer_address("postgresql", None, Some("localhost"), "test"),
    );

    // Other options:
    //   TracedConnection::from(db)                              sanitized, defaults
    //   TracedConnection::new(db, TracingConfig::development()) raw SQL, dev only

    let backend = traced_db.get_database_backend();
    let rows = traced_db
        .query_all(Statement::from_string(
            backend,
            "SELECT datname FROM pg_database WHERE datname = 'test' LIMIT 1",
        ))
        .await?;

    // The span recorded: SELECT datname FROM pg_database WHERE datname = ? LIMIT 1
    tracing::info!(rows = rows.len(), "Query finished");

    Ok(())
}
