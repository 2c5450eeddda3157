use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

pub async fn connect(database_url: &str) -> anyhow::Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
        .context("connect to database")
}

/// Applies the embedded migrations. Failure is logged and startup continues.
pub async fn migrate(db: &PgPool) {
    match sqlx::migrate!("./migrations").run(db).await {
        Ok(()) => tracing::info!("database migrations applied"),
        Err(e) => {
            tracing::warn!(error = %e, "migrations folder not found or migration failed; continuing")
        }
    }
}
