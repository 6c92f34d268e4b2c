//! Database connection pool using the OnceCell pattern.

use sqlx::migrate::MigrateError;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tokio::sync::OnceCell;

use crate::settings::settings;

static POOL: OnceCell<PgPool> = OnceCell::const_new();

/// Get or initialize the database connection pool from `database.url`.
pub async fn get_pool() -> Result<&'static PgPool, sqlx::Error> {
    POOL.get_or_try_init(|| async {
        let settings = settings()
            .await
            .map_err(|e| sqlx::Error::Configuration(Box::new(e)))?;

        PgPoolOptions::new()
            .max_connections(5)
            .connect(&settings.database.url)
            .await
    })
    .await
}

/// Create the content tables, seed the singleton rows and install the change triggers.
pub async fn migrate(pool: &PgPool) -> Result<(), MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
