//! # Postgres store
//!
//! Every collection is a table; see `migrations/`. Queries are checked at
//! runtime so the crate builds without a live database.

mod content;
mod people;
mod rows;

use domains::{AppError, Result};
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{error, info};

#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
            .map_err(AppError::internal)?;
        info!(max_connections, "postgres pool ready");
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(AppError::internal)?;
        info!("migrations applied");
        Ok(())
    }
}

/// Unique and foreign-key violations surface as conflicts, everything else
/// as an internal failure.
fn db_error(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db) = &err {
        match db.code().as_deref() {
            Some("23505") => return AppError::conflict("Record already exists"),
            Some("23503") => return AppError::conflict("Record is still referenced"),
            _ => {}
        }
    }
    error!(error = %err, "postgres query failed");
    AppError::internal(err)
}

/// Zero affected rows on an update means the record is gone.
fn expect_one(affected: u64, entity: &str) -> Result<()> {
    if affected == 0 {
        Err(AppError::not_found(entity))
    } else {
        Ok(())
    }
}
