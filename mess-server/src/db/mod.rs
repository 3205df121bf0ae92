//! Database Module
//!
//! Embedded SurrealDB (RocksDB engine). Tests run against the in-memory
//! engine through [`DbService::memory`].

pub mod models;
pub mod repository;

use std::path::Path;

use surrealdb::engine::local::{Db, Mem, RocksDb};
use surrealdb::Surreal;

use crate::utils::AppError;

const NAMESPACE: &str = "mess";
const DATABASE: &str = "mess";

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone, Debug)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the on-disk database at the given path
    pub async fn new(db_path: &Path) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        let service = Self::finish_init(db).await?;
        tracing::info!("Database opened at {}", db_path.display());
        Ok(service)
    }

    /// In-memory database for tests
    pub async fn memory() -> Result<Self, AppError> {
        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open in-memory database: {e}")))?;
        Self::finish_init(db).await
    }

    async fn finish_init(db: Surreal<Db>) -> Result<Self, AppError> {
        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        define_indexes(&db).await?;

        Ok(Self { db })
    }
}

/// Uniqueness the application logic relies on:
/// one profile per email, one feedback row per (menu_item, user).
async fn define_indexes(db: &Surreal<Db>) -> Result<(), AppError> {
    db.query(
        "DEFINE INDEX IF NOT EXISTS profile_email ON TABLE profile COLUMNS email UNIQUE;
         DEFINE INDEX IF NOT EXISTS feedback_item_user ON TABLE feedback COLUMNS menu_item, user UNIQUE;",
    )
    .await
    .map_err(|e| AppError::database(format!("Failed to define indexes: {e}")))?;

    Ok(())
}
