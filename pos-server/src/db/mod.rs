//! Database Module
//!
//! Embedded SurrealDB (RocksDB engine) plus schema definition. Tables
//! stay schemaless; the unique indexes back the invariants the
//! invoicing workflow relies on.

pub mod models;
pub mod repository;

use crate::utils::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

/// Database service, owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the database at `db_path` and apply schema
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        db.use_ns("pos")
            .use_db("main")
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        define_schema(&db).await?;

        tracing::info!(path = %db_path, "Database opened (SurrealDB RocksDB)");
        Ok(Self { db })
    }

    pub fn db(&self) -> Surreal<Db> {
        self.db.clone()
    }
}

/// Idempotent schema setup, safe to run on every boot
pub async fn define_schema(db: &Surreal<Db>) -> Result<(), AppError> {
    db.query(
        r#"
        DEFINE TABLE IF NOT EXISTS user SCHEMALESS;
        DEFINE TABLE IF NOT EXISTS order SCHEMALESS;
        DEFINE TABLE IF NOT EXISTS invoice SCHEMALESS;
        DEFINE TABLE IF NOT EXISTS sequence SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS user_email_idx ON TABLE user COLUMNS email UNIQUE;
        DEFINE INDEX IF NOT EXISTS invoice_number_idx ON TABLE invoice COLUMNS invoiceNumber UNIQUE;
        "#,
    )
    .await
    .map_err(|e| AppError::database(format!("Failed to define schema: {e}")))?;
    Ok(())
}
