//! Repository Module
//!
//! CRUD access to the embedded SurrealDB tables. One repository per
//! table, constructed per request from a cloned database handle.

pub mod invoice;
pub mod order;
pub mod sequence;
pub mod user;

pub use invoice::InvoiceRepository;
pub use order::OrderRepository;
pub use sequence::SequenceRepository;
pub use user::UserRepository;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// List page size when the caller does not ask for one
pub const DEFAULT_LIST_LIMIT: usize = 50;

/// Upper bound on any requested page size
pub const MAX_LIST_LIMIT: usize = 500;

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}
