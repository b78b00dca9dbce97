//! Sequence Repository
//!
//! Single-row atomic counter backing invoice number allocation. The
//! increment runs as one UPSERT statement, so concurrent allocations
//! can never observe the same value.

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::serde_helpers;

/// Counter record, one per named sequence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sequence {
    #[serde(with = "serde_helpers::record_id")]
    pub id: RecordId,
    pub value: i64,
}

#[derive(Clone)]
pub struct SequenceRepository {
    base: BaseRepository,
}

impl SequenceRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Atomically increment the named counter and return the new value
    pub async fn next(&self, name: &str) -> RepoResult<i64> {
        let thing = RecordId::from_table_key("sequence", name);
        let mut result = self
            .base
            .db()
            .query("UPSERT ONLY $thing SET value += 1 RETURN AFTER")
            .bind(("thing", thing))
            .await?;
        let seq: Option<Sequence> = result.take(0)?;
        seq.map(|s| s.value)
            .ok_or_else(|| RepoError::Database(format!("Failed to advance sequence {}", name)))
    }

    /// Read the counter without advancing it
    pub async fn current(&self, name: &str) -> RepoResult<Option<i64>> {
        let thing = RecordId::from_table_key("sequence", name);
        let seq: Option<Sequence> = self.base.db().select(thing).await?;
        Ok(seq.map(|s| s.value))
    }

    /// Raise the counter to at least `floor`, never lowering it
    pub async fn ensure_at_least(&self, name: &str, floor: i64) -> RepoResult<i64> {
        let thing = RecordId::from_table_key("sequence", name);
        let mut result = self
            .base
            .db()
            .query("UPSERT ONLY $thing SET value = math::max([value OR 0, $floor]) RETURN AFTER")
            .bind(("thing", thing))
            .bind(("floor", floor))
            .await?;
        let seq: Option<Sequence> = result.take(0)?;
        seq.map(|s| s.value)
            .ok_or_else(|| RepoError::Database(format!("Failed to seed sequence {}", name)))
    }
}
