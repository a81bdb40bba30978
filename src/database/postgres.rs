use async_trait::async_trait;
use sqlx::{PgPool, Row};

use super::manager::DatabaseError;
use super::store::BookingStore;
use super::tables::TableNames;
use crate::types::{DeletedEntry, EntryId, RepeatId};

/// Booking store backed by the `entry` and `repeat` tables in Postgres
#[derive(Clone)]
pub struct PgBookingStore {
    pool: PgPool,
    tables: TableNames,
}

impl PgBookingStore {
    pub fn new(pool: PgPool, tables: TableNames) -> Self {
        Self { pool, tables }
    }

    fn delete_entries_sql(&self) -> String {
        format!("DELETE FROM {} WHERE id = ANY($1)", self.tables.entry())
    }

    // NOT EXISTS rather than NOT IN: a single NULL repeat_id in the entry
    // table would make NOT IN match nothing.
    fn delete_orphans_sql(&self) -> String {
        format!(
            "DELETE FROM {repeat} r WHERE NOT EXISTS (SELECT 1 FROM {entry} e WHERE e.repeat_id = r.id)",
            repeat = self.tables.repeat(),
            entry = self.tables.entry(),
        )
    }

    fn delete_entry_sql(&self) -> String {
        format!(
            "DELETE FROM {} WHERE id = $1 RETURNING id::int8 AS id, repeat_id::int8 AS repeat_id",
            self.tables.entry()
        )
    }

    fn delete_repeat_if_orphaned_sql(&self) -> String {
        format!(
            "DELETE FROM {repeat} r WHERE r.id = $1 AND NOT EXISTS (SELECT 1 FROM {entry} e WHERE e.repeat_id = r.id)",
            repeat = self.tables.repeat(),
            entry = self.tables.entry(),
        )
    }
}

#[async_trait]
impl BookingStore for PgBookingStore {
    async fn delete_entries(&self, ids: &[EntryId]) -> Result<u64, DatabaseError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let ids: Vec<i64> = ids.iter().map(|id| id.get()).collect();
        let result = sqlx::query(&self.delete_entries_sql())
            .bind(&ids)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn delete_orphaned_repeats(&self) -> Result<u64, DatabaseError> {
        let result = sqlx::query(&self.delete_orphans_sql())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn delete_entry(&self, id: EntryId) -> Result<Option<DeletedEntry>, DatabaseError> {
        let row = sqlx::query(&self.delete_entry_sql())
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let deleted_id: i64 = row.try_get("id")?;
        let repeat_id: Option<i64> = row.try_get("repeat_id")?;
        let id = EntryId::new(deleted_id)
            .ok_or_else(|| {
                DatabaseError::QueryError(format!("negative entry id {} returned", deleted_id))
            })?;

        Ok(Some(DeletedEntry {
            id,
            repeat_id: repeat_id.map(RepeatId),
        }))
    }

    async fn delete_repeat_if_orphaned(&self, id: RepeatId) -> Result<bool, DatabaseError> {
        let result = sqlx::query(&self.delete_repeat_if_orphaned_sql())
            .bind(id.0)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
