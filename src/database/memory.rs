use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use tokio::sync::Mutex;

use super::manager::DatabaseError;
use super::store::BookingStore;
use crate::types::{DeletedEntry, EntryId, RepeatId};

#[derive(Debug, Default)]
struct Tables {
    entries: BTreeMap<EntryId, Option<RepeatId>>,
    repeats: BTreeSet<RepeatId>,
}

impl Tables {
    fn is_referenced(&self, repeat: RepeatId) -> bool {
        self.entries.values().any(|r| *r == Some(repeat))
    }
}

/// In-process booking store with the same deletion semantics as the
/// Postgres tables. Used for local development and tests.
#[derive(Debug, Default)]
pub struct MemoryBookingStore {
    tables: Mutex<Tables>,
}

impl MemoryBookingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_repeat(&self, id: RepeatId) {
        self.tables.lock().await.repeats.insert(id);
    }

    pub async fn insert_entry(&self, id: EntryId, repeat_id: Option<RepeatId>) {
        self.tables.lock().await.entries.insert(id, repeat_id);
    }

    pub async fn entry_ids(&self) -> Vec<EntryId> {
        self.tables.lock().await.entries.keys().copied().collect()
    }

    pub async fn repeat_ids(&self) -> Vec<RepeatId> {
        self.tables.lock().await.repeats.iter().copied().collect()
    }
}

#[async_trait]
impl BookingStore for MemoryBookingStore {
    async fn delete_entries(&self, ids: &[EntryId]) -> Result<u64, DatabaseError> {
        let mut tables = self.tables.lock().await;
        let wanted: BTreeSet<EntryId> = ids.iter().copied().collect();
        let before = tables.entries.len();
        tables.entries.retain(|id, _| !wanted.contains(id));
        Ok((before - tables.entries.len()) as u64)
    }

    async fn delete_orphaned_repeats(&self) -> Result<u64, DatabaseError> {
        let mut tables = self.tables.lock().await;
        let referenced: BTreeSet<RepeatId> = tables.entries.values().flatten().copied().collect();
        let before = tables.repeats.len();
        tables.repeats.retain(|id| referenced.contains(id));
        Ok((before - tables.repeats.len()) as u64)
    }

    async fn delete_entry(&self, id: EntryId) -> Result<Option<DeletedEntry>, DatabaseError> {
        let mut tables = self.tables.lock().await;
        Ok(tables
            .entries
            .remove(&id)
            .map(|repeat_id| DeletedEntry { id, repeat_id }))
    }

    async fn delete_repeat_if_orphaned(&self, id: RepeatId) -> Result<bool, DatabaseError> {
        let mut tables = self.tables.lock().await;
        if tables.is_referenced(id) {
            return Ok(false);
        }
        Ok(tables.repeats.remove(&id))
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}
