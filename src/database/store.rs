use async_trait::async_trait;

use super::manager::DatabaseError;
use crate::types::{DeletedEntry, EntryId, RepeatId};

/// Storage operations behind booking deletion.
///
/// Implementations run each method as a single statement; nothing here spans
/// a transaction. Callers sequence the calls and decide what a partial
/// failure means.
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Delete every entry whose id is in `ids`, returning the number removed
    async fn delete_entries(&self, ids: &[EntryId]) -> Result<u64, DatabaseError>;

    /// Delete every repeat series no remaining entry references
    async fn delete_orphaned_repeats(&self) -> Result<u64, DatabaseError>;

    /// Delete one entry, reporting the series it belonged to
    async fn delete_entry(&self, id: EntryId) -> Result<Option<DeletedEntry>, DatabaseError>;

    /// Delete `id` only if no entry references it any more
    async fn delete_repeat_if_orphaned(&self, id: RepeatId) -> Result<bool, DatabaseError>;

    /// Connectivity check used by the health endpoint
    async fn ping(&self) -> Result<(), DatabaseError>;
}
