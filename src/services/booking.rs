use std::sync::Arc;
use tracing::{debug, warn};

use crate::database::{BookingStore, DatabaseError};
use crate::types::EntryId;

/// How a batch of entries is removed.
///
/// `Bulk` issues one membership delete followed by one global orphan sweep.
/// It is orders of magnitude faster than walking the batch, and in exchange
/// it skips every per-record hook. Only callers that have already checked
/// booking-admin capability may use it.
///
/// `Single` removes entries one at a time and tidies the repeat series of each
/// as it goes. It is the path per-record hooks attach to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionMode {
    Bulk,
    Single,
}

impl DeletionMode {
    pub fn runs_record_hooks(self) -> bool {
        matches!(self, DeletionMode::Single)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DeletionMode::Bulk => "bulk",
            DeletionMode::Single => "single",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteError {
    #[error("entry deletion failed: {0}")]
    Entries(#[source] DatabaseError),
}

/// Result of a deletion request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeleteOutcome {
    pub entries_deleted: u64,
    pub repeats_deleted: u64,
    /// Entries were removed but the repeat sweep failed; the next run picks
    /// the orphans up.
    pub cleanup_failed: bool,
}

#[derive(Clone)]
pub struct BookingService {
    store: Arc<dyn BookingStore>,
}

impl BookingService {
    pub fn new(store: Arc<dyn BookingStore>) -> Self {
        Self { store }
    }

    pub async fn delete_entries(
        &self,
        ids: &[EntryId],
        mode: DeletionMode,
    ) -> Result<DeleteOutcome, DeleteError> {
        debug!(mode = mode.as_str(), requested = ids.len(), "deleting entries");
        match mode {
            DeletionMode::Bulk => self.delete_bulk(ids).await,
            DeletionMode::Single => self.delete_single(ids).await,
        }
    }

    async fn delete_bulk(&self, ids: &[EntryId]) -> Result<DeleteOutcome, DeleteError> {
        let entries_deleted = self
            .store
            .delete_entries(ids)
            .await
            .map_err(DeleteError::Entries)?;

        let mut outcome = DeleteOutcome {
            entries_deleted,
            ..Default::default()
        };

        match self.store.delete_orphaned_repeats().await {
            Ok(n) => outcome.repeats_deleted = n,
            Err(e) => {
                warn!(
                    "Orphaned repeat cleanup failed after deleting {} entries: {}",
                    entries_deleted, e
                );
                outcome.cleanup_failed = true;
            }
        }

        Ok(outcome)
    }

    async fn delete_single(&self, ids: &[EntryId]) -> Result<DeleteOutcome, DeleteError> {
        let mut outcome = DeleteOutcome::default();

        for &id in ids {
            let Some(deleted) = self
                .store
                .delete_entry(id)
                .await
                .map_err(DeleteError::Entries)?
            else {
                continue;
            };
            outcome.entries_deleted += 1;

            let Some(repeat_id) = deleted.repeat_id else {
                continue;
            };
            match self.store.delete_repeat_if_orphaned(repeat_id).await {
                Ok(true) => outcome.repeats_deleted += 1,
                Ok(false) => {}
                Err(e) => {
                    warn!(
                        "Could not clean up repeat {} after deleting entry {}: {}",
                        repeat_id, id, e
                    );
                    outcome.cleanup_failed = true;
                }
            }
        }

        Ok(outcome)
    }

    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        self.store.ping().await
    }
}
