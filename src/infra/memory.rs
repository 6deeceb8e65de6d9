//! In-process implementations of the block and store capabilities.

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use tracing::debug;

use crate::application::repos::{BlockLookup, RepoError, StoreResolver};
use crate::domain::blocks::BlockRecord;
use crate::domain::stores::{StoreId, StoreRecord};

use super::lock::{rw_read, rw_write};

const SOURCE: &str = "infra::memory::InMemoryBlocks";

/// Blocks keyed by id.
///
/// An identifier is unique per store: two blocks may share one only when their
/// store assignments do not overlap.
#[derive(Default)]
pub struct InMemoryBlocks {
    blocks: RwLock<BTreeMap<u64, BlockRecord>>,
}

impl InMemoryBlocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the block with the same id.
    pub fn upsert(&self, block: BlockRecord) -> Result<(), RepoError> {
        block
            .validate()
            .map_err(|err| RepoError::invalid_input(err.to_string()))?;

        let mut blocks = rw_write(&self.blocks, SOURCE, "upsert");
        let conflict = blocks.values().find(|existing| {
            existing.id != block.id
                && existing.identifier == block.identifier
                && existing
                    .stores
                    .iter()
                    .any(|store| block.stores.contains(store))
        });
        if let Some(existing) = conflict {
            return Err(RepoError::invalid_input(format!(
                "identifier `{}` already used by block {} in an overlapping store",
                block.identifier, existing.id
            )));
        }

        blocks.insert(block.id, block);
        Ok(())
    }

    pub fn remove(&self, id: u64) -> Option<BlockRecord> {
        rw_write(&self.blocks, SOURCE, "remove").remove(&id)
    }

    pub fn len(&self) -> usize {
        rw_read(&self.blocks, SOURCE, "len").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl BlockLookup for InMemoryBlocks {
    async fn find_by_identifier(
        &self,
        identifier: &str,
        store: StoreId,
    ) -> Result<BlockRecord, RepoError> {
        let blocks = rw_read(&self.blocks, SOURCE, "find_by_identifier");
        let found = blocks
            .values()
            .filter(|block| {
                block.active && block.identifier == identifier && block.is_visible_in(store)
            })
            // A store-specific assignment wins over the all-stores one.
            .max_by_key(|block| block.is_assigned_to(store))
            .cloned();

        match found {
            Some(block) => Ok(block),
            None => {
                debug!(identifier, store = %store, "no active block for identifier");
                Err(RepoError::NotFound)
            }
        }
    }
}

/// Always resolves to the store it was built with.
#[derive(Debug, Clone)]
pub struct FixedStoreResolver {
    store: StoreRecord,
}

impl FixedStoreResolver {
    pub fn new(store: StoreRecord) -> Self {
        Self { store }
    }
}

impl StoreResolver for FixedStoreResolver {
    fn current_store(&self) -> StoreRecord {
        self.store.clone()
    }
}
