//! TOML catalog of stores and blocks used to seed the in-memory repository.
//!
//! ```toml
//! [[stores]]
//! id = 1
//! code = "default"
//! base_url = "https://shop.example/"
//!
//! [[blocks]]
//! id = 1
//! identifier = "footer"
//! content = "<p>{{store code}}</p>"
//! stores = [0]
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::domain::blocks::BlockRecord;
use crate::domain::stores::{StoreId, StoreRecord};

use super::error::InfraError;
use super::memory::InMemoryBlocks;

const ADMIN_STORE_CODE: &str = "admin";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Catalog {
    pub stores: Vec<StoreRecord>,
    pub blocks: Vec<BlockRecord>,
}

impl Catalog {
    pub fn from_toml_str(raw: &str) -> Result<Self, InfraError> {
        let catalog: Catalog = toml::from_str(raw)
            .map_err(|err| InfraError::catalog(format!("failed to parse catalog: {err}")))?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub async fn load(path: &Path) -> Result<Self, InfraError> {
        let raw = tokio::fs::read_to_string(path).await?;
        Self::from_toml_str(&raw)
    }

    fn validate(&self) -> Result<(), InfraError> {
        let mut store_ids = HashSet::new();
        for store in &self.stores {
            if !store_ids.insert(store.id) {
                return Err(InfraError::catalog(format!(
                    "duplicate store id {}",
                    store.id
                )));
            }
        }

        let mut block_ids = HashSet::new();
        for block in &self.blocks {
            block.validate()?;
            if !block_ids.insert(block.id) {
                return Err(InfraError::catalog(format!(
                    "duplicate block id {}",
                    block.id
                )));
            }
        }
        Ok(())
    }

    /// The requested store, or the first storefront when none is requested.
    ///
    /// Falls back to the all-stores scope when the catalog declares no stores.
    pub fn store(&self, requested: Option<StoreId>) -> Result<StoreRecord, InfraError> {
        match requested {
            Some(id) => self
                .stores
                .iter()
                .find(|store| store.id == id)
                .cloned()
                .ok_or_else(|| InfraError::catalog(format!("unknown store id {id}"))),
            None => Ok(self
                .stores
                .iter()
                .find(|store| !store.id.is_admin())
                .or_else(|| self.stores.first())
                .cloned()
                .unwrap_or_else(|| StoreRecord::new(StoreId::ADMIN, ADMIN_STORE_CODE))),
        }
    }

    pub fn into_repository(self) -> Result<InMemoryBlocks, InfraError> {
        let repo = InMemoryBlocks::new();
        for block in self.blocks {
            let id = block.id;
            repo.upsert(block)
                .map_err(|err| InfraError::catalog(format!("block {id} rejected: {err}")))?;
        }
        Ok(repo)
    }
}
