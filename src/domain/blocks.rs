//! Content blocks addressed by identifier within a store scope.

use serde::{Deserialize, Serialize};

use crate::domain::{error::DomainError, stores::StoreId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRecord {
    pub id: u64,
    pub identifier: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default = "default_stores")]
    pub stores: Vec<StoreId>,
}

fn default_active() -> bool {
    true
}

fn default_stores() -> Vec<StoreId> {
    vec![StoreId::ADMIN]
}

impl BlockRecord {
    pub fn new(id: u64, identifier: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id,
            identifier: identifier.into(),
            title: String::new(),
            content: content.into(),
            active: true,
            stores: default_stores(),
        }
    }

    pub fn with_stores(mut self, stores: impl IntoIterator<Item = StoreId>) -> Self {
        self.stores = stores.into_iter().collect();
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// Whether the block is assigned to `store`, directly or via the all-stores scope.
    pub fn is_visible_in(&self, store: StoreId) -> bool {
        self.stores
            .iter()
            .any(|assigned| *assigned == store || assigned.is_admin())
    }

    /// Whether the block is assigned to `store` itself rather than through the all-stores scope.
    pub fn is_assigned_to(&self, store: StoreId) -> bool {
        self.stores.contains(&store)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.identifier.trim().is_empty() {
            return Err(DomainError::validation(format!(
                "block {} has an empty identifier",
                self.id
            )));
        }
        if self.stores.is_empty() {
            return Err(DomainError::validation(format!(
                "block `{}` is not assigned to any store",
                self.identifier
            )));
        }
        Ok(())
    }
}

/// Normalizes a requested identifier: blank identifiers request no block.
pub fn requested_identifier(identifier: Option<String>) -> Option<String> {
    identifier.filter(|value| !value.trim().is_empty())
}
