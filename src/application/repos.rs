//! Repository traits describing the collaborators a block render reaches through.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::blocks::BlockRecord;
use crate::domain::stores::{StoreId, StoreRecord};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
}

impl RepoError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

/// Resolves an active block by identifier within a store scope.
#[async_trait]
pub trait BlockLookup: Send + Sync {
    async fn find_by_identifier(
        &self,
        identifier: &str,
        store: StoreId,
    ) -> Result<BlockRecord, RepoError>;
}

/// Resolves the store the current request renders for.
pub trait StoreResolver: Send + Sync {
    fn current_store(&self) -> StoreRecord;
}
