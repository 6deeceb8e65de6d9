use std::error::Error as StdError;

use thiserror::Error;

use crate::{application::repos::RepoError, domain::stores::StoreId};

/// Flattened view of an error and its source chain, suitable for structured logs.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub source: &'static str,
    pub messages: Vec<String>,
}

impl ErrorReport {
    pub fn from_error(source: &'static str, error: &dyn StdError) -> Self {
        let mut messages = Vec::new();
        messages.push(error.to_string());
        let mut current = error.source();
        while let Some(inner) = current {
            messages.push(inner.to_string());
            current = inner.source();
        }
        Self { source, messages }
    }

    pub fn joined(&self) -> String {
        self.messages.join(": ")
    }
}

/// Failures a block render surfaces to its caller.
///
/// A block that does not exist is not an error: it renders as nothing.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("block lookup for `{identifier}` in store {store} failed")]
    Lookup {
        identifier: String,
        store: StoreId,
        #[source]
        source: RepoError,
    },
}

impl RenderError {
    pub fn lookup(identifier: impl Into<String>, store: StoreId, source: RepoError) -> Self {
        Self::Lookup {
            identifier: identifier.into(),
            store,
            source,
        }
    }
}
