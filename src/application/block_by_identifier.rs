//! Renders a CMS block addressed by identifier in the current store.

use std::sync::Arc;

use metrics::counter;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::application::context::{RenderContext, RenderEvent};
use crate::application::error::{ErrorReport, RenderError};
use crate::application::filter::FilterProvider;
use crate::application::repos::{BlockLookup, RepoError, StoreResolver};
use crate::cache::block_identities;
use crate::domain::blocks::{BlockRecord, requested_identifier};
use crate::domain::stores::StoreId;

const SOURCE: &str = "application::block_by_identifier::BlockByIdentifier";
const RENDER_METRIC: &str = "cms_blocks_render_total";

/// Lookup outcome for one store; `None` means the block does not exist there.
type Resolution = (StoreId, Option<BlockRecord>);

/// Request-scoped block renderer.
///
/// The lookup outcome is memoized per instance, so `render` and `identities`
/// may be called in any order and agree with each other.
pub struct BlockByIdentifier {
    lookup: Arc<dyn BlockLookup>,
    stores: Arc<dyn StoreResolver>,
    filters: Arc<dyn FilterProvider>,
    context: RenderContext,
    identifier: Option<String>,
    resolved: OnceCell<Resolution>,
}

impl BlockByIdentifier {
    pub const CACHE_KEY_PREFIX: &'static str = "CMS_BLOCK";

    pub fn new(
        lookup: Arc<dyn BlockLookup>,
        stores: Arc<dyn StoreResolver>,
        filters: Arc<dyn FilterProvider>,
        context: RenderContext,
        identifier: Option<String>,
    ) -> Self {
        Self {
            lookup,
            stores,
            filters,
            context,
            identifier: requested_identifier(identifier),
            resolved: OnceCell::new(),
        }
    }

    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    /// Filtered block content, or an empty string when there is nothing to show.
    ///
    /// A missing block is not an error. Only lookup failures other than
    /// not-found reach the caller.
    pub async fn render(&self) -> Result<String, RenderError> {
        let Some(identifier) = self.identifier.as_deref() else {
            record_outcome("no_identifier");
            return Ok(String::new());
        };

        let store = self.stores.current_store();
        if self.context.scope_config.block_output_disabled(store.id) {
            debug!(identifier, store = %store.id, "block output disabled for store");
            record_outcome("output_disabled");
            return Ok(String::new());
        }

        self.context.events.dispatch(&RenderEvent::BeforeRender {
            identifier: identifier.to_string(),
            store: store.id,
        });

        let block = match self.resolve(identifier, store.id).await {
            Ok(block) => block,
            Err(err) => {
                record_outcome("error");
                return Err(RenderError::lookup(identifier, store.id, err));
            }
        };

        let html = match block {
            Some(block) => {
                record_outcome("rendered");
                self.filters.block_filter(&store).filter(&block.content)
            }
            None => {
                debug!(identifier, store = %store.id, "block not found, rendering nothing");
                record_outcome("not_found");
                String::new()
            }
        };

        self.context.events.dispatch(&RenderEvent::AfterRender {
            identifier: identifier.to_string(),
            store: store.id,
            html_len: html.len(),
        });

        Ok(html)
    }

    /// Cache identities of the rendered output. Lookup failures shrink the set instead of failing.
    pub async fn identities(&self) -> Vec<String> {
        let Some(identifier) = self.identifier.as_deref() else {
            return Vec::new();
        };

        let store = self.stores.current_store().id;
        let block_id = match self.resolve(identifier, store).await {
            Ok(block) => block.map(|block| block.id),
            Err(err) => {
                let report = ErrorReport::from_error(SOURCE, &err);
                warn!(
                    identifier,
                    store = %store,
                    source = report.source,
                    error = %report.joined(),
                    "block lookup failed while collecting cache identities"
                );
                None
            }
        };

        block_identities(Self::CACHE_KEY_PREFIX, identifier, store, block_id)
    }

    async fn resolve(
        &self,
        identifier: &str,
        store: StoreId,
    ) -> Result<Option<BlockRecord>, RepoError> {
        let (resolved_store, block) = self
            .resolved
            .get_or_try_init(|| async {
                Ok::<_, RepoError>((store, self.fetch(identifier, store).await?))
            })
            .await?;

        if *resolved_store == store {
            return Ok(block.clone());
        }

        // The store changed under this instance; answer without replacing the memo.
        self.fetch(identifier, store).await
    }

    async fn fetch(
        &self,
        identifier: &str,
        store: StoreId,
    ) -> Result<Option<BlockRecord>, RepoError> {
        match self.lookup.find_by_identifier(identifier, store).await {
            Ok(block) => Ok(Some(block)),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }
}

fn record_outcome(outcome: &'static str) {
    counter!(RENDER_METRIC, "outcome" => outcome).increment(1);
}
