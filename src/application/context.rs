//! Ambient collaborators shared by every block render: event dispatch and scoped configuration.

use std::sync::Arc;

use tracing::debug;

use crate::domain::stores::StoreId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderEvent {
    BeforeRender {
        identifier: String,
        store: StoreId,
    },
    AfterRender {
        identifier: String,
        store: StoreId,
        html_len: usize,
    },
}

pub trait RenderEvents: Send + Sync {
    fn dispatch(&self, event: &RenderEvent);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEvents;

impl RenderEvents for NoopEvents {
    fn dispatch(&self, _event: &RenderEvent) {}
}

/// Reports render events as `tracing` debug records.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEvents;

impl RenderEvents for TracingEvents {
    fn dispatch(&self, event: &RenderEvent) {
        match event {
            RenderEvent::BeforeRender { identifier, store } => {
                debug!(identifier = %identifier, store = %store, "block render starting");
            }
            RenderEvent::AfterRender {
                identifier,
                store,
                html_len,
            } => {
                debug!(
                    identifier = %identifier,
                    store = %store,
                    html_len,
                    "block render finished"
                );
            }
        }
    }
}

/// Store-scoped configuration consulted before rendering.
pub trait ScopeConfig: Send + Sync {
    fn block_output_disabled(&self, store: StoreId) -> bool;
}

/// Block output is enabled in every store.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputEnabled;

impl ScopeConfig for OutputEnabled {
    fn block_output_disabled(&self, _store: StoreId) -> bool {
        false
    }
}

#[derive(Clone)]
pub struct RenderContext {
    pub events: Arc<dyn RenderEvents>,
    pub scope_config: Arc<dyn ScopeConfig>,
}

impl RenderContext {
    pub fn new(events: Arc<dyn RenderEvents>, scope_config: Arc<dyn ScopeConfig>) -> Self {
        Self {
            events,
            scope_config,
        }
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::new(Arc::new(NoopEvents), Arc::new(OutputEnabled))
    }
}
