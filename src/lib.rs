//! Store-scoped CMS block rendering.
//!
//! [`application::block_by_identifier::BlockByIdentifier`] resolves a block by
//! identifier in the current store, renders it through a template filter and
//! reports the cache identities of its output.

pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;
