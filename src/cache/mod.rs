//! Cache identities for rendered blocks.
//!
//! Nothing here stores output. The keys are handed to whichever response or
//! fragment cache the host application runs, which uses them as invalidation tags.

mod keys;

pub use keys::{block_identities, entity_key, identifier_key, scoped_identifier_key};
