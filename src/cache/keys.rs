//! Cache identity keys published alongside rendered blocks.
//!
//! An external invalidation mechanism tags cached output with these strings and
//! purges it when the block or its identifier changes.

use crate::domain::stores::StoreId;

/// `{prefix}_{identifier}`: matches the block in every store.
pub fn identifier_key(prefix: &str, identifier: &str) -> String {
    format!("{prefix}_{identifier}")
}

/// `{prefix}_{identifier}_{store}`: matches the block in one store.
pub fn scoped_identifier_key(prefix: &str, identifier: &str, store: StoreId) -> String {
    format!("{prefix}_{identifier}_{store}")
}

/// `{prefix}_{block_id}`: matches the resolved entity.
pub fn entity_key(prefix: &str, block_id: u64) -> String {
    format!("{prefix}_{block_id}")
}

/// Ordered identity set for a block request.
///
/// The identifier keys always come first; the entity key is appended only when
/// the block resolved.
pub fn block_identities(
    prefix: &str,
    identifier: &str,
    store: StoreId,
    block_id: Option<u64>,
) -> Vec<String> {
    let mut identities = vec![
        identifier_key(prefix, identifier),
        scoped_identifier_key(prefix, identifier, store),
    ];
    if let Some(id) = block_id {
        identities.push(entity_key(prefix, id));
    }
    identities
}
