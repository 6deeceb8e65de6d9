//! Application services: block rendering and the capabilities it depends on.

pub mod block_by_identifier;
pub mod context;
pub mod error;
pub mod filter;
pub mod repos;
