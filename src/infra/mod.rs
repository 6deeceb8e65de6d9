//! Infrastructure adapters: in-memory collaborators, catalog loading and telemetry.

pub mod catalog;
pub mod error;
mod lock;
pub mod memory;
pub mod telemetry;
