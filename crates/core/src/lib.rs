//! `basketdash-core` — shared primitives for the discount dashboard.
//!
//! This crate contains **pure domain** types (no IO, no HTTP, no CSV).

pub mod dimension;
pub mod error;

pub use dimension::Dimension;
pub use error::{QueryError, QueryResult};
