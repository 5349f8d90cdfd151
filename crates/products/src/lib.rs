//! Products module: the product table and its CSV loader.
//!
//! The table is loaded once and never mutated afterwards. Everything that
//! reads it (aggregation, view models) borrows it.

pub mod loader;
pub mod product;

pub use loader::{load, load_from_reader, LoadError, LoadOptions, LoadReport, MissingValuePolicy};
pub use product::{ProductRow, ProductTable};
