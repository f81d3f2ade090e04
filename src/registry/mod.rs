//! The accession registry: keyed tables of clustered and submitted variants
//! plus the append-only operation history.

pub mod generator;
pub mod store;

pub use generator::{AccessionGenerationError, MonotonicAccessionGenerator};
pub use store::{BulkInsertOutcome, RegistryError, VariantRegistry};
