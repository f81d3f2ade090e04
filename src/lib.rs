//! # variant-registry
//!
//! A library for maintaining canonical genomic variant accessions.
//!
//! Variant archives hand out two kinds of identifiers: submitted-variant
//! accessions (SS), one per submission, and clustered-variant accessions
//! (RS), one per genomic locus and variant type. As new data arrives the
//! registry has to stay consistent: identical loci discovered under
//! different accessions are merged into one canonical identifier, an
//! accession later found to span multiple loci is split, and superseded
//! accessions are deprecated — all while an append-only operation history
//! keeps every change replayable.
//!
//! ## Example
//!
//! ```rust
//! use variant_registry::{ClusteredVariant, VariantRegistry, VariantType};
//! use variant_registry::resolve::{apply_merge, resolve_merge};
//!
//! // Two accessions turn out to denote the same locus
//! let older = ClusteredVariant::new(7, "GCA_000001405.28", "1", 1000, VariantType::Snv);
//! let newer = ClusteredVariant::new(10, "GCA_000001405.28", "1", 1000, VariantType::Snv);
//!
//! let mut registry = VariantRegistry::new();
//! registry.upsert_clustered(older.clone());
//! registry.upsert_clustered(newer.clone());
//!
//! // The earlier-assigned accession survives
//! let (survivor, mergees) = resolve_merge(vec![newer, older]).unwrap();
//! assert_eq!(survivor.accession, 7);
//! apply_merge(&mut registry, &survivor, &mergees, "GCA_000001405.28");
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Core data types for variants and operations
//! - [`contig`]: Contig naming reconciliation across naming standards
//! - [`registry`]: The keyed registry store and accession generator
//! - [`resolve`]: Merge, split and deprecation resolution
//! - [`report`]: Context-base denormalization and the resumable report writer
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod contig;
pub mod core;
pub mod registry;
pub mod report;
pub mod resolve;

// Re-export commonly used types for convenience
pub use contig::synonyms::{ContigSynonymTable, ContigSynonyms};
pub use core::clustered::ClusteredVariant;
pub use core::operation::Operation;
pub use core::submitted::SubmittedVariant;
pub use core::types::*;
pub use registry::store::VariantRegistry;
pub use report::writer::AccessionReportWriter;
