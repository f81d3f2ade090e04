//! Contig naming reconciliation across competing naming standards.
//!
//! An NCBI assembly report gives up to four names for every contig
//! (Sequence-Name, GenBank, RefSeq, UCSC). The [`ContigSynonymTable`] built
//! from the report resolves any of those names to the full synonym set, and
//! can substitute one naming standard for another — refusing GenBank↔RefSeq
//! substitutions for contigs whose sequences are not byte-identical, because
//! that would silently change the coordinate system.

pub mod report;
pub mod synonyms;

pub use report::{load_report, parse_report_text, ReportParseError};
pub use synonyms::{ContigSynonymTable, ContigSynonyms, SynonymError};
