//! The accession report path: context-base denormalization, deterministic
//! sorting and the resumable two-phase writer.

pub mod denormalize;
pub mod sequence;
pub mod state;
pub mod symbolic;
pub mod writer;

use thiserror::Error;

use crate::report::sequence::SequenceError;
use crate::report::state::StateError;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("contig '{contig}' does not appear in the FASTA file (variant ss{accession})")]
    MissingContig { contig: String, accession: u64 },

    #[error(transparent)]
    Sequence(#[from] SequenceError),

    #[error(transparent)]
    State(#[from] StateError),

    #[error(
        "variant ss{accession} carries named alleles on both reference and alternate; \
         only the alternate may be symbolic"
    )]
    SymbolicAlleleConflict { accession: u64 },

    #[error(
        "cannot determine the original chromosome of contig '{contig}': \
         several are recorded ({candidates:?})"
    )]
    AmbiguousOriginalChromosome {
        contig: String,
        candidates: Vec<String>,
    },

    #[error("the report file {0} was not opened properly; call open() first")]
    NotOpened(String),
}
