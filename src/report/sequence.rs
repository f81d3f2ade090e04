//! Random-access base lookup over an assembly FASTA.
//!
//! Sequences are loaded fully into memory once per job; report generation
//! then asks for single bases at 1-based positions. Supports gzip-compressed
//! input like the rest of the file readers.

use std::collections::HashMap;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::GzDecoder;
use noodles::fasta;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SequenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse FASTA: {0}")]
    Parse(String),

    #[error("No sequences found in FASTA file")]
    Empty,

    #[error("contig '{0}' not present in the sequence source")]
    UnknownContig(String),

    #[error("position {position} is outside contig '{contig}' (length {length})")]
    PositionOutOfRange {
        contig: String,
        position: u64,
        length: usize,
    },
}

/// In-memory random-access reader over an assembly's sequences
#[derive(Debug, Default)]
pub struct FastaSequenceReader {
    sequences: HashMap<String, Vec<u8>>,
}

impl FastaSequenceReader {
    /// Load all sequences from a FASTA file, transparently decompressing `.gz`
    ///
    /// # Errors
    ///
    /// Returns `SequenceError::Io` if the file cannot be read,
    /// `SequenceError::Parse` on malformed FASTA, or `SequenceError::Empty`
    /// if the file holds no sequences.
    pub fn from_path(path: &Path) -> Result<Self, SequenceError> {
        let file = std::fs::File::open(path)?;
        if path.to_string_lossy().to_lowercase().ends_with(".gz") {
            Self::from_reader(BufReader::new(GzDecoder::new(file)))
        } else {
            Self::from_reader(BufReader::new(file))
        }
    }

    /// Load all sequences from any buffered reader
    ///
    /// # Errors
    ///
    /// Returns `SequenceError::Parse` on malformed FASTA or
    /// `SequenceError::Empty` if no sequences are present.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, SequenceError> {
        let mut fasta_reader = fasta::io::Reader::new(reader);
        let mut sequences = HashMap::new();

        for result in fasta_reader.records() {
            let record = result
                .map_err(|e| SequenceError::Parse(format!("Failed to parse FASTA record: {e}")))?;
            let name = String::from_utf8_lossy(record.name()).to_string();
            sequences.insert(name, record.sequence().as_ref().to_vec());
        }

        if sequences.is_empty() {
            return Err(SequenceError::Empty);
        }
        Ok(Self { sequences })
    }

    /// Whether the sequence source holds a contig of this name
    #[must_use]
    pub fn contig_exists(&self, contig: &str) -> bool {
        self.sequences.contains_key(contig)
    }

    /// The base at a 1-based position, uppercased
    ///
    /// # Errors
    ///
    /// Returns `SequenceError::UnknownContig` or
    /// `SequenceError::PositionOutOfRange`.
    pub fn base_at(&self, contig: &str, position: u64) -> Result<char, SequenceError> {
        let sequence = self
            .sequences
            .get(contig)
            .ok_or_else(|| SequenceError::UnknownContig(contig.to_string()))?;
        if position == 0 || position as usize > sequence.len() {
            return Err(SequenceError::PositionOutOfRange {
                contig: contig.to_string(),
                position,
                length: sequence.len(),
            });
        }
        Ok(sequence[position as usize - 1].to_ascii_uppercase() as char)
    }
}
