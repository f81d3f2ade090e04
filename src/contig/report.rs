//! Parser for NCBI assembly report files.
//!
//! Assembly reports are line-oriented, tab-delimited text. The columns used
//! here are:
//!
//! - Sequence-Name: the primary name (e.g., "1", "X", "MT")
//! - GenBank-Accn: GenBank accession (e.g., "CM000663.2")
//! - Relationship: "=" when the GenBank and RefSeq sequences are identical
//! - RefSeq-Accn: RefSeq accession (e.g., "NC_000001.11")
//! - UCSC-style-name: UCSC-style name (e.g., "chr1")

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;
use thiserror::Error;

use crate::contig::synonyms::ContigSynonyms;

#[derive(Error, Debug)]
pub enum ReportParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid assembly report format: {0}")]
    InvalidFormat(String),
}

/// Load an assembly report from a file, transparently decompressing `.gz`.
///
/// # Errors
///
/// Returns `ReportParseError::Io` if the file cannot be read, or
/// `ReportParseError::InvalidFormat` if the report is malformed.
pub fn load_report(path: &Path) -> Result<Vec<ContigSynonyms>, ReportParseError> {
    let mut text = String::new();
    let file = std::fs::File::open(path)?;
    if path.to_string_lossy().to_lowercase().ends_with(".gz") {
        GzDecoder::new(file).read_to_string(&mut text)?;
    } else {
        let mut file = file;
        file.read_to_string(&mut text)?;
    }
    parse_report_text(&text)
}

/// Parse an assembly report from text, one [`ContigSynonyms`] per row.
///
/// # Errors
///
/// Returns `ReportParseError::InvalidFormat` if the header line is missing,
/// required columns are absent, or no contigs are found.
pub fn parse_report_text(text: &str) -> Result<Vec<ContigSynonyms>, ReportParseError> {
    let mut entries = Vec::new();
    // Lowercase keys for case-insensitive column lookup
    let mut header_map: HashMap<String, usize> = HashMap::new();
    let mut found_header = false;

    for line in text.lines() {
        // Skip comment lines except the header
        if line.starts_with('#') {
            let line_lower = line.to_lowercase();
            if line_lower.contains("sequence-name") {
                let header_line = line.trim_start_matches('#').trim();
                for (idx, col) in header_line.split('\t').enumerate() {
                    header_map.insert(col.trim().to_lowercase(), idx);
                }
                found_header = true;
            }
            continue;
        }

        if line.trim().is_empty() {
            continue;
        }

        if !found_header {
            return Err(ReportParseError::InvalidFormat(
                "assembly report header not found".to_string(),
            ));
        }

        let fields: Vec<&str> = line.split('\t').collect();

        let seq_name_idx = header_map.get("sequence-name").ok_or_else(|| {
            ReportParseError::InvalidFormat("missing Sequence-Name column".to_string())
        })?;
        if fields.len() <= *seq_name_idx {
            continue; // Skip malformed lines
        }
        let sequence_name = fields[*seq_name_idx].trim().to_string();

        let get_optional = |name: &str| -> Option<String> {
            header_map
                .get(name)
                .and_then(|&idx| {
                    fields.get(idx).map(|s| {
                        let s = s.trim();
                        if s.is_empty() || s == "na" {
                            None
                        } else {
                            Some(s.to_string())
                        }
                    })
                })
                .flatten()
        };

        let genbank = get_optional("genbank-accn");
        let refseq = get_optional("refseq-accn");
        // GenBank and RefSeq sequences are byte-identical only when the
        // Relationship column says so and both accessions are present
        let identical = genbank.is_some()
            && refseq.is_some()
            && get_optional("relationship").as_deref() == Some("=");

        entries.push(ContigSynonyms {
            sequence_name,
            genbank,
            refseq,
            ucsc: get_optional("ucsc-style-name"),
            identical_genbank_and_refseq: identical,
        });
    }

    if entries.is_empty() {
        return Err(ReportParseError::InvalidFormat(
            "no contigs found in assembly report".to_string(),
        ));
    }

    Ok(entries)
}
