use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::contig::report::{load_report, ReportParseError};
use crate::core::types::ContigNaming;

/// All naming variants of one contig, one row of the assembly report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContigSynonyms {
    /// Primary name (Sequence-Name column)
    pub sequence_name: String,

    /// GenBank/INSDC accession
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genbank: Option<String>,

    /// RefSeq accession
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refseq: Option<String>,

    /// UCSC-style name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ucsc: Option<String>,

    /// Whether the GenBank and RefSeq sequences are byte-identical
    /// (Relationship column)
    pub identical_genbank_and_refseq: bool,
}

impl ContigSynonyms {
    /// All non-empty names of this contig
    pub fn all_names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.sequence_name.as_str())
            .chain(self.genbank.as_deref())
            .chain(self.refseq.as_deref())
            .chain(self.ucsc.as_deref())
    }

    /// The name this contig carries under a given naming standard
    #[must_use]
    pub fn name_for(&self, naming: ContigNaming) -> Option<&str> {
        match naming {
            ContigNaming::SequenceName => Some(self.sequence_name.as_str()),
            ContigNaming::Genbank => self.genbank.as_deref(),
            ContigNaming::Refseq => self.refseq.as_deref(),
            ContigNaming::Ucsc => self.ucsc.as_deref(),
            ContigNaming::NoReplacement => None,
        }
    }

    fn is_genbank(&self, name: &str) -> bool {
        self.genbank.as_deref() == Some(name)
    }

    fn is_refseq(&self, name: &str) -> bool {
        self.refseq.as_deref() == Some(name)
    }
}

/// Why a synonym lookup did not produce a replacement name.
///
/// Callers decide whether to treat this as a hard error (import validation)
/// or fall back to the original name (report writing).
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SynonymError {
    #[error("contig '{0}' has no synonyms in the assembly report")]
    UnknownContig(String),

    #[error("contig '{contig}' has no {naming} synonym")]
    NoSynonym { contig: String, naming: ContigNaming },

    #[error(
        "refusing to substitute '{contig}' with '{replacement}': GenBank and RefSeq sequences \
         are not identical according to the assembly report"
    )]
    NonIdenticalSequences { contig: String, replacement: String },
}

/// Lookup of contig synonym sets, keyed by any of a contig's names.
///
/// Built once per assembly from a static report file; immutable afterward.
#[derive(Debug, Default)]
pub struct ContigSynonymTable {
    entries: Vec<ContigSynonyms>,

    /// Index: any name -> index in entries
    name_to_entry: HashMap<String, usize>,
}

impl ContigSynonymTable {
    /// Build the table from parsed report rows
    #[must_use]
    pub fn new(entries: Vec<ContigSynonyms>) -> Self {
        let mut table = Self {
            entries: Vec::new(),
            name_to_entry: HashMap::new(),
        };
        for entry in entries {
            table.add_entry(entry);
        }
        table
    }

    /// Build the table straight from an assembly report file
    ///
    /// # Errors
    ///
    /// Returns `ReportParseError` if the report cannot be read or parsed.
    pub fn from_report(path: &Path) -> Result<Self, ReportParseError> {
        Ok(Self::new(load_report(path)?))
    }

    fn add_entry(&mut self, entry: ContigSynonyms) {
        let index = self.entries.len();
        for name in entry.all_names() {
            self.name_to_entry.insert(name.to_string(), index);
        }
        self.entries.push(entry);
    }

    /// Resolve any contig name to its full synonym set
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<&ContigSynonyms> {
        self.name_to_entry.get(name).map(|&idx| &self.entries[idx])
    }

    /// The synonym of `name` under the requested naming standard.
    ///
    /// Refuses GenBank↔RefSeq substitution for contigs whose sequences are
    /// not identical, even though a synonym technically exists: substituting
    /// would silently change coordinate systems.
    ///
    /// # Errors
    ///
    /// Returns a [`SynonymError`] naming the contig when the lookup cannot
    /// produce a safe replacement.
    pub fn synonym_for<'a>(
        &'a self,
        name: &'a str,
        naming: ContigNaming,
    ) -> Result<&'a str, SynonymError> {
        if naming == ContigNaming::NoReplacement {
            // Identity mapping: resolve only to validate the name exists
            return self
                .resolve(name)
                .map(|_| name)
                .ok_or_else(|| SynonymError::UnknownContig(name.to_string()));
        }

        let synonyms = self
            .resolve(name)
            .ok_or_else(|| SynonymError::UnknownContig(name.to_string()))?;

        let replacement = synonyms
            .name_for(naming)
            .ok_or_else(|| SynonymError::NoSynonym {
                contig: name.to_string(),
                naming,
            })?;

        let genbank_to_refseq = synonyms.is_genbank(name) && synonyms.is_refseq(replacement);
        let refseq_to_genbank = synonyms.is_refseq(name) && synonyms.is_genbank(replacement);
        if !synonyms.identical_genbank_and_refseq && (genbank_to_refseq || refseq_to_genbank) {
            return Err(SynonymError::NonIdenticalSequences {
                contig: name.to_string(),
                replacement: replacement.to_string(),
            });
        }

        Ok(replacement)
    }

    /// Number of contigs in the table
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identical(seq: &str, genbank: &str, refseq: &str, ucsc: &str) -> ContigSynonyms {
        ContigSynonyms {
            sequence_name: seq.to_string(),
            genbank: Some(genbank.to_string()),
            refseq: Some(refseq.to_string()),
            ucsc: Some(ucsc.to_string()),
            identical_genbank_and_refseq: true,
        }
    }

    fn table() -> ContigSynonymTable {
        let mut chr2 = identical("2", "CM000664.2", "NC_000002.12", "chr2");
        chr2.identical_genbank_and_refseq = false;
        ContigSynonymTable::new(vec![
            identical("1", "CM000663.2", "NC_000001.11", "chr1"),
            chr2,
            ContigSynonyms {
                sequence_name: "scaffold_1".to_string(),
                genbank: Some("KI270302.1".to_string()),
                refseq: None,
                ucsc: None,
                identical_genbank_and_refseq: false,
            },
        ])
    }

    #[test]
    fn test_resolve_by_any_name() {
        let table = table();
        for name in ["1", "CM000663.2", "NC_000001.11", "chr1"] {
            let synonyms = table.resolve(name).unwrap();
            assert_eq!(synonyms.sequence_name, "1");
        }
        assert!(table.resolve("chr9").is_none());
    }

    #[test]
    fn test_synonym_round_trip_for_identical_contig() {
        let table = table();
        let refseq = table.synonym_for("CM000663.2", ContigNaming::Refseq).unwrap();
        assert_eq!(refseq, "NC_000001.11");
        let genbank = table.synonym_for(refseq, ContigNaming::Genbank).unwrap();
        assert_eq!(genbank, "CM000663.2");
    }

    #[test]
    fn test_non_identical_substitution_refused_both_ways() {
        let table = table();
        assert_eq!(
            table.synonym_for("CM000664.2", ContigNaming::Refseq),
            Err(SynonymError::NonIdenticalSequences {
                contig: "CM000664.2".to_string(),
                replacement: "NC_000002.12".to_string(),
            })
        );
        assert!(matches!(
            table.synonym_for("NC_000002.12", ContigNaming::Genbank),
            Err(SynonymError::NonIdenticalSequences { .. })
        ));
    }

    #[test]
    fn test_non_identical_contig_still_resolves_other_namings() {
        // Only the GenBank<->RefSeq direction is unsafe; UCSC is fine
        let table = table();
        assert_eq!(
            table.synonym_for("CM000664.2", ContigNaming::Ucsc).unwrap(),
            "chr2"
        );
        assert_eq!(
            table
                .synonym_for("NC_000002.12", ContigNaming::SequenceName)
                .unwrap(),
            "2"
        );
    }

    #[test]
    fn test_missing_synonym() {
        let table = table();
        assert_eq!(
            table.synonym_for("scaffold_1", ContigNaming::Ucsc),
            Err(SynonymError::NoSynonym {
                contig: "scaffold_1".to_string(),
                naming: ContigNaming::Ucsc,
            })
        );
    }

    #[test]
    fn test_unknown_contig() {
        let table = table();
        assert_eq!(
            table.synonym_for("chrUn", ContigNaming::Genbank),
            Err(SynonymError::UnknownContig("chrUn".to_string()))
        );
    }

    #[test]
    fn test_no_replacement_keeps_name() {
        let table = table();
        assert_eq!(
            table.synonym_for("chr1", ContigNaming::NoReplacement).unwrap(),
            "chr1"
        );
    }
}
