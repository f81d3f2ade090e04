use serde::{Deserialize, Serialize};

/// Numeric accession identifier, monotonically assigned and never reused.
pub type Accession = u64;

/// Variant class, part of the canonical locus key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VariantType {
    Snv,
    Mnv,
    Ins,
    Del,
    Indel,
    TandemRepeat,
    /// Named/symbolic allele, e.g. `(ALU_INSERTION)`
    SequenceAlteration,
    Cnv,
}

impl VariantType {
    /// Classify a variant from its alleles.
    ///
    /// Empty alleles denote pure insertions/deletions normalized against an
    /// implicit context base. Alleles wrapped in parentheses are named
    /// sequence alterations.
    #[must_use]
    pub fn from_alleles(reference: &str, alternate: &str) -> Self {
        if is_named_allele(reference) || is_named_allele(alternate) {
            return Self::SequenceAlteration;
        }
        match (reference.len(), alternate.len()) {
            (0, _) => Self::Ins,
            (_, 0) => Self::Del,
            (1, 1) => Self::Snv,
            (r, a) if r == a => Self::Mnv,
            _ => Self::Indel,
        }
    }
}

impl std::fmt::Display for VariantType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Snv => write!(f, "SNV"),
            Self::Mnv => write!(f, "MNV"),
            Self::Ins => write!(f, "INS"),
            Self::Del => write!(f, "DEL"),
            Self::Indel => write!(f, "INDEL"),
            Self::TandemRepeat => write!(f, "TANDEM_REPEAT"),
            Self::SequenceAlteration => write!(f, "SEQUENCE_ALTERATION"),
            Self::Cnv => write!(f, "CNV"),
        }
    }
}

/// Check whether an allele is a named allele, e.g. `(ALU_INSERTION)`
#[must_use]
pub fn is_named_allele(allele: &str) -> bool {
    allele.starts_with('(') && allele.ends_with(')')
}

/// Event type of an operation in the append-only history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    Merged,
    Split,
    Deprecated,
    RsMergeCandidates,
    RsSplitCandidates,
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Merged => write!(f, "MERGED"),
            Self::Split => write!(f, "SPLIT"),
            Self::Deprecated => write!(f, "DEPRECATED"),
            Self::RsMergeCandidates => write!(f, "RS_MERGE_CANDIDATES"),
            Self::RsSplitCandidates => write!(f, "RS_SPLIT_CANDIDATES"),
        }
    }
}

/// Contig naming standard used when rendering output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ContigNaming {
    /// Sequence-Name column of the assembly report (e.g., "1", "MT")
    SequenceName,
    /// GenBank/INSDC accession (e.g., "CM000663.2")
    Genbank,
    /// RefSeq accession (e.g., "NC_000001.11")
    Refseq,
    /// UCSC-style name (e.g., "chr1")
    Ucsc,
    /// Keep whatever name the variant already carries
    NoReplacement,
}

impl std::fmt::Display for ContigNaming {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SequenceName => write!(f, "sequence-name"),
            Self::Genbank => write!(f, "GenBank"),
            Self::Refseq => write!(f, "RefSeq"),
            Self::Ucsc => write!(f, "UCSC"),
            Self::NoReplacement => write!(f, "no-replacement"),
        }
    }
}

/// Lifecycle status of a clustered variant. Records are never deleted;
/// merges and deprecations only flip this status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VariantStatus {
    #[default]
    Active,
    Merged,
    Deprecated,
}
