use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::clustered::canonical_key;
use crate::core::types::{Accession, VariantType};

fn default_true() -> bool {
    true
}

/// A submitted variant (SS): one submission's observation of a variant,
/// referencing the clustered variant that currently owns it.
///
/// The back-reference is rewritten during merges and splits; the submitted
/// variant's own identity never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmittedVariant {
    /// Numeric accession
    pub accession: Accession,

    /// Project/study identifier
    pub project: String,

    /// Reference sequence (assembly) accession
    pub assembly: String,

    /// Contig name, INSDC/GenBank naming
    pub contig: String,

    /// 1-based start position
    pub start: u64,

    /// Reference allele; empty for pure insertions
    pub reference_allele: String,

    /// Alternate allele; empty for pure deletions
    pub alternate_allele: String,

    /// Back-reference to the owning clustered variant, if clustered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clustered_variant_accession: Option<Accession>,

    #[serde(default = "default_true")]
    pub supported_by_evidence: bool,

    #[serde(default = "default_true")]
    pub assembly_match: bool,

    #[serde(default = "default_true")]
    pub alleles_match: bool,

    #[serde(default)]
    pub validated: bool,

    /// Creation timestamp
    pub created: DateTime<Utc>,
}

impl SubmittedVariant {
    pub fn new(
        accession: Accession,
        project: impl Into<String>,
        assembly: impl Into<String>,
        contig: impl Into<String>,
        start: u64,
        reference_allele: impl Into<String>,
        alternate_allele: impl Into<String>,
    ) -> Self {
        Self {
            accession,
            project: project.into(),
            assembly: assembly.into(),
            contig: contig.into(),
            start,
            reference_allele: reference_allele.into(),
            alternate_allele: alternate_allele.into(),
            clustered_variant_accession: None,
            supported_by_evidence: true,
            assembly_match: true,
            alleles_match: true,
            validated: false,
            created: Utc::now(),
        }
    }

    #[must_use]
    pub fn with_clustered_variant(mut self, accession: Accession) -> Self {
        self.clustered_variant_accession = Some(accession);
        self
    }

    /// Variant class derived from the alleles
    #[must_use]
    pub fn variant_type(&self) -> VariantType {
        VariantType::from_alleles(&self.reference_allele, &self.alternate_allele)
    }

    /// The canonical locus key this submission maps to
    #[must_use]
    pub fn canonical_key(&self) -> String {
        canonical_key(&self.assembly, &self.contig, self.start, self.variant_type())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_type_derived_from_alleles() {
        let snv = SubmittedVariant::new(1, "PRJ1", "GCA_1", "1", 100, "A", "T");
        assert_eq!(snv.variant_type(), VariantType::Snv);

        let ins = SubmittedVariant::new(2, "PRJ1", "GCA_1", "1", 100, "", "ACG");
        assert_eq!(ins.variant_type(), VariantType::Ins);
    }

    #[test]
    fn test_canonical_key_matches_clustered() {
        use crate::core::clustered::ClusteredVariant;

        let ss = SubmittedVariant::new(5, "PRJ1", "GCA_1", "1", 1000, "A", "T");
        let rs = ClusteredVariant::new(7, "GCA_1", "1", 1000, VariantType::Snv);
        assert_eq!(ss.canonical_key(), rs.canonical_key());
    }

    #[test]
    fn test_back_reference_builder() {
        let ss = SubmittedVariant::new(5, "PRJ1", "GCA_1", "1", 1000, "A", "T")
            .with_clustered_variant(7);
        assert_eq!(ss.clustered_variant_accession, Some(7));
    }
}
