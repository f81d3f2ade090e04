use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::core::submitted::SubmittedVariant;
use crate::core::types::{Accession, VariantStatus, VariantType};

/// Compute the canonical locus key for a variant.
///
/// Two clustered variants denote the same locus iff their
/// (assembly, contig, start, type) tuples match. The digest of that tuple is
/// the registry's hashed lookup key.
#[must_use]
pub fn canonical_key(
    assembly: &str,
    contig: &str,
    start: u64,
    variant_type: VariantType,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(assembly.as_bytes());
    hasher.update(b"_");
    hasher.update(contig.as_bytes());
    hasher.update(b"_");
    hasher.update(start.to_string().as_bytes());
    hasher.update(b"_");
    hasher.update(variant_type.to_string().as_bytes());
    format!("{:x}", hasher.finalize())
}

/// A clustered variant (RS): the canonical identifier for a genomic locus
/// plus variant type, shared by all submissions describing the same location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusteredVariant {
    /// Numeric accession, monotonically assigned, never reused
    pub accession: Accession,

    /// Assembly accession (e.g., "GCA_000001405.28")
    pub assembly: String,

    /// Contig name, INSDC/GenBank naming
    pub contig: String,

    /// 1-based start position
    pub start: u64,

    /// Variant class
    pub variant_type: VariantType,

    /// Whether this record has been validated
    #[serde(default)]
    pub validated: bool,

    /// Creation timestamp
    pub created: DateTime<Utc>,

    /// Lifecycle status; flipped by merge/deprecation, never deleted
    #[serde(default)]
    pub status: VariantStatus,

    /// Accession this record was merged into, when status is Merged
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merged_into: Option<Accession>,
}

impl ClusteredVariant {
    pub fn new(
        accession: Accession,
        assembly: impl Into<String>,
        contig: impl Into<String>,
        start: u64,
        variant_type: VariantType,
    ) -> Self {
        Self {
            accession,
            assembly: assembly.into(),
            contig: contig.into(),
            start,
            variant_type,
            validated: false,
            created: Utc::now(),
            status: VariantStatus::Active,
            merged_into: None,
        }
    }

    /// Derive the clustered-variant record a submitted variant belongs to.
    ///
    /// Used when a merge targets an accession that exists only as a
    /// submitted-variant back-reference (e.g., mid-remapping) and has no
    /// materialized record of its own yet.
    #[must_use]
    pub fn from_submitted(accession: Accession, submitted: &SubmittedVariant) -> Self {
        Self {
            accession,
            assembly: submitted.assembly.clone(),
            contig: submitted.contig.clone(),
            start: submitted.start,
            variant_type: submitted.variant_type(),
            validated: submitted.validated,
            created: submitted.created,
            status: VariantStatus::Active,
            merged_into: None,
        }
    }

    /// The canonical locus key of this record
    #[must_use]
    pub fn canonical_key(&self) -> String {
        canonical_key(&self.assembly, &self.contig, self.start, self.variant_type)
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == VariantStatus::Active
    }
}
