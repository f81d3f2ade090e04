//! Context-base restoration for empty-allele variants.
//!
//! Pure insertions and deletions are stored normalized, with an empty
//! reference or alternate allele and no context nucleotide. A fixed-width
//! output format cannot express an empty allele, so before external output
//! the true context base is recovered from the assembly sequence.

use crate::core::submitted::SubmittedVariant;
use crate::report::sequence::FastaSequenceReader;
use crate::report::ReportError;

/// Restore the context base of a normalized empty-allele variant.
///
/// Variants with both alleles non-empty pass through unchanged. For the
/// rest, the base immediately preceding the variant (`start - 1`) is
/// prepended to both alleles and the start is decremented. A variant already
/// at position 1 has no preceding base; the base at position 1 is appended
/// instead and the start is kept.
///
/// # Errors
///
/// Returns `ReportError::MissingContig` when the contig is absent from the
/// sequence source — the output cannot be produced correctly, so the record
/// is fatal for report generation — or a `ReportError::Sequence` for a
/// position outside the contig.
pub fn denormalize(
    variant: &SubmittedVariant,
    fasta: &FastaSequenceReader,
) -> Result<SubmittedVariant, ReportError> {
    if !variant.reference_allele.is_empty() && !variant.alternate_allele.is_empty() {
        return Ok(variant.clone());
    }

    if !fasta.contig_exists(&variant.contig) {
        return Err(ReportError::MissingContig {
            contig: variant.contig.clone(),
            accession: variant.accession,
        });
    }

    let mut denormalized = variant.clone();
    if variant.start > 1 {
        let context = fasta.base_at(&variant.contig, variant.start - 1)?;
        denormalized.start = variant.start - 1;
        denormalized.reference_allele = format!("{context}{}", variant.reference_allele);
        denormalized.alternate_allele = format!("{context}{}", variant.alternate_allele);
    } else {
        // Leading-edge indel: no preceding base exists, so the context base
        // follows the alleles and the position stays at 1
        let context = fasta.base_at(&variant.contig, 1)?;
        denormalized.reference_allele = format!("{}{context}", variant.reference_allele);
        denormalized.alternate_allele = format!("{}{context}", variant.alternate_allele);
    }
    Ok(denormalized)
}
