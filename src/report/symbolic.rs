//! Rewrite named alleles into symbolic alleles for report output.
//!
//! Named variants carry alleles surrounded by parentheses, e.g.
//! `(ALU_INSERTION)`. The output format only allows symbolic alleles in the
//! alternate column, written in angle brackets:
//!
//! ```text
//! #CHROM POS      ID   REF  ALT          QUAL FILTER INFO
//! 3       9425916 .    C    <INS:ME:L1>  23   PASS   SVTYPE=INS
//! ```
//!
//! so a named reference allele is swapped onto the alternate side, and a
//! named allele on both sides cannot be represented at all.

use crate::core::submitted::SubmittedVariant;
use crate::core::types::is_named_allele;
use crate::report::ReportError;

/// Convert named alleles to symbolic form, swapping sides if needed.
///
/// # Errors
///
/// Returns `ReportError::SymbolicAlleleConflict` when both alleles are
/// named: only the alternate column may hold a symbolic allele.
pub fn to_symbolic(variant: &SubmittedVariant) -> Result<SubmittedVariant, ReportError> {
    let reference_named = is_named_allele(&variant.reference_allele);
    let alternate_named = is_named_allele(&variant.alternate_allele);

    if reference_named && alternate_named {
        return Err(ReportError::SymbolicAlleleConflict {
            accession: variant.accession,
        });
    }
    if !reference_named && !alternate_named {
        return Ok(variant.clone());
    }

    let mut converted = variant.clone();
    if reference_named {
        // Symbolic alleles belong on the alternate side; swap
        converted.reference_allele = variant.alternate_allele.clone();
        converted.alternate_allele = as_symbolic(&variant.reference_allele);
    } else {
        converted.alternate_allele = as_symbolic(&variant.alternate_allele);
    }
    Ok(converted)
}

/// `(ALU INSERTION)` becomes `<ALU_INSERTION>`
fn as_symbolic(named: &str) -> String {
    let inner = &named[1..named.len() - 1];
    format!("<{}>", inner.replace(' ', "_"))
}
