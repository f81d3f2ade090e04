//! Merge resolution: collapse clustered variants that alias the same locus
//! into one canonical survivor.

use thiserror::Error;
use tracing::debug;

use crate::core::clustered::ClusteredVariant;
use crate::core::operation::Operation;
use crate::core::types::{Accession, EventType};
use crate::registry::store::VariantRegistry;
use crate::resolve::policy::{distinct_by_key, prioritise};

#[derive(Error, Debug)]
pub enum MergeError {
    #[error("no merge candidates supplied")]
    NoCandidates,
}

/// Summary of one applied merge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeReport {
    pub survivor: Accession,
    pub merged: Vec<Accession>,
    pub operations_written: usize,
}

/// Pick the survivor among clustered variants that alias the same locus.
///
/// Candidates are deduplicated by accession first: multiple submitted
/// variants can point at the same clustered accession, and only distinct
/// accessions matter. The survivor is then the pairwise-fold winner under
/// [`prioritise`], which is order-independent.
///
/// # Errors
///
/// Returns `MergeError::NoCandidates` for an empty candidate list.
pub fn resolve_merge(
    candidates: Vec<ClusteredVariant>,
) -> Result<(ClusteredVariant, Vec<ClusteredVariant>), MergeError> {
    let candidates = distinct_by_key(candidates, |variant| variant.accession);
    let mut accessions = candidates.iter().map(|variant| variant.accession);
    let first = accessions.next().ok_or(MergeError::NoCandidates)?;
    let survivor_accession = accessions.fold(first, |best, next| prioritise(best, next).keep);

    let mut survivor = None;
    let mut mergees = Vec::new();
    for candidate in candidates {
        if candidate.accession == survivor_accession {
            survivor = Some(candidate);
        } else {
            mergees.push(candidate);
        }
    }
    // The fold winner always comes from the candidate list
    Ok((survivor.expect("survivor is one of the candidates"), mergees))
}

/// Apply a resolved merge to the registry.
///
/// Upserts the survivor, then for every mergee rewrites submitted-variant
/// back-references to the survivor, marks the mergee's record inactive, and
/// appends one `MERGED` operation. A mergee may legitimately have no record
/// in the clustered table (mid-remapping it can exist only as a
/// submitted-variant reference); the operation is still written, with the
/// resolved candidate as its snapshot.
///
/// Idempotent: reapplying the same merge rewrites nothing and appends no
/// second operation record.
pub fn apply_merge(
    registry: &mut VariantRegistry,
    survivor: &ClusteredVariant,
    mergees: &[ClusteredVariant],
    assembly: &str,
) -> MergeReport {
    registry.upsert_clustered(survivor.clone());

    let mut report = MergeReport {
        survivor: survivor.accession,
        merged: Vec::new(),
        operations_written: 0,
    };

    for mergee in mergees {
        let rewritten = registry.reassign_submitted(mergee.accession, survivor.accession);
        debug!(
            "Merging rs{} into rs{}: {} submitted variants rewritten",
            mergee.accession, survivor.accession, rewritten
        );

        // Tolerate a mergee that was never materialized in the clustered
        // table; fall back to the resolved candidate for the snapshot
        let snapshot = registry
            .mark_merged(mergee.accession, survivor.accession)
            .unwrap_or_else(|| mergee.clone());

        let operation = Operation::new(
            EventType::Merged,
            mergee.accession,
            Some(survivor.accession),
            format!(
                "Identifiers mapped to the same locus after remapping to {assembly}."
            ),
        )
        .with_clustered_snapshot(snapshot);

        if registry.append_operation(operation) {
            report.operations_written += 1;
        }
        report.merged.push(mergee.accession);
    }

    report
}
