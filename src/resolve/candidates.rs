//! Detection pass: scan the registry for accessions that need merging or
//! splitting and record candidate events in the operation history.

use std::collections::BTreeMap;

use tracing::info;

use crate::core::clustered::ClusteredVariant;
use crate::core::operation::Operation;
use crate::core::types::{Accession, EventType};
use crate::registry::store::VariantRegistry;

/// Find loci where several live accessions collide.
///
/// Groups active clustered variants by canonical key; every key held by more
/// than one accession yields an `RS_MERGE_CANDIDATES` operation whose
/// snapshots are the submitted variants involved. The merge resolver
/// consumes these events.
pub fn detect_merge_candidates(registry: &VariantRegistry, assembly: &str) -> Vec<Operation> {
    let mut by_key: BTreeMap<String, Vec<Accession>> = BTreeMap::new();
    for variant in registry.clustered_variants() {
        if variant.is_active() && variant.assembly == assembly {
            by_key
                .entry(variant.canonical_key())
                .or_default()
                .push(variant.accession);
        }
    }

    let mut operations = Vec::new();
    for (key, mut accessions) in by_key {
        if accessions.len() < 2 {
            continue;
        }
        accessions.sort_unstable();

        let mut clustered_snapshots = Vec::new();
        let mut submitted_snapshots = Vec::new();
        for &accession in &accessions {
            if let Some(record) = registry.get_clustered(accession) {
                clustered_snapshots.push(record.clone());
            }
            submitted_snapshots.extend(registry.submitted_for(accession).into_iter().cloned());
        }

        operations.push(
            Operation::new(
                EventType::RsMergeCandidates,
                accessions[0],
                None,
                format!("Multiple identifiers map to locus {key} on {assembly}."),
            )
            .with_clustered_snapshots(clustered_snapshots)
            .with_submitted_snapshots(submitted_snapshots),
        );
    }
    info!(
        "Found {} merge candidate loci on {}",
        operations.len(),
        assembly
    );
    operations
}

/// Find accessions whose submitted variants disagree on canonical locus.
///
/// For every active clustered variant, collects the distinct canonical keys
/// of its submitted variants; more than one distinct key yields an
/// `RS_SPLIT_CANDIDATES` operation snapshotting all of them. The split
/// resolver consumes these events.
pub fn detect_split_candidates(registry: &VariantRegistry, assembly: &str) -> Vec<Operation> {
    let mut operations = Vec::new();
    for variant in registry.clustered_variants() {
        if !variant.is_active() || variant.assembly != assembly {
            continue;
        }
        let submitted = registry.submitted_for(variant.accession);
        let mut keys: Vec<String> = submitted.iter().map(|s| s.canonical_key()).collect();
        keys.sort_unstable();
        keys.dedup();
        if keys.len() < 2 {
            continue;
        }

        operations.push(
            Operation::new(
                EventType::RsSplitCandidates,
                variant.accession,
                None,
                format!(
                    "Submitted variants under rs{} map to {} distinct loci on {assembly}.",
                    variant.accession,
                    keys.len()
                ),
            )
            .with_submitted_snapshots(submitted.into_iter().cloned().collect()),
        );
    }
    info!(
        "Found {} split candidate accessions on {}",
        operations.len(),
        assembly
    );
    operations
}

/// Reconstruct the clustered-variant candidates of a merge-candidate event.
///
/// Snapshotted clustered variants are taken as-is. The snapshotted submitted
/// variants contribute the accessions they reference beyond those: the
/// materialized record when the registry has one, otherwise a record derived
/// from the submitted variant itself (the mid-remapping case). Deduplication
/// by accession happens later, in the merge resolver.
#[must_use]
pub fn clustered_candidates_from(
    registry: &VariantRegistry,
    operation: &Operation,
) -> Vec<ClusteredVariant> {
    let mut candidates = operation.inactive_clustered.clone();
    for submitted in &operation.inactive_submitted {
        let Some(accession) = submitted.clustered_variant_accession else {
            continue;
        };
        if candidates.iter().any(|c| c.accession == accession) {
            continue;
        }
        candidates.push(
            registry
                .get_clustered(accession)
                .cloned()
                .unwrap_or_else(|| ClusteredVariant::from_submitted(accession, submitted)),
        );
    }
    candidates
}
