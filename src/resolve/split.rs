//! Split resolution: separate one clustered variant's submissions into
//! multiple accessions when they are found to denote distinct loci.

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::debug;

use crate::core::clustered::ClusteredVariant;
use crate::core::operation::Operation;
use crate::core::submitted::SubmittedVariant;
use crate::core::types::{Accession, EventType};
use crate::registry::generator::{AccessionGenerationError, MonotonicAccessionGenerator};
use crate::registry::store::VariantRegistry;

#[derive(Error, Debug)]
pub enum SplitError {
    #[error("clustered variant rs{0} has no submitted variants to split")]
    NoSubmittedVariants(Accession),

    #[error("accession generation failed: {0}")]
    AccessionGeneration(#[from] AccessionGenerationError),
}

/// One locus-equivalence group produced by a split
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitAssignment {
    /// Accession this group ends up under
    pub accession: Accession,

    /// Canonical key shared by the group's submitted variants
    pub canonical_key: String,

    /// The submitted variants in the group
    pub submitted: Vec<SubmittedVariant>,

    /// Whether this group keeps the original accession
    pub keeps_original: bool,
}

/// Partition a clustered variant's submissions into locus-equivalence groups
/// and assign accessions.
///
/// Grouping uses canonical-key equality, never approximate matching. The
/// group whose key matches the locus recorded on the clustered variant at
/// creation time keeps the original accession — not simply the largest
/// group, to avoid accession churn. Every other group receives a newly
/// minted accession, in deterministic (key-sorted) order. If no group
/// matches the original locus, the lexicographically smallest key keeps the
/// accession.
///
/// # Errors
///
/// Returns `SplitError::NoSubmittedVariants` when there is nothing to
/// partition, or `SplitError::AccessionGeneration` if minting new accessions
/// fails — in which case the whole split for this locus should be retried.
pub fn resolve_split(
    original: &ClusteredVariant,
    submitted: &[SubmittedVariant],
    generator: &mut MonotonicAccessionGenerator,
) -> Result<Vec<SplitAssignment>, SplitError> {
    // BTreeMap keyed by canonical key: deterministic group ordering
    let mut groups: BTreeMap<String, Vec<SubmittedVariant>> = BTreeMap::new();
    for variant in submitted {
        groups
            .entry(variant.canonical_key())
            .or_default()
            .push(variant.clone());
    }
    if groups.is_empty() {
        return Err(SplitError::NoSubmittedVariants(original.accession));
    }

    let original_key = original.canonical_key();
    let retained_key = if groups.contains_key(&original_key) {
        original_key
    } else {
        // The original locus disappeared entirely in remapping; the smallest
        // key keeps the accession so the outcome stays order-independent
        groups.keys().next().cloned().expect("groups is non-empty")
    };

    // All-or-nothing accession block; a failure leaves nothing half-assigned
    let minted = generator.generate_block(groups.len() as u64 - 1)?;
    let mut minted = minted.into_iter();

    let mut assignments = Vec::with_capacity(groups.len());
    for (key, mut group) in groups {
        group.sort_by_key(|variant| variant.accession);
        let keeps_original = key == retained_key;
        let accession = if keeps_original {
            original.accession
        } else {
            minted.next().expect("block sized to the non-original groups")
        };
        assignments.push(SplitAssignment {
            accession,
            canonical_key: key,
            submitted: group,
            keeps_original,
        });
    }
    Ok(assignments)
}

/// Summary of one applied split
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitReport {
    pub original: Accession,
    pub new_accessions: Vec<Accession>,
    pub operations_written: usize,
}

/// Apply a resolved split to the registry.
///
/// Each non-original group gets a new clustered variant derived from its
/// submitted variants, the group's back-references are rewritten to it, and
/// one `SPLIT` operation is appended recording the original accession, the
/// destination accession and a snapshot of the submitted variants that
/// moved. Idempotent over operation ids, like merge application.
pub fn apply_split(
    registry: &mut VariantRegistry,
    original: &ClusteredVariant,
    assignments: &[SplitAssignment],
    assembly: &str,
) -> SplitReport {
    let mut report = SplitReport {
        original: original.accession,
        new_accessions: Vec::new(),
        operations_written: 0,
    };

    for assignment in assignments {
        if assignment.keeps_original {
            registry.upsert_clustered(original.clone());
            continue;
        }

        // The first submitted variant defines the new record's locus; the
        // group shares one canonical key so any member would do
        let exemplar = &assignment.submitted[0];
        let new_record = ClusteredVariant::from_submitted(assignment.accession, exemplar);
        debug!(
            "Splitting rs{}: {} submitted variants move to rs{}",
            original.accession,
            assignment.submitted.len(),
            assignment.accession
        );
        registry.upsert_clustered(new_record);

        for variant in &assignment.submitted {
            let mut rewritten = variant.clone();
            rewritten.clustered_variant_accession = Some(assignment.accession);
            registry.put_submitted(rewritten);
        }

        let operation = Operation::new(
            EventType::Split,
            original.accession,
            Some(assignment.accession),
            format!(
                "Submitted variants mapped to distinct loci after remapping to {assembly}."
            ),
        )
        .with_submitted_snapshots(assignment.submitted.clone());

        if registry.append_operation(operation) {
            report.operations_written += 1;
        }
        report.new_accessions.push(assignment.accession);
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::VariantType;

    fn original() -> ClusteredVariant {
        ClusteredVariant::new(10, "GCA_2", "1", 1000, VariantType::Snv)
    }

    fn ss_at(accession: Accession, contig: &str, start: u64) -> SubmittedVariant {
        SubmittedVariant::new(accession, "PRJ1", "GCA_2", contig, start, "A", "T")
            .with_clustered_variant(10)
    }

    #[test]
    fn test_group_matching_original_locus_keeps_accession() {
        let mut generator = MonotonicAccessionGenerator::new(5000);
        let submitted = vec![
            ss_at(100, "1", 1000), // original locus
            ss_at(101, "1", 2000),
            ss_at(102, "1", 1000), // original locus
        ];

        let assignments = resolve_split(&original(), &submitted, &mut generator).unwrap();
        assert_eq!(assignments.len(), 2);

        let retained = assignments.iter().find(|a| a.keeps_original).unwrap();
        assert_eq!(retained.accession, 10);
        assert_eq!(
            retained.submitted.iter().map(|s| s.accession).collect::<Vec<_>>(),
            vec![100, 102]
        );

        let minted = assignments.iter().find(|a| !a.keeps_original).unwrap();
        assert_eq!(minted.accession, 5000);
        assert_eq!(minted.submitted[0].accession, 101);
    }

    #[test]
    fn test_original_keeps_its_locus_even_when_outnumbered() {
        let mut generator = MonotonicAccessionGenerator::new(5000);
        let submitted = vec![
            ss_at(100, "1", 1000),
            ss_at(101, "1", 2000),
            ss_at(102, "1", 2000),
            ss_at(103, "1", 2000), // larger group, but not the original locus
        ];

        let assignments = resolve_split(&original(), &submitted, &mut generator).unwrap();
        let retained = assignments.iter().find(|a| a.keeps_original).unwrap();
        assert_eq!(retained.submitted.len(), 1);
        assert_eq!(retained.submitted[0].accession, 100);
    }

    #[test]
    fn test_grouping_is_input_order_independent() {
        let submitted = vec![
            ss_at(100, "1", 1000),
            ss_at(101, "1", 2000),
            ss_at(102, "2", 3000),
        ];
        let mut reversed = submitted.clone();
        reversed.reverse();

        let mut gen_a = MonotonicAccessionGenerator::new(5000);
        let mut gen_b = MonotonicAccessionGenerator::new(5000);
        let a = resolve_split(&original(), &submitted, &mut gen_a).unwrap();
        let b = resolve_split(&original(), &reversed, &mut gen_b).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_no_submitted_variants_is_an_error() {
        let mut generator = MonotonicAccessionGenerator::new(5000);
        assert!(matches!(
            resolve_split(&original(), &[], &mut generator),
            Err(SplitError::NoSubmittedVariants(10))
        ));
    }

    #[test]
    fn test_apply_split_writes_operations_and_rewrites_references() {
        let mut registry = VariantRegistry::new();
        registry.upsert_clustered(original());
        let submitted = vec![
            ss_at(100, "1", 1000),
            ss_at(101, "1", 2000),
        ];
        for variant in &submitted {
            registry.put_submitted(variant.clone());
        }

        let mut generator = MonotonicAccessionGenerator::new(5000);
        let assignments = resolve_split(&original(), &submitted, &mut generator).unwrap();
        let report = apply_split(&mut registry, &original(), &assignments, "GCA_2");

        assert_eq!(report.new_accessions, vec![5000]);
        assert_eq!(report.operations_written, 1);

        // The moved submitted variant now references the new accession
        assert_eq!(
            registry.get_submitted(101).unwrap().clustered_variant_accession,
            Some(5000)
        );
        // The new clustered variant exists at the new locus
        let new_record = registry.get_clustered(5000).unwrap();
        assert_eq!(new_record.start, 2000);

        let operations: Vec<_> = registry.operations(Some(EventType::Split), None).collect();
        assert_eq!(operations.len(), 1);
        assert_eq!(operations[0].accession, 10);
        assert_eq!(operations[0].destination, Some(5000));
        assert_eq!(operations[0].inactive_submitted.len(), 1);
    }

    #[test]
    fn test_apply_split_is_idempotent() {
        let mut registry = VariantRegistry::new();
        registry.upsert_clustered(original());
        let submitted = vec![ss_at(100, "1", 1000), ss_at(101, "1", 2000)];
        for variant in &submitted {
            registry.put_submitted(variant.clone());
        }

        let mut generator = MonotonicAccessionGenerator::new(5000);
        let assignments = resolve_split(&original(), &submitted, &mut generator).unwrap();
        apply_split(&mut registry, &original(), &assignments, "GCA_2");
        let second = apply_split(&mut registry, &original(), &assignments, "GCA_2");

        assert_eq!(second.operations_written, 0);
        assert_eq!(registry.operations(Some(EventType::Split), None).count(), 1);
    }

    #[test]
    fn test_split_does_not_recreate_merged_accessions() {
        // Splitting a previously-merged group mints fresh accessions; the
        // pre-merge accession set does not come back
        let mut generator = MonotonicAccessionGenerator::new(5000);
        let submitted = vec![ss_at(100, "1", 1000), ss_at(101, "1", 2000)];
        let assignments = resolve_split(&original(), &submitted, &mut generator).unwrap();

        let minted: Vec<_> = assignments
            .iter()
            .filter(|a| !a.keeps_original)
            .map(|a| a.accession)
            .collect();
        assert_eq!(minted, vec![5000]);
    }
}
