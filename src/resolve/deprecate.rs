//! Deprecation of clustered variants left without any active submission.

use tracing::info;

use crate::core::operation::Operation;
use crate::core::types::{Accession, EventType};
use crate::registry::store::VariantRegistry;

/// Summary of one deprecation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeprecationReport {
    pub deprecated: Vec<Accession>,
    pub operations_written: usize,
}

/// Deprecate active clustered variants on an assembly that no submitted
/// variant references anymore.
///
/// The registry equivalent of "declustered minus active": an accession whose
/// submissions have all moved away keeps its record, but the record is
/// flipped to deprecated and a `DEPRECATED` operation snapshots it.
/// Idempotent across reruns.
pub fn deprecate_orphans(
    registry: &mut VariantRegistry,
    assembly: &str,
    reason: &str,
) -> DeprecationReport {
    let orphans: Vec<Accession> = registry
        .clustered_variants()
        .filter(|variant| {
            variant.is_active()
                && variant.assembly == assembly
                && registry.submitted_for(variant.accession).is_empty()
        })
        .map(|variant| variant.accession)
        .collect();

    let mut report = DeprecationReport::default();
    for accession in orphans {
        let Some(snapshot) = registry.mark_deprecated(accession) else {
            continue;
        };
        let operation = Operation::new(EventType::Deprecated, accession, None, reason)
            .with_clustered_snapshot(snapshot);
        if registry.append_operation(operation) {
            report.operations_written += 1;
        }
        report.deprecated.push(accession);
    }
    info!(
        "Deprecated {} clustered variants on {}",
        report.deprecated.len(),
        assembly
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clustered::ClusteredVariant;
    use crate::core::submitted::SubmittedVariant;
    use crate::core::types::{VariantStatus, VariantType};

    #[test]
    fn test_orphans_deprecated_referenced_kept() {
        let mut registry = VariantRegistry::new();
        registry.upsert_clustered(ClusteredVariant::new(7, "GCA_1", "1", 1000, VariantType::Snv));
        registry.upsert_clustered(ClusteredVariant::new(8, "GCA_1", "1", 2000, VariantType::Snv));
        registry.put_submitted(
            SubmittedVariant::new(100, "PRJ1", "GCA_1", "1", 1000, "A", "T")
                .with_clustered_variant(7),
        );

        let report = deprecate_orphans(&mut registry, "GCA_1", "No submissions remain.");
        assert_eq!(report.deprecated, vec![8]);
        assert_eq!(report.operations_written, 1);
        assert_eq!(
            registry.get_clustered(8).unwrap().status,
            VariantStatus::Deprecated
        );
        assert_eq!(
            registry.get_clustered(7).unwrap().status,
            VariantStatus::Active
        );
    }

    #[test]
    fn test_rerun_is_idempotent() {
        let mut registry = VariantRegistry::new();
        registry.upsert_clustered(ClusteredVariant::new(8, "GCA_1", "1", 2000, VariantType::Snv));

        deprecate_orphans(&mut registry, "GCA_1", "No submissions remain.");
        let second = deprecate_orphans(&mut registry, "GCA_1", "No submissions remain.");

        assert!(second.deprecated.is_empty());
        assert_eq!(
            registry.operations(Some(EventType::Deprecated), None).count(),
            1
        );
    }
}
