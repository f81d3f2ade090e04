//! End-to-end identity resolution: detection, merge, split and deprecation
//! against one registry, including interrupted-chunk reprocessing.

use variant_registry::core::types::{EventType, VariantStatus, VariantType};
use variant_registry::registry::generator::MonotonicAccessionGenerator;
use variant_registry::resolve::candidates::{
    clustered_candidates_from, detect_merge_candidates, detect_split_candidates,
};
use variant_registry::resolve::{
    apply_merge, apply_split, deprecate_orphans, resolve_merge, resolve_split,
};
use variant_registry::{ClusteredVariant, SubmittedVariant, VariantRegistry};

fn rs(accession: u64, contig: &str, start: u64) -> ClusteredVariant {
    ClusteredVariant::new(accession, "GCA_000001405.28", contig, start, VariantType::Snv)
}

fn ss(accession: u64, rs: u64, contig: &str, start: u64) -> SubmittedVariant {
    SubmittedVariant::new(
        accession,
        "PRJEB1234",
        "GCA_000001405.28",
        contig,
        start,
        "A",
        "T",
    )
    .with_clustered_variant(rs)
}

/// Remapping made rs7 and rs10 collide on one locus, and spread rs20's
/// submissions over two loci. One clustering pass fixes both.
#[test]
fn merge_then_split_round() {
    let mut registry = VariantRegistry::new();
    registry.upsert_clustered(rs(7, "1", 1000));
    registry.upsert_clustered(rs(10, "1", 1000));
    registry.upsert_clustered(rs(20, "2", 500));
    registry.put_submitted(ss(100, 7, "1", 1000));
    registry.put_submitted(ss(101, 10, "1", 1000));
    registry.put_submitted(ss(102, 20, "2", 500));
    registry.put_submitted(ss(103, 20, "2", 900));

    // Merge pass
    let merge_events = detect_merge_candidates(&registry, "GCA_000001405.28");
    assert_eq!(merge_events.len(), 1);
    for event in &merge_events {
        let candidates = clustered_candidates_from(&registry, event);
        let (survivor, mergees) = resolve_merge(candidates).unwrap();
        apply_merge(&mut registry, &survivor, &mergees, "GCA_000001405.28");
    }

    assert_eq!(registry.get_clustered(7).unwrap().status, VariantStatus::Active);
    assert_eq!(registry.get_clustered(10).unwrap().status, VariantStatus::Merged);
    assert_eq!(
        registry.get_submitted(101).unwrap().clustered_variant_accession,
        Some(7)
    );

    // Split pass
    let mut generator = MonotonicAccessionGenerator::new(registry.max_accession() + 1);
    let split_events = detect_split_candidates(&registry, "GCA_000001405.28");
    assert_eq!(split_events.len(), 1);
    assert_eq!(split_events[0].accession, 20);
    for event in &split_events {
        let original = registry.get_clustered(event.accession).cloned().unwrap();
        let submitted: Vec<_> = registry
            .submitted_for(original.accession)
            .into_iter()
            .cloned()
            .collect();
        let assignments = resolve_split(&original, &submitted, &mut generator).unwrap();
        apply_split(&mut registry, &original, &assignments, "GCA_000001405.28");
    }

    // The submission at the original locus stays on rs20, the other moved
    assert_eq!(
        registry.get_submitted(102).unwrap().clustered_variant_accession,
        Some(20)
    );
    let moved = registry.get_submitted(103).unwrap().clustered_variant_accession;
    assert!(moved.is_some());
    assert_ne!(moved, Some(20));

    // History: one MERGED and one SPLIT operation
    assert_eq!(registry.operations(Some(EventType::Merged), None).count(), 1);
    assert_eq!(registry.operations(Some(EventType::Split), None).count(), 1);
}

/// Reprocessing a chunk after an interruption must not duplicate history or
/// flip survivors.
#[test]
fn reprocessed_chunk_is_idempotent() {
    let mut registry = VariantRegistry::new();
    registry.upsert_clustered(rs(7, "1", 1000));
    registry.upsert_clustered(rs(10, "1", 1000));
    registry.put_submitted(ss(100, 7, "1", 1000));
    registry.put_submitted(ss(101, 10, "1", 1000));

    let events = detect_merge_candidates(&registry, "GCA_000001405.28");
    let candidates = clustered_candidates_from(&registry, &events[0]);
    let (survivor, mergees) = resolve_merge(candidates).unwrap();

    // First application is interrupted after the survivor upsert; the rerun
    // applies the full merge, and a third run replays it once more
    apply_merge(&mut registry, &survivor, &mergees, "GCA_000001405.28");
    apply_merge(&mut registry, &survivor, &mergees, "GCA_000001405.28");
    apply_merge(&mut registry, &survivor, &mergees, "GCA_000001405.28");

    assert_eq!(registry.operations(Some(EventType::Merged), None).count(), 1);
    assert_eq!(
        registry.get_submitted(101).unwrap().clustered_variant_accession,
        Some(7)
    );
}

/// Merging everything away from an accession leaves it eligible for
/// deprecation on the next pass.
#[test]
fn merge_then_deprecate() {
    let mut registry = VariantRegistry::new();
    registry.upsert_clustered(rs(7, "1", 1000));
    registry.upsert_clustered(rs(10, "1", 1000));
    registry.put_submitted(ss(101, 10, "1", 1000));

    let events = detect_merge_candidates(&registry, "GCA_000001405.28");
    for event in &events {
        let candidates = clustered_candidates_from(&registry, event);
        let (survivor, mergees) = resolve_merge(candidates).unwrap();
        apply_merge(&mut registry, &survivor, &mergees, "GCA_000001405.28");
    }

    // rs10's submission moved to rs7; rs10 is already inactive, so only
    // accessions that stayed active with no submissions get deprecated
    let report = deprecate_orphans(
        &mut registry,
        "GCA_000001405.28",
        "No submissions remain after clustering.",
    );
    assert!(report.deprecated.is_empty());

    // An active accession that never had submissions does get deprecated
    registry.upsert_clustered(rs(30, "3", 100));
    let report = deprecate_orphans(
        &mut registry,
        "GCA_000001405.28",
        "No submissions remain after clustering.",
    );
    assert_eq!(report.deprecated, vec![30]);
    assert_eq!(
        registry.operations(Some(EventType::Deprecated), None).count(),
        1
    );
}

/// The operation feed serves downstream consumers filtered by type and
/// assembly, and survives a JSON round trip.
#[test]
fn operation_feed_round_trip() {
    let mut registry = VariantRegistry::new();
    registry.upsert_clustered(rs(7, "1", 1000));
    registry.upsert_clustered(rs(10, "1", 1000));
    registry.put_submitted(ss(100, 7, "1", 1000));
    registry.put_submitted(ss(101, 10, "1", 1000));

    let events = detect_merge_candidates(&registry, "GCA_000001405.28");
    for event in events {
        registry.append_operation(event.clone());
        let candidates = clustered_candidates_from(&registry, &event);
        let (survivor, mergees) = resolve_merge(candidates).unwrap();
        apply_merge(&mut registry, &survivor, &mergees, "GCA_000001405.28");
    }

    let json = registry.to_json().unwrap();
    let restored = VariantRegistry::from_json(&json).unwrap();

    let merged: Vec<_> = restored
        .operations(Some(EventType::Merged), Some("GCA_000001405.28"))
        .collect();
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].accession, 10);
    assert_eq!(merged[0].destination, Some(7));
    assert_eq!(merged[0].inactive_clustered.len(), 1);

    let candidates: Vec<_> = restored
        .operations(Some(EventType::RsMergeCandidates), None)
        .collect();
    assert_eq!(candidates.len(), 1);
}
