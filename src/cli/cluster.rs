use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use crate::core::types::EventType;
use crate::registry::generator::MonotonicAccessionGenerator;
use crate::registry::store::VariantRegistry;
use crate::resolve::candidates::{
    clustered_candidates_from, detect_merge_candidates, detect_split_candidates,
};
use crate::resolve::merge::{apply_merge, resolve_merge};
use crate::resolve::split::{apply_split, resolve_split};

#[derive(Args)]
pub struct ClusterArgs {
    /// Registry JSON file, updated in place
    #[arg(required = true)]
    pub registry: PathBuf,

    /// Assembly accession to resolve identities on
    #[arg(long)]
    pub assembly: String,

    /// Number of candidate events applied per chunk
    #[arg(long, default_value = "1000")]
    pub chunk_size: usize,
}

/// Execute the cluster subcommand: detect candidates, apply merges, then
/// splits, and save the registry back.
///
/// # Errors
///
/// Returns an error if the registry cannot be loaded or saved, or if
/// accession generation fails.
pub fn run(args: &ClusterArgs, verbose: bool) -> anyhow::Result<()> {
    let mut registry = VariantRegistry::load_from_file(&args.registry)
        .with_context(|| format!("loading registry {}", args.registry.display()))?;
    let mut generator = MonotonicAccessionGenerator::new(registry.max_accession() + 1);

    let mut merges = 0usize;
    let mut splits = 0usize;

    // Merges first: collapsing colliding accessions can only reduce the
    // split work discovered afterwards
    let merge_candidates = detect_merge_candidates(&registry, &args.assembly);
    for chunk in merge_candidates.chunks(args.chunk_size) {
        for event in chunk {
            registry.append_operation(event.clone());
            let candidates = clustered_candidates_from(&registry, event);
            let (survivor, mergees) = resolve_merge(candidates)?;
            let report = apply_merge(&mut registry, &survivor, &mergees, &args.assembly);
            merges += report.merged.len();
            if verbose {
                eprintln!(
                    "Merged {:?} into rs{}",
                    report.merged, report.survivor
                );
            }
        }
    }

    let split_candidates = detect_split_candidates(&registry, &args.assembly);
    for chunk in split_candidates.chunks(args.chunk_size) {
        for event in chunk {
            registry.append_operation(event.clone());
            let Some(original) = registry.get_clustered(event.accession).cloned() else {
                continue;
            };
            let submitted: Vec<_> = registry
                .submitted_for(original.accession)
                .into_iter()
                .cloned()
                .collect();
            let assignments = resolve_split(&original, &submitted, &mut generator)?;
            let report = apply_split(&mut registry, &original, &assignments, &args.assembly);
            splits += report.new_accessions.len();
            if verbose {
                eprintln!(
                    "Split rs{} into {:?}",
                    report.original, report.new_accessions
                );
            }
        }
    }

    registry
        .save_to_file(&args.registry)
        .with_context(|| format!("saving registry {}", args.registry.display()))?;

    let merged_total = registry
        .operations(Some(EventType::Merged), None)
        .count();
    println!(
        "Applied {merges} merges and {splits} splits on {} ({merged_total} MERGED operations in history)",
        args.assembly
    );
    Ok(())
}
