use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use crate::registry::store::VariantRegistry;
use crate::resolve::deprecate::deprecate_orphans;

#[derive(Args)]
pub struct DeprecateArgs {
    /// Registry JSON file, updated in place
    #[arg(required = true)]
    pub registry: PathBuf,

    /// Assembly accession to deprecate on
    #[arg(long)]
    pub assembly: String,

    /// Reason recorded on each DEPRECATED operation
    #[arg(long, default_value = "Clustered variant has no remaining submissions.")]
    pub reason: String,
}

/// Execute the deprecate subcommand
///
/// # Errors
///
/// Returns an error if the registry cannot be loaded or saved.
pub fn run(args: &DeprecateArgs, verbose: bool) -> anyhow::Result<()> {
    let mut registry = VariantRegistry::load_from_file(&args.registry)
        .with_context(|| format!("loading registry {}", args.registry.display()))?;

    let report = deprecate_orphans(&mut registry, &args.assembly, &args.reason);
    if verbose {
        for accession in &report.deprecated {
            eprintln!("Deprecated rs{accession}");
        }
    }

    registry
        .save_to_file(&args.registry)
        .with_context(|| format!("saving registry {}", args.registry.display()))?;

    println!(
        "Deprecated {} clustered variants on {}",
        report.deprecated.len(),
        args.assembly
    );
    Ok(())
}
