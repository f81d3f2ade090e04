use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use crate::contig::synonyms::ContigSynonymTable;
use crate::core::types::ContigNaming;
use crate::registry::store::VariantRegistry;
use crate::report::sequence::FastaSequenceReader;
use crate::report::state::JobState;
use crate::report::writer::{AccessionReportWriter, AccessionedVariant, OriginalVariant};

#[derive(Args)]
pub struct ReportArgs {
    /// Registry JSON file
    #[arg(required = true)]
    pub registry: PathBuf,

    /// Assembly accession to report on
    #[arg(long)]
    pub assembly: String,

    /// Assembly FASTA used to restore context bases (.fa or .fa.gz)
    #[arg(long)]
    pub fasta: PathBuf,

    /// NCBI assembly report with the contig naming table
    #[arg(long)]
    pub assembly_report: PathBuf,

    /// Output report path
    #[arg(short, long)]
    pub output: PathBuf,

    /// Naming standard for contigs in the output
    #[arg(long, value_enum, default_value = "sequence-name")]
    pub contig_naming: ContigNaming,

    /// Job identifier, key of the resumable writer state
    #[arg(long, default_value = "accession-report-job")]
    pub job_id: String,

    /// Number of variants written per chunk
    #[arg(long, default_value = "1000")]
    pub chunk_size: usize,
}

/// Execute the report subcommand
///
/// # Errors
///
/// Returns an error if any input cannot be loaded, or if a record cannot be
/// denormalized — a single bad record fails the whole report.
pub fn run(args: &ReportArgs, verbose: bool) -> anyhow::Result<()> {
    let registry = VariantRegistry::load_from_file(&args.registry)
        .with_context(|| format!("loading registry {}", args.registry.display()))?;
    let table = ContigSynonymTable::from_report(&args.assembly_report)
        .with_context(|| format!("parsing {}", args.assembly_report.display()))?;
    let fasta = FastaSequenceReader::from_path(&args.fasta)
        .with_context(|| format!("loading {}", args.fasta.display()))?;

    let mut state_path = args.output.as_os_str().to_owned();
    state_path.push(".state.json");
    let mut state = JobState::load(&PathBuf::from(state_path))?;

    // The caller-supplied chromosome is reconstructed from the synonym
    // table: the registry stores INSDC names
    let accessioned: Vec<AccessionedVariant> = registry
        .submitted_variants()
        .filter(|variant| variant.assembly == args.assembly)
        .map(|variant| AccessionedVariant {
            accession: variant.accession,
            variant: variant.clone(),
        })
        .collect();
    let originals: Vec<OriginalVariant> = accessioned
        .iter()
        .map(|accessioned| {
            let contig = &accessioned.variant.contig;
            let original = table
                .synonym_for(contig, ContigNaming::SequenceName)
                .unwrap_or(contig);
            OriginalVariant::new(contig.clone(), original)
        })
        .collect();

    if verbose {
        eprintln!(
            "Writing {} accessioned variants to {}",
            accessioned.len(),
            args.output.display()
        );
    }

    let mut writer = AccessionReportWriter::new(
        &args.output,
        &args.job_id,
        args.contig_naming,
        &table,
        &fasta,
    );
    writer.open(&state)?;
    for (original_chunk, accessioned_chunk) in originals
        .chunks(args.chunk_size)
        .zip(accessioned.chunks(args.chunk_size))
    {
        writer.write(original_chunk, accessioned_chunk)?;
    }
    writer.close(&mut state)?;

    println!(
        "Wrote {} variants to {}",
        accessioned.len(),
        args.output.display()
    );
    Ok(())
}
