use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use crate::contig::synonyms::ContigSynonymTable;
use crate::core::types::ContigNaming;

#[derive(Args)]
pub struct ContigsArgs {
    /// NCBI assembly report file (.txt or .txt.gz)
    #[arg(required = true)]
    pub assembly_report: PathBuf,

    /// Contig name to resolve, in any naming standard
    #[arg(required = true)]
    pub name: String,

    /// Naming standard to translate to; omit to print the full synonym set
    #[arg(long, value_enum)]
    pub target: Option<ContigNaming>,
}

/// Execute the contigs subcommand
///
/// # Errors
///
/// Returns an error if the assembly report cannot be parsed or the contig
/// cannot be resolved.
pub fn run(args: &ContigsArgs, verbose: bool) -> anyhow::Result<()> {
    let table = ContigSynonymTable::from_report(&args.assembly_report)
        .with_context(|| format!("parsing {}", args.assembly_report.display()))?;
    if verbose {
        eprintln!("Loaded {} contigs from the assembly report", table.len());
    }

    match args.target {
        Some(naming) => {
            let synonym = table.synonym_for(&args.name, naming)?;
            println!("{synonym}");
        }
        None => {
            let synonyms = table
                .resolve(&args.name)
                .with_context(|| format!("contig '{}' not found in the report", args.name))?;
            println!("sequence-name\t{}", synonyms.sequence_name);
            println!("GenBank\t{}", synonyms.genbank.as_deref().unwrap_or("na"));
            println!("RefSeq\t{}", synonyms.refseq.as_deref().unwrap_or("na"));
            println!("UCSC\t{}", synonyms.ucsc.as_deref().unwrap_or("na"));
            println!(
                "identical GenBank/RefSeq\t{}",
                synonyms.identical_genbank_and_refseq
            );
        }
    }
    Ok(())
}
