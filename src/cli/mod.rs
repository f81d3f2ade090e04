//! Command-line interface for variant-registry.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **cluster**: Detect and apply merges and splits on a registry
//! - **deprecate**: Deprecate clustered variants left without submissions
//! - **report**: Generate the accession report for an assembly
//! - **contigs**: Resolve contig names through an assembly report
//!
//! ## Usage
//!
//! ```text
//! # Resolve identity collisions after remapping to an assembly
//! variant-registry cluster registry.json --assembly GCA_000001405.28
//!
//! # Generate the accession report with UCSC contig names
//! variant-registry report registry.json --fasta genome.fa \
//!     --assembly-report assembly_report.txt --output report.vcf \
//!     --contig-naming ucsc
//!
//! # Look up a contig synonym
//! variant-registry contigs assembly_report.txt chr1 --target refseq
//! ```

use clap::{Parser, Subcommand};

pub mod cluster;
pub mod contigs;
pub mod deprecate;
pub mod report;

#[derive(Parser)]
#[command(name = "variant-registry")]
#[command(version)]
#[command(about = "Maintain canonical genomic variant accessions")]
#[command(
    long_about = "variant-registry keeps a registry of genomic variant accessions consistent:\n\
                  identical loci discovered under different accessions are merged into one\n\
                  canonical identifier, accessions found to span multiple loci are split, and\n\
                  superseded accessions are deprecated - all with a complete, replayable\n\
                  operation history."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Detect and apply merges and splits on a registry
    Cluster(cluster::ClusterArgs),

    /// Deprecate clustered variants left without submissions
    Deprecate(deprecate::DeprecateArgs),

    /// Generate the accession report for an assembly
    Report(report::ReportArgs),

    /// Resolve contig names through an assembly report
    Contigs(contigs::ContigsArgs),
}
