use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod contig;
mod core;
mod registry;
mod report;
mod resolve;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("variant_registry=debug,info")
    } else {
        EnvFilter::new("variant_registry=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        cli::Commands::Cluster(args) => {
            cli::cluster::run(&args, cli.verbose)?;
        }
        cli::Commands::Deprecate(args) => {
            cli::deprecate::run(&args, cli.verbose)?;
        }
        cli::Commands::Report(args) => {
            cli::report::run(&args, cli.verbose)?;
        }
        cli::Commands::Contigs(args) => {
            cli::contigs::run(&args, cli.verbose)?;
        }
    }

    Ok(())
}
