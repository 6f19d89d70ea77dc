//! Depgraph CLI entry point

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "depgraph")]
#[command(about = "Builds a symbol dependency graph and exports it", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Semantic model file: a serialized compilation set
    pub model: PathBuf,

    /// Logging verbosity: q, m, n, d or diag
    #[arg(short, long, default_value = "n")]
    pub verbosity: String,
}

#[derive(Args)]
pub(crate) struct ExportArgs {
    /// Output file; defaults next to the model with the format extension
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Collapse external symbols onto the External node
    #[arg(long)]
    pub hide_external: bool,

    /// assembly, namespace, type, public-member or all
    #[arg(short = 'l', long, default_value = "assembly")]
    pub export_level: String,

    /// Symbol filter as 'action,regex' with action hide|dissolve|skip;
    /// repeatable, matched against whole node ids in order
    #[arg(short = 'f', long = "symbol-filter")]
    pub symbol_filters: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Export the dependency graph as JSON
    Json {
        #[command(flatten)]
        build: BuildArgs,

        #[command(flatten)]
        export: ExportArgs,

        /// Indent the output
        #[arg(long)]
        pretty: bool,
    },
    /// Export the dependency graph as Graphviz DOT
    Dot {
        #[command(flatten)]
        build: BuildArgs,

        #[command(flatten)]
        export: ExportArgs,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Json {
            build,
            export,
            pretty,
        } => commands::export(build, export, commands::Format::Json { pretty: *pretty }),
        Commands::Dot { build, export } => commands::export(build, export, commands::Format::Dot),
    };

    if let Err(error) = result {
        report(&error);
        std::process::exit(1);
    }
}

/// Business errors print their message; anything unexpected prints the
/// full chain.
fn report(error: &anyhow::Error) {
    // Cancellation is a silent non-success exit.
    if matches!(
        error.downcast_ref::<depgraph_build::BuildError>(),
        Some(depgraph_build::BuildError::Cancelled)
    ) {
        return;
    }

    let business = error.is::<commands::UsageError>()
        || error.is::<depgraph_build::BuildError>()
        || error.is::<depgraph_build::ModelError>()
        || error.is::<depgraph_mutate::ConfigError>()
        || error.is::<depgraph_export::ExportError>();

    if business {
        eprintln!("{error:#}");
    } else {
        eprintln!("{error:?}");
    }
}
