//! CLI command implementations

use std::fmt;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use depgraph_build::{CancelFlag, GraphBuilder, ModelSet};
use depgraph_export::{DotExport, JsonExport};
use depgraph_mutate::{Mutator, PipelineOptions, export_pipeline};

/// Bad command-line input detected before any build attempt.
#[derive(Debug)]
pub(crate) struct UsageError(pub String);

impl fmt::Display for UsageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for UsageError {}

pub(crate) enum Format {
    Json { pretty: bool },
    Dot,
}

impl Format {
    fn extension(&self) -> &'static str {
        match self {
            Format::Json { .. } => "graph.json",
            Format::Dot => "dot",
        }
    }
}

pub(crate) fn export(
    build: &crate::BuildArgs,
    export: &crate::ExportArgs,
    format: Format,
) -> anyhow::Result<()> {
    init_logging(&build.verbosity)?;

    // Configuration problems surface before the model is even read.
    let options = PipelineOptions {
        hide_external: export.hide_external,
        level: export.export_level.parse()?,
        flat: false,
        symbol_filters: export
            .symbol_filters
            .iter()
            .map(|s| s.parse())
            .collect::<Result<_, _>>()?,
    };
    let pipeline = export_pipeline(&options)?;

    let set = ModelSet::from_path(&build.model)?;
    tracing::info!(
        model = %build.model.display(),
        projects = set.projects.len(),
        "building graph"
    );

    let graph = GraphBuilder::new().run(&set.sources(), &CancelFlag::new())?;

    tracing::debug!("mutating");
    let graph = pipeline.run(&graph);

    let path = output_path(export, build, format.extension());
    let file = File::create(&path)
        .with_context(|| format!("cannot create output file {}", path.display()))?;
    let writer = BufWriter::new(file);

    tracing::debug!("exporting");
    match format {
        Format::Json { pretty } => JsonExport::new(pretty).run(&graph, writer)?,
        Format::Dot => DotExport.run(&graph, writer)?,
    }

    tracing::info!(output = %path.display(), "export complete");
    Ok(())
}

fn output_path(export: &crate::ExportArgs, build: &crate::BuildArgs, extension: &str) -> PathBuf {
    if let Some(output) = &export.output {
        return output.clone();
    }

    let stem = build
        .model
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "depgraph".to_string());
    build.model.with_file_name(format!("{stem}.{extension}"))
}

fn init_logging(verbosity: &str) -> anyhow::Result<()> {
    let level = match verbosity {
        "q" => "off",
        "m" => "warn",
        "n" => "info",
        "d" => "debug",
        "diag" => "trace",
        other => {
            return Err(UsageError(format!(
                "invalid verbosity '{other}', expected q|m|n|d|diag"
            ))
            .into());
        }
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    Ok(())
}
