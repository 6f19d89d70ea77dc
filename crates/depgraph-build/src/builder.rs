//! Graph builder: orchestrates the declaration, usage and resolution
//! passes over every input project against one shared node store

use depgraph_core::Graph;
use thiserror::Error;

use crate::cancel::CancelFlag;
use crate::decl::DeclarationVisitor;
use crate::ids::SymbolIdGenerator;
use crate::resolve::LinkResolver;
use crate::source::SemanticSource;
use crate::store::{GraphData, LinkedSymbolsMap};
use crate::usage::UsageVisitor;

#[derive(Debug, Error)]
pub enum BuildError {
    /// A project carries compiler error diagnostics; no partial graph is
    /// produced.
    #[error("project {project} has compiler errors, build break")]
    Diagnostics {
        project: String,
        entries: Vec<String>,
    },

    #[error("build cancelled")]
    Cancelled,
}

/// Builds one immutable [`Graph`] from a set of semantic sources.
///
/// Projects are processed sequentially against a single node store, so
/// identical symbol ids from different compilation units unify into one
/// node. The store is single-writer by design; parallelizing projects
/// would require serializing every store write anyway.
#[derive(Debug, Default)]
pub struct GraphBuilder;

impl GraphBuilder {
    pub fn new() -> Self {
        GraphBuilder
    }

    pub fn run(
        &self,
        sources: &[&dyn SemanticSource],
        cancel: &CancelFlag,
    ) -> Result<Graph, BuildError> {
        let mut data = GraphData::new();
        let generators: Vec<_> = sources.iter().map(|s| SymbolIdGenerator::new(*s)).collect();

        for (project, source) in sources.iter().enumerate() {
            if cancel.is_cancelled() {
                return Err(BuildError::Cancelled);
            }

            self.build_project(*source, project, &generators[project], &mut data, cancel)?;
        }

        if cancel.is_cancelled() {
            return Err(BuildError::Cancelled);
        }

        LinkResolver::new(&mut data, sources, &generators).run();

        for generator in &generators {
            generator.log_statistics();
        }
        tracing::info!(
            nodes = data.node_count(),
            links = data.links.len(),
            "graph complete"
        );

        Ok(data.freeze())
    }

    fn build_project<'a>(
        &self,
        source: &'a (dyn SemanticSource + 'a),
        project: usize,
        ids: &SymbolIdGenerator<'a, dyn SemanticSource + 'a>,
        data: &mut GraphData,
        cancel: &CancelFlag,
    ) -> Result<(), BuildError> {
        tracing::info!(project = source.project_name(), "begin handle project");

        self.check_diagnostics(source)?;

        let mut pending = LinkedSymbolsMap::new();

        let mut usage = UsageVisitor::new(source, project, ids, &mut pending);
        for tree in source.syntax_trees() {
            if cancel.is_cancelled() {
                return Err(BuildError::Cancelled);
            }
            usage.visit_tree(tree);
        }

        tracing::debug!(
            project = source.project_name(),
            usages = pending.recorded(),
            "usage pass complete"
        );

        DeclarationVisitor::new(source, ids, data, &mut pending).run();
        Ok(())
    }

    fn check_diagnostics(&self, source: &dyn SemanticSource) -> Result<(), BuildError> {
        let diagnostics = source.diagnostics();
        if diagnostics.is_empty() {
            return Ok(());
        }

        let entries: Vec<String> = diagnostics.iter().map(|d| d.display()).collect();
        for entry in &entries {
            tracing::error!("{entry}");
        }

        Err(BuildError::Diagnostics {
            project: source.project_name().to_string(),
            entries,
        })
    }
}
