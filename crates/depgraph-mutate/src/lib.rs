//! Depgraph Mutate — pure graph→graph transformations for export
//!
//! Every mutator takes the input graph by reference and returns a
//! structurally independent result; untouched subtrees are shared through
//! `Arc`. Because inputs are never mutated, independent pipelines can run
//! concurrently over the same source graph.

use std::collections::HashMap;

use depgraph_core::{Graph, Link, NodeId};

pub mod external;
pub mod filter;
pub mod flatten;
pub mod levels;
pub mod pipeline;
pub mod validate;


#[cfg(test)]
pub mod test_utils;

pub use external::ExternalHide;
pub use filter::{
    Filter, FilterAction, FilterMutator, FnFilter, RegexFilter, hide_members, hide_namespaces,
    hide_private, hide_types,
};
pub use flatten::FlattenNamespaces;
pub use levels::{AssemblyOnly, NamespaceOnly};
pub use pipeline::{ConfigError, ExportLevel, PipelineOptions, SymbolFilter, export_pipeline};
pub use validate::{MutateError, validate_links};

/// A graph transformation step.
pub trait Mutator: Send + Sync {
    fn run(&self, graph: &Graph) -> Graph;
}

/// Runs an ordered list of mutators, piping each output into the next.
/// An empty list is the identity.
pub struct Composite {
    mutators: Vec<Box<dyn Mutator>>,
}

impl Composite {
    pub fn new(mutators: Vec<Box<dyn Mutator>>) -> Self {
        Composite { mutators }
    }
}

impl Mutator for Composite {
    fn run(&self, graph: &Graph) -> Graph {
        let mut result = graph.clone();
        for mutator in &self.mutators {
            result = mutator.run(&result);
        }
        result
    }
}

/// Rewire every link through an id remap. A link whose endpoint is not in
/// the map did not survive the mutation and is dropped; provenance ids are
/// never touched.
pub(crate) fn remap_links(links: &[Link], remap: &HashMap<NodeId, NodeId>) -> Vec<Link> {
    links
        .iter()
        .filter_map(|link| {
            let source = remap.get(&link.source)?;
            let target = remap.get(&link.target)?;
            if *source == link.source && *target == link.target {
                Some(link.clone())
            } else {
                Some(link.retarget(source.clone(), target.clone()))
            }
        })
        .collect()
}
