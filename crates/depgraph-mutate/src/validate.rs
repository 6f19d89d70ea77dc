//! Diagnostic check that a mutation left no dangling link endpoints

use depgraph_core::Graph;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MutateError {
    #[error(
        "corrupted link: {src} -> {target} (originally {original_source} -> {original_target})"
    )]
    CorruptedLink {
        src: String,
        target: String,
        original_source: String,
        original_target: String,
    },
}

/// Verify that every link's current endpoints exist in the tree. Meant for
/// tests and debugging pipelines, not for the default export path.
pub fn validate_links(graph: &Graph) -> Result<(), MutateError> {
    let index = graph.node_index();

    for link in &graph.links {
        if !index.contains_key(&link.source) || !index.contains_key(&link.target) {
            return Err(MutateError::CorruptedLink {
                src: link.source.to_string(),
                target: link.target.to_string(),
                original_source: link.original_source.to_string(),
                original_target: link.original_target.to_string(),
            });
        }
    }

    Ok(())
}
