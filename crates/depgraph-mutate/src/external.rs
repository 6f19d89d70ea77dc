//! Collapsing or dropping the External sentinel subtree

use std::collections::HashSet;
use std::sync::Arc;

use depgraph_core::{EXTERNAL_NODE_ID, Graph, NodeId};

use crate::Mutator;

/// Hides out-of-source symbols. The default keeps the External sentinel as
/// a single leaf and rewires every link with an external endpoint onto it;
/// full mode drops the sentinel and those links entirely. `original_*`
/// link ids keep pointing at the real external symbols either way.
pub struct ExternalHide {
    children_only: bool,
}

impl ExternalHide {
    /// Collapse the sentinel to a leaf, rewiring external links onto it.
    pub fn new() -> Self {
        ExternalHide {
            children_only: true,
        }
    }

    /// Drop the sentinel and every link touching an external symbol.
    pub fn full() -> Self {
        ExternalHide {
            children_only: false,
        }
    }
}

impl Default for ExternalHide {
    fn default() -> Self {
        Self::new()
    }
}

impl Mutator for ExternalHide {
    fn run(&self, graph: &Graph) -> Graph {
        // Nothing external left to hide; also what makes full mode
        // idempotent.
        let Some(external) = graph.external() else {
            return graph.clone();
        };

        let externals: HashSet<NodeId> = external.subtree_ids().into_iter().collect();
        let external_id = NodeId::new(EXTERNAL_NODE_ID);

        let mut children: Vec<Arc<_>> = graph
            .root
            .children
            .iter()
            .filter(|child| child.id != EXTERNAL_NODE_ID)
            .cloned()
            .collect();
        if self.children_only {
            children.push(Arc::new(external.with_children(Vec::new())));
        }

        let links = graph
            .links
            .iter()
            .filter_map(|link| {
                let external_source = externals.contains(&link.source);
                let external_target = externals.contains(&link.target);

                if !external_source && !external_target {
                    return Some(link.clone());
                }
                if !self.children_only {
                    return None;
                }

                let source = if external_source {
                    external_id.clone()
                } else {
                    link.source.clone()
                };
                let target = if external_target {
                    external_id.clone()
                } else {
                    link.target.clone()
                };
                Some(link.retarget(source, target))
            })
            .collect();

        Graph {
            root: Arc::new(graph.root.with_children(children)),
            links,
        }
    }
}
