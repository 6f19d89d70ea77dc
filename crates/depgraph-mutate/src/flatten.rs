//! Namespace flattening: every namespace becomes a direct child of its
//! assembly or module

use std::sync::Arc;

use depgraph_core::{DeclKind, Graph, Node};

use crate::Mutator;

/// Lifts namespace nodes from any depth to sit directly under their
/// assembly/module, keeping only their non-namespace children. Ids are
/// untouched, so links are unaffected.
///
/// Runs first in every pipeline; the structural mutators after it assume
/// the flat assembly/namespace/type/member shape.
pub struct FlattenNamespaces;

impl Mutator for FlattenNamespaces {
    fn run(&self, graph: &Graph) -> Graph {
        Graph {
            root: flatten(&graph.root),
            links: graph.links.clone(),
        }
    }
}

fn flatten(node: &Arc<Node>) -> Arc<Node> {
    let mut children = Vec::with_capacity(node.children.len());
    let mut changed = false;

    for child in &node.children {
        if can_contain_namespaces(child) {
            let flattened = flatten(child);
            changed |= !Arc::ptr_eq(&flattened, child);
            children.push(flattened);
            continue;
        }

        if child.kind() != Some(DeclKind::Namespace) {
            children.push(Arc::clone(child));
            continue;
        }

        changed = true;
        for namespace in collect_namespaces(child) {
            let kept: Vec<Arc<Node>> = namespace
                .children
                .iter()
                .filter(|c| c.kind() != Some(DeclKind::Namespace))
                .cloned()
                .collect();
            // A namespace that only held other namespaces disappears.
            if !kept.is_empty() {
                children.push(Arc::new(namespace.with_children(kept)));
            }
        }
    }

    if changed {
        Arc::new(node.with_children(children))
    } else {
        Arc::clone(node)
    }
}

fn can_contain_namespaces(node: &Node) -> bool {
    match node.kind() {
        None => true,
        Some(kind) => kind.is_container(),
    }
}

/// All namespace nodes in a subtree, pre-order, without descending into
/// non-namespace children.
fn collect_namespaces(node: &Node) -> Vec<&Node> {
    let mut result = Vec::new();
    node.visit(&mut |n| {
        if n.kind() == Some(DeclKind::Namespace) {
            result.push(n);
            true
        } else {
            false
        }
    });
    result
}
