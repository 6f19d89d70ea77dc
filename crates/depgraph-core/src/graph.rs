//! The immutable graph snapshot and its well-known sentinel nodes

use std::collections::HashMap;
use std::sync::Arc;

use crate::model::{Link, Node, NodeId};

/// Id of the virtual root node.
pub const ROOT_NODE_ID: &str = "Root";

/// Id of the reserved sentinel that parents every symbol living outside the
/// analyzed source set.
pub const EXTERNAL_NODE_ID: &str = "External";

/// Immutable dependency graph: the node tree plus a flat edge list.
///
/// The tree is acyclic by construction; the edge list is an unconstrained
/// directed multigraph, cycles and self-loops included.
#[derive(Debug, Clone)]
pub struct Graph {
    pub root: Arc<Node>,
    pub links: Vec<Link>,
}

impl Graph {
    /// Graph for an empty input: Root with the External sentinel, no links.
    pub fn empty() -> Self {
        let external = Arc::new(Node::new(EXTERNAL_NODE_ID, None));
        let mut root = Node::new(ROOT_NODE_ID, None);
        root.children.push(external);

        Graph {
            root: Arc::new(root),
            links: Vec::new(),
        }
    }

    /// The External sentinel, if it survived mutation.
    pub fn external(&self) -> Option<&Arc<Node>> {
        self.root
            .children
            .iter()
            .find(|child| child.id == EXTERNAL_NODE_ID)
    }

    /// Working id→node index over the current tree. Built on demand; never
    /// part of the persistent model.
    pub fn node_index(&self) -> HashMap<NodeId, Arc<Node>> {
        let mut index = HashMap::new();
        collect(&self.root, &mut index);
        index
    }

    /// Total number of nodes in the tree.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        self.root.visit(&mut |_| {
            count += 1;
            true
        });
        count
    }
}

fn collect(node: &Arc<Node>, index: &mut HashMap<NodeId, Arc<Node>>) {
    index.insert(node.id.clone(), Arc::clone(node));
    for child in &node.children {
        collect(child, index);
    }
}
