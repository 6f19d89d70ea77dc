//! Mutable node store shared by every pass of one builder invocation

use std::collections::HashMap;
use std::sync::Arc;

use depgraph_core::{
    EXTERNAL_NODE_ID, Graph, Link, Node, NodeDecl, NodeId, ROOT_NODE_ID, SourceLocation,
    SymbolHandle,
};

use crate::source::UsageRole;

/// One recorded usage, waiting for the resolution pass.
#[derive(Debug, Clone)]
pub(crate) struct PendingUse {
    /// Index of the project whose semantic source can describe `symbol`.
    pub project: usize,
    pub symbol: SymbolHandle,
    pub location: SourceLocation,
    pub role: UsageRole,
}

/// Node under construction. Children are kept as ids so the store stays a
/// flat map while the tree grows.
#[derive(Debug)]
pub(crate) struct BuildNode {
    pub id: NodeId,
    pub decl: Option<NodeDecl>,
    pub children: Vec<NodeId>,
    pub locations: Vec<SourceLocation>,
    pub pending: Vec<PendingUse>,
}

impl BuildNode {
    fn new(id: NodeId, decl: Option<NodeDecl>) -> Self {
        BuildNode {
            id,
            decl,
            children: Vec::new(),
            locations: Vec::new(),
            pending: Vec::new(),
        }
    }

    /// True when every recorded location lies outside the analyzed source.
    pub fn is_external(&self) -> bool {
        !self.locations.is_empty()
            && self
                .locations
                .iter()
                .all(|l| l.kind == depgraph_core::LocationKind::External)
    }
}

/// The id→node registry every pass writes into. Root and the External
/// sentinel exist from the start, even for an empty input.
pub(crate) struct GraphData {
    nodes: HashMap<NodeId, BuildNode>,
    pub links: Vec<Link>,
}

impl GraphData {
    pub fn new() -> Self {
        let root_id = NodeId::new(ROOT_NODE_ID);
        let external_id = NodeId::new(EXTERNAL_NODE_ID);

        let mut root = BuildNode::new(root_id.clone(), None);
        root.children.push(external_id.clone());

        let mut nodes = HashMap::new();
        nodes.insert(root_id, root);
        nodes.insert(external_id.clone(), BuildNode::new(external_id, None));

        GraphData {
            nodes,
            links: Vec::new(),
        }
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn node(&self, id: &NodeId) -> Option<&BuildNode> {
        self.nodes.get(id)
    }

    /// Get-or-create a node under `parent`. Returns `false` for an orphan:
    /// a parent id nobody registered, which is logged and skipped rather
    /// than aborting the build.
    pub fn add_node(&mut self, parent: &NodeId, id: NodeId, decl: Option<NodeDecl>) -> bool {
        if self.nodes.contains_key(&id) {
            return true;
        }

        if !self.nodes.contains_key(parent) {
            tracing::warn!(
                parent = %parent,
                node = %id,
                "attempt to add node under a parent that is not in the store"
            );
            return false;
        }

        self.nodes
            .insert(id.clone(), BuildNode::new(id.clone(), decl));
        self.nodes
            .get_mut(parent)
            .expect("parent checked above")
            .children
            .push(id);
        true
    }

    /// Record one declaring location, ignoring exact duplicates.
    pub fn add_location(&mut self, id: &NodeId, location: SourceLocation) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        if !node.locations.contains(&location) {
            node.locations.push(location);
        }
    }

    /// Attach pending usages, deduplicated by source location: the same
    /// dependency used twice from one spot is one usage.
    pub fn add_pending(&mut self, id: &NodeId, uses: Vec<PendingUse>) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        for item in uses {
            if node.pending.iter().any(|p| p.location == item.location) {
                continue;
            }
            node.pending.push(item);
        }
    }

    /// Ids of every node below Root, pre-order. Snapshot for the resolver,
    /// which inserts external nodes while iterating.
    pub fn ids_below_root(&self) -> Vec<NodeId> {
        let mut result = Vec::new();
        let root = NodeId::new(ROOT_NODE_ID);
        self.collect_ids(&root, &mut result);
        result
    }

    fn collect_ids(&self, id: &NodeId, result: &mut Vec<NodeId>) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        for child in &node.children {
            result.push(child.clone());
            self.collect_ids(child, result);
        }
    }

    pub fn take_pending(&mut self, id: &NodeId) -> Vec<PendingUse> {
        self.nodes
            .get_mut(id)
            .map(|n| std::mem::take(&mut n.pending))
            .unwrap_or_default()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Freeze the store into the immutable graph snapshot.
    pub fn freeze(mut self) -> Graph {
        let root_id = NodeId::new(ROOT_NODE_ID);
        let root = freeze_node(&mut self.nodes, &root_id)
            .expect("root node always exists in the store");

        Graph {
            root,
            links: self.links,
        }
    }
}

fn freeze_node(nodes: &mut HashMap<NodeId, BuildNode>, id: &NodeId) -> Option<Arc<Node>> {
    let build = nodes.remove(id)?;

    let mut node = Node::new(build.id, build.decl);
    node.locations = build.locations;
    node.children = build
        .children
        .iter()
        .filter_map(|child| freeze_node(nodes, child))
        .collect();

    Some(Arc::new(node))
}

/// Transient per-project multimap: enclosing declaration id → usages seen
/// inside it. Drained into nodes during the declaration pass.
#[derive(Default)]
pub(crate) struct LinkedSymbolsMap {
    items: HashMap<NodeId, Vec<PendingUse>>,
    recorded: u64,
}

impl LinkedSymbolsMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, enclosing: NodeId, item: PendingUse) {
        self.items.entry(enclosing).or_default().push(item);
        self.recorded += 1;
    }

    pub fn take(&mut self, enclosing: &NodeId) -> Vec<PendingUse> {
        self.items.remove(enclosing).unwrap_or_default()
    }

    pub fn recorded(&self) -> u64 {
        self.recorded
    }
}
