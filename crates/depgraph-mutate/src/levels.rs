//! Level-only reductions: collapse the graph to one node per assembly or
//! per namespace

use std::collections::HashMap;
use std::sync::Arc;

use depgraph_core::{DeclKind, Graph, Node, NodeId, SourceLocation};

use crate::{Mutator, remap_links};

/// Collapses every assembly subtree to a childless leaf. External
/// assemblies collapse the same way under the kept External sentinel;
/// root children that are neither assemblies nor the sentinel are dropped.
pub struct AssemblyOnly;

impl Mutator for AssemblyOnly {
    fn run(&self, graph: &Graph) -> Graph {
        let mut remap = HashMap::new();

        let mut children = collapse_assemblies(&graph.root, &mut remap);
        if let Some(external) = graph.external() {
            let external_children = collapse_assemblies(external, &mut remap);
            children.push(Arc::new(external.with_children(external_children)));
        }

        Graph {
            root: Arc::new(graph.root.with_children(children)),
            links: remap_links(&graph.links, &remap),
        }
    }
}

fn collapse_assemblies(parent: &Node, remap: &mut HashMap<NodeId, NodeId>) -> Vec<Arc<Node>> {
    parent
        .children
        .iter()
        .filter(|child| child.kind() == Some(DeclKind::Assembly))
        .map(|assembly| {
            for id in assembly.subtree_ids() {
                remap.insert(id, assembly.id.clone());
            }
            Arc::new(assembly.with_children(Vec::new()))
        })
        .collect()
}

/// Collapses every namespace into one synthetic node per fully-qualified
/// display name. Same-named namespaces merge across assemblies, and
/// symbols declared outside any namespace pool into a single `global::`
/// node for the whole run.
pub struct NamespaceOnly;

const GLOBAL_ID: &str = "global::";

#[derive(Default)]
struct SyntheticNamespace {
    locations: Vec<SourceLocation>,
}

struct Collector {
    remap: HashMap<NodeId, NodeId>,
    order: Vec<String>,
    namespaces: HashMap<String, SyntheticNamespace>,
    global: SyntheticNamespace,
    global_has_nodes: bool,
}

impl Mutator for NamespaceOnly {
    fn run(&self, graph: &Graph) -> Graph {
        let mut collector = Collector {
            remap: HashMap::new(),
            order: Vec::new(),
            namespaces: HashMap::new(),
            global: SyntheticNamespace::default(),
            global_has_nodes: false,
        };

        collector.visit(&graph.root);

        let mut children: Vec<Arc<Node>> = Vec::with_capacity(collector.order.len() + 1);
        for name in &collector.order {
            let synthetic = collector
                .namespaces
                .remove(name)
                .expect("ordered names map to collected namespaces");
            let mut node = Node::new(name.as_str(), None);
            node.locations = synthetic.locations;
            children.push(Arc::new(node));
        }
        if collector.global_has_nodes {
            let mut node = Node::new(GLOBAL_ID, None);
            node.locations = collector.global.locations;
            children.push(Arc::new(node));
        }

        Graph {
            root: Arc::new(graph.root.with_children(children)),
            links: remap_links(&graph.links, &collector.remap),
        }
    }
}

impl Collector {
    fn visit(&mut self, node: &Node) {
        match node.kind() {
            Some(DeclKind::Assembly) => {
                self.handle_assembly(node);
                for child in &node.children {
                    self.visit(child);
                }
            }
            Some(DeclKind::Namespace) => self.handle_namespace(node),
            _ => {
                for child in &node.children {
                    self.visit(child);
                }
            }
        }
    }

    /// An assembly's non-namespace children pool into the shared global
    /// namespace node.
    fn handle_assembly(&mut self, node: &Node) {
        let global_id = NodeId::new(GLOBAL_ID);
        let mut has_nodes = false;

        for child in &node.children {
            if child.kind() == Some(DeclKind::Namespace) {
                continue;
            }
            has_nodes = true;
            for id in child.subtree_ids() {
                self.remap.insert(id, global_id.clone());
            }
        }

        if has_nodes {
            self.global_has_nodes = true;
            self.global.locations.extend(node.locations.iter().cloned());
        }
    }

    fn handle_namespace(&mut self, node: &Node) {
        let name = node
            .decl
            .as_ref()
            .map(|d| d.display.clone())
            .unwrap_or_else(|| node.id.as_str().to_string());

        if !self.namespaces.contains_key(&name) {
            self.order.push(name.clone());
        }

        let target = NodeId::new(name.as_str());
        for child in &node.children {
            for id in child.subtree_ids() {
                self.remap.insert(id, target.clone());
            }
        }

        let synthetic = self.namespaces.entry(name).or_default();
        synthetic.locations.extend(node.locations.iter().cloned());
    }
}
