//! The filter algebra: per-node Skip/Hide/Dissolve decisions applied as a
//! single top-down rewrite

use std::collections::HashMap;
use std::sync::Arc;

use depgraph_core::{DeclKind, Graph, Node, NodeId, Visibility};
use regex::Regex;

use crate::pipeline::ConfigError;
use crate::{Mutator, remap_links};

/// What to do with one node, decided once from the pre-mutation
/// `(parent, node)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterAction {
    /// Keep the node; its children are evaluated recursively.
    Skip,
    /// Remove the node and its subtree; links touching the subtree die.
    Hide,
    /// Remove the node and its subtree, but rewire links into the subtree
    /// onto the node's own parent.
    Dissolve,
}

pub trait Filter: Send + Sync {
    fn evaluate(&self, parent: &Node, node: &Node) -> FilterAction;
}

/// Closure-backed filter for callers and tests.
pub struct FnFilter {
    action: Box<dyn Fn(&Node, &Node) -> FilterAction + Send + Sync>,
}

impl FnFilter {
    pub fn new(action: impl Fn(&Node, &Node) -> FilterAction + Send + Sync + 'static) -> Self {
        FnFilter {
            action: Box::new(action),
        }
    }
}

impl Filter for FnFilter {
    fn evaluate(&self, parent: &Node, node: &Node) -> FilterAction {
        (self.action)(parent, node)
    }
}

/// Matches the compiled pattern against the whole node id.
pub struct RegexFilter {
    regex: Regex,
    action: FilterAction,
}

impl RegexFilter {
    pub fn new(action: FilterAction, pattern: &str) -> Result<Self, ConfigError> {
        let regex = Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(RegexFilter { regex, action })
    }
}

impl Filter for RegexFilter {
    fn evaluate(&self, _parent: &Node, node: &Node) -> FilterAction {
        let id = node.id.as_str();
        match self.regex.find(id) {
            // Partial matches do not count.
            Some(m) if m.start() == 0 && m.end() == id.len() => self.action,
            _ => FilterAction::Skip,
        }
    }
}

// ── built-in filters ────────────────────────────────────
//
// All of them ignore nodes without a declaration record: Root, External
// and synthetic namespaces are never filtered away by kind.

/// Dissolve private members of types.
pub fn hide_private() -> FnFilter {
    FnFilter::new(|parent, node| match (&parent.decl, &node.decl) {
        (Some(p), Some(n)) if p.kind.is_type() && n.visibility == Visibility::Private => {
            FilterAction::Dissolve
        }
        _ => FilterAction::Skip,
    })
}

/// Dissolve non-type members of types, keeping nested types.
pub fn hide_members() -> FnFilter {
    FnFilter::new(|parent, node| match (&parent.decl, &node.decl) {
        (Some(p), Some(n)) if p.kind.is_type() && !n.kind.is_type() => FilterAction::Dissolve,
        _ => FilterAction::Skip,
    })
}

/// Dissolve everything below the namespace level.
pub fn hide_types() -> FnFilter {
    FnFilter::new(|_, node| match &node.decl {
        Some(decl)
            if !decl.kind.is_container() && decl.kind != DeclKind::Namespace =>
        {
            FilterAction::Dissolve
        }
        _ => FilterAction::Skip,
    })
}

/// Dissolve everything below the assembly/module level.
pub fn hide_namespaces() -> FnFilter {
    FnFilter::new(|_, node| match &node.decl {
        Some(decl) if !decl.kind.is_container() => FilterAction::Dissolve,
        _ => FilterAction::Skip,
    })
}

/// Applies an ordered filter list to the whole tree. For each node the
/// first non-Skip result wins; the default is Skip. Copies are only
/// materialized along paths where something actually changed.
pub struct FilterMutator {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterMutator {
    pub fn new(filters: Vec<Box<dyn Filter>>) -> Self {
        FilterMutator { filters }
    }

    pub fn single(filter: impl Filter + 'static) -> Self {
        FilterMutator {
            filters: vec![Box::new(filter)],
        }
    }

    fn action(&self, parent: &Node, node: &Node) -> FilterAction {
        for filter in &self.filters {
            let action = filter.evaluate(parent, node);
            if action != FilterAction::Skip {
                return action;
            }
        }
        FilterAction::Skip
    }

    fn rewrite(&self, node: &Arc<Node>, remap: &mut HashMap<NodeId, NodeId>) -> Arc<Node> {
        remap.insert(node.id.clone(), node.id.clone());

        let mut children = Vec::with_capacity(node.children.len());
        let mut changed = false;

        for child in &node.children {
            match self.action(node, child) {
                FilterAction::Skip => {
                    let kept = self.rewrite(child, remap);
                    changed |= !Arc::ptr_eq(&kept, child);
                    children.push(kept);
                }
                FilterAction::Hide => {
                    // Subtree ids never enter the map; their links die in
                    // the remap step.
                    changed = true;
                }
                FilterAction::Dissolve => {
                    changed = true;
                    for id in child.subtree_ids() {
                        remap.insert(id, node.id.clone());
                    }
                }
            }
        }

        if changed {
            Arc::new(node.with_children(children))
        } else {
            Arc::clone(node)
        }
    }
}

impl Mutator for FilterMutator {
    fn run(&self, graph: &Graph) -> Graph {
        let mut remap = HashMap::new();
        let root = self.rewrite(&graph.root, &mut remap);

        Graph {
            root,
            links: remap_links(&graph.links, &remap),
        }
    }
}
