//! Core data structures for the symbol dependency graph

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Unique, hierarchical identifier of a graph node, e.g.
/// `Vehicles.dll/Vehicles.Entities.Car.ctor()`. Cheap to clone; mutation
/// passes shuffle ids around far more often than they create them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(Arc<str>);

impl NodeId {
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        NodeId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        NodeId::new(value)
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        NodeId::new(value)
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for NodeId {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for NodeId {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

/// Opaque handle to a declaration in the semantic source that produced the
/// graph. Only meaningful to the source that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SymbolHandle(pub u32);

/// Where a location record points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocationKind {
    /// Declared in the analyzed source.
    Local,
    /// Declared in a referenced assembly outside the analyzed source.
    External,
    /// Declared in a tracked generated-source file.
    Generated,
}

/// One place a symbol is declared or used. For external symbols `path` is
/// the assembly name and line/column are zero; for assemblies it is the
/// project path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    pub path: String,
    pub line: u32,
    pub column: u32,
    pub kind: LocationKind,
}

impl SourceLocation {
    pub fn local(path: impl Into<String>, line: u32, column: u32) -> Self {
        SourceLocation {
            path: path.into(),
            line,
            column,
            kind: LocationKind::Local,
        }
    }

    pub fn generated(path: impl Into<String>, line: u32, column: u32) -> Self {
        SourceLocation {
            path: path.into(),
            line,
            column,
            kind: LocationKind::Generated,
        }
    }

    /// Zero-position record naming the assembly an external symbol lives in.
    pub fn external(assembly_name: &str) -> Self {
        SourceLocation {
            path: format!("{assembly_name}.dll"),
            line: 0,
            column: 0,
            kind: LocationKind::External,
        }
    }

    /// Human-readable `path:line:column`, or the bare path for records
    /// without a position.
    pub fn display(&self) -> String {
        if self.line == 0 {
            self.path.clone()
        } else {
            format!("{}:{}:{}", self.path, self.line, self.column)
        }
    }
}

/// Distilled kind of the declaration behind a node. This is what the
/// mutation filters and renderers match on; the full symbol stays behind
/// the opaque handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeclKind {
    Assembly,
    Module,
    Namespace,
    Class,
    Struct,
    Interface,
    Enum,
    Delegate,
    Method,
    Property,
    Field,
    Const,
    Event,
    /// Referenced symbol shape with no dedicated kind (array, pointer, …).
    Other,
}

impl DeclKind {
    /// Type declarations (class, struct, interface, enum, delegate).
    pub fn is_type(self) -> bool {
        matches!(
            self,
            DeclKind::Class
                | DeclKind::Struct
                | DeclKind::Interface
                | DeclKind::Enum
                | DeclKind::Delegate
        )
    }

    /// Containers above the namespace level.
    pub fn is_container(self) -> bool {
        matches!(self, DeclKind::Assembly | DeclKind::Module)
    }
}

/// Declared accessibility of a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Visibility {
    Public,
    Internal,
    Protected,
    Private,
}

/// Declaration record attached to nodes that represent a real symbol.
/// Synthetic nodes (Root, External, merged namespaces) carry none.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeDecl {
    /// Handle into the semantic source, kept for renderers only.
    pub symbol: SymbolHandle,
    pub kind: DeclKind,
    /// Simple name, e.g. `Car`.
    pub name: String,
    /// Qualified display name, e.g. `Vehicles.Entities.Car`.
    pub display: String,
    pub visibility: Visibility,
}

/// A graph vertex: one declared or referenced symbol.
///
/// Nodes are immutable once a graph leaves the builder. Mutators produce
/// fresh trees and share untouched subtrees through the `Arc` children.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub decl: Option<NodeDecl>,
    pub children: Vec<Arc<Node>>,
    pub locations: Vec<SourceLocation>,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, decl: Option<NodeDecl>) -> Self {
        Node {
            id: id.into(),
            decl,
            children: Vec::new(),
            locations: Vec::new(),
        }
    }

    /// Copy of this node with replaced children; everything else is shared.
    pub fn with_children(&self, children: Vec<Arc<Node>>) -> Node {
        Node {
            id: self.id.clone(),
            decl: self.decl.clone(),
            children,
            locations: self.locations.clone(),
        }
    }

    pub fn kind(&self) -> Option<DeclKind> {
        self.decl.as_ref().map(|d| d.kind)
    }

    /// True when every location points outside the analyzed source.
    pub fn is_external(&self) -> bool {
        !self.locations.is_empty()
            && self
                .locations
                .iter()
                .all(|l| l.kind == LocationKind::External)
    }

    /// True when every location points into generated code.
    pub fn is_generated(&self) -> bool {
        !self.locations.is_empty()
            && self
                .locations
                .iter()
                .all(|l| l.kind == LocationKind::Generated)
    }

    /// Pre-order walk over this node and its descendants. Returning `false`
    /// from the visitor prunes the subtree below the current node.
    pub fn visit<'a>(&'a self, visitor: &mut impl FnMut(&'a Node) -> bool) {
        if !visitor(self) {
            return;
        }

        for child in &self.children {
            child.visit(visitor);
        }
    }

    /// Ids of this node and every descendant.
    pub fn subtree_ids(&self) -> Vec<NodeId> {
        let mut ids = Vec::new();
        self.visit(&mut |node| {
            ids.push(node.id.clone());
            true
        });
        ids
    }

    /// Find a node in this subtree by id.
    pub fn find(&self, id: &str) -> Option<&Node> {
        let mut found = None;
        self.visit(&mut |node| {
            if found.is_some() {
                return false;
            }
            if node.id == *id {
                found = Some(node);
                return false;
            }
            true
        });
        found
    }
}

/// What kind of use a link represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinkKind {
    /// Plain symbol reference.
    Reference,
    /// Method invocation or object creation.
    Call,
    /// Base-type position, target is not an interface (or the source is).
    Inherits,
    /// Base-type position, interface target on a non-interface type.
    Implements,
}

/// A directed edge: one observed use of `target` from the scope of
/// `source`. `original_*` keep pointing at the pre-mutation symbols while
/// mutators rewrite `source`/`target`.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub source: NodeId,
    pub target: NodeId,
    pub original_source: NodeId,
    pub original_target: NodeId,
    pub kind: LinkKind,
    pub location: SourceLocation,
}

impl Link {
    pub fn new(
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
        kind: LinkKind,
        location: SourceLocation,
    ) -> Self {
        let source = source.into();
        let target = target.into();
        Link {
            original_source: source.clone(),
            original_target: target.clone(),
            source,
            target,
            kind,
            location,
        }
    }

    /// Copy with rewired endpoints; provenance is untouched.
    pub fn retarget(&self, source: NodeId, target: NodeId) -> Link {
        Link {
            source,
            target,
            original_source: self.original_source.clone(),
            original_target: self.original_target.clone(),
            kind: self.kind,
            location: self.location.clone(),
        }
    }
}
