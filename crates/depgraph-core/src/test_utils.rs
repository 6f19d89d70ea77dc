//! Shared helpers for core unit tests

use crate::model::{DeclKind, Node, NodeDecl, NodeId, SymbolHandle, Visibility};

pub fn node(id: &str, decl: Option<NodeDecl>) -> Node {
    Node::new(NodeId::new(id), decl)
}

/// Small factories for declaration records.
pub mod decl {
    use super::*;

    pub fn make(kind: DeclKind, name: &str, display: &str) -> Option<NodeDecl> {
        Some(NodeDecl {
            symbol: SymbolHandle(0),
            kind,
            name: name.to_string(),
            display: display.to_string(),
            visibility: Visibility::Public,
        })
    }

    pub fn assembly(name: &str) -> Option<NodeDecl> {
        make(DeclKind::Assembly, name, &format!("{name}.dll"))
    }

    pub fn namespace(display: &str) -> Option<NodeDecl> {
        let name = display.rsplit('.').next().unwrap_or(display);
        make(DeclKind::Namespace, name, display)
    }

    pub fn class(name: &str) -> Option<NodeDecl> {
        make(DeclKind::Class, name, name)
    }
}
