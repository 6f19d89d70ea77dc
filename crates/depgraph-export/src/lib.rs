//! Depgraph Export — renderers for the mutated graph

use depgraph_core::{DeclKind, LinkKind, LocationKind, Node};
use thiserror::Error;

pub mod dot;
pub mod json;


pub use dot::DotExport;
pub use json::JsonExport;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("cannot write output")]
    Io(#[from] std::io::Error),

    #[error("cannot serialize graph")]
    Json(#[from] serde_json::Error),
}

/// Human-readable label: the declaration's display name, or the raw id for
/// synthetic nodes.
pub(crate) fn caption(node: &Node) -> &str {
    match &node.decl {
        Some(decl) => &decl.display,
        None => node.id.as_str(),
    }
}

pub(crate) fn node_type(node: &Node) -> &'static str {
    let Some(decl) = &node.decl else {
        return "group";
    };
    match decl.kind {
        DeclKind::Assembly => "assembly",
        DeclKind::Module => "module",
        DeclKind::Namespace => "namespace",
        DeclKind::Class => "class",
        DeclKind::Struct => "struct",
        DeclKind::Interface => "interface",
        DeclKind::Enum => "enum",
        DeclKind::Delegate => "delegate",
        DeclKind::Method => "method",
        DeclKind::Property => "property",
        DeclKind::Field => "field",
        DeclKind::Const => "const",
        DeclKind::Event => "event",
        DeclKind::Other => "unknown",
    }
}

pub(crate) fn link_kind(kind: LinkKind) -> &'static str {
    match kind {
        LinkKind::Reference => "reference",
        LinkKind::Call => "call",
        LinkKind::Inherits => "inherits",
        LinkKind::Implements => "implements",
    }
}

pub(crate) fn location_kind(kind: LocationKind) -> &'static str {
    match kind {
        LocationKind::Local => "local",
        LocationKind::External => "external",
        LocationKind::Generated => "generated",
    }
}

/// Fill color per node kind.
pub(crate) fn color(node: &Node) -> &'static str {
    let Some(decl) = &node.decl else {
        return "#17202a";
    };
    match decl.kind {
        DeclKind::Assembly | DeclKind::Module => "#7d6050",
        DeclKind::Namespace => "#8e8ade",
        DeclKind::Enum => "#758c92",
        DeclKind::Class => "#5d998b",
        DeclKind::Struct => "#7fd1ae",
        DeclKind::Interface => "#475c6c",
        DeclKind::Delegate => "#6b8f71",
        DeclKind::Const => "#9a8f55",
        DeclKind::Field => "#8a7f45",
        DeclKind::Property => "#4f7cac",
        DeclKind::Event => "#7c5295",
        DeclKind::Method => "#3f6079",
        DeclKind::Other => "#626567",
    }
}
