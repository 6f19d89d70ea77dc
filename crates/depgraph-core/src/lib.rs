//! Depgraph Core — symbol graph data model: nodes, links, locations

pub mod graph;
pub mod model;


#[cfg(test)]
pub mod test_utils;

pub use graph::{EXTERNAL_NODE_ID, Graph, ROOT_NODE_ID};
pub use model::{
    DeclKind, Link, LinkKind, LocationKind, Node, NodeDecl, NodeId, SourceLocation, SymbolHandle,
    Visibility,
};
