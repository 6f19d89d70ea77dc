//! Depgraph Build — two-pass graph construction over a semantic source

pub mod builder;
pub mod cancel;
pub mod ids;
pub mod model;
pub mod source;

mod decl;
mod resolve;
mod store;
mod usage;


#[cfg(test)]
pub mod test_utils;

pub use builder::{BuildError, GraphBuilder};
pub use cancel::CancelFlag;
pub use ids::SymbolIdGenerator;
pub use model::{ModelError, ModelSet, ProjectModel};
pub use source::{
    Diagnostic, MethodKind, Parameter, Primitive, RefKind, SemanticSource, SourceSpan, Symbol,
    SymbolInfo, SymbolKind, SyntaxKind, SyntaxNode, SyntaxNodeId, SyntaxTree, TypeKind, UsageRole,
};
