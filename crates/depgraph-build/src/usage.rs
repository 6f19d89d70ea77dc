//! Usage pass: walks syntax trees and records every meaningful reference
//! against its enclosing declaration

use depgraph_core::{NodeId, SourceLocation, SymbolHandle};

use crate::ids::SymbolIdGenerator;
use crate::source::{
    MethodKind, SemanticSource, SymbolKind, SyntaxKind, SyntaxNode, SyntaxTree, TypeKind,
    UsageRole,
};
use crate::store::{LinkedSymbolsMap, PendingUse};

pub(crate) struct UsageVisitor<'a, S: SemanticSource + ?Sized> {
    source: &'a S,
    project: usize,
    ids: &'a SymbolIdGenerator<'a, S>,
    map: &'a mut LinkedSymbolsMap,
    file: String,
    file_is_generated: bool,
    stack: Vec<NodeId>,
}

impl<'a, S: SemanticSource + ?Sized> UsageVisitor<'a, S> {
    pub fn new(
        source: &'a S,
        project: usize,
        ids: &'a SymbolIdGenerator<'a, S>,
        map: &'a mut LinkedSymbolsMap,
    ) -> Self {
        UsageVisitor {
            source,
            project,
            ids,
            map,
            file: String::new(),
            file_is_generated: false,
            stack: Vec::new(),
        }
    }

    pub fn visit_tree(&mut self, tree: &SyntaxTree) {
        self.file = tree.file.clone();
        self.file_is_generated = self.source.generated_files().contains(&tree.file);
        self.stack.clear();
        self.visit(&tree.root);
    }

    fn visit(&mut self, node: &SyntaxNode) {
        match node.kind {
            SyntaxKind::Declaration => {
                match self.source.declared_symbol(node.id) {
                    Some(symbol) => {
                        let id = self.ids.identify(symbol);
                        self.stack.push(id);
                        self.visit_children(node);
                        self.stack.pop();
                    }
                    None => {
                        tracing::warn!(
                            file = %self.file,
                            line = node.line,
                            "declaration syntax without a declared symbol, skipping scope"
                        );
                        self.visit_children(node);
                    }
                }
            }
            SyntaxKind::Identifier => {
                self.handle_identifier(node);
                self.visit_children(node);
            }
            SyntaxKind::PredefinedType => {
                self.handle_predefined(node);
            }
            SyntaxKind::ObjectCreation => {
                self.handle_creation(node);
                self.visit_children(node);
            }
            SyntaxKind::Other => self.visit_children(node),
        }
    }

    fn visit_children(&mut self, node: &SyntaxNode) {
        for child in &node.children {
            self.visit(child);
        }
    }

    fn handle_identifier(&mut self, node: &SyntaxNode) {
        if self.stack.is_empty() {
            return;
        }

        let Some(symbol) = self.source.symbol_info(node.id).resolved() else {
            return;
        };

        if self.should_skip(symbol) {
            return;
        }

        let symbol = self.normalize(symbol);
        self.record(node, symbol, node.role);
    }

    fn handle_predefined(&mut self, node: &SyntaxNode) {
        let Some(symbol) = self.resolve_or_warn(node) else {
            return;
        };

        // `void` is a return-type keyword, not a dependency.
        if let SymbolKind::Type {
            primitive: Some(crate::source::Primitive::Void),
            ..
        } = self.source.symbol(symbol).kind
        {
            return;
        }

        self.record(node, symbol, node.role);
    }

    fn handle_creation(&mut self, node: &SyntaxNode) {
        let Some(symbol) = self.resolve_or_warn(node) else {
            return;
        };

        let resolved = match &self.source.symbol(symbol).kind {
            // `new T()` over a type parameter references nothing concrete.
            SymbolKind::TypeParameter => return,
            // A delegate-typed creation links the delegate type itself.
            SymbolKind::Type {
                kind: TypeKind::Delegate,
                ..
            } => symbol,
            SymbolKind::Method { original, .. } => {
                // Constructor of a closed generic type collapses onto the
                // open definition's constructor.
                let mut ctor = (*original).unwrap_or(symbol);
                // An implicit constructor has no declaration of its own;
                // the link goes to the declaring type.
                if self.source.symbol(ctor).implicit {
                    if let Some(ty) = self.source.symbol(ctor).containing {
                        ctor = ty;
                    }
                }
                ctor
            }
            _ => symbol,
        };

        self.record(node, resolved, UsageRole::Invocation);
    }

    /// Symbol-kind exclusions: names that resolve to something we never
    /// draw an edge to.
    fn should_skip(&self, symbol: SymbolHandle) -> bool {
        let sym = self.source.symbol(symbol);

        if sym.implicit {
            return true;
        }

        match &sym.kind {
            SymbolKind::Namespace { .. }
            | SymbolKind::TypeParameter
            | SymbolKind::Dynamic
            | SymbolKind::RangeVariable
            | SymbolKind::Local
            | SymbolKind::Parameter => return true,
            SymbolKind::Method {
                kind: MethodKind::LocalFunction,
                ..
            } => return true,
            _ => {}
        }

        // Members of anonymous types have no stable identity to link to.
        if let Some(containing) = sym.containing {
            if let SymbolKind::Type {
                anonymous: true, ..
            } = self.source.symbol(containing).kind
            {
                return true;
            }
        }

        false
    }

    /// Collapse instantiations onto their open definitions and unreduce
    /// extension-method calls.
    fn normalize(&self, symbol: SymbolHandle) -> SymbolHandle {
        match &self.source.symbol(symbol).kind {
            SymbolKind::Type {
                original: Some(original),
                ..
            } => *original,
            SymbolKind::Method {
                reduced_from: Some(reduced_from),
                ..
            } => *reduced_from,
            SymbolKind::Method {
                original: Some(original),
                ..
            }
            | SymbolKind::Property {
                original: Some(original),
                ..
            }
            | SymbolKind::Field {
                original: Some(original),
                ..
            }
            | SymbolKind::Event {
                original: Some(original),
                ..
            } => *original,
            _ => symbol,
        }
    }

    fn resolve_or_warn(&self, node: &SyntaxNode) -> Option<SymbolHandle> {
        if self.stack.is_empty() {
            tracing::warn!(
                file = %self.file,
                line = node.line,
                column = node.column,
                "symbol usage outside any declaration, skipping"
            );
            return None;
        }

        let resolved = self.source.symbol_info(node.id).resolved();
        if resolved.is_none() {
            tracing::warn!(
                file = %self.file,
                line = node.line,
                column = node.column,
                "no symbol resolution for expression, skipping"
            );
        }
        resolved
    }

    fn record(&mut self, node: &SyntaxNode, symbol: SymbolHandle, role: UsageRole) {
        let Some(enclosing) = self.stack.last() else {
            return;
        };

        let location = SourceLocation {
            path: self.file.clone(),
            line: node.line,
            column: node.column,
            kind: if self.file_is_generated {
                depgraph_core::LocationKind::Generated
            } else {
                depgraph_core::LocationKind::Local
            },
        };

        self.map.add(
            enclosing.clone(),
            PendingUse {
                project: self.project,
                symbol,
                location,
                role,
            },
        );
    }
}
