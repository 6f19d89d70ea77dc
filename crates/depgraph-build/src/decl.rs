//! Declaration pass: walks the declared-symbol tree and grows the node store

use depgraph_core::{DeclKind, NodeDecl, NodeId, ROOT_NODE_ID, SourceLocation, SymbolHandle};

use crate::ids::SymbolIdGenerator;
use crate::source::{MethodKind, SemanticSource, SymbolKind, TypeKind};
use crate::store::{GraphData, LinkedSymbolsMap};

/// Distill the parts of a symbol that mutators and renderers match on.
pub(crate) fn node_decl<S: SemanticSource + ?Sized>(
    source: &S,
    ids: &SymbolIdGenerator<'_, S>,
    handle: SymbolHandle,
) -> NodeDecl {
    let sym = source.symbol(handle);
    let kind = match &sym.kind {
        SymbolKind::Assembly { .. } => DeclKind::Assembly,
        SymbolKind::Module => DeclKind::Module,
        SymbolKind::Namespace { .. } => DeclKind::Namespace,
        SymbolKind::Type { kind, .. } => match kind {
            TypeKind::Class => DeclKind::Class,
            TypeKind::Struct => DeclKind::Struct,
            TypeKind::Interface => DeclKind::Interface,
            TypeKind::Enum => DeclKind::Enum,
            TypeKind::Delegate => DeclKind::Delegate,
        },
        SymbolKind::Method { .. } => DeclKind::Method,
        SymbolKind::Property { .. } => DeclKind::Property,
        SymbolKind::Field { constant: true, .. } => DeclKind::Const,
        SymbolKind::Field { .. } => DeclKind::Field,
        SymbolKind::Event { .. } => DeclKind::Event,
        _ => DeclKind::Other,
    };

    NodeDecl {
        symbol: handle,
        kind,
        name: sym.name.clone(),
        display: ids.display(handle),
        visibility: sym.visibility,
    }
}

/// Depth-first traversal over assembly → module(s) → namespaces → types →
/// members, creating one node per visible declaration.
pub(crate) struct DeclarationVisitor<'a, S: SemanticSource + ?Sized> {
    source: &'a S,
    ids: &'a SymbolIdGenerator<'a, S>,
    data: &'a mut GraphData,
    pending: &'a mut LinkedSymbolsMap,
    stack: Vec<NodeId>,
}

impl<'a, S: SemanticSource + ?Sized> DeclarationVisitor<'a, S> {
    pub fn new(
        source: &'a S,
        ids: &'a SymbolIdGenerator<'a, S>,
        data: &'a mut GraphData,
        pending: &'a mut LinkedSymbolsMap,
    ) -> Self {
        DeclarationVisitor {
            source,
            ids,
            data,
            pending,
            stack: vec![NodeId::new(ROOT_NODE_ID)],
        }
    }

    pub fn run(&mut self) {
        self.visit(self.source.assembly());
    }

    fn visit(&mut self, handle: SymbolHandle) {
        let sym = self.source.symbol(handle);

        // Implicit declarations never become nodes; the global namespace is
        // the one implicit container we still have to walk through.
        if sym.implicit && !self.source.is_global_namespace(handle) {
            return;
        }

        match &sym.kind {
            SymbolKind::Assembly { modules } => {
                let modules = modules.clone();
                let multi_module = modules.len() > 1;

                self.push(handle);
                for module in modules {
                    let members = self.source.symbol(module).members.clone();
                    if multi_module {
                        self.push(module);
                    }
                    for member in members {
                        self.visit(member);
                    }
                    if multi_module {
                        self.pop();
                    }
                }
                self.pop();
            }
            SymbolKind::Namespace { global } => {
                let visible = !global;
                let members = sym.members.clone();
                if visible {
                    self.push(handle);
                }
                for member in members {
                    self.visit(member);
                }
                if visible {
                    self.pop();
                }
            }
            SymbolKind::Type { .. } => {
                let members = sym.members.clone();
                self.push(handle);
                for member in members {
                    self.visit(member);
                }
                self.pop();
            }
            // Accessors fold into the property/event that owns them.
            SymbolKind::Method {
                kind: MethodKind::Accessor,
                ..
            } => {}
            SymbolKind::Method { .. }
            | SymbolKind::Property { .. }
            | SymbolKind::Field { .. }
            | SymbolKind::Event { .. } => {
                self.push(handle);
                self.pop();
            }
            _ => {}
        }
    }

    fn push(&mut self, handle: SymbolHandle) {
        let id = self.ids.identify(handle);
        let parent = self
            .stack
            .last()
            .expect("declaration stack starts at Root and is never drained")
            .clone();

        let decl = node_decl(self.source, self.ids, handle);
        if self.data.add_node(&parent, id.clone(), Some(decl)) {
            self.add_locations(&id, handle);
            let uses = self.pending.take(&id);
            self.data.add_pending(&id, uses);
        }

        self.stack.push(id);
    }

    fn pop(&mut self) {
        self.stack.pop();
    }

    fn add_locations(&mut self, id: &NodeId, handle: SymbolHandle) {
        let sym = self.source.symbol(handle);

        if matches!(sym.kind, SymbolKind::Assembly { .. }) {
            self.data.add_location(
                id,
                SourceLocation::local(self.source.project_path(), 0, 0),
            );
            return;
        }

        // One record per partial-declaration fragment.
        for span in sym.declarations.clone() {
            let location = if self.source.generated_files().contains(&span.path) {
                SourceLocation::generated(span.path, span.line, span.column)
            } else {
                SourceLocation::local(span.path, span.line, span.column)
            };
            self.data.add_location(id, location);
        }
    }
}
