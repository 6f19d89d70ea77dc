//! Resolution pass: turns recorded usages into links, materializing nodes
//! for symbols that live outside the analyzed source

use depgraph_core::{
    DeclKind, EXTERNAL_NODE_ID, Link, LinkKind, NodeId, SourceLocation, SymbolHandle,
};

use crate::decl::node_decl;
use crate::ids::SymbolIdGenerator;
use crate::source::{SemanticSource, SymbolKind, UsageRole};
use crate::store::{GraphData, PendingUse};

pub(crate) struct LinkResolver<'a> {
    data: &'a mut GraphData,
    sources: &'a [&'a dyn SemanticSource],
    generators: &'a [SymbolIdGenerator<'a, dyn SemanticSource + 'a>],
}

impl<'a> LinkResolver<'a> {
    pub fn new(
        data: &'a mut GraphData,
        sources: &'a [&'a dyn SemanticSource],
        generators: &'a [SymbolIdGenerator<'a, dyn SemanticSource + 'a>],
    ) -> Self {
        LinkResolver {
            data,
            sources,
            generators,
        }
    }

    pub fn run(&mut self) {
        tracing::info!("resolving links");

        for id in self.data.ids_below_root() {
            for pending in self.data.take_pending(&id) {
                self.resolve(&id, pending);
            }
        }
    }

    fn resolve(&mut self, node_id: &NodeId, pending: PendingUse) {
        let generator = &self.generators[pending.project];
        let target_id = generator.identify(pending.symbol);

        if !self.data.contains(&target_id) {
            self.create_external(pending.project, pending.symbol, &target_id, node_id);
        }

        let kind = self.link_kind(node_id, &target_id, pending.role);
        self.data
            .links
            .push(Link::new(node_id.clone(), target_id, kind, pending.location));
    }

    fn link_kind(&self, source_id: &NodeId, target_id: &NodeId, role: UsageRole) -> LinkKind {
        match role {
            UsageRole::Invocation => LinkKind::Call,
            UsageRole::BaseType => {
                let target_is_interface = self
                    .data
                    .node(target_id)
                    .and_then(|n| n.decl.as_ref())
                    .is_some_and(|d| d.kind == DeclKind::Interface);
                let source_is_interface = self
                    .data
                    .node(source_id)
                    .and_then(|n| n.decl.as_ref())
                    .is_some_and(|d| d.kind == DeclKind::Interface);

                if target_is_interface && !source_is_interface {
                    LinkKind::Implements
                } else {
                    LinkKind::Inherits
                }
            }
            UsageRole::Plain => LinkKind::Reference,
        }
    }

    /// Materialize a node for an out-of-source symbol, inserting every
    /// missing ancestor on the way to the External sentinel.
    fn create_external(
        &mut self,
        project: usize,
        symbol: SymbolHandle,
        id: &NodeId,
        from: &NodeId,
    ) {
        let parent_id = self.external_parent(project, symbol, id, from);

        let source = self.sources[project];
        let generator = &self.generators[project];
        let decl = node_decl(source, generator, symbol);

        if self.data.add_node(&parent_id, id.clone(), Some(decl)) {
            let assembly_name = source
                .containing_assembly(symbol)
                .map(|a| source.symbol(a).name.clone())
                .unwrap_or_else(|| source.symbol(symbol).name.clone());
            self.data
                .add_location(id, SourceLocation::external(&assembly_name));
        }
    }

    fn external_parent(
        &mut self,
        project: usize,
        symbol: SymbolHandle,
        id: &NodeId,
        from: &NodeId,
    ) -> NodeId {
        let source = self.sources[project];
        let generator = &self.generators[project];
        let sym = source.symbol(symbol);

        // Primitives carry an assembly-free id; nesting them under any one
        // reference assembly would undo their unification.
        if let SymbolKind::Type {
            primitive: Some(_), ..
        } = sym.kind
        {
            return NodeId::new(EXTERNAL_NODE_ID);
        }

        let mut parent = sym.containing;

        // The global namespace never becomes a node.
        if let Some(p) = parent {
            if source.is_global_namespace(p) {
                parent = source.symbol(p).containing;
            }
        }

        // Neither does a lone module.
        if let Some(p) = parent {
            if matches!(source.symbol(p).kind, SymbolKind::Module) {
                let single = source
                    .containing_assembly(p)
                    .map(|a| source.has_single_module(a))
                    .unwrap_or(true);
                if single {
                    parent = source.symbol(p).containing;
                }
            }
        }

        let Some(parent) = parent else {
            if !matches!(sym.kind, SymbolKind::Assembly { .. }) {
                tracing::warn!(
                    symbol = %id,
                    "symbol without a resolvable parent that is not an assembly, \
                     attaching under the External sentinel"
                );
            }
            return NodeId::new(EXTERNAL_NODE_ID);
        };

        let parent_id = generator.identify(parent);

        match self.data.node(&parent_id) {
            None => {
                self.create_external(project, parent, &parent_id, from);
            }
            Some(node) => {
                if !node.is_external() && parent_id != EXTERNAL_NODE_ID {
                    tracing::warn!(
                        source_node = %from,
                        symbol = %id,
                        parent = %parent_id,
                        "external symbol resolves under a local node"
                    );
                }
            }
        }

        parent_id
    }
}
