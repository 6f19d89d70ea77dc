//! Canonical symbol identifier generation
//!
//! Ids are hierarchical strings, assembly prefix first:
//! `Vehicles.dll/Vehicles.Entities.Car.ctor()`. They are deterministic and
//! injective over distinct declarations, which is what lets identical
//! symbols from different compilation units unify onto one node.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use depgraph_core::{NodeId, SymbolHandle};

use crate::source::{MethodKind, Parameter, SemanticSource, SymbolKind};

/// Id generator for one semantic source. Memoizes by symbol handle; at
/// tens of thousands of symbols per solution the same handles come back
/// constantly during the usage pass.
pub struct SymbolIdGenerator<'s, S: SemanticSource + ?Sized> {
    source: &'s S,
    cache: RefCell<HashMap<SymbolHandle, NodeId>>,
    calls: Cell<u64>,
    cache_hits: Cell<u64>,
    chars: Cell<u64>,
}

impl<'s, S: SemanticSource + ?Sized> SymbolIdGenerator<'s, S> {
    pub fn new(source: &'s S) -> Self {
        SymbolIdGenerator {
            source,
            cache: RefCell::new(HashMap::new()),
            calls: Cell::new(0),
            cache_hits: Cell::new(0),
            chars: Cell::new(0),
        }
    }

    /// Canonical id of a symbol.
    pub fn identify(&self, symbol: SymbolHandle) -> NodeId {
        self.calls.set(self.calls.get() + 1);

        if let Some(id) = self.cache.borrow().get(&symbol) {
            self.cache_hits.set(self.cache_hits.get() + 1);
            return id.clone();
        }

        let id = NodeId::new(self.build(symbol));
        self.chars.set(self.chars.get() + id.as_str().len() as u64);
        self.cache.borrow_mut().insert(symbol, id.clone());
        id
    }

    /// Qualified display name without the assembly prefix, used for node
    /// captions and namespace merging.
    pub fn display(&self, symbol: SymbolHandle) -> String {
        let sym = self.source.symbol(symbol);
        match &sym.kind {
            SymbolKind::Assembly { .. } => format!("{}.dll", sym.name),
            SymbolKind::Module => sym.name.clone(),
            SymbolKind::Namespace { global: true } => "global::".to_string(),
            _ => self.path(symbol),
        }
    }

    pub fn log_statistics(&self) {
        tracing::debug!(
            calls = self.calls.get(),
            cache_hits = self.cache_hits.get(),
            chars = self.chars.get(),
            "id generator statistics"
        );
    }

    fn build(&self, symbol: SymbolHandle) -> String {
        let sym = self.source.symbol(symbol);
        match &sym.kind {
            SymbolKind::Assembly { .. } => format!("{}.dll", sym.name),
            SymbolKind::Module => match self.source.containing_assembly(symbol) {
                Some(assembly) if self.source.has_single_module(assembly) => self.build(assembly),
                Some(assembly) => format!("{}/{}.mdl", self.build(assembly), sym.name),
                None => format!("{}.mdl", sym.name),
            },
            // Primitives collapse onto one assembly-free id no matter which
            // reference assembly declared them.
            SymbolKind::Type {
                primitive: Some(p), ..
            } => format!("System.{}", p.keyword()),
            // Unwrap before prefixing: the underlying type decides whether
            // an assembly belongs in front.
            SymbolKind::Type {
                nullable: true,
                value_type: true,
                type_args,
                ..
            } if type_args.len() == 1 => format!("{}?", self.build(type_args[0])),
            SymbolKind::Array { element } => format!("{}[]", self.build(*element)),
            SymbolKind::Pointer { pointee } => format!("{}*", self.build(*pointee)),
            _ => {
                let path = self.path(symbol);
                match self.assembly_prefix(symbol) {
                    Some(prefix) => format!("{prefix}/{path}"),
                    // Free-floating symbol; the resolver parks it under the
                    // External sentinel.
                    None => path,
                }
            }
        }
    }

    /// `Assembly.dll` or `Assembly.dll/Module.mdl` for multi-module
    /// assemblies.
    fn assembly_prefix(&self, symbol: SymbolHandle) -> Option<String> {
        let assembly = self.source.containing_assembly(symbol)?;
        if self.source.has_single_module(assembly) {
            return Some(self.build(assembly));
        }

        let mut current = self.source.symbol(symbol).containing;
        while let Some(h) = current {
            if matches!(self.source.symbol(h).kind, SymbolKind::Module) {
                return Some(self.build(h));
            }
            current = self.source.symbol(h).containing;
        }

        Some(self.build(assembly))
    }

    /// Dot-joined path below the assembly: namespaces, containing types,
    /// then the symbol's own segment.
    fn path(&self, symbol: SymbolHandle) -> String {
        let sym = self.source.symbol(symbol);
        match &sym.kind {
            SymbolKind::Namespace { global: true } => "global::".to_string(),
            SymbolKind::Namespace { .. } => {
                format!("{}{}", self.parent_path(sym.containing), sym.name)
            }
            SymbolKind::Type { .. } | SymbolKind::Array { .. } | SymbolKind::Pointer { .. } => {
                self.type_path(symbol)
            }
            SymbolKind::TypeParameter => sym.name.clone(),
            SymbolKind::Method { .. } => self.method_path(symbol),
            SymbolKind::Property { .. } => self.property_path(symbol),
            SymbolKind::Event { .. } => self.member_path(symbol),
            SymbolKind::Field { .. } => self.member_path(symbol),
            _ => format!("{}{}", self.parent_path(sym.containing), sym.name),
        }
    }

    /// Path contribution of a containing symbol, with a trailing dot when
    /// it contributes anything. Assemblies and modules are handled by the
    /// prefix; the global namespace contributes nothing as an ancestor.
    fn parent_path(&self, containing: Option<SymbolHandle>) -> String {
        let Some(parent) = containing else {
            return String::new();
        };

        match &self.source.symbol(parent).kind {
            SymbolKind::Assembly { .. } | SymbolKind::Module => String::new(),
            SymbolKind::Namespace { global: true } => String::new(),
            _ => format!("{}.", self.path(parent)),
        }
    }

    fn type_path(&self, symbol: SymbolHandle) -> String {
        let sym = self.source.symbol(symbol);
        match &sym.kind {
            SymbolKind::Type {
                primitive: Some(p), ..
            } => format!("System.{}", p.keyword()),
            // `T?` over a value type is sugar for an instantiation around
            // the underlying type; the id unwraps to it.
            SymbolKind::Type {
                nullable: true,
                value_type: true,
                type_args,
                ..
            } if type_args.len() == 1 => format!("{}?", self.type_path(type_args[0])),
            SymbolKind::Type {
                type_args,
                nullable,
                ..
            } => {
                let mut path = format!("{}{}", self.parent_path(sym.containing), sym.name);
                if !type_args.is_empty() {
                    let args: Vec<String> =
                        type_args.iter().map(|a| self.type_path(*a)).collect();
                    path.push('<');
                    path.push_str(&args.join(","));
                    path.push('>');
                }
                if *nullable {
                    path.push('?');
                }
                path
            }
            SymbolKind::Array { element } => format!("{}[]", self.type_path(*element)),
            SymbolKind::Pointer { pointee } => format!("{}*", self.type_path(*pointee)),
            SymbolKind::TypeParameter => sym.name.clone(),
            _ => format!("{}{}", self.parent_path(sym.containing), sym.name),
        }
    }

    fn method_path(&self, symbol: SymbolHandle) -> String {
        let (prefix, effective) = self.explicit_impl_prefix(symbol);
        let sym = self.source.symbol(effective);
        let SymbolKind::Method {
            kind,
            parameters,
            type_args,
            ..
        } = &sym.kind
        else {
            return format!("{prefix}{}", sym.name);
        };

        let name = match kind {
            MethodKind::Constructor => "ctor",
            MethodKind::StaticConstructor => "cctor",
            MethodKind::Destructor => "~",
            _ => sym.name.as_str(),
        };

        let mut path = format!("{prefix}{name}");
        if !type_args.is_empty() {
            let args: Vec<String> = type_args.iter().map(|a| self.type_path(*a)).collect();
            path.push('<');
            path.push_str(&args.join(","));
            path.push('>');
        }
        path.push('(');
        path.push_str(&self.parameter_list(parameters));
        path.push(')');
        path
    }

    fn property_path(&self, symbol: SymbolHandle) -> String {
        let (prefix, effective) = self.explicit_impl_prefix(symbol);
        let sym = self.source.symbol(effective);
        let SymbolKind::Property { parameters, .. } = &sym.kind else {
            return format!("{prefix}{}", sym.name);
        };

        let mut path = format!("{prefix}{}", sym.name);
        if !parameters.is_empty() {
            path.push('[');
            path.push_str(&self.parameter_list(parameters));
            path.push(']');
        }
        path
    }

    fn member_path(&self, symbol: SymbolHandle) -> String {
        let (prefix, effective) = self.explicit_impl_prefix(symbol);
        format!("{prefix}{}", self.source.symbol(effective).name)
    }

    /// Explicit interface implementations are qualified by the implemented
    /// interface and use its member's name instead of the local one.
    fn explicit_impl_prefix(&self, symbol: SymbolHandle) -> (String, SymbolHandle) {
        let sym = self.source.symbol(symbol);
        let mut prefix = self.parent_path(sym.containing);

        let explicit = match &sym.kind {
            SymbolKind::Method { explicit_impl, .. }
            | SymbolKind::Property { explicit_impl, .. }
            | SymbolKind::Event { explicit_impl, .. } => *explicit_impl,
            _ => None,
        };

        let Some(interface_member) = explicit else {
            return (prefix, symbol);
        };

        if let Some(interface) = self.source.symbol(interface_member).containing {
            prefix.push_str(&self.type_path(interface));
            prefix.push('.');
        }

        (prefix, interface_member)
    }

    fn parameter_list(&self, parameters: &[Parameter]) -> String {
        let rendered: Vec<String> = parameters
            .iter()
            .map(|p| format!("{}{}", p.ref_kind.prefix(), self.type_path(p.ty)))
            .collect();
        rendered.join(",")
    }
}
