//! Programmatic semantic-source fixture for builder tests

use depgraph_core::{SymbolHandle, Visibility};

use crate::model::ProjectModel;
use crate::source::{
    MethodKind, Parameter, Primitive, RefKind, SourceSpan, Symbol, SymbolInfo, SymbolKind,
    SyntaxKind, SyntaxNode, SyntaxNodeId, SyntaxTree, TypeKind, UsageRole,
};

/// Builds a [`ProjectModel`] symbol by symbol, the way a frontend would.
pub struct SourceFixture {
    pub project: ProjectModel,
    next_syntax: u32,
}

impl SourceFixture {
    pub fn new(assembly_name: &str) -> Self {
        let mut fixture = SourceFixture {
            project: ProjectModel {
                name: assembly_name.to_string(),
                path: format!("{assembly_name}.csproj"),
                assembly: SymbolHandle(0),
                symbols: Vec::new(),
                syntax_trees: Vec::new(),
                declarations: Default::default(),
                resolutions: Default::default(),
                generated_files: Default::default(),
                diagnostics: Vec::new(),
            },
            next_syntax: 0,
        };

        let (assembly, _module, _global) = fixture.assembly_chain(assembly_name);
        fixture.project.assembly = assembly;
        fixture
    }

    /// Assembly + single module + global namespace; returns all three.
    fn assembly_chain(&mut self, name: &str) -> (SymbolHandle, SymbolHandle, SymbolHandle) {
        let assembly = self.push(Symbol {
            name: name.to_string(),
            kind: SymbolKind::Assembly { modules: vec![] },
            containing: None,
            members: vec![],
            visibility: Visibility::Public,
            implicit: false,
            declarations: vec![],
        });
        let module = self.push(Symbol {
            name: name.to_string(),
            kind: SymbolKind::Module,
            containing: Some(assembly),
            members: vec![],
            visibility: Visibility::Public,
            implicit: false,
            declarations: vec![],
        });
        let global = self.push(Symbol {
            name: String::new(),
            kind: SymbolKind::Namespace { global: true },
            containing: Some(module),
            members: vec![],
            visibility: Visibility::Public,
            implicit: true,
            declarations: vec![],
        });

        if let SymbolKind::Assembly { modules } = &mut self.project.symbols[assembly.0 as usize].kind
        {
            modules.push(module);
        }
        self.project.symbols[module.0 as usize].members.push(global);

        (assembly, module, global)
    }

    /// Second and further modules for multi-module assemblies.
    pub fn extra_module(&mut self, assembly: SymbolHandle, name: &str) -> SymbolHandle {
        let module = self.push(Symbol {
            name: name.to_string(),
            kind: SymbolKind::Module,
            containing: Some(assembly),
            members: vec![],
            visibility: Visibility::Public,
            implicit: false,
            declarations: vec![],
        });
        if let SymbolKind::Assembly { modules } = &mut self.project.symbols[assembly.0 as usize].kind
        {
            modules.push(module);
        }
        module
    }

    /// A referenced assembly outside the analyzed source, with its own
    /// module and global namespace. Returns the assembly and its global
    /// namespace.
    pub fn external_assembly(&mut self, name: &str) -> (SymbolHandle, SymbolHandle) {
        let (assembly, _, global) = self.assembly_chain(name);
        (assembly, global)
    }

    /// Global namespace of the fixture's own assembly.
    pub fn global_namespace(&self) -> SymbolHandle {
        SymbolHandle(2)
    }

    fn push(&mut self, symbol: Symbol) -> SymbolHandle {
        let handle = SymbolHandle(self.project.symbols.len() as u32);
        self.project.symbols.push(symbol);
        handle
    }

    /// Add a symbol as a member of `parent`.
    fn push_member(&mut self, parent: SymbolHandle, symbol: Symbol) -> SymbolHandle {
        let handle = self.push(symbol);
        self.project.symbols[parent.0 as usize].members.push(handle);
        handle
    }

    pub fn symbol_mut(&mut self, handle: SymbolHandle) -> &mut Symbol {
        &mut self.project.symbols[handle.0 as usize]
    }

    pub fn namespace(&mut self, parent: SymbolHandle, name: &str) -> SymbolHandle {
        self.push_member(
            parent,
            Symbol {
                name: name.to_string(),
                kind: SymbolKind::Namespace { global: false },
                containing: Some(parent),
                members: vec![],
                visibility: Visibility::Public,
                implicit: false,
                declarations: vec![],
            },
        )
    }

    pub fn type_symbol(&mut self, parent: SymbolHandle, name: &str, kind: TypeKind) -> SymbolHandle {
        self.push_member(
            parent,
            Symbol {
                name: name.to_string(),
                kind: SymbolKind::Type {
                    kind,
                    primitive: None,
                    type_args: vec![],
                    original: None,
                    nullable: false,
                    value_type: matches!(kind, TypeKind::Struct | TypeKind::Enum),
                    anonymous: false,
                },
                containing: Some(parent),
                members: vec![],
                visibility: Visibility::Public,
                implicit: false,
                declarations: vec![],
            },
        )
    }

    pub fn class(&mut self, parent: SymbolHandle, name: &str) -> SymbolHandle {
        self.type_symbol(parent, name, TypeKind::Class)
    }

    pub fn interface(&mut self, parent: SymbolHandle, name: &str) -> SymbolHandle {
        self.type_symbol(parent, name, TypeKind::Interface)
    }

    /// A primitive special type, the way a reference assembly declares it.
    pub fn primitive(&mut self, parent: Option<SymbolHandle>, p: Primitive) -> SymbolHandle {
        self.push(Symbol {
            name: p.keyword().to_string(),
            kind: SymbolKind::Type {
                kind: TypeKind::Struct,
                primitive: Some(p),
                type_args: vec![],
                original: None,
                nullable: false,
                value_type: true,
                anonymous: false,
            },
            containing: parent,
            members: vec![],
            visibility: Visibility::Public,
            implicit: false,
            declarations: vec![],
        })
    }

    pub fn method(
        &mut self,
        parent: SymbolHandle,
        name: &str,
        parameters: &[SymbolHandle],
    ) -> SymbolHandle {
        self.method_of_kind(parent, name, MethodKind::Ordinary, parameters)
    }

    pub fn ctor(&mut self, parent: SymbolHandle, parameters: &[SymbolHandle]) -> SymbolHandle {
        self.method_of_kind(parent, ".ctor", MethodKind::Constructor, parameters)
    }

    pub fn implicit_ctor(&mut self, parent: SymbolHandle) -> SymbolHandle {
        let handle = self.method_of_kind(parent, ".ctor", MethodKind::Constructor, &[]);
        self.symbol_mut(handle).implicit = true;
        handle
    }

    pub fn method_of_kind(
        &mut self,
        parent: SymbolHandle,
        name: &str,
        kind: MethodKind,
        parameters: &[SymbolHandle],
    ) -> SymbolHandle {
        let parameters = parameters
            .iter()
            .map(|ty| Parameter {
                ty: *ty,
                ref_kind: RefKind::None,
            })
            .collect();
        self.push_member(
            parent,
            Symbol {
                name: name.to_string(),
                kind: SymbolKind::Method {
                    kind,
                    parameters,
                    type_args: vec![],
                    original: None,
                    reduced_from: None,
                    explicit_impl: None,
                },
                containing: Some(parent),
                members: vec![],
                visibility: Visibility::Public,
                implicit: false,
                declarations: vec![],
            },
        )
    }

    pub fn field(&mut self, parent: SymbolHandle, name: &str) -> SymbolHandle {
        self.push_member(
            parent,
            Symbol {
                name: name.to_string(),
                kind: SymbolKind::Field {
                    constant: false,
                    original: None,
                },
                containing: Some(parent),
                members: vec![],
                visibility: Visibility::Public,
                implicit: false,
                declarations: vec![],
            },
        )
    }

    pub fn property(&mut self, parent: SymbolHandle, name: &str) -> SymbolHandle {
        self.push_member(
            parent,
            Symbol {
                name: name.to_string(),
                kind: SymbolKind::Property {
                    parameters: vec![],
                    original: None,
                    explicit_impl: None,
                },
                containing: Some(parent),
                members: vec![],
                visibility: Visibility::Public,
                implicit: false,
                declarations: vec![],
            },
        )
    }

    /// Array type over an element; not a member of anything.
    pub fn array_of(&mut self, element: SymbolHandle) -> SymbolHandle {
        let name = format!("{}[]", self.project.symbols[element.0 as usize].name);
        self.push(Symbol {
            name,
            kind: SymbolKind::Array { element },
            containing: None,
            members: vec![],
            visibility: Visibility::Public,
            implicit: false,
            declarations: vec![],
        })
    }

    pub fn pointer_to(&mut self, pointee: SymbolHandle) -> SymbolHandle {
        let name = format!("{}*", self.project.symbols[pointee.0 as usize].name);
        self.push(Symbol {
            name,
            kind: SymbolKind::Pointer { pointee },
            containing: None,
            members: vec![],
            visibility: Visibility::Public,
            implicit: false,
            declarations: vec![],
        })
    }

    /// `T?` over a value type: an instantiation around the underlying type.
    pub fn nullable_of(&mut self, underlying: SymbolHandle) -> SymbolHandle {
        let name = format!("{}?", self.project.symbols[underlying.0 as usize].name);
        self.push(Symbol {
            name,
            kind: SymbolKind::Type {
                kind: TypeKind::Struct,
                primitive: None,
                type_args: vec![underlying],
                original: None,
                nullable: true,
                value_type: true,
                anonymous: false,
            },
            containing: None,
            members: vec![],
            visibility: Visibility::Public,
            implicit: false,
            declarations: vec![],
        })
    }

    /// Type parameter of a generic declaration; never a member.
    pub fn type_param(&mut self, parent: SymbolHandle, name: &str) -> SymbolHandle {
        self.push(Symbol {
            name: name.to_string(),
            kind: SymbolKind::TypeParameter,
            containing: Some(parent),
            members: vec![],
            visibility: Visibility::Public,
            implicit: false,
            declarations: vec![],
        })
    }

    pub fn set_type_args(&mut self, handle: SymbolHandle, args: Vec<SymbolHandle>) {
        match &mut self.symbol_mut(handle).kind {
            SymbolKind::Type { type_args, .. } | SymbolKind::Method { type_args, .. } => {
                *type_args = args;
            }
            _ => panic!("symbol has no type arguments"),
        }
    }

    /// Record a declaring fragment for a symbol.
    pub fn declares(&mut self, handle: SymbolHandle, file: &str, line: u32, column: u32) {
        self.symbol_mut(handle).declarations.push(SourceSpan {
            path: file.to_string(),
            line,
            column,
        });
    }

    // ── syntax building ─────────────────────────────────

    fn next_id(&mut self) -> SyntaxNodeId {
        let id = SyntaxNodeId(self.next_syntax);
        self.next_syntax += 1;
        id
    }

    pub fn decl_node(
        &mut self,
        symbol: SymbolHandle,
        line: u32,
        column: u32,
        children: Vec<SyntaxNode>,
    ) -> SyntaxNode {
        let id = self.next_id();
        self.project.declarations.insert(id.0, symbol);
        SyntaxNode {
            id,
            kind: SyntaxKind::Declaration,
            role: UsageRole::Plain,
            line,
            column,
            children,
        }
    }

    pub fn ident(&mut self, symbol: SymbolHandle, line: u32, column: u32) -> SyntaxNode {
        self.ident_role(symbol, UsageRole::Plain, line, column)
    }

    pub fn ident_role(
        &mut self,
        symbol: SymbolHandle,
        role: UsageRole,
        line: u32,
        column: u32,
    ) -> SyntaxNode {
        let id = self.next_id();
        self.project.resolutions.insert(
            id.0,
            SymbolInfo {
                symbol: Some(symbol),
                candidates: vec![],
            },
        );
        SyntaxNode {
            id,
            kind: SyntaxKind::Identifier,
            role,
            line,
            column,
            children: vec![],
        }
    }

    /// Identifier whose resolution has candidates only.
    pub fn ident_candidates(
        &mut self,
        candidates: Vec<SymbolHandle>,
        line: u32,
        column: u32,
    ) -> SyntaxNode {
        let id = self.next_id();
        self.project.resolutions.insert(
            id.0,
            SymbolInfo {
                symbol: None,
                candidates,
            },
        );
        SyntaxNode {
            id,
            kind: SyntaxKind::Identifier,
            role: UsageRole::Plain,
            line,
            column,
            children: vec![],
        }
    }

    pub fn predefined(&mut self, symbol: SymbolHandle, line: u32, column: u32) -> SyntaxNode {
        let id = self.next_id();
        self.project.resolutions.insert(
            id.0,
            SymbolInfo {
                symbol: Some(symbol),
                candidates: vec![],
            },
        );
        SyntaxNode {
            id,
            kind: SyntaxKind::PredefinedType,
            role: UsageRole::Plain,
            line,
            column,
            children: vec![],
        }
    }

    pub fn creation(
        &mut self,
        symbol: SymbolHandle,
        line: u32,
        column: u32,
        children: Vec<SyntaxNode>,
    ) -> SyntaxNode {
        let id = self.next_id();
        self.project.resolutions.insert(
            id.0,
            SymbolInfo {
                symbol: Some(symbol),
                candidates: vec![],
            },
        );
        SyntaxNode {
            id,
            kind: SyntaxKind::ObjectCreation,
            role: UsageRole::Plain,
            line,
            column,
            children,
        }
    }

    pub fn other(&mut self, children: Vec<SyntaxNode>) -> SyntaxNode {
        SyntaxNode {
            id: self.next_id(),
            kind: SyntaxKind::Other,
            role: UsageRole::Plain,
            line: 0,
            column: 0,
            children,
        }
    }

    pub fn tree(&mut self, file: &str, root: SyntaxNode) {
        self.project.syntax_trees.push(SyntaxTree {
            file: file.to_string(),
            root,
        });
    }
}
