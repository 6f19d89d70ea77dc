//! Semantic-source abstraction: the symbol and syntax model served by
//! whatever produced the compilation (loader, test fixture, …)

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use depgraph_core::{SymbolHandle, Visibility};

/// Special types that collapse onto one node regardless of which physical
/// reference assembly declared them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Primitive {
    Void,
    Object,
    Bool,
    Char,
    SByte,
    Byte,
    Short,
    UShort,
    Int,
    UInt,
    Long,
    ULong,
    Decimal,
    Float,
    Double,
    String,
    NInt,
    NUInt,
}

impl Primitive {
    /// Language keyword the identifier generator normalizes to.
    pub fn keyword(self) -> &'static str {
        match self {
            Primitive::Void => "void",
            Primitive::Object => "object",
            Primitive::Bool => "bool",
            Primitive::Char => "char",
            Primitive::SByte => "sbyte",
            Primitive::Byte => "byte",
            Primitive::Short => "short",
            Primitive::UShort => "ushort",
            Primitive::Int => "int",
            Primitive::UInt => "uint",
            Primitive::Long => "long",
            Primitive::ULong => "ulong",
            Primitive::Decimal => "decimal",
            Primitive::Float => "float",
            Primitive::Double => "double",
            Primitive::String => "string",
            Primitive::NInt => "nint",
            Primitive::NUInt => "nuint",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeKind {
    Class,
    Struct,
    Interface,
    Enum,
    Delegate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MethodKind {
    Ordinary,
    Constructor,
    StaticConstructor,
    Destructor,
    /// Property/event accessor; folded into the owning member, never a node.
    Accessor,
    LocalFunction,
}

/// Parameter passing mode, rendered as an id prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RefKind {
    #[default]
    None,
    Ref,
    Out,
    In,
}

impl RefKind {
    pub fn prefix(self) -> &'static str {
        match self {
            RefKind::None => "",
            RefKind::Ref => "ref ",
            RefKind::Out => "out ",
            RefKind::In => "in ",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    pub ty: SymbolHandle,
    #[serde(default)]
    pub ref_kind: RefKind,
}

/// Kind-specific payload of a symbol. One tagged union instead of a
/// dispatch hierarchy; every consumer is a single `match`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SymbolKind {
    Assembly {
        modules: Vec<SymbolHandle>,
    },
    Module,
    Namespace {
        global: bool,
    },
    Type {
        kind: TypeKind,
        #[serde(default)]
        primitive: Option<Primitive>,
        #[serde(default)]
        type_args: Vec<SymbolHandle>,
        /// Open definition when this symbol is a closed instantiation.
        #[serde(default)]
        original: Option<SymbolHandle>,
        #[serde(default)]
        nullable: bool,
        #[serde(default)]
        value_type: bool,
        #[serde(default)]
        anonymous: bool,
    },
    Array {
        element: SymbolHandle,
    },
    Pointer {
        pointee: SymbolHandle,
    },
    TypeParameter,
    Method {
        kind: MethodKind,
        #[serde(default)]
        parameters: Vec<Parameter>,
        #[serde(default)]
        type_args: Vec<SymbolHandle>,
        #[serde(default)]
        original: Option<SymbolHandle>,
        /// Unreduced definition behind a reduced extension-method call.
        #[serde(default)]
        reduced_from: Option<SymbolHandle>,
        /// Interface member behind an explicit interface implementation.
        #[serde(default)]
        explicit_impl: Option<SymbolHandle>,
    },
    Property {
        #[serde(default)]
        parameters: Vec<Parameter>,
        #[serde(default)]
        original: Option<SymbolHandle>,
        #[serde(default)]
        explicit_impl: Option<SymbolHandle>,
    },
    Field {
        #[serde(default)]
        constant: bool,
        #[serde(default)]
        original: Option<SymbolHandle>,
    },
    Event {
        #[serde(default)]
        original: Option<SymbolHandle>,
        #[serde(default)]
        explicit_impl: Option<SymbolHandle>,
    },
    Local,
    Parameter,
    RangeVariable,
    Dynamic,
}

/// One declaring fragment of a symbol (1-based line/column).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpan {
    pub path: String,
    pub line: u32,
    pub column: u32,
}

/// A declared or referenced symbol as the semantic source describes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    #[serde(default)]
    pub containing: Option<SymbolHandle>,
    /// Declared members, in declaration order. Drives the declaration pass.
    #[serde(default)]
    pub members: Vec<SymbolHandle>,
    #[serde(default = "default_visibility")]
    pub visibility: Visibility,
    #[serde(default)]
    pub implicit: bool,
    #[serde(default)]
    pub declarations: Vec<SourceSpan>,
}

fn default_visibility() -> Visibility {
    Visibility::Public
}

/// Key of a syntax node within one project, for symbol lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SyntaxNodeId(pub u32);

/// What the usage pass does with a syntax node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SyntaxKind {
    /// Type or member declaration; scopes the usages beneath it.
    Declaration,
    /// Simple or generic name reference.
    Identifier,
    /// Keyword reference to a special type.
    PredefinedType,
    /// `new T(...)` expression. Resolves to the selected constructor, to
    /// the created type for delegate creations, or to the type parameter
    /// for `new T()` over a generic parameter.
    ObjectCreation,
    /// Structural node, only recursed into.
    #[default]
    Other,
}

/// Syntactic position a reference appears in; classifies the link kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UsageRole {
    #[default]
    Plain,
    Invocation,
    BaseType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyntaxNode {
    pub id: SyntaxNodeId,
    #[serde(default)]
    pub kind: SyntaxKind,
    #[serde(default)]
    pub role: UsageRole,
    pub line: u32,
    pub column: u32,
    #[serde(default)]
    pub children: Vec<SyntaxNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyntaxTree {
    pub file: String,
    pub root: SyntaxNode,
}

/// Resolution of an expression: primary symbol, or candidates when the
/// source could not commit to one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SymbolInfo {
    #[serde(default)]
    pub symbol: Option<SymbolHandle>,
    #[serde(default)]
    pub candidates: Vec<SymbolHandle>,
}

impl SymbolInfo {
    /// The primary symbol, falling back to a lone candidate.
    pub fn resolved(&self) -> Option<SymbolHandle> {
        self.symbol.or_else(|| {
            if self.candidates.len() == 1 {
                Some(self.candidates[0])
            } else {
                None
            }
        })
    }
}

/// A compiler error diagnostic attached to a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub path: String,
    pub line: u32,
    pub column: u32,
    pub message: String,
}

impl Diagnostic {
    pub fn display(&self) -> String {
        format!("{}:{}:{} {}", self.path, self.line, self.column, self.message)
    }
}

/// One analyzed project as seen by the graph builder: its symbols, syntax
/// trees, and the resolution of syntax to symbols.
pub trait SemanticSource {
    fn project_name(&self) -> &str;

    /// Path of the project file; recorded as the assembly node location.
    fn project_path(&self) -> &str;

    /// The assembly produced by this project.
    fn assembly(&self) -> SymbolHandle;

    fn symbol(&self, handle: SymbolHandle) -> &Symbol;

    fn syntax_trees(&self) -> &[SyntaxTree];

    /// Symbol declared by a declaration syntax node.
    fn declared_symbol(&self, node: SyntaxNodeId) -> Option<SymbolHandle>;

    /// Resolution of an expression syntax node.
    fn symbol_info(&self, node: SyntaxNodeId) -> SymbolInfo;

    /// Files known to be source-generator output.
    fn generated_files(&self) -> &HashSet<String>;

    fn diagnostics(&self) -> &[Diagnostic];

    // ── derived queries ─────────────────────────────────

    fn is_global_namespace(&self, handle: SymbolHandle) -> bool {
        matches!(
            self.symbol(handle).kind,
            SymbolKind::Namespace { global: true }
        )
    }

    /// Nearest containing assembly, or the symbol itself for assemblies.
    fn containing_assembly(&self, handle: SymbolHandle) -> Option<SymbolHandle> {
        let mut current = Some(handle);
        while let Some(h) = current {
            if matches!(self.symbol(h).kind, SymbolKind::Assembly { .. }) {
                return Some(h);
            }
            current = self.symbol(h).containing;
        }
        None
    }

    /// True when the symbol's assembly has exactly one module (the common
    /// case, where the module is elided from identifiers).
    fn has_single_module(&self, assembly: SymbolHandle) -> bool {
        match &self.symbol(assembly).kind {
            SymbolKind::Assembly { modules } => modules.len() <= 1,
            _ => true,
        }
    }
}
