//! JSON-serialized semantic model
//!
//! A compilation set dumped to disk by whatever frontend analyzed the
//! source. Loading one gives the builder its semantic sources without any
//! compiler in the process.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use depgraph_core::SymbolHandle;

use crate::source::{
    Diagnostic, SemanticSource, Symbol, SymbolInfo, SymbolKind, SyntaxNodeId, SyntaxTree,
};

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("cannot read model file {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed model file")]
    Parse(#[from] serde_json::Error),

    #[error("project {project}: symbol handle {handle} is out of range")]
    InvalidHandle { project: String, handle: u32 },
}

/// One project of a serialized compilation set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectModel {
    pub name: String,
    pub path: String,
    pub assembly: SymbolHandle,
    pub symbols: Vec<Symbol>,
    #[serde(default)]
    pub syntax_trees: Vec<SyntaxTree>,
    /// Syntax node id → declared symbol.
    #[serde(default)]
    pub declarations: HashMap<u32, SymbolHandle>,
    /// Syntax node id → expression resolution.
    #[serde(default)]
    pub resolutions: HashMap<u32, SymbolInfo>,
    #[serde(default)]
    pub generated_files: HashSet<String>,
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
}

impl ProjectModel {
    /// Bounds-check every symbol handle the model refers to, so lookups
    /// after loading cannot fail.
    fn validate(&self) -> Result<(), ModelError> {
        let check = |handle: SymbolHandle| -> Result<(), ModelError> {
            if (handle.0 as usize) < self.symbols.len() {
                Ok(())
            } else {
                Err(ModelError::InvalidHandle {
                    project: self.name.clone(),
                    handle: handle.0,
                })
            }
        };

        check(self.assembly)?;

        for symbol in &self.symbols {
            for handle in symbol_handles(symbol) {
                check(handle)?;
            }
        }

        for handle in self.declarations.values() {
            check(*handle)?;
        }

        for info in self.resolutions.values() {
            if let Some(handle) = info.symbol {
                check(handle)?;
            }
            for candidate in &info.candidates {
                check(*candidate)?;
            }
        }

        Ok(())
    }
}

/// Every handle a symbol record points at.
fn symbol_handles(symbol: &Symbol) -> Vec<SymbolHandle> {
    let mut handles = Vec::new();
    handles.extend(symbol.containing);
    handles.extend(symbol.members.iter().copied());

    match &symbol.kind {
        SymbolKind::Assembly { modules } => handles.extend(modules.iter().copied()),
        SymbolKind::Type {
            type_args,
            original,
            ..
        } => {
            handles.extend(type_args.iter().copied());
            handles.extend(*original);
        }
        SymbolKind::Array { element } => handles.push(*element),
        SymbolKind::Pointer { pointee } => handles.push(*pointee),
        SymbolKind::Method {
            parameters,
            type_args,
            original,
            reduced_from,
            explicit_impl,
            ..
        } => {
            handles.extend(parameters.iter().map(|p| p.ty));
            handles.extend(type_args.iter().copied());
            handles.extend(*original);
            handles.extend(*reduced_from);
            handles.extend(*explicit_impl);
        }
        SymbolKind::Property {
            parameters,
            original,
            explicit_impl,
        } => {
            handles.extend(parameters.iter().map(|p| p.ty));
            handles.extend(*original);
            handles.extend(*explicit_impl);
        }
        SymbolKind::Field { original, .. } => handles.extend(*original),
        SymbolKind::Event {
            original,
            explicit_impl,
        } => {
            handles.extend(*original);
            handles.extend(*explicit_impl);
        }
        _ => {}
    }

    handles
}

impl SemanticSource for ProjectModel {
    fn project_name(&self) -> &str {
        &self.name
    }

    fn project_path(&self) -> &str {
        &self.path
    }

    fn assembly(&self) -> SymbolHandle {
        self.assembly
    }

    fn symbol(&self, handle: SymbolHandle) -> &Symbol {
        &self.symbols[handle.0 as usize]
    }

    fn syntax_trees(&self) -> &[SyntaxTree] {
        &self.syntax_trees
    }

    fn declared_symbol(&self, node: SyntaxNodeId) -> Option<SymbolHandle> {
        self.declarations.get(&node.0).copied()
    }

    fn symbol_info(&self, node: SyntaxNodeId) -> SymbolInfo {
        self.resolutions.get(&node.0).cloned().unwrap_or_default()
    }

    fn generated_files(&self) -> &HashSet<String> {
        &self.generated_files
    }

    fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

/// A full compilation set: every project that contributes to one graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSet {
    pub projects: Vec<ProjectModel>,
}

impl ModelSet {
    pub fn from_reader(reader: impl Read) -> Result<Self, ModelError> {
        let set: ModelSet = serde_json::from_reader(reader)?;
        for project in &set.projects {
            project.validate()?;
        }
        Ok(set)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ModelError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_reader(BufReader::new(file))
    }

    /// Trait-object view for the builder.
    pub fn sources(&self) -> Vec<&dyn SemanticSource> {
        self.projects
            .iter()
            .map(|p| p as &dyn SemanticSource)
            .collect()
    }
}
