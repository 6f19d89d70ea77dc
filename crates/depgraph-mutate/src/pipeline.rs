//! Assembling the export pipeline from caller-facing options

use std::str::FromStr;

use thiserror::Error;

use crate::external::ExternalHide;
use crate::filter::{
    Filter, FilterAction, FilterMutator, RegexFilter, hide_members, hide_namespaces, hide_private,
    hide_types,
};
use crate::flatten::FlattenNamespaces;
use crate::levels::{AssemblyOnly, NamespaceOnly};
use crate::{Composite, Mutator};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid export level '{0}', expected assembly|namespace|type|public-member|all")]
    InvalidLevel(String),

    #[error("export level '{0}' is not supported in flat mode")]
    LevelUnsupportedInFlatMode(ExportLevel),

    #[error("invalid filter action '{0}', expected hide|dissolve|skip")]
    InvalidAction(String),

    #[error("invalid symbol filter '{0}', expected 'action,regex'")]
    InvalidFilter(String),

    #[error("invalid filter pattern '{pattern}'")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// How deep the exported graph goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportLevel {
    Assembly,
    Namespace,
    Type,
    PublicMember,
    All,
}

impl std::fmt::Display for ExportLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ExportLevel::Assembly => "assembly",
            ExportLevel::Namespace => "namespace",
            ExportLevel::Type => "type",
            ExportLevel::PublicMember => "public-member",
            ExportLevel::All => "all",
        };
        f.write_str(name)
    }
}

impl FromStr for ExportLevel {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "assembly" => Ok(ExportLevel::Assembly),
            "namespace" => Ok(ExportLevel::Namespace),
            "type" => Ok(ExportLevel::Type),
            "public-member" => Ok(ExportLevel::PublicMember),
            "all" => Ok(ExportLevel::All),
            other => Err(ConfigError::InvalidLevel(other.to_string())),
        }
    }
}

impl FromStr for FilterAction {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "hide" => Ok(FilterAction::Hide),
            "dissolve" => Ok(FilterAction::Dissolve),
            "skip" => Ok(FilterAction::Skip),
            other => Err(ConfigError::InvalidAction(other.to_string())),
        }
    }
}

/// One `action,regex` pair from the command line.
#[derive(Debug, Clone)]
pub struct SymbolFilter {
    pub action: FilterAction,
    pub pattern: String,
}

impl FromStr for SymbolFilter {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let Some((action, pattern)) = value.split_once(',') else {
            return Err(ConfigError::InvalidFilter(value.to_string()));
        };
        if pattern.is_empty() {
            return Err(ConfigError::InvalidFilter(value.to_string()));
        }

        Ok(SymbolFilter {
            action: action.trim().parse()?,
            pattern: pattern.to_string(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub hide_external: bool,
    pub level: ExportLevel,
    /// Level-only reduction instead of cumulative dissolve filters.
    pub flat: bool,
    pub symbol_filters: Vec<SymbolFilter>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        PipelineOptions {
            hide_external: false,
            level: ExportLevel::Assembly,
            flat: false,
            symbol_filters: Vec::new(),
        }
    }
}

/// Builds the mutator chain every renderer consumes: flatten, optional
/// external collapse, the level reduction, then the symbol filters.
pub fn export_pipeline(options: &PipelineOptions) -> Result<Composite, ConfigError> {
    let mut mutators: Vec<Box<dyn Mutator>> = vec![Box::new(FlattenNamespaces)];

    if options.hide_external {
        mutators.push(Box::new(ExternalHide::new()));
    }

    if options.flat {
        match options.level {
            ExportLevel::Assembly => mutators.push(Box::new(AssemblyOnly)),
            ExportLevel::Namespace => mutators.push(Box::new(NamespaceOnly)),
            level => return Err(ConfigError::LevelUnsupportedInFlatMode(level)),
        }
    } else {
        let level_filter = match options.level {
            ExportLevel::Assembly => Some(hide_namespaces()),
            ExportLevel::Namespace => Some(hide_types()),
            ExportLevel::Type => Some(hide_members()),
            ExportLevel::PublicMember => Some(hide_private()),
            ExportLevel::All => None,
        };
        if let Some(filter) = level_filter {
            mutators.push(Box::new(FilterMutator::single(filter)));
        }
    }

    let symbol_filters: Vec<Box<dyn Filter>> = options
        .symbol_filters
        .iter()
        .map(|sf| {
            RegexFilter::new(sf.action, &sf.pattern).map(|f| Box::new(f) as Box<dyn Filter>)
        })
        .collect::<Result<_, _>>()?;
    mutators.push(Box::new(FilterMutator::new(symbol_filters)));

    tracing::debug!(
        level = %options.level,
        flat = options.flat,
        hide_external = options.hide_external,
        filters = options.symbol_filters.len(),
        "export pipeline assembled"
    );

    Ok(Composite::new(mutators))
}
