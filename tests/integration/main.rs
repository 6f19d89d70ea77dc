//! End-to-end tests: serialized model in, rendered graph out

use std::collections::HashMap;

use depgraph_build::{
    CancelFlag, Diagnostic, GraphBuilder, MethodKind, ModelSet, ProjectModel, SourceSpan, Symbol,
    SymbolInfo, SymbolKind, SyntaxKind, SyntaxNode, SyntaxNodeId, SyntaxTree, TypeKind, UsageRole,
};
use depgraph_core::{SymbolHandle, Visibility};
use depgraph_export::{DotExport, JsonExport};
use depgraph_mutate::{ExportLevel, Mutator, PipelineOptions, export_pipeline, validate_links};

fn symbol(name: &str, kind: SymbolKind, containing: Option<u32>) -> Symbol {
    Symbol {
        name: name.to_string(),
        kind,
        containing: containing.map(SymbolHandle),
        members: vec![],
        visibility: Visibility::Public,
        implicit: false,
        declarations: vec![],
    }
}

/// One project: `namespace Domain { class Order { Money Total() {
/// return new Money(); } } }` with Money declared in a referenced
/// assembly.
fn sample_project() -> ProjectModel {
    let mut symbols = vec![
        // 0-2: the App assembly chain
        symbol("App", SymbolKind::Assembly { modules: vec![SymbolHandle(1)] }, None),
        symbol("App", SymbolKind::Module, Some(0)),
        symbol("", SymbolKind::Namespace { global: true }, Some(1)),
        // 3-5: Domain.Order.Total()
        symbol("Domain", SymbolKind::Namespace { global: false }, Some(2)),
        symbol(
            "Order",
            SymbolKind::Type {
                kind: TypeKind::Class,
                primitive: None,
                type_args: vec![],
                original: None,
                nullable: false,
                value_type: false,
                anonymous: false,
            },
            Some(3),
        ),
        symbol(
            "Total",
            SymbolKind::Method {
                kind: MethodKind::Ordinary,
                parameters: vec![],
                type_args: vec![],
                original: None,
                reduced_from: None,
                explicit_impl: None,
            },
            Some(4),
        ),
        // 6-8: the referenced Std assembly chain
        symbol("Std", SymbolKind::Assembly { modules: vec![SymbolHandle(7)] }, None),
        symbol("Std", SymbolKind::Module, Some(6)),
        symbol("", SymbolKind::Namespace { global: true }, Some(7)),
        // 9-10: Money and its constructor
        symbol(
            "Money",
            SymbolKind::Type {
                kind: TypeKind::Class,
                primitive: None,
                type_args: vec![],
                original: None,
                nullable: false,
                value_type: false,
                anonymous: false,
            },
            Some(8),
        ),
        symbol(
            ".ctor",
            SymbolKind::Method {
                kind: MethodKind::Constructor,
                parameters: vec![],
                type_args: vec![],
                original: None,
                reduced_from: None,
                explicit_impl: None,
            },
            Some(9),
        ),
    ];

    symbols[2].implicit = true;
    symbols[2].members.push(SymbolHandle(3));
    symbols[3].members.push(SymbolHandle(4));
    symbols[4].members.push(SymbolHandle(5));
    symbols[4].declarations.push(SourceSpan {
        path: "order.cs".to_string(),
        line: 1,
        column: 1,
    });
    symbols[5].declarations.push(SourceSpan {
        path: "order.cs".to_string(),
        line: 2,
        column: 5,
    });
    symbols[8].implicit = true;

    let creation = SyntaxNode {
        id: SyntaxNodeId(2),
        kind: SyntaxKind::ObjectCreation,
        role: UsageRole::Plain,
        line: 3,
        column: 9,
        children: vec![],
    };
    let method_decl = SyntaxNode {
        id: SyntaxNodeId(1),
        kind: SyntaxKind::Declaration,
        role: UsageRole::Plain,
        line: 2,
        column: 5,
        children: vec![creation],
    };
    let class_decl = SyntaxNode {
        id: SyntaxNodeId(0),
        kind: SyntaxKind::Declaration,
        role: UsageRole::Plain,
        line: 1,
        column: 1,
        children: vec![method_decl],
    };

    ProjectModel {
        name: "App".to_string(),
        path: "App.csproj".to_string(),
        assembly: SymbolHandle(0),
        symbols,
        syntax_trees: vec![SyntaxTree {
            file: "order.cs".to_string(),
            root: class_decl,
        }],
        declarations: HashMap::from([(0, SymbolHandle(4)), (1, SymbolHandle(5))]),
        resolutions: HashMap::from([(
            2,
            SymbolInfo {
                symbol: Some(SymbolHandle(10)),
                candidates: vec![],
            },
        )]),
        generated_files: Default::default(),
        diagnostics: vec![],
    }
}

fn load_from_disk(project: ProjectModel) -> ModelSet {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("app.model.json");
    let json = serde_json::to_string_pretty(&ModelSet {
        projects: vec![project],
    })
    .expect("serialize model");
    std::fs::write(&path, json).expect("write model");

    ModelSet::from_path(&path).expect("load model")
}

#[test]
fn model_to_json_export() {
    let set = load_from_disk(sample_project());
    let graph = GraphBuilder::new()
        .run(&set.sources(), &CancelFlag::new())
        .expect("build");

    let pipeline = export_pipeline(&PipelineOptions {
        hide_external: false,
        level: ExportLevel::All,
        flat: false,
        symbol_filters: vec![],
    })
    .expect("pipeline");
    let exported = pipeline.run(&graph);
    validate_links(&exported).expect("no dangling endpoints");

    let mut out = Vec::new();
    JsonExport::new(false)
        .run(&exported, &mut out)
        .expect("export");
    let doc: serde_json::Value = serde_json::from_slice(&out).expect("valid json");

    let children = doc["root"]["children"].as_array().expect("root children");
    let app = children
        .iter()
        .find(|c| c["id"] == "App.dll")
        .expect("app assembly");
    assert_eq!(app["type"], "assembly");
    assert_eq!(app["children"][0]["id"], "App.dll/Domain");
    assert_eq!(app["children"][0]["children"][0]["id"], "App.dll/Domain.Order");

    let external = children
        .iter()
        .find(|c| c["id"] == "External")
        .expect("external sentinel");
    let std_assembly = external["children"]
        .as_array()
        .expect("external children")
        .iter()
        .find(|c| c["id"] == "Std.dll")
        .expect("std assembly");
    assert_eq!(std_assembly["children"][0]["id"], "Std.dll/Money");

    let links = doc["links"].as_array().expect("links");
    assert_eq!(links.len(), 1);
    assert_eq!(links[0]["source"], "App.dll/Domain.Order.Total()");
    assert_eq!(links[0]["target"], "Std.dll/Money.ctor()");
    assert_eq!(links[0]["kind"], "call");
    assert_eq!(links[0]["location"]["path"], "order.cs");
    assert_eq!(links[0]["location"]["line"], 3);
}

#[test]
fn model_to_assembly_level_dot_export() {
    let set = load_from_disk(sample_project());
    let graph = GraphBuilder::new()
        .run(&set.sources(), &CancelFlag::new())
        .expect("build");

    let pipeline = export_pipeline(&PipelineOptions {
        hide_external: false,
        level: ExportLevel::Assembly,
        flat: false,
        symbol_filters: vec![],
    })
    .expect("pipeline");
    let exported = pipeline.run(&graph);

    let mut out = Vec::new();
    DotExport.run(&exported, &mut out).expect("export");
    let text = String::from_utf8(out).expect("utf8");

    assert!(text.contains("\"App.dll\""));
    assert!(text.contains("\"Std.dll\""));
    assert!(text.contains("\"App.dll\" -> \"Std.dll\";"));
}

#[test]
fn hide_external_rewires_onto_the_sentinel() {
    let set = load_from_disk(sample_project());
    let graph = GraphBuilder::new()
        .run(&set.sources(), &CancelFlag::new())
        .expect("build");

    let pipeline = export_pipeline(&PipelineOptions {
        hide_external: true,
        level: ExportLevel::All,
        flat: false,
        symbol_filters: vec![],
    })
    .expect("pipeline");
    let exported = pipeline.run(&graph);

    let external = exported.external().expect("sentinel kept");
    assert!(external.children.is_empty());

    assert_eq!(exported.links.len(), 1);
    let link = &exported.links[0];
    assert_eq!(link.target, "External");
    assert_eq!(link.original_target, "Std.dll/Money.ctor()");
}

#[test]
fn compiler_errors_fail_the_whole_build() {
    let mut project = sample_project();
    project.diagnostics.push(Diagnostic {
        path: "order.cs".to_string(),
        line: 3,
        column: 9,
        message: "cannot convert".to_string(),
    });

    let set = load_from_disk(project);
    let result = GraphBuilder::new().run(&set.sources(), &CancelFlag::new());
    assert!(result.is_err());
}
