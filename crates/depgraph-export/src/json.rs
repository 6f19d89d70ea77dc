//! JSON renderer: the whole node tree plus the flat link list

use std::io::Write;

use depgraph_core::{Graph, Link, Node, SourceLocation};
use serde::Serialize;

use crate::{ExportError, caption, link_kind, location_kind, node_type};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GraphDoc<'a> {
    root: NodeDoc<'a>,
    links: Vec<LinkDoc<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NodeDoc<'a> {
    id: &'a str,
    caption: &'a str,
    #[serde(rename = "type")]
    node_type: &'static str,
    locations: Vec<LocationDoc<'a>>,
    children: Vec<NodeDoc<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LinkDoc<'a> {
    source: &'a str,
    target: &'a str,
    original_source: &'a str,
    original_target: &'a str,
    kind: &'static str,
    location: LocationDoc<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LocationDoc<'a> {
    path: &'a str,
    line: u32,
    column: u32,
    kind: &'static str,
}

/// Serializes the graph as one JSON document.
pub struct JsonExport {
    pretty: bool,
}

impl JsonExport {
    pub fn new(pretty: bool) -> Self {
        JsonExport { pretty }
    }

    pub fn run(&self, graph: &Graph, writer: impl Write) -> Result<(), ExportError> {
        tracing::debug!(nodes = graph.node_count(), links = graph.links.len(), "writing json");

        let doc = GraphDoc {
            root: node_doc(&graph.root),
            links: graph.links.iter().map(link_doc).collect(),
        };

        if self.pretty {
            serde_json::to_writer_pretty(writer, &doc)?;
        } else {
            serde_json::to_writer(writer, &doc)?;
        }
        Ok(())
    }
}

fn node_doc(node: &Node) -> NodeDoc<'_> {
    NodeDoc {
        id: node.id.as_str(),
        caption: caption(node),
        node_type: node_type(node),
        locations: node.locations.iter().map(location_doc).collect(),
        children: node.children.iter().map(|c| node_doc(c)).collect(),
    }
}

fn link_doc(link: &Link) -> LinkDoc<'_> {
    LinkDoc {
        source: link.source.as_str(),
        target: link.target.as_str(),
        original_source: link.original_source.as_str(),
        original_target: link.original_target.as_str(),
        kind: link_kind(link.kind),
        location: location_doc(&link.location),
    }
}

fn location_doc(location: &SourceLocation) -> LocationDoc<'_> {
    LocationDoc {
        path: &location.path,
        line: location.line,
        column: location.column,
        kind: location_kind(location.kind),
    }
}
