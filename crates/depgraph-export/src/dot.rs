//! Graphviz DOT renderer
//!
//! Renders the top level of the (already reduced) graph: root children,
//! plus the assemblies under the External sentinel. Finer nodes are
//! expected to have been collapsed by the export pipeline.

use std::collections::HashSet;
use std::io::Write;

use depgraph_core::{Graph, Node};

use crate::{ExportError, caption, color};

pub struct DotExport;

impl DotExport {
    pub fn run(&self, graph: &Graph, mut writer: impl Write) -> Result<(), ExportError> {
        tracing::debug!(links = graph.links.len(), "writing dot");

        writeln!(writer, "digraph depgraph {{")?;

        let mut emitted = HashSet::new();
        for node in graph
            .root
            .children
            .iter()
            .filter(|n| n.id != depgraph_core::EXTERNAL_NODE_ID)
        {
            self.write_node(&mut writer, node, &mut emitted)?;
        }
        if let Some(external) = graph.external() {
            for node in &external.children {
                self.write_node(&mut writer, node, &mut emitted)?;
            }
        }

        let mut seen = HashSet::new();
        for link in &graph.links {
            if link.source == link.target {
                continue;
            }
            if !emitted.contains(link.source.as_str()) || !emitted.contains(link.target.as_str()) {
                continue;
            }
            // One edge per node pair, however many usages back it.
            if !seen.insert((link.source.clone(), link.target.clone())) {
                continue;
            }

            writeln!(
                writer,
                "    \"{}\" -> \"{}\";",
                escape(link.source.as_str()),
                escape(link.target.as_str())
            )?;
        }

        writeln!(writer, "}}")?;
        Ok(())
    }

    fn write_node(
        &self,
        writer: &mut impl Write,
        node: &Node,
        emitted: &mut HashSet<String>,
    ) -> Result<(), ExportError> {
        emitted.insert(node.id.as_str().to_string());

        writeln!(
            writer,
            "    \"{}\" [label=\"{}\", shape=box, style=filled, color=\"{}\", fillcolor=\"{}\", fontcolor=\"#ffffff\"];",
            escape(node.id.as_str()),
            escape(caption(node)),
            color(node),
            color(node)
        )?;
        Ok(())
    }
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
