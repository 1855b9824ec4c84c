//! Graphviz DOT renderer.
//!
//! Activities are boxes, entities ellipses (called functions dashed).
//! Arrows follow PROV direction: `activity -> entity` for usage,
//! `entity -> activity` for generation, `alias -> primary` for alternates.

use super::{quote, Renderer};
use crate::graph::{EdgeKind, GraphDocument, Node, NodeKind};
use std::io::{self, Write};

pub struct DotRenderer;

const ACTIVITY_COLOR: &str = "#9FB1FC";
const ENTITY_COLOR: &str = "#FFFC87";

impl Renderer for DotRenderer {
    fn write(&self, doc: &GraphDocument, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "digraph {} {{", quote(&doc.namespace().prefix))?;
        writeln!(out, "  rankdir=BT;")?;
        writeln!(out, "  node [fontname=\"Helvetica\", fontsize=10];")?;
        writeln!(out, "  edge [fontname=\"Helvetica\", fontsize=8];")?;

        for node in doc.nodes() {
            writeln!(out, "  {} [{}];", quote(&node.id.to_string()), node_attributes(node))?;
        }

        for edge in doc.edges() {
            let label = match edge.kind {
                EdgeKind::Used => "used",
                EdgeKind::WasGeneratedBy => "wasGeneratedBy",
            };
            writeln!(
                out,
                "  {} -> {} [label={}];",
                quote(&edge.from.to_string()),
                quote(&edge.to.to_string()),
                quote(label)
            )?;
        }

        for alt in doc.alternates() {
            writeln!(
                out,
                "  {} -> {} [label=\"alternateOf\", style=dotted];",
                quote(&alt.alias.to_string()),
                quote(&alt.primary.to_string())
            )?;
        }

        writeln!(out, "}}")
    }

    fn file_extension(&self) -> &str {
        "gv"
    }
}

fn node_attributes(node: &Node) -> String {
    let mut text = node.id.local.clone();
    for label in &node.labels {
        text.push('\n');
        text.push_str(label);
    }

    let (shape, color) = match node.kind {
        NodeKind::Activity => ("box", ACTIVITY_COLOR),
        NodeKind::Entity => ("ellipse", ENTITY_COLOR),
    };
    let style = if node.type_tag.is_some() {
        "\"filled,dashed\""
    } else {
        "filled"
    };
    format!(
        "shape={}, style={}, fillcolor={}, label={}",
        shape,
        style,
        quote(color),
        quote(&text)
    )
}
