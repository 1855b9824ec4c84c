//! PROV-N renderer.

use super::{quote, Renderer};
use crate::graph::{EdgeKind, GraphDocument, Node, NodeKind};
use std::io::{self, Write};

pub struct ProvnRenderer;

impl Renderer for ProvnRenderer {
    fn write(&self, doc: &GraphDocument, out: &mut dyn Write) -> io::Result<()> {
        let ns = doc.namespace();
        writeln!(out, "document")?;
        writeln!(out, "  prefix {} <{}>", ns.prefix, ns.uri)?;
        writeln!(out)?;

        for node in doc.nodes() {
            writeln!(out, "  {}", statement(node))?;
        }
        for edge in doc.edges() {
            match edge.kind {
                EdgeKind::Used => {
                    writeln!(out, "  used({}; {}, {}, -)", edge.id, edge.from, edge.to)?
                }
                EdgeKind::WasGeneratedBy => writeln!(
                    out,
                    "  wasGeneratedBy({}; {}, {}, -)",
                    edge.id, edge.from, edge.to
                )?,
            }
        }
        for alt in doc.alternates() {
            writeln!(out, "  alternateOf({}, {})", alt.alias, alt.primary)?;
        }

        writeln!(out, "endDocument")
    }

    fn file_extension(&self) -> &str {
        "provn"
    }
}

fn statement(node: &Node) -> String {
    let mut attributes: Vec<String> = node
        .labels
        .iter()
        .map(|l| format!("prov:label={}", quote(l)))
        .collect();
    if let Some(ref type_tag) = node.type_tag {
        attributes.push(format!("prov:type={}", quote(type_tag)));
    }

    let attributes = if attributes.is_empty() {
        String::new()
    } else {
        format!("[{}]", attributes.join(", "))
    };

    match (node.kind, attributes.is_empty()) {
        (NodeKind::Activity, true) => format!("activity({})", node.id),
        (NodeKind::Activity, false) => format!("activity({}, -, -, {})", node.id, attributes),
        (NodeKind::Entity, true) => format!("entity({})", node.id),
        (NodeKind::Entity, false) => format!("entity({}, {})", node.id, attributes),
    }
}
