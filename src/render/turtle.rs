//! PROV-O Turtle renderer.
//!
//! Usage and generation edges are written both as the direct
//! `prov:used`/`prov:wasGeneratedBy` triples and as qualified
//! `prov:Usage`/`prov:Generation` resources named by the edge identifier.

use super::{quote, Renderer};
use crate::graph::{EdgeKind, GraphDocument, NodeKind};
use std::io::{self, Write};

pub struct TurtleRenderer;

const PROV: &str = "http://www.w3.org/ns/prov#";
const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";

impl Renderer for TurtleRenderer {
    fn write(&self, doc: &GraphDocument, out: &mut dyn Write) -> io::Result<()> {
        write_prefixes(doc, out)?;
        for statement in statements(doc) {
            writeln!(out)?;
            writeln!(out, "{}", statement)?;
        }
        Ok(())
    }

    fn file_extension(&self) -> &str {
        "ttl"
    }
}

pub(crate) fn write_prefixes(doc: &GraphDocument, out: &mut dyn Write) -> io::Result<()> {
    let ns = doc.namespace();
    writeln!(out, "@prefix prov: <{}> .", PROV)?;
    writeln!(out, "@prefix rdfs: <{}> .", RDFS)?;
    writeln!(out, "@prefix {}: <{}> .", ns.prefix, ns.uri)
}

/// Turtle statements of the document, one per subject group. Continuation
/// lines are indented by four spaces.
pub(crate) fn statements(doc: &GraphDocument) -> Vec<String> {
    let mut statements = Vec::new();

    for node in doc.nodes() {
        let class = match node.kind {
            NodeKind::Activity => "prov:Activity",
            NodeKind::Entity => "prov:Entity",
        };
        let mut predicates = vec![format!("a {}", class)];
        predicates.extend(node.labels.iter().map(|l| format!("rdfs:label {}", quote(l))));
        if let Some(ref type_tag) = node.type_tag {
            predicates.push(format!("prov:type {}", quote(type_tag)));
        }
        statements.push(format!("{} {} .", node.id, predicates.join(" ;\n    ")));
    }

    for edge in doc.edges() {
        statements.push(match edge.kind {
            EdgeKind::Used => format!(
                "{} prov:used {} ;\n    prov:qualifiedUsage {} .\n{} a prov:Usage ;\n    prov:entity {} .",
                edge.from, edge.to, edge.id, edge.id, edge.to
            ),
            EdgeKind::WasGeneratedBy => format!(
                "{} prov:wasGeneratedBy {} ;\n    prov:qualifiedGeneration {} .\n{} a prov:Generation ;\n    prov:activity {} .",
                edge.from, edge.to, edge.id, edge.id, edge.to
            ),
        });
    }

    if !doc.alternates().is_empty() {
        let alternates: Vec<String> = doc
            .alternates()
            .iter()
            .map(|alt| format!("{} prov:alternateOf {} .", alt.alias, alt.primary))
            .collect();
        statements.push(alternates.join("\n"));
    }

    statements
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract;
    use crate::graph::Namespace;
    use crate::parser::Language;

    #[test]
    fn writes_classes_labels_and_relations() {
        let src = "# @begin main @desc top\n# @in x @as y\n# @end main\n";
        let doc = extract(src, Language::Python, Namespace::new("ex", "http://example.org/")).unwrap();
        let ttl = TurtleRenderer.render(&doc).unwrap();
        assert!(ttl.contains("@prefix ex: <http://example.org/> ."));
        assert!(ttl.contains("ex:main a prov:Activity ;\n    rdfs:label \"top\" ."));
        assert!(ttl.contains("ex:x a prov:Entity ."));
        assert!(ttl.contains("ex:main prov:used ex:x ;\n    prov:qualifiedUsage ex:x__USE__main ."));
        assert!(ttl.contains("ex:x__USE__main a prov:Usage ;\n    prov:entity ex:x ."));
        assert!(ttl.contains("\n\nex:y prov:alternateOf ex:x .\n"));
    }
}
