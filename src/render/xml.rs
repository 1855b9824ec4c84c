//! PROV-XML renderer.

use super::Renderer;
use crate::graph::{EdgeKind, GraphDocument, NodeKind};
use std::io::{self, Write};

pub struct XmlRenderer;

impl Renderer for XmlRenderer {
    fn write(&self, doc: &GraphDocument, out: &mut dyn Write) -> io::Result<()> {
        let ns = doc.namespace();
        writeln!(out, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>")?;
        writeln!(
            out,
            "<prov:document xmlns:prov=\"http://www.w3.org/ns/prov#\" \
             xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\" \
             xmlns:xsd=\"http://www.w3.org/2001/XMLSchema\" xmlns:{}=\"{}\">",
            ns.prefix,
            xml_escape(&ns.uri)
        )?;

        for node in doc.nodes() {
            let element = match node.kind {
                NodeKind::Activity => "prov:activity",
                NodeKind::Entity => "prov:entity",
            };
            if node.labels.is_empty() && node.type_tag.is_none() {
                writeln!(out, "  <{} prov:id=\"{}\"/>", element, node.id)?;
                continue;
            }
            writeln!(out, "  <{} prov:id=\"{}\">", element, node.id)?;
            for label in &node.labels {
                writeln!(out, "    <prov:label>{}</prov:label>", xml_escape(label))?;
            }
            if let Some(ref type_tag) = node.type_tag {
                writeln!(
                    out,
                    "    <prov:type xsi:type=\"xsd:string\">{}</prov:type>",
                    xml_escape(type_tag)
                )?;
            }
            writeln!(out, "  </{}>", element)?;
        }

        for edge in doc.edges() {
            // element order is fixed by the schema: activity first for
            // usage, entity first for generation
            let (element, first, second) = match edge.kind {
                EdgeKind::Used => ("prov:used", ("prov:activity", &edge.from), ("prov:entity", &edge.to)),
                EdgeKind::WasGeneratedBy => (
                    "prov:wasGeneratedBy",
                    ("prov:entity", &edge.from),
                    ("prov:activity", &edge.to),
                ),
            };
            writeln!(out, "  <{} prov:id=\"{}\">", element, edge.id)?;
            writeln!(out, "    <{} prov:ref=\"{}\"/>", first.0, first.1)?;
            writeln!(out, "    <{} prov:ref=\"{}\"/>", second.0, second.1)?;
            writeln!(out, "  </{}>", element)?;
        }

        for alt in doc.alternates() {
            writeln!(out, "  <prov:alternateOf>")?;
            writeln!(out, "    <prov:alternate1 prov:ref=\"{}\"/>", alt.alias)?;
            writeln!(out, "    <prov:alternate2 prov:ref=\"{}\"/>", alt.primary)?;
            writeln!(out, "  </prov:alternateOf>")?;
        }

        writeln!(out, "</prov:document>")
    }

    fn file_extension(&self) -> &str {
        "xml"
    }
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract;
    use crate::graph::Namespace;
    use crate::parser::Language;

    #[test]
    fn escapes_text() {
        assert_eq!(xml_escape("a<b & \"c\""), "a&lt;b &amp; &quot;c&quot;");
    }

    #[test]
    fn writes_elements_and_relations() {
        let src = "# @begin main @desc rows < 10\n# @in x @as y\n# @call f\n# @end main\n";
        let xml = XmlRenderer.render(&extract(src, Language::Python, Namespace::default()).unwrap()).unwrap();
        assert!(xml.contains("xmlns:yw=\"http://yesworkflow.org/0000/\">"));
        assert!(xml.contains(
            "  <prov:activity prov:id=\"yw:main\">\n    <prov:label>rows &lt; 10</prov:label>\n  </prov:activity>\n"
        ));
        assert!(xml.contains("  <prov:entity prov:id=\"yw:x\"/>\n"));
        assert!(xml.contains("<prov:type xsi:type=\"xsd:string\">calledFunction</prov:type>"));
        assert!(xml.contains(
            "  <prov:used prov:id=\"yw:x__USE__main\">\n    <prov:activity prov:ref=\"yw:main\"/>\n    <prov:entity prov:ref=\"yw:x\"/>\n"
        ));
        assert!(xml.contains("    <prov:alternate1 prov:ref=\"yw:y\"/>\n    <prov:alternate2 prov:ref=\"yw:x\"/>\n"));
        assert!(xml.ends_with("</prov:document>\n"));
    }
}
