//! Output formats for provenance graphs, selected by name.

pub mod dot;
pub mod json;
pub mod provn;
pub mod trig;
pub mod turtle;
pub mod xml;

use crate::graph::GraphDocument;
use anyhow::{anyhow, Result};
use std::io::{self, Write};

/// Writes a [`GraphDocument`] in one concrete output format.
pub trait Renderer {
    fn write(&self, doc: &GraphDocument, out: &mut dyn Write) -> io::Result<()>;

    fn file_extension(&self) -> &str;

    /// Render into a string. Nothing is returned when writing fails.
    fn render(&self, doc: &GraphDocument) -> io::Result<String> {
        let mut buf = Vec::new();
        self.write(doc, &mut buf)?;
        String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

pub const FORMATS: &[&str] = &["dot", "provn", "turtle", "trig", "xml", "json", "graph-json"];

/// Create a renderer for the given format name.
pub fn create_renderer(format: &str) -> Result<Box<dyn Renderer>> {
    match format.to_ascii_lowercase().as_str() {
        "dot" | "gv" => Ok(Box::new(dot::DotRenderer)),
        "provn" | "pn" => Ok(Box::new(provn::ProvnRenderer)),
        "turtle" | "ttl" => Ok(Box::new(turtle::TurtleRenderer)),
        "trig" => Ok(Box::new(trig::TrigRenderer)),
        "xml" | "provx" => Ok(Box::new(xml::XmlRenderer)),
        "json" => Ok(Box::new(json::JsonRenderer)),
        "graph-json" => Ok(Box::new(json::GraphJsonRenderer)),
        _ => Err(anyhow!(
            "unknown format: {}. Use {}",
            format,
            FORMATS.join(", ")
        )),
    }
}

/// Escape a value for a double-quoted string literal.
pub(crate) fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_formats() {
        for format in FORMATS {
            assert!(create_renderer(format).is_ok(), "{format}");
        }
        assert_eq!(create_renderer("TTL").unwrap().file_extension(), "ttl");
        assert_eq!(create_renderer("trig").unwrap().file_extension(), "trig");
        assert_eq!(create_renderer("xml").unwrap().file_extension(), "xml");
        assert_eq!(create_renderer("graph-json").unwrap().file_extension(), "json");
    }

    #[test]
    fn unknown_format() {
        let err = create_renderer("png").err().unwrap();
        assert!(err.to_string().contains("unknown format: png"));
    }

    struct Failing;

    impl Renderer for Failing {
        fn write(&self, _doc: &GraphDocument, out: &mut dyn Write) -> io::Result<()> {
            writeln!(out, "half")?;
            Err(io::Error::new(io::ErrorKind::Other, "broken"))
        }

        fn file_extension(&self) -> &str {
            "x"
        }
    }

    #[test]
    fn failed_write_returns_no_partial_text() {
        let doc = GraphDocument::new(crate::graph::Namespace::default());
        let err = Failing.render(&doc).unwrap_err();
        assert_eq!(err.to_string(), "broken");
    }

    #[test]
    fn quote_escapes() {
        assert_eq!(quote(r#"say "hi"\now"#), r#""say \"hi\"\\now""#);
    }
}
