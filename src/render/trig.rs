//! TriG renderer: the Turtle statements inside one named graph.

use super::turtle::{statements, write_prefixes};
use super::Renderer;
use crate::graph::GraphDocument;
use std::io::{self, Write};

pub struct TrigRenderer;

/// Local name of the graph holding the statements.
const GRAPH_NAME: &str = "provenance";

impl Renderer for TrigRenderer {
    fn write(&self, doc: &GraphDocument, out: &mut dyn Write) -> io::Result<()> {
        write_prefixes(doc, out)?;
        writeln!(out)?;
        writeln!(out, "{}:{} {{", doc.namespace().prefix, GRAPH_NAME)?;
        for (i, statement) in statements(doc).iter().enumerate() {
            if i > 0 {
                writeln!(out)?;
            }
            for line in statement.lines() {
                writeln!(out, "  {}", line)?;
            }
        }
        writeln!(out, "}}")
    }

    fn file_extension(&self) -> &str {
        "trig"
    }
}
