//! JSON renderers.
//!
//! `json` writes PROV-JSON: one object per PROV record type, keyed by
//! qualified name. `graph-json` writes the graph document itself as
//! serialized by serde.

use super::Renderer;
use crate::graph::{EdgeKind, GraphDocument, Node, NodeKind};
use serde_json::{json, Map, Value};
use std::io::{self, Write};

pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn write(&self, doc: &GraphDocument, out: &mut dyn Write) -> io::Result<()> {
        serde_json::to_writer_pretty(&mut *out, &prov_json(doc))?;
        writeln!(out)
    }

    fn file_extension(&self) -> &str {
        "json"
    }
}

pub struct GraphJsonRenderer;

impl Renderer for GraphJsonRenderer {
    fn write(&self, doc: &GraphDocument, out: &mut dyn Write) -> io::Result<()> {
        serde_json::to_writer_pretty(&mut *out, doc)?;
        writeln!(out)
    }

    fn file_extension(&self) -> &str {
        "json"
    }
}

fn prov_json(doc: &GraphDocument) -> Value {
    let ns = doc.namespace();
    let mut root = Map::new();
    let mut prefixes = Map::new();
    prefixes.insert(ns.prefix.clone(), Value::String(ns.uri.clone()));
    root.insert("prefix".to_string(), Value::Object(prefixes));

    let mut activities = Map::new();
    let mut entities = Map::new();
    for node in doc.nodes() {
        let target = match node.kind {
            NodeKind::Activity => &mut activities,
            NodeKind::Entity => &mut entities,
        };
        target.insert(node.id.to_string(), attributes(node));
    }

    let mut used = Map::new();
    let mut generated = Map::new();
    for edge in doc.edges() {
        match edge.kind {
            EdgeKind::Used => used.insert(
                edge.id.to_string(),
                json!({ "prov:activity": edge.from.to_string(), "prov:entity": edge.to.to_string() }),
            ),
            EdgeKind::WasGeneratedBy => generated.insert(
                edge.id.to_string(),
                json!({ "prov:entity": edge.from.to_string(), "prov:activity": edge.to.to_string() }),
            ),
        };
    }

    // unkeyed relations get blank-node identifiers
    let alternates: Map<String, Value> = doc
        .alternates()
        .iter()
        .enumerate()
        .map(|(i, alt)| {
            (
                format!("_:alt{}", i + 1),
                json!({ "prov:alternate1": alt.alias.to_string(), "prov:alternate2": alt.primary.to_string() }),
            )
        })
        .collect();

    for (key, section) in [
        ("activity", activities),
        ("entity", entities),
        ("used", used),
        ("wasGeneratedBy", generated),
        ("alternateOf", alternates),
    ] {
        if !section.is_empty() {
            root.insert(key.to_string(), Value::Object(section));
        }
    }
    Value::Object(root)
}

/// A single label is a plain string; several become an array.
fn attributes(node: &Node) -> Value {
    let mut attrs = Map::new();
    match node.labels.as_slice() {
        [] => {}
        [label] => {
            attrs.insert("prov:label".to_string(), json!(label));
        }
        labels => {
            attrs.insert("prov:label".to_string(), json!(labels));
        }
    }
    if let Some(ref type_tag) = node.type_tag {
        attrs.insert("prov:type".to_string(), json!(type_tag));
    }
    Value::Object(attrs)
}
