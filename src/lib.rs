//! ywprov: extract workflow provenance from annotated source comments.
//!
//! ```text
//! source ──► parser::comments::scan ──► parser::annotations ──► model::Annotations
//!                                                                      │
//!        render::Renderer ◄── graph::ProvenanceBuilder ◄── assembler::assemble
//! ```
//!
//! Annotations such as `@begin`, `@in`, `@out` and `@end` are read from the
//! comments of a script, grouped into task blocks, and turned into a
//! provenance graph of activities, entities, usage and generation edges.

pub mod assembler;
pub mod config;
pub mod error;
pub mod graph;
pub mod model;
pub mod parser;
pub mod render;

pub use error::{Error, Result};
pub use graph::{GraphDocument, Namespace};
pub use parser::Language;

/// Parse, assemble and build the provenance graph of one source text.
pub fn extract(content: &str, lang: Language, namespace: Namespace) -> Result<GraphDocument> {
    let arena = parser::parse_source(content, lang, 0)?;
    let blocks = assembler::assemble(&arena);
    graph::ProvenanceBuilder::new(&arena, namespace).build(&blocks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{EdgeKind, NodeKind};

    const GREETING: &str = "\
# @begin greet @desc say hello
# @param name
# @out message @uri file:out/{name}.txt
print('hi')
# @end greet
";

    #[test]
    fn extract_builds_graph() {
        let doc = extract(GREETING, Language::Python, Namespace::default()).unwrap();
        let greet = doc.find_node("greet").unwrap();
        assert_eq!(greet.kind, NodeKind::Activity);
        assert_eq!(greet.labels, vec!["say hello"]);
        assert_eq!(doc.find_node("message").unwrap().label(), Some("file:out/{name}.txt"));

        let kinds: Vec<_> = doc.edges().iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![EdgeKind::Used, EdgeKind::WasGeneratedBy]);
    }

    #[test]
    fn extract_reports_orphan_inputs() {
        let err = extract("# @in x\n", Language::Python, Namespace::default()).unwrap_err();
        assert!(matches!(err, Error::Structure { line: 1, .. }));
    }

    #[test]
    fn javadoc_block_opens_its_own_task() {
        let src = "\
/** @begin first */
/** @end first */
/** @begin second
 * @in x
 */
// @end second
";
        let doc = extract(src, Language::Java, Namespace::default()).unwrap();
        assert_eq!(doc.edges().len(), 1);
        assert_eq!(doc.edges()[0].id.local, "x__USE__second");
    }

    #[test]
    fn extract_without_annotations_is_empty() {
        let doc = extract("print('hi')\n", Language::Python, Namespace::default()).unwrap();
        assert!(doc.is_empty());
    }
}
