//! Provenance graph builder.
//!
//! Walks assembled blocks in source order and turns each annotation into
//! nodes, usage/generation edges, alternates and activity log labels.

use super::document::{Alternate, Edge, EdgeKind, GraphDocument, Node};
use super::qname::{Namespace, QualifiedName};
use crate::error::{Error, Result};
use crate::model::{Annotation, AnnotationId, AnnotationKind, Annotations, Block};

/// `prov:type` of entities declared with `@call`.
pub const CALLED_FUNCTION: &str = "calledFunction";

/// What a single annotation contributes to the graph by itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provenance {
    Node(Node),
    Alternate(Alternate),
}

/// Converts assembled blocks into a [`GraphDocument`].
pub struct ProvenanceBuilder<'a> {
    arena: &'a Annotations,
    namespace: Namespace,
}

impl<'a> ProvenanceBuilder<'a> {
    pub fn new(arena: &'a Annotations, namespace: Namespace) -> Self {
        Self { arena, namespace }
    }

    /// Walk blocks, lines and annotations in source order. Merge outcomes
    /// depend on this order.
    pub fn build(&self, blocks: &[Block]) -> Result<GraphDocument> {
        let mut doc = GraphDocument::new(self.namespace.clone());
        for block in blocks {
            for id in block.annotation_ids() {
                self.add_annotation(&mut doc, block, &self.arena[id])?;
            }
        }
        log::debug!(
            "built graph: {} nodes, {} edges, {} alternates",
            doc.nodes().len(),
            doc.edges().len(),
            doc.alternates().len()
        );
        Ok(doc)
    }

    /// Node or relation declared by `annotation`, before any merging.
    pub fn provenance_info(&self, annotation: &Annotation) -> Option<Provenance> {
        let ns = &self.namespace;
        let id = annotation.id;
        match annotation.kind {
            AnnotationKind::Begin => Some(Provenance::Node(Node::activity(
                ns.qualify(annotation.value()),
                self.arena.description_clean(id),
            ))),
            AnnotationKind::In
            | AnnotationKind::Param
            | AnnotationKind::Out
            | AnnotationKind::Return => Some(Provenance::Node(Node::entity(
                ns.qualify(annotation.value()),
                self.flow_label(id),
            ))),
            AnnotationKind::Call => Some(Provenance::Node(
                Node::entity(ns.qualify(annotation.value()), self.arena.description_clean(id))
                    .with_type(CALLED_FUNCTION),
            )),
            AnnotationKind::As { primary } => Some(Provenance::Alternate(Alternate {
                alias: ns.qualify(annotation.value()),
                primary: ns.qualify(self.arena[primary].value()),
            })),
            AnnotationKind::End
            | AnnotationKind::Desc { .. }
            | AnnotationKind::Uri { .. }
            | AnnotationKind::File { .. }
            | AnnotationKind::Log { .. } => None,
        }
    }

    /// Location wins over description.
    fn flow_label(&self, id: AnnotationId) -> Option<String> {
        self.arena
            .uri(id)
            .map(str::to_string)
            .or_else(|| self.arena.description_clean(id))
    }

    fn add_annotation(&self, doc: &mut GraphDocument, block: &Block, annotation: &Annotation) -> Result<()> {
        let description = self.arena.description_clean(annotation.id);
        match self.provenance_info(annotation) {
            Some(Provenance::Node(node)) => doc.upsert_node(node, description.as_deref()),
            Some(Provenance::Alternate(alternate)) => {
                doc.ensure_node(Node::entity(alternate.alias.clone(), None));
                doc.add_alternate(alternate);
            }
            None => {}
        }

        match annotation.kind {
            AnnotationKind::In | AnnotationKind::Param => {
                self.link(doc, block, annotation, "USE", EdgeKind::Used)
            }
            AnnotationKind::Out | AnnotationKind::Return => {
                self.link(doc, block, annotation, "GEN", EdgeKind::WasGeneratedBy)
            }
            AnnotationKind::Call => self.link(doc, block, annotation, "CALL", EdgeKind::Used),
            AnnotationKind::Log { primary } => self.add_log(doc, block, annotation, primary),
            AnnotationKind::Begin
            | AnnotationKind::End
            | AnnotationKind::Desc { .. }
            | AnnotationKind::As { .. }
            | AnnotationKind::Uri { .. }
            | AnnotationKind::File { .. } => Ok(()),
        }
    }

    fn activity_of(&self, block: &Block, annotation: &Annotation) -> Result<QualifiedName> {
        block
            .begin(self.arena)
            .map(|begin| self.namespace.qualify(begin.value()))
            .ok_or_else(|| Error::Structure {
                line: annotation.line_number,
                tag: annotation.tag().name().to_string(),
                value: annotation.value().to_string(),
            })
    }

    fn link(
        &self,
        doc: &mut GraphDocument,
        block: &Block,
        annotation: &Annotation,
        relation: &str,
        kind: EdgeKind,
    ) -> Result<()> {
        let activity = self.activity_of(block, annotation)?;
        let entity = self.namespace.qualify(annotation.value());
        let id = self.namespace.relation(&entity, relation, &activity);
        let (from, to) = match kind {
            EdgeKind::Used => (activity, entity),
            EdgeKind::WasGeneratedBy => (entity, activity),
        };
        doc.put_edge(Edge { id, kind, from, to });
        Ok(())
    }

    /// Record a log message as a label of the enclosing activity, named after
    /// the alias of the logged annotation when it has one.
    fn add_log(
        &self,
        doc: &mut GraphDocument,
        block: &Block,
        annotation: &Annotation,
        primary: AnnotationId,
    ) -> Result<()> {
        let activity = self.activity_of(block, annotation)?;
        let logged = self
            .arena
            .alias(primary)
            .unwrap_or_else(|| self.arena[primary].value());
        let label = format!("log_{}: {}", logged, annotation.value());
        if !doc.label_activity(&activity, &label) {
            log::debug!("no activity {} for log label {:?}", activity, label);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::assemble;
    use crate::graph::document::NodeKind;
    use crate::model::Tag;

    fn arena(lines: &[&str]) -> Annotations {
        let mut arena = Annotations::new();
        for (i, text) in lines.iter().enumerate() {
            for (tag, segment) in crate::parser::annotations::split_keywords(text) {
                arena.push(0, i + 1, &segment, tag).unwrap();
            }
        }
        arena
    }

    fn build(lines: &[&str]) -> Result<GraphDocument> {
        let arena = arena(lines);
        let blocks = assemble(&arena);
        ProvenanceBuilder::new(&arena, Namespace::default()).build(&blocks)
    }

    fn edge_ids(doc: &GraphDocument) -> Vec<String> {
        doc.edges().iter().map(|e| e.id.local.clone()).collect()
    }

    #[test]
    fn nested_block_resolves_inner_activity() {
        let doc = build(&["@begin main", "@param x", "@begin sub", "@in y", "@end sub", "@end main"]).unwrap();
        let y_use = doc.edges().iter().find(|e| e.to.local == "y").unwrap();
        assert_eq!(y_use.from.local, "sub");
        assert_eq!(edge_ids(&doc), vec!["x__USE__main", "y__USE__sub"]);
    }

    #[test]
    fn later_description_replaces_unlabeled_node() {
        let doc = build(&["@begin main", "@in data", "@in data @desc d", "@end main"]).unwrap();
        assert_eq!(doc.find_node("data").unwrap().labels, vec!["d"]);
    }

    #[test]
    fn uri_takes_precedence_over_description() {
        let doc = build(&["@begin main", "@in z", "@as w", "@uri u", "@desc ignored", "@end main"]).unwrap();
        let z = doc.find_node("z").unwrap();
        assert_eq!(z.label(), Some("u"));
        assert_eq!(z.labels, vec!["u"]);
    }

    #[test]
    fn labeled_duplicate_absorbs_description() {
        let doc = build(&[
            "@begin a",
            "@out f @uri file:f.csv",
            "@end a",
            "@begin b",
            "@in f @uri file:f.csv @desc the f file",
            "@end b",
        ])
        .unwrap();
        assert_eq!(doc.find_node("f").unwrap().labels, vec!["file:f.csv", "the f file"]);
    }

    #[test]
    fn activity_label_cleans_newlines() {
        let doc = build(&["@begin step @desc first\\nsecond", "@end step"]).unwrap();
        let step = doc.find_node("step").unwrap();
        assert_eq!(step.kind, NodeKind::Activity);
        assert_eq!(step.labels, vec!["first second"]);
    }

    #[test]
    fn call_is_typed_entity_with_call_edge() {
        let doc = build(&["@begin main", "@call helper @desc does work", "@end main"]).unwrap();
        let helper = doc.find_node("helper").unwrap();
        assert_eq!(helper.type_tag.as_deref(), Some(CALLED_FUNCTION));
        assert_eq!(helper.label(), Some("does work"));
        let edge = &doc.edges()[0];
        assert_eq!(edge.id.local, "helper__CALL__main");
        assert_eq!(edge.kind, EdgeKind::Used);
        assert_eq!((edge.from.local.as_str(), edge.to.local.as_str()), ("main", "helper"));
    }

    #[test]
    fn log_labels_activity_with_alias() {
        let doc = build(&[
            "@begin main",
            "@out result @as final",
            "@log wrote {count} rows",
            "@out other",
            "@log done",
            "@end main",
        ])
        .unwrap();
        assert_eq!(
            doc.find_node("main").unwrap().labels,
            vec!["log_final: wrote {count} rows", "log_other: done"]
        );
    }

    #[test]
    fn flow_outside_begin_is_structure_error() {
        let err = build(&["@in stray", "@begin main", "@end main"]).unwrap_err();
        assert_eq!(
            err,
            Error::Structure {
                line: 1,
                tag: "in".to_string(),
                value: "stray".to_string()
            }
        );
    }

    #[test]
    fn call_outside_begin_is_structure_error() {
        let err = build(&["@call helper"]).unwrap_err();
        assert!(matches!(err, Error::Structure { line: 1, .. }));
    }

    #[test]
    fn two_task_workflow() {
        let doc = build(&[
            "@begin main",
            "@param p",
            "@out r @as alias",
            "@end main",
            "@begin helper",
            "@in p",
            "@out r",
            "@end helper",
        ])
        .unwrap();

        let activities: Vec<_> = doc
            .nodes()
            .iter()
            .filter(|n| n.kind == NodeKind::Activity)
            .map(|n| n.id.local.as_str())
            .collect();
        assert_eq!(activities, vec!["main", "helper"]);
        for entity in ["p", "r", "alias"] {
            assert_eq!(doc.find_node(entity).unwrap().kind, NodeKind::Entity, "{entity}");
        }

        let used = doc.edge(&doc.namespace().qualify("p__USE__main")).unwrap();
        assert_eq!((used.from.local.as_str(), used.to.local.as_str()), ("main", "p"));
        let generated = doc.edge(&doc.namespace().qualify("r__GEN__main")).unwrap();
        assert_eq!(generated.kind, EdgeKind::WasGeneratedBy);
        assert_eq!((generated.from.local.as_str(), generated.to.local.as_str()), ("r", "main"));
        assert!(doc.edge(&doc.namespace().qualify("p__USE__helper")).is_some());
        assert!(doc.edge(&doc.namespace().qualify("r__GEN__helper")).is_some());

        assert_eq!(doc.alternates().len(), 1);
        assert_eq!(doc.alternates()[0].alias.local, "alias");
        assert_eq!(doc.alternates()[0].primary.local, "r");
    }

    #[test]
    fn identifiers_are_unique_and_deterministic() {
        let lines = [
            "@begin main @desc top",
            "@in a",
            "@in a @desc first",
            "@out b",
            "@begin inner",
            "@in b @desc again",
            "@out a",
            "@end inner",
            "@end main",
        ];
        let first = build(&lines).unwrap();
        let second = build(&lines).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );

        let mut ids: Vec<_> = first.nodes().iter().map(|n| n.id.clone()).collect();
        let total = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }

    #[test]
    fn provenance_info_per_variant() {
        let arena = arena(&["@begin main", "@end main @desc closing"]);
        let builder = ProvenanceBuilder::new(&arena, Namespace::default());
        assert!(matches!(builder.provenance_info(&arena[AnnotationId(0)]), Some(Provenance::Node(_))));
        assert_eq!(arena[AnnotationId(1)].tag(), Tag::End);
        assert!(builder.provenance_info(&arena[AnnotationId(1)]).is_none());
        assert!(builder.provenance_info(&arena[AnnotationId(2)]).is_none());
    }
}
