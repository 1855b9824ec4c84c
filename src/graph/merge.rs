//! Merge policy for nodes that share an identifier.
//!
//! Per identifier the document moves through `Empty -> Unlabeled -> Labeled`.
//! An incoming node replaces whatever sits in an `Empty` or `Unlabeled`
//! slot. A `Labeled` node is never replaced: it absorbs the incoming labels
//! and the incoming annotation's description instead.

use super::document::Node;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    Empty,
    Unlabeled,
    Labeled,
}

impl SlotState {
    pub fn of(node: Option<&Node>) -> Self {
        match node {
            None => SlotState::Empty,
            Some(n) if n.has_labels() => SlotState::Labeled,
            Some(_) => SlotState::Unlabeled,
        }
    }
}

/// Combine the node stored under an identifier with a newly derived one.
///
/// `description` is the cleaned description of the annotation that
/// produced `incoming`.
pub fn merge(existing: Option<Node>, incoming: Node, description: Option<&str>) -> Node {
    match existing {
        Some(mut node) if node.has_labels() => {
            for label in &incoming.labels {
                node.add_label(label);
            }
            if let Some(desc) = description {
                node.add_label(desc);
            }
            node
        }
        _ => incoming,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::document::NodeKind;
    use crate::graph::qname::Namespace;

    fn entity(label: Option<&str>) -> Node {
        Node::entity(Namespace::default().qualify("x"), label.map(str::to_string))
    }

    #[test]
    fn states() {
        assert_eq!(SlotState::of(None), SlotState::Empty);
        assert_eq!(SlotState::of(Some(&entity(None))), SlotState::Unlabeled);
        assert_eq!(SlotState::of(Some(&entity(Some("a")))), SlotState::Labeled);
    }

    #[test]
    fn empty_slot_takes_incoming() {
        assert_eq!(merge(None, entity(None), None), entity(None));
    }

    #[test]
    fn unlabeled_is_replaced() {
        let merged = merge(Some(entity(None)), entity(Some("d")), Some("d"));
        assert_eq!(merged.labels, vec!["d"]);
    }

    #[test]
    fn unlabeled_is_replaced_even_by_other_kind() {
        let activity = Node::activity(Namespace::default().qualify("x"), Some("task".into()));
        let merged = merge(Some(entity(None)), activity, Some("task"));
        assert_eq!(merged.kind, NodeKind::Activity);
    }

    #[test]
    fn labeled_unions_without_duplicates() {
        let merged = merge(Some(entity(Some("a"))), entity(Some("b")), Some("a"));
        assert_eq!(merged.labels, vec!["a", "b"]);
    }

    #[test]
    fn labeled_gains_incoming_description() {
        let merged = merge(Some(entity(Some("file:x.csv"))), entity(Some("file:x.csv")), Some("raw data"));
        assert_eq!(merged.labels, vec!["file:x.csv", "raw data"]);
    }

    #[test]
    fn labeled_keeps_labels_when_incoming_has_none() {
        let merged = merge(Some(entity(Some("a"))), entity(None), None);
        assert_eq!(merged.labels, vec!["a"]);
    }

    #[test]
    fn labeled_keeps_kind_and_type() {
        let call = entity(Some("helper")).with_type("calledFunction");
        let merged = merge(Some(call), entity(Some("other")), None);
        assert_eq!(merged.type_tag.as_deref(), Some("calledFunction"));
        assert_eq!(merged.labels, vec!["helper", "other"]);
    }
}
