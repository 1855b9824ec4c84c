//! Block assembler: recovers task scopes from the flat annotation stream.
//!
//! Every `@begin` opens a new [`Block`]; other primaries open a new
//! [`Line`] in the current block; qualifications join the current line.
//! Blocks are kept as a flat list in stream order. Nesting is implied by
//! position: an annotation belongs to the block of the nearest preceding
//! `@begin`.

use crate::model::{AnnotationId, AnnotationKind, Annotations, Block, Line};
use std::fmt::Write;

/// Where the next annotation goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Destination {
    /// First element of the first line of a new block.
    Block,
    /// First element of a new last line of the last block.
    Line,
    /// Last element of the last line of the last block.
    Append,
    /// Dropped.
    Skip,
}

pub struct BlockAssembler<'a> {
    arena: &'a Annotations,
    blocks: Vec<Block>,
    last_was_end: bool,
}

impl<'a> BlockAssembler<'a> {
    pub fn new(arena: &'a Annotations) -> Self {
        Self {
            arena,
            blocks: Vec::new(),
            last_was_end: false,
        }
    }

    pub fn add(&mut self, id: AnnotationId) {
        let Some(annotation) = self.arena.get(id) else {
            return;
        };
        let destination = self.destination(annotation.kind);
        log::trace!(
            "line {}: {} {} -> {:?}",
            annotation.line_number,
            annotation.tag(),
            annotation.value(),
            destination
        );
        self.place(destination, id);

        // qualifications between two @end lines do not separate them
        if !annotation.kind.is_qualification() {
            self.last_was_end = annotation.kind == AnnotationKind::End;
        }
    }

    fn destination(&self, kind: AnnotationKind) -> Destination {
        if self.blocks.is_empty() {
            return Destination::Block;
        }
        match kind {
            AnnotationKind::Desc { .. }
            | AnnotationKind::As { .. }
            | AnnotationKind::Uri { .. }
            | AnnotationKind::File { .. }
            | AnnotationKind::Log { .. } => Destination::Append,
            AnnotationKind::Begin => Destination::Block,
            AnnotationKind::End if self.last_was_end => Destination::Skip,
            AnnotationKind::End
            | AnnotationKind::In
            | AnnotationKind::Out
            | AnnotationKind::Param
            | AnnotationKind::Return
            | AnnotationKind::Call => Destination::Line,
        }
    }

    fn place(&mut self, destination: Destination, id: AnnotationId) {
        match destination {
            Destination::Block => self.blocks.push(Block {
                lines: vec![Line {
                    annotations: vec![id],
                }],
            }),
            Destination::Line => {
                if let Some(block) = self.blocks.last_mut() {
                    block.lines.push(Line {
                        annotations: vec![id],
                    });
                }
            }
            Destination::Append => {
                if let Some(line) = self.blocks.last_mut().and_then(|b| b.lines.last_mut()) {
                    line.annotations.push(id);
                }
            }
            Destination::Skip => {}
        }
    }

    pub fn finish(self) -> Vec<Block> {
        log::debug!(
            "assembled {} annotations into {} blocks",
            self.arena.len(),
            self.blocks.len()
        );
        self.blocks
    }
}

/// Assemble every annotation of `arena`, in stream order.
pub fn assemble(arena: &Annotations) -> Vec<Block> {
    let mut assembler = BlockAssembler::new(arena);
    for annotation in arena.iter() {
        assembler.add(annotation.id);
    }
    assembler.finish()
}

/// Human-readable dump of the block structure, one line per annotation line.
pub fn describe(blocks: &[Block], arena: &Annotations) -> String {
    let mut out = String::new();
    for (i, block) in blocks.iter().enumerate() {
        let name = block.begin(arena).map(|b| b.value()).unwrap_or("<top level>");
        let _ = writeln!(out, "block {}: {}", i + 1, name);
        for line in &block.lines {
            let parts: Vec<String> = line
                .annotations
                .iter()
                .filter_map(|id| arena.get(*id))
                .map(|a| format!("{} {}", a.tag(), a.value()).trim_end().to_string())
                .collect();
            let line_number = line
                .annotations
                .first()
                .and_then(|id| arena.get(*id))
                .map_or(0, |a| a.line_number);
            let _ = writeln!(out, "  {:>4}: {}", line_number, parts.join(" "));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Tag;

    fn arena(lines: &[&str]) -> Annotations {
        let mut arena = Annotations::new();
        for (i, text) in lines.iter().enumerate() {
            let tag = Tag::from_keyword(text.split_whitespace().next().unwrap()).unwrap();
            arena.push(0, i + 1, text, tag).unwrap();
        }
        arena
    }

    fn values(block: &Block, arena: &Annotations) -> Vec<String> {
        block
            .annotation_ids()
            .map(|id| format!("{} {}", arena[id].tag(), arena[id].value()).trim_end().to_string())
            .collect()
    }

    #[test]
    fn nested_begin_opens_new_block() {
        let arena = arena(&["@begin main", "@param x", "@begin sub", "@in y", "@end sub", "@end main"]);
        let blocks = assemble(&arena);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].begin(&arena).unwrap().value(), "main");
        assert_eq!(blocks[1].begin(&arena).unwrap().value(), "sub");
        assert_eq!(values(&blocks[1], &arena), vec!["@begin sub", "@in y", "@end sub"]);
    }

    #[test]
    fn consecutive_ends_collapse() {
        let arena = arena(&["@begin main", "@begin sub", "@end sub", "@end main", "@begin next"]);
        let blocks = assemble(&arena);
        assert_eq!(blocks.len(), 3);
        let ends = blocks[1]
            .annotation_ids()
            .filter(|id| arena[*id].tag() == Tag::End)
            .count();
        assert_eq!(ends, 1);
        assert_eq!(blocks[1].lines.len(), 2);
    }

    #[test]
    fn qualification_between_ends_does_not_reset() {
        let arena = arena(&["@begin main", "@end main", "@desc closing", "@end main"]);
        let blocks = assemble(&arena);
        assert_eq!(blocks[0].lines.len(), 2);
        assert_eq!(blocks[0].lines[1].annotations.len(), 2);
    }

    #[test]
    fn end_after_other_annotation_is_kept() {
        let arena = arena(&["@begin a", "@end a", "@in x", "@end b"]);
        let blocks = assemble(&arena);
        assert_eq!(blocks[0].lines.len(), 4);
    }

    #[test]
    fn qualifications_append_to_last_line() {
        let arena = arena(&["@begin main", "@in z", "@as w", "@uri u"]);
        let blocks = assemble(&arena);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].lines.len(), 2);
        assert_eq!(values(&blocks[0], &arena)[1..], ["@in z", "@as w", "@uri u"]);
    }

    #[test]
    fn first_annotation_always_starts_a_block() {
        let arena = arena(&["@in orphan", "@out other", "@begin main"]);
        let blocks = assemble(&arena);
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].begin(&arena).is_none());
        assert_eq!(blocks[0].lines.len(), 2);
    }

    #[test]
    fn empty_stream_has_no_blocks() {
        assert!(assemble(&Annotations::new()).is_empty());
    }

    #[test]
    fn describe_lists_blocks() {
        let arena = arena(&["@begin main", "@in x", "@end"]);
        let text = describe(&assemble(&arena), &arena);
        assert_eq!(text, "block 1: main\n     1: @begin main\n     2: @in x\n     3: @end\n");
    }
}
