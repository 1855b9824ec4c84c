//! Annotation model: tagged annotation records, the arena that owns them,
//! and the Line/Block containers produced by the assembler.
//!
//! Qualifications (`@desc`, `@as`, `@uri`, `@file`, `@log`) never own their
//! primary annotation: they store its [`AnnotationId`], and the primary keeps
//! the ids of its qualifications. Both sides index into [`Annotations`].

use crate::error::{Error, Result};
use std::fmt;
use std::ops::Index;

/// Recognised annotation keywords, without the leading `@`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Begin,
    End,
    In,
    Out,
    Param,
    Return,
    Call,
    Desc,
    As,
    Uri,
    File,
    Log,
}

impl Tag {
    pub const ALL: [Tag; 12] = [
        Tag::Begin,
        Tag::End,
        Tag::In,
        Tag::Out,
        Tag::Param,
        Tag::Return,
        Tag::Call,
        Tag::Desc,
        Tag::As,
        Tag::Uri,
        Tag::File,
        Tag::Log,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Tag::Begin => "begin",
            Tag::End => "end",
            Tag::In => "in",
            Tag::Out => "out",
            Tag::Param => "param",
            Tag::Return => "return",
            Tag::Call => "call",
            Tag::Desc => "desc",
            Tag::As => "as",
            Tag::Uri => "uri",
            Tag::File => "file",
            Tag::Log => "log",
        }
    }

    /// Look up the tag for a keyword token such as `@BEGIN` (case-insensitive).
    pub fn from_keyword(token: &str) -> Option<Tag> {
        let name = token.strip_prefix('@')?;
        Tag::ALL
            .into_iter()
            .find(|tag| tag.name().eq_ignore_ascii_case(name))
    }

    /// Qualifications augment a preceding primary annotation instead of
    /// declaring anything themselves.
    pub fn is_qualification(self) -> bool {
        matches!(self, Tag::Desc | Tag::As | Tag::Uri | Tag::File | Tag::Log)
    }

    /// `@desc` and `@log` take the rest of the comment as their value.
    fn takes_free_text(self) -> bool {
        matches!(self, Tag::Desc | Tag::Log)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.name())
    }
}

/// Index of an annotation inside its [`Annotations`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnnotationId(pub usize);

/// Variant-specific part of an annotation. Qualification variants carry the
/// id of the primary annotation they are attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationKind {
    Begin,
    End,
    In,
    Out,
    Param,
    Return,
    Call,
    Desc { primary: AnnotationId },
    As { primary: AnnotationId },
    Uri { primary: AnnotationId },
    File { primary: AnnotationId },
    Log { primary: AnnotationId },
}

impl AnnotationKind {
    /// Kind for `tag`; qualification tags attach to `primary` and yield
    /// `None` when there is nothing to attach to.
    pub fn new(tag: Tag, primary: Option<AnnotationId>) -> Option<AnnotationKind> {
        Some(match tag {
            Tag::Begin => AnnotationKind::Begin,
            Tag::End => AnnotationKind::End,
            Tag::In => AnnotationKind::In,
            Tag::Out => AnnotationKind::Out,
            Tag::Param => AnnotationKind::Param,
            Tag::Return => AnnotationKind::Return,
            Tag::Call => AnnotationKind::Call,
            Tag::Desc => AnnotationKind::Desc { primary: primary? },
            Tag::As => AnnotationKind::As { primary: primary? },
            Tag::Uri => AnnotationKind::Uri { primary: primary? },
            Tag::File => AnnotationKind::File { primary: primary? },
            Tag::Log => AnnotationKind::Log { primary: primary? },
        })
    }

    pub fn tag(&self) -> Tag {
        match self {
            AnnotationKind::Begin => Tag::Begin,
            AnnotationKind::End => Tag::End,
            AnnotationKind::In => Tag::In,
            AnnotationKind::Out => Tag::Out,
            AnnotationKind::Param => Tag::Param,
            AnnotationKind::Return => Tag::Return,
            AnnotationKind::Call => Tag::Call,
            AnnotationKind::Desc { .. } => Tag::Desc,
            AnnotationKind::As { .. } => Tag::As,
            AnnotationKind::Uri { .. } => Tag::Uri,
            AnnotationKind::File { .. } => Tag::File,
            AnnotationKind::Log { .. } => Tag::Log,
        }
    }

    /// The annotation this qualification is attached to.
    pub fn qualified(&self) -> Option<AnnotationId> {
        match *self {
            AnnotationKind::Desc { primary }
            | AnnotationKind::As { primary }
            | AnnotationKind::Uri { primary }
            | AnnotationKind::File { primary }
            | AnnotationKind::Log { primary } => Some(primary),
            _ => None,
        }
    }

    pub fn is_qualification(&self) -> bool {
        self.qualified().is_some()
    }
}

/// Qualifications attached to a primary annotation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Qualifiers {
    pub desc: Option<AnnotationId>,
    pub alias: Option<AnnotationId>,
    /// Shared by `@uri` and `@file`.
    pub uri: Option<AnnotationId>,
    pub logs: Vec<AnnotationId>,
}

/// One recognised annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub id: AnnotationId,
    /// Index of the source file the annotation came from.
    pub source_id: usize,
    pub line_number: usize,
    /// Keyword token exactly as written, e.g. `@BEGIN`.
    pub keyword: String,
    /// Full annotation text starting with the keyword.
    pub comment: String,
    pub kind: AnnotationKind,
    value: String,
    qualifiers: Qualifiers,
}

impl Annotation {
    /// Build an annotation from its comment text.
    ///
    /// The first token must be `@` + the kind's tag (case-insensitive) and a
    /// value token must follow; only `@end` may omit its value.
    pub fn new(
        id: AnnotationId,
        source_id: usize,
        line_number: usize,
        comment: &str,
        kind: AnnotationKind,
    ) -> Result<Self> {
        let tag = kind.tag();
        let mut tokens = comment.split_whitespace();

        let keyword = tokens.next().unwrap_or_default();
        if !keyword.eq_ignore_ascii_case(&tag.to_string()) {
            return Err(Error::Markup {
                line: line_number,
                message: format!("wrong keyword for {} annotation: {:?}", tag, keyword),
            });
        }

        let value = if tag.takes_free_text() {
            tokens.collect::<Vec<_>>().join(" ")
        } else {
            tokens.next().unwrap_or_default().to_string()
        };
        if value.is_empty() && tag != Tag::End {
            return Err(Error::Markup {
                line: line_number,
                message: format!("no argument provided to {} keyword", keyword),
            });
        }

        Ok(Self {
            id,
            source_id,
            line_number,
            keyword: keyword.to_string(),
            comment: comment.trim().to_string(),
            kind,
            value,
            qualifiers: Qualifiers::default(),
        })
    }

    pub fn tag(&self) -> Tag {
        self.kind.tag()
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn qualifiers(&self) -> &Qualifiers {
        &self.qualifiers
    }

    /// Attach a qualification. `@log` accumulates; the exclusive kinds
    /// (`@desc`, `@as`, `@uri`/`@file`) keep the last one attached.
    fn qualify_with(&mut self, qualification: AnnotationId, kind: AnnotationKind) {
        match kind {
            AnnotationKind::Desc { .. } => self.qualifiers.desc = Some(qualification),
            AnnotationKind::As { .. } => self.qualifiers.alias = Some(qualification),
            AnnotationKind::Uri { .. } | AnnotationKind::File { .. } => {
                self.qualifiers.uri = Some(qualification)
            }
            AnnotationKind::Log { .. } => self.qualifiers.logs.push(qualification),
            AnnotationKind::Begin
            | AnnotationKind::End
            | AnnotationKind::In
            | AnnotationKind::Out
            | AnnotationKind::Param
            | AnnotationKind::Return
            | AnnotationKind::Call => {}
        }
    }
}

/// Arena owning every annotation of one source, in stream order.
#[derive(Debug, Default, Clone)]
pub struct Annotations {
    items: Vec<Annotation>,
    last_primary: Option<AnnotationId>,
}

impl Annotations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and append one annotation. Qualifications are linked to the
    /// most recent primary annotation in the stream.
    pub fn push(&mut self, source_id: usize, line_number: usize, comment: &str, tag: Tag) -> Result<AnnotationId> {
        let id = AnnotationId(self.items.len());

        let kind = AnnotationKind::new(tag, self.last_primary).ok_or_else(|| Error::OrphanQualification {
            line: line_number,
            keyword: tag.to_string(),
        })?;

        let annotation = Annotation::new(id, source_id, line_number, comment, kind)?;
        self.items.push(annotation);

        match kind.qualified() {
            Some(primary) => self.qualify(primary, id),
            None => self.last_primary = Some(id),
        }
        Ok(id)
    }

    /// Link `qualification` to `primary`.
    pub fn qualify(&mut self, primary: AnnotationId, qualification: AnnotationId) {
        let Some(kind) = self.items.get(qualification.0).map(|q| q.kind) else {
            return;
        };
        if let Some(target) = self.items.get_mut(primary.0) {
            target.qualify_with(qualification, kind);
        }
    }

    pub fn get(&self, id: AnnotationId) -> Option<&Annotation> {
        self.items.get(id.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The primary annotation a qualification is attached to.
    pub fn primary_of(&self, id: AnnotationId) -> Option<&Annotation> {
        self.get(id)?.kind.qualified().and_then(|p| self.get(p))
    }

    /// Attached `@desc` text, verbatim.
    pub fn description(&self, id: AnnotationId) -> Option<&str> {
        let desc = self.get(id)?.qualifiers.desc?;
        self.get(desc).map(Annotation::value)
    }

    /// Description for labels: literal `\n` sequences become a single space.
    pub fn description_clean(&self, id: AnnotationId) -> Option<String> {
        self.description(id).map(|d| d.replace("\\n", " "))
    }

    pub fn alias(&self, id: AnnotationId) -> Option<&str> {
        let alias = self.get(id)?.qualifiers.alias?;
        self.get(alias).map(Annotation::value)
    }

    pub fn uri(&self, id: AnnotationId) -> Option<&str> {
        let uri = self.get(id)?.qualifiers.uri?;
        self.get(uri).map(Annotation::value)
    }

    pub fn logs(&self, id: AnnotationId) -> impl Iterator<Item = &Annotation> {
        self.get(id)
            .map(|a| a.qualifiers.logs.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(|log| self.get(*log))
    }
}

impl Index<AnnotationId> for Annotations {
    type Output = Annotation;

    fn index(&self, id: AnnotationId) -> &Annotation {
        &self.items[id.0]
    }
}

/// Annotations sharing one source comment line, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    pub annotations: Vec<AnnotationId>,
}

impl Line {
    /// First non-qualification annotation on the line.
    pub fn primary<'a>(&self, arena: &'a Annotations) -> Option<&'a Annotation> {
        self.annotations
            .iter()
            .filter_map(|id| arena.get(*id))
            .find(|a| !a.kind.is_qualification())
    }
}

/// One task scope: the lines from a `@begin` up to the next `@begin`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Block {
    pub lines: Vec<Line>,
}

impl Block {
    /// The first `@begin` annotation in the block, if any.
    pub fn begin<'a>(&self, arena: &'a Annotations) -> Option<&'a Annotation> {
        self.annotation_ids()
            .filter_map(|id| arena.get(id))
            .find(|a| a.tag() == Tag::Begin)
    }

    pub fn last_line(&self) -> Option<&Line> {
        self.lines.last()
    }

    /// Every annotation id in source order.
    pub fn annotation_ids(&self) -> impl Iterator<Item = AnnotationId> + '_ {
        self.lines.iter().flat_map(|line| line.annotations.iter().copied())
    }
}
