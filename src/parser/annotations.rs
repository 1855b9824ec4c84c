//! Keyword splitting: turns comment lines into annotations.
//!
//! A comment whose first token is a recognised keyword is cut into one
//! segment per keyword token, e.g. `@in x @as y @desc the input` yields
//! `@in x`, `@as y` and `@desc the input`. Other comments are ignored.

use super::comments::CommentLine;
use crate::error::Result;
use crate::model::{Annotations, Tag};

/// Split one comment into `(tag, segment text)` pairs.
pub fn split_keywords(text: &str) -> Vec<(Tag, String)> {
    let mut segments: Vec<(Tag, Vec<&str>)> = Vec::new();

    for token in text.split_whitespace() {
        match Tag::from_keyword(token) {
            Some(tag) => segments.push((tag, vec![token])),
            None => match segments.last_mut() {
                Some((_, tokens)) => tokens.push(token),
                // not an annotation comment
                None => return Vec::new(),
            },
        }
    }

    segments
        .into_iter()
        .map(|(tag, tokens)| (tag, tokens.join(" ")))
        .collect()
}

/// Build the annotation arena for one source from its comment lines.
pub fn parse_comments(comments: &[CommentLine], source_id: usize) -> Result<Annotations> {
    let mut arena = Annotations::new();
    for comment in comments {
        for (tag, segment) in split_keywords(&comment.text) {
            let id = arena.push(source_id, comment.line, &segment, tag)?;
            log::trace!("line {}: {} -> {:?}", comment.line, segment, id);
        }
    }
    Ok(arena)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::model::AnnotationId;

    fn comment(line: usize, text: &str) -> CommentLine {
        CommentLine {
            line,
            text: text.to_string(),
        }
    }

    #[test]
    fn split_multiple_keywords() {
        let parts = split_keywords("@out greeting @as shown @file stream:stdout @desc the   final text");
        assert_eq!(
            parts,
            vec![
                (Tag::Out, "@out greeting".to_string()),
                (Tag::As, "@as shown".to_string()),
                (Tag::File, "@file stream:stdout".to_string()),
                (Tag::Desc, "@desc the final text".to_string()),
            ]
        );
    }

    #[test]
    fn non_annotation_comment_is_ignored() {
        assert!(split_keywords("just a note about @in handling").is_empty());
        assert!(split_keywords("@author someone").is_empty());
    }

    #[test]
    fn keywords_are_case_insensitive() {
        let parts = split_keywords("@BEGIN main @Desc top level");
        assert_eq!(parts[0].0, Tag::Begin);
        assert_eq!(parts[1].0, Tag::Desc);
    }

    #[test]
    fn same_line_qualifications_attach() {
        let arena = parse_comments(&[comment(3, "@in data @as raw @uri file:{path}")], 0).unwrap();
        assert_eq!(arena.len(), 3);
        assert_eq!(arena.alias(AnnotationId(0)), Some("raw"));
        assert_eq!(arena.uri(AnnotationId(0)), Some("file:{path}"));
        assert!(arena.iter().all(|a| a.line_number == 3));
    }

    #[test]
    fn missing_value_aborts_with_line() {
        let err = parse_comments(&[comment(1, "@begin main"), comment(9, "@out")], 0).unwrap_err();
        assert!(matches!(err, Error::Markup { line: 9, .. }));
    }
}
