//! Parser module: comment scanning and annotation recognition.

pub mod annotations;
pub mod comments;

pub use comments::{CommentLine, Language};

use crate::error::Result;
use crate::model::Annotations;
use std::path::Path;

/// Parse the annotations of one source text written in `lang`.
pub fn parse_source(content: &str, lang: Language, source_id: usize) -> Result<Annotations> {
    let comments = comments::scan(content, lang);
    annotations::parse_comments(&comments, source_id)
}

/// Parse a source file, picking the comment syntax from its extension and
/// falling back to `fallback` for unknown extensions.
pub fn parse_file(path: &Path, content: &str, source_id: usize, fallback: Language) -> Result<Annotations> {
    let lang = Language::from_path(path).unwrap_or(fallback);
    log::debug!("parsing {} as {}", path.display(), lang.name());
    parse_source(content, lang, source_id)
}
