//! Comment scanner: isolates comment text from source code.
//!
//! Produces one [`CommentLine`] per physical comment line. Block comments
//! spanning several lines yield one entry per inner line with the usual
//! `*` decoration removed. Doubled or doc-style markers (`##`, `///`, `//!`,
//! `/**`, `%%`, `#'`) are stripped like plain ones. String literals are not tracked, so a comment
//! marker inside a string produces a comment that simply never starts with
//! an annotation keyword.

use anyhow::{anyhow, Result};
use regex::Regex;
use std::path::Path;
use std::str::FromStr;
use std::sync::LazyLock;

static RE_BLOCK_DECORATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[[:space:]]*[*!]+(?:[[:space:]]|$)").unwrap());

/// Source languages with known comment syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Python,
    Bash,
    R,
    Rust,
    C,
    Cpp,
    Java,
    JavaScript,
    Go,
    Matlab,
    Sql,
}

struct CommentSyntax {
    line: &'static [&'static str],
    block: Option<(&'static str, &'static str)>,
}

impl Language {
    pub const ALL: [Language; 11] = [
        Language::Python,
        Language::Bash,
        Language::R,
        Language::Rust,
        Language::C,
        Language::Cpp,
        Language::Java,
        Language::JavaScript,
        Language::Go,
        Language::Matlab,
        Language::Sql,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::Bash => "bash",
            Language::R => "r",
            Language::Rust => "rust",
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::Java => "java",
            Language::JavaScript => "javascript",
            Language::Go => "go",
            Language::Matlab => "matlab",
            Language::Sql => "sql",
        }
    }

    fn extensions(self) -> &'static [&'static str] {
        match self {
            Language::Python => &["py"],
            Language::Bash => &["sh", "bash"],
            Language::R => &["r", "R"],
            Language::Rust => &["rs"],
            Language::C => &["c", "h"],
            Language::Cpp => &["cpp", "cc", "cxx", "hpp"],
            Language::Java => &["java"],
            Language::JavaScript => &["js", "mjs", "ts"],
            Language::Go => &["go"],
            Language::Matlab => &["m"],
            Language::Sql => &["sql"],
        }
    }

    fn syntax(self) -> CommentSyntax {
        match self {
            Language::Python | Language::Bash | Language::R => CommentSyntax {
                line: &["#"],
                block: None,
            },
            Language::Rust
            | Language::C
            | Language::Cpp
            | Language::Java
            | Language::JavaScript
            | Language::Go => CommentSyntax {
                line: &["//"],
                block: Some(("/*", "*/")),
            },
            Language::Matlab => CommentSyntax {
                line: &["%"],
                block: Some(("%{", "%}")),
            },
            Language::Sql => CommentSyntax {
                line: &["--"],
                block: Some(("/*", "*/")),
            },
        }
    }

    pub fn from_extension(ext: &str) -> Option<Language> {
        Language::ALL
            .into_iter()
            .find(|lang| lang.extensions().contains(&ext))
    }

    pub fn from_path(path: &Path) -> Option<Language> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Language::from_extension)
    }
}

impl FromStr for Language {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Language::ALL
            .into_iter()
            .find(|lang| lang.name() == wanted)
            .ok_or_else(|| {
                let known: Vec<_> = Language::ALL.iter().map(|l| l.name()).collect();
                anyhow!("unknown language: {}. Use one of: {}", s, known.join(", "))
            })
    }
}

/// One comment line: 1-based source line and the comment text with its
/// delimiters stripped and surrounding whitespace trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentLine {
    pub line: usize,
    pub text: String,
}

/// Extract comment lines from `source`, in source order.
pub fn scan(source: &str, lang: Language) -> Vec<CommentLine> {
    let syntax = lang.syntax();
    let mut comments = Vec::new();
    let mut in_block = false;

    for (idx, raw) in source.lines().enumerate() {
        let line = idx + 1;

        if in_block {
            let Some((_, end)) = syntax.block else {
                in_block = false;
                continue;
            };
            let body = match raw.find(end) {
                Some(pos) => {
                    in_block = false;
                    &raw[..pos]
                }
                None => raw,
            };
            push(&mut comments, line, &RE_BLOCK_DECORATION.replace(body, ""));
            continue;
        }

        let line_start = syntax
            .line
            .iter()
            .filter_map(|marker| raw.find(marker).map(|pos| (pos, marker.len())))
            .min();
        let block_start = syntax
            .block
            .and_then(|(start, _)| raw.find(start).map(|pos| (pos, start.len())));

        match (line_start, block_start) {
            (Some((pos, len)), block) if block.map_or(true, |(b, _)| pos < b) => {
                let marker = &raw[pos..pos + len];
                push(&mut comments, line, strip_line_decoration(&raw[pos + len..], marker));
            }
            (_, Some((pos, len))) => {
                let rest = &raw[pos + len..];
                let end = syntax.block.map(|(_, end)| end).unwrap_or_default();
                let body = match rest.find(end) {
                    Some(close) => &rest[..close],
                    None => {
                        in_block = true;
                        rest
                    }
                };
                push(&mut comments, line, &RE_BLOCK_DECORATION.replace(body, ""));
            }
            _ => {}
        }
    }

    comments
}

/// Drop repeats of the marker and doc-comment sigils: `## x`, `/// x`,
/// `//! x`, `%% x`, `#' x`.
fn strip_line_decoration<'a>(text: &'a str, marker: &str) -> &'a str {
    text.trim_start_matches(|c: char| marker.contains(c))
        .trim_start_matches(['!', '\''])
}

fn push(comments: &mut Vec<CommentLine>, line: usize, text: &str) {
    let text = text.trim();
    if !text.is_empty() {
        comments.push(CommentLine {
            line,
            text: text.to_string(),
        });
    }
}
