use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures of the annotation → block → graph pipeline.
///
/// Every variant aborts the whole pass; no partial graph is ever returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Malformed annotation comment (wrong keyword, missing value token).
    #[error("markup error on line {line}: {message}")]
    Markup { line: usize, message: String },

    /// A data-flow, call or log annotation with no enclosing `@begin`.
    #[error("structure error on line {line}: @{tag} {value} is not inside any @begin block")]
    Structure {
        line: usize,
        tag: String,
        value: String,
    },

    /// A qualification that appears before any primary annotation.
    #[error("markup error on line {line}: {keyword} does not follow an annotation it could qualify")]
    OrphanQualification { line: usize, keyword: String },
}

impl Error {
    /// Source line the error refers to.
    pub fn line(&self) -> usize {
        match self {
            Error::Markup { line, .. }
            | Error::Structure { line, .. }
            | Error::OrphanQualification { line, .. } => *line,
        }
    }
}
