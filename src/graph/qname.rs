//! Qualified names for graph nodes and relations.

use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

// Characters that may not appear in the local part of a qualified name.
static RE_FORBIDDEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[='(),_:;\[\]/\\?@~&+*#$^!<>%]"#).unwrap());

pub const DEFAULT_PREFIX: &str = "yw";
pub const DEFAULT_NAMESPACE: &str = "http://yesworkflow.org/0000/";

/// Replace every forbidden character with `_`.
pub fn escape(input: &str) -> String {
    RE_FORBIDDEN.replace_all(input, "_").into_owned()
}

/// A namespaced identifier, `prefix:local`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedName {
    pub prefix: String,
    pub local: String,
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.prefix, self.local)
    }
}

impl Serialize for QualifiedName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Prefix binding used to qualify every identifier of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Namespace {
    pub prefix: String,
    pub uri: String,
}

impl Default for Namespace {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX, DEFAULT_NAMESPACE)
    }
}

impl Namespace {
    pub fn new(prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            uri: uri.into(),
        }
    }

    /// Identifier for an annotation value.
    pub fn qualify(&self, name: &str) -> QualifiedName {
        QualifiedName {
            prefix: self.prefix.clone(),
            local: escape(name.trim()),
        }
    }

    /// Identifier for a relation, `from__RELATION__to`.
    pub fn relation(&self, from: &QualifiedName, relation: &str, to: &QualifiedName) -> QualifiedName {
        QualifiedName {
            prefix: self.prefix.clone(),
            local: format!("{}__{}__{}", escape(&from.local), relation, escape(&to.local)),
        }
    }

    /// Full IRI of a name in this namespace.
    pub fn expand(&self, name: &QualifiedName) -> String {
        format!("{}{}", self.uri, name.local)
    }
}
