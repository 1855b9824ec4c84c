//! Provenance graph: document types, identity and merge policy, and the
//! builder that walks assembled blocks.

pub mod builder;
pub mod document;
pub mod merge;
pub mod qname;

pub use builder::{Provenance, ProvenanceBuilder, CALLED_FUNCTION};
pub use document::{Alternate, Edge, EdgeKind, GraphDocument, Node, NodeKind};
pub use qname::{Namespace, QualifiedName};
