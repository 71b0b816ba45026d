use thiserror::Error;

pub mod bib;
pub mod block;
pub mod config;
pub mod style;
pub mod tree;

pub use bib::{BibEntry, BibId, BibRecord, Bibliography};
pub use block::ContentBlock;
pub use config::{LinkConfig, LinkConfigBuilder};
pub use style::{BracketType, CitationStyle, ReferenceKind};
pub use tree::{ContentNode, ContentTree, Heading, InTextReference, NodeId, Paragraph, ParagraphId};

/// Contract violations that abort processing of a document.
///
/// Per-candidate problems (malformed ranges, spans outside their paragraph,
/// unresolvable candidates) are recovered where they occur and never surface
/// here.
#[derive(Error, Debug)]
pub enum LinkError {
    #[error("matcher for {expected:?} references invoked with a {found:?} candidate")]
    ReferenceTypeMismatch {
        expected: ReferenceKind,
        found: ReferenceKind,
    },
}
