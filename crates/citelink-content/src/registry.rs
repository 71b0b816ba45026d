use std::collections::BTreeSet;

use thiserror::Error;

use citelink_core::{BibId, ContentTree, InTextReference};

use crate::scan::Candidate;

/// Why a resolved candidate could not be attached to its paragraph. Both
/// cases discard only the one candidate.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
    #[error("span {start}..{end} does not fit a paragraph of length {len}")]
    SpanOutOfBounds {
        start: usize,
        end: usize,
        len: usize,
    },
    #[error("a reference already starts at offset {start}")]
    DuplicateStart { start: usize },
}

/// Attach a resolved candidate to its parent paragraph.
///
/// Validates the positional invariant (the span must address the paragraph
/// text) and inserts keeping the paragraph's references in strictly ascending
/// start order. Candidates that resolved to nothing must be dropped by the
/// caller instead of registered; passing one here is a no-op.
pub fn register_reference(
    tree: &mut ContentTree,
    candidate: &Candidate,
    entries: BTreeSet<BibId>,
) -> Result<(), RegistryError> {
    if entries.is_empty() {
        tracing::debug!(
            start = candidate.start,
            end = candidate.end,
            "not registering a candidate with no resolved entries"
        );
        return Ok(());
    }

    let paragraph = tree.paragraph_mut(candidate.paragraph);
    let len = paragraph.text.len();
    if candidate.start > candidate.end || candidate.end > len {
        return Err(RegistryError::SpanOutOfBounds {
            start: candidate.start,
            end: candidate.end,
            len,
        });
    }

    let position = paragraph
        .references
        .binary_search_by(|existing| existing.start.cmp(&candidate.start));
    match position {
        Ok(_) => Err(RegistryError::DuplicateStart {
            start: candidate.start,
        }),
        Err(insert_at) => {
            paragraph.references.insert(
                insert_at,
                InTextReference {
                    start: candidate.start,
                    end: candidate.end,
                    style: candidate.style,
                    entries: entries.into_iter().collect(),
                },
            );
            Ok(())
        }
    }
}
