pub mod builder;
pub mod matcher;
pub mod registry;
pub mod scan;
pub mod style;

pub use builder::build_tree;
pub use matcher::{NumericParseError, ReferenceMatcher, Resolution};
pub use registry::{RegistryError, register_reference};
pub use scan::{Candidate, scan_candidates};
pub use style::classify_style;
// Re-export domain types from core (canonical definitions live there)
pub use citelink_core::{
    BibEntry, BibId, BibRecord, Bibliography, BracketType, CitationStyle, ContentBlock,
    ContentNode, ContentTree, Heading, InTextReference, LinkConfig, LinkError, NodeId, Paragraph,
    ParagraphId, ReferenceKind,
};

/// Counters describing how candidate resolution went for one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkStats {
    /// Bracketed substrings found by the scanner.
    pub candidates: usize,
    /// Candidates resolved to at least one end reference and registered.
    pub resolved: usize,
    /// Candidates that resolved to nothing.
    pub unresolved: usize,
    /// Candidates discarded by the leftover-character heuristic.
    pub false_positives: usize,
    /// Resolved candidates discarded for violating the positional invariant.
    pub invalid_spans: usize,
}

/// What the linking pipeline decided and did for one document.
#[derive(Debug, Clone)]
pub struct LinkOutcome {
    pub style: CitationStyle,
    pub stats: LinkStats,
}

/// Resolve and register in-text references across a whole document.
///
/// Pipeline, strictly sequential per document:
/// 1. Classify the citation style from all paragraph text
/// 2. Scan every paragraph for bracketed candidates
/// 3. Resolve each candidate against the end-reference list
/// 4. Register non-empty resolutions on their paragraphs, in scan order
///
/// Candidates are processed in scan order so that each name-year search
/// window starts where the previous resolved reference in the same paragraph
/// ended. Per-candidate failures are recovered here; the only error is the
/// type-mismatch contract violation, which indicates a misconfigured
/// pipeline rather than malformed input.
pub fn link_citations(
    tree: &mut ContentTree,
    bibliography: &Bibliography,
    config: &LinkConfig,
) -> Result<LinkOutcome, LinkError> {
    let style = classify_style(tree, config);
    let matcher = ReferenceMatcher::for_kind(style.kind, bibliography, config);

    let candidates = scan_candidates(tree, style);
    let mut stats = LinkStats {
        candidates: candidates.len(),
        ..Default::default()
    };

    // End of the last registered reference, per current paragraph.
    let mut previous: Option<(ParagraphId, usize)> = None;

    for candidate in &candidates {
        let window_start = match previous {
            Some((paragraph, end)) if paragraph == candidate.paragraph => end,
            _ => 0,
        };

        let resolution = {
            let text = tree.paragraph(candidate.paragraph).text.as_str();
            matcher.resolve(candidate, text, window_start)?
        };

        let entries = match resolution {
            Resolution::Matched(entries) => entries,
            Resolution::Unmatched => {
                stats.unresolved += 1;
                continue;
            }
            Resolution::FalsePositive => {
                stats.false_positives += 1;
                continue;
            }
        };

        match register_reference(tree, candidate, entries) {
            Ok(()) => {
                stats.resolved += 1;
                previous = Some((candidate.paragraph, candidate.end));
            }
            Err(error) => {
                tracing::warn!(%error, "discarding resolved candidate");
                stats.invalid_spans += 1;
            }
        }
    }

    tracing::debug!(
        candidates = stats.candidates,
        resolved = stats.resolved,
        unresolved = stats.unresolved,
        false_positives = stats.false_positives,
        "citation linking complete"
    );

    Ok(LinkOutcome { style, stats })
}
