use citelink_core::{CitationStyle, ContentTree, ParagraphId};

use crate::style::content_pattern;

/// A bracketed substring that may be an in-text reference, before matching.
///
/// `start`/`end` delimit the bracket content within the paragraph text
/// (`start` after the opening bracket, `end` at the closing bracket,
/// exclusive).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub paragraph: ParagraphId,
    pub start: usize,
    pub end: usize,
    pub style: CitationStyle,
}

/// Find every bracketed substring of the detected style, per paragraph in
/// depth-first document order, left to right within each paragraph.
///
/// Scanning is stateless: the same tree and style always produce the same
/// candidate list.
pub fn scan_candidates(tree: &ContentTree, style: CitationStyle) -> Vec<Candidate> {
    let pattern = content_pattern(style.bracket);
    let mut candidates = Vec::new();
    for paragraph in tree.paragraph_ids() {
        let text = &tree.paragraph(paragraph).text;
        for found in pattern.find_iter(text) {
            // Both bracket characters are single-byte, so the content sits
            // one byte inside the match on each side.
            candidates.push(Candidate {
                paragraph,
                start: found.start() + 1,
                end: found.end() - 1,
                style,
            });
        }
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build_tree;
    use citelink_core::{BracketType, ContentBlock, ReferenceKind};

    fn numeric_square() -> CitationStyle {
        CitationStyle::new(BracketType::Square, ReferenceKind::Numeric)
    }

    #[test]
    fn test_offsets_delimit_content() {
        let tree = build_tree(&[ContentBlock::paragraph("See [1] and [2-4].")]);
        let candidates = scan_candidates(&tree, numeric_square());
        assert_eq!(candidates.len(), 2);

        let text = "See [1] and [2-4].";
        let first = &candidates[0];
        assert_eq!(&text[first.start..first.end], "1");
        let second = &candidates[1];
        assert_eq!(&text[second.start..second.end], "2-4");
    }

    #[test]
    fn test_candidates_follow_document_order() {
        let blocks = vec![
            ContentBlock::heading(1, "A"),
            ContentBlock::paragraph("first [1]"),
            ContentBlock::heading(1, "B"),
            ContentBlock::paragraph("second [2] and [3]"),
        ];
        let tree = build_tree(&blocks);
        let candidates = scan_candidates(&tree, numeric_square());
        assert_eq!(candidates.len(), 3);
        assert!(candidates[0].paragraph != candidates[1].paragraph);
        assert_eq!(candidates[1].paragraph, candidates[2].paragraph);
        assert!(candidates[1].start < candidates[2].start);
    }

    #[test]
    fn test_scanning_is_idempotent() {
        let tree = build_tree(&[
            ContentBlock::paragraph("x [1] y [2]"),
            ContentBlock::paragraph("z [3-5]"),
        ]);
        let style = numeric_square();
        let first = scan_candidates(&tree, style);
        let second = scan_candidates(&tree, style);
        assert_eq!(first, second);
    }

    #[test]
    fn test_no_matches_for_other_bracket() {
        let tree = build_tree(&[ContentBlock::paragraph("only (parens) here")]);
        let candidates = scan_candidates(&tree, numeric_square());
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_multibyte_text_offsets() {
        let text = "Müller’s result [1] holds.";
        let tree = build_tree(&[ContentBlock::paragraph(text)]);
        let candidates = scan_candidates(&tree, numeric_square());
        assert_eq!(candidates.len(), 1);
        assert_eq!(&text[candidates[0].start..candidates[0].end], "1");
    }
}
