use once_cell::sync::Lazy;
use regex::Regex;

use citelink_core::{BracketType, CitationStyle, ContentTree, LinkConfig, ReferenceKind};

static SQUARE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[(.*?)\]").unwrap());
static PAREN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\((.*?)\)").unwrap());
static CURLY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{(.*?)\}").unwrap());
static ANGLE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<(.*?)>").unwrap());

/// The lazy, non-nested bracket-content pattern for a bracket type: a closing
/// bracket anywhere after the opener ends the match.
pub(crate) fn content_pattern(bracket: BracketType) -> &'static Regex {
    match bracket {
        BracketType::Square => &SQUARE_RE,
        BracketType::Parenthesis => &PAREN_RE,
        BracketType::Curly => &CURLY_RE,
        BracketType::Angle => &ANGLE_RE,
    }
}

/// Determine the in-text citation style used by a document.
///
/// Counts opening brackets of every type across all paragraph text, weights
/// the counts by each type's frequency prior, and picks the winner (ties go
/// to the earlier enumeration entry). The winning bracket's contents then
/// decide the reference kind: short contents (average below the configured
/// threshold) look like `[7]`-style numerals, longer ones like
/// `(Author, 2015)`.
///
/// Best-effort heuristic: superscript citations and documents that cite
/// without brackets will be misclassified. A document with no bracket
/// contents at all defaults to numeric.
pub fn classify_style(tree: &ContentTree, config: &LinkConfig) -> CitationStyle {
    if let Some(style) = config.style_override() {
        tracing::debug!(?style, "using configured style override");
        return style;
    }

    let all_text = tree.all_paragraph_texts().concat();
    let bracket = most_likely_bracket(&all_text);
    let kind = most_likely_kind(bracket, &all_text, config.name_year_threshold());
    let style = CitationStyle::new(bracket, kind);
    tracing::debug!(?style, "classified citation style");
    style
}

fn most_likely_bracket(text: &str) -> BracketType {
    let mut best = BracketType::ALL[0];
    let mut best_score = f64::MIN;
    for bracket in BracketType::ALL {
        let count = text.matches(bracket.opening()).count();
        let score = count as f64 * bracket.prior_weight();
        if score > best_score {
            best = bracket;
            best_score = score;
        }
    }
    best
}

fn most_likely_kind(bracket: BracketType, text: &str, threshold: usize) -> ReferenceKind {
    let mut matches = 0usize;
    let mut total_content_len = 0usize;
    for caps in content_pattern(bracket).captures_iter(text) {
        matches += 1;
        total_content_len += caps[1].chars().count();
    }

    if matches == 0 {
        tracing::warn!(
            bracket = ?bracket,
            "no bracket contents found for the winning bracket type; defaulting to numeric style"
        );
        return ReferenceKind::Numeric;
    }

    if total_content_len / matches >= threshold {
        ReferenceKind::NameYear
    } else {
        ReferenceKind::Numeric
    }
}
