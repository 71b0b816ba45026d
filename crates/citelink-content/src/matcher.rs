use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

use citelink_core::{BibId, Bibliography, LinkConfig, LinkError, ReferenceKind};

use crate::scan::Candidate;

/// `N-M` with any common Unicode dash (hyphen-minus, the hyphen/dash block,
/// or the minus sign). PDF extraction routinely turns typeset en dashes into
/// any of these.
static RANGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\s*[\-\u{2010}-\u{2015}\u{2212}]\s*(\d+)").unwrap());

static NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

/// A 4-digit year with a non-digit (or string boundary) on both sides, so
/// page numbers and identifiers don't contribute spurious years.
static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?:^|[^0-9])(\d{4})(?:[^0-9]|$)").unwrap());

/// Why a numeric candidate was abandoned. All of these are per-candidate:
/// the candidate resolves to nothing and the document carries on.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum NumericParseError {
    #[error("range {start}-{end} is inverted")]
    InvertedRange { start: usize, end: usize },
    #[error("reference index {index} outside the {len}-entry reference list")]
    OutOfRange { index: usize, len: usize },
    #[error("number {0:?} too large to parse")]
    BadNumber(String),
    #[error("{leftover} non-numeric characters left over; not a citation")]
    FalsePositive { leftover: usize },
}

/// How resolving one candidate against the end-reference list ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// At least one end reference confirmed; ready to register.
    Matched(BTreeSet<BibId>),
    /// Nothing matched or could be confirmed; the candidate is dropped.
    Unmatched,
    /// The leftover-character heuristic decided the bracket content is not a
    /// citation at all.
    FalsePositive,
}

/// Resolves in-text reference candidates against the end-reference list.
///
/// Built once per document from the classified style; invoking it with a
/// candidate of the other kind is a pipeline misconfiguration and fails the
/// document.
pub enum ReferenceMatcher<'a> {
    Numeric(NumericMatcher<'a>),
    NameYear(NameYearMatcher<'a>),
}

impl<'a> ReferenceMatcher<'a> {
    pub fn for_kind(
        kind: ReferenceKind,
        bibliography: &'a Bibliography,
        config: &LinkConfig,
    ) -> Self {
        match kind {
            ReferenceKind::Numeric => Self::Numeric(NumericMatcher {
                bibliography,
                leftover_char_limit: config.leftover_char_limit(),
            }),
            ReferenceKind::NameYear => Self::NameYear(NameYearMatcher { bibliography }),
        }
    }

    pub fn kind(&self) -> ReferenceKind {
        match self {
            Self::Numeric(_) => ReferenceKind::Numeric,
            Self::NameYear(_) => ReferenceKind::NameYear,
        }
    }

    /// Resolve the end references a candidate points to.
    ///
    /// `window_start` is the end offset of the previous resolved reference in
    /// the same paragraph (0 if none); only the name-year strategy uses it.
    /// An unmatched or false-positive outcome means the candidate is not a
    /// citation (or could not be confirmed), never an error. The only error
    /// is the type-mismatch contract violation.
    pub fn resolve(
        &self,
        candidate: &Candidate,
        paragraph_text: &str,
        window_start: usize,
    ) -> Result<Resolution, LinkError> {
        if candidate.style.kind != self.kind() {
            return Err(LinkError::ReferenceTypeMismatch {
                expected: self.kind(),
                found: candidate.style.kind,
            });
        }

        let Some(content) = paragraph_text.get(candidate.start..candidate.end) else {
            tracing::debug!(
                start = candidate.start,
                end = candidate.end,
                len = paragraph_text.len(),
                "candidate span does not address the paragraph text"
            );
            return Ok(Resolution::Unmatched);
        };

        let resolution = match self {
            Self::Numeric(matcher) => matcher.resolve(content),
            Self::NameYear(matcher) => {
                let confirmed =
                    matcher.resolve(content, paragraph_text, window_start, candidate.end);
                if confirmed.is_empty() {
                    Resolution::Unmatched
                } else {
                    Resolution::Matched(confirmed)
                }
            }
        };
        Ok(resolution)
    }
}

/// Resolves `[1]`, `[1,3,5]`, `[1-7, 9]` style candidates by position in the
/// end-reference list.
pub struct NumericMatcher<'a> {
    bibliography: &'a Bibliography,
    leftover_char_limit: usize,
}

impl<'a> NumericMatcher<'a> {
    fn resolve(&self, content: &str) -> Resolution {
        match self.try_resolve(content) {
            Ok(matches) if !matches.is_empty() => Resolution::Matched(matches),
            Ok(_) => Resolution::Unmatched,
            Err(error @ NumericParseError::FalsePositive { .. }) => {
                tracing::debug!(content, %error, "numeric candidate discarded");
                Resolution::FalsePositive
            }
            Err(error) => {
                tracing::debug!(content, %error, "numeric candidate resolved to nothing");
                Resolution::Unmatched
            }
        }
    }

    pub(crate) fn try_resolve(&self, content: &str) -> Result<BTreeSet<BibId>, NumericParseError> {
        // False-positive check up front: once numeric tokens, commas, and
        // whitespace are gone, a real citation has almost nothing left, while
        // chemical names and formulas ("3-methyl-diphosphate") keep most of
        // their characters.
        let without_ranges = RANGE_RE.replace_all(content, "");
        let without_numbers = NUMBER_RE.replace_all(&without_ranges, "");
        let leftover = without_numbers
            .chars()
            .filter(|c| *c != ',' && !c.is_whitespace())
            .count();
        if leftover > self.leftover_char_limit {
            return Err(NumericParseError::FalsePositive { leftover });
        }

        let mut matches = BTreeSet::new();

        for caps in RANGE_RE.captures_iter(content) {
            let range_start = parse_index(&caps[1])?;
            let range_end = parse_index(&caps[2])?;
            if range_start >= range_end {
                return Err(NumericParseError::InvertedRange {
                    start: range_start,
                    end: range_end,
                });
            }
            for position in range_start..=range_end {
                matches.insert(self.lookup(position)?);
            }
        }

        // Ranges are consumed before standalone numbers so "1-3" does not
        // additionally resolve as 1 and 3.
        let remainder = RANGE_RE.replace_all(content, "");
        for found in NUMBER_RE.find_iter(&remainder) {
            let position = parse_index(found.as_str())?;
            matches.insert(self.lookup(position)?);
        }

        Ok(matches)
    }

    fn lookup(&self, position: usize) -> Result<BibId, NumericParseError> {
        self.bibliography
            .by_position(position)
            .map(|(id, _)| id)
            .ok_or(NumericParseError::OutOfRange {
                index: position,
                len: self.bibliography.len(),
            })
    }
}

fn parse_index(digits: &str) -> Result<usize, NumericParseError> {
    digits
        .parse()
        .map_err(|_| NumericParseError::BadNumber(digits.to_string()))
}

/// Resolves `(Author, 2015)` style candidates by year plus author surname.
pub struct NameYearMatcher<'a> {
    bibliography: &'a Bibliography,
}

impl<'a> NameYearMatcher<'a> {
    /// Confirm year-matching entries by searching for an author surname in a
    /// bounded stretch of the paragraph.
    ///
    /// The window runs from the end of the previous resolved reference in
    /// this paragraph (else the paragraph start) to the end of the current
    /// candidate: narrative citations put the author names *before* the
    /// bracket ("Smith et al. (2014)"), and the lower bound keeps surnames
    /// from earlier, unrelated citations in the same paragraph from
    /// confirming entries here.
    fn resolve(
        &self,
        content: &str,
        paragraph_text: &str,
        window_start: usize,
        window_end: usize,
    ) -> BTreeSet<BibId> {
        let mut confirmed = BTreeSet::new();

        let years = extract_years(content);
        if years.is_empty() {
            return confirmed;
        }

        let Some(window) = paragraph_text.get(window_start..window_end) else {
            tracing::debug!(
                window_start,
                window_end,
                len = paragraph_text.len(),
                "search window does not address the paragraph text"
            );
            return confirmed;
        };
        let window = fold_for_search(window);

        for year in &years {
            for (id, entry) in self.bibliography.iter() {
                if entry.year() != Some(year.as_str()) {
                    continue;
                }
                let surname_in_window = entry.author_surnames().any(|surname| {
                    let surname = fold_for_search(surname);
                    !surname.is_empty() && window.contains(&surname)
                });
                if surname_in_window {
                    confirmed.insert(id);
                }
            }
        }

        confirmed
    }
}

fn extract_years(content: &str) -> Vec<String> {
    YEAR_RE
        .captures_iter(content)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Case- and diacritic-insensitive comparison form: NFKD, keep ASCII,
/// lowercase. PDF extraction frequently loses combining accents, so "Müller"
/// in the bibliography must still find "Muller" in body text and vice versa.
fn fold_for_search(text: &str) -> String {
    text.nfkd()
        .filter(char::is_ascii)
        .collect::<String>()
        .to_lowercase()
}
