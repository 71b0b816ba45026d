use serde::{Deserialize, Serialize};

/// The punctuation pair delimiting in-text citations in a document.
///
/// Each type carries a fixed frequency prior used when picking the most
/// likely bracket type: square brackets almost always delimit citations when
/// present, parentheses usually delimit asides, and curly/angle brackets
/// essentially never mark citations in scholarly prose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketType {
    Square,
    Parenthesis,
    Curly,
    Angle,
}

impl BracketType {
    /// All bracket types in disambiguation order; earlier entries win ties.
    pub const ALL: [BracketType; 4] = [
        BracketType::Square,
        BracketType::Parenthesis,
        BracketType::Curly,
        BracketType::Angle,
    ];

    pub fn opening(self) -> char {
        match self {
            BracketType::Square => '[',
            BracketType::Parenthesis => '(',
            BracketType::Curly => '{',
            BracketType::Angle => '<',
        }
    }

    pub fn closing(self) -> char {
        match self {
            BracketType::Square => ']',
            BracketType::Parenthesis => ')',
            BracketType::Curly => '}',
            BracketType::Angle => '>',
        }
    }

    /// Weight applied to raw opening-bracket counts during style detection.
    pub fn prior_weight(self) -> f64 {
        match self {
            BracketType::Square => 1.0,
            BracketType::Parenthesis => 0.1,
            BracketType::Curly => 0.0,
            BracketType::Angle => 0.0,
        }
    }
}

/// How the bracket content identifies bibliography entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    /// `[1]`, `[1,3,5]`, `[1-7, 9]`
    Numeric,
    /// `(Author, 2015)`, `Author (2015)`, `(Author1, 2015; Author2, 2014)`
    NameYear,
}

/// The in-text citation style of a whole document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitationStyle {
    pub bracket: BracketType,
    pub kind: ReferenceKind,
}

impl CitationStyle {
    pub fn new(bracket: BracketType, kind: ReferenceKind) -> Self {
        Self { bracket, kind }
    }
}
