use serde::{Deserialize, Serialize};

/// A block-level element produced by the upstream zone/line classification
/// pipeline, in reading order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// A section heading with its classified level (1 = top).
    Heading { level: usize, text: String },
    /// A body paragraph.
    Paragraph { text: String },
}

impl ContentBlock {
    pub fn heading(level: usize, text: impl Into<String>) -> Self {
        Self::Heading {
            level,
            text: text.into(),
        }
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::Paragraph { text: text.into() }
    }

    /// The heading level, or `None` for paragraphs.
    pub fn heading_level(&self) -> Option<usize> {
        match self {
            Self::Heading { level, .. } => Some(*level),
            Self::Paragraph { .. } => None,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Self::Heading { text, .. } | Self::Paragraph { text } => text,
        }
    }
}
