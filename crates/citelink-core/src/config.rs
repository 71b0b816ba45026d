use serde::{Deserialize, Serialize};

use crate::style::CitationStyle;

/// Configuration for the citation linking pipeline.
///
/// Passed explicitly into every pipeline invocation; there is no process-wide
/// state. Use [`LinkConfigBuilder`] (or deserialize from TOML/JSON) to
/// override individual values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Minimum average bracket-content length (in characters, brackets
    /// excluded) at which a document is classified as name-year style.
    name_year_threshold: usize,
    /// Maximum number of characters that may remain in a numeric candidate's
    /// content after numeric tokens, commas, and whitespace are removed
    /// before the candidate is discarded as a false positive.
    leftover_char_limit: usize,
    /// Skip classification and force this style for the whole document.
    style_override: Option<CitationStyle>,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            name_year_threshold: 4,
            leftover_char_limit: 10,
            style_override: None,
        }
    }
}

impl LinkConfig {
    pub fn builder() -> LinkConfigBuilder {
        LinkConfigBuilder::default()
    }

    pub fn name_year_threshold(&self) -> usize {
        self.name_year_threshold
    }

    pub fn leftover_char_limit(&self) -> usize {
        self.leftover_char_limit
    }

    pub fn style_override(&self) -> Option<CitationStyle> {
        self.style_override
    }
}

/// Builder for [`LinkConfig`].
#[derive(Debug, Clone, Default)]
pub struct LinkConfigBuilder {
    name_year_threshold: Option<usize>,
    leftover_char_limit: Option<usize>,
    style_override: Option<CitationStyle>,
}

impl LinkConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name_year_threshold(mut self, threshold: usize) -> Self {
        self.name_year_threshold = Some(threshold);
        self
    }

    pub fn leftover_char_limit(mut self, limit: usize) -> Self {
        self.leftover_char_limit = Some(limit);
        self
    }

    pub fn style_override(mut self, style: CitationStyle) -> Self {
        self.style_override = Some(style);
        self
    }

    pub fn build(self) -> LinkConfig {
        let defaults = LinkConfig::default();
        LinkConfig {
            name_year_threshold: self
                .name_year_threshold
                .unwrap_or(defaults.name_year_threshold),
            leftover_char_limit: self
                .leftover_char_limit
                .unwrap_or(defaults.leftover_char_limit),
            style_override: self.style_override,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{BracketType, ReferenceKind};

    #[test]
    fn test_defaults() {
        let config = LinkConfig::default();
        assert_eq!(config.name_year_threshold(), 4);
        assert_eq!(config.leftover_char_limit(), 10);
        assert!(config.style_override().is_none());
    }

    #[test]
    fn test_builder_overrides() {
        let config = LinkConfig::builder()
            .name_year_threshold(6)
            .style_override(CitationStyle::new(
                BracketType::Parenthesis,
                ReferenceKind::NameYear,
            ))
            .build();
        assert_eq!(config.name_year_threshold(), 6);
        assert_eq!(config.leftover_char_limit(), 10);
        assert_eq!(
            config.style_override().map(|s| s.bracket),
            Some(BracketType::Parenthesis)
        );
    }
}
