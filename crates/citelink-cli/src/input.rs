use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use citelink_core::{BibRecord, Bibliography, ContentBlock, LinkConfig};

/// The document as delivered by the upstream extraction collaborators: the
/// classified block sequence plus the already-parsed raw reference records.
#[derive(Debug, Deserialize)]
pub struct DocumentInput {
    pub blocks: Vec<ContentBlock>,
    #[serde(default)]
    pub references: Vec<BibRecord>,
}

impl DocumentInput {
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading document {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("parsing document {}", path.display()))
    }

    pub fn into_parts(self) -> (Vec<ContentBlock>, Bibliography) {
        (self.blocks, Bibliography::new(self.references))
    }
}

/// Load a [`LinkConfig`] from a TOML file, or defaults when no path given.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<LinkConfig> {
    match path {
        None => Ok(LinkConfig::default()),
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            toml::from_str(&content).with_context(|| format!("parsing config {}", path.display()))
        }
    }
}
