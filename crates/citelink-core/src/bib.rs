use serde::{Deserialize, Serialize};

/// Index of an entry in a [`Bibliography`], 0-based.
///
/// In-text references store these instead of owning entry data; the
/// bibliography itself is owned once per document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BibId(pub usize);

/// The fields the external reference parser delivers for one raw
/// bibliography string. Author strings are in `"Surname, Given"` form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BibRecord {
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub year: Option<String>,
    pub text: String,
}

/// A resolved end reference with its stable document-order identifier.
///
/// Immutable after construction; identifiers are assigned by
/// [`Bibliography::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BibEntry {
    id: String,
    authors: Vec<String>,
    year: Option<String>,
    text: String,
}

impl BibEntry {
    /// The assigned identifier: `"R1"`, `"R2"`, … in document order.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn authors(&self) -> &[String] {
        &self.authors
    }

    pub fn year(&self) -> Option<&str> {
        self.year.as_deref()
    }

    /// The raw reference string as it appeared in the reference list.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Author surnames: the part of each author string before the first comma.
    pub fn author_surnames(&self) -> impl Iterator<Item = &str> {
        self.authors
            .iter()
            .filter_map(|author| author.split(',').next())
            .map(str::trim)
            .filter(|surname| !surname.is_empty())
    }
}

/// The ordered end-reference list of a document.
#[derive(Debug, Clone, Default)]
pub struct Bibliography {
    entries: Vec<BibEntry>,
}

impl Bibliography {
    /// Build the bibliography from parsed records, assigning `"R{n}"`
    /// identifiers in input order.
    pub fn new(records: Vec<BibRecord>) -> Self {
        let entries = records
            .into_iter()
            .enumerate()
            .map(|(i, record)| BibEntry {
                id: format!("R{}", i + 1),
                authors: record.authors,
                year: record.year,
                text: record.text,
            })
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: BibId) -> Option<&BibEntry> {
        self.entries.get(id.0)
    }

    /// Look up an entry by its 1-based position in the reference list.
    pub fn by_position(&self, position: usize) -> Option<(BibId, &BibEntry)> {
        if position == 0 {
            return None;
        }
        let id = BibId(position - 1);
        self.get(id).map(|entry| (id, entry))
    }

    pub fn iter(&self) -> impl Iterator<Item = (BibId, &BibEntry)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (BibId(i), entry))
    }

    pub fn entries(&self) -> &[BibEntry] {
        &self.entries
    }
}
