use std::collections::BTreeSet;

use serde::Deserialize;
use serde_json::Value;

/// One indexed code entity.
///
/// The tag list is resolved once when the symbol is loaded: the unified
/// `tags` list when the index carries one, otherwise the concatenation of
/// the legacy `tagsBase`, `tagsSemantic` and `tagsCustom` lists. Tags are
/// lowercased but otherwise kept as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    id: String,
    file_path: String,
    decl_line: u64,
    brief: String,
    tags: Vec<String>,
}

/// Wire shape of a `symbols` entry in the index document.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct SymbolEntry {
    file_path: Option<String>,
    decl_line: Option<u64>,
    brief: Option<String>,
    tags: Option<Vec<String>>,
    tags_base: Vec<String>,
    tags_semantic: Vec<String>,
    tags_custom: Vec<String>,
}

impl Symbol {
    /// Creates a symbol from already-resolved fields.
    ///
    /// # Examples
    ///
    /// ```
    /// use tagroute::Symbol;
    ///
    /// let symbol = Symbol::new("sort::bubble", "src/sort.rs", 12, "Bubble sort", ["Sorting"]);
    /// assert_eq!(symbol.tags(), &["sorting"]);
    /// ```
    pub fn new<I, S>(
        id: impl Into<String>,
        file_path: impl Into<String>,
        decl_line: u64,
        brief: impl Into<String>,
        tags: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            id: id.into(),
            file_path: file_path.into(),
            decl_line,
            brief: brief.into(),
            tags: tags.into_iter().map(|t| t.as_ref().to_lowercase()).collect(),
        }
    }

    /// Builds a symbol from its entry in the document's `symbols` map.
    ///
    /// Missing fields fall back to report defaults (`"unknown"`, `0`,
    /// `"N/A"`). Fails when the entry has fields of the wrong JSON type.
    pub fn from_entry(id: &str, entry: &Value) -> Result<Self, serde_json::Error> {
        let entry = SymbolEntry::deserialize(entry)?;

        let tags = match entry.tags {
            Some(tags) => tags,
            None => entry
                .tags_base
                .into_iter()
                .chain(entry.tags_semantic)
                .chain(entry.tags_custom)
                .collect(),
        };

        Ok(Self::new(
            id,
            entry.file_path.unwrap_or_else(|| "unknown".to_string()),
            entry.decl_line.unwrap_or(0),
            entry.brief.unwrap_or_else(|| "N/A".to_string()),
            tags,
        ))
    }

    /// Returns the symbol's key in the index.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the file the symbol is declared in.
    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    /// Returns the declaration line.
    pub fn decl_line(&self) -> u64 {
        self.decl_line
    }

    /// Returns the one-line description.
    pub fn brief(&self) -> &str {
        &self.brief
    }

    /// Returns the full tag list in stored order.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Returns the distinct tags, the form used for matching.
    pub fn tag_set(&self) -> BTreeSet<String> {
        self.tags.iter().cloned().collect()
    }
}
