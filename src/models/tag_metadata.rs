use std::collections::{BTreeSet, HashMap, HashSet};

use serde::Deserialize;
use serde_json::Value;

/// Alias and category vocabulary from the document's `tagMetadata`.
///
/// `aliases` maps an alternate spelling to its canonical tag. Every alias
/// target counts as canonical, as does every key of `categories`.
#[derive(Debug, Clone, Default)]
pub struct TagMetadata {
    aliases: HashMap<String, String>,
    canonical: HashSet<String>,
    reverse_aliases: HashMap<String, BTreeSet<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TagMetadataEntry {
    aliases: Option<HashMap<String, String>>,
    categories: Option<serde_json::Map<String, Value>>,
}

impl TagMetadata {
    /// Builds the vocabulary from alias pairs and category names.
    ///
    /// # Examples
    ///
    /// ```
    /// use tagroute::TagMetadata;
    ///
    /// let metadata = TagMetadata::new([("authn", "authentication")], ["security"]);
    /// assert_eq!(metadata.canonical_of("authn"), Some("authentication"));
    /// assert!(metadata.is_canonical("security"));
    /// assert!(metadata.is_canonical("authentication"));
    /// ```
    pub fn new<A, K, V, C, N>(aliases: A, categories: C) -> Self
    where
        A: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
        C: IntoIterator<Item = N>,
        N: Into<String>,
    {
        let aliases: HashMap<String, String> = aliases
            .into_iter()
            .map(|(raw, canonical)| (raw.into(), canonical.into()))
            .collect();

        let mut canonical: HashSet<String> = categories.into_iter().map(Into::into).collect();
        let mut reverse_aliases: HashMap<String, BTreeSet<String>> = HashMap::new();
        for (raw, target) in &aliases {
            canonical.insert(target.clone());
            reverse_aliases
                .entry(target.clone())
                .or_default()
                .insert(raw.clone());
        }

        Self {
            aliases,
            canonical,
            reverse_aliases,
        }
    }

    /// Reads `tagMetadata` from a document value.
    ///
    /// Absent or malformed metadata yields an empty vocabulary, which
    /// disables alias expansion.
    pub fn from_value(value: Option<&Value>) -> Self {
        let Some(value) = value.filter(|v| !v.is_null()) else {
            return Self::default();
        };

        match TagMetadataEntry::deserialize(value) {
            Ok(entry) => Self::new(
                entry.aliases.unwrap_or_default(),
                entry.categories.unwrap_or_default().into_iter().map(|(k, _)| k),
            ),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring malformed tagMetadata");
                Self::default()
            }
        }
    }

    /// Returns the canonical tag `tag` is an alias of.
    pub fn canonical_of(&self, tag: &str) -> Option<&str> {
        self.aliases.get(tag).map(String::as_str)
    }

    /// Returns true when `tag` is a category key or an alias target.
    pub fn is_canonical(&self, tag: &str) -> bool {
        self.canonical.contains(tag)
    }

    /// Returns every raw spelling aliasing to `canonical`.
    pub fn aliases_of(&self, canonical: &str) -> impl Iterator<Item = &str> {
        self.reverse_aliases
            .get(canonical)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    /// Returns true when the vocabulary has no aliases and no categories.
    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty() && self.canonical.is_empty()
    }
}
