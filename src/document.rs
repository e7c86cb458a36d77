//! The on-disk code index (`routing.json`).
//!
//! The document is loaded whole, its symbols, tag vocabulary and usage
//! scores are extracted once, and the full JSON tree is kept so that
//! a commit rewrites the file with every unrelated field and the original
//! key order intact.

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde_json::Value;
use tempfile::NamedTempFile;

use crate::error::{Result, SearchError};
use crate::models::{Symbol, TagMetadata};
use crate::scoring::ScoreStore;

/// A loaded index document.
#[derive(Debug)]
pub struct RoutingDocument {
    path: PathBuf,
    root: Value,
    symbols: Vec<Symbol>,
    metadata: TagMetadata,
    scores: ScoreStore,
}

impl RoutingDocument {
    /// Loads the document at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::MissingDocument`] when the file does not exist,
    /// [`SearchError::Io`] when it cannot be read and [`SearchError::Json`]
    /// when it is not valid JSON. A document of the wrong shape is not an
    /// error: missing sections read as empty.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(SearchError::MissingDocument { path });
            }
            Err(source) => return Err(SearchError::Io { path, source }),
        };

        let root: Value = serde_json::from_str(&contents).map_err(|source| SearchError::Json {
            path: path.clone(),
            source,
        })?;

        let document = Self::from_value(path, root);
        tracing::debug!(
            path = %document.path.display(),
            symbols = document.symbols.len(),
            "loaded routing document"
        );
        Ok(document)
    }

    /// Wraps an already-parsed document that will be saved to `path`.
    pub fn from_value(path: impl Into<PathBuf>, root: Value) -> Self {
        let symbols = load_symbols(root.get("symbols"));
        let metadata = TagMetadata::from_value(root.get("tagMetadata"));
        let scores = ScoreStore::from_value(root.get("tagIndex"));

        Self {
            path: path.into(),
            root,
            symbols,
            metadata,
            scores,
        }
    }

    /// Returns the file this document is read from and written to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the indexed symbols in document order.
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Returns the alias and category vocabulary.
    pub fn metadata(&self) -> &TagMetadata {
        &self.metadata
    }

    /// Returns the usage score store.
    pub fn scores(&self) -> &ScoreStore {
        &self.scores
    }

    /// Returns the usage score store for increments.
    pub fn scores_mut(&mut self) -> &mut ScoreStore {
        &mut self.scores
    }

    /// Returns the full document tree, with pending score changes applied.
    pub fn to_value(&self) -> Value {
        let mut root = self.root.clone();
        apply_scores(&self.scores, &mut root);
        root
    }

    /// Writes pending score changes back to disk.
    ///
    /// The whole document is rewritten through a temporary file in the same
    /// directory, then renamed over the original. Returns `false` without
    /// touching the file when nothing changed.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Io`] if the temporary file cannot be written
    /// or persisted.
    pub fn commit(&mut self) -> Result<bool> {
        if !self.scores.is_dirty() {
            return Ok(false);
        }

        apply_scores(&self.scores, &mut self.root);
        self.write()?;
        self.scores.mark_clean();

        tracing::info!(path = %self.path.display(), "committed tag scores");
        Ok(true)
    }

    fn write(&self) -> Result<()> {
        let io_err = |source: io::Error| SearchError::Io {
            path: self.path.clone(),
            source,
        };

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
        // The temp file is created owner-only; carry over the index's mode
        match fs::metadata(&self.path) {
            Ok(metadata) => tmp
                .as_file()
                .set_permissions(metadata.permissions())
                .map_err(io_err)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(io_err(e)),
        }
        {
            let mut writer = BufWriter::new(tmp.as_file());
            serde_json::to_writer_pretty(&mut writer, &self.root).map_err(SearchError::Serialize)?;
            writer.flush().map_err(io_err)?;
        }
        tmp.persist(&self.path).map_err(|e| io_err(e.error))?;

        Ok(())
    }
}

/// Replaces `tagIndex` in place so its key position is kept.
fn apply_scores(scores: &ScoreStore, root: &mut Value) {
    if let Some(slot) = root.get_mut("tagIndex") {
        *slot = scores.to_value();
    }
}

/// Reads the `symbols` map, skipping entries that cannot be loaded.
fn load_symbols(value: Option<&Value>) -> Vec<Symbol> {
    let Some(entries) = value.and_then(Value::as_object) else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|(id, entry)| match Symbol::from_entry(id, entry) {
            Ok(symbol) => Some(symbol),
            Err(e) => {
                tracing::warn!(symbol = %id, error = %e, "skipping malformed symbol entry");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn sample() -> Value {
        json!({
            "version": 3,
            "symbols": {
                "sort::bubble": { "filePath": "src/sort.rs", "declLine": 10, "brief": "Bubble sort", "tags": ["bubble_sort", "sorting"] },
                "broken": "not an object",
                "io::read": { "tagsBase": ["io"], "tagsSemantic": ["reader"] }
            },
            "tagIndex": {
                "base": { "io": { "score": 1 } },
                "semantic": { "sorting": { "score": 5, "symbols": ["sort::bubble"] } },
                "custom": {}
            },
            "tagMetadata": { "aliases": { "sort": "sorting" }, "categories": {} },
            "generatedAt": "2026-01-01"
        })
    }

    #[test]
    fn open_missing_file_is_missing_document() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("routing.json");

        let err = RoutingDocument::open(&path).unwrap_err();

        assert!(matches!(err, SearchError::MissingDocument { path: p } if p == path));
    }

    #[test]
    fn open_invalid_json_is_json_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("routing.json");
        fs::write(&path, "{ not json").unwrap();

        let err = RoutingDocument::open(&path).unwrap_err();

        assert!(matches!(err, SearchError::Json { .. }));
        assert!(!err.is_user_error());
    }

    #[test]
    fn from_value_extracts_sections_and_skips_broken_symbols() {
        let document = RoutingDocument::from_value("routing.json", sample());

        let ids: Vec<&str> = document.symbols().iter().map(Symbol::id).collect();
        assert_eq!(ids, vec!["sort::bubble", "io::read"]);
        assert_eq!(document.symbols()[1].tags(), &["io", "reader"]);
        assert_eq!(document.metadata().canonical_of("sort"), Some("sorting"));
        assert_eq!(document.scores().score("sorting"), 5);
    }

    #[test]
    fn wrong_shape_degrades_to_empty() {
        let document = RoutingDocument::from_value("routing.json", json!([1, 2, 3]));
        assert!(document.symbols().is_empty());
        assert!(document.metadata().is_empty());
        assert_eq!(document.scores().locate("anything"), None);

        let document = RoutingDocument::from_value("routing.json", json!({ "symbols": [] }));
        assert!(document.symbols().is_empty());
    }

    #[test]
    fn commit_without_changes_does_not_write() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("routing.json");
        fs::write(&path, "{\"symbols\":{}}").unwrap();

        let mut document = RoutingDocument::open(&path).unwrap();

        assert!(!document.commit().unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "{\"symbols\":{}}");
    }

    #[test]
    fn commit_rewrites_scores_preserving_order_and_unicode() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("routing.json");
        let mut root = sample();
        root["symbols"]["sort::bubble"]["brief"] = json!("冒泡排序");
        fs::write(&path, serde_json::to_string(&root).unwrap()).unwrap();

        let mut document = RoutingDocument::open(&path).unwrap();
        assert_eq!(document.scores_mut().increment("sorting"), Some(6));
        assert!(document.commit().unwrap());

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("冒泡排序"), "non-ASCII must stay unescaped");
        assert!(written.starts_with("{\n  \"version\": 3,"));

        let keys: Vec<String> = serde_json::from_str::<Value>(&written)
            .unwrap()
            .as_object()
            .unwrap()
            .keys()
            .cloned()
            .collect();
        assert_eq!(
            keys,
            vec!["version", "symbols", "tagIndex", "tagMetadata", "generatedAt"]
        );

        let reopened = RoutingDocument::open(&path).unwrap();
        assert_eq!(reopened.scores().score("sorting"), 6);
        assert_eq!(
            reopened.to_value()["tagIndex"]["semantic"]["sorting"]["symbols"],
            json!(["sort::bubble"])
        );
    }

    #[cfg(unix)]
    #[test]
    fn commit_keeps_file_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("routing.json");
        fs::write(&path, serde_json::to_string(&sample()).unwrap()).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        let mut document = RoutingDocument::open(&path).unwrap();
        document.scores_mut().increment("sorting");
        assert!(document.commit().unwrap());

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o644);
    }

    #[test]
    fn to_value_includes_pending_increments() {
        let mut document = RoutingDocument::from_value("routing.json", sample());
        document.scores_mut().increment("io");

        assert_eq!(document.to_value()["tagIndex"]["base"]["io"]["score"], 2);
    }
}
