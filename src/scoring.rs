//! Usage scores and result ranking.
//!
//! Each tag in the document's `tagIndex` carries a persisted integer
//! `score`, bumped every time the tag is queried. Relevance of a matching
//! symbol is the sum of its matched tags' scores plus a flat +1 per distinct
//! matched tag (the breadth bonus).

use std::collections::BTreeSet;
use std::fmt;

use serde_json::{Map, Value};

use crate::models::SearchResult;

/// The three partitions of the document's `tagIndex`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoreCategory {
    Base,
    Semantic,
    Custom,
}

impl ScoreCategory {
    /// All categories in lookup order.
    pub const ALL: [ScoreCategory; 3] = [Self::Base, Self::Semantic, Self::Custom];

    /// Returns the key of this category in `tagIndex`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::Semantic => "semantic",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for ScoreCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// In-memory copy of the document's `tagIndex`.
///
/// Reads and increments go through the store; the document writes it back
/// on commit when it is dirty. Unknown fields of each tag entry are kept
/// untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreStore {
    index: Map<String, Value>,
    dirty: bool,
}

impl ScoreStore {
    /// Builds a store from a `tagIndex` value.
    ///
    /// Anything other than a JSON object yields an empty store.
    pub fn from_value(value: Option<&Value>) -> Self {
        let index = value
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();
        Self {
            index,
            dirty: false,
        }
    }

    /// Returns the first category, in [`ScoreCategory::ALL`] order, whose
    /// entries contain `tag`.
    pub fn locate(&self, tag: &str) -> Option<ScoreCategory> {
        ScoreCategory::ALL
            .into_iter()
            .find(|category| self.entry(*category, tag).is_some())
    }

    /// Returns the persisted score of `tag`, or 0 when no category holds it
    /// or its score is not an integer.
    ///
    /// When several categories hold the tag the last one in
    /// [`ScoreCategory::ALL`] order wins, so a `custom` score overrides a
    /// `base` one.
    pub fn score(&self, tag: &str) -> i64 {
        ScoreCategory::ALL
            .into_iter()
            .rev()
            .find_map(|category| self.entry(category, tag))
            .and_then(|entry| entry.get("score"))
            .and_then(Value::as_i64)
            .unwrap_or(0)
    }

    /// Increments the score of `tag` in the first category holding it.
    ///
    /// Returns the new score, or `None` when no category holds the tag or
    /// its stored score is not an `i64`. The stored value is left untouched
    /// in that case.
    pub fn increment(&mut self, tag: &str) -> Option<i64> {
        let category = self.locate(tag)?;

        let entry = self
            .index
            .get_mut(category.as_str())
            .and_then(Value::as_object_mut)
            .and_then(|entries| entries.get_mut(tag))?;

        let current = match entry.get("score") {
            None => 0,
            Some(score) => match score.as_i64() {
                Some(score) => score,
                None => {
                    tracing::warn!(tag, %category, %score, "tag score is not an integer; not incremented");
                    return None;
                }
            },
        };
        let next = current.saturating_add(1);

        match entry.as_object_mut() {
            Some(fields) => {
                fields.insert("score".to_string(), Value::from(next));
            }
            // A bare value stands for an entry without other fields
            None => *entry = serde_json::json!({ "score": next }),
        }

        self.dirty = true;
        tracing::debug!(tag, %category, score = next, "incremented tag score");
        Some(next)
    }

    /// Returns true when increments have not been written back yet.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Marks the store as written back.
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Returns the `tagIndex` value to persist.
    pub fn to_value(&self) -> Value {
        Value::Object(self.index.clone())
    }

    fn entry(&self, category: ScoreCategory, tag: &str) -> Option<&Value> {
        self.index
            .get(category.as_str())
            .and_then(Value::as_object)
            .and_then(|entries| entries.get(tag))
    }
}

/// Computes the relevance of a symbol from its matched tags.
///
/// Sum of each matched tag's persisted score plus one per distinct matched
/// tag.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeSet;
/// use serde_json::json;
/// use tagroute::scoring::{ScoreStore, relevance_score};
///
/// let index = json!({ "semantic": { "sorting": { "score": 5 } } });
/// let store = ScoreStore::from_value(Some(&index));
/// let matched = BTreeSet::from(["bubble_sort".to_string(), "sorting".to_string()]);
///
/// assert_eq!(relevance_score(&matched, &store), 7);
/// ```
pub fn relevance_score(matched_tags: &BTreeSet<String>, store: &ScoreStore) -> i64 {
    let usage: i64 = matched_tags.iter().map(|tag| store.score(tag)).sum();
    usage + matched_tags.len() as i64
}

/// Sorts results by descending `(score, match_count)`.
///
/// The sort is stable, so equal results keep discovery order.
pub fn rank(results: &mut [SearchResult]) {
    results.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| b.match_count.cmp(&a.match_count))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Symbol;
    use serde_json::json;

    fn store() -> ScoreStore {
        let index = json!({
            "base": { "sort": { "score": 5, "count": 3 } },
            "semantic": { "sorting": { "score": 2 }, "sort": { "score": 100 } },
            "custom": {
                "hot_path": { "count": 1 },
                "weird": { "score": "high" },
                "huge": { "score": 18446744073709551615u64 },
                "max": { "score": i64::MAX }
            }
        });
        ScoreStore::from_value(Some(&index))
    }

    fn result(id: &str, score: i64, match_count: usize) -> SearchResult {
        let symbol = Symbol::new(id, "f.rs", 1, "b", ["t"]);
        SearchResult::new(&symbol, BTreeSet::new(), match_count, score)
    }

    #[test]
    fn locate_scans_categories_in_order() {
        let store = store();
        assert_eq!(store.locate("sort"), Some(ScoreCategory::Base));
        assert_eq!(store.locate("sorting"), Some(ScoreCategory::Semantic));
        assert_eq!(store.locate("hot_path"), Some(ScoreCategory::Custom));
        assert_eq!(store.locate("absent"), None);
    }

    #[test]
    fn score_reads_last_category_holding_tag() {
        let store = store();
        // "sort" is incremented in base but scored from semantic
        assert_eq!(store.locate("sort"), Some(ScoreCategory::Base));
        assert_eq!(store.score("sort"), 100);
        assert_eq!(store.score("sorting"), 2);
    }

    #[test]
    fn score_defaults_to_zero() {
        let store = store();
        assert_eq!(store.score("hot_path"), 0);
        assert_eq!(store.score("weird"), 0);
        assert_eq!(store.score("absent"), 0);
    }

    #[test]
    fn increment_updates_holding_category_and_keeps_other_fields() {
        let mut store = store();

        assert_eq!(store.increment("sort"), Some(6));
        assert_eq!(store.increment("hot_path"), Some(1));

        assert!(store.is_dirty());
        let value = store.to_value();
        assert_eq!(value["base"]["sort"], json!({ "score": 6, "count": 3 }));
        assert_eq!(value["semantic"]["sort"]["score"], 100);
        assert_eq!(value["custom"]["hot_path"], json!({ "count": 1, "score": 1 }));
        assert_eq!(store.score("sort"), 100);
    }

    #[test]
    fn increment_saturates_at_max() {
        let mut store = store();
        assert_eq!(store.increment("max"), Some(i64::MAX));
        assert_eq!(store.score("max"), i64::MAX);
    }

    #[test]
    fn increment_leaves_non_i64_scores_untouched() {
        let mut store = store();

        assert_eq!(store.increment("weird"), None);
        assert_eq!(store.increment("huge"), None);

        assert!(!store.is_dirty());
        let value = store.to_value();
        assert_eq!(value["custom"]["weird"]["score"], "high");
        assert_eq!(value["custom"]["huge"]["score"], json!(u64::MAX));
    }

    #[test]
    fn increment_skips_unknown_tags() {
        let mut store = store();
        assert_eq!(store.increment("absent"), None);
        assert!(!store.is_dirty());
    }

    #[test]
    fn mark_clean_resets_dirty_flag() {
        let mut store = store();
        store.increment("sorting");
        store.mark_clean();
        assert!(!store.is_dirty());
        assert_eq!(store.score("sorting"), 3);
    }

    #[test]
    fn malformed_index_is_empty() {
        let store = ScoreStore::from_value(Some(&json!(["base"])));
        assert_eq!(store.locate("base"), None);
        let store = ScoreStore::from_value(Some(&json!({ "base": 4 })));
        assert_eq!(store.score("base"), 0);
    }

    #[test]
    fn relevance_adds_breadth_bonus() {
        let store = store();
        let matched: BTreeSet<String> = ["sort", "sorting", "absent"]
            .iter()
            .map(|t| t.to_string())
            .collect();

        assert_eq!(relevance_score(&matched, &store), 100 + 2 + 0 + 3);
        assert_eq!(relevance_score(&BTreeSet::new(), &store), 0);
    }

    #[test]
    fn rank_orders_by_score_then_match_count() {
        let mut results = vec![
            result("low", 1, 3),
            result("high", 9, 1),
            result("mid_fewer", 5, 1),
            result("mid_more", 5, 2),
        ];

        rank(&mut results);

        let ids: Vec<&str> = results.iter().map(|r| r.symbol_id.as_str()).collect();
        assert_eq!(ids, vec!["high", "mid_more", "mid_fewer", "low"]);
    }

    #[test]
    fn rank_is_stable_for_ties() {
        let mut results = vec![result("first", 4, 1), result("second", 4, 1), result("third", 4, 1)];

        rank(&mut results);

        let ids: Vec<&str> = results.iter().map(|r| r.symbol_id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
    }
}
