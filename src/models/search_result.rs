use std::collections::BTreeSet;

use serde::Serialize;

use super::Symbol;

/// A symbol that satisfied a query, with its relevance.
///
/// Constructed per query and discarded once reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub symbol_id: String,
    pub file_path: String,
    pub line: u64,
    pub brief: String,
    pub tags: Vec<String>,
    /// Symbol tags that matched any inclusion group.
    pub matched_tags: BTreeSet<String>,
    /// Number of inclusion groups the symbol hit.
    pub match_count: usize,
    pub score: i64,
}

impl SearchResult {
    /// Builds a result for `symbol`.
    pub fn new(
        symbol: &Symbol,
        matched_tags: BTreeSet<String>,
        match_count: usize,
        score: i64,
    ) -> Self {
        Self {
            symbol_id: symbol.id().to_string(),
            file_path: symbol.file_path().to_string(),
            line: symbol.decl_line(),
            brief: symbol.brief().to_string(),
            tags: symbol.tags().to_vec(),
            matched_tags,
            match_count,
            score,
        }
    }
}
