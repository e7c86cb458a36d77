use crate::document::RoutingDocument;
use crate::error::{Result, SearchError};
use crate::groups::{GroupBuilder, GroupEvaluator};
use crate::models::{MergedGroup, ParsedQuery, SearchResult};
use crate::scoring::{ScoreStore, rank, relevance_score};

/// The synonym clusters a query resolves to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPlan {
    /// Inclusion clusters; a symbol must hit every one.
    pub groups: Vec<MergedGroup>,
    /// Exclusion clusters; a symbol hitting any one is dropped.
    pub exclude_groups: Vec<MergedGroup>,
}

/// Ranked results of a query together with the plan that produced them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOutcome {
    pub plan: SearchPlan,
    pub results: Vec<SearchResult>,
}

/// Service layer running tag queries against a loaded index document.
///
/// SearchService owns the document and is the only writer of its usage
/// scores. Searching never mutates state; usage is recorded separately and
/// persisted by [`SearchService::commit`].
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use tagroute::{ParsedQuery, RoutingDocument, SearchService};
///
/// # fn main() -> tagroute::Result<()> {
/// let document = RoutingDocument::from_value("routing.json", json!({
///     "symbols": { "sort::bubble": { "tags": ["bubble_sort", "sorting"] } },
///     "tagIndex": { "semantic": { "sorting": { "score": 5 } } }
/// }));
/// let service = SearchService::new(document);
///
/// let query = ParsedQuery::parse(["sort"])?;
/// let outcome = service.search(&query)?;
/// assert_eq!(outcome.results.len(), 1);
/// assert_eq!(outcome.results[0].score, 7);
/// # Ok(())
/// # }
/// ```
pub struct SearchService {
    document: RoutingDocument,
}

impl SearchService {
    /// Creates a new SearchService over the given document.
    pub fn new(document: RoutingDocument) -> Self {
        Self { document }
    }

    /// Returns a reference to the underlying document.
    pub fn document(&self) -> &RoutingDocument {
        &self.document
    }

    /// Returns the usage score store.
    pub fn scores(&self) -> &ScoreStore {
        self.document.scores()
    }

    /// Resolves a query's groups into inclusion and exclusion clusters.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::NoValidTags`] when the inclusion groups build
    /// to no cluster at all.
    pub fn plan(&self, query: &ParsedQuery) -> Result<SearchPlan> {
        let builder = GroupBuilder::new(self.document.metadata());

        let groups = builder.build(query.positive());
        if groups.is_empty() {
            return Err(SearchError::NoValidTags);
        }
        let exclude_groups = builder.build(query.negative());

        tracing::debug!(
            groups = groups.len(),
            exclude_groups = exclude_groups.len(),
            "built search plan"
        );

        Ok(SearchPlan {
            groups,
            exclude_groups,
        })
    }

    /// Finds and ranks every symbol satisfying the query.
    ///
    /// A symbol is kept when all inclusion clusters hit and no exclusion
    /// cluster does. Results are ordered by descending score, then by the
    /// number of clusters hit, then by document order.
    ///
    /// # Errors
    ///
    /// Fails as [`SearchService::plan`] does.
    pub fn search(&self, query: &ParsedQuery) -> Result<SearchOutcome> {
        let plan = self.plan(query)?;
        let scores = self.document.scores();

        let mut results = Vec::new();
        for symbol in self.document.symbols() {
            let tags = symbol.tag_set();

            let evaluation = GroupEvaluator::evaluate(&plan.groups, &tags);
            if !evaluation.all_hit() {
                continue;
            }
            if GroupEvaluator::hits_any(&plan.exclude_groups, &tags) {
                tracing::debug!(symbol = symbol.id(), "excluded by exclusion group");
                continue;
            }

            let match_count = evaluation.hit_count();
            let score = relevance_score(&evaluation.matched_tags, scores);
            results.push(SearchResult::new(
                symbol,
                evaluation.matched_tags,
                match_count,
                score,
            ));
        }

        rank(&mut results);
        tracing::debug!(results = results.len(), "search complete");

        Ok(SearchOutcome { plan, results })
    }

    /// Increments the usage score of every queried inclusion tag.
    ///
    /// Tags are the literal user input, normalized; aliases and cluster
    /// members pulled in by expansion are not counted. Tags held by no score
    /// category are skipped. Returns the tags actually incremented.
    pub fn record_usage(&mut self, query: &ParsedQuery) -> Vec<String> {
        let scores = self.document.scores_mut();

        query
            .flat_tags()
            .iter()
            .filter(|tag| match scores.increment(tag) {
                Some(_) => true,
                None => {
                    tracing::debug!(tag = %tag, "tag has no usage score; skipped");
                    false
                }
            })
            .cloned()
            .collect()
    }

    /// Persists recorded usage to disk.
    ///
    /// Returns `true` when the document was rewritten.
    ///
    /// # Errors
    ///
    /// Returns an error when the document cannot be written.
    pub fn commit(&mut self) -> Result<bool> {
        self.document.commit()
    }
}
