use std::collections::BTreeSet;

use crate::models::MergedGroup;
use crate::tags::TagMatcher;

/// Outcome of evaluating a symbol's tags against a list of clusters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupEvaluation {
    /// One entry per cluster, true when the cluster hit.
    pub hits: Vec<bool>,
    /// Every symbol tag that matched a tag of any cluster.
    pub matched_tags: BTreeSet<String>,
}

impl GroupEvaluation {
    /// Returns true when every cluster hit.
    pub fn all_hit(&self) -> bool {
        self.hits.iter().all(|&hit| hit)
    }

    /// Returns how many clusters hit.
    pub fn hit_count(&self) -> usize {
        self.hits.iter().filter(|&&hit| hit).count()
    }
}

/// Matches clusters against a symbol's tag set.
pub struct GroupEvaluator;

impl GroupEvaluator {
    /// Evaluates every cluster against `symbol_tags`.
    ///
    /// A cluster hits when any of its tags matches any symbol tag. A symbol
    /// tag is recorded in `matched_tags` once even if it satisfied several
    /// clusters.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::collections::BTreeSet;
    /// use tagroute::MergedGroup;
    /// use tagroute::groups::GroupEvaluator;
    ///
    /// let groups: Vec<MergedGroup> = vec![
    ///     ["sort"].into_iter().collect(),
    ///     ["mock", "test"].into_iter().collect(),
    /// ];
    /// let tags = BTreeSet::from(["sort".to_string(), "test".to_string()]);
    ///
    /// let evaluation = GroupEvaluator::evaluate(&groups, &tags);
    /// assert!(evaluation.all_hit());
    /// assert_eq!(evaluation.matched_tags.len(), 2);
    /// ```
    pub fn evaluate(groups: &[MergedGroup], symbol_tags: &BTreeSet<String>) -> GroupEvaluation {
        let mut evaluation = GroupEvaluation {
            hits: Vec::with_capacity(groups.len()),
            matched_tags: BTreeSet::new(),
        };

        for group in groups {
            let mut hit = false;
            for symbol_tag in symbol_tags {
                if group_matches(group, symbol_tag) {
                    hit = true;
                    evaluation.matched_tags.insert(symbol_tag.clone());
                }
            }
            evaluation.hits.push(hit);
        }

        evaluation
    }

    /// Returns true as soon as any cluster matches any symbol tag.
    pub fn hits_any(groups: &[MergedGroup], symbol_tags: &BTreeSet<String>) -> bool {
        groups.iter().any(|group| {
            symbol_tags
                .iter()
                .any(|symbol_tag| group_matches(group, symbol_tag))
        })
    }
}

fn group_matches(group: &MergedGroup, symbol_tag: &str) -> bool {
    group
        .tags()
        .iter()
        .any(|query_tag| TagMatcher::matches(query_tag, symbol_tag))
}
