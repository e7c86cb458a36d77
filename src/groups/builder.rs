use std::collections::{BTreeSet, HashMap};

use crate::models::{MergedGroup, QueryGroup, TagMetadata};
use crate::tags::TagNormalizer;

/// Expands query groups through the alias vocabulary and merges groups that
/// share a tag.
#[derive(Debug, Clone, Copy)]
pub struct GroupBuilder<'a> {
    metadata: &'a TagMetadata,
}

impl<'a> GroupBuilder<'a> {
    /// Creates a builder over the document's tag vocabulary.
    pub fn new(metadata: &'a TagMetadata) -> Self {
        Self { metadata }
    }

    /// Expands one query group into its set of normalized tags.
    ///
    /// Each member contributes itself and, when it is an alias, its
    /// canonical tag plus every alias of that canonical tag. A member that
    /// is itself canonical contributes its aliases. The relation is followed
    /// one hop in each direction only.
    pub fn expand(&self, group: &QueryGroup) -> BTreeSet<String> {
        let mut expanded = BTreeSet::new();

        for raw in group.tags() {
            let normalized = TagNormalizer::normalize_tag(raw);
            if normalized.is_empty() {
                continue;
            }

            if let Some(canonical) = self.metadata.canonical_of(&normalized) {
                expanded.insert(canonical.to_string());
                expanded.extend(self.metadata.aliases_of(canonical).map(String::from));
            } else if self.metadata.is_canonical(&normalized) {
                expanded.extend(self.metadata.aliases_of(&normalized).map(String::from));
            }
            expanded.insert(normalized);
        }

        expanded
    }

    /// Builds the pairwise-disjoint synonym clusters for a list of groups.
    ///
    /// Groups that expand to nothing are dropped. Clusters are emitted in
    /// the order of their earliest contributing group.
    ///
    /// # Examples
    ///
    /// ```
    /// use tagroute::groups::GroupBuilder;
    /// use tagroute::{Polarity, QueryGroup, TagMetadata};
    ///
    /// let metadata = TagMetadata::new([("authn", "authentication")], ["security"]);
    /// let builder = GroupBuilder::new(&metadata);
    ///
    /// let groups = builder.build(&[
    ///     QueryGroup::new(Polarity::Include, ["authn"]),
    ///     QueryGroup::new(Polarity::Include, ["sort"]),
    ///     QueryGroup::new(Polarity::Include, ["Authentication"]),
    /// ]);
    ///
    /// assert_eq!(groups.len(), 2);
    /// assert_eq!(groups[0].tags(), &["authentication", "authn"]);
    /// assert_eq!(groups[1].tags(), &["sort"]);
    /// ```
    pub fn build(&self, groups: &[QueryGroup]) -> Vec<MergedGroup> {
        let expanded: Vec<BTreeSet<String>> = groups
            .iter()
            .map(|group| self.expand(group))
            .filter(|set| !set.is_empty())
            .collect();

        merge_overlapping(expanded)
            .into_iter()
            .map(MergedGroup::from)
            .collect()
    }
}

/// Unions sets that share a member, transitively.
///
/// Connected components over sets, linked through the first set that owns
/// each tag. The output preserves first-seen order.
fn merge_overlapping(sets: Vec<BTreeSet<String>>) -> Vec<BTreeSet<String>> {
    let roots: Vec<usize> = {
        let mut forest = DisjointSet::new(sets.len());
        let mut owner: HashMap<&str, usize> = HashMap::new();

        for (idx, set) in sets.iter().enumerate() {
            for tag in set {
                match owner.get(tag.as_str()) {
                    Some(&first) => forest.union(first, idx),
                    None => {
                        owner.insert(tag.as_str(), idx);
                    }
                }
            }
        }

        (0..sets.len()).map(|idx| forest.find(idx)).collect()
    };

    let mut slot_of_root: HashMap<usize, usize> = HashMap::new();
    let mut merged: Vec<BTreeSet<String>> = Vec::new();

    for (set, root) in sets.into_iter().zip(roots) {
        let slot = *slot_of_root.entry(root).or_insert_with(|| {
            merged.push(BTreeSet::new());
            merged.len() - 1
        });
        merged[slot].extend(set);
    }

    merged
}

/// Union-find where every root is the smallest index in its component.
struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
        }
    }

    fn find(&mut self, idx: usize) -> usize {
        let mut root = idx;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        // Path compression
        let mut current = idx;
        while self.parent[current] != root {
            let next = self.parent[current];
            self.parent[current] = root;
            current = next;
        }

        root
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        let (low, high) = if ra < rb { (ra, rb) } else { (rb, ra) };
        self.parent[high] = low;
    }
}
