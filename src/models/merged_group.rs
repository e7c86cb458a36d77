use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

/// A synonym cluster: expanded query groups merged while they share a tag.
///
/// Tags are normalized, distinct and sorted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MergedGroup(Vec<String>);

impl MergedGroup {
    /// Returns the tags in sorted order.
    pub fn tags(&self) -> &[String] {
        &self.0
    }

    /// Returns true when `tag` is a member of the cluster.
    pub fn contains(&self, tag: &str) -> bool {
        self.0.binary_search_by(|t| t.as_str().cmp(tag)).is_ok()
    }
}

impl From<BTreeSet<String>> for MergedGroup {
    fn from(tags: BTreeSet<String>) -> Self {
        Self(tags.into_iter().collect())
    }
}

impl<'a> FromIterator<&'a str> for MergedGroup {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        iter.into_iter()
            .map(String::from)
            .collect::<BTreeSet<_>>()
            .into()
    }
}

impl fmt::Display for MergedGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_iter_sorts_and_deduplicates() {
        let group: MergedGroup = ["sorting", "sort", "sorting"].into_iter().collect();
        assert_eq!(group.tags(), &["sort", "sorting"]);
        assert!(group.contains("sort"));
        assert!(!group.contains("test"));
    }

    #[test]
    fn display_joins_with_commas() {
        let group: MergedGroup = ["mock", "fake"].into_iter().collect();
        assert_eq!(group.to_string(), "fake, mock");
    }
}
