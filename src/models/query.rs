use std::fmt;

use crate::error::{Result, SearchError};
use crate::tags::TagNormalizer;

/// Whether a query group must match or must not match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    /// The symbol must match the group
    Include,
    /// The symbol is dropped if it matches the group
    Exclude,
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Polarity::Include => write!(f, "include"),
            Polarity::Exclude => write!(f, "exclude"),
        }
    }
}

/// Raw synonym tags supplied together in one query token.
///
/// Members are OR-ed together when matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryGroup {
    polarity: Polarity,
    tags: Vec<String>,
}

impl QueryGroup {
    /// Creates a group from raw member tags.
    pub fn new<I, S>(polarity: Polarity, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            polarity,
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }

    /// Parses one query token such as `sort|sorting` or `!mock|test`.
    ///
    /// A leading `!` or `-` makes the whole token an exclusion group.
    /// Returns `None` when the token has no non-empty segment.
    ///
    /// # Examples
    ///
    /// ```
    /// use tagroute::{Polarity, QueryGroup};
    ///
    /// let group = QueryGroup::parse("!mock | test").unwrap();
    /// assert_eq!(group.polarity(), Polarity::Exclude);
    /// assert_eq!(group.tags(), &["mock", "test"]);
    ///
    /// assert!(QueryGroup::parse(" | ").is_none());
    /// ```
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim();
        let (polarity, body) = match token.strip_prefix(['!', '-']) {
            Some(rest) => (Polarity::Exclude, rest),
            None => (Polarity::Include, token),
        };

        let tags: Vec<&str> = body
            .split('|')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect();

        if tags.is_empty() {
            return None;
        }
        Some(Self::new(polarity, tags))
    }

    /// Returns whether the group includes or excludes.
    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    /// Returns the raw member tags as typed.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }
}

/// A whole query split into inclusion and exclusion groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuery {
    positive: Vec<QueryGroup>,
    negative: Vec<QueryGroup>,
    flat_tags: Vec<String>,
}

impl ParsedQuery {
    /// Parses the raw CLI tag arguments.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::NoPositiveGroups`] when no inclusion group is
    /// present, and [`SearchError::NoValidTags`] when every inclusion tag
    /// normalizes to nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use tagroute::ParsedQuery;
    ///
    /// let query = ParsedQuery::parse(["Bubble Sort|sorting", "-mock"]).unwrap();
    /// assert_eq!(query.positive().len(), 1);
    /// assert_eq!(query.negative().len(), 1);
    /// assert_eq!(query.flat_tags(), &["bubble_sort", "sorting"]);
    /// ```
    pub fn parse<I, S>(tokens: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let (positive, negative): (Vec<QueryGroup>, Vec<QueryGroup>) = tokens
            .into_iter()
            .filter_map(|token| QueryGroup::parse(token.as_ref()))
            .partition(|group| group.polarity() == Polarity::Include);

        if positive.is_empty() {
            return Err(SearchError::NoPositiveGroups);
        }

        let flat_tags: Vec<String> = positive
            .iter()
            .flat_map(|group| group.tags())
            .map(|tag| TagNormalizer::normalize_tag(tag))
            .filter(|tag| !tag.is_empty())
            .collect();

        if flat_tags.is_empty() {
            return Err(SearchError::NoValidTags);
        }

        Ok(Self {
            positive,
            negative,
            flat_tags,
        })
    }

    /// Returns the inclusion groups in input order.
    pub fn positive(&self) -> &[QueryGroup] {
        &self.positive
    }

    /// Returns the exclusion groups in input order.
    pub fn negative(&self) -> &[QueryGroup] {
        &self.negative
    }

    /// Returns the normalized inclusion tags in input order, duplicates kept.
    ///
    /// These are the tags whose usage scores a search increments.
    pub fn flat_tags(&self) -> &[String] {
        &self.flat_tags
    }
}
