/// Tags at or below this many characters only match exactly.
pub const SHORT_TAG_MAX_LEN: usize = 3;

/// Decides whether a query tag matches a symbol tag.
///
/// Both inputs are expected to be normalized already.
pub struct TagMatcher;

impl TagMatcher {
    /// Returns true when `query_tag` matches `symbol_tag`.
    ///
    /// Empty tags never match. If either tag is short (see
    /// [`SHORT_TAG_MAX_LEN`]) the tags must be equal; otherwise one must
    /// contain the other.
    ///
    /// # Examples
    ///
    /// ```
    /// use tagroute::tags::TagMatcher;
    ///
    /// assert!(TagMatcher::matches("sort", "sorting"));
    /// assert!(TagMatcher::matches("bubble_sort", "sort"));
    /// assert!(TagMatcher::matches("io", "io"));
    /// assert!(!TagMatcher::matches("io", "audio"));
    /// assert!(!TagMatcher::matches("", "sort"));
    /// ```
    #[must_use]
    pub fn matches(query_tag: &str, symbol_tag: &str) -> bool {
        if query_tag.is_empty() || symbol_tag.is_empty() {
            return false;
        }
        if is_short(query_tag) || is_short(symbol_tag) {
            return query_tag == symbol_tag;
        }
        query_tag.contains(symbol_tag) || symbol_tag.contains(query_tag)
    }
}

fn is_short(tag: &str) -> bool {
    tag.chars().count() <= SHORT_TAG_MAX_LEN
}
