use std::collections::HashSet;

/// Canonicalizes tags into lowercase snake_case.
///
/// Normalization is idempotent and total: it never fails, and an input with
/// no alphanumeric content normalizes to the empty string, which callers
/// treat as "no tag".
pub struct TagNormalizer;

impl TagNormalizer {
    /// Normalizes a single tag.
    ///
    /// # Normalization rules
    ///
    /// - Trims and converts to lowercase
    /// - Replaces each run of whitespace, hyphens or dots with one underscore
    /// - Collapses consecutive underscores into one
    /// - Strips leading and trailing underscores
    /// - Returns an empty string when nothing alphanumeric remains
    ///
    /// # Examples
    ///
    /// ```
    /// use tagroute::tags::TagNormalizer;
    ///
    /// assert_eq!(TagNormalizer::normalize_tag("Bubble Sort"), "bubble_sort");
    /// assert_eq!(TagNormalizer::normalize_tag("node.js"), "node_js");
    /// assert_eq!(TagNormalizer::normalize_tag("  --rest-api__  "), "rest_api");
    /// assert_eq!(TagNormalizer::normalize_tag("..."), "");
    /// ```
    #[must_use]
    pub fn normalize_tag(tag: &str) -> String {
        let lowered = tag.trim().to_lowercase();
        if !lowered.chars().any(char::is_alphanumeric) {
            return String::new();
        }

        let mut normalized = String::with_capacity(lowered.len());
        for c in lowered.chars() {
            let c = if c.is_whitespace() || c == '-' || c == '.' {
                '_'
            } else {
                c
            };
            // Separator runs and underscore runs both end up as one underscore
            if c == '_' && (normalized.is_empty() || normalized.ends_with('_')) {
                continue;
            }
            normalized.push(c);
        }

        normalized.trim_end_matches('_').to_string()
    }

    /// Normalizes a collection of tags, dropping empties and duplicates.
    ///
    /// Keeps the first occurrence of each normalized tag, in input order.
    ///
    /// # Examples
    ///
    /// ```
    /// use tagroute::tags::TagNormalizer;
    ///
    /// let tags = TagNormalizer::normalize_tags(["Sort", "sort", "--", "Bubble Sort"]);
    /// assert_eq!(tags, vec!["sort", "bubble_sort"]);
    /// ```
    #[must_use]
    pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        tags.into_iter()
            .map(|tag| Self::normalize_tag(tag.as_ref()))
            .filter(|tag| !tag.is_empty() && seen.insert(tag.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercase_conversion() {
        assert_eq!(TagNormalizer::normalize_tag("SORT"), "sort");
        assert_eq!(TagNormalizer::normalize_tag("SoRt"), "sort");
    }

    #[test]
    fn test_separator_runs_become_single_underscore() {
        assert_eq!(TagNormalizer::normalize_tag("bubble sort"), "bubble_sort");
        assert_eq!(TagNormalizer::normalize_tag("bubble - sort"), "bubble_sort");
        assert_eq!(TagNormalizer::normalize_tag("a.b-c d"), "a_b_c_d");
        assert_eq!(TagNormalizer::normalize_tag("rest\t\napi"), "rest_api");
    }

    #[test]
    fn test_underscore_runs_collapse() {
        assert_eq!(TagNormalizer::normalize_tag("rest___api"), "rest_api");
        assert_eq!(TagNormalizer::normalize_tag("rest_-_api"), "rest_api");
    }

    #[test]
    fn test_trimming_underscores() {
        assert_eq!(TagNormalizer::normalize_tag("__sort__"), "sort");
        assert_eq!(TagNormalizer::normalize_tag("  -.sort.-  "), "sort");
    }

    #[test]
    fn test_other_characters_are_kept() {
        assert_eq!(TagNormalizer::normalize_tag("c++"), "c++");
        assert_eq!(TagNormalizer::normalize_tag("气泡排序"), "气泡排序");
    }

    #[test]
    fn test_no_alphanumeric_content_yields_empty() {
        assert_eq!(TagNormalizer::normalize_tag(""), "");
        assert_eq!(TagNormalizer::normalize_tag("   "), "");
        assert_eq!(TagNormalizer::normalize_tag("-.-"), "");
        assert_eq!(TagNormalizer::normalize_tag("!!"), "");
    }

    #[test]
    fn test_unicode_separators() {
        assert_eq!(TagNormalizer::normalize_tag("\u{3000}a"), "a");
        assert_eq!(TagNormalizer::normalize_tag("a.\t-_b"), "a_b");
        assert_eq!(TagNormalizer::normalize_tag("ß-Straße"), "ß_straße");
        assert_eq!(TagNormalizer::normalize_tag("气泡\u{3000}排序"), "气泡_排序");
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "Bubble Sort",
            "  --rest-API__ ",
            "a..b",
            "x_ _y",
            "  ",
            "MiXeD.Case-Tag",
            "_",
            "\u{3000}a",
            "a.\t-_b",
            "ß-Straße",
            "Ωmega\u{2003}.\u{00A0}Δelta",
            "İstanbul-_-",
            "!_a_!",
            "气泡\u{3000}排序",
        ];
        for input in inputs {
            let once = TagNormalizer::normalize_tag(input);
            assert_eq!(TagNormalizer::normalize_tag(&once), once, "input: {input:?}");
        }
    }

    #[test]
    fn test_normalize_tags_preserves_first_occurrence() {
        let tags = TagNormalizer::normalize_tags(["Mock", "sort", "mock", "", "SORT"]);
        assert_eq!(tags, vec!["mock", "sort"]);
    }
}
