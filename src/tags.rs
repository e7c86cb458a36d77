//! Tag canonicalization and pairwise tag matching.
//!
//! Every decision the search engine makes about tags goes through these two
//! components: [`TagNormalizer`] turns raw user or index spellings into a
//! comparable snake_case form, and [`TagMatcher`] decides whether a query tag
//! and a symbol tag refer to the same facet.
//!
//! # Examples
//!
//! ```
//! use tagroute::tags::{TagMatcher, TagNormalizer};
//!
//! let query = TagNormalizer::normalize_tag("Bubble-Sort");
//! assert_eq!(query, "bubble_sort");
//!
//! // Long tags match by containment in either direction
//! assert!(TagMatcher::matches("sort", "bubble_sort"));
//!
//! // Short tags only match exactly
//! assert!(!TagMatcher::matches("io", "audio"));
//! ```

mod matcher;
mod normalizer;

pub use matcher::{SHORT_TAG_MAX_LEN, TagMatcher};
pub use normalizer::TagNormalizer;
