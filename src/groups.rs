//! Query group expansion, synonym clustering and per-symbol evaluation.
//!
//! A query is conjunctive over synonym clusters: every inclusion cluster
//! must hit at least one symbol tag, and no exclusion cluster may hit any.
//!
//! # Algorithm
//!
//! 1. [`GroupBuilder`] expands each query group through the alias
//!    vocabulary (one hop to the canonical tag and back out to its aliases)
//! 2. Expanded groups sharing any tag are merged into connected clusters
//! 3. [`GroupEvaluator`] scans a symbol's tags against each cluster with
//!    [`TagMatcher`](crate::tags::TagMatcher)

mod builder;
mod evaluator;

pub use builder::GroupBuilder;
pub use evaluator::{GroupEvaluation, GroupEvaluator};
