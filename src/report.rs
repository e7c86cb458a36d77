//! Plain-text and JSON renderings of a search outcome.

use std::io::{self, Write};

use serde::Serialize;

use crate::models::{MergedGroup, SearchResult};
use crate::service::{SearchOutcome, SearchPlan};

/// Writes the inclusion and exclusion clusters of a plan.
///
/// ```text
/// Semantic groups (OR within, AND across):
///   G1: sort, sorting
/// Exclude groups:
///   X1: mock
/// ---
/// ```
pub fn write_plan(out: &mut impl Write, plan: &SearchPlan) -> io::Result<()> {
    writeln!(out, "Semantic groups (OR within, AND across):")?;
    for (idx, group) in plan.groups.iter().enumerate() {
        writeln!(out, "  G{}: {group}", idx + 1)?;
    }
    if !plan.exclude_groups.is_empty() {
        writeln!(out, "Exclude groups:")?;
        for (idx, group) in plan.exclude_groups.iter().enumerate() {
            writeln!(out, "  X{}: {group}", idx + 1)?;
        }
    }
    writeln!(out, "---")
}

/// Writes the full text report: plan, results and the total count.
///
/// `flat_tags` are the queried tags echoed in the header. At most `limit`
/// results are printed; the total always counts every match.
pub fn write_text(
    out: &mut impl Write,
    outcome: &SearchOutcome,
    flat_tags: &[String],
    limit: Option<usize>,
) -> io::Result<()> {
    write_plan(out, &outcome.plan)?;

    let excluded = outcome.plan.exclude_groups.len();
    if excluded > 0 {
        writeln!(
            out,
            "Searching for tag groups: {} (excluding {excluded} group(s))",
            flat_tags.join(", ")
        )?;
    } else {
        writeln!(out, "Searching for tag groups: {}", flat_tags.join(", "))?;
    }
    writeln!(out, "---")?;

    let shown = limit.unwrap_or(outcome.results.len());
    for result in outcome.results.iter().take(shown) {
        write_result(out, result)?;
    }

    writeln!(out, "---")?;
    writeln!(out, "Found {} symbol(s)", outcome.results.len())
}

fn write_result(out: &mut impl Write, result: &SearchResult) -> io::Result<()> {
    writeln!(
        out,
        "{}:{} - {}",
        result.file_path, result.line, result.symbol_id
    )?;
    writeln!(out, "  brief: {}", result.brief)?;
    writeln!(out, "  tags: {}", result.tags.join(", "))?;
    writeln!(
        out,
        "  matched: {} tag(s), score: {}",
        result.match_count, result.score
    )?;
    writeln!(out)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReport<'a> {
    groups: &'a [MergedGroup],
    exclude_groups: &'a [MergedGroup],
    results: &'a [SearchResult],
    total: usize,
}

/// Writes the outcome as pretty-printed JSON, limited like [`write_text`].
pub fn write_json(
    out: &mut impl Write,
    outcome: &SearchOutcome,
    limit: Option<usize>,
) -> io::Result<()> {
    let shown = limit
        .unwrap_or(outcome.results.len())
        .min(outcome.results.len());

    let report = JsonReport {
        groups: &outcome.plan.groups,
        exclude_groups: &outcome.plan.exclude_groups,
        results: &outcome.results[..shown],
        total: outcome.results.len(),
    };

    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)
}
