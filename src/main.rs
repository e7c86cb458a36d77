use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tagroute::{ParsedQuery, RoutingDocument, SearchConfig, SearchError, SearchService, report};
use tracing_subscriber::EnvFilter;

/// tagroute - find indexed code symbols by semantic tag
#[derive(Parser, Debug)]
#[command(name = "tagroute")]
#[command(about = "Search a code index by semantic tag groups")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Search symbols by tag groups and record tag usage
    Search(SearchCommand),
    /// Show the synonym groups a query expands to
    Groups(GroupsCommand),
}

/// Options shared by every command that reads the index
#[derive(Args, Debug)]
struct IndexArgs {
    /// Directory containing routing.json (default: .ai_context)
    #[arg(short, long, value_name = "DIR")]
    context: Option<PathBuf>,

    /// Tag groups: `a|b` for synonyms, `!x` or `-x` to exclude.
    /// Options must come before the first tag.
    #[arg(
        value_name = "TAGS",
        required = true,
        num_args = 1..,
        allow_hyphen_values = true,
        trailing_var_arg = true,
        value_parser = parse_tag_token
    )]
    tags: Vec<String>,
}

/// Accepts a tag token, rejecting `--option` values swallowed after the tags.
fn parse_tag_token(token: &str) -> Result<String, String> {
    if token.starts_with("--") {
        return Err(format!(
            "`{token}` looks like an option; options must come before the tags"
        ));
    }
    Ok(token.to_string())
}

/// Search symbols
#[derive(Parser, Debug)]
struct SearchCommand {
    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// Maximum number of results to print
    #[arg(short = 'n', long, value_name = "N")]
    limit: Option<usize>,

    /// Do not increment usage scores for the queried tags
    #[arg(long)]
    no_record: bool,

    #[command(flatten)]
    index: IndexArgs,
}

/// Show expanded groups
#[derive(Parser, Debug)]
struct GroupsCommand {
    #[command(flatten)]
    index: IndexArgs,
}

fn main() {
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();
    let config = SearchConfig::from_env();

    let result = match &cli.command {
        Commands::Search(cmd) => handle_search(cmd, config),
        Commands::Groups(cmd) => handle_groups(cmd, config),
    };

    if let Err(e) = result {
        // Determine exit code based on error type
        let exit_code = if is_user_error(&e) { 1 } else { 2 };
        eprintln!("Error: {e:#}");
        std::process::exit(exit_code);
    }
}

/// Installs the stderr log subscriber, filtered by `TAGROUTE_LOG`.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("TAGROUTE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Determines if an error is a user error (vs internal error).
///
/// User errors are empty queries and a missing index document.
/// Internal errors include I/O and JSON failures.
fn is_user_error(error: &anyhow::Error) -> bool {
    error
        .chain()
        .filter_map(|cause| cause.downcast_ref::<SearchError>())
        .any(SearchError::is_user_error)
}

/// Applies command-line overrides on top of the environment configuration.
fn resolve_config(mut config: SearchConfig, args: &IndexArgs) -> SearchConfig {
    if let Some(dir) = &args.context {
        config.context_dir = dir.clone();
    }
    config
}

/// Handles the search command: query, report, then record usage.
fn handle_search(cmd: &SearchCommand, config: SearchConfig) -> Result<()> {
    // Reject empty queries before touching the index
    let query = ParsedQuery::parse(&cmd.index.tags)?;

    let mut config = resolve_config(config, &cmd.index);
    if cmd.no_record {
        config.record_usage = false;
    }
    if cmd.limit.is_some() {
        config.limit = cmd.limit;
    }

    let document = RoutingDocument::open(config.index_path())?;
    execute_search(&query, cmd.json, &config, document, &mut io::stdout().lock())
}

/// Executes the search logic against a loaded document.
///
/// This function is separated from `handle_search` to allow testing with
/// in-memory documents and buffers.
fn execute_search(
    query: &ParsedQuery,
    json: bool,
    config: &SearchConfig,
    document: RoutingDocument,
    out: &mut impl Write,
) -> Result<()> {
    let mut service = SearchService::new(document);
    let outcome = service.search(query)?;

    if json {
        report::write_json(out, &outcome, config.limit).context("Failed to write report")?;
    } else {
        report::write_text(out, &outcome, query.flat_tags(), config.limit)
            .context("Failed to write report")?;
    }

    if !config.record_usage {
        return Ok(());
    }

    let incremented = service.record_usage(query);
    service.commit().context("Failed to save tag scores")?;

    if !json {
        if incremented.is_empty() {
            writeln!(out, "No tag scores to increment")?;
        } else {
            writeln!(out, "Tag scores incremented for: {}", incremented.join(", "))?;
        }
    }

    Ok(())
}

/// Handles the groups command by printing the expanded synonym clusters.
fn handle_groups(cmd: &GroupsCommand, config: SearchConfig) -> Result<()> {
    let query = ParsedQuery::parse(&cmd.index.tags)?;
    let config = resolve_config(config, &cmd.index);

    let document = RoutingDocument::open(config.index_path())?;
    let service = SearchService::new(document);
    let plan = service.plan(&query)?;

    report::write_plan(&mut io::stdout().lock(), &plan).context("Failed to write groups")?;
    Ok(())
}
