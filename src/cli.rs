//! CLI argument parsing and command handlers

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::config::{resolve_config, SearchConfig};
use crate::engine::SearchEngine;
use crate::formatter::OutputFormatter;
use crate::models::SearchableItem;
use crate::output;
use crate::query::{format_query, parse_search};
use crate::results::separate_results_by_entity;

/// rfs: boolean key:value search over cloud resource records
#[derive(Parser, Debug)]
#[command(
    name = "rfs",
    version,
    about = "Filter cloud resource records with refined search queries",
    long_about = "Runs refined search queries (label:web AND tags:prod, -tag:staging, \
                  2001:db8::1) against a JSON list of searchable items."
)]
pub struct Cli {
    /// Enable verbose logging (can be repeated for more verbosity)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file (defaults to ~/.refined-search/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search a list of items
    ///
    /// Query syntax:
    ///   - Free text:       web-server        (label, tags and ips)
    ///   - Field:           label:web  tags:prod,eu  ip:10.0
    ///   - Negation:        -tag:staging
    ///   - Boolean:         label:web AND tags:prod, a OR b, a && b, (a OR b) c
    Search {
        /// Search query
        query: String,

        /// JSON (or .json5) file holding an array of searchable items
        #[arg(short, long, value_name = "FILE")]
        items: PathBuf,

        /// Output format as JSON
        #[arg(long)]
        json: bool,

        /// Pretty-print JSON output (only with --json)
        #[arg(long)]
        pretty: bool,

        /// Group results by entity type (JSON output)
        #[arg(short, long)]
        group: bool,

        /// Match case exactly
        #[arg(short = 'c', long)]
        case_sensitive: bool,

        /// Only print the number of matches
        #[arg(long)]
        count: bool,

        /// Use plain text output (disable colors)
        #[arg(long)]
        plain: bool,
    },

    /// Show how a query is normalized and parsed
    Parse {
        /// Search query
        query: String,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
}

impl Cli {
    /// Execute the parsed command
    pub fn execute(self) -> Result<()> {
        let log_level = match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
            .init();

        match self.command {
            Command::Search { query, items, json, pretty, group, case_sensitive, count, plain } => {
                let config = resolve_config(self.config.as_deref())?;
                handle_search(&config, &query, &items, json, pretty, group, case_sensitive, count, plain)
            }
            Command::Parse { query, pretty } => handle_parse(&query, pretty),
        }
    }
}

/// Read searchable items from a JSON or JSON5 file
pub fn load_items(path: &Path) -> Result<Vec<SearchableItem>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read items file {}", path.display()))?;

    let items: Vec<SearchableItem> = if path.extension().is_some_and(|ext| ext == "json5") {
        json5::from_str(&text)
            .with_context(|| format!("Failed to parse JSON5 items in {}", path.display()))?
    } else {
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse JSON items in {}", path.display()))?
    };

    log::debug!("Loaded {} items from {}", items.len(), path.display());
    Ok(items)
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(text)
}

#[allow(clippy::too_many_arguments)]
fn handle_search(
    config: &SearchConfig,
    query: &str,
    items_path: &Path,
    as_json: bool,
    pretty_json: bool,
    group: bool,
    case_sensitive: bool,
    count_only: bool,
    plain: bool,
) -> Result<()> {
    log::info!("Starting search command");

    let items = load_items(items_path)?;
    let engine = SearchEngine::new(config).case_sensitive(config.case_sensitive || case_sensitive);
    let results = engine.refined_search(query, &items);

    if count_only {
        if as_json {
            let count_response = serde_json::json!({ "count": results.len() });
            println!("{}", to_json(&count_response, pretty_json)?);
        } else {
            println!("Found {} results", results.len());
        }
        return Ok(());
    }

    if as_json {
        let json_output = if group {
            to_json(&separate_results_by_entity(results.iter().copied()), pretty_json)?
        } else {
            to_json(&results, pretty_json)?
        };
        println!("{}", json_output);
        return Ok(());
    }

    if results.is_empty() {
        output::warn(&format!("No items matched '{}'", format_query(query)));
        return Ok(());
    }

    let formatter = OutputFormatter::new(plain);
    print!("{}", formatter.render(&separate_results_by_entity(results.iter().copied())));
    println!("Found {} results", results.len());

    Ok(())
}

fn handle_parse(query: &str, pretty_json: bool) -> Result<()> {
    log::info!("Parsing query");

    let parsed = parse_search(&format_query(query));
    println!("{}", to_json(&parsed, pretty_json)?);

    Ok(())
}
