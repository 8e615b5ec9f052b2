//! Rendering and JSON serialization for CLI output.

use std::process::ExitCode;

use comfy_table::{Cell, Table, presets::UTF8_FULL_CONDENSED};
use logq_config::OutputFormat;
use logq_query::{Canonical, LogPipeStatement, Query, SpannedToken};
use serde::Serialize;

/// JSON output for a single parsed query.
#[derive(Serialize)]
struct JsonParsedQuery<'a> {
    /// The original query string.
    query: &'a str,
    /// Canonical condition text.
    canonical: String,
    /// Parsed statements.
    statements: &'a [LogPipeStatement],
}

/// JSON output for `logq parse`.
#[derive(Serialize)]
struct JsonParseOutput<'a> {
    /// Results in input order.
    queries: Vec<JsonParsedQuery<'a>>,
}

/// Outputs parsed queries in the given format.
pub fn print_queries(parsed: &[(&str, Query)], format: OutputFormat) -> ExitCode {
    match format {
        OutputFormat::Canonical => {
            for (_, query) in parsed {
                println!("{}", query.to_canonical_string());
            }
        }
        OutputFormat::Tree => {
            for (i, (input, query)) in parsed.iter().enumerate() {
                if i > 0 {
                    println!();
                }
                println!("Query: {input}");
                print!("{query}");
            }
        }
        OutputFormat::Json => {
            let output = JsonParseOutput {
                queries: parsed
                    .iter()
                    .map(|(input, query)| JsonParsedQuery {
                        query: input,
                        canonical: query.to_canonical_string(),
                        statements: &query.statements,
                    })
                    .collect(),
            };
            match serde_json::to_string_pretty(&output) {
                Ok(json_str) => println!("{json_str}"),
                Err(e) => {
                    eprintln!("error: failed to serialize JSON: {e}");
                    return ExitCode::FAILURE;
                }
            }
        }
    }
    ExitCode::SUCCESS
}

/// Builds a table listing each token with its byte offset.
pub fn token_table(tokens: &[SpannedToken]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["#", "Offset", "Kind", "Text"]);
    for (i, spanned) in tokens.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i),
            Cell::new(spanned.offset),
            Cell::new(spanned.token.kind().to_string()),
            Cell::new(spanned.token.text().unwrap_or_default()),
        ]);
    }
    table
}
