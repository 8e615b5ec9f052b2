//! Clap argument definitions for the `logq` CLI.

use clap::{ArgAction, Args, Parser, Subcommand};
use logq_config::OutputFormat;

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "logq")]
#[command(about = "Parse, inspect and normalize log search queries")]
pub struct Cli {
    /// Increase diagnostic logging (-v info, -vv debug); RUST_LOG overrides
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Shared output mode flags.
#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Output in JSON format
    #[arg(long, conflicts_with = "tree")]
    pub json: bool,

    /// Output the parsed AST as a tree
    #[arg(long)]
    pub tree: bool,
}

impl OutputArgs {
    /// Resolves the output format, falling back to the configured default.
    pub fn format(&self, default: OutputFormat) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else if self.tree {
            OutputFormat::Tree
        } else {
            default
        }
    }
}

/// Arguments for `logq parse`.
#[derive(Args, Debug, Clone)]
pub struct ParseCommand {
    /// Queries to parse
    #[arg(required = true)]
    pub queries: Vec<String>,

    #[command(flatten)]
    /// Output formatting flags.
    pub output: OutputArgs,

    /// Field searched by terms without a field prefix [default: content]
    #[arg(long, value_name = "NAME")]
    pub field: Option<String>,
}

/// Arguments for `logq tokens`.
#[derive(Args, Debug, Clone)]
pub struct TokensCommand {
    /// Query to tokenize
    pub query: String,
}

/// Arguments for `logq init`.
#[derive(Args, Debug, Clone)]
pub struct InitCommand {
    /// Create global ~/.logq.toml instead
    #[arg(long)]
    pub global: bool,

    /// Overwrite existing configuration file
    #[arg(long)]
    pub force: bool,
}

/// Supported `logq` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Parse queries and print their canonical form
    #[command(after_help = "\
QUERY SYNTAX:
  term                 Phrase match in the default field
  \"two words\"          One phrase
  field:value          Phrase match in a field
  field:*              Field has any value
  term1 term2          Both terms (implicit AND)
  term1 OR term2       Either term
  (expr)               Grouping
  field in [lo hi)     Range; [ ] include the bound, ( ) exclude it
  field < value        Comparison (<, <=, >, >=)

EXTRACTION:
  query | EXTRACT(field:\"regex\") AS(col1, col2) | col1:value

EXAMPLES:
  logq parse 'get images'
  logq parse 'host:web-1 (error OR warn)'
  logq parse 'status in [500 600)' --tree
  logq parse '* | EXTRACT(\"user=(\\w+)\") AS(user)' --json")]
    Parse(ParseCommand),

    /// Show the tokens of a query
    Tokens(TokensCommand),

    /// Initialize logq configuration in current directory
    Init(InitCommand),

    /// Show effective configuration settings
    Config,

    /// Validate configuration and diagnose issues
    Check,
}
