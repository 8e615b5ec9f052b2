//! Implementation of `logq tokens`.

use std::process::ExitCode;

use logq_query::tokenize_spanned;

use crate::cli::{args::TokensCommand, output::token_table};

/// Prints the token stream of a query as a table.
pub fn run(cmd: &TokensCommand) -> ExitCode {
    match tokenize_spanned(&cmd.query) {
        Ok(tokens) => {
            println!("{}", token_table(&tokens));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
