//! Diagnostic logging setup.

use std::io;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Maps the `-v` count to a default filter directive.
fn default_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Initializes tracing on stderr for the given verbosity.
///
/// `RUST_LOG` takes precedence over the verbosity flag when set.
pub fn init(verbose: u8) {
    init_with_filter(default_filter(verbose));
}

/// Initializes tracing with a custom default filter.
fn init_with_filter(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(io::stderr))
        .init();
}
