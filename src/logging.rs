//! Diagnostic logging for the client.
//!
//! Log output goes to stderr so it never mixes with replies on stdout.
//! `RUST_LOG` takes precedence over the level chosen on the command line.

use tracing_subscriber::EnvFilter;

pub const DEFAULT_LEVEL: &str = "warn";
pub const VERBOSE_LEVEL: &str = "debug";

fn filter_for(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("reasonstream={level}")))
}

/// Install the global subscriber. Calling it again is a no-op.
pub fn init(level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter_for(level))
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}
