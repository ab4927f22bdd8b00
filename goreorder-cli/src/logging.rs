//! Logging setup for the CLI
//!
//! Events go to stderr so they never mix with reordered output on stdout.

use std::io;

use tracing::Level;
use tracing_subscriber::{filter::Targets, fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer};

/// Install the global subscriber. `goreorder` events are shown from `debug` when verbose.
pub fn init(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let targets = Targets::new()
        .with_default(Level::WARN)
        .with_target("goreorder", level);

    let layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(verbose)
        .without_time()
        .with_filter(targets);

    // A second call keeps the first subscriber
    let _ = tracing_subscriber::registry().with(layer).try_init();
}
