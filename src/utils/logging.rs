//! Logging setup for hdls.
//!
//! Logs go to stderr through `env_logger`, so they never mix into the listing on stdout.

use log::LevelFilter;

/// Maps the `-v` count to a level filter. `RUST_LOG` still takes precedence.
pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

pub fn init_logging(verbosity: u8) {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(level_for(verbosity))
        .format_timestamp(None)
        .format_target(false)
        .parse_default_env();
    // A logger may already be installed by a test harness.
    let _ = builder.try_init();
}
