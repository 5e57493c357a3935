// ============================================================================
// cropwise-cli/src/logging.rs
// ============================================================================
//
// LOGGING SETUP: env_logger Initialization for the CLI
//
// The core library logs through the `log` facade. The CLI installs
// `env_logger` as the backend with a compact formatter: a timestamp, the
// level colored with `console`, and the message.
//
// USAGE:
// - default: info and above
// - --verbose: debug and above
// - RUST_LOG: overrides both (e.g. RUST_LOG=cropwise_core=trace)
//
// AI-ASSISTANT-INFO: Logging initialization for the CLI

use console::style;
use log::{Level, LevelFilter};
use std::io::Write;

/// The level used when `RUST_LOG` is not set.
#[must_use]
pub fn default_level(verbose: bool) -> LevelFilter {
    if verbose { LevelFilter::Debug } else { LevelFilter::Info }
}

/// Installs the global logger. Safe to call more than once; later calls are
/// ignored.
pub fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(default_level(verbose))
        .parse_default_env()
        .format(|buf, record| {
            let level = match record.level() {
                Level::Error => style("ERROR").red().bold(),
                Level::Warn => style("WARN ").yellow(),
                Level::Info => style("INFO ").cyan(),
                Level::Debug => style("DEBUG").magenta(),
                Level::Trace => style("TRACE").blue(),
            };
            writeln!(
                buf,
                "{} {} {}",
                style(buf.timestamp_seconds()).dim().for_stderr(),
                level.for_stderr(),
                record.args()
            )
        });

    if builder.try_init().is_err() {
        log::debug!("Logger already initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_level() {
        assert_eq!(default_level(false), LevelFilter::Info);
        assert_eq!(default_level(true), LevelFilter::Debug);
    }
}
