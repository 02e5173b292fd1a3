//! Logger setup for the binary.
//!
//! Logs go to stderr because stdout carries GTP responses.

use flexi_logger::{FlexiLoggerError, Logger, LoggerHandle, opt_format};

/// Start logging at the level given by `RUST_LOG`, or `spec` when unset.
///
/// Keep the returned handle alive for as long as logging is needed.
pub fn setup_logging(spec: &str) -> Result<LoggerHandle, FlexiLoggerError> {
    Logger::try_with_env_or_str(spec)?
        .log_to_stderr()
        .format(opt_format)
        .start()
}
