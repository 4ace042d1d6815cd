//! Logging bootstrap: `log` records go to stderr through flexi_logger.
//!
//! `RUST_LOG` wins over the verbosity flags when set.

use flexi_logger::{Logger, LoggerHandle};

/// Level spec used when `RUST_LOG` is unset.
pub fn default_level(verbose: bool, quiet: bool) -> &'static str {
    match (verbose, quiet) {
        (true, _) => "info",
        (false, true) => "error",
        (false, false) => "warn",
    }
}

/// Start the logger. The returned handle must stay alive for the whole run.
pub fn init(verbose: bool, quiet: bool) -> Result<LoggerHandle, String> {
    Logger::try_with_env_or_str(default_level(verbose, quiet))
        .and_then(|logger| logger.log_to_stderr().start())
        .map_err(|e| format!("failed to initialize logging: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_beats_quiet() {
        assert_eq!(default_level(false, false), "warn");
        assert_eq!(default_level(true, false), "info");
        assert_eq!(default_level(false, true), "error");
        assert_eq!(default_level(true, true), "info");
    }
}
