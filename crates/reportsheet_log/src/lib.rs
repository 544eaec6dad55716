//! `reportsheet_log` v1:
//! Shared `tracing` subscriber setup for reportsheet binaries.

use std::io;

use tracing_subscriber::EnvFilter;

/// Level used when neither `RUST_LOG` nor a verbosity flag is given.
pub const C_LOG_LEVEL_DEFAULT: &str = "info";

/// Map a `-v` repetition count to a filter directive.
pub fn derive_log_level(n_verbose: u8) -> &'static str {
    match n_verbose {
        0 => C_LOG_LEVEL_DEFAULT,
        1 => "debug",
        _ => "trace",
    }
}

/// Install the global fmt subscriber, writing to stderr.
///
/// `RUST_LOG` wins over `level`. Calling this twice is harmless: the second
/// install fails and is ignored.
pub fn init_logging(level: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.unwrap_or(C_LOG_LEVEL_DEFAULT)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::{derive_log_level, init_logging};

    #[test]
    fn test_verbosity_maps_to_levels() {
        assert_eq!(derive_log_level(0), "info");
        assert_eq!(derive_log_level(1), "debug");
        assert_eq!(derive_log_level(5), "trace");
    }

    #[test]
    fn test_repeated_init_does_not_panic() {
        init_logging(Some("debug"));
        init_logging(None);
        tracing::info!("logging initialised");
    }
}
