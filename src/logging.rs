//! Tracing subscriber setup for hosts and tests.
//!
//! The library itself only emits `tracing` events; nothing is printed until
//! the host installs a subscriber. [`init_tracing`] is a convenience for hosts
//! that don't have their own.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `credcache=debug`.
pub const LOG_ENV: &str = "CREDCACHE_LOG";

/// Build the filter from `CREDCACHE_LOG`, falling back to `default_directive`
/// when the variable is unset or does not parse.
pub fn env_filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive))
}

/// Install a global fmt subscriber.
///
/// Returns `false` if a global subscriber was already set (by an earlier call
/// or by the host); the existing one is left in place.
pub fn init_tracing(default_directive: &str) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_directive))
        .with_target(true)
        .compact()
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_env_filter_fallback() {
        std::env::remove_var(LOG_ENV);
        let filter = env_filter("credcache=debug");
        assert_eq!(filter.to_string(), "credcache=debug");
    }

    #[test]
    #[serial]
    fn test_env_filter_from_env() {
        std::env::set_var(LOG_ENV, "warn");
        let filter = env_filter("credcache=debug");
        std::env::remove_var(LOG_ENV);
        assert_eq!(filter.to_string(), "warn");
    }

    #[test]
    #[serial]
    fn test_init_is_idempotent() {
        let _ = init_tracing("info");
        assert!(!init_tracing("info"));
    }
}
