//! Tracing subscriber initialization.
//!
//! Logs go to stderr so that stdout stays clean for the report or JSON.

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Error type for logging initialization failures.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// Tracing subscriber already initialized
    #[error("Tracing subscriber already initialized")]
    SubscriberAlreadySet,
}

/// Filter directive for a `-v` count: warnings by default, debug with `-v`.
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        _ => "debug",
    }
}

/// Initialize the tracing subscriber.
///
/// Respects `RUST_LOG`; otherwise the level follows `verbosity`.
///
/// # Returns
/// * `Ok(())` if initialization succeeded
/// * `Err(LoggingError)` if a subscriber was already initialized
pub fn init(verbosity: u8) -> Result<(), LoggingError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|_| LoggingError::SubscriberAlreadySet)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_maps_to_level() {
        assert_eq!(default_directive(0), "warn");
        assert_eq!(default_directive(1), "debug");
        assert_eq!(default_directive(3), "debug");
    }

    #[test]
    fn second_init_fails() {
        // The first call may lose to another test; the second never succeeds.
        let _ = init(0);
        assert!(matches!(init(0), Err(LoggingError::SubscriberAlreadySet)));
    }
}
