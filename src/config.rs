//! Application configuration loaded from environment variables.
//!
//! All values are optional and fall back to the public Binance endpoints:
//! - `COINWATCH_STREAM_URL` — WebSocket all-market ticker stream
//! - `COINWATCH_REST_URL` — REST API base URL
//! - `COINWATCH_QUOTE_SUFFIX` — quote currency used to filter pairs
//! - `COINWATCH_HIGHLIGHT_MS` — highlight window after each batch, in ms
//! - `COINWATCH_REQUEST_TIMEOUT_SECS` — per-request REST timeout

use std::time::Duration;

/// Default all-market ticker stream endpoint.
const DEFAULT_STREAM_URL: &str = "wss://stream.binance.com:9443/ws/!ticker@arr";

/// Default REST API base URL.
const DEFAULT_REST_URL: &str = "https://api.binance.com";

/// Default quote suffix used to filter tradable pairs.
const DEFAULT_QUOTE_SUFFIX: &str = "USDT";

/// Default highlight window after each applied batch.
const DEFAULT_HIGHLIGHT_MS: u64 = 100;

/// Default REST request timeout.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Top-level application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub stream_url: String,
    pub rest_url: String,
    pub quote_suffix: String,
    pub highlight_window: Duration,
    pub request_timeout: Duration,
}

/// Loads the application configuration from environment variables.
///
/// Every variable is optional; unset or empty variables fall back to the
/// public Binance defaults.
///
/// # Errors
///
/// Returns [`CoinwatchError::Config`](crate::CoinwatchError::Config) if
/// `COINWATCH_HIGHLIGHT_MS` or `COINWATCH_REQUEST_TIMEOUT_SECS` is set but
/// does not parse as an integer.
pub fn fetch_config() -> crate::Result<AppConfig> {
    let stream_url =
        non_empty_var("COINWATCH_STREAM_URL").unwrap_or_else(|| DEFAULT_STREAM_URL.to_string());
    let rest_url =
        non_empty_var("COINWATCH_REST_URL").unwrap_or_else(|| DEFAULT_REST_URL.to_string());
    let quote_suffix =
        non_empty_var("COINWATCH_QUOTE_SUFFIX").unwrap_or_else(|| DEFAULT_QUOTE_SUFFIX.to_string());

    let highlight_ms = parse_var("COINWATCH_HIGHLIGHT_MS", DEFAULT_HIGHLIGHT_MS)?;
    let timeout_secs = parse_var("COINWATCH_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?;

    Ok(AppConfig {
        stream_url,
        rest_url,
        quote_suffix,
        highlight_window: Duration::from_millis(highlight_ms),
        request_timeout: Duration::from_secs(timeout_secs),
    })
}

/// Returns the value of an environment variable if it exists and is non-empty.
fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

/// Parses an integer environment variable, falling back to `default` when unset.
fn parse_var(name: &str, default: u64) -> crate::Result<u64> {
    match non_empty_var(name) {
        Some(raw) => raw
            .parse()
            .map_err(|_| crate::CoinwatchError::Config(format!("{name} is not an integer: {raw}"))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper that temporarily sets env vars, runs `f`, then restores originals.
    ///
    /// # Safety
    ///
    /// Tests using this helper must run with `--test-threads=1` or otherwise
    /// ensure no other threads read these env vars concurrently.
    fn with_env<F: FnOnce()>(vars: &[(&str, Option<&str>)], f: F) {
        let originals: Vec<(&str, Option<String>)> = vars
            .iter()
            .map(|(k, _)| (*k, std::env::var(k).ok()))
            .collect();

        for (k, v) in vars {
            // SAFETY: config tests run single-threaded (see test runner config).
            unsafe {
                match v {
                    Some(val) => std::env::set_var(k, val),
                    None => std::env::remove_var(k),
                }
            }
        }

        f();

        for (k, original) in originals {
            // SAFETY: restoring original values, same single-threaded context.
            unsafe {
                match original {
                    Some(val) => std::env::set_var(k, val),
                    None => std::env::remove_var(k),
                }
            }
        }
    }

    #[test]
    fn defaults_without_env_vars() {
        with_env(
            &[
                ("COINWATCH_STREAM_URL", None),
                ("COINWATCH_REST_URL", None),
                ("COINWATCH_QUOTE_SUFFIX", None),
                ("COINWATCH_HIGHLIGHT_MS", None),
                ("COINWATCH_REQUEST_TIMEOUT_SECS", None),
            ],
            || {
                let config = fetch_config().unwrap();
                assert_eq!(config.stream_url, DEFAULT_STREAM_URL);
                assert_eq!(config.rest_url, DEFAULT_REST_URL);
                assert_eq!(config.quote_suffix, "USDT");
                assert_eq!(config.highlight_window, Duration::from_millis(100));
                assert_eq!(config.request_timeout, Duration::from_secs(10));
            },
        );
    }

    #[test]
    fn custom_values_from_env() {
        with_env(
            &[
                ("COINWATCH_STREAM_URL", Some("wss://custom.example.com/ws")),
                ("COINWATCH_QUOTE_SUFFIX", Some("EUR")),
                ("COINWATCH_HIGHLIGHT_MS", Some("250")),
            ],
            || {
                let config = fetch_config().unwrap();
                assert_eq!(config.stream_url, "wss://custom.example.com/ws");
                assert_eq!(config.quote_suffix, "EUR");
                assert_eq!(config.highlight_window, Duration::from_millis(250));
            },
        );
    }

    #[test]
    fn rejects_non_integer_highlight_window() {
        with_env(&[("COINWATCH_HIGHLIGHT_MS", Some("fast"))], || {
            let err = fetch_config().unwrap_err();
            assert!(err.to_string().contains("COINWATCH_HIGHLIGHT_MS"));
        });
    }

    #[test]
    fn empty_values_treated_as_absent() {
        with_env(
            &[
                ("COINWATCH_STREAM_URL", Some("")),
                ("COINWATCH_QUOTE_SUFFIX", Some("")),
                ("COINWATCH_HIGHLIGHT_MS", Some("")),
            ],
            || {
                let config = fetch_config().unwrap();
                assert_eq!(config.stream_url, DEFAULT_STREAM_URL);
                assert_eq!(config.quote_suffix, "USDT");
                assert_eq!(config.highlight_window, Duration::from_millis(100));
            },
        );
    }
}
