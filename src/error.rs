//! Crate-level error types.
//!
//! [`CoinwatchError`] unifies every error source (configuration, WebSocket
//! transport, HTTP transport, JSON) behind a single enum so callers can
//! match on the variant they care about while still using the `?` operator
//! for easy propagation.

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CoinwatchError>;

/// Top-level error type returned by all public APIs.
#[derive(Debug, thiserror::Error)]
pub enum CoinwatchError {
    /// A configuration value was missing or could not be parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// A WebSocket operation (connect, receive) failed.
    #[error("websocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    /// An HTTP request failed at the transport level (includes timeouts).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// A REST response was structurally valid JSON but a required field
    /// was missing or not a parseable decimal. The whole call fails;
    /// market data is never substituted with defaults.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}
