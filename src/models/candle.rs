//! Historical candle (kline) models.

use chrono::DateTime;
use rust_decimal::Decimal;

use crate::error::CoinwatchError;

/// One chart-ready point derived from a historical bar.
///
/// `label` is the UTC rendering of the bar's open time; `value` is the
/// bar's open price. A series of these is chronological in upstream
/// response order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandlePoint {
    pub label: String,
    pub value: Decimal,
}

impl CandlePoint {
    /// Builds a point from one positional kline bar.
    ///
    /// The klines endpoint returns each bar as a heterogeneous array;
    /// only the first two elements are consumed: `[0]` open time in epoch
    /// milliseconds, `[1]` open price as a textual decimal.
    ///
    /// # Errors
    ///
    /// Returns [`CoinwatchError::MalformedResponse`] if the bar is not an
    /// array, the open time is not an integer timestamp, or the open
    /// price is not a parseable decimal.
    pub fn from_bar(bar: &serde_json::Value) -> crate::Result<Self> {
        let elements = bar
            .as_array()
            .ok_or_else(|| CoinwatchError::MalformedResponse("kline bar is not an array".into()))?;

        let open_time = elements
            .first()
            .and_then(serde_json::Value::as_i64)
            .ok_or_else(|| {
                CoinwatchError::MalformedResponse("kline bar has no integer open time".into())
            })?;

        let open_price: Decimal = elements
            .get(1)
            .and_then(serde_json::Value::as_str)
            .and_then(|raw| raw.parse().ok())
            .ok_or_else(|| {
                CoinwatchError::MalformedResponse("kline bar has no decimal open price".into())
            })?;

        Ok(CandlePoint {
            label: render_open_time(open_time),
            value: open_price,
        })
    }
}

/// Renders an epoch-millisecond open time as a UTC date string
/// (`Thu, 01 Jan 1970 00:00:00 GMT`).
fn render_open_time(millis: i64) -> String {
    match DateTime::from_timestamp_millis(millis) {
        Some(ts) => ts.format("%a, %d %b %Y %H:%M:%S GMT").to_string(),
        // Out-of-range timestamps only occur on a broken feed; show the
        // raw value rather than dropping the bar.
        None => millis.to_string(),
    }
}
