//! 24h statistics summary models.

use rust_decimal::Decimal;

use crate::error::CoinwatchError;

/// A one-shot snapshot of a pair's 24h statistics.
///
/// Computed once per detail-screen entry from the REST ticker endpoint;
/// never live-updated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailSummary {
    pub last_price: Decimal,
    pub change_pct: Decimal,
    pub high_24h: Decimal,
    pub low_24h: Decimal,
    pub volume_24h: Decimal,
}

impl DetailSummary {
    /// Parses the five required fields out of a raw 24h statistics
    /// response. Unknown fields are tolerated.
    ///
    /// # Errors
    ///
    /// Returns [`CoinwatchError::MalformedResponse`] naming the first
    /// field that is missing or not a textual decimal. No partial
    /// summary is ever produced.
    pub fn from_response(body: &serde_json::Value) -> crate::Result<Self> {
        Ok(DetailSummary {
            last_price: decimal_field(body, "lastPrice")?,
            change_pct: decimal_field(body, "priceChangePercent")?,
            high_24h: decimal_field(body, "highPrice")?,
            low_24h: decimal_field(body, "lowPrice")?,
            volume_24h: decimal_field(body, "volume")?,
        })
    }
}

/// Extracts one textual decimal field from a JSON object.
fn decimal_field(body: &serde_json::Value, field: &str) -> crate::Result<Decimal> {
    body.get(field)
        .and_then(serde_json::Value::as_str)
        .and_then(|raw| raw.parse().ok())
        .ok_or_else(|| {
            CoinwatchError::MalformedResponse(format!("{field} is missing or not a decimal"))
        })
}
