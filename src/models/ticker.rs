//! All-market ticker stream models.

use rust_decimal::Decimal;
use serde::Deserialize;

/// One symbol's raw 24h ticker statistics as published by the stream.
///
/// The feed sends many more fields per record (open/high/low, volumes,
/// trade counts); only the ones the view needs are deserialized, the rest
/// are ignored. Prices arrive as textual decimals.
#[derive(Debug, Clone, Deserialize)]
pub struct TickerSnapshot {
    #[serde(rename = "s")]
    pub symbol: String,
    /// Last traded price.
    #[serde(rename = "c")]
    pub last_price: String,
    /// 24h price change percent.
    #[serde(rename = "P")]
    pub change_pct: String,
}

/// One tracked pair in the live view, derived from the latest snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickerView {
    pub symbol: String,
    pub price: Decimal,
    pub change_pct: Decimal,
}

impl TryFrom<&TickerSnapshot> for TickerView {
    type Error = rust_decimal::Error;

    /// Parses the snapshot's textual decimals. A failure here means the
    /// single record is malformed; callers drop it and keep the batch.
    fn try_from(snapshot: &TickerSnapshot) -> Result<Self, Self::Error> {
        Ok(TickerView {
            symbol: snapshot.symbol.clone(),
            price: snapshot.last_price.parse()?,
            change_pct: snapshot.change_pct.parse()?,
        })
    }
}
