//! Batch reconciliation for the live ticker view.

use tracing::{debug, warn};

use crate::models::ticker::{TickerSnapshot, TickerView};

/// The live, filtered view of all tracked trading pairs.
///
/// Each incoming batch replaces the whole view; there is no per-symbol
/// merging, so a symbol missing from one batch disappears until it shows
/// up again. The board holds no I/O; the stream driver feeds it decoded
/// batches and reads the result back out.
#[derive(Debug, Clone)]
pub struct TickerBoard {
    quote_suffix: String,
    views: Vec<TickerView>,
    highlighted: bool,
    ready: bool,
}

impl TickerBoard {
    #[must_use]
    pub fn new(quote_suffix: impl Into<String>) -> Self {
        Self {
            quote_suffix: quote_suffix.into(),
            views: Vec::new(),
            highlighted: false,
            ready: false,
        }
    }

    /// Applies one snapshot batch.
    ///
    /// Records whose symbol does not end with the quote suffix are
    /// dropped. A record that fails to decode or whose price fields are
    /// not numeric is dropped on its own; the rest of the batch still
    /// replaces the view. Marks the board highlighted and ready.
    pub fn apply_batch(&mut self, batch: &[serde_json::Value]) {
        let mut next = Vec::new();

        for record in batch {
            let snapshot: TickerSnapshot = match serde_json::from_value(record.clone()) {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    warn!(error = %e, "Dropping undecodable ticker record");
                    continue;
                }
            };

            if !snapshot.symbol.ends_with(&self.quote_suffix) {
                continue;
            }

            match TickerView::try_from(&snapshot) {
                Ok(view) => next.push(view),
                Err(e) => {
                    warn!(symbol = snapshot.symbol, error = %e, "Dropping malformed ticker record");
                }
            }
        }

        debug!(pairs = next.len(), batch = batch.len(), "Applied ticker batch");
        self.views = next;
        self.highlighted = true;
        self.ready = true;
    }

    /// Ends the highlight window armed by the last applied batch.
    pub fn clear_highlight(&mut self) {
        self.highlighted = false;
    }

    /// The current view, one entry per tracked pair in batch order.
    #[must_use]
    pub fn views(&self) -> &[TickerView] {
        &self.views
    }

    /// True from the moment a batch is applied until the highlight
    /// window elapses.
    #[must_use]
    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }

    /// True once at least one batch has been applied. Before this the
    /// empty view means "no data yet", not an authoritative empty list.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn record(symbol: &str, price: &str, change: &str) -> serde_json::Value {
        serde_json::json!({ "s": symbol, "c": price, "P": change })
    }

    #[test]
    fn filters_to_quote_suffix_and_replaces_view() {
        let mut board = TickerBoard::new("USDT");
        board.apply_batch(&[
            record("BTCUSDT", "65000.12", "1.5"),
            record("ETHBTC", "0.05", "-0.2"),
        ]);

        assert_eq!(board.views().len(), 1);
        let view = &board.views()[0];
        assert_eq!(view.symbol, "BTCUSDT");
        assert_eq!(view.price, dec!(65000.12));
        assert_eq!(view.change_pct, dec!(1.5));
        assert!(board.is_highlighted());
        assert!(board.is_ready());
    }

    #[test]
    fn missing_symbol_disappears_until_it_returns() {
        let mut board = TickerBoard::new("USDT");
        board.apply_batch(&[
            record("BTCUSDT", "65000.0", "1.0"),
            record("ETHUSDT", "2250.0", "-0.5"),
        ]);
        board.apply_batch(&[record("ETHUSDT", "2251.0", "-0.4")]);

        let symbols: Vec<&str> = board.views().iter().map(|v| v.symbol.as_str()).collect();
        assert_eq!(symbols, ["ETHUSDT"]);

        board.apply_batch(&[
            record("BTCUSDT", "65010.0", "1.1"),
            record("ETHUSDT", "2252.0", "-0.3"),
        ]);
        assert_eq!(board.views().len(), 2);
    }

    #[test]
    fn malformed_record_does_not_poison_the_batch() {
        let mut board = TickerBoard::new("USDT");
        board.apply_batch(&[
            record("BTCUSDT", "sixty-five-thousand", "1.5"),
            record("ETHUSDT", "2250.55", "-0.68"),
            serde_json::json!({ "unexpected": true }),
        ]);

        assert_eq!(board.views().len(), 1);
        assert_eq!(board.views()[0].symbol, "ETHUSDT");
    }

    #[test]
    fn filter_is_idempotent_on_its_own_output() {
        let mut board = TickerBoard::new("USDT");
        board.apply_batch(&[
            record("BTCUSDT", "65000.12", "1.5"),
            record("ETHBTC", "0.05", "-0.2"),
        ]);

        let kept: Vec<TickerView> = board
            .views()
            .iter()
            .filter(|v| v.symbol.ends_with("USDT"))
            .cloned()
            .collect();
        assert_eq!(kept, board.views());
    }

    #[test]
    fn not_ready_before_first_batch() {
        let board = TickerBoard::new("USDT");
        assert!(!board.is_ready());
        assert!(!board.is_highlighted());
        assert!(board.views().is_empty());
    }

    #[test]
    fn clear_highlight_keeps_the_view() {
        let mut board = TickerBoard::new("USDT");
        board.apply_batch(&[record("BTCUSDT", "65000.0", "1.0")]);
        board.clear_highlight();

        assert!(!board.is_highlighted());
        assert!(board.is_ready());
        assert_eq!(board.views().len(), 1);
    }
}
