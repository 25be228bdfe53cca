//! Batch reconciliation semantics of the live ticker view.

use rust_decimal_macros::dec;

use coinwatch::stream::TickerBoard;

fn batch(records: &[(&str, &str, &str)]) -> Vec<serde_json::Value> {
    records
        .iter()
        .map(|(symbol, price, change)| {
            serde_json::json!({
                "e": "24hrTicker",
                "s": symbol,
                "c": price,
                "P": change,
                "v": "1000.0"
            })
        })
        .collect()
}

#[test]
fn view_is_the_suffix_filtered_batch() {
    let mut board = TickerBoard::new("USDT");
    board.apply_batch(&batch(&[
        ("BTCUSDT", "65000.12", "1.5"),
        ("ETHBTC", "0.05", "-0.2"),
        ("SOLUSDT", "140.25", "3.2"),
    ]));

    let symbols: Vec<&str> = board.views().iter().map(|v| v.symbol.as_str()).collect();
    assert_eq!(symbols, ["BTCUSDT", "SOLUSDT"]);
    assert_eq!(board.views()[0].price, dec!(65000.12));
    assert_eq!(board.views()[0].change_pct, dec!(1.5));
    assert!(board.is_highlighted());
}

#[test]
fn each_batch_replaces_the_whole_view() {
    let mut board = TickerBoard::new("USDT");
    board.apply_batch(&batch(&[("BTCUSDT", "65000.0", "1.0")]));
    board.apply_batch(&batch(&[("ETHUSDT", "2250.0", "-0.5")]));

    let symbols: Vec<&str> = board.views().iter().map(|v| v.symbol.as_str()).collect();
    assert_eq!(symbols, ["ETHUSDT"]);
}

#[test]
fn malformed_records_are_isolated_from_the_batch() {
    let mut board = TickerBoard::new("USDT");
    let mut records = batch(&[
        ("BTCUSDT", "not-a-number", "1.5"),
        ("ETHUSDT", "2250.55", "-0.68"),
    ]);
    records.push(serde_json::json!({ "s": "XRPUSDT" })); // price fields missing
    records.push(serde_json::json!(42)); // not even an object

    board.apply_batch(&records);

    let symbols: Vec<&str> = board.views().iter().map(|v| v.symbol.as_str()).collect();
    assert_eq!(symbols, ["ETHUSDT"]);
    assert!(board.is_ready());
}

#[test]
fn readiness_flips_only_after_first_batch() {
    let mut board = TickerBoard::new("USDT");
    assert!(!board.is_ready());

    board.apply_batch(&batch(&[]));
    assert!(board.is_ready());
    assert!(board.views().is_empty());
}
