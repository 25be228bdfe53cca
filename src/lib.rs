//! Live market-data view library.
//!
//! Provides two independent cores over a Binance-style exchange API: a
//! ticker stream aggregator that maintains a filtered, highlight-annotated
//! live view of all tracked pairs, and a range resampler that turns
//! historical kline data into a chart-ready series for one (coin, range)
//! pair at a time.

pub mod config;
pub mod error;
pub mod models;
pub mod resampler;
pub mod rest;
pub mod stream;

pub use error::{CoinwatchError, Result};
