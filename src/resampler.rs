//! Historical range resampling with stale-result discard.
//!
//! [`RangeResampler`] owns the chart-ready series for exactly one
//! `(coin, range)` pair at a time. Every [`fetch_series`] call bumps a
//! generation counter that is compared again when the network round trip
//! completes; a superseded result is discarded instead of overwriting the
//! newer selection's series. Network completion order is not request
//! order, so the counter is what enforces last-selection-wins.
//!
//! [`fetch_series`]: RangeResampler::fetch_series

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

use crate::Result;
use crate::models::RangeSelection;
use crate::models::candle::CandlePoint;
use crate::models::summary::DetailSummary;
use crate::rest::CandleSource;

/// Read-only chart state exposed to the UI layer.
#[derive(Debug, Clone, Default)]
struct ChartState {
    series: Vec<CandlePoint>,
    selection: RangeSelection,
    loading: bool,
}

/// Produces the candle series and one-shot detail summary for a coin.
pub struct RangeResampler<S: CandleSource> {
    source: S,
    generation: AtomicU64,
    state: Mutex<ChartState>,
}

impl<S: CandleSource> RangeResampler<S> {
    #[must_use]
    pub fn new(source: S) -> Self {
        Self {
            source,
            generation: AtomicU64::new(0),
            state: Mutex::new(ChartState::default()),
        }
    }

    /// Fetches the latest 24h statistics for `coin_id`.
    ///
    /// One request, no retry; the caller decides whether to try again.
    /// Independent of the series path and of the generation counter.
    ///
    /// # Errors
    ///
    /// Returns a [`CoinwatchError`](crate::CoinwatchError) if the request
    /// fails or any of the five required fields is missing or
    /// non-numeric. No partial summary is returned.
    pub async fn fetch_summary(&self, coin_id: &str) -> Result<DetailSummary> {
        let body = self.source.day_stats(coin_id).await?;
        DetailSummary::from_response(&body)
    }

    /// Fetches and applies the candle series for `(coin_id, selection)`.
    ///
    /// Returns `Ok(Some(points))` when the result was applied, or
    /// `Ok(None)` when a newer `fetch_series` call superseded this one
    /// while its request was in flight — the stale result is discarded
    /// without touching the view.
    ///
    /// # Errors
    ///
    /// Returns a [`CoinwatchError`](crate::CoinwatchError) if the request
    /// fails or any bar is malformed. The series is all-or-nothing; a
    /// failed call leaves the previous series in place.
    pub async fn fetch_series(
        &self,
        coin_id: &str,
        selection: RangeSelection,
    ) -> Result<Option<Vec<CandlePoint>>> {
        // Bump the counter while holding the lock so generation order
        // matches selection order across concurrent callers.
        let generation = {
            let mut state = self.state.lock().expect("chart state lock poisoned");
            state.selection = selection;
            state.loading = true;
            self.generation.fetch_add(1, Ordering::SeqCst) + 1
        };

        let outcome = self.source.klines(coin_id, selection.token).await;

        // Fast path: a later call already owns the view.
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(
                coin_id,
                interval = selection.token.as_str(),
                "Discarding stale series result"
            );
            return Ok(None);
        }

        let points = outcome.and_then(|bars| {
            bars.iter()
                .map(CandlePoint::from_bar)
                .collect::<Result<Vec<_>>>()
        });

        let mut state = self.state.lock().expect("chart state lock poisoned");
        // Re-checked under the lock: the counter may have advanced since
        // the fast path, and the comparison must be atomic with the apply.
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(
                coin_id,
                interval = selection.token.as_str(),
                "Discarding stale series result"
            );
            return Ok(None);
        }
        state.loading = false;
        match points {
            Ok(points) => {
                state.series = points.clone();
                Ok(Some(points))
            }
            Err(e) => Err(e),
        }
    }

    /// The currently applied candle series.
    #[must_use]
    pub fn series(&self) -> Vec<CandlePoint> {
        self.state
            .lock()
            .expect("chart state lock poisoned")
            .series
            .clone()
    }

    /// The most recently requested range selection.
    #[must_use]
    pub fn active_selection(&self) -> RangeSelection {
        self.state
            .lock()
            .expect("chart state lock poisoned")
            .selection
    }

    /// True while the most recent `fetch_series` call is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state
            .lock()
            .expect("chart state lock poisoned")
            .loading
    }
}
