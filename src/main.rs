use std::time::Duration;

use tracing::info;

use coinwatch::CoinwatchError;
use coinwatch::config::fetch_config;
use coinwatch::models::{RangeSelection, RangeToken};
use coinwatch::resampler::RangeResampler;
use coinwatch::rest::RestClient;
use coinwatch::stream::{ReconnectPolicy, TickerFeed};

#[tokio::main]
async fn main() -> Result<(), CoinwatchError> {
    // Initialize tracing subscriber for logging output.
    tracing_subscriber::fmt::init();

    let config = fetch_config()?;

    let client = RestClient::new(&config.rest_url, config.request_timeout)?;
    let resampler = RangeResampler::new(client);

    let summary = resampler.fetch_summary("BTCUSDT").await?;
    info!(
        last_price = %summary.last_price,
        change_pct = %summary.change_pct,
        high_24h = %summary.high_24h,
        low_24h = %summary.low_24h,
        volume_24h = %summary.volume_24h,
        "24h summary for BTCUSDT"
    );

    let selection = RangeSelection::new(RangeToken::D1);
    if let Some(points) = resampler.fetch_series("BTCUSDT", selection).await? {
        info!(range = selection.name, points = points.len(), "Loaded candle series");
    }

    let policy = ReconnectPolicy::exponential(Duration::from_secs(1), Duration::from_secs(60), 10);
    let mut feed = TickerFeed::new(&config, policy);
    let mut frames = feed.subscribe();
    feed.connect();

    // Log a handful of live frames, then shut down.
    for _ in 0..10 {
        if frames.changed().await.is_err() {
            break;
        }
        let frame = frames.borrow_and_update().clone();
        info!(
            pairs = frame.views.len(),
            highlighted = frame.highlighted,
            ready = frame.ready,
            connection = ?frame.connection,
            "Ticker frame"
        );
    }

    feed.disconnect();

    Ok(())
}
