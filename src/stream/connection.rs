//! Stream connection lifecycle management.
//!
//! [`TickerFeed`] owns one connection to the all-market ticker stream and
//! drives a [`TickerBoard`] from it. Consumers watch a read-only
//! [`TickerFrame`] that is republished on every applied batch, highlight
//! expiry, and connection-state change. Reconnection is governed by an
//! explicit [`ReconnectPolicy`] rather than ambient retry logic.

use std::time::Duration;

use futures_util::StreamExt;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tungstenite::Message as WsMessage;

use super::{TickerBoard, WsStream, connect};
use crate::config::AppConfig;
use crate::models::ticker::TickerView;

/// Consumer-visible state of the stream connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Connected,
    Disconnected,
}

/// One published point-in-time view of the ticker stream.
///
/// `ready` distinguishes "no batch received yet" from an authoritative
/// empty view; consumers must show a loading indicator until it is set.
#[derive(Debug, Clone)]
pub struct TickerFrame {
    pub views: Vec<TickerView>,
    pub highlighted: bool,
    pub ready: bool,
    pub connection: ConnectionState,
}

impl Default for TickerFrame {
    fn default() -> Self {
        Self {
            views: Vec::new(),
            highlighted: false,
            ready: false,
            connection: ConnectionState::Disconnected,
        }
    }
}

/// Reconnection schedule applied after a lost connection.
///
/// The delay doubles from `initial` up to `max` on consecutive failed
/// attempts. `ReconnectPolicy::none()` disables reconnection entirely:
/// the feed reports `Disconnected` and stops, leaving retry to the caller.
#[derive(Debug, Clone, Copy)]
pub struct ReconnectPolicy {
    initial: Duration,
    max: Duration,
    max_attempts: u32,
}

impl ReconnectPolicy {
    /// No reconnection; a lost connection ends the feed.
    #[must_use]
    pub fn none() -> Self {
        Self {
            initial: Duration::ZERO,
            max: Duration::ZERO,
            max_attempts: 0,
        }
    }

    /// Doubling backoff from `initial` capped at `max`, for at most
    /// `max_attempts` consecutive failures.
    #[must_use]
    pub fn exponential(initial: Duration, max: Duration, max_attempts: u32) -> Self {
        Self {
            initial,
            max,
            max_attempts,
        }
    }

    /// The delay before reconnection attempt `attempt` (0-based), or
    /// `None` once the attempt budget is spent.
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Option<Duration> {
        if attempt >= self.max_attempts {
            return None;
        }

        let mut delay = self.initial;
        for _ in 0..attempt {
            delay = (delay * 2).min(self.max);
        }
        Some(delay.min(self.max))
    }
}

/// Owns the stream connection and publishes [`TickerFrame`]s.
///
/// The connection is an explicitly owned resource: `connect()` starts the
/// single driver task, `disconnect()` (or dropping the feed) tears it
/// down along with any pending highlight timer. Independent feeds do not
/// share state, so tests can run several side by side.
pub struct TickerFeed {
    stream_url: String,
    quote_suffix: String,
    highlight_window: Duration,
    policy: ReconnectPolicy,
    frames: watch::Sender<TickerFrame>,
    task: Option<JoinHandle<()>>,
}

impl TickerFeed {
    #[must_use]
    pub fn new(config: &AppConfig, policy: ReconnectPolicy) -> Self {
        let (frames, _) = watch::channel(TickerFrame::default());
        Self {
            stream_url: config.stream_url.clone(),
            quote_suffix: config.quote_suffix.clone(),
            highlight_window: config.highlight_window,
            policy,
            frames,
            task: None,
        }
    }

    /// Returns a read-only handle to the latest published frame.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<TickerFrame> {
        self.frames.subscribe()
    }

    /// Starts the stream driver task.
    ///
    /// Idempotent: calling it again while the driver is still running is
    /// a no-op, so there is at most one open connection per feed.
    pub fn connect(&mut self) {
        if self.task.as_ref().is_some_and(|task| !task.is_finished()) {
            return;
        }

        let driver = Driver {
            url: self.stream_url.clone(),
            quote_suffix: self.quote_suffix.clone(),
            highlight_window: self.highlight_window,
            policy: self.policy,
            frames: self.frames.clone(),
        };
        self.task = Some(tokio::spawn(driver.run()));
    }

    /// Stops the driver task and publishes a disconnected frame.
    ///
    /// Safe to call repeatedly; aborting the task also cancels a pending
    /// highlight flip, so nothing fires into a torn-down feed.
    pub fn disconnect(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            info!("Ticker feed disconnected");
        }
        self.frames.send_modify(|frame| {
            frame.connection = ConnectionState::Disconnected;
        });
    }
}

impl Drop for TickerFeed {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// State moved into the spawned driver task.
struct Driver {
    url: String,
    quote_suffix: String,
    highlight_window: Duration,
    policy: ReconnectPolicy,
    frames: watch::Sender<TickerFrame>,
}

impl Driver {
    /// Connects, reads batches until the connection is lost, and
    /// reconnects per the policy. Returns when the policy's attempt
    /// budget is spent or every receiver is gone.
    async fn run(self) {
        let mut board = TickerBoard::new(self.quote_suffix.clone());
        let mut attempt = 0u32;

        loop {
            self.publish(&board, ConnectionState::Connecting);

            info!(url = %self.url, "Connecting to ticker stream");
            match connect(&self.url).await {
                Ok(stream) => {
                    // Reset the backoff once a connection is established.
                    attempt = 0;
                    self.publish(&board, ConnectionState::Connected);
                    self.read_loop(stream, &mut board).await;
                }
                Err(e) => {
                    warn!("Connection failed: {e}");
                }
            }

            // A lost connection ends any open highlight window.
            board.clear_highlight();
            self.publish(&board, ConnectionState::Disconnected);

            match self.policy.delay_for(attempt) {
                Some(delay) => {
                    info!(
                        backoff_ms = delay.as_millis() as u64,
                        attempt, "Backing off before reconnect"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                None => {
                    info!("Reconnect budget spent, feed stopped");
                    return;
                }
            }
        }
    }

    /// Reads snapshot batches until disconnection.
    ///
    /// The highlight window is an armed deadline in the same select loop,
    /// so a newer batch supersedes the pending flip and task teardown
    /// cancels it outright.
    async fn read_loop(&self, mut stream: WsStream, board: &mut TickerBoard) {
        let mut highlight_deadline: Option<tokio::time::Instant> = None;

        loop {
            // Capture the deadline by value so the select arms can re-arm it.
            let highlight_sleep = async move {
                match highlight_deadline {
                    Some(deadline) => tokio::time::sleep_until(deadline).await,
                    None => std::future::pending::<()>().await,
                }
            };
            tokio::pin!(highlight_sleep);

            tokio::select! {
                msg = stream.next() => {
                    match msg {
                        Some(Ok(WsMessage::Text(text))) => {
                            match serde_json::from_str::<Vec<serde_json::Value>>(&text) {
                                Ok(batch) => {
                                    board.apply_batch(&batch);
                                    highlight_deadline =
                                        Some(tokio::time::Instant::now() + self.highlight_window);
                                    self.publish(board, ConnectionState::Connected);
                                }
                                Err(e) => {
                                    warn!(error = %e, "Skipping undecodable stream message");
                                }
                            }
                        }
                        Some(Ok(_)) => {} // Binary/Ping/Pong/Close frames
                        Some(Err(e)) => {
                            warn!("WebSocket error: {e}");
                            return;
                        }
                        None => {
                            warn!("WebSocket stream ended");
                            return;
                        }
                    }
                }

                () = &mut highlight_sleep => {
                    board.clear_highlight();
                    highlight_deadline = None;
                    self.publish(board, ConnectionState::Connected);
                }
            }
        }
    }

    fn publish(&self, board: &TickerBoard, connection: ConnectionState) {
        let _ = self.frames.send(TickerFrame {
            views: board.views().to_vec(),
            highlighted: board.is_highlighted(),
            ready: board.is_ready(),
            connection,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_policy_never_reconnects() {
        let policy = ReconnectPolicy::none();
        assert_eq!(policy.delay_for(0), None);
        assert_eq!(policy.delay_for(5), None);
    }

    #[test]
    fn exponential_policy_doubles_up_to_cap() {
        let policy =
            ReconnectPolicy::exponential(Duration::from_secs(1), Duration::from_secs(60), 10);

        assert_eq!(policy.delay_for(0), Some(Duration::from_secs(1)));
        assert_eq!(policy.delay_for(1), Some(Duration::from_secs(2)));
        assert_eq!(policy.delay_for(2), Some(Duration::from_secs(4)));
        assert_eq!(policy.delay_for(5), Some(Duration::from_secs(32)));
        assert_eq!(policy.delay_for(6), Some(Duration::from_secs(60)));
        assert_eq!(policy.delay_for(9), Some(Duration::from_secs(60)));
    }

    #[test]
    fn exponential_policy_exhausts_attempt_budget() {
        let policy =
            ReconnectPolicy::exponential(Duration::from_secs(1), Duration::from_secs(60), 3);

        assert!(policy.delay_for(2).is_some());
        assert_eq!(policy.delay_for(3), None);
    }

    #[test]
    fn default_frame_is_not_ready() {
        let frame = TickerFrame::default();
        assert!(!frame.ready);
        assert!(!frame.highlighted);
        assert!(frame.views.is_empty());
        assert_eq!(frame.connection, ConnectionState::Disconnected);
    }
}
