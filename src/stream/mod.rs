//! Async WebSocket consumer for the all-market ticker stream.
//!
//! This module is organized by concern:
//! - [`board`] - Pure batch reconciliation (filter, re-key, highlight)
//! - [`connection`] - Connection lifecycle, highlight timer, reconnection
//!
//! The all-market stream needs no subscribe handshake; the endpoint path
//! itself selects the channel, and the server starts pushing snapshot
//! batches as soon as the handshake completes.

mod board;
mod connection;

use tokio::net::TcpStream;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::info;

use crate::Result;

pub use board::TickerBoard;
pub use connection::{ConnectionState, ReconnectPolicy, TickerFeed, TickerFrame};

/// A live ticker stream connection.
pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Establishes a WebSocket connection to the given stream URL.
///
/// # Errors
///
/// Returns a [`CoinwatchError`](crate::CoinwatchError) if the connection
/// or TLS handshake fails.
pub async fn connect(url: &str) -> Result<WsStream> {
    let (ws_stream, _) = connect_async(url).await?;
    info!("WebSocket handshake completed");

    Ok(ws_stream)
}
