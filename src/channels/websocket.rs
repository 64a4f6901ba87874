//! WebSocket push channel built on `tokio-tungstenite`.
//!
//! [`WebSocketChannel`] carries the Decoy event protocol over a WebSocket
//! connection. Both `ws://` and `wss://` URLs work — TLS is handled
//! transparently via [`MaybeTlsStream`](tokio_tungstenite::MaybeTlsStream).
//! The auth credential travels as a query parameter on the connection URL,
//! the same way the browser client hands its token to the event relay.
//!
//! Only available with the `channel-websocket` feature (on by default).

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::protocol::Message;

use crate::channel::PushChannel;
use crate::error::DecoyError;

/// Type alias for the underlying WebSocket stream.
///
/// Public so callers can build a [`WebSocketChannel`] from a stream they
/// connected themselves via [`WebSocketChannel::from_stream`].
pub type WsStream =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

/// A [`PushChannel`] backed by a WebSocket connection.
///
/// # Construction
///
/// Use [`WebSocketChannel::connect`] for the common case. For custom TLS,
/// proxies, or extra headers, connect the stream yourself and wrap it with
/// [`WebSocketChannel::from_stream`].
///
/// # Cancel Safety
///
/// [`recv`](PushChannel::recv) is cancel-safe: dropping its future before
/// completion does not consume or lose frames, so it is safe inside
/// `tokio::select!`.
#[derive(Debug)]
pub struct WebSocketChannel {
    stream: WsStream,
    closed: bool,
}

impl WebSocketChannel {
    /// Establish a new WebSocket connection to the event relay.
    ///
    /// # Errors
    ///
    /// Returns [`DecoyError::Io`] if the URL is invalid or the connection
    /// cannot be established. When the underlying error is an I/O error
    /// its [`ErrorKind`](std::io::ErrorKind) is preserved; other errors
    /// map to [`ErrorKind::Other`](std::io::ErrorKind::Other).
    pub async fn connect(url: &str) -> Result<Self, DecoyError> {
        tracing::debug!(url = %url, "connecting to event relay");

        let (stream, _response) = tokio_tungstenite::connect_async(url).await.map_err(|e| {
            let kind = match &e {
                tokio_tungstenite::tungstenite::Error::Io(io) => io.kind(),
                _ => std::io::ErrorKind::Other,
            };
            DecoyError::Io(std::io::Error::new(kind, e))
        })?;

        tracing::info!(url = %url, "event relay connection established");

        Ok(Self {
            stream,
            closed: false,
        })
    }

    /// Wrap an already-established WebSocket stream.
    pub fn from_stream(stream: WsStream) -> Self {
        Self {
            stream,
            closed: false,
        }
    }

    /// Like [`connect`](Self::connect), but fails with
    /// [`DecoyError::Timeout`] if the connection is not established within
    /// the given duration.
    ///
    /// # Errors
    ///
    /// Returns [`DecoyError::Timeout`] when the deadline elapses, or any
    /// error [`connect`](Self::connect) may return.
    pub async fn connect_with_timeout(
        url: &str,
        timeout: std::time::Duration,
    ) -> Result<Self, DecoyError> {
        tokio::time::timeout(timeout, Self::connect(url))
            .await
            .map_err(|_| DecoyError::Timeout)?
    }
}

#[async_trait]
impl PushChannel for WebSocketChannel {
    async fn send(&mut self, message: String) -> Result<(), DecoyError> {
        if self.closed {
            return Err(DecoyError::ChannelClosed);
        }
        self.stream
            .send(Message::Text(message.into()))
            .await
            .map_err(|e| DecoyError::ChannelSend(e.to_string()))
    }

    async fn recv(&mut self) -> Option<Result<String, DecoyError>> {
        loop {
            let msg = match self.stream.next().await {
                Some(Ok(msg)) => msg,
                Some(Err(e)) => {
                    return Some(Err(DecoyError::ChannelReceive(e.to_string())));
                }
                None => return None,
            };

            match msg {
                // `Utf8Bytes` does not expose the inner buffer by value,
                // so the payload is copied into a fresh `String`.
                Message::Text(text) => return Some(Ok(text.to_string())),
                Message::Close(frame) => {
                    tracing::debug!(?frame, "received WebSocket close frame");
                    return None;
                }
                Message::Ping(_) => {
                    // tungstenite auto-queues the Pong reply.
                    tracing::debug!("received WebSocket ping");
                }
                Message::Pong(_) => {
                    tracing::debug!("received WebSocket pong (ignored)");
                }
                Message::Binary(_) => {
                    // The event relay is text-only; skip stray frames.
                    tracing::warn!("received unexpected binary WebSocket frame, skipping");
                }
                Message::Frame(_) => {
                    // Never produced by the read half; kept for
                    // exhaustiveness against future `Message` variants.
                    tracing::debug!("received raw WebSocket frame, skipping");
                }
            }
        }
    }

    async fn close(&mut self) -> Result<(), DecoyError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.stream
            .close(None)
            .await
            .map_err(|e| DecoyError::ChannelSend(e.to_string()))
    }
}

#[cfg(test)]
#[cfg(feature = "channel-websocket")]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing
)]
mod tests {
    use super::*;

    #[test]
    fn websocket_channel_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<WebSocketChannel>();
    }

    #[tokio::test]
    async fn connect_fails_with_invalid_url() {
        let result = WebSocketChannel::connect("not-a-valid-url").await;
        let err = result.unwrap_err();
        assert!(matches!(err, DecoyError::Io(_)));
    }

    #[tokio::test]
    async fn connect_fails_with_unreachable_host() {
        let result = WebSocketChannel::connect("ws://127.0.0.1:1").await;
        let err = result.unwrap_err();
        assert!(matches!(err, DecoyError::Io(_)));
    }

    // ── Mock-relay helpers ──────────────────────────────────────────

    use tokio::net::TcpListener;

    /// Start a local WebSocket server that runs `handler` on the accepted
    /// connection and returns the address to connect to.
    async fn start_mock_relay<F, Fut>(handler: F) -> String
    where
        F: FnOnce(tokio_tungstenite::WebSocketStream<tokio::net::TcpStream>) -> Fut
            + Send
            + 'static,
        Fut: std::future::Future<Output = ()> + Send,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (tcp, _) = listener.accept().await.unwrap();
            let ws = tokio_tungstenite::accept_async(tcp).await.unwrap();
            handler(ws).await;
        });

        format!("ws://{addr}")
    }

    #[tokio::test]
    async fn recv_receives_text_frames() {
        let url = start_mock_relay(|mut ws| async move {
            ws.send(Message::Text(r#"{"event":"reload_round"}"#.into()))
                .await
                .unwrap();
            ws.close(None).await.unwrap();
        })
        .await;

        let mut channel = WebSocketChannel::connect(&url).await.unwrap();

        let frame = channel.recv().await.unwrap().unwrap();
        assert_eq!(frame, r#"{"event":"reload_round"}"#);
    }

    #[tokio::test]
    async fn recv_returns_none_on_close_frame() {
        let url = start_mock_relay(|mut ws| async move {
            ws.close(None).await.unwrap();
        })
        .await;

        let mut channel = WebSocketChannel::connect(&url).await.unwrap();
        assert!(channel.recv().await.is_none());
    }

    #[tokio::test]
    async fn recv_skips_binary_frames() {
        let url = start_mock_relay(|mut ws| async move {
            ws.send(Message::Binary(vec![0xDE, 0xAD].into()))
                .await
                .unwrap();
            ws.send(Message::Text("after_binary".into())).await.unwrap();
            ws.close(None).await.unwrap();
        })
        .await;

        let mut channel = WebSocketChannel::connect(&url).await.unwrap();

        let frame = channel.recv().await.unwrap().unwrap();
        assert_eq!(frame, "after_binary");
    }

    #[tokio::test]
    async fn send_after_close_returns_channel_closed() {
        let url = start_mock_relay(|mut ws| async move {
            while let Some(Ok(_)) = ws.next().await {}
        })
        .await;

        let mut channel = WebSocketChannel::connect(&url).await.unwrap();
        channel.close().await.unwrap();

        let err = channel
            .send(r#"{"event":"join_lobby"}"#.to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, DecoyError::ChannelClosed));
    }

    #[tokio::test]
    async fn double_close_is_idempotent() {
        let url =
            start_mock_relay(|mut ws| async move { while let Some(Ok(_)) = ws.next().await {} })
                .await;

        let mut channel = WebSocketChannel::connect(&url).await.unwrap();
        channel.close().await.unwrap();
        channel.close().await.unwrap();
    }

    #[tokio::test]
    async fn connect_with_timeout_times_out() {
        // Non-routable address guarantees the deadline elapses first.
        let result = WebSocketChannel::connect_with_timeout(
            "ws://192.0.2.1:1",
            std::time::Duration::from_millis(50),
        )
        .await;

        let err = result.unwrap_err();
        assert!(matches!(err, DecoyError::Timeout));
    }

    #[tokio::test]
    async fn from_stream_constructor_works() {
        let url = start_mock_relay(|mut ws| async move {
            ws.send(Message::Text(r#"{"event":"lobby_updated"}"#.into()))
                .await
                .unwrap();
            ws.close(None).await.unwrap();
        })
        .await;

        let (ws_stream, _) = tokio_tungstenite::connect_async(&url).await.unwrap();
        let mut channel = WebSocketChannel::from_stream(ws_stream);

        let frame = channel.recv().await.unwrap().unwrap();
        assert_eq!(frame, r#"{"event":"lobby_updated"}"#);
    }

    #[tokio::test]
    async fn send_round_trip() {
        let url = start_mock_relay(|mut ws| async move {
            if let Some(Ok(Message::Text(text))) = ws.next().await {
                ws.send(Message::Text(text)).await.unwrap();
            }
            ws.close(None).await.unwrap();
        })
        .await;

        let mut channel = WebSocketChannel::connect(&url).await.unwrap();
        channel
            .send(r#"{"event":"join_game_room","data":7}"#.to_string())
            .await
            .unwrap();

        let frame = channel.recv().await.unwrap().unwrap();
        assert_eq!(frame, r#"{"event":"join_game_room","data":7}"#);
    }
}
