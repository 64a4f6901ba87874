//! Push-channel abstraction for realtime game events.
//!
//! The [`PushChannel`] trait is a bidirectional text message pipe between
//! the client and the game server's event fan-out. Frames are JSON: the
//! client sends [`RoomCommand`](crate::event::RoomCommand)s, the server
//! delivers [`ChannelEvent`](crate::event::ChannelEvent)s for whichever
//! rooms the connection has joined.
//!
//! Connection setup is intentionally NOT part of this trait — different
//! backends have different connection parameters (URL + token for
//! WebSocket, an in-process pair for tests). Construct a connected channel
//! externally, then hand it to [`GameSession::start`](crate::session::GameSession::start).
//!
//! Delivery is best-effort while connected; events can be missed entirely
//! across a disconnect. The session compensates by resyncing through the
//! snapshot API, never by trusting the channel to be complete.

use async_trait::async_trait;

use crate::error::DecoyError;

/// A bidirectional text message channel to the game server's event relay.
///
/// # Object Safety
///
/// This trait is object-safe, so `Box<dyn PushChannel>` works for dynamic
/// dispatch; `GameSession::start` accepts `impl PushChannel`
/// (monomorphized) for the common case.
///
/// # Cancel Safety
///
/// [`recv`](PushChannel::recv) **MUST** be cancel-safe because the session
/// polls it inside `tokio::select!`. If `recv` is cancelled before
/// completion, calling it again must not lose frames. Channel-based
/// implementations (wrapping an `mpsc::Receiver`) are naturally
/// cancel-safe.
#[async_trait]
pub trait PushChannel: Send + 'static {
    /// Send one JSON text frame (a room command) to the server.
    ///
    /// # Errors
    ///
    /// Returns [`DecoyError::ChannelSend`] if the frame could not be sent.
    async fn send(&mut self, message: String) -> Result<(), DecoyError>;

    /// Receive the next JSON text frame from the server.
    ///
    /// Returns:
    /// - `Some(Ok(text))` — a complete frame was received
    /// - `Some(Err(e))` — a channel error occurred
    /// - `None` — the connection was closed cleanly
    ///
    /// # Cancel Safety
    ///
    /// This method **MUST** be cancel-safe (see [trait docs](PushChannel)).
    async fn recv(&mut self) -> Option<Result<String, DecoyError>>;

    /// Close the channel gracefully.
    ///
    /// # Errors
    ///
    /// Returns an error if the close handshake fails; implementations
    /// should still release resources when it does.
    async fn close(&mut self) -> Result<(), DecoyError>;
}
