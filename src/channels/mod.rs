//! Push-channel implementations.
//!
//! Concrete [`PushChannel`](crate::PushChannel) backends live here behind
//! feature gates:
//!
//! | Feature             | Channel              |
//! |---------------------|----------------------|
//! | `channel-websocket` | [`WebSocketChannel`] |
//!
//! # Example
//!
//! ```rust,ignore
//! # async fn example() -> Result<(), decoy_client::DecoyError> {
//! use decoy_client::{PushChannel, WebSocketChannel};
//!
//! let mut channel = WebSocketChannel::connect("wss://play.decoy.gr/events?token=…").await?;
//! channel.send(r#"{"event":"join_lobby"}"#.to_string()).await?;
//!
//! if let Some(Ok(frame)) = channel.recv().await {
//!     println!("server said: {frame}");
//! }
//!
//! channel.close().await?;
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "channel-websocket")]
pub mod websocket;

#[cfg(feature = "channel-websocket")]
pub use websocket::WebSocketChannel;
