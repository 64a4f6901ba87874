//! # Decoy Client
//!
//! Transport-agnostic Rust client engine for the Decoy bluffing trivia
//! game: one player picks a question, the others submit decoy answers,
//! everyone votes on which answer is genuine, points are revealed.
//!
//! The crate keeps a player's view of an in-progress game consistent with
//! the server-authoritative round state over a *hybrid* channel — an
//! on-demand REST snapshot plus a best-effort realtime push stream —
//! while tolerating reconnects, missed events, duplicate events, and
//! role-dependent visibility (question master vs. regular player).
//!
//! ## Architecture
//!
//! - **[`GameApi`]** — pull seam: idempotent snapshots plus
//!   fire-and-forget actions ([`HttpGameApi`] built in, `api-http`
//!   feature).
//! - **[`PushChannel`]** — push seam: a text-frame pipe delivering named
//!   room events ([`WebSocketChannel`] built in, `channel-websocket`
//!   feature).
//! - **[`RoundEngine`](engine::RoundEngine)** — synchronous
//!   reconciliation core: wholesale record adoption,
//!   last-completion-wins ordering for overlapping pulls, and a closed
//!   push-event set where round content is always notify-then-pull.
//! - **[`view`]** — pure role-gated projection from the records to one
//!   renderable view model per phase.
//! - **[`GameSession`]** — the async driver: owns the room subscription
//!   for one game view and emits typed [`SessionEvent`]s.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use decoy_client::{
//!     GameSession, HttpGameApi, SessionConfig, SessionEvent, WebSocketChannel,
//! };
//! use decoy_client::model::Viewer;
//!
//! let api = Arc::new(HttpGameApi::new("https://play.decoy.gr/api", token));
//! let channel = WebSocketChannel::connect(&events_url).await?;
//! let config = SessionConfig::new(game_id, Viewer::new(user_id, name));
//!
//! let (mut session, mut events) = GameSession::start(api, channel, config);
//! while let Some(event) = events.recv().await {
//!     match event {
//!         SessionEvent::ViewChanged(view) => render(view),
//!         SessionEvent::GameDeleted => break,
//!         _ => {}
//!     }
//! }
//! session.shutdown().await;
//! ```

pub mod api;
pub mod apis;
pub mod channel;
pub mod channels;
pub mod engine;
pub mod error;
pub mod error_codes;
pub mod event;
pub mod model;
pub mod view;

#[cfg(feature = "tokio-runtime")]
pub mod lobby;
#[cfg(feature = "tokio-runtime")]
pub mod session;

// Re-export primary types for ergonomic imports.
pub use api::GameApi;
pub use channel::PushChannel;
pub use error::DecoyError;
pub use error_codes::ApiErrorCode;
pub use event::{ChannelEvent, RoomCommand};
pub use view::{GameView, PhaseView};

#[cfg(feature = "tokio-runtime")]
pub use lobby::{LobbyEvent, LobbyFeed};
#[cfg(feature = "tokio-runtime")]
pub use session::{GameSession, SessionConfig, SessionEvent};

#[cfg(feature = "api-http")]
pub use apis::http::HttpGameApi;

#[cfg(feature = "channel-websocket")]
pub use channels::websocket::WebSocketChannel;
