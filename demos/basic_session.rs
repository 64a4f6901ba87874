//! # Basic Session Example
//!
//! Demonstrates a complete Decoy client lifecycle:
//!
//! 1. Connect the REST API and the WebSocket push channel
//! 2. Open a session for one game (joins the game's room)
//! 3. React to view changes and terminal events
//! 4. Shut down gracefully on Ctrl+C or game end
//!
//! ## Running
//!
//! ```sh
//! # Point at a Decoy server and a signed-in user's token, then:
//! DECOY_TOKEN=... DECOY_GAME_ID=7 DECOY_USER_ID=3 cargo run --example basic_session
//!
//! # Override the server URLs:
//! DECOY_API_URL=https://play.decoy.gr/api \
//! DECOY_EVENTS_URL=wss://play.decoy.gr/events \
//!   cargo run --example basic_session
//! ```

use std::sync::Arc;

use decoy_client::model::Viewer;
use decoy_client::view::{GameView, PhaseView};
use decoy_client::{
    GameSession, HttpGameApi, SessionConfig, SessionEvent, WebSocketChannel,
};

/// Default server URLs when the environment does not override them.
const DEFAULT_API_URL: &str = "http://localhost:3001/api";
const DEFAULT_EVENTS_URL: &str = "ws://localhost:3001/events";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Logging ─────────────────────────────────────────────────────
    // Initialize tracing. Set `RUST_LOG=debug` for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // ── Configuration ───────────────────────────────────────────────
    let api_url = std::env::var("DECOY_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into());
    let events_url =
        std::env::var("DECOY_EVENTS_URL").unwrap_or_else(|_| DEFAULT_EVENTS_URL.into());
    let token = std::env::var("DECOY_TOKEN")?;
    let game_id: u64 = std::env::var("DECOY_GAME_ID")?.parse()?;
    let user_id: u64 = std::env::var("DECOY_USER_ID")?.parse()?;

    // ── Connect ─────────────────────────────────────────────────────
    let api = Arc::new(HttpGameApi::new(&api_url, &token));
    let url = format!("{events_url}?token={token}");
    let channel = WebSocketChannel::connect(&url).await?;

    let viewer = Viewer::new(user_id, "RustPlayer");
    let config = SessionConfig::new(game_id, viewer);

    // Start the session. This spawns a background task that joins the
    // game's room, pulls the initial snapshot, and emits events.
    let (mut session, mut event_rx) = GameSession::start(api, channel, config);

    // ── Event loop ──────────────────────────────────────────────────
    loop {
        tokio::select! {
            // Branch 1: session event
            event = event_rx.recv() => {
                let Some(event) = event else {
                    tracing::info!("Event channel closed, exiting");
                    break;
                };

                match event {
                    SessionEvent::ViewChanged(view) => describe(&view),

                    SessionEvent::GameFinished { scores } => {
                        tracing::info!("Game over!");
                        for entry in scores {
                            tracing::info!("  {}: {} pts", entry.display_name, entry.score);
                        }
                        break;
                    }

                    SessionEvent::GameDeleted => {
                        tracing::warn!("Game was deleted — navigating away");
                        break;
                    }

                    SessionEvent::SyncFailed { message } => {
                        tracing::warn!("Sync failed: {message} (press Ctrl+C or wait for the next event)");
                    }

                    SessionEvent::ActionFailed { action, message } => {
                        tracing::warn!("Action {action:?} rejected: {message}");
                    }

                    SessionEvent::ChannelLost { reason } => {
                        tracing::warn!(?reason, "Push channel lost; pulls still work");
                        let _ = session.resync();
                    }

                    SessionEvent::Closed => break,
                }
            }

            // Branch 2: Ctrl+C
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Ctrl+C received, shutting down");
                break;
            }
        }
    }

    // ── Shutdown ────────────────────────────────────────────────────
    // Leaves the game room and closes the channel.
    session.shutdown().await;
    tracing::info!("Session closed");

    Ok(())
}

/// Log a human-readable line per view state.
fn describe(view: &GameView) {
    match view {
        GameView::Uninitialized => tracing::info!("No game loaded"),
        GameView::Lobby(lobby) => {
            tracing::info!(
                "Lobby: {} player(s), created by {}",
                lobby.players.len(),
                lobby.creator_name
            );
        }
        GameView::RoundLoading => tracing::info!("Loading round…"),
        GameView::Round(phase) => match phase {
            PhaseView::Picking(_) => tracing::info!("Picking a question"),
            PhaseView::Answering(answering) => {
                tracing::info!("Answering: {}", answering.question);
            }
            PhaseView::Voting(_) => tracing::info!("Voting on answers"),
            PhaseView::Results(results) => {
                tracing::info!("Results: {} answer(s) revealed", results.answers.len());
            }
            PhaseView::Loading => tracing::info!("Loading round…"),
        },
        GameView::Finished(finished) => {
            tracing::info!("Finished; {} player(s) on the board", finished.scores.len());
        }
    }
}
