//! Global lobby room watcher.
//!
//! The lobby screen lists open games and refreshes the list whenever the
//! server announces `lobby_updated`. The event carries no payload; the
//! consumer re-pulls [`GameApi::list_games`](crate::api::GameApi::list_games)
//! — the same notify-then-pull split the round engine uses.

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::channel::PushChannel;
use crate::event::{ChannelEvent, RoomCommand};

/// Default capacity of the lobby event channel.
const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 16;

/// Default timeout for the graceful shutdown.
const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(1);

/// Events emitted by a [`LobbyFeed`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LobbyEvent {
    /// The lobby listing changed; re-pull `list_games`.
    Refresh,
    /// The push channel was lost; the listing degrades to manual refresh.
    ChannelLost { reason: Option<String> },
    /// The feed loop exited. Always delivered last.
    Closed,
}

/// Handle to a running lobby-room subscription.
///
/// Joins the global lobby room on start and leaves it on
/// [`shutdown`](LobbyFeed::shutdown); dropping the handle aborts the loop.
pub struct LobbyFeed {
    task: Option<tokio::task::JoinHandle<()>>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
    shutdown_timeout: Duration,
}

impl LobbyFeed {
    /// Subscribe to the global lobby room and return a handle plus event
    /// receiver.
    #[must_use = "the event receiver must be used to receive events"]
    pub fn start(channel: impl PushChannel) -> (Self, mpsc::Receiver<LobbyEvent>) {
        let (event_tx, event_rx) = mpsc::channel::<LobbyEvent>(DEFAULT_EVENT_CHANNEL_CAPACITY);
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        let task = tokio::spawn(lobby_loop(channel, event_tx, shutdown_rx));

        (
            Self {
                task: Some(task),
                shutdown_tx: Some(shutdown_tx),
                shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
            },
            event_rx,
        )
    }

    /// Leave the lobby room and stop the background loop.
    pub async fn shutdown(&mut self) {
        debug!("LobbyFeed: shutdown requested");

        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }

        if let Some(mut task) = self.task.take() {
            match tokio::time::timeout(self.shutdown_timeout, &mut task).await {
                Ok(Ok(())) => {}
                Ok(Err(join_err)) => {
                    warn!("lobby loop terminated with join error: {join_err}");
                }
                Err(_) => {
                    warn!("lobby loop did not exit within timeout; aborting task");
                    task.abort();
                    if let Err(join_err) = task.await {
                        debug!("lobby loop aborted: {join_err}");
                    }
                }
            }
        }
    }
}

impl Drop for LobbyFeed {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn lobby_loop(
    mut channel: impl PushChannel,
    event_tx: mpsc::Sender<LobbyEvent>,
    mut shutdown_rx: tokio::sync::oneshot::Receiver<()>,
) {
    debug!("lobby loop started");

    if let Err(e) = join_lobby(&mut channel).await {
        warn!("failed to join lobby room: {e}");
        let _ = event_tx
            .send(LobbyEvent::ChannelLost {
                reason: Some(e.to_string()),
            })
            .await;
    }

    loop {
        tokio::select! {
            _ = &mut shutdown_rx => {
                debug!("lobby shutdown signal received");
                if let Ok(frame) = serde_json::to_string(&RoomCommand::LeaveLobby) {
                    let _ = channel.send(frame).await;
                }
                let _ = channel.close().await;
                break;
            }

            incoming = channel.recv() => {
                match incoming {
                    Some(Ok(text)) => match ChannelEvent::parse(&text) {
                        Ok(ChannelEvent::LobbyUpdated) => {
                            // Coalescing is fine: one Refresh pending is
                            // as good as five.
                            let _ = event_tx.try_send(LobbyEvent::Refresh);
                        }
                        Ok(_) => {}
                        Err(e) => {
                            warn!("failed to parse lobby frame: {e} — raw: {text}");
                        }
                    },
                    Some(Err(e)) => {
                        warn!("lobby channel receive error: {e}");
                        let _ = event_tx
                            .send(LobbyEvent::ChannelLost {
                                reason: Some(e.to_string()),
                            })
                            .await;
                        break;
                    }
                    None => {
                        debug!("lobby channel closed by server");
                        let _ = event_tx.send(LobbyEvent::ChannelLost { reason: None }).await;
                        break;
                    }
                }
            }
        }
    }

    if event_tx.send(LobbyEvent::Closed).await.is_err() {
        debug!("lobby event channel closed, receiver dropped");
    }
    debug!("lobby loop exited");
}

async fn join_lobby(channel: &mut impl PushChannel) -> crate::error::Result<()> {
    let frame = serde_json::to_string(&RoomCommand::JoinLobby)?;
    channel.send(frame).await
}
