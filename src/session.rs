//! Async session driving one game view.
//!
//! [`GameSession`] is a thin handle over a background task that owns the
//! push channel, the snapshot API, and the [`RoundEngine`]. Commands go in
//! over an unbounded MPSC channel; [`SessionEvent`]s come out on a bounded
//! channel returned from [`GameSession::start`].
//!
//! The session owns exactly one game-room subscription: it joins the room
//! when the loop starts and leaves it (and closes the channel) on graceful
//! shutdown, so entering a new game view after shutting down the previous
//! session can never receive cross-game events. In-flight snapshot pulls
//! die with the task; a stale response can never corrupt a later view.
//!
//! # Example
//!
//! ```rust,ignore
//! let api = Arc::new(HttpGameApi::new(base_url, token));
//! let channel = WebSocketChannel::connect(&events_url).await?;
//! let config = SessionConfig::new(game_id, viewer);
//! let (session, mut events) = GameSession::start(api, channel, config);
//!
//! while let Some(event) = events.recv().await {
//!     match event {
//!         SessionEvent::ViewChanged(view) => render(view),
//!         SessionEvent::GameDeleted => break, // navigate away
//!         _ => {}
//!     }
//! }
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Mutex};
use tracing::{debug, warn};

use crate::api::GameApi;
use crate::channel::PushChannel;
use crate::engine::{Effect, PullTicket, RoundEngine};
use crate::error::{DecoyError, Result};
use crate::event::{ChannelEvent, RoomCommand};
use crate::model::{
    AnswerId, Game, GameId, QuestionFilter, QuestionId, QuestionPage, Round, ScoreEntry, Viewer,
};
use crate::view::GameView;

/// Default capacity of the bounded event channel.
const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 256;

/// Default timeout for the graceful shutdown.
const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(1);

/// Default deadline for one snapshot pull. A pull that never resolves
/// must not leave the view in "loading" forever; it fails as
/// [`DecoyError::Timeout`] and surfaces a retry instead.
const DEFAULT_SNAPSHOT_TIMEOUT: Duration = Duration::from_secs(10);

// ── Configuration ───────────────────────────────────────────────────

/// Configuration for a [`GameSession`].
///
/// The game id and viewer identity are required; everything else has
/// defaults.
///
/// # Example
///
/// ```
/// use decoy_client::model::Viewer;
/// use decoy_client::session::SessionConfig;
/// use std::time::Duration;
///
/// let config = SessionConfig::new(7, Viewer::new(3, "Maria"))
///     .with_event_channel_capacity(512)
///     .with_snapshot_timeout(Duration::from_secs(5));
/// assert_eq!(config.game_id, 7);
/// ```
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// The game this session synchronizes.
    pub game_id: GameId,
    /// Identity the server resolves viewer-relative fields for.
    pub viewer: Viewer,
    /// Capacity of the bounded event channel.
    ///
    /// When the consumer cannot keep up, `ViewChanged` and other
    /// non-terminal events are dropped (with a warning logged) to avoid
    /// blocking the session loop. Terminal events (`GameFinished`,
    /// `GameDeleted`, `Closed`) are always delivered regardless of
    /// capacity.
    ///
    /// Defaults to **256**. Values below 1 are clamped to 1.
    pub event_channel_capacity: usize,
    /// Timeout for the graceful shutdown.
    ///
    /// Defaults to **1 second**. A zero timeout aborts the session loop
    /// immediately.
    pub shutdown_timeout: Duration,
    /// Deadline for one snapshot pull. Defaults to **10 seconds**.
    pub snapshot_timeout: Duration,
}

impl SessionConfig {
    /// Create a configuration with default tuning.
    pub fn new(game_id: GameId, viewer: Viewer) -> Self {
        Self {
            game_id,
            viewer,
            event_channel_capacity: DEFAULT_EVENT_CHANNEL_CAPACITY,
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
            snapshot_timeout: DEFAULT_SNAPSHOT_TIMEOUT,
        }
    }

    /// Set the capacity of the bounded event channel.
    #[must_use]
    pub fn with_event_channel_capacity(mut self, capacity: usize) -> Self {
        self.event_channel_capacity = capacity.max(1);
        self
    }

    /// Set the timeout for the graceful shutdown.
    #[must_use]
    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    /// Set the deadline for one snapshot pull.
    #[must_use]
    pub fn with_snapshot_timeout(mut self, timeout: Duration) -> Self {
        self.snapshot_timeout = timeout;
        self
    }
}

// ── Events ──────────────────────────────────────────────────────────

/// Events emitted by a [`GameSession`].
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A record was adopted and the projection changed. Carries the new
    /// view model to render.
    ViewChanged(GameView),
    /// Terminal: the game ended. Always delivered.
    GameFinished { scores: Vec<ScoreEntry> },
    /// Terminal: the game was deleted; the viewer must navigate away.
    /// Always delivered.
    GameDeleted,
    /// A snapshot pull failed; the last-known view is retained. Retry via
    /// [`GameSession::resync`] or the next push trigger.
    SyncFailed { message: String },
    /// A fire-and-forget action was rejected. Local to the action: the
    /// shared records are untouched, and the message is the server's own
    /// wording.
    ActionFailed {
        action: ActionKind,
        message: String,
    },
    /// The push channel was lost. The session keeps serving snapshot
    /// pulls and actions; call [`GameSession::resync`] after the channel
    /// owner re-establishes connectivity, or rebuild the session.
    ChannelLost { reason: Option<String> },
    /// The session loop exited. Always delivered last.
    Closed,
}

/// Which fire-and-forget action an [`SessionEvent::ActionFailed`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    PickQuestion,
    SubmitAnswer,
    SubmitVote,
    AdvanceRound,
    StartGame,
    JoinGame,
    LeaveGame,
    DeleteGame,
}

/// A queued fire-and-forget mutation.
#[derive(Debug, Clone)]
enum Action {
    PickQuestion(QuestionId),
    SubmitAnswer(String),
    SubmitVote(AnswerId),
    AdvanceRound,
    StartGame,
    JoinGame,
    LeaveGame,
    DeleteGame,
}

impl Action {
    fn kind(&self) -> ActionKind {
        match self {
            Self::PickQuestion(_) => ActionKind::PickQuestion,
            Self::SubmitAnswer(_) => ActionKind::SubmitAnswer,
            Self::SubmitVote(_) => ActionKind::SubmitVote,
            Self::AdvanceRound => ActionKind::AdvanceRound,
            Self::StartGame => ActionKind::StartGame,
            Self::JoinGame => ActionKind::JoinGame,
            Self::LeaveGame => ActionKind::LeaveGame,
            Self::DeleteGame => ActionKind::DeleteGame,
        }
    }
}

/// Commands from the handle to the session loop.
#[derive(Debug)]
enum Command {
    Resync,
    Dispatch(Action),
}

/// Completions routed back into the loop from spawned tasks.
#[derive(Debug)]
enum TaskOutcome {
    GamePull(PullTicket, Result<Game>),
    RoundPull(PullTicket, Result<Round>),
    Action(ActionKind, Result<()>),
}

// ── Shared state ────────────────────────────────────────────────────

/// State shared between the handle and the session loop.
struct SharedState {
    running: AtomicBool,
    view: Mutex<GameView>,
}

impl SharedState {
    fn new() -> Self {
        Self {
            running: AtomicBool::new(true),
            view: Mutex::new(GameView::Uninitialized),
        }
    }
}

// ── Session handle ──────────────────────────────────────────────────

/// Handle to a running game-view session.
///
/// Created via [`GameSession::start`]. All methods queue work and return
/// immediately; outcomes arrive as [`SessionEvent`]s.
pub struct GameSession {
    cmd_tx: mpsc::UnboundedSender<Command>,
    state: Arc<SharedState>,
    api: Arc<dyn GameApi>,
    game_id: GameId,
    task: Option<tokio::task::JoinHandle<()>>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
    shutdown_timeout: Duration,
}

impl GameSession {
    /// Start the session loop and return a handle plus event receiver.
    ///
    /// The loop immediately joins the game's room and pulls the first
    /// game snapshot (which cascades into a round snapshot when the game
    /// is in progress).
    #[must_use = "the event receiver must be used to receive events"]
    pub fn start(
        api: Arc<dyn GameApi>,
        channel: impl PushChannel,
        config: SessionConfig,
    ) -> (Self, mpsc::Receiver<SessionEvent>) {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<Command>();
        // Clamp capacity to at least 1 (tokio panics on 0).
        let capacity = config.event_channel_capacity.max(1);
        let (event_tx, event_rx) = mpsc::channel::<SessionEvent>(capacity);
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        let state = Arc::new(SharedState::new());
        let loop_state = Arc::clone(&state);
        let loop_api = Arc::clone(&api);
        let game_id = config.game_id;
        let shutdown_timeout = config.shutdown_timeout;

        let task = tokio::spawn(session_loop(
            channel,
            loop_api,
            config,
            cmd_rx,
            event_tx,
            loop_state,
            shutdown_rx,
        ));

        let session = Self {
            cmd_tx,
            state,
            api,
            game_id,
            task: Some(task),
            shutdown_tx: Some(shutdown_tx),
            shutdown_timeout,
        };

        (session, event_rx)
    }

    // ── Synchronization ─────────────────────────────────────────────

    /// Re-pull the authoritative game (and, when in progress, round)
    /// snapshot. The funnel for every resynchronization trigger: view
    /// re-enter, channel reconnect, manual refresh control.
    ///
    /// # Errors
    ///
    /// Returns [`DecoyError::NotRunning`] if the session has shut down.
    pub fn resync(&self) -> Result<()> {
        self.send(Command::Resync)
    }

    // ── Round actions (fire-and-forget) ─────────────────────────────

    /// Commit the question for the current round (question master only).
    ///
    /// # Errors
    ///
    /// Returns [`DecoyError::NotRunning`] if the session has shut down.
    pub fn pick_question(&self, question_id: QuestionId) -> Result<()> {
        self.send(Command::Dispatch(Action::PickQuestion(question_id)))
    }

    /// Submit a decoy answer for the current round.
    ///
    /// # Errors
    ///
    /// Returns [`DecoyError::NotRunning`] if the session has shut down.
    pub fn submit_answer(&self, text: impl Into<String>) -> Result<()> {
        self.send(Command::Dispatch(Action::SubmitAnswer(text.into())))
    }

    /// Cast a vote for one ballot entry.
    ///
    /// # Errors
    ///
    /// Returns [`DecoyError::NotRunning`] if the session has shut down.
    pub fn submit_vote(&self, answer_id: AnswerId) -> Result<()> {
        self.send(Command::Dispatch(Action::SubmitVote(answer_id)))
    }

    /// Advance past `results` (question master only).
    ///
    /// # Errors
    ///
    /// Returns [`DecoyError::NotRunning`] if the session has shut down.
    pub fn advance_round(&self) -> Result<()> {
        self.send(Command::Dispatch(Action::AdvanceRound))
    }

    // ── Lobby actions (fire-and-forget) ─────────────────────────────

    /// Start the game (creator or admin only).
    ///
    /// # Errors
    ///
    /// Returns [`DecoyError::NotRunning`] if the session has shut down.
    pub fn start_game(&self) -> Result<()> {
        self.send(Command::Dispatch(Action::StartGame))
    }

    /// Join the game while it is in the lobby.
    ///
    /// # Errors
    ///
    /// Returns [`DecoyError::NotRunning`] if the session has shut down.
    pub fn join_game(&self) -> Result<()> {
        self.send(Command::Dispatch(Action::JoinGame))
    }

    /// Leave the game while it is in the lobby.
    ///
    /// # Errors
    ///
    /// Returns [`DecoyError::NotRunning`] if the session has shut down.
    pub fn leave_game(&self) -> Result<()> {
        self.send(Command::Dispatch(Action::LeaveGame))
    }

    /// Delete the game. Subscribers observe `game_deleted`.
    ///
    /// # Errors
    ///
    /// Returns [`DecoyError::NotRunning`] if the session has shut down.
    pub fn delete_game(&self) -> Result<()> {
        self.send(Command::Dispatch(Action::DeleteGame))
    }

    // ── Question bank ───────────────────────────────────────────────

    /// Fetch a page of pickable questions for the picking view.
    ///
    /// A direct, idempotent pull — it does not touch the round record, so
    /// it bypasses the session loop entirely.
    ///
    /// # Errors
    ///
    /// Propagates the API error, including the server's rejection when
    /// the viewer is not the question master.
    pub async fn available_questions(&self, filter: &QuestionFilter) -> Result<QuestionPage> {
        self.api.available_questions(self.game_id, filter).await
    }

    // ── State accessors ─────────────────────────────────────────────

    /// The game this session synchronizes.
    pub fn game_id(&self) -> GameId {
        self.game_id
    }

    /// Returns `true` while the session loop is running.
    pub fn is_running(&self) -> bool {
        self.state.running.load(Ordering::Acquire)
    }

    /// The most recently published view model.
    ///
    /// Useful for late subscribers; continuous consumers should render
    /// from [`SessionEvent::ViewChanged`] instead.
    pub async fn current_view(&self) -> GameView {
        self.state.view.lock().await.clone()
    }

    /// Shut down the session: leave the game room, close the channel,
    /// stop the background task.
    ///
    /// The event receiver yields [`SessionEvent::Closed`] and then `None`
    /// once the loop exits.
    pub async fn shutdown(&mut self) {
        debug!(game_id = self.game_id, "GameSession: shutdown requested");

        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }

        // Await the loop with a timeout; abort if it does not exit so the
        // task cannot detach and run indefinitely.
        if let Some(mut task) = self.task.take() {
            match tokio::time::timeout(self.shutdown_timeout, &mut task).await {
                Ok(Ok(())) => {}
                Ok(Err(join_err)) => {
                    warn!("session loop terminated with join error: {join_err}");
                }
                Err(_) => {
                    warn!("session loop did not exit within timeout; aborting task");
                    task.abort();
                    if let Err(join_err) = task.await {
                        debug!("session loop aborted: {join_err}");
                    }
                }
            }
        }

        self.state.running.store(false, Ordering::Release);
    }

    // ── Internal helpers ────────────────────────────────────────────

    fn send(&self, cmd: Command) -> Result<()> {
        if !self.state.running.load(Ordering::Acquire) {
            return Err(DecoyError::NotRunning);
        }
        self.cmd_tx.send(cmd).map_err(|_| DecoyError::NotRunning)
    }
}

impl std::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("game_id", &self.game_id)
            .field("running", &self.is_running())
            .field("has_task", &self.task.is_some())
            .finish()
    }
}

impl Drop for GameSession {
    fn drop(&mut self) {
        // `Drop` is synchronous, so the graceful path (which awaits
        // `channel.close()`) cannot run here. Aborting the task drops the
        // loop future immediately; in-flight pulls die unredeemed.
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

// ── Session loop ────────────────────────────────────────────────────

/// Background loop multiplexing handle commands, push-channel frames, and
/// completed snapshot/action tasks via `tokio::select!`.
///
/// Exits when the command channel closes (handle dropped), or on the
/// shutdown signal. Channel loss does **not** exit the loop: the view
/// must stay serviceable through pulls alone.
async fn session_loop(
    mut channel: impl PushChannel,
    api: Arc<dyn GameApi>,
    config: SessionConfig,
    mut cmd_rx: mpsc::UnboundedReceiver<Command>,
    event_tx: mpsc::Sender<SessionEvent>,
    state: Arc<SharedState>,
    mut shutdown_rx: tokio::sync::oneshot::Receiver<()>,
) {
    let game_id = config.game_id;
    let snapshot_timeout = config.snapshot_timeout;
    let mut engine = RoundEngine::new(game_id, config.viewer);
    let (task_tx, mut task_rx) = mpsc::unbounded_channel::<TaskOutcome>();
    let mut channel_open = true;
    let mut last_view = GameView::Uninitialized;

    debug!(game_id, "session loop started");

    // Acquire the room subscription, then pull the initial snapshot.
    if let Err(e) = send_room_command(&mut channel, &RoomCommand::JoinGameRoom(game_id)).await {
        warn!(game_id, "failed to join game room: {e}");
        channel_open = false;
        emit_event(
            &event_tx,
            SessionEvent::ChannelLost {
                reason: Some(e.to_string()),
            },
        );
    }
    spawn_game_pull(&api, game_id, engine.begin_pull(), snapshot_timeout, &task_tx);

    loop {
        tokio::select! {
            // Branch 1: command from the handle
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(Command::Resync) => {
                        debug!(game_id, "resync requested");
                        spawn_game_pull(&api, game_id, engine.begin_pull(), snapshot_timeout, &task_tx);
                    }
                    Some(Command::Dispatch(action)) => {
                        spawn_action(&api, game_id, action, &task_tx);
                    }
                    // Command channel closed — handle dropped.
                    None => {
                        debug!(game_id, "command channel closed, shutting down session loop");
                        release_room(&mut channel, channel_open, game_id).await;
                        break;
                    }
                }
            }

            // Branch 2: shutdown signal
            _ = &mut shutdown_rx => {
                debug!(game_id, "shutdown signal received");
                release_room(&mut channel, channel_open, game_id).await;
                break;
            }

            // Branch 3: completed snapshot pull or action
            outcome = task_rx.recv() => {
                // The loop holds `task_tx`, so `recv` cannot yield `None`.
                let Some(outcome) = outcome else { continue };
                match outcome {
                    TaskOutcome::GamePull(ticket, Ok(game)) => {
                        let effects = engine.complete_game_pull(ticket, game);
                        run_effects(&api, &engine, effects, snapshot_timeout, &task_tx, &event_tx).await;
                        publish_view(&engine, &state, &event_tx, &mut last_view).await;
                    }
                    TaskOutcome::RoundPull(ticket, Ok(round)) => {
                        if engine.complete_round_pull(ticket, round) {
                            publish_view(&engine, &state, &event_tx, &mut last_view).await;
                        }
                    }
                    TaskOutcome::GamePull(_, Err(e)) | TaskOutcome::RoundPull(_, Err(e)) => {
                        debug!(game_id, "snapshot pull failed: {e}");
                        emit_event(&event_tx, SessionEvent::SyncFailed {
                            message: e.to_string(),
                        });
                    }
                    TaskOutcome::Action(_, Ok(())) => {
                        // The effect arrives through the push channel (or
                        // the next resync), never from the response body.
                    }
                    TaskOutcome::Action(kind, Err(e)) => {
                        debug!(game_id, ?kind, "action rejected: {e}");
                        emit_event(&event_tx, SessionEvent::ActionFailed {
                            action: kind,
                            message: e.to_string(),
                        });
                    }
                }
            }

            // Branch 4: incoming frame from the push channel
            incoming = channel.recv(), if channel_open => {
                match incoming {
                    Some(Ok(text)) => {
                        match ChannelEvent::parse(&text) {
                            Ok(event) => {
                                let effects = engine.apply_event(event);
                                run_effects(&api, &engine, effects, snapshot_timeout, &task_tx, &event_tx).await;
                                publish_view(&engine, &state, &event_tx, &mut last_view).await;
                            }
                            Err(e) => {
                                warn!(game_id, "failed to parse channel frame: {e} — raw: {text}");
                            }
                        }
                    }
                    Some(Err(e)) => {
                        warn!(game_id, "channel receive error: {e}");
                        channel_open = false;
                        emit_event(&event_tx, SessionEvent::ChannelLost {
                            reason: Some(e.to_string()),
                        });
                    }
                    None => {
                        debug!(game_id, "push channel closed by server");
                        channel_open = false;
                        emit_event(&event_tx, SessionEvent::ChannelLost { reason: None });
                    }
                }
            }
        }
    }

    state.running.store(false, Ordering::Release);
    emit_terminal(&event_tx, SessionEvent::Closed).await;
    debug!(game_id, "session loop exited");
}

/// Process engine effects: spawn follow-up pulls and deliver terminal
/// events in order.
async fn run_effects(
    api: &Arc<dyn GameApi>,
    engine: &RoundEngine,
    effects: Vec<Effect>,
    snapshot_timeout: Duration,
    task_tx: &mpsc::UnboundedSender<TaskOutcome>,
    event_tx: &mpsc::Sender<SessionEvent>,
) {
    for effect in effects {
        match effect {
            Effect::PullRound => {
                spawn_round_pull(api, engine.game_id(), engine.begin_pull(), snapshot_timeout, task_tx);
            }
            Effect::PullGame => {
                spawn_game_pull(api, engine.game_id(), engine.begin_pull(), snapshot_timeout, task_tx);
            }
            Effect::Finished => {
                let scores = engine.final_scores().map(<[ScoreEntry]>::to_vec).unwrap_or_default();
                emit_terminal(event_tx, SessionEvent::GameFinished { scores }).await;
            }
            Effect::NavigateAway => {
                emit_terminal(event_tx, SessionEvent::GameDeleted).await;
            }
        }
    }
}

/// Store and publish the projection if it changed.
async fn publish_view(
    engine: &RoundEngine,
    state: &Arc<SharedState>,
    event_tx: &mpsc::Sender<SessionEvent>,
    last_view: &mut GameView,
) {
    let view = engine.view();
    if view == *last_view {
        return;
    }
    *last_view = view.clone();
    *state.view.lock().await = view.clone();
    emit_event(event_tx, SessionEvent::ViewChanged(view));
}

/// Serialize and send one room command over the channel.
async fn send_room_command(
    channel: &mut impl PushChannel,
    command: &RoomCommand,
) -> Result<()> {
    let frame = serde_json::to_string(command)?;
    channel.send(frame).await
}

/// Release the room subscription and close the channel on the way out.
async fn release_room(channel: &mut impl PushChannel, channel_open: bool, game_id: GameId) {
    if channel_open {
        if let Err(e) = send_room_command(channel, &RoomCommand::LeaveGameRoom(game_id)).await {
            debug!(game_id, "failed to leave game room during shutdown: {e}");
        }
    }
    let _ = channel.close().await;
}

/// Emit a non-terminal event. If the channel is full, log and drop it to
/// avoid blocking the session loop.
fn emit_event(event_tx: &mpsc::Sender<SessionEvent>, event: SessionEvent) {
    match event_tx.try_send(event) {
        Ok(()) => {}
        Err(mpsc::error::TrySendError::Full(dropped)) => {
            warn!(
                "event channel full, dropping event: {:?}",
                std::mem::discriminant(&dropped)
            );
        }
        Err(mpsc::error::TrySendError::Closed(_)) => {
            debug!("event channel closed, receiver dropped");
        }
    }
}

/// Emit a terminal event with a blocking send — terminal events are never
/// silently dropped, whatever the channel backlog.
async fn emit_terminal(event_tx: &mpsc::Sender<SessionEvent>, event: SessionEvent) {
    if event_tx.send(event).await.is_err() {
        debug!("event channel closed, receiver dropped");
    }
}

// ── Spawned tasks ───────────────────────────────────────────────────

fn spawn_game_pull(
    api: &Arc<dyn GameApi>,
    game_id: GameId,
    ticket: PullTicket,
    snapshot_timeout: Duration,
    task_tx: &mpsc::UnboundedSender<TaskOutcome>,
) {
    let api = Arc::clone(api);
    let task_tx = task_tx.clone();
    tokio::spawn(async move {
        let result = match tokio::time::timeout(snapshot_timeout, api.get_game(game_id)).await {
            Ok(result) => result,
            Err(_) => Err(DecoyError::Timeout),
        };
        let _ = task_tx.send(TaskOutcome::GamePull(ticket, result));
    });
}

fn spawn_round_pull(
    api: &Arc<dyn GameApi>,
    game_id: GameId,
    ticket: PullTicket,
    snapshot_timeout: Duration,
    task_tx: &mpsc::UnboundedSender<TaskOutcome>,
) {
    let api = Arc::clone(api);
    let task_tx = task_tx.clone();
    tokio::spawn(async move {
        let result = match tokio::time::timeout(snapshot_timeout, api.get_round(game_id)).await {
            Ok(result) => result,
            Err(_) => Err(DecoyError::Timeout),
        };
        let _ = task_tx.send(TaskOutcome::RoundPull(ticket, result));
    });
}

fn spawn_action(
    api: &Arc<dyn GameApi>,
    game_id: GameId,
    action: Action,
    task_tx: &mpsc::UnboundedSender<TaskOutcome>,
) {
    let api = Arc::clone(api);
    let task_tx = task_tx.clone();
    let kind = action.kind();
    tokio::spawn(async move {
        let result = match action {
            Action::PickQuestion(question_id) => api.pick_question(game_id, question_id).await,
            Action::SubmitAnswer(text) => api.submit_answer(game_id, &text).await,
            Action::SubmitVote(answer_id) => api.submit_vote(game_id, answer_id).await,
            Action::AdvanceRound => api.advance_round(game_id).await,
            Action::StartGame => api.start_game(game_id).await,
            Action::JoinGame => api.join_game(game_id).await,
            Action::LeaveGame => api.leave_game(game_id).await,
            Action::DeleteGame => api.delete_game(game_id).await,
        };
        let _ = task_tx.send(TaskOutcome::Action(kind, result));
    });
}
