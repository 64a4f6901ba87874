#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing
)]
//! Shared test utilities for Decoy client integration tests.
//!
//! Provides a scriptable [`MockChannel`] (seed frames consumed in order,
//! then live frames pushed through [`MockChannelHandle`]), an in-memory
//! [`MockApi`] whose snapshots tests mutate between pulls, and builders
//! for common records.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex};

use async_trait::async_trait;
use tokio::sync::mpsc;

use decoy_client::api::GameApi;
use decoy_client::error::{DecoyError, Result};
use decoy_client::event::ChannelEvent;
use decoy_client::model::{
    AnswerId, Game, GameId, GameStatus, GameSummary, Player, PlayerRef, Question,
    QuestionFilter, QuestionId, QuestionPage, Round, RoundPhase, ScoreEntry, Viewer,
};
use decoy_client::PushChannel;

// ── MockChannel ─────────────────────────────────────────────────────

type Frame = Option<std::result::Result<String, DecoyError>>;

/// A push channel for tests: scripted seed frames first, then frames
/// injected live through the paired [`MockChannelHandle`].
///
/// A `None` frame signals a clean channel close. When the script runs dry
/// and the handle is dropped, `recv` hangs forever so the session loop
/// stays alive until shutdown.
pub struct MockChannel {
    seed: VecDeque<Frame>,
    live_rx: mpsc::UnboundedReceiver<Frame>,
    sent: Arc<StdMutex<Vec<String>>>,
    closed: Arc<AtomicBool>,
}

/// Test-side handle for a [`MockChannel`].
#[derive(Clone)]
pub struct MockChannelHandle {
    live_tx: mpsc::UnboundedSender<Frame>,
    /// Frames the client sent (room commands).
    pub sent: Arc<StdMutex<Vec<String>>>,
    /// Whether `close()` was called.
    pub closed: Arc<AtomicBool>,
}

impl MockChannel {
    /// Create a channel with the given seed frames.
    pub fn new(seed: Vec<Frame>) -> (Self, MockChannelHandle) {
        let (live_tx, live_rx) = mpsc::unbounded_channel();
        let sent = Arc::new(StdMutex::new(Vec::new()));
        let closed = Arc::new(AtomicBool::new(false));
        let channel = Self {
            seed: VecDeque::from(seed),
            live_rx,
            sent: Arc::clone(&sent),
            closed: Arc::clone(&closed),
        };
        (
            channel,
            MockChannelHandle {
                live_tx,
                sent,
                closed,
            },
        )
    }

    /// Create a channel with no seed frames.
    pub fn live() -> (Self, MockChannelHandle) {
        Self::new(Vec::new())
    }
}

impl MockChannelHandle {
    /// Deliver a push event to the client.
    pub fn push_event(&self, event: &ChannelEvent) {
        let frame = serde_json::to_string(event).expect("event serialization");
        let _ = self.live_tx.send(Some(Ok(frame)));
    }

    /// Deliver a raw frame (possibly malformed) to the client.
    pub fn push_frame(&self, frame: impl Into<String>) {
        let _ = self.live_tx.send(Some(Ok(frame.into())));
    }

    /// Deliver a channel error to the client.
    pub fn push_error(&self, message: impl Into<String>) {
        let _ = self
            .live_tx
            .send(Some(Err(DecoyError::ChannelReceive(message.into()))));
    }

    /// Close the channel from the server side.
    pub fn close_channel(&self) {
        let _ = self.live_tx.send(None);
    }

    /// Room commands the client has sent so far, decoded from JSON.
    pub fn sent_commands(&self) -> Vec<serde_json::Value> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|frame| serde_json::from_str(frame).expect("sent frame is JSON"))
            .collect()
    }
}

#[async_trait]
impl PushChannel for MockChannel {
    async fn send(&mut self, message: String) -> std::result::Result<(), DecoyError> {
        self.sent.lock().unwrap().push(message);
        Ok(())
    }

    async fn recv(&mut self) -> Option<std::result::Result<String, DecoyError>> {
        if let Some(frame) = self.seed.pop_front() {
            return frame;
        }
        match self.live_rx.recv().await {
            Some(frame) => frame,
            // Handle dropped with nothing queued — hang forever so the
            // session loop stays alive until shutdown is called.
            None => std::future::pending().await,
        }
    }

    async fn close(&mut self) -> std::result::Result<(), DecoyError> {
        self.closed.store(true, Ordering::Relaxed);
        Ok(())
    }
}

// ── MockApi ─────────────────────────────────────────────────────────

/// In-memory [`GameApi`] whose snapshots tests mutate between pulls.
///
/// Snapshot methods clone the stored record; a missing record produces
/// the server's "not found" rejection. Actions record their invocation
/// and succeed unless [`fail_actions_with`](MockApi::fail_actions_with)
/// scripted a rejection.
#[derive(Default)]
pub struct MockApi {
    game: StdMutex<Option<Game>>,
    round: StdMutex<Option<Round>>,
    questions: StdMutex<Vec<Question>>,
    action_error: StdMutex<Option<String>>,
    /// Recorded API invocations, e.g. `"get_round"`, `"pick_question:5"`.
    pub calls: StdMutex<Vec<String>>,
}

impl MockApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Set the game snapshot the next `get_game` serves.
    pub fn set_game(&self, game: Game) {
        *self.game.lock().unwrap() = Some(game);
    }

    /// Set the round snapshot the next `get_round` serves.
    pub fn set_round(&self, round: Round) {
        *self.round.lock().unwrap() = Some(round);
    }

    /// Remove the round snapshot (server has no active round).
    pub fn clear_round(&self) {
        *self.round.lock().unwrap() = None;
    }

    /// Make every action fail with the given server message.
    pub fn fail_actions_with(&self, message: impl Into<String>) {
        *self.action_error.lock().unwrap() = Some(message.into());
    }

    /// Set the question bank page served to the question master.
    pub fn set_questions(&self, questions: Vec<Question>) {
        *self.questions.lock().unwrap() = questions;
    }

    /// Recorded invocations so far.
    pub fn recorded_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    fn action(&self, call: String) -> Result<()> {
        self.record(call);
        match self.action_error.lock().unwrap().clone() {
            Some(message) => Err(DecoyError::Server {
                message,
                code: None,
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl GameApi for MockApi {
    async fn get_game(&self, _game_id: GameId) -> Result<Game> {
        self.record("get_game");
        self.game
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| DecoyError::Server {
                message: "game not found".into(),
                code: None,
            })
    }

    async fn get_round(&self, _game_id: GameId) -> Result<Round> {
        self.record("get_round");
        self.round
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| DecoyError::Server {
                message: "no active round".into(),
                code: None,
            })
    }

    async fn available_questions(
        &self,
        _game_id: GameId,
        filter: &QuestionFilter,
    ) -> Result<QuestionPage> {
        self.record("available_questions");
        let questions: Vec<Question> = self
            .questions
            .lock()
            .unwrap()
            .iter()
            .filter(|q| !filter.exclude_ids.contains(&q.id))
            .filter(|q| match &filter.category {
                Some(category) => q.category.as_deref() == Some(category.as_str()),
                None => true,
            })
            .cloned()
            .collect();
        let total = questions.len() as u32;
        Ok(QuestionPage {
            questions,
            total,
            page: filter.page,
        })
    }

    async fn list_games(&self) -> Result<Vec<GameSummary>> {
        self.record("list_games");
        Ok(self
            .game
            .lock()
            .unwrap()
            .iter()
            .map(|g| GameSummary {
                id: g.id,
                status: g.status,
                creator_name: g.creator_name.clone(),
                player_count: g.players.len() as u32,
            })
            .collect())
    }

    async fn create_game(&self) -> Result<GameId> {
        self.record("create_game");
        Ok(1)
    }

    async fn join_game(&self, game_id: GameId) -> Result<()> {
        self.action(format!("join_game:{game_id}"))
    }

    async fn leave_game(&self, game_id: GameId) -> Result<()> {
        self.action(format!("leave_game:{game_id}"))
    }

    async fn start_game(&self, game_id: GameId) -> Result<()> {
        self.action(format!("start_game:{game_id}"))
    }

    async fn delete_game(&self, game_id: GameId) -> Result<()> {
        self.action(format!("delete_game:{game_id}"))
    }

    async fn pick_question(&self, _game_id: GameId, question_id: QuestionId) -> Result<()> {
        self.action(format!("pick_question:{question_id}"))
    }

    async fn submit_answer(&self, _game_id: GameId, text: &str) -> Result<()> {
        self.action(format!("submit_answer:{text}"))
    }

    async fn submit_vote(&self, _game_id: GameId, answer_id: AnswerId) -> Result<()> {
        self.action(format!("submit_vote:{answer_id}"))
    }

    async fn advance_round(&self, _game_id: GameId) -> Result<()> {
        self.action("advance_round".into())
    }
}

// ── Record builders ─────────────────────────────────────────────────

pub fn viewer(user_id: u64) -> Viewer {
    Viewer::new(user_id, format!("player-{user_id}"))
}

pub fn player(user_id: u64, name: &str, turn_order: u32, score: u32) -> Player {
    Player {
        user_id,
        display_name: name.into(),
        turn_order,
        score,
    }
}

/// Three-player roster: Maria (1), Nikos (2), Eleni (3). Maria created
/// the game.
pub fn trio() -> Vec<Player> {
    vec![
        player(1, "Maria", 1, 0),
        player(2, "Nikos", 2, 0),
        player(3, "Eleni", 3, 0),
    ]
}

pub fn game_with(id: GameId, status: GameStatus, players: Vec<Player>) -> Game {
    Game {
        id,
        status,
        end_condition: Default::default(),
        players,
        created_by: 1,
        creator_name: "Maria".into(),
        current_round: match status {
            GameStatus::Lobby => 0,
            _ => 1,
        },
    }
}

pub fn lobby_game(id: GameId) -> Game {
    game_with(id, GameStatus::Lobby, trio())
}

pub fn in_progress_game(id: GameId) -> Game {
    game_with(id, GameStatus::InProgress, trio())
}

/// A round in the given phase, question-mastered by `qm`.
pub fn round_in(game_id: GameId, number: u32, qm: u64, phase: RoundPhase) -> Round {
    Round {
        game_id,
        number,
        question_master: PlayerRef {
            user_id: qm,
            display_name: format!("player-{qm}"),
        },
        phase,
        question: match phase {
            RoundPhase::Picking => None,
            _ => Some("Which planet has the longest day?".into()),
        },
        answered_count: 0,
        vote_count: 0,
        ballot: vec![],
        answers: vec![],
        scores: vec![],
        my_answer: None,
        my_vote: None,
        final_round: false,
    }
}

pub fn score(user_id: u64, name: &str, points: u32) -> ScoreEntry {
    ScoreEntry {
        user_id,
        display_name: name.into(),
        score: points,
    }
}
