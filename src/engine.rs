//! Round state machine: the reconciliation core.
//!
//! [`RoundEngine`] exclusively owns the live [`Game`] and [`Round`]
//! records for one game view and folds incoming signals — snapshot results
//! and push events — into them. Two rules keep the records trustworthy:
//!
//! - **Wholesale replacement.** A record is adopted in one piece or not at
//!   all; no field-by-field patching, so the UI can never render a
//!   half-updated intermediate.
//! - **Phase comes from the server.** The engine never infers a phase
//!   locally. Events that concern round content carry no round body; they
//!   yield [`Effect::PullRound`] and the snapshot endpoint answers with
//!   the truth, resolved for this viewer.
//!
//! Overlapping pulls are reconciled by completion order
//! (last-completion-wins) with an epoch guard so that a pull outliving a
//! `game_deleted`/`game_finished` event — or the session it belonged to —
//! is discarded instead of resurrecting dead state.
//!
//! The engine is synchronous and runtime-free; the async plumbing around
//! it lives in [`session`](crate::session).

use tracing::{debug, warn};

use crate::event::ChannelEvent;
use crate::model::{Game, GameId, GameStatus, Round, RoundPhase, ScoreEntry, Viewer};
use crate::view::{self, GameView};

/// Follow-up work the caller must perform after the engine absorbed a
/// signal. Effects are ordered; callers process them in sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Pull the authoritative round snapshot.
    PullRound,
    /// Pull the game record.
    PullGame,
    /// The game just ended; deliver the final standings.
    Finished,
    /// The game is gone; the viewer must navigate away.
    NavigateAway,
}

/// Identifies one in-flight snapshot pull.
///
/// Issued by [`RoundEngine::begin_pull`] and redeemed on completion. A
/// ticket from a stale epoch is refused, which is what lets the engine
/// disregard responses that arrive after a terminal event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PullTicket {
    epoch: u64,
}

/// Coarse phase of the whole game view, for logging and assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnginePhase {
    /// No game record (never loaded, or deleted).
    Uninitialized,
    /// Game exists, still gathering players.
    LobbyWait,
    /// Game in progress, round snapshot not yet adopted (or the phase
    /// vocabulary outgrew this build).
    RoundLoading,
    Picking,
    Answering,
    Voting,
    Results,
    /// Terminal for this game instance.
    Finished,
}

/// The client-side round/game state machine (see module docs).
#[derive(Debug)]
pub struct RoundEngine {
    game_id: GameId,
    viewer: Viewer,
    game: Option<Game>,
    round: Option<Round>,
    /// Final standings once the game ended; set from the `game_finished`
    /// payload or derived from a `finished` game snapshot.
    final_scores: Option<Vec<ScoreEntry>>,
    deleted: bool,
    /// Bumped on terminal transitions; outstanding tickets go stale.
    epoch: u64,
}

impl RoundEngine {
    /// Create an engine for one game view. No records are held until the
    /// first snapshot completes.
    pub fn new(game_id: GameId, viewer: Viewer) -> Self {
        Self {
            game_id,
            viewer,
            game: None,
            round: None,
            final_scores: None,
            deleted: false,
            epoch: 0,
        }
    }

    // ── Accessors ───────────────────────────────────────────────────

    /// The game this engine synchronizes.
    pub fn game_id(&self) -> GameId {
        self.game_id
    }

    /// The viewer the records are resolved for.
    pub fn viewer(&self) -> &Viewer {
        &self.viewer
    }

    /// Current game record, if one has been adopted.
    pub fn game(&self) -> Option<&Game> {
        self.game.as_ref()
    }

    /// Current round record, if one has been adopted.
    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    /// Final standings, once the game has ended.
    pub fn final_scores(&self) -> Option<&[ScoreEntry]> {
        self.final_scores.as_deref()
    }

    /// Coarse phase of the whole game view.
    pub fn phase(&self) -> EnginePhase {
        if self.deleted {
            return EnginePhase::Uninitialized;
        }
        if self.final_scores.is_some() {
            return EnginePhase::Finished;
        }
        let Some(game) = &self.game else {
            return EnginePhase::Uninitialized;
        };
        match game.status {
            GameStatus::Lobby => EnginePhase::LobbyWait,
            GameStatus::Finished => EnginePhase::Finished,
            GameStatus::InProgress => match &self.round {
                None => EnginePhase::RoundLoading,
                Some(round) => match round.phase {
                    RoundPhase::Picking => EnginePhase::Picking,
                    RoundPhase::Answering => EnginePhase::Answering,
                    RoundPhase::Voting => EnginePhase::Voting,
                    RoundPhase::Results => EnginePhase::Results,
                    RoundPhase::Unknown => EnginePhase::RoundLoading,
                },
            },
        }
    }

    /// Project the current records into the view model to render.
    pub fn view(&self) -> GameView {
        view::project(
            self.game.as_ref(),
            self.round.as_ref(),
            self.final_scores.as_deref(),
            self.deleted,
            &self.viewer,
        )
    }

    // ── Snapshot adoption ───────────────────────────────────────────

    /// Issue a ticket for a pull that is about to start.
    pub fn begin_pull(&self) -> PullTicket {
        PullTicket { epoch: self.epoch }
    }

    /// Adopt a completed game snapshot.
    ///
    /// Replacement is wholesale and ordered by completion: whichever pull
    /// redeems its ticket later wins, regardless of which was issued
    /// first. Stale-epoch tickets are refused.
    pub fn complete_game_pull(&mut self, ticket: PullTicket, game: Game) -> Vec<Effect> {
        if !self.ticket_live(ticket) {
            debug!(game_id = self.game_id, "discarding stale game snapshot");
            return Vec::new();
        }
        if game.id != self.game_id {
            warn!(
                expected = self.game_id,
                got = game.id,
                "game snapshot for a different game, discarding"
            );
            return Vec::new();
        }

        let status = game.status;
        self.game = Some(game);

        match status {
            GameStatus::InProgress => vec![Effect::PullRound],
            GameStatus::Finished => self.finish_from_roster(),
            GameStatus::Lobby => {
                // Back in (or still in) the lobby; any held round record
                // belongs to nothing current.
                self.round = None;
                Vec::new()
            }
        }
    }

    /// Adopt a completed round snapshot. Returns whether it was adopted.
    pub fn complete_round_pull(&mut self, ticket: PullTicket, round: Round) -> bool {
        if !self.ticket_live(ticket) {
            debug!(game_id = self.game_id, "discarding stale round snapshot");
            return false;
        }
        if round.game_id != self.game_id {
            warn!(
                expected = self.game_id,
                got = round.game_id,
                "round snapshot for a different game, discarding"
            );
            return false;
        }

        debug!(
            round = round.number,
            phase = ?round.phase,
            "adopted round snapshot"
        );
        self.round = Some(round);
        true
    }

    // ── Push events ─────────────────────────────────────────────────

    /// Apply one push event, returning the follow-up effects.
    ///
    /// Unknown event kinds are ignored (the vocabulary is allowed to
    /// grow); so is everything after `game_deleted`.
    pub fn apply_event(&mut self, event: ChannelEvent) -> Vec<Effect> {
        if self.deleted {
            debug!(game_id = self.game_id, "event after deletion, ignoring");
            return Vec::new();
        }

        match event {
            ChannelEvent::GameUpdated(game) => self.adopt_pushed_game(game, false),
            ChannelEvent::GameStarted(game) => self.adopt_pushed_game(game, true),
            ChannelEvent::ReloadRound => vec![Effect::PullRound],
            ChannelEvent::GameFinished { scores } => {
                // At-least-once delivery: a redelivered finish changes
                // nothing.
                if self.final_scores.is_some() {
                    return Vec::new();
                }
                debug!(game_id = self.game_id, "game finished");
                self.final_scores = Some(scores);
                self.epoch += 1;
                vec![Effect::Finished]
            }
            ChannelEvent::GameDeleted => {
                debug!(game_id = self.game_id, "game deleted");
                self.deleted = true;
                self.game = None;
                self.round = None;
                self.epoch += 1;
                vec![Effect::NavigateAway]
            }
            ChannelEvent::LobbyUpdated | ChannelEvent::Unknown => Vec::new(),
        }
    }

    // ── Internal helpers ────────────────────────────────────────────

    fn ticket_live(&self, ticket: PullTicket) -> bool {
        !self.deleted && ticket.epoch == self.epoch
    }

    /// Fold a game record carried by a push event.
    ///
    /// `force_round_pull` marks `game_started`, which always re-pulls;
    /// `game_updated` re-pulls only when the record says a round should
    /// exist and none is held (e.g. the update raced a reconnect).
    fn adopt_pushed_game(&mut self, game: Game, force_round_pull: bool) -> Vec<Effect> {
        if game.id != self.game_id {
            warn!(
                expected = self.game_id,
                got = game.id,
                "pushed game record for a different game, ignoring"
            );
            return Vec::new();
        }

        let status = game.status;
        self.game = Some(game);

        match status {
            GameStatus::InProgress if force_round_pull || self.round.is_none() => {
                vec![Effect::PullRound]
            }
            GameStatus::InProgress => Vec::new(),
            GameStatus::Finished => self.finish_from_roster(),
            GameStatus::Lobby => {
                self.round = None;
                Vec::new()
            }
        }
    }

    /// Enter the finished state using roster scores from the game record.
    fn finish_from_roster(&mut self) -> Vec<Effect> {
        if self.final_scores.is_some() {
            return Vec::new();
        }
        let scores = self
            .game
            .as_ref()
            .map(|game| {
                game.players
                    .iter()
                    .map(|p| ScoreEntry {
                        user_id: p.user_id,
                        display_name: p.display_name.clone(),
                        score: p.score,
                    })
                    .collect()
            })
            .unwrap_or_default();
        self.final_scores = Some(scores);
        self.epoch += 1;
        vec![Effect::Finished]
    }
}
