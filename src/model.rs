//! Wire-compatible data records for the Decoy game server.
//!
//! Every type in this module deserializes the JSON the server emits from
//! its REST snapshot endpoints and (for the cheap, low-risk kinds) its push
//! events. Two rules shape the module:
//!
//! - Records are adopted **wholesale** — the engine replaces a whole
//!   [`Game`] or [`Round`] on every reconciliation, never patching fields,
//!   so additive server fields use `#[serde(default)]` rather than
//!   breaking deserialization.
//! - Viewer-relative fields (`my_answer`, `my_vote`) are resolved
//!   server-side for the requesting identity. A round snapshot for one
//!   viewer is not valid for another.

use serde::{Deserialize, Serialize};

// ── Type aliases ────────────────────────────────────────────────────

/// Unique identifier for games.
pub type GameId = u64;

/// Unique identifier for users (and thus players).
pub type UserId = u64;

/// Unique identifier for questions in the question bank.
pub type QuestionId = u64;

/// Unique identifier for answers within a round.
pub type AnswerId = u64;

// ── Enums ───────────────────────────────────────────────────────────

/// Lifecycle status of a game.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    /// Waiting for players to join; roster may still change.
    #[default]
    Lobby,
    /// Rounds are being played.
    InProgress,
    /// Terminal. Scores are final; the viewer should navigate away.
    Finished,
}

/// How a game decides it is over.
///
/// Termination itself is server-decided: the client reads
/// [`GameStatus::Finished`] and [`Round::final_round`] rather than
/// recomputing either condition from scores.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum EndCondition {
    /// A fixed number of full question-master rotations.
    Cycles { cycles: u32 },
    /// First player to reach a target score.
    TargetScore { points: u32 },
}

impl Default for EndCondition {
    fn default() -> Self {
        Self::Cycles { cycles: 1 }
    }
}

/// Phase of a round, in forward order.
///
/// The server's phase vocabulary is allowed to grow; anything this build
/// does not recognize deserializes as [`RoundPhase::Unknown`] and renders
/// as a loading placeholder instead of failing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RoundPhase {
    /// The question master is choosing a question.
    Picking,
    /// Players are writing decoy answers.
    Answering,
    /// Players are voting on the shuffled answer pool.
    Voting,
    /// Authors, the genuine answer, and votes are revealed.
    Results,
    /// A phase this client build does not know about.
    #[serde(other)]
    Unknown,
}

// ── Structs ─────────────────────────────────────────────────────────

/// A player in a game's roster.
///
/// `turn_order` values form a permutation of `1..=N` while the game is in
/// `lobby` or `in_progress`; the question master rotates through them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Player {
    pub user_id: UserId,
    pub display_name: String,
    pub turn_order: u32,
    /// Cumulative score. Recomputed server-side on every round transition.
    #[serde(default)]
    pub score: u32,
}

/// Coarse-grained game record: lifecycle status and roster.
///
/// Updated less frequently than the round record and replaced wholesale on
/// each reconciliation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Game {
    pub id: GameId,
    pub status: GameStatus,
    #[serde(default)]
    pub end_condition: EndCondition,
    /// Roster ordered by `turn_order`.
    pub players: Vec<Player>,
    pub created_by: UserId,
    pub creator_name: String,
    /// Number of the round currently being played (0 while in lobby).
    #[serde(default)]
    pub current_round: u32,
}

impl Game {
    /// Looks up a player by user id.
    pub fn player(&self, user_id: UserId) -> Option<&Player> {
        self.players.iter().find(|p| p.user_id == user_id)
    }

    /// Whether the given user is on the roster.
    pub fn has_player(&self, user_id: UserId) -> bool {
        self.player(user_id).is_some()
    }
}

/// Lightweight reference to a player, used where the full roster entry
/// would be redundant (question master, answer author).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerRef {
    pub user_id: UserId,
    pub display_name: String,
}

/// One selectable option on the voting ballot.
///
/// Shuffled and stripped of authorship server-side before it ever reaches
/// a client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BallotEntry {
    pub answer_id: AnswerId,
    pub text: String,
}

/// A fully revealed answer, present only in `results` snapshots.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnswerReveal {
    pub answer_id: AnswerId,
    pub text: String,
    /// Author of the decoy; `None` marks the genuine answer.
    pub author: Option<PlayerRef>,
    pub is_genuine: bool,
    /// Votes this answer received.
    pub votes: u32,
}

/// Per-player cumulative score entry. Read-only derived data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoreEntry {
    pub user_id: UserId,
    pub display_name: String,
    pub score: u32,
}

/// The viewer's own submitted answer, echoed back by the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubmittedAnswer {
    pub answer_id: AnswerId,
    pub text: String,
}

/// Authoritative snapshot of the round currently being played, resolved
/// for the requesting viewer.
///
/// What the server includes depends on the phase *and* on who is asking:
/// `question` is absent during `picking`, `ballot` is populated from
/// `voting`, `answers` only at `results`, and `my_answer`/`my_vote` exist
/// only for the requesting viewer. The engine adopts the record as-is and
/// never infers a phase locally.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Round {
    pub game_id: GameId,
    /// Round number, monotonic per game.
    pub number: u32,
    pub question_master: PlayerRef,
    pub phase: RoundPhase,
    /// Question text; populated once the question master has picked.
    #[serde(default)]
    pub question: Option<String>,
    /// How many non-question-master players have submitted an answer.
    #[serde(default)]
    pub answered_count: u32,
    /// How many non-question-master players have cast a vote.
    #[serde(default)]
    pub vote_count: u32,
    /// Shuffled, author-stripped voting options (phase ≥ voting).
    #[serde(default)]
    pub ballot: Vec<BallotEntry>,
    /// Revealed answers (phase = results only).
    #[serde(default)]
    pub answers: Vec<AnswerReveal>,
    /// Cumulative scores as of this round.
    #[serde(default)]
    pub scores: Vec<ScoreEntry>,
    /// The requesting viewer's submitted answer, if any.
    #[serde(default)]
    pub my_answer: Option<SubmittedAnswer>,
    /// The requesting viewer's cast vote, if any.
    #[serde(default)]
    pub my_vote: Option<AnswerId>,
    /// Server-decided: no further round follows this one.
    #[serde(default)]
    pub final_round: bool,
}

impl Round {
    /// Whether the given user is this round's question master.
    pub fn is_question_master(&self, user_id: UserId) -> bool {
        self.question_master.user_id == user_id
    }
}

/// Identity of the local viewer, supplied by the session context.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Viewer {
    pub user_id: UserId,
    pub display_name: String,
    #[serde(default)]
    pub is_admin: bool,
}

impl Viewer {
    /// Create a viewer identity.
    pub fn new(user_id: UserId, display_name: impl Into<String>) -> Self {
        Self {
            user_id,
            display_name: display_name.into(),
            is_admin: false,
        }
    }

    /// Mark this viewer as an admin (may start games they did not create).
    #[must_use]
    pub fn with_admin(mut self, is_admin: bool) -> Self {
        self.is_admin = is_admin;
        self
    }
}

// ── Question bank ───────────────────────────────────────────────────

/// A pickable question, visible to the question master during `picking`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Question {
    pub id: QuestionId,
    pub question_text: String,
    #[serde(default)]
    pub category: Option<String>,
}

/// Filter for paging through the question bank.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct QuestionFilter {
    /// Restrict to one category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Questions to exclude (already used or rejected this game).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude_ids: Vec<QuestionId>,
    /// Zero-based page index.
    #[serde(default)]
    pub page: u32,
    /// Page size; server clamps to its own maximum.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
}

impl QuestionFilter {
    /// Restrict the page to one category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Exclude the given question ids from the page.
    #[must_use]
    pub fn with_excluded(mut self, ids: Vec<QuestionId>) -> Self {
        self.exclude_ids = ids;
        self
    }

    /// Request a specific zero-based page.
    #[must_use]
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }
}

/// One page of pickable questions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuestionPage {
    pub questions: Vec<Question>,
    pub total: u32,
    pub page: u32,
}

// ── Lobby listing ───────────────────────────────────────────────────

/// A game as it appears in the lobby listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameSummary {
    pub id: GameId,
    pub status: GameStatus,
    pub creator_name: String,
    pub player_count: u32,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn unknown_round_phase_deserializes() {
        let phase: RoundPhase = serde_json::from_str("\"tiebreak\"").unwrap();
        assert_eq!(phase, RoundPhase::Unknown);
    }

    #[test]
    fn round_minimal_payload_deserializes_with_defaults() {
        // A picking-phase snapshot for a non-question-master carries almost
        // nothing; every optional field must default cleanly.
        let json = serde_json::json!({
            "game_id": 7,
            "number": 1,
            "question_master": { "user_id": 3, "display_name": "Niki" },
            "phase": "picking",
        });
        let round: Round = serde_json::from_value(json).unwrap();
        assert_eq!(round.phase, RoundPhase::Picking);
        assert!(round.question.is_none());
        assert!(round.ballot.is_empty());
        assert!(round.answers.is_empty());
        assert!(round.my_answer.is_none());
        assert!(!round.final_round);
    }

    #[test]
    fn end_condition_wire_forms() {
        let cycles: EndCondition =
            serde_json::from_str(r#"{"mode":"cycles","cycles":2}"#).unwrap();
        assert_eq!(cycles, EndCondition::Cycles { cycles: 2 });

        let target: EndCondition =
            serde_json::from_str(r#"{"mode":"target_score","points":10}"#).unwrap();
        assert_eq!(target, EndCondition::TargetScore { points: 10 });
    }

    #[test]
    fn game_player_lookup() {
        let game = Game {
            id: 1,
            status: GameStatus::Lobby,
            end_condition: EndCondition::default(),
            players: vec![Player {
                user_id: 9,
                display_name: "Eleni".into(),
                turn_order: 1,
                score: 0,
            }],
            created_by: 9,
            creator_name: "Eleni".into(),
            current_round: 0,
        };
        assert!(game.has_player(9));
        assert!(!game.has_player(10));
        assert_eq!(game.player(9).unwrap().display_name, "Eleni");
    }
}
