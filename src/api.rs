//! Snapshot and action interface to the Decoy game server.
//!
//! The [`GameApi`] trait is the pull half of the hybrid sync design: the
//! push channel tells a client *that* something changed, this interface is
//! where it learns *what*. Snapshot methods are idempotent and stateless
//! from the engine's point of view — calling [`get_round`](GameApi::get_round)
//! at any time converges the client to the true server phase.
//!
//! Mutating calls are fire-and-forget: they return success or failure
//! only, and the engine never folds their response bodies into round
//! state. The observable effect always arrives through a push-triggered or
//! explicit resync, so there is exactly one source of truth.
//!
//! # Implementing
//!
//! The built-in [`HttpGameApi`](crate::apis::http::HttpGameApi) covers the
//! REST server (feature `api-http`). Tests and embedders with bespoke
//! backends implement the trait directly:
//!
//! ```rust,no_run
//! use async_trait::async_trait;
//! use decoy_client::api::GameApi;
//! use decoy_client::error::Result;
//! use decoy_client::model::*;
//!
//! struct MyApi { /* ... */ }
//!
//! #[async_trait]
//! impl GameApi for MyApi {
//!     async fn get_game(&self, game_id: GameId) -> Result<Game> {
//!         todo!()
//!     }
//!     // ...remaining methods
//! #   async fn get_round(&self, _: GameId) -> Result<Round> { todo!() }
//! #   async fn available_questions(&self, _: GameId, _: &QuestionFilter) -> Result<QuestionPage> { todo!() }
//! #   async fn list_games(&self) -> Result<Vec<GameSummary>> { todo!() }
//! #   async fn create_game(&self) -> Result<GameId> { todo!() }
//! #   async fn join_game(&self, _: GameId) -> Result<()> { todo!() }
//! #   async fn leave_game(&self, _: GameId) -> Result<()> { todo!() }
//! #   async fn start_game(&self, _: GameId) -> Result<()> { todo!() }
//! #   async fn delete_game(&self, _: GameId) -> Result<()> { todo!() }
//! #   async fn pick_question(&self, _: GameId, _: QuestionId) -> Result<()> { todo!() }
//! #   async fn submit_answer(&self, _: GameId, _: &str) -> Result<()> { todo!() }
//! #   async fn submit_vote(&self, _: GameId, _: AnswerId) -> Result<()> { todo!() }
//! #   async fn advance_round(&self, _: GameId) -> Result<()> { todo!() }
//! }
//! ```

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{
    AnswerId, Game, GameId, GameSummary, QuestionFilter, QuestionId, QuestionPage, Round,
};

/// Pull-based interface to the game server.
///
/// Object-safe; the session stores it as `Arc<dyn GameApi>` so action
/// dispatches and snapshot pulls can run as independent tasks.
#[async_trait]
pub trait GameApi: Send + Sync + 'static {
    // ── Snapshots ───────────────────────────────────────────────────

    /// Fetch the authoritative game record (status, roster, creator).
    async fn get_game(&self, game_id: GameId) -> Result<Game>;

    /// Fetch the authoritative current round, with viewer-relative fields
    /// resolved server-side for the authenticated identity.
    ///
    /// This is the sole resynchronization primitive: safe to call at any
    /// time, and always converges the client to the true server phase.
    async fn get_round(&self, game_id: GameId) -> Result<Round>;

    /// Fetch a page of pickable questions. Question-master only,
    /// enforced server-side.
    async fn available_questions(
        &self,
        game_id: GameId,
        filter: &QuestionFilter,
    ) -> Result<QuestionPage>;

    /// List games for the lobby screen.
    async fn list_games(&self) -> Result<Vec<GameSummary>>;

    // ── Game lifecycle actions (fire-and-forget) ────────────────────

    /// Create a new game, returning its id for navigation.
    async fn create_game(&self) -> Result<GameId>;

    /// Join a game that is still in the lobby.
    async fn join_game(&self, game_id: GameId) -> Result<()>;

    /// Leave a game while it is still in the lobby.
    async fn leave_game(&self, game_id: GameId) -> Result<()>;

    /// Start the game. Creator or admin only, enforced server-side.
    async fn start_game(&self, game_id: GameId) -> Result<()>;

    /// Delete the game. Subscribers observe a `game_deleted` push event.
    async fn delete_game(&self, game_id: GameId) -> Result<()>;

    // ── Round actions (fire-and-forget) ─────────────────────────────

    /// Commit the question for the current round (question master only).
    async fn pick_question(&self, game_id: GameId, question_id: QuestionId) -> Result<()>;

    /// Submit a decoy answer for the current round.
    async fn submit_answer(&self, game_id: GameId, text: &str) -> Result<()>;

    /// Cast a vote for one ballot entry.
    async fn submit_vote(&self, game_id: GameId, answer_id: AnswerId) -> Result<()>;

    /// Advance past `results`: next round, or end of game if this was the
    /// final round (question master only).
    async fn advance_round(&self, game_id: GameId) -> Result<()>;
}
