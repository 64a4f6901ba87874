//! Structured error codes returned by the Decoy game server.
//!
//! The server attaches these to rejection responses as
//! `SCREAMING_SNAKE_CASE` strings (e.g. `"NOT_QUESTION_MASTER"`). The
//! engine never branches on them to mutate round state — role and phase
//! preconditions are enforced server-side — but SDK consumers can use them
//! to decide between showing a message and forcing a resync.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Structured error codes returned by the Decoy game server.
///
/// Use [`description()`](ApiErrorCode::description) for a human-readable
/// explanation; the accompanying server message is surfaced verbatim via
/// [`DecoyError::Server`](crate::DecoyError::Server).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApiErrorCode {
    // Authentication errors
    Unauthorized,
    InvalidToken,
    SessionExpired,

    // Game membership errors
    GameNotFound,
    GameFull,
    AlreadyInGame,
    NotInGame,
    NotEnoughPlayers,
    GameAlreadyStarted,
    GameFinished,

    // Round precondition errors
    RoundNotFound,
    NotQuestionMaster,
    PhaseMismatch,
    AlreadyAnswered,
    AlreadyVoted,
    OwnAnswerVote,
    QuestionNotFound,

    // Rate limiting
    RateLimitExceeded,

    // Server errors
    InternalError,
    ServiceUnavailable,
}

impl ApiErrorCode {
    /// Returns a human-readable description of this error code.
    pub fn description(&self) -> &'static str {
        match self {
            // Authentication errors
            Self::Unauthorized => {
                "Access denied. Authentication credentials are missing or invalid."
            }
            Self::InvalidToken => {
                "The session token is invalid or malformed. Sign in again to obtain a new one."
            }
            Self::SessionExpired => "The session has expired. Sign in again to continue playing.",

            // Game membership errors
            Self::GameNotFound => {
                "The requested game could not be found. It may have been deleted."
            }
            Self::GameFull => "The game has reached its maximum player count.",
            Self::AlreadyInGame => "You have already joined this game.",
            Self::NotInGame => "You are not a player in this game.",
            Self::NotEnoughPlayers => {
                "The game needs at least three players before it can start."
            }
            Self::GameAlreadyStarted => "The game has already started and cannot be joined.",
            Self::GameFinished => "The game has finished. No further actions are accepted.",

            // Round precondition errors
            Self::RoundNotFound => {
                "No active round exists for this game. Refresh to resynchronize."
            }
            Self::NotQuestionMaster => {
                "Only the question master may perform this action for the current round."
            }
            Self::PhaseMismatch => {
                "The round is no longer in the phase this action requires. Refresh to catch up."
            }
            Self::AlreadyAnswered => "You have already submitted an answer for this round.",
            Self::AlreadyVoted => "You have already cast a vote for this round.",
            Self::OwnAnswerVote => "You cannot vote for your own answer.",
            Self::QuestionNotFound => {
                "The selected question no longer exists. Pick a different one."
            }

            // Rate limiting
            Self::RateLimitExceeded => {
                "Too many requests in a short time. Please slow down and try again."
            }

            // Server errors
            Self::InternalError => {
                "An internal server error occurred. Please try again in a moment."
            }
            Self::ServiceUnavailable => {
                "The service is temporarily unavailable. Please try again shortly."
            }
        }
    }
}

impl fmt::Display for ApiErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}
