//! Wire types for the realtime push channel.
//!
//! The channel is deliberately two-tier. Cheap, low-risk events carry
//! their full payload (`game_updated` roster changes, `game_finished`
//! final scores — the game is over, nothing can diverge afterwards).
//! Round content is privacy- and size-sensitive and is **never** embedded
//! in an event: `reload_round` and `game_started` only tell the client to
//! re-pull an authoritative, viewer-resolved snapshot. Preserve this
//! split; it is what keeps stale or leaking round data structurally
//! impossible.

use serde::{Deserialize, Serialize};

use crate::model::{Game, GameId, ScoreEntry};

/// Commands sent from the client to the push channel.
///
/// A client holds at most one game-room subscription at a time; entering a
/// new game view releases the previous room before joining the new one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum RoomCommand {
    /// Subscribe to a game's room.
    JoinGameRoom(GameId),
    /// Unsubscribe from a game's room.
    LeaveGameRoom(GameId),
    /// Subscribe to the global lobby room.
    JoinLobby,
    /// Unsubscribe from the global lobby room.
    LeaveLobby,
}

/// Named events delivered by the push channel while subscribed to a room.
///
/// Delivery is best-effort: events can arrive duplicated, late, or not at
/// all across a reconnect, which is why every consumer funnels back
/// through a snapshot pull for round content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ChannelEvent {
    /// Game metadata changed (e.g. roster change while in lobby).
    /// Carries the full replacement record.
    GameUpdated(Game),
    /// The game left the lobby. Carries the game record; round detail must
    /// still be pulled, since the event body cannot contain this viewer's
    /// private fields.
    GameStarted(Game),
    /// Another player's action changed the round. No payload by design —
    /// the receiver re-pulls the authoritative snapshot.
    ReloadRound,
    /// Terminal: the game is over. Carries the final score list directly;
    /// there is no further divergence risk.
    GameFinished { scores: Vec<ScoreEntry> },
    /// Terminal: the game was deleted. The viewer must navigate away.
    GameDeleted,
    /// The lobby listing changed; listing consumers should re-pull it.
    LobbyUpdated,
    /// An event kind this build does not recognize. Ignored, not an error
    /// — the server's event vocabulary is allowed to grow.
    #[serde(other)]
    Unknown,
}

impl ChannelEvent {
    /// Parse one raw channel frame.
    ///
    /// # Errors
    ///
    /// Returns a serialization error when the frame is not valid JSON or a
    /// known event kind carries a malformed body. Callers log and drop
    /// such frames rather than treating them as fatal.
    pub fn parse(raw: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing
)]
mod tests {
    use super::*;

    #[test]
    fn reload_round_has_no_payload() {
        let ev = ChannelEvent::parse(r#"{"event":"reload_round"}"#).unwrap();
        assert_eq!(ev, ChannelEvent::ReloadRound);
    }

    #[test]
    fn unrecognized_event_kind_parses_as_unknown() {
        let ev = ChannelEvent::parse(r#"{"event":"confetti_burst","data":{"x":1}}"#).unwrap();
        assert_eq!(ev, ChannelEvent::Unknown);
    }

    #[test]
    fn game_finished_carries_scores() {
        let json = serde_json::json!({
            "event": "game_finished",
            "data": { "scores": [
                { "user_id": 1, "display_name": "Maria", "score": 5 },
                { "user_id": 2, "display_name": "Nikos", "score": 3 },
            ]},
        });
        let ev: ChannelEvent = serde_json::from_value(json).unwrap();
        match ev {
            ChannelEvent::GameFinished { scores } => {
                assert_eq!(scores.len(), 2);
                assert_eq!(scores[0].score, 5);
            }
            other => panic!("expected GameFinished, got {other:?}"),
        }
    }

    #[test]
    fn room_command_wire_names() {
        let json = serde_json::to_string(&RoomCommand::JoinGameRoom(42)).unwrap();
        assert_eq!(json, r#"{"event":"join_game_room","data":42}"#);

        let json = serde_json::to_string(&RoomCommand::JoinLobby).unwrap();
        assert_eq!(json, r#"{"event":"join_lobby"}"#);
    }

    #[test]
    fn malformed_known_event_is_an_error() {
        // Known tag, wrong body shape — callers warn and drop.
        let result = ChannelEvent::parse(r#"{"event":"game_finished","data":{"scores":7}}"#);
        assert!(result.is_err());
    }
}
