#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing
)]
//! Wire-format fixtures matching real server output.
//!
//! Each fixture is the literal JSON the game server emits, so a server
//! format change breaks loudly here before it breaks quietly in a live
//! game.

use decoy_client::event::ChannelEvent;
use decoy_client::model::{EndCondition, Game, GameStatus, Round, RoundPhase};

#[test]
fn game_snapshot_fixture() {
    let json = r#"{
        "id": 7,
        "status": "in_progress",
        "end_condition": { "mode": "cycles", "cycles": 2 },
        "players": [
            { "user_id": 1, "display_name": "Maria", "turn_order": 1, "score": 4 },
            { "user_id": 2, "display_name": "Nikos", "turn_order": 2, "score": 2 },
            { "user_id": 3, "display_name": "Eleni", "turn_order": 3, "score": 0 }
        ],
        "created_by": 1,
        "creator_name": "Maria",
        "current_round": 4
    }"#;

    let game: Game = serde_json::from_str(json).unwrap();
    assert_eq!(game.status, GameStatus::InProgress);
    assert_eq!(game.end_condition, EndCondition::Cycles { cycles: 2 });
    assert_eq!(game.players.len(), 3);
    assert_eq!(game.players[1].display_name, "Nikos");
    assert_eq!(game.current_round, 4);
}

#[test]
fn voting_round_fixture_for_a_regular_player() {
    let json = r#"{
        "game_id": 7,
        "number": 4,
        "question_master": { "user_id": 1, "display_name": "Maria" },
        "phase": "voting",
        "question": "Which planet has the longest day?",
        "answered_count": 2,
        "vote_count": 1,
        "ballot": [
            { "answer_id": 31, "text": "Venus" },
            { "answer_id": 32, "text": "Mercury" },
            { "answer_id": 33, "text": "Jupiter" }
        ],
        "my_answer": { "answer_id": 32, "text": "Mercury" },
        "final_round": false
    }"#;

    let round: Round = serde_json::from_str(json).unwrap();
    assert_eq!(round.phase, RoundPhase::Voting);
    assert_eq!(round.ballot.len(), 3);
    // Authors and reveal data are absent until results.
    assert!(round.answers.is_empty());
    assert_eq!(round.my_answer.as_ref().unwrap().answer_id, 32);
    assert!(round.my_vote.is_none());
}

#[test]
fn results_round_fixture_reveals_everything() {
    let json = r#"{
        "game_id": 7,
        "number": 4,
        "question_master": { "user_id": 1, "display_name": "Maria" },
        "phase": "results",
        "question": "Which planet has the longest day?",
        "answered_count": 2,
        "vote_count": 2,
        "answers": [
            { "answer_id": 31, "text": "Venus", "author": null, "is_genuine": true, "votes": 1 },
            { "answer_id": 32, "text": "Mercury", "author": { "user_id": 2, "display_name": "Nikos" }, "is_genuine": false, "votes": 1 }
        ],
        "scores": [
            { "user_id": 1, "display_name": "Maria", "score": 4 },
            { "user_id": 2, "display_name": "Nikos", "score": 3 },
            { "user_id": 3, "display_name": "Eleni", "score": 1 }
        ],
        "my_vote": 31,
        "final_round": true
    }"#;

    let round: Round = serde_json::from_str(json).unwrap();
    assert_eq!(round.phase, RoundPhase::Results);
    assert!(round.final_round);

    let genuine: Vec<_> = round.answers.iter().filter(|a| a.is_genuine).collect();
    assert_eq!(genuine.len(), 1);
    assert!(genuine[0].author.is_none());
    assert_eq!(round.answers[1].author.as_ref().unwrap().user_id, 2);
}

#[test]
fn push_event_fixtures() {
    let ev = ChannelEvent::parse(r#"{"event":"reload_round"}"#).unwrap();
    assert_eq!(ev, ChannelEvent::ReloadRound);

    let ev = ChannelEvent::parse(r#"{"event":"game_deleted"}"#).unwrap();
    assert_eq!(ev, ChannelEvent::GameDeleted);

    let ev = ChannelEvent::parse(r#"{"event":"lobby_updated"}"#).unwrap();
    assert_eq!(ev, ChannelEvent::LobbyUpdated);

    let ev = ChannelEvent::parse(
        r#"{"event":"game_finished","data":{"scores":[
            {"user_id":1,"display_name":"Maria","score":5}
        ]}}"#,
    )
    .unwrap();
    match ev {
        ChannelEvent::GameFinished { scores } => assert_eq!(scores[0].score, 5),
        other => panic!("expected GameFinished, got {other:?}"),
    }

    let ev = ChannelEvent::parse(
        r#"{"event":"game_started","data":{
            "id": 7,
            "status": "in_progress",
            "players": [],
            "created_by": 1,
            "creator_name": "Maria",
            "current_round": 1
        }}"#,
    )
    .unwrap();
    match ev {
        ChannelEvent::GameStarted(game) => assert_eq!(game.status, GameStatus::InProgress),
        other => panic!("expected GameStarted, got {other:?}"),
    }
}

#[test]
fn future_event_kinds_and_phases_are_tolerated() {
    // The server's vocabularies are allowed to grow ahead of this build.
    let ev = ChannelEvent::parse(r#"{"event":"round_timer_started","data":{"seconds":30}}"#).unwrap();
    assert_eq!(ev, ChannelEvent::Unknown);

    let json = r#"{
        "game_id": 7,
        "number": 4,
        "question_master": { "user_id": 1, "display_name": "Maria" },
        "phase": "tiebreak"
    }"#;
    let round: Round = serde_json::from_str(json).unwrap();
    assert_eq!(round.phase, RoundPhase::Unknown);
}
