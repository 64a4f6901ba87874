#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing
)]
//! Reconciliation-core tests: pull ordering, terminal precedence, and the
//! forward-only phase observation guarantee.

mod common;

use decoy_client::engine::{Effect, EnginePhase, RoundEngine};
use decoy_client::event::ChannelEvent;
use decoy_client::model::{GameStatus, RoundPhase};
use decoy_client::view::GameView;

use common::{game_with, in_progress_game, lobby_game, round_in, score, trio, viewer};

fn engine() -> RoundEngine {
    RoundEngine::new(7, viewer(2))
}

// ════════════════════════════════════════════════════════════════════
// Last-completion-wins
// ════════════════════════════════════════════════════════════════════

#[test]
fn later_completion_wins_regardless_of_issue_order() {
    let mut engine = engine();
    let t = engine.begin_pull();
    engine.complete_game_pull(t, in_progress_game(7));

    // Two overlapping pulls: the first-issued completes last.
    let first_issued = engine.begin_pull();
    let second_issued = engine.begin_pull();

    let newer = round_in(7, 1, 1, RoundPhase::Voting);
    let older = round_in(7, 1, 1, RoundPhase::Answering);

    assert!(engine.complete_round_pull(second_issued, older));
    assert!(engine.complete_round_pull(first_issued, newer.clone()));

    assert_eq!(engine.round(), Some(&newer));
    assert_eq!(engine.phase(), EnginePhase::Voting);
}

#[test]
fn interleaved_reload_events_settle_on_last_completed_pull() {
    let mut engine = engine();
    let t = engine.begin_pull();
    engine.complete_game_pull(t, in_progress_game(7));

    // Each reload_round asks for a fresh pull.
    let mut tickets = Vec::new();
    for _ in 0..3 {
        let effects = engine.apply_event(ChannelEvent::ReloadRound);
        assert_eq!(effects, vec![Effect::PullRound]);
        tickets.push(engine.begin_pull());
    }

    // Responses land in a scrambled order; whichever completes last is
    // the record left standing.
    let rounds = [
        round_in(7, 1, 1, RoundPhase::Picking),
        round_in(7, 1, 1, RoundPhase::Answering),
        round_in(7, 1, 1, RoundPhase::Voting),
    ];
    assert!(engine.complete_round_pull(tickets[1], rounds[1].clone()));
    assert!(engine.complete_round_pull(tickets[2], rounds[2].clone()));
    assert!(engine.complete_round_pull(tickets[0], rounds[0].clone()));

    assert_eq!(engine.round(), Some(&rounds[0]));
}

#[test]
fn identical_pulls_yield_structurally_equal_records() {
    let mut engine = engine();
    let t = engine.begin_pull();
    engine.complete_game_pull(t, in_progress_game(7));

    let snapshot = round_in(7, 2, 3, RoundPhase::Answering);

    assert!(engine.complete_round_pull(engine.begin_pull(), snapshot.clone()));
    let first = engine.round().cloned();
    assert!(engine.complete_round_pull(engine.begin_pull(), snapshot));
    let second = engine.round().cloned();

    assert_eq!(first, second);
}

// ════════════════════════════════════════════════════════════════════
// Terminal precedence
// ════════════════════════════════════════════════════════════════════

#[test]
fn deleted_wins_over_in_flight_pulls() {
    let mut engine = engine();
    let t = engine.begin_pull();
    engine.complete_game_pull(t, in_progress_game(7));

    let round_ticket = engine.begin_pull();
    let game_ticket = engine.begin_pull();

    let effects = engine.apply_event(ChannelEvent::GameDeleted);
    assert_eq!(effects, vec![Effect::NavigateAway]);

    // The in-flight pulls resolve after the deletion: both are refused
    // and nothing is resurrected.
    assert!(!engine.complete_round_pull(round_ticket, round_in(7, 1, 1, RoundPhase::Voting)));
    assert!(engine
        .complete_game_pull(game_ticket, in_progress_game(7))
        .is_empty());

    assert_eq!(engine.phase(), EnginePhase::Uninitialized);
    assert_eq!(engine.view(), GameView::Uninitialized);
    assert!(engine.game().is_none());
    assert!(engine.round().is_none());
}

#[test]
fn events_after_deletion_are_ignored() {
    let mut engine = engine();
    engine.apply_event(ChannelEvent::GameDeleted);

    let effects = engine.apply_event(ChannelEvent::GameUpdated(in_progress_game(7)));
    assert!(effects.is_empty());
    assert_eq!(engine.phase(), EnginePhase::Uninitialized);
}

#[test]
fn finished_event_blocks_stale_round_resurrection() {
    let mut engine = engine();
    let t = engine.begin_pull();
    engine.complete_game_pull(t, in_progress_game(7));
    let stale = engine.begin_pull();

    let effects = engine.apply_event(ChannelEvent::GameFinished {
        scores: vec![score(1, "Maria", 4), score(2, "Nikos", 2), score(3, "Eleni", 1)],
    });
    assert_eq!(effects, vec![Effect::Finished]);
    assert_eq!(engine.phase(), EnginePhase::Finished);

    assert!(!engine.complete_round_pull(stale, round_in(7, 3, 3, RoundPhase::Results)));
    assert_eq!(engine.phase(), EnginePhase::Finished);
}

#[test]
fn duplicate_finish_events_fire_once() {
    let mut engine = engine();
    let t = engine.begin_pull();
    engine.complete_game_pull(t, in_progress_game(7));

    let scores = vec![score(1, "Maria", 2), score(2, "Nikos", 1), score(3, "Eleni", 0)];
    let first = engine.apply_event(ChannelEvent::GameFinished {
        scores: scores.clone(),
    });
    assert_eq!(first, vec![Effect::Finished]);

    // At-least-once delivery redelivers the event; nothing re-fires.
    let second = engine.apply_event(ChannelEvent::GameFinished { scores });
    assert!(second.is_empty());
    assert_eq!(engine.phase(), EnginePhase::Finished);
}

// ════════════════════════════════════════════════════════════════════
// Event-to-effect mapping
// ════════════════════════════════════════════════════════════════════

#[test]
fn game_started_always_repulls_round() {
    let mut engine = engine();
    let t = engine.begin_pull();
    engine.complete_game_pull(t, lobby_game(7));
    assert_eq!(engine.phase(), EnginePhase::LobbyWait);

    let effects = engine.apply_event(ChannelEvent::GameStarted(in_progress_game(7)));
    assert_eq!(effects, vec![Effect::PullRound]);
    assert_eq!(engine.phase(), EnginePhase::RoundLoading);
}

#[test]
fn lobby_game_update_does_not_pull_round() {
    let mut engine = engine();
    let effects = engine.apply_event(ChannelEvent::GameUpdated(lobby_game(7)));
    assert!(effects.is_empty());
    assert_eq!(engine.phase(), EnginePhase::LobbyWait);
}

#[test]
fn game_update_repulls_when_round_is_missing() {
    // A roster update races a reconnect: the record says in-progress but
    // no round is held yet.
    let mut engine = engine();
    let effects = engine.apply_event(ChannelEvent::GameUpdated(in_progress_game(7)));
    assert_eq!(effects, vec![Effect::PullRound]);
}

#[test]
fn unknown_and_lobby_events_are_ignored() {
    let mut engine = engine();
    let t = engine.begin_pull();
    engine.complete_game_pull(t, in_progress_game(7));
    let round = round_in(7, 1, 1, RoundPhase::Answering);
    engine.complete_round_pull(engine.begin_pull(), round.clone());

    assert!(engine.apply_event(ChannelEvent::Unknown).is_empty());
    assert!(engine.apply_event(ChannelEvent::LobbyUpdated).is_empty());
    assert_eq!(engine.round(), Some(&round));
}

#[test]
fn snapshot_for_another_game_is_refused() {
    let mut engine = engine();
    let effects = engine.complete_game_pull(engine.begin_pull(), in_progress_game(99));
    assert!(effects.is_empty());
    assert!(engine.game().is_none());

    let t = engine.begin_pull();
    engine.complete_game_pull(t, in_progress_game(7));
    assert!(!engine.complete_round_pull(engine.begin_pull(), round_in(99, 1, 1, RoundPhase::Picking)));
}

#[test]
fn game_snapshot_in_progress_cascades_into_round_pull() {
    let mut engine = engine();
    let effects = engine.complete_game_pull(engine.begin_pull(), in_progress_game(7));
    assert_eq!(effects, vec![Effect::PullRound]);
}

#[test]
fn finished_game_snapshot_yields_roster_standings() {
    let mut engine = engine();
    let mut game = game_with(7, GameStatus::Finished, trio());
    game.players[0].score = 3;
    game.players[2].score = 5;

    let effects = engine.complete_game_pull(engine.begin_pull(), game);
    assert_eq!(effects, vec![Effect::Finished]);

    let scores = engine.final_scores().unwrap();
    assert_eq!(scores.len(), 3);
    assert_eq!(scores.iter().map(|s| s.score).sum::<u32>(), 8);

    match engine.view() {
        GameView::Finished(view) => assert_eq!(view.winners, vec![3]),
        other => panic!("expected finished view, got {other:?}"),
    }
}

// ════════════════════════════════════════════════════════════════════
// Phase progression
// ════════════════════════════════════════════════════════════════════

#[test]
fn phases_only_move_forward_or_reset_to_next_round() {
    let mut engine = engine();
    let t = engine.begin_pull();
    engine.complete_game_pull(t, in_progress_game(7));

    // A server-monotonic sequence: round 1 walks every phase, then round
    // 2 resets to picking.
    let sequence = [
        (1, RoundPhase::Picking, EnginePhase::Picking),
        (1, RoundPhase::Answering, EnginePhase::Answering),
        (1, RoundPhase::Voting, EnginePhase::Voting),
        (1, RoundPhase::Results, EnginePhase::Results),
        (2, RoundPhase::Picking, EnginePhase::Picking),
    ];

    let mut observed = Vec::new();
    for (number, phase, expected) in sequence {
        assert!(engine.complete_round_pull(engine.begin_pull(), round_in(7, number, 1, phase)));
        assert_eq!(engine.phase(), expected);
        observed.push((engine.round().unwrap().number, phase));
    }

    // Within one round number the phase index never regresses, and a
    // reset only happens together with a round-number increase.
    let order = |p: RoundPhase| match p {
        RoundPhase::Picking => 0,
        RoundPhase::Answering => 1,
        RoundPhase::Voting => 2,
        RoundPhase::Results => 3,
        RoundPhase::Unknown => panic!("unexpected phase"),
    };
    for pair in observed.windows(2) {
        let (prev_no, prev_phase) = pair[0];
        let (next_no, next_phase) = pair[1];
        if next_no == prev_no {
            assert!(order(next_phase) >= order(prev_phase));
        } else {
            assert!(next_no > prev_no);
            assert_eq!(next_phase, RoundPhase::Picking);
        }
    }
}

#[test]
fn unknown_phase_snapshot_reads_as_round_loading() {
    let mut engine = engine();
    let t = engine.begin_pull();
    engine.complete_game_pull(t, in_progress_game(7));
    engine.complete_round_pull(engine.begin_pull(), round_in(7, 1, 1, RoundPhase::Unknown));
    assert_eq!(engine.phase(), EnginePhase::RoundLoading);
}

// ════════════════════════════════════════════════════════════════════
// Full season scenario
// ════════════════════════════════════════════════════════════════════

#[test]
fn one_cycle_season_ends_with_three_entries_summing_awarded_points() {
    // Three players, one cycle: each is question master exactly once.
    // Points awarded per round: r1 → Nikos +2; r2 → Eleni +1, Maria +1;
    // r3 → Maria +3. Total awarded: 7.
    let mut engine = engine();
    let t = engine.begin_pull();
    engine.complete_game_pull(t, in_progress_game(7));

    let rounds = [
        (1, 1_u64, vec![score(1, "Maria", 0), score(2, "Nikos", 2), score(3, "Eleni", 0)]),
        (2, 2_u64, vec![score(1, "Maria", 1), score(2, "Nikos", 2), score(3, "Eleni", 1)]),
        (3, 3_u64, vec![score(1, "Maria", 4), score(2, "Nikos", 2), score(3, "Eleni", 1)]),
    ];

    for (number, qm, scores) in &rounds {
        for phase in [
            RoundPhase::Picking,
            RoundPhase::Answering,
            RoundPhase::Voting,
            RoundPhase::Results,
        ] {
            let mut round = round_in(7, *number, *qm, phase);
            if phase == RoundPhase::Results {
                round.scores = scores.clone();
                round.final_round = *number == 3;
            }
            assert!(engine.complete_round_pull(engine.begin_pull(), round));
        }
    }
    assert_eq!(engine.phase(), EnginePhase::Results);
    assert!(engine.round().unwrap().final_round);

    // The question master advances; the server answers with the terminal
    // event carrying the final standings.
    let effects = engine.apply_event(ChannelEvent::GameFinished {
        scores: rounds[2].2.clone(),
    });
    assert_eq!(effects, vec![Effect::Finished]);
    assert_eq!(engine.phase(), EnginePhase::Finished);

    let finals = engine.final_scores().unwrap();
    assert_eq!(finals.len(), 3);
    assert_eq!(finals.iter().map(|s| s.score).sum::<u32>(), 7);
}
