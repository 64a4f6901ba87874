//! Role-gated view projection.
//!
//! Pure derivation from (game record, round record, viewer) to exactly one
//! renderable view model — no side effects, no memory of past phases. All
//! role- and phase-dependent visibility decisions live here, in one place,
//! so they can be tested independently of reconciliation:
//!
//! - non-question-masters never see the pickable question list
//! - the question master never sees answer content before `results`
//! - a viewer's own answer is never a selectable ballot option
//! - an unrecognized phase renders a loading placeholder, never a panic

use serde::Serialize;

use crate::model::{
    AnswerReveal, BallotEntry, Game, GameStatus, Player, Round, RoundPhase, ScoreEntry, UserId,
    Viewer,
};

/// Minimum roster size before a game can start.
pub const MIN_PLAYERS: usize = 3;

// ── Outer view ──────────────────────────────────────────────────────

/// The one view model the presentation layer renders from.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum GameView {
    /// No game record yet (initial load, or the game was deleted).
    Uninitialized,
    /// The game is gathering players.
    Lobby(LobbyView),
    /// The game is in progress but no round snapshot has been adopted
    /// yet (pull in flight or failed; retry re-converges).
    RoundLoading,
    /// An in-progress round, projected for this viewer.
    Round(PhaseView),
    /// Terminal: final standings.
    Finished(FinishedView),
}

/// Lobby roster and the actions this viewer may take.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LobbyView {
    /// Roster in turn order.
    pub players: Vec<Player>,
    pub creator_name: String,
    pub is_member: bool,
    pub can_start: bool,
    pub can_join: bool,
    pub can_leave: bool,
}

/// Final standings after a game ends.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FinishedView {
    /// Scores sorted descending.
    pub scores: Vec<ScoreEntry>,
    /// Users sharing the top score (ties allowed).
    pub winners: Vec<UserId>,
}

// ── Phase views ─────────────────────────────────────────────────────

/// Role-specific, phase-specific view of the current round.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum PhaseView {
    Picking(PickingView),
    Answering(AnsweringView),
    Voting(VotingView),
    Results(ResultsView),
    /// The server reported a phase this build does not know about.
    Loading,
}

/// `picking`: the question master chooses; everyone else waits.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum PickingView {
    /// The viewer picks a question. The pickable page itself is fetched
    /// through [`GameApi::available_questions`](crate::api::GameApi::available_questions);
    /// it is never part of the round record, so non-pickers cannot see it.
    Master,
    /// Waiting on the question master. No question data is exposed.
    Waiting { question_master: String },
}

/// `answering`: the question is public, answer content is not.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AnsweringView {
    pub question: String,
    pub question_master: String,
    pub role: AnsweringRole,
}

/// What the viewer may do during `answering`.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum AnsweringRole {
    /// The question master only ever sees how many answers arrived —
    /// never their text, so reveal order cannot be gamed.
    Master { answered_count: u32 },
    /// The viewer already submitted; submission is locked.
    Submitted { own_text: String, answered_count: u32 },
    /// The viewer may still submit a decoy.
    Composing,
}

/// `voting`: shuffled, author-stripped ballot.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct VotingView {
    pub question: String,
    pub role: VotingRole,
}

/// What the viewer may do during `voting`.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum VotingRole {
    /// A castable ballot. The viewer's own answer is already filtered
    /// out, so the wasted self-vote round-trip cannot happen.
    Ballot { options: Vec<BallotEntry> },
    /// The question master, or a viewer who already voted, watches the
    /// aggregate count instead.
    Tally { vote_count: u32 },
}

/// `results`: full reveal.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ResultsView {
    pub question: String,
    /// Every answer with author, genuine flag, and votes received.
    pub answers: Vec<AnswerReveal>,
    /// Cumulative standings as of this round.
    pub scores: Vec<ScoreEntry>,
    /// Present only for the question master.
    pub advance: Option<AdvanceAction>,
}

/// Which transition the question master's advance control requests.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AdvanceAction {
    NextRound,
    /// This was the final round under the game's end condition
    /// (server-decided; read from the round record, never recomputed
    /// from scores client-side).
    EndGame,
}

// ── Projection ──────────────────────────────────────────────────────

/// Project the engine's records into the single view model to render.
///
/// `deleted` and `final_scores` take precedence over the records so a
/// stale pull landing after a terminal event cannot resurrect a live view.
pub fn project(
    game: Option<&Game>,
    round: Option<&Round>,
    final_scores: Option<&[ScoreEntry]>,
    deleted: bool,
    viewer: &Viewer,
) -> GameView {
    if deleted {
        return GameView::Uninitialized;
    }
    if let Some(scores) = final_scores {
        return GameView::Finished(finished_view(scores.to_vec()));
    }

    let Some(game) = game else {
        return GameView::Uninitialized;
    };

    match game.status {
        GameStatus::Lobby => GameView::Lobby(lobby_view(game, viewer)),
        GameStatus::Finished => {
            // Finished observed through a snapshot rather than the
            // `game_finished` event; standings come from the roster.
            let scores = game
                .players
                .iter()
                .map(|p| ScoreEntry {
                    user_id: p.user_id,
                    display_name: p.display_name.clone(),
                    score: p.score,
                })
                .collect();
            GameView::Finished(finished_view(scores))
        }
        GameStatus::InProgress => match round {
            Some(round) => GameView::Round(project_round(round, viewer)),
            None => GameView::RoundLoading,
        },
    }
}

/// Project a round record for one viewer. Pure; called once per adoption.
pub fn project_round(round: &Round, viewer: &Viewer) -> PhaseView {
    let is_master = round.is_question_master(viewer.user_id);
    let question = round.question.clone().unwrap_or_default();

    match round.phase {
        RoundPhase::Picking => {
            if is_master {
                PhaseView::Picking(PickingView::Master)
            } else {
                PhaseView::Picking(PickingView::Waiting {
                    question_master: round.question_master.display_name.clone(),
                })
            }
        }
        RoundPhase::Answering => {
            let role = if is_master {
                AnsweringRole::Master {
                    answered_count: round.answered_count,
                }
            } else if let Some(mine) = &round.my_answer {
                AnsweringRole::Submitted {
                    own_text: mine.text.clone(),
                    answered_count: round.answered_count,
                }
            } else {
                AnsweringRole::Composing
            };
            PhaseView::Answering(AnsweringView {
                question,
                question_master: round.question_master.display_name.clone(),
                role,
            })
        }
        RoundPhase::Voting => {
            let role = if is_master || round.my_vote.is_some() {
                VotingRole::Tally {
                    vote_count: round.vote_count,
                }
            } else {
                VotingRole::Ballot {
                    options: castable_ballot(round),
                }
            };
            PhaseView::Voting(VotingView { question, role })
        }
        RoundPhase::Results => {
            let advance = is_master.then(|| {
                if round.final_round {
                    AdvanceAction::EndGame
                } else {
                    AdvanceAction::NextRound
                }
            });
            PhaseView::Results(ResultsView {
                question,
                answers: round.answers.clone(),
                scores: round.scores.clone(),
                advance,
            })
        }
        RoundPhase::Unknown => PhaseView::Loading,
    }
}

/// The ballot minus the viewer's own answer.
///
/// Matches by answer id when the server echoed `my_answer`, and by exact
/// text as well — the genuine answer may coincide with the viewer's decoy
/// text, and that option must not be votable by its accidental author
/// either.
fn castable_ballot(round: &Round) -> Vec<BallotEntry> {
    round
        .ballot
        .iter()
        .filter(|entry| match &round.my_answer {
            Some(mine) => entry.answer_id != mine.answer_id && entry.text != mine.text,
            None => true,
        })
        .cloned()
        .collect()
}

fn lobby_view(game: &Game, viewer: &Viewer) -> LobbyView {
    let is_member = game.has_player(viewer.user_id);
    let is_creator = game.created_by == viewer.user_id;
    LobbyView {
        players: game.players.clone(),
        creator_name: game.creator_name.clone(),
        is_member,
        can_start: (is_creator || viewer.is_admin) && game.players.len() >= MIN_PLAYERS,
        can_join: !is_member,
        can_leave: is_member && !is_creator,
    }
}

fn finished_view(mut scores: Vec<ScoreEntry>) -> FinishedView {
    scores.sort_by(|a, b| b.score.cmp(&a.score));
    let top = scores.iter().map(|s| s.score).max().unwrap_or(0);
    let winners = scores
        .iter()
        .filter(|s| s.score == top)
        .map(|s| s.user_id)
        .collect();
    FinishedView { scores, winners }
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
    use crate::model::{EndCondition, PlayerRef, SubmittedAnswer};

    fn viewer(user_id: UserId) -> Viewer {
        Viewer::new(user_id, format!("player-{user_id}"))
    }

    fn base_round(phase: RoundPhase) -> Round {
        Round {
            game_id: 1,
            number: 1,
            question_master: PlayerRef {
                user_id: 10,
                display_name: "Maria".into(),
            },
            phase,
            question: Some("What is the capital of Assyria?".into()),
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

    #[test]
    fn picking_hides_question_data_from_non_masters() {
        let round = base_round(RoundPhase::Picking);
        match project_round(&round, &viewer(20)) {
            PhaseView::Picking(PickingView::Waiting { question_master }) => {
                assert_eq!(question_master, "Maria");
            }
            other => panic!("expected waiting view, got {other:?}"),
        }

        match project_round(&round, &viewer(10)) {
            PhaseView::Picking(PickingView::Master) => {}
            other => panic!("expected master view, got {other:?}"),
        }
    }

    #[test]
    fn answering_master_sees_count_only() {
        let mut round = base_round(RoundPhase::Answering);
        round.answered_count = 2;
        match project_round(&round, &viewer(10)) {
            PhaseView::Answering(view) => {
                assert_eq!(view.role, AnsweringRole::Master { answered_count: 2 });
            }
            other => panic!("expected answering view, got {other:?}"),
        }
    }

    #[test]
    fn answering_locks_after_submission() {
        let mut round = base_round(RoundPhase::Answering);
        round.my_answer = Some(SubmittedAnswer {
            answer_id: 5,
            text: "Nineveh".into(),
        });
        round.answered_count = 1;
        match project_round(&round, &viewer(20)) {
            PhaseView::Answering(view) => match view.role {
                AnsweringRole::Submitted {
                    own_text,
                    answered_count,
                } => {
                    assert_eq!(own_text, "Nineveh");
                    assert_eq!(answered_count, 1);
                }
                other => panic!("expected submitted role, got {other:?}"),
            },
            other => panic!("expected answering view, got {other:?}"),
        }
    }

    #[test]
    fn voting_ballot_excludes_own_answer_by_id_and_text() {
        let mut round = base_round(RoundPhase::Voting);
        round.ballot = vec![
            BallotEntry {
                answer_id: 1,
                text: "Assur".into(),
            },
            BallotEntry {
                answer_id: 2,
                text: "Nineveh".into(),
            },
            // Coincidental duplicate of the viewer's text under a
            // different id.
            BallotEntry {
                answer_id: 3,
                text: "Nineveh".into(),
            },
        ];
        round.my_answer = Some(SubmittedAnswer {
            answer_id: 2,
            text: "Nineveh".into(),
        });
        match project_round(&round, &viewer(20)) {
            PhaseView::Voting(view) => match view.role {
                VotingRole::Ballot { options } => {
                    assert_eq!(options.len(), 1);
                    assert_eq!(options[0].answer_id, 1);
                }
                other => panic!("expected ballot, got {other:?}"),
            },
            other => panic!("expected voting view, got {other:?}"),
        }
    }

    #[test]
    fn voting_master_and_voted_see_tally() {
        let mut round = base_round(RoundPhase::Voting);
        round.vote_count = 2;

        match project_round(&round, &viewer(10)) {
            PhaseView::Voting(view) => {
                assert_eq!(view.role, VotingRole::Tally { vote_count: 2 });
            }
            other => panic!("expected voting view, got {other:?}"),
        }

        round.my_vote = Some(7);
        match project_round(&round, &viewer(20)) {
            PhaseView::Voting(view) => {
                assert_eq!(view.role, VotingRole::Tally { vote_count: 2 });
            }
            other => panic!("expected voting view, got {other:?}"),
        }
    }

    #[test]
    fn results_advance_is_master_only_and_end_gated() {
        let mut round = base_round(RoundPhase::Results);

        match project_round(&round, &viewer(20)) {
            PhaseView::Results(view) => assert!(view.advance.is_none()),
            other => panic!("expected results view, got {other:?}"),
        }

        match project_round(&round, &viewer(10)) {
            PhaseView::Results(view) => {
                assert_eq!(view.advance, Some(AdvanceAction::NextRound));
            }
            other => panic!("expected results view, got {other:?}"),
        }

        round.final_round = true;
        match project_round(&round, &viewer(10)) {
            PhaseView::Results(view) => {
                assert_eq!(view.advance, Some(AdvanceAction::EndGame));
            }
            other => panic!("expected results view, got {other:?}"),
        }
    }

    #[test]
    fn unknown_phase_renders_loading() {
        let round = base_round(RoundPhase::Unknown);
        assert_eq!(project_round(&round, &viewer(20)), PhaseView::Loading);
    }

    #[test]
    fn lobby_start_requires_three_players_and_creator_or_admin() {
        let mut game = Game {
            id: 1,
            status: GameStatus::Lobby,
            end_condition: EndCondition::default(),
            players: vec![
                Player {
                    user_id: 1,
                    display_name: "a".into(),
                    turn_order: 1,
                    score: 0,
                },
                Player {
                    user_id: 2,
                    display_name: "b".into(),
                    turn_order: 2,
                    score: 0,
                },
            ],
            created_by: 1,
            creator_name: "a".into(),
            current_round: 0,
        };

        // Two players: nobody can start.
        match project(Some(&game), None, None, false, &viewer(1)) {
            GameView::Lobby(lobby) => assert!(!lobby.can_start),
            other => panic!("expected lobby view, got {other:?}"),
        }

        game.players.push(Player {
            user_id: 3,
            display_name: "c".into(),
            turn_order: 3,
            score: 0,
        });

        // Creator can start; a non-member admin can too; player 2 cannot.
        match project(Some(&game), None, None, false, &viewer(1)) {
            GameView::Lobby(lobby) => {
                assert!(lobby.can_start);
                assert!(!lobby.can_leave);
            }
            other => panic!("expected lobby view, got {other:?}"),
        }
        match project(Some(&game), None, None, false, &viewer(99).with_admin(true)) {
            GameView::Lobby(lobby) => {
                assert!(lobby.can_start);
                assert!(lobby.can_join);
            }
            other => panic!("expected lobby view, got {other:?}"),
        }
        match project(Some(&game), None, None, false, &viewer(2)) {
            GameView::Lobby(lobby) => {
                assert!(!lobby.can_start);
                assert!(lobby.can_leave);
            }
            other => panic!("expected lobby view, got {other:?}"),
        }
    }

    #[test]
    fn deleted_wins_over_records() {
        let game = Game {
            id: 1,
            status: GameStatus::InProgress,
            end_condition: EndCondition::default(),
            players: vec![],
            created_by: 1,
            creator_name: "a".into(),
            current_round: 1,
        };
        let round = base_round(RoundPhase::Voting);
        let view = project(Some(&game), Some(&round), None, true, &viewer(1));
        assert_eq!(view, GameView::Uninitialized);
    }

    #[test]
    fn finished_view_ranks_and_ties() {
        let scores = vec![
            ScoreEntry {
                user_id: 1,
                display_name: "a".into(),
                score: 4,
            },
            ScoreEntry {
                user_id: 2,
                display_name: "b".into(),
                score: 4,
            },
            ScoreEntry {
                user_id: 3,
                display_name: "c".into(),
                score: 1,
            },
        ];
        let view = project(None, None, Some(&scores), false, &viewer(1));
        match view {
            GameView::Finished(finished) => {
                assert_eq!(finished.winners, vec![1, 2]);
                assert_eq!(finished.scores.len(), 3);
            }
            other => panic!("expected finished view, got {other:?}"),
        }
    }
}
