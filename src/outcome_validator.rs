//! Replay a proposed solution on a clean board.

use tracing::debug;

use crate::{
    game_interface::{Action, Board, RuleViolation},
    search_runner::{catch_quietly, panic_message},
    turns::total_turns,
};

/// Result of replaying a solution.
#[derive(Debug, Clone, PartialEq)]
pub struct Validation {
    /// Total turns of the solution, `f64::INFINITY` without a solution.
    ///
    /// Computed before the replay, so it is kept even when the replay breaks a rule.
    pub outcome: f64,
    /// True if the board reached a terminal state after the replay.
    pub reached_goal: bool,
    /// Rule broken during the replay, if any.
    pub violation: Option<RuleViolation>,
}

impl Validation {
    fn absent() -> Validation {
        Validation {
            outcome: f64::INFINITY,
            reached_goal: false,
            violation: None,
        }
    }
}

/// Reset `board` to `initial`, count the turns of `solution` then replay it as one sequence.
///
/// Without a solution nothing is replayed and the goal is not reached.
pub fn validate_outcome<B: Board>(
    board: &mut B,
    initial: &B::State,
    solution: Option<&[Action]>,
) -> Validation {
    let Some(solution) = solution else {
        return Validation::absent();
    };

    board.load_state(initial, true);
    let outcome = total_turns(&*board, solution);

    let replay = catch_quietly(|| board.simulate_actions(solution));
    let violation = match replay {
        Ok(Ok(())) => None,
        Ok(Err(violation)) => Some(violation),
        Err(payload) => Some(RuleViolation::Other(panic_message(payload))),
    };

    let reached_goal = violation.is_none() && board.is_game_end();
    debug!(outcome, reached_goal, ?violation, "solution replayed");

    Validation {
        outcome,
        reached_goal,
        violation,
    }
}
