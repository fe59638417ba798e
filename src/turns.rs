//! Turn cost of a proposed solution.

use crate::game_interface::{Action, Board, Position};

/// Total number of turns `solution` takes on `board`.
///
/// The cursor starts on the pawn of the player making the first move, then follows each move.
/// Fences neither move the cursor nor cost anything here. An empty solution never reaches
/// the goal, so it costs `f64::INFINITY`.
pub fn total_turns<B: Board>(board: &B, solution: &[Action]) -> f64 {
    if solution.is_empty() {
        return f64::INFINITY;
    }

    let mut total = 0u64;
    let mut current: Option<Position> = None;

    for action in solution {
        if let Action::Move { player, position } = *action {
            let from = *current.get_or_insert_with(|| board.pawn_position(player));
            total += u64::from(board.move_turns(from, position));
            current = Some(position);
        }
    }

    total as f64
}
