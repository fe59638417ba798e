//! # Search Grader
//!
//! A Rust crate for grading a submitted search agent against a reference agent on a
//! Quoridor-like board (pawn moves and fences on a grid, shortest way to the goal row).
//!
//! It provides:
//! - Measurement of a search call: wall-clock time and peak memory (`ResourceMonitor`)
//! - Validation of the returned solution by replaying it on a clean board
//! - Tiered scoring of the candidate against the reference (`Scorer`)
//! - Hard time and memory limits for the candidate (`Configuration`)
//!
//! The board rules and the agents' search algorithms are not part of this crate: implement
//! the [`Board`](game_interface::Board) and [`SearchAgent`](game_interface::SearchAgent) traits
//! to plug them in.
//!
//! # Documentation Overview
//!
//! - For the grading flow, see the [`evaluator`] module.
//! - For limits and measurement settings, see [`Configuration`](configuration::Configuration).
//! - For how points are given, see the [`scorer`] module.
//! - For what the board and agents must provide, see [`game_interface`].
//!
//! # Points
//!
//! | Point | Reached when |
//! |---|---|
//! | 1 | submission (failure, goal not reached, or limit broken) |
//! | 2 | goal reached with a solution no longer than the reference's |
//! | 3 | ... using at most 1MB |
//! | 4 | ... at least as fast as the reference |
//! | 5 | ... using no more memory than the reference |
//!
//! # Usage Example
//!
//! ```no_run
//! # #[derive(Default)]
//! # struct YourBoard;
//! # impl search_grader::game_interface::Board for YourBoard {
//! #     type State = u32;
//! #     fn load_state(&mut self, _state: &u32, _is_initial: bool) {}
//! #     fn move_turns(&self, _from: Position, _to: Position) -> u32 { 1 }
//! #     fn reset_memory_usage(&mut self) {}
//! #     fn current_memory_usage(&mut self) -> Option<u64> { None }
//! #     fn max_memory_usage(&self) -> u64 { 0 }
//! #     fn simulate_actions(&mut self, _actions: &[Action]) -> Result<(), RuleViolation> { Ok(()) }
//! #     fn is_game_end(&self) -> bool { true }
//! #     fn pawn_position(&self, _player: PlayerId) -> Position { Position::new(0, 0) }
//! #     fn dimensions(&self) -> (usize, usize) { (9, 9) }
//! # }
//! use search_grader::prelude::*;
//!
//! struct StraightAhead;
//!
//! impl SearchAgent<YourBoard> for StraightAhead {
//!     fn name(&self) -> &str {
//!         "straight_ahead"
//!     }
//!
//!     fn heuristic_search(&mut self, board: &mut YourBoard) -> anyhow::Result<Vec<Action>> {
//!         let from = board.pawn_position(PlayerId::White);
//!         Ok((from.row + 1..9)
//!             .map(|row| Action::Move {
//!                 player: PlayerId::White,
//!                 position: Position::new(row, from.col),
//!             })
//!             .collect())
//!     }
//! }
//!
//! fn main() {
//!     // Limits can also be read from EVAL_* environment variables
//!     let config = Configuration::from_env().with_time_limit(60.0);
//!     let evaluator = Evaluator::<YourBoard>::new(config);
//!
//!     let initial_state = 0;
//!     let performance = evaluator.evaluate(&initial_state, &mut StraightAhead);
//!     println!("{performance}");
//! }
//! ```
#![warn(missing_docs)]

pub use anyhow;
pub mod configuration;
pub mod evaluator;
pub mod game_interface;
mod logger;
pub mod outcome_validator;
pub mod performance;
pub mod resource_monitor;
pub mod scorer;
pub mod search_runner;
pub mod turns;

/// Commonly used types and traits for quick access.
///
/// Import this prelude to get started easily:
/// ```rust
/// use search_grader::prelude::*;
/// ```
pub mod prelude {
    pub use crate::configuration::Configuration;
    pub use crate::evaluator::{Evaluation, Evaluator};
    pub use crate::game_interface::{
        Action, Board, Orientation, PlayerId, Position, RuleViolation, SearchAgent,
    };
    pub use crate::performance::{Failure, Performance};
    pub use crate::scorer::{Scorer, Tier};
}
