//! A small 9x9 board and a handful of agents used by the integration tests.
//!
//! White starts at the bottom and wins on row 8, black starts at the top and wins on row 0.
//! Vertical moves cost 1 turn on even columns and 2 on odd ones, sideways moves cost 2.
#![allow(dead_code)]

use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

use search_grader::{prelude::*, resource_monitor::MemoryProbe};
use tracing_subscriber::{filter::LevelFilter, fmt, layer::SubscriberExt, Layer, Registry};

/// Sends the grader's logs to the test output. Only the first call installs anything.
pub fn init_test_logger() {
    let format = fmt::format()
        .without_time()
        .with_ansi(true)
        .with_level(true)
        .with_thread_names(true)
        .with_target(false);

    let reg = Registry::default().with(
        fmt::layer()
            .event_format(format)
            .with_test_writer()
            .with_filter(LevelFilter::DEBUG),
    );

    let _ = tracing::subscriber::set_global_default(reg);
}

pub const SIZE: usize = 9;

#[derive(Debug, Clone, PartialEq)]
pub struct GridState {
    pub white: Position,
    pub black: Position,
    pub fences: Vec<(Position, Orientation)>,
    /// Bytes the board reports as used by the search.
    pub reported_memory: u64,
}

impl GridState {
    pub fn new(white: (usize, usize), black: (usize, usize)) -> GridState {
        GridState {
            white: white.into(),
            black: black.into(),
            fences: vec![],
            reported_memory: 0,
        }
    }

    pub fn with_fence(mut self, edge: (usize, usize), orientation: Orientation) -> GridState {
        self.fences.push((edge.into(), orientation));
        self
    }

    pub fn with_reported_memory(mut self, bytes: u64) -> GridState {
        self.reported_memory = bytes;
        self
    }
}

#[derive(Debug, Default)]
pub struct GridBoard {
    white: Position,
    black: Position,
    fences: Vec<(Position, Orientation)>,
    reported_memory: u64,
    memory_peak: u64,
}

impl GridBoard {
    fn pawn_mut(&mut self, player: PlayerId) -> &mut Position {
        match player {
            PlayerId::White => &mut self.white,
            PlayerId::Black => &mut self.black,
        }
    }

    fn blocked(&self, from: Position, to: Position) -> bool {
        self.fences.iter().any(|(edge, orientation)| {
            let (r, c) = (edge.row, edge.col);
            match orientation {
                // separates rows r and r+1 on columns c and c+1
                Orientation::Horizontal => {
                    from.col == to.col
                        && (from.col == c || from.col == c + 1)
                        && from.row.min(to.row) == r
                }
                // separates columns c and c+1 on rows r and r+1
                Orientation::Vertical => {
                    from.row == to.row
                        && (from.row == r || from.row == r + 1)
                        && from.col.min(to.col) == c
                }
            }
        })
    }

    fn apply(&mut self, action: &Action) -> Result<(), RuleViolation> {
        match *action {
            Action::Move { player, position } => {
                let from = self.pawn_position(player);
                let distance = from.row.abs_diff(position.row) + from.col.abs_diff(position.col);
                if distance != 1 || self.pawn_position(player.opponent()) == position {
                    return Err(RuleViolation::IllegalMove(format!(
                        "{player} cannot go from {from} to {position}"
                    )));
                }
                if self.blocked(from, position) {
                    return Err(RuleViolation::IllegalMove(format!(
                        "a fence blocks {from} -> {position}"
                    )));
                }
                *self.pawn_mut(player) = position;
                Ok(())
            }
            Action::Block {
                edge, orientation, ..
            } => {
                if self.fences.iter().any(|(e, _)| *e == edge) {
                    return Err(RuleViolation::IllegalFence(format!(
                        "a fence is already centred on {edge}"
                    )));
                }
                self.fences.push((edge, orientation));
                Ok(())
            }
        }
    }
}

impl Board for GridBoard {
    type State = GridState;

    fn load_state(&mut self, state: &GridState, is_initial: bool) {
        self.white = state.white;
        self.black = state.black;
        self.fences = state.fences.clone();
        self.reported_memory = state.reported_memory;
        if is_initial {
            self.memory_peak = 0;
        }
    }

    fn move_turns(&self, from: Position, to: Position) -> u32 {
        if from.col == to.col {
            1 + (to.col as u32 % 2)
        } else {
            2
        }
    }

    fn reset_memory_usage(&mut self) {
        self.memory_peak = 0;
    }

    fn current_memory_usage(&mut self) -> Option<u64> {
        self.memory_peak = self.memory_peak.max(self.reported_memory);
        Some(self.reported_memory)
    }

    fn max_memory_usage(&self) -> u64 {
        self.memory_peak
    }

    fn simulate_actions(&mut self, actions: &[Action]) -> Result<(), RuleViolation> {
        for action in actions {
            self.apply(action)?;
            if self.is_game_end() {
                break;
            }
        }
        Ok(())
    }

    fn is_game_end(&self) -> bool {
        self.white.row == SIZE - 1 || self.black.row == 0
    }

    fn pawn_position(&self, player: PlayerId) -> Position {
        match player {
            PlayerId::White => self.white,
            PlayerId::Black => self.black,
        }
    }

    fn dimensions(&self) -> (usize, usize) {
        (SIZE, SIZE)
    }
}

/// Goes straight up its column.
pub struct StraightAhead {
    pub delay: Duration,
}

impl StraightAhead {
    pub fn new() -> StraightAhead {
        StraightAhead {
            delay: Duration::ZERO,
        }
    }

    pub fn slow(delay: Duration) -> StraightAhead {
        StraightAhead { delay }
    }
}

impl SearchAgent<GridBoard> for StraightAhead {
    fn name(&self) -> &str {
        "straight_ahead"
    }

    fn heuristic_search(&mut self, board: &mut GridBoard) -> anyhow::Result<Vec<Action>> {
        std::thread::sleep(self.delay);
        let from = board.pawn_position(PlayerId::White);
        Ok((from.row + 1..SIZE)
            .map(|row| Action::Move {
                player: PlayerId::White,
                position: Position::new(row, from.col),
            })
            .collect())
    }
}

/// Steps one column aside first, then goes up.
pub struct Detour;

impl SearchAgent<GridBoard> for Detour {
    fn name(&self) -> &str {
        "detour"
    }

    fn heuristic_search(&mut self, board: &mut GridBoard) -> anyhow::Result<Vec<Action>> {
        let from = board.pawn_position(PlayerId::White);
        let col = from.col + 1;
        let mut solution = vec![Action::Move {
            player: PlayerId::White,
            position: Position::new(from.row, col),
        }];
        solution.extend((from.row + 1..SIZE).map(|row| Action::Move {
            player: PlayerId::White,
            position: Position::new(row, col),
        }));
        Ok(solution)
    }
}

/// Returns a fixed answer.
pub struct Scripted(pub Vec<Action>);

impl SearchAgent<GridBoard> for Scripted {
    fn name(&self) -> &str {
        "scripted"
    }

    fn heuristic_search(&mut self, _board: &mut GridBoard) -> anyhow::Result<Vec<Action>> {
        Ok(self.0.clone())
    }
}

pub struct Failing;

impl SearchAgent<GridBoard> for Failing {
    fn name(&self) -> &str {
        "failing"
    }

    fn heuristic_search(&mut self, _board: &mut GridBoard) -> anyhow::Result<Vec<Action>> {
        anyhow::bail!("no path found")
    }
}

pub struct Panicking;

impl SearchAgent<GridBoard> for Panicking {
    fn name(&self) -> &str {
        "panicking"
    }

    fn heuristic_search(&mut self, _board: &mut GridBoard) -> anyhow::Result<Vec<Action>> {
        panic!("assertion failed: frontier is not empty")
    }
}

pub fn white_move(row: usize, col: usize) -> Action {
    Action::Move {
        player: PlayerId::White,
        position: Position::new(row, col),
    }
}

/// Answers `first` once, then `then` forever.
pub struct StepProbe {
    first: u64,
    then: u64,
    calls: AtomicU64,
}

impl StepProbe {
    pub fn new(first: u64, then: u64) -> StepProbe {
        StepProbe {
            first,
            then,
            calls: AtomicU64::new(0),
        }
    }

    pub fn constant(bytes: u64) -> StepProbe {
        StepProbe::new(bytes, bytes)
    }

    /// Number of samples taken so far.
    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }
}

impl MemoryProbe for StepProbe {
    fn resident_bytes(&self) -> anyhow::Result<u64> {
        if self.calls.fetch_add(1, Ordering::Relaxed) == 0 {
            Ok(self.first)
        } else {
            Ok(self.then)
        }
    }
}

pub const MB: u64 = 1024 * 1024;
