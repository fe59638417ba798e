//! Module defining what the board and the agents should implement to be graded

use std::fmt;

/// One of the two pawns on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerId {
    /// Black pawn.
    Black,
    /// White pawn.
    White,
}

impl PlayerId {
    /// The other player.
    pub fn opponent(self) -> PlayerId {
        match self {
            PlayerId::Black => PlayerId::White,
            PlayerId::White => PlayerId::Black,
        }
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerId::Black => write!(f, "black"),
            PlayerId::White => write!(f, "white"),
        }
    }
}

/// A grid coordinate, `(row, col)`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    /// Row index, starting at 0.
    pub row: usize,
    /// Column index, starting at 0.
    pub col: usize,
}

impl Position {
    /// Create a position from a row and a column.
    pub const fn new(row: usize, col: usize) -> Position {
        Position { row, col }
    }
}

impl From<(usize, usize)> for Position {
    fn from((row, col): (usize, usize)) -> Self {
        Position { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Direction of a fence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Fence lying along a row.
    Horizontal,
    /// Fence lying along a column.
    Vertical,
}

/// What an agent proposes to do on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Move `player`'s pawn to `position`.
    Move {
        /// Player owning the pawn.
        player: PlayerId,
        /// Target cell.
        position: Position,
    },
    /// Place a fence centred on `edge`.
    Block {
        /// Player placing the fence.
        player: PlayerId,
        /// Fence centre (top-left cell of the four cells it separates).
        edge: Position,
        /// Fence direction.
        orientation: Orientation,
    },
}

impl Action {
    /// Player performing this action.
    pub fn player(&self) -> PlayerId {
        match self {
            Action::Move { player, .. } | Action::Block { player, .. } => *player,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Move { player, position } => write!(f, "MOVE({player}, {position})"),
            Action::Block {
                player,
                edge,
                orientation,
            } => write!(f, "BLOCK({player}, {edge}, {orientation:?})"),
        }
    }
}

/// Error raised by the board when a replayed action breaks the rules.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RuleViolation {
    /// The pawn cannot go there.
    #[error("illegal move: {0}")]
    IllegalMove(String),
    /// The fence cannot be placed there.
    #[error("illegal fence: {0}")]
    IllegalFence(String),
    /// Anything else the board complained about.
    #[error("board error: {0}")]
    Other(String),
}

/// What the board should implement.
///
/// The board is owned by the evaluator for the duration of a single agent run. `Default` must
/// give an empty, uninitialized board.
pub trait Board: Default {
    /// Serializable snapshot of a position.
    type State;

    /// Restore the board to `state`.
    ///
    /// When `is_initial` is true, `state` also becomes the board's initial state and its internal
    /// counters are reset.
    fn load_state(&mut self, state: &Self::State, is_initial: bool);

    /// Number of turns a pawn needs to go from `from` to `to`.
    fn move_turns(&self, from: Position, to: Position) -> u32;

    /// Reset the board's own memory accounting.
    fn reset_memory_usage(&mut self);

    /// Current memory usage in bytes, as seen by the board. `None` if the board cannot tell.
    fn current_memory_usage(&mut self) -> Option<u64>;

    /// Peak memory usage in bytes since the last reset, above the board's own baseline.
    fn max_memory_usage(&self) -> u64;

    /// Apply `actions` in order as a single simulated sequence.
    ///
    /// # Error
    /// Returned on the first action that breaks the rules. The board may be left in any state.
    fn simulate_actions(&mut self, actions: &[Action]) -> Result<(), RuleViolation>;

    /// True if a pawn reached its goal row.
    fn is_game_end(&self) -> bool;

    /// Current cell of `player`'s pawn.
    fn pawn_position(&self, player: PlayerId) -> Position;

    /// Number of `(rows, columns)` of the grid.
    fn dimensions(&self) -> (usize, usize);

    /// True if `action` is well formed for this board: a move must target a cell of the grid and
    /// a fence centre must lie strictly inside it.
    fn recognizes(&self, action: &Action) -> bool {
        let (rows, cols) = self.dimensions();
        match action {
            Action::Move { position, .. } => position.row < rows && position.col < cols,
            Action::Block { edge, .. } => edge.row + 1 < rows && edge.col + 1 < cols,
        }
    }
}

/// What a graded agent should implement.
pub trait SearchAgent<B: Board> {
    /// Name used in logs and reports.
    fn name(&self) -> &str;

    /// Find the actions leading the agent's pawn to its goal from the board's current state.
    ///
    /// # Error
    /// Any error is reported as a search failure for this agent.
    fn heuristic_search(&mut self, board: &mut B) -> anyhow::Result<Vec<Action>>;
}
