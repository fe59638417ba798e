//! Result record of a graded run and the ways a run can fail.

use std::fmt;

use crate::game_interface::{Action, RuleViolation};

/// Bytes per megabyte. Used for both the board's accounting and process sampling.
pub const MEGABYTES: f64 = 1024.0 * 1024.0;

/// Why a run did not produce a valid solution.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Failure {
    /// The agent returned an error.
    #[error("search failed: {0}")]
    Search(String),

    /// The agent panicked.
    #[error("search panicked: {0}")]
    Panic(String),

    /// The agent returned something the board does not recognize as an action.
    #[error("Solution should be a list of ACTIONs. Element #{index} ({action}) is not a valid action.")]
    Shape {
        /// Position of the offending element in the solution.
        index: usize,
        /// The offending element.
        action: Action,
    },

    /// Wall-clock time went over the configured limit.
    #[error("Time limit exceeded! {0:.3} seconds passed!")]
    TimeLimit(f64),

    /// Memory went over the configured limit.
    #[error("Memory limit exceeded! {0:.2} MB used!")]
    MemoryLimit(f64),

    /// Replaying the solution broke the game rules.
    #[error("{0}")]
    Rule(#[from] RuleViolation),
}

impl Failure {
    /// True for the failures that stop grading right away.
    pub fn is_resource_limit(&self) -> bool {
        matches!(self, Failure::TimeLimit(_) | Failure::MemoryLimit(_))
    }
}

/// Measurements of one graded run.
///
/// Never mutated once built: the final score of an evaluation is a new record.
#[derive(Debug, Clone, PartialEq)]
pub struct Performance {
    /// Why the run failed, if it did.
    pub failure: Option<Failure>,
    /// Total turns of the solution, `f64::INFINITY` if there is none.
    pub outcome: f64,
    /// Reserved, always `None` for heuristic search.
    pub search: Option<u32>,
    /// Seconds spent searching, rounded to 2 decimals.
    pub time: f64,
    /// Megabytes used while searching, rounded to 2 decimals.
    pub memory: f64,
    /// Points, from 1 to 5.
    pub point: u8,
}

impl Performance {
    /// Record returned when a resource limit was broken: only the submission point is given.
    pub fn limit_exceeded(failure: Failure, time: f64, memory: f64) -> Performance {
        Performance {
            failure: Some(failure),
            outcome: f64::INFINITY,
            search: None,
            time,
            memory,
            point: 1,
        }
    }

    /// Same record with another point count.
    pub fn with_point(&self, point: u8) -> Performance {
        Performance {
            point,
            ..self.clone()
        }
    }

    /// True if the run did not fail.
    pub fn succeeded(&self) -> bool {
        self.failure.is_none()
    }

    /// Failure as text, for reports.
    pub fn failure_text(&self) -> Option<String> {
        self.failure.as_ref().map(Failure::to_string)
    }
}

impl fmt::Display for Performance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.failure.is_some() {
            "FAILURE "
        } else {
            "        "
        };
        write!(
            f,
            "{status} {:>7.2} {:>7.2}MB {:>6.2}sec | {}",
            self.outcome, self.memory, self.time, self.point
        )
    }
}

/// Round to two decimals.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
