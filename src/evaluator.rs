//! Core grading logic for a submitted search agent.
//!
//! This module defines the [`Evaluator`] type, which grades one candidate agent against an
//! optional reference agent on a single initial position. For each agent it:
//!
//! - Builds a fresh board and loads the initial position into it
//! - Runs the agent's search while sampling memory (see [`run_search`])
//! - Replays the solution on a clean board (see [`validate_outcome`])
//!
//! The reference always runs first, then the candidate, never both at once.
//!
//! # Limits
//!
//! Time and memory limits from [`Configuration`] apply to the candidate only. Going over one
//! ends the evaluation right away with a single submission point: the solution is not replayed
//! and nothing is compared.
//!
//! # Scoring
//!
//! Otherwise the candidate's record is scored by [`Scorer`], which only recomputes the point.
//!
//! # Example
//!
//! ```no_run
//! # use search_grader::prelude::*;
//! # #[derive(Default)]
//! # struct YourBoard;
//! # impl Board for YourBoard {
//! #     type State = ();
//! #     fn load_state(&mut self, _state: &(), _is_initial: bool) {}
//! #     fn move_turns(&self, _from: Position, _to: Position) -> u32 { 1 }
//! #     fn reset_memory_usage(&mut self) {}
//! #     fn current_memory_usage(&mut self) -> Option<u64> { None }
//! #     fn max_memory_usage(&self) -> u64 { 0 }
//! #     fn simulate_actions(&mut self, _actions: &[Action]) -> Result<(), RuleViolation> { Ok(()) }
//! #     fn is_game_end(&self) -> bool { true }
//! #     fn pawn_position(&self, _player: PlayerId) -> Position { Position::new(0, 0) }
//! #     fn dimensions(&self) -> (usize, usize) { (9, 9) }
//! # }
//! # struct YourAgent;
//! # impl SearchAgent<YourBoard> for YourAgent {
//! #     fn name(&self) -> &str { "yours" }
//! #     fn heuristic_search(&mut self, _board: &mut YourBoard) -> anyhow::Result<Vec<Action>> {
//! #         Ok(vec![])
//! #     }
//! # }
//! let config = Configuration::new().with_time_limit(60.0).with_memory_limit(512.0);
//! let evaluator = Evaluator::<YourBoard>::new(config);
//!
//! let mut candidate = YourAgent;
//! let mut reference = YourAgent;
//! let performance = evaluator.evaluate_against(&(), &mut candidate, &mut reference);
//! println!("{performance}");
//! ```

use std::{fmt, marker::PhantomData, sync::Arc};

use tracing::{debug, instrument, trace, warn};

use crate::{
    configuration::Configuration,
    game_interface::{Board, SearchAgent},
    logger::init_logger,
    outcome_validator::validate_outcome,
    performance::{Failure, Performance},
    resource_monitor::{MemoryProbe, NoMemoryProbe, ProcessMemory},
    scorer::Scorer,
    search_runner::{run_search, SearchRun},
};

/// Which slot an agent fills in an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Reference,
    Candidate,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Reference => write!(f, "reference"),
            Role::Candidate => write!(f, "candidate"),
        }
    }
}

/// Records of a full evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// Reference run, if a reference agent was given.
    pub reference: Option<Performance>,
    /// Candidate run, before tier scoring (point is `1 + goal reached`).
    ///
    /// Equal to `score` when a resource limit was broken.
    pub candidate: Performance,
    /// Final record handed to the grading layer.
    pub score: Performance,
}

/// Grades search agents playing on boards of type `B`.
pub struct Evaluator<B: Board> {
    config: Configuration,
    probe: Arc<dyn MemoryProbe>,
    _board: PhantomData<B>,
}

impl<B: Board> Evaluator<B> {
    /// Create an [`Evaluator`] measuring the current process' memory.
    ///
    /// Falls back to the board's own memory accounting if the process cannot be measured.
    #[instrument(skip_all)]
    pub fn new(config: Configuration) -> Evaluator<B> {
        let probe: Arc<dyn MemoryProbe> = match ProcessMemory::current() {
            Ok(probe) => Arc::new(probe),
            Err(e) => {
                warn!("process memory unavailable, only the board's accounting is used: {e:#}");
                Arc::new(NoMemoryProbe)
            }
        };
        Self::with_probe(config, probe)
    }

    /// Create an [`Evaluator`] sampling memory through `probe`.
    pub fn with_probe(config: Configuration, probe: Arc<dyn MemoryProbe>) -> Evaluator<B> {
        if config.log {
            if let Err(e) = init_logger() {
                warn!("log file disabled: {e:#}");
            }
        }

        trace!(?config);

        Evaluator {
            config,
            probe,
            _board: PhantomData,
        }
    }

    /// The configuration in use.
    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// Grade `candidate` alone from `initial` and return the final record.
    ///
    /// Every comparison with a reference is considered won.
    pub fn evaluate<C>(&self, initial: &B::State, candidate: &mut C) -> Performance
    where
        C: SearchAgent<B>,
    {
        self.evaluate_detailed(initial, candidate, None).score
    }

    /// Grade `candidate` from `initial` against `reference` and return the final record.
    pub fn evaluate_against<C, R>(
        &self,
        initial: &B::State,
        candidate: &mut C,
        reference: &mut R,
    ) -> Performance
    where
        C: SearchAgent<B>,
        R: SearchAgent<B>,
    {
        let reference: &mut dyn SearchAgent<B> = reference;
        self.evaluate_detailed(initial, candidate, Some(reference)).score
    }

    /// Grade `candidate` from `initial`, against `reference` if given, and return every record.
    ///
    /// Never fails: every problem ends up in [`Performance::failure`].
    pub fn evaluate_detailed(
        &self,
        initial: &B::State,
        candidate: &mut dyn SearchAgent<B>,
        reference: Option<&mut dyn SearchAgent<B>>,
    ) -> Evaluation {
        let reference = reference.map(|agent| {
            let (mut board, run) = self.attempt(initial, agent, Role::Reference);
            grade_run(&mut board, initial, run)
        });

        let (mut board, run) = self.attempt(initial, candidate, Role::Candidate);

        if let Some(failure) = self.limit_breach(&run) {
            warn!(agent = candidate.name(), "{failure}");
            let score = Performance::limit_exceeded(failure, run.time, run.memory);
            return Evaluation {
                reference,
                candidate: score.clone(),
                score,
            };
        }

        let candidate_perf = grade_run(&mut board, initial, run);
        let score = Scorer::new(self.config.intermediate_memory_mb)
            .score(&candidate_perf, reference.as_ref());
        debug!(agent = candidate.name(), %score, "final score");

        Evaluation {
            reference,
            candidate: candidate_perf,
            score,
        }
    }

    /// Run `agent` on a fresh board holding `initial`.
    fn attempt(
        &self,
        initial: &B::State,
        agent: &mut dyn SearchAgent<B>,
        role: Role,
    ) -> (B, SearchRun) {
        let mut board = B::default();
        board.load_state(initial, true);

        let run = run_search(agent, &mut board, &self.probe, &self.config);
        match &run.solution {
            Ok(solution) => debug!(%role, agent = agent.name(), actions = solution.len()),
            Err(failure) => warn!(%role, agent = agent.name(), "search failed: {failure}"),
        }
        (board, run)
    }

    fn limit_breach(&self, run: &SearchRun) -> Option<Failure> {
        if self.config.exceeds_time(run.time) {
            Some(Failure::TimeLimit(run.time))
        } else if self.config.exceeds_memory(run.memory) {
            Some(Failure::MemoryLimit(run.memory))
        } else {
            None
        }
    }
}

/// Replay `run`'s solution and build the run's own record.
fn grade_run<B: Board>(board: &mut B, initial: &B::State, run: SearchRun) -> Performance {
    let (solution, search_failure) = match run.solution {
        Ok(solution) => (Some(solution), None),
        Err(failure) => (None, Some(failure)),
    };

    let validation = validate_outcome(board, initial, solution.as_deref());
    let failure = search_failure.or(validation.violation.map(Failure::Rule));

    Performance {
        failure,
        outcome: validation.outcome,
        search: None,
        time: run.time,
        memory: run.memory,
        point: 1 + u8::from(validation.reached_goal),
    }
}
