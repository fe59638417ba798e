//! Run one agent's search while measuring it.
//!
//! [`run_search`] never fails: an error returned by the agent, a panic inside it, or a solution
//! the board does not recognize all end up in [`SearchRun::solution`] as a [`Failure`].

use std::{
    any::Any,
    cell::Cell,
    panic::{self, AssertUnwindSafe},
    sync::{Arc, Once},
    thread,
    time::Instant,
};

use tracing::{debug, error, info};

use crate::{
    configuration::Configuration,
    game_interface::{Action, Board, SearchAgent},
    performance::{round2, Failure, MEGABYTES},
    resource_monitor::{MemoryProbe, ResourceMonitor},
};

/// What came out of one search attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRun {
    /// The actions the agent proposed, or why there are none.
    pub solution: Result<Vec<Action>, Failure>,
    /// Wall-clock seconds, rounded to 2 decimals.
    pub time: f64,
    /// Megabytes used by the search, rounded to 2 decimals.
    pub memory: f64,
}

/// Call `agent`'s search on `board` while a [`ResourceMonitor`] samples `probe`.
///
/// `board` should already hold the initial state. Memory is the larger of the board's own
/// accounting and the process peak above the baseline read just before the search.
pub fn run_search<B, A>(
    agent: &mut A,
    board: &mut B,
    probe: &Arc<dyn MemoryProbe>,
    config: &Configuration,
) -> SearchRun
where
    B: Board,
    A: SearchAgent<B> + ?Sized,
{
    // sets the board's own baseline
    board.reset_memory_usage();
    let _ = board.current_memory_usage();
    let baseline = probe.resident_bytes().ok();

    info!("Begin to search using {} agent.", agent.name());
    let start = Instant::now();
    let monitor = ResourceMonitor::start(
        probe.clone(),
        baseline.unwrap_or(0),
        config.sampling_interval,
    );

    let result = catch_quietly(|| agent.heuristic_search(board));

    let peak = monitor.stop(config.join_timeout);
    let time = round2(start.elapsed().as_secs_f64());

    let solution = match result {
        Ok(Ok(solution)) => check_shape(&*board, solution),
        Ok(Err(e)) => Err(Failure::Search(format!("{e:?}"))),
        Err(payload) => Err(Failure::Panic(panic_message(payload))),
    };

    let board_memory = board.max_memory_usage() as f64 / MEGABYTES;
    let process_memory = baseline
        .map(|baseline| peak.saturating_sub(baseline) as f64 / MEGABYTES)
        .unwrap_or(0.0);
    let memory = round2(board_memory.max(process_memory));

    debug!(agent = agent.name(), time, memory, board_memory, process_memory);

    SearchRun {
        solution,
        time,
        memory,
    }
}

fn check_shape<B: Board>(board: &B, solution: Vec<Action>) -> Result<Vec<Action>, Failure> {
    match solution.iter().position(|action| !board.recognizes(action)) {
        Some(index) => Err(Failure::Shape {
            index,
            action: solution[index],
        }),
        None => Ok(solution),
    }
}

thread_local! {
    static CATCHING: Cell<bool> = const { Cell::new(false) };
}

/// Run `f`, catching a panic inside it.
///
/// The panic is reported through `tracing` instead of the default hook's stderr output. Panics
/// outside of this call, or on other threads, still reach the previous hook.
pub(crate) fn catch_quietly<R>(f: impl FnOnce() -> R) -> thread::Result<R> {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let orig_hook = panic::take_hook();
        panic::set_hook(Box::new(move |panic_info| {
            if CATCHING.with(Cell::get) {
                error!("caught panic: {panic_info}");
            } else {
                orig_hook(panic_info);
            }
        }));
    });

    let was_catching = CATCHING.with(|catching| catching.replace(true));
    let result = panic::catch_unwind(AssertUnwindSafe(f));
    CATCHING.with(|catching| catching.set(was_catching));
    result
}

/// Text of a caught panic.
pub(crate) fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_owned()
    }
}
