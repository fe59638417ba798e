//! Peak memory sampling alongside a running search.
//!
//! A [`ResourceMonitor`] owns one background thread that asks a [`MemoryProbe`] for the resident
//! memory of the process at a fixed interval and keeps the highest value seen. The search itself
//! runs on the calling thread and never shares the board with the monitor.
//!
//! Sampling errors are ignored: a probe that fails only makes the peak less precise.

use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        mpsc::{self, RecvTimeoutError, Sender},
        Arc, Mutex,
    },
    thread::JoinHandle,
    time::Duration,
};

use anyhow::{anyhow, Context};
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};
use tracing::{trace, warn};

/// Something able to tell how much memory the process uses.
pub trait MemoryProbe: Send + Sync {
    /// Resident memory of the process, in bytes.
    fn resident_bytes(&self) -> anyhow::Result<u64>;
}

/// Reads the resident memory of the current process through `sysinfo`.
#[derive(Debug)]
pub struct ProcessMemory {
    pid: Pid,
    system: Mutex<System>,
}

impl ProcessMemory {
    /// Probe for the current process.
    ///
    /// # Errors
    /// Returned when the current pid cannot be read on this platform.
    pub fn current() -> anyhow::Result<ProcessMemory> {
        let pid = sysinfo::get_current_pid().map_err(|e| anyhow!("{e}"))?;
        Ok(ProcessMemory {
            pid,
            system: Mutex::new(System::new()),
        })
    }
}

impl MemoryProbe for ProcessMemory {
    fn resident_bytes(&self) -> anyhow::Result<u64> {
        let mut system = self
            .system
            .lock()
            .map_err(|_| anyhow!("memory probe poisoned"))?;
        system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[self.pid]),
            true,
            ProcessRefreshKind::nothing().with_memory(),
        );
        let process = system
            .process(self.pid)
            .with_context(|| format!("process {} not found", self.pid))?;
        Ok(process.memory())
    }
}

/// Probe used when the platform cannot report process memory. Always fails, so the board's own
/// accounting is the only measure left.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoMemoryProbe;

impl MemoryProbe for NoMemoryProbe {
    fn resident_bytes(&self) -> anyhow::Result<u64> {
        Err(anyhow!("process memory is not available"))
    }
}

/// Background peak-memory sampler. Stop it with [`ResourceMonitor::stop`]; dropping it also
/// tells the thread to stop, without waiting for it.
#[derive(Debug)]
pub struct ResourceMonitor {
    peak: Arc<AtomicU64>,
    stop_tx: Option<Sender<()>>,
    done_rx: mpsc::Receiver<()>,
    handle: Option<JoinHandle<()>>,
}

impl ResourceMonitor {
    /// Start sampling `probe` every `interval`. The peak starts at `baseline`.
    pub fn start(probe: Arc<dyn MemoryProbe>, baseline: u64, interval: Duration) -> ResourceMonitor {
        let peak = Arc::new(AtomicU64::new(baseline));
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let (done_tx, done_rx) = mpsc::channel::<()>();

        let shared_peak = peak.clone();
        let handle = std::thread::Builder::new()
            .name("memory-monitor".to_owned())
            .spawn(move || {
                loop {
                    match probe.resident_bytes() {
                        Ok(bytes) => {
                            shared_peak.fetch_max(bytes, Ordering::Relaxed);
                        }
                        Err(e) => trace!("memory sample failed: {e}"),
                    }
                    // doubles as the sleep between two samples
                    match stop_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => continue,
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                let _ = done_tx.send(());
            });

        let handle = match handle {
            Ok(handle) => Some(handle),
            Err(e) => {
                warn!("could not spawn memory monitor, only the baseline is known: {e}");
                None
            }
        };

        ResourceMonitor {
            peak,
            stop_tx: Some(stop_tx),
            done_rx,
            handle,
        }
    }

    /// Highest value sampled so far, in bytes.
    pub fn peak(&self) -> u64 {
        self.peak.load(Ordering::Relaxed)
    }

    /// Signal the thread to stop and wait for it at most `join_timeout`.
    ///
    /// Returns the peak in bytes. If the thread does not exit in time it is left detached and
    /// the peak read so far is returned.
    pub fn stop(mut self, join_timeout: Duration) -> u64 {
        self.signal_stop();

        if let Some(handle) = self.handle.take() {
            match self.done_rx.recv_timeout(join_timeout) {
                Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                    if handle.join().is_err() {
                        warn!("memory monitor thread panicked");
                    }
                }
                Err(RecvTimeoutError::Timeout) => {
                    warn!(?join_timeout, "memory monitor did not stop in time, detaching it");
                }
            }
        }

        self.peak()
    }

    fn signal_stop(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for ResourceMonitor {
    fn drop(&mut self) {
        self.signal_stop();
    }
}
