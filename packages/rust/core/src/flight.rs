//! Single-flight regeneration.
//!
//! File-change bursts must not start overlapping runs that race on the same
//! output files. A [`Regenerator`] runs at most one job at a time: a request
//! that arrives while a run is in flight only marks a re-run as pending, and
//! however many requests arrive, at most one re-run is queued.

use std::future::Future;
use std::sync::Mutex;

use tracing::{debug, warn};

use tutorial_llms_shared::{GenerateConfig, GenerateReport, Result};

use crate::pipeline::{SilentProgress, generate_all};

/// Work guarded by a [`Regenerator`].
pub trait Job: Send + Sync {
    /// Run the job once.
    fn run(&self) -> impl Future<Output = Result<GenerateReport>> + Send;
}

/// A full generation into a fixed output directory.
#[derive(Debug, Clone)]
pub struct GenerateJob {
    pub config: GenerateConfig,
}

impl Job for GenerateJob {
    fn run(&self) -> impl Future<Output = Result<GenerateReport>> + Send {
        generate_all(&self.config, &SilentProgress)
    }
}

/// Outcome of [`Regenerator::request`].
#[derive(Debug)]
pub enum Flight {
    /// This caller drove the runs. `result` is the last run's outcome.
    Ran {
        result: Result<GenerateReport>,
        runs: usize,
    },
    /// A run was already in flight; it will run once more after it finishes.
    Coalesced,
}

#[derive(Debug, Default)]
struct FlightState {
    running: bool,
    pending: bool,
}

/// Coalescing wrapper around a [`Job`].
pub struct Regenerator<J> {
    job: J,
    state: Mutex<FlightState>,
}

impl<J: Job> Regenerator<J> {
    pub fn new(job: J) -> Self {
        Self {
            job,
            state: Mutex::new(FlightState::default()),
        }
    }

    /// Request a run.
    ///
    /// When idle, runs the job now and keeps re-running while requests arrived
    /// during the previous run. When busy, records one pending re-run and
    /// returns [`Flight::Coalesced`] immediately.
    pub async fn request(&self) -> Flight {
        {
            let mut state = self.lock();
            if state.running {
                state.pending = true;
                debug!("regeneration already running, queued a re-run");
                return Flight::Coalesced;
            }
            state.running = true;
        }

        // Clears the flags if the job panics mid-run.
        let mut reset = ResetOnPanic {
            regen: self,
            armed: true,
        };
        let mut runs = 0;

        loop {
            let result = self.job.run().await;
            runs += 1;

            // Decide and go idle under one lock.
            let rerun = {
                let mut state = self.lock();
                if state.pending {
                    state.pending = false;
                    true
                } else {
                    state.running = false;
                    false
                }
            };
            if !rerun {
                reset.armed = false;
                return Flight::Ran { result, runs };
            }

            if let Err(e) = &result {
                warn!(error = %e, "regeneration failed, re-running for queued changes");
            } else {
                debug!("re-running for changes queued during the last run");
            }
        }
    }

    /// Whether a run is currently in flight.
    pub fn is_running(&self) -> bool {
        self.lock().running
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FlightState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

struct ResetOnPanic<'a, J: Job> {
    regen: &'a Regenerator<J>,
    armed: bool,
}

impl<J: Job> Drop for ResetOnPanic<'_, J> {
    fn drop(&mut self) {
        if self.armed {
            let mut state = self.regen.lock();
            state.running = false;
            state.pending = false;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
