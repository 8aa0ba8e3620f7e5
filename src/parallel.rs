//! Rayon thread pool configuration for the species sweep.
//!
//! Use [WorkerPool::install] to run a game's analysis with a fixed number of
//! threads, or rely on Rayon's default (all CPU cores).

use crate::analysis::{AnalysisResult, GameContext, TierEngine};
use crate::errors::{SpeciesFailure, SpeciesResult};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// Configures how many worker threads are used for the species sweep.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkerPool {
    /// Number of worker threads. If 0, use Rayon default (num_cpus).
    pub workers: usize,
}

impl WorkerPool {
    /// Use exactly `n` worker threads.
    pub fn with_workers(n: usize) -> Self {
        Self { workers: n }
    }

    /// Run a closure on a thread pool with this worker count. If [workers](WorkerPool::workers) is 0,
    /// uses the global Rayon pool. A pool that cannot be built falls back to the global one.
    pub fn install<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        if self.workers == 0 {
            return f();
        }
        match ThreadPoolBuilder::new().num_threads(self.workers).build() {
            Ok(pool) => pool.install(f),
            Err(e) => {
                log::warn!("Could not build a pool of {} workers ({}); using the global pool", self.workers, e);
                f()
            }
        }
    }
}

/// Analyze every listed species of one game in parallel.
pub fn sweep_species(
    context: &GameContext,
    species_ids: &[String],
    pool: &WorkerPool,
) -> Vec<(String, SpeciesResult<AnalysisResult>)> {
    sweep_with(species_ids, pool, |id| TierEngine::new(context).analyze(id))
}

/// Run `analyze` for every listed species in parallel.
///
/// Results come back in the order of `species_ids`, whatever order the workers finish in.
/// A panic inside `analyze` is caught and reported as that species' failure.
pub fn sweep_with<F>(
    species_ids: &[String],
    pool: &WorkerPool,
    analyze: F,
) -> Vec<(String, SpeciesResult<AnalysisResult>)>
where
    F: Fn(&str) -> SpeciesResult<AnalysisResult> + Sync,
{
    pool.install(|| {
        species_ids
            .par_iter()
            .map(|id| {
                let result = panic::catch_unwind(AssertUnwindSafe(|| analyze(id))).unwrap_or_else(|payload| {
                    Err(SpeciesFailure::Panicked {
                        species_id: id.clone(),
                        details: panic_message(payload.as_ref()),
                    })
                });
                (id.clone(), result)
            })
            .collect()
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
