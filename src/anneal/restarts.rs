//! Independent restarts.
//!
//! Each restart is a complete, sequential annealing run with its own seed.
//! Runs share only the read-only problem definition, so with the
//! `parallel` feature they execute on the rayon thread pool.

use super::config::AnnealConfig;
use super::progress::NullSink;
use super::runner::{AnnealOutcome, AnnealState, Annealer};
use crate::error::{Result, TimetableError};
use crate::problem::ProblemDefinition;
use crate::random::resolve_seed;
use log::info;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Configuration for independent restarts.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RestartConfig {
    /// Number of independent runs.
    pub restarts: usize,

    /// Whether to run restarts in parallel using rayon.
    ///
    /// Only effective with the `parallel` feature; results are identical
    /// either way.
    pub parallel: bool,
}

impl Default for RestartConfig {
    fn default() -> Self {
        Self {
            restarts: 4,
            parallel: true,
        }
    }
}

impl RestartConfig {
    pub fn with_restarts(mut self, n: usize) -> Self {
        self.restarts = n;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.restarts == 0 {
            return Err(TimetableError::config("restarts must be at least 1"));
        }
        Ok(())
    }
}

/// Summary of one restart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub seed: u64,
    pub state: AnnealState,
    pub best_total: f64,
    pub hard_count: u64,
    pub iterations: usize,
}

/// Result of a set of restarts.
#[derive(Debug, Clone)]
pub struct RestartOutcome {
    /// The winning run.
    pub best: AnnealOutcome,
    /// Index of the winning run in `runs`.
    pub best_index: usize,
    /// One summary per restart, in restart order.
    pub runs: Vec<RunSummary>,
}

/// Runs `restart_config.restarts` independent annealing runs and keeps the
/// best.
///
/// Run `k` uses seed `base + k`, where `base` is `config.seed` or a fresh
/// random seed. The winner has the lowest total cost; ties go to the lower
/// hard-violation count, then to the earlier run.
pub fn run_restarts(
    problem: &ProblemDefinition,
    config: &AnnealConfig,
    restart_config: &RestartConfig,
) -> Result<RestartOutcome> {
    run_restarts_with_cancel(problem, config, restart_config, None)
}

/// Like [`run_restarts`], with a cancellation flag shared by all runs.
pub fn run_restarts_with_cancel(
    problem: &ProblemDefinition,
    config: &AnnealConfig,
    restart_config: &RestartConfig,
    cancel: Option<Arc<AtomicBool>>,
) -> Result<RestartOutcome> {
    config.validate()?;
    restart_config.validate()?;

    let base_seed = resolve_seed(config.seed);
    info!(
        "starting {} restarts from base seed {base_seed}",
        restart_config.restarts
    );

    let run_one = |k: usize| -> Result<AnnealOutcome> {
        let run_config = config.clone().with_seed(base_seed.wrapping_add(k as u64));
        Annealer::run_with_cancel(problem, &run_config, &mut NullSink, cancel.clone())
    };

    let outcomes = collect_runs(restart_config.restarts, restart_config.parallel, run_one)?;

    let runs: Vec<RunSummary> = outcomes
        .iter()
        .map(|o| RunSummary {
            seed: o.seed,
            state: o.state,
            best_total: o.cost.total,
            hard_count: o.cost.hard_count,
            iterations: o.iterations,
        })
        .collect();

    let best_index = select_best(&runs);
    let best = outcomes
        .into_iter()
        .nth(best_index)
        .ok_or_else(|| TimetableError::config("restarts must be at least 1"))?;

    info!(
        "restart {best_index} wins with cost {:.2} (hard {})",
        best.cost.total, best.cost.hard_count
    );

    Ok(RestartOutcome {
        best,
        best_index,
        runs,
    })
}

/// Index of the best run: lowest total, then lowest hard count, then lowest index.
fn select_best(runs: &[RunSummary]) -> usize {
    runs.iter()
        .enumerate()
        .min_by(|(i, a), (j, b)| {
            a.best_total
                .total_cmp(&b.best_total)
                .then(a.hard_count.cmp(&b.hard_count))
                .then(i.cmp(j))
        })
        .map(|(i, _)| i)
        .unwrap_or(0)
}

#[cfg(feature = "parallel")]
fn collect_runs<F>(n: usize, parallel: bool, run_one: F) -> Result<Vec<AnnealOutcome>>
where
    F: Fn(usize) -> Result<AnnealOutcome> + Send + Sync,
{
    if parallel {
        (0..n).into_par_iter().map(run_one).collect()
    } else {
        (0..n).map(run_one).collect()
    }
}

#[cfg(not(feature = "parallel"))]
fn collect_runs<F>(n: usize, _parallel: bool, run_one: F) -> Result<Vec<AnnealOutcome>>
where
    F: Fn(usize) -> Result<AnnealOutcome>,
{
    (0..n).map(run_one).collect()
}
