//! Simulated annealing controller.
//!
//! Builds a random initial schedule, then repeatedly proposes a neighbor,
//! applies the Metropolis criterion, cools the temperature geometrically,
//! and emits a progress sample, until the best cost reaches the target
//! (`Converged`), the iteration budget is spent (`Exhausted`), or an
//! external flag stops the run (`Cancelled`).
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Abramson (1991), "Constructing School Timetables using Simulated Annealing"

mod config;
mod progress;
mod restarts;
mod runner;

pub use config::AnnealConfig;
pub use progress::{ChannelSink, FnSink, NullSink, ProgressSample, ProgressSink};
pub use restarts::{
    run_restarts, run_restarts_with_cancel, RestartConfig, RestartOutcome, RunSummary,
};
pub use runner::{AnnealOutcome, AnnealState, Annealer};
