//! Cost evaluation.
//!
//! A schedule's cost is a weighted sum of hard violations (double-booking,
//! missing teacher) and soft violations (preferences, adjacency, gaps,
//! daily overload). See [`CostEvaluator`] for the term definitions.

mod evaluator;
mod report;
mod weights;

pub use evaluator::{CostBreakdown, CostEvaluator, PenaltyCounts};
pub use report::ScheduleReport;
pub use weights::CostWeights;
