//! Post-run analysis of a schedule.

use super::evaluator::{CostBreakdown, CostEvaluator, PenaltyCounts};
use crate::problem::ProblemDefinition;
use crate::schedule::Schedule;
use std::fmt;

/// Cost breakdown plus per-term counts and preference statistics.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScheduleReport {
    pub cost: CostBreakdown,
    pub counts: PenaltyCounts,
    /// Sessions placed in one of their teacher's preferred slots.
    pub preferred_hits: usize,
    /// Sessions whose teacher has a non-empty preference set.
    pub sessions_with_preferences: usize,
}

impl ScheduleReport {
    pub fn analyze(problem: &ProblemDefinition, schedule: &Schedule) -> Self {
        let evaluator = CostEvaluator::new(problem);
        let counts = evaluator.counts(schedule);
        let cost = CostBreakdown::from_counts(&counts, problem.weights());

        let mut preferred_hits = 0;
        let mut sessions_with_preferences = 0;
        for session in schedule.sessions() {
            let Some(teacher) = session.teacher else {
                continue;
            };
            if problem.has_preferences(teacher) {
                sessions_with_preferences += 1;
                if problem.is_preferred(teacher, session.slot) {
                    preferred_hits += 1;
                }
            }
        }

        Self {
            cost,
            counts,
            preferred_hits,
            sessions_with_preferences,
        }
    }
}

impl fmt::Display for ScheduleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "cost {:.2} (hard {} -> {:.2}, soft {} -> {:.2})",
            self.cost.total,
            self.cost.hard_count,
            self.cost.hard_penalty,
            self.cost.soft_count,
            self.cost.soft_penalty
        )?;
        writeln!(
            f,
            "clashes: teacher {}, room {}, missing teacher {}",
            self.counts.teacher_conflicts, self.counts.room_conflicts, self.counts.missing_teacher
        )?;
        writeln!(
            f,
            "soft: not preferred {}, back-to-back {}, gaps {}, overloaded {}",
            self.counts.not_preferred,
            self.counts.back_to_back,
            self.counts.gaps,
            self.counts.overloaded
        )?;
        write!(
            f,
            "preferred-slot matches: {}/{}",
            self.preferred_hits, self.sessions_with_preferences
        )
    }
}
