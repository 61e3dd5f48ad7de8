//! Penalty computation.
//!
//! Hard terms:
//! - teacher double-booking: one unit per pair of sessions sharing teacher and slot
//! - room double-booking: one unit per pair of sessions sharing room and slot
//! - missing teacher: one unit per session whose course has no teacher
//!
//! Soft terms:
//! - non-preferred slot (only for teachers with a non-empty preference set)
//! - back-to-back: adjacent periods on the same day, per adjacent pair
//! - gaps: idle periods beyond the first between consecutive sessions of a day
//! - overloaded day: sessions beyond `max_sessions_per_day` per teacher and day
//!
//! Every evaluation recomputes from scratch; there is no cached state.

use super::weights::CostWeights;
use crate::problem::ProblemDefinition;
use crate::schedule::Schedule;

/// Raw violation counts per penalty term.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PenaltyCounts {
    pub teacher_conflicts: u64,
    pub room_conflicts: u64,
    pub missing_teacher: u64,
    pub not_preferred: u64,
    pub back_to_back: u64,
    pub gaps: u64,
    pub overloaded: u64,
}

impl PenaltyCounts {
    /// Sum of the hard terms.
    pub fn hard(&self) -> u64 {
        self.teacher_conflicts + self.room_conflicts + self.missing_teacher
    }

    /// Sum of the soft terms.
    pub fn soft(&self) -> u64 {
        self.not_preferred + self.back_to_back + self.gaps + self.overloaded
    }
}

/// Weighted cost of a schedule.
///
/// `total = hard_penalty + soft_penalty`. See [`CostWeights`] for how each
/// penalty is weighted.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CostBreakdown {
    /// Number of hard violations.
    pub hard_count: u64,
    /// Number of soft violations.
    pub soft_count: u64,
    /// Weighted hard terms, scaled by `hard_weight`.
    pub hard_penalty: f64,
    /// Weighted soft terms, scaled by `soft_weight`.
    pub soft_penalty: f64,
    pub total: f64,
}

impl CostBreakdown {
    pub fn from_counts(counts: &PenaltyCounts, weights: &CostWeights) -> Self {
        let hard_terms = weights.teacher_conflict * counts.teacher_conflicts as f64
            + weights.room_conflict * counts.room_conflicts as f64
            + weights.missing_teacher * counts.missing_teacher as f64;
        let soft_terms = weights.not_preferred * counts.not_preferred as f64
            + weights.back_to_back * counts.back_to_back as f64
            + weights.gap * counts.gaps as f64
            + weights.overloaded * counts.overloaded as f64;
        let hard_penalty = weights.hard_weight * hard_terms;
        let soft_penalty = weights.soft_weight * soft_terms;
        Self {
            hard_count: counts.hard(),
            soft_count: counts.soft(),
            hard_penalty,
            soft_penalty,
            total: hard_penalty + soft_penalty,
        }
    }

    /// No hard constraint is violated.
    pub fn is_feasible(&self) -> bool {
        self.hard_count == 0
    }
}

/// Scores schedules against a problem definition.
///
/// Stateless apart from the borrowed problem: identical schedules always
/// yield identical breakdowns, regardless of call order.
#[derive(Debug, Clone, Copy)]
pub struct CostEvaluator<'a> {
    problem: &'a ProblemDefinition,
}

impl<'a> CostEvaluator<'a> {
    pub fn new(problem: &'a ProblemDefinition) -> Self {
        Self { problem }
    }

    /// Weighted cost of `schedule`.
    pub fn evaluate(&self, schedule: &Schedule) -> CostBreakdown {
        CostBreakdown::from_counts(&self.counts(schedule), self.problem.weights())
    }

    /// Per-term violation counts of `schedule`.
    pub fn counts(&self, schedule: &Schedule) -> PenaltyCounts {
        let problem = self.problem;
        let n_slots = problem.slots().len();
        let n_teachers = problem.teachers().len();
        let n_rooms = problem.rooms().len();

        let mut counts = PenaltyCounts::default();
        let mut teacher_slot = vec![0u64; n_teachers * n_slots];
        let mut room_slot = vec![0u64; n_rooms * n_slots];
        // (day, period) of each session, per teacher
        let mut teacher_days: Vec<Vec<(u32, u32)>> = vec![Vec::new(); n_teachers];

        for session in schedule.sessions() {
            room_slot[session.room * n_slots + session.slot] += 1;

            let Some(teacher) = session.teacher else {
                counts.missing_teacher += 1;
                continue;
            };

            teacher_slot[teacher * n_slots + session.slot] += 1;

            if problem.has_preferences(teacher) && !problem.is_preferred(teacher, session.slot) {
                counts.not_preferred += 1;
            }

            teacher_days[teacher].push(problem.slots()[session.slot].key());
        }

        counts.teacher_conflicts = teacher_slot.iter().map(|&k| pairs(k)).sum();
        counts.room_conflicts = room_slot.iter().map(|&k| pairs(k)).sum();

        let max_per_day = problem.weights().max_sessions_per_day;
        for periods in &mut teacher_days {
            periods.sort_unstable();
            for day in periods.chunk_by(|a, b| a.0 == b.0) {
                counts.overloaded += day.len().saturating_sub(max_per_day) as u64;

                for w in day.windows(2) {
                    match w[1].1 - w[0].1 {
                        0 => {}
                        1 => counts.back_to_back += 1,
                        diff => counts.gaps += u64::from(diff - 2),
                    }
                }
            }
        }

        counts
    }
}

/// Number of unordered pairs among `k` items.
fn pairs(k: u64) -> u64 {
    k * k.saturating_sub(1) / 2
}
