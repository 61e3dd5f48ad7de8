//! Penalty weights.

use crate::error::{Result, TimetableError};

/// Weights applied to the penalty counts.
///
/// Each term has its own multiplier, and the hard and soft groups are
/// scaled again by `hard_weight` and `soft_weight`:
///
/// ```text
/// hard_penalty = hard_weight * (teacher_conflict * teacher_conflicts
///                             + room_conflict * room_conflicts
///                             + missing_teacher * missing_teacher_count)
/// soft_penalty = soft_weight * (not_preferred * not_preferred_count
///                             + back_to_back * back_to_back_count
///                             + gap * gaps
///                             + overloaded * overloaded_count)
/// ```
///
/// With every term multiplier at 1.0 this reduces to
/// `hard_weight * hard_count + soft_weight * soft_count`.
///
/// # Examples
///
/// ```
/// use u_timetable::cost::CostWeights;
///
/// let weights = CostWeights::default()
///     .with_hard_weight(1000.0)
///     .with_overloaded(10.0)
///     .with_not_preferred(2.0)
///     .with_max_sessions_per_day(3);
/// assert!(weights.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CostWeights {
    /// Scale of the hard group (double-booking, missing teacher).
    pub hard_weight: f64,

    /// Scale of the soft group (preference, adjacency, gaps, overload).
    pub soft_weight: f64,

    /// Per teacher double-booking pair.
    pub teacher_conflict: f64,
    /// Per room double-booking pair.
    pub room_conflict: f64,
    /// Per session of an unmapped course.
    pub missing_teacher: f64,

    /// Per session outside its teacher's preferred slots.
    pub not_preferred: f64,
    /// Per adjacent pair of a teacher's sessions.
    pub back_to_back: f64,
    /// Per idle period beyond the first.
    pub gap: f64,
    /// Per session beyond `max_sessions_per_day`.
    pub overloaded: f64,

    /// Sessions a teacher may hold on one day before each extra session
    /// counts as an overload.
    pub max_sessions_per_day: usize,
}

impl Default for CostWeights {
    fn default() -> Self {
        Self {
            hard_weight: 100.0,
            soft_weight: 1.0,
            teacher_conflict: 1.0,
            room_conflict: 1.0,
            missing_teacher: 1.0,
            not_preferred: 1.0,
            back_to_back: 1.0,
            gap: 1.0,
            overloaded: 1.0,
            max_sessions_per_day: 4,
        }
    }
}

impl CostWeights {
    pub fn with_hard_weight(mut self, w: f64) -> Self {
        self.hard_weight = w;
        self
    }

    pub fn with_soft_weight(mut self, w: f64) -> Self {
        self.soft_weight = w;
        self
    }

    pub fn with_teacher_conflict(mut self, w: f64) -> Self {
        self.teacher_conflict = w;
        self
    }

    pub fn with_room_conflict(mut self, w: f64) -> Self {
        self.room_conflict = w;
        self
    }

    pub fn with_missing_teacher(mut self, w: f64) -> Self {
        self.missing_teacher = w;
        self
    }

    pub fn with_not_preferred(mut self, w: f64) -> Self {
        self.not_preferred = w;
        self
    }

    pub fn with_back_to_back(mut self, w: f64) -> Self {
        self.back_to_back = w;
        self
    }

    pub fn with_gap(mut self, w: f64) -> Self {
        self.gap = w;
        self
    }

    pub fn with_overloaded(mut self, w: f64) -> Self {
        self.overloaded = w;
        self
    }

    pub fn with_max_sessions_per_day(mut self, n: usize) -> Self {
        self.max_sessions_per_day = n;
        self
    }

    /// Validates the weights. Every weight must be finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        let named = [
            ("hard_weight", self.hard_weight),
            ("soft_weight", self.soft_weight),
            ("teacher_conflict", self.teacher_conflict),
            ("room_conflict", self.room_conflict),
            ("missing_teacher", self.missing_teacher),
            ("not_preferred", self.not_preferred),
            ("back_to_back", self.back_to_back),
            ("gap", self.gap),
            ("overloaded", self.overloaded),
        ];
        for (name, w) in named {
            if !w.is_finite() || w < 0.0 {
                return Err(TimetableError::config(format!(
                    "{name} must be a non-negative number, got {w}"
                )));
            }
        }
        Ok(())
    }
}
