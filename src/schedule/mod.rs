//! Candidate timetables.
//!
//! A [`Schedule`] holds exactly one [`Session`] per required
//! `(course, occurrence)` pair. Conflicts are representable on purpose:
//! the search moves through infeasible states and the cost evaluator
//! penalizes them.

mod table;

pub use table::TimetableRow;

use crate::error::{Result, TimetableError};
use crate::problem::{CourseIdx, ProblemDefinition, RoomIdx, SlotIdx, TeacherIdx};
use rand::Rng;

/// One scheduled occurrence of a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Session {
    /// Course this session belongs to.
    pub course: CourseIdx,
    /// Occurrence index within the course, `0..sessions`.
    pub occurrence: usize,
    /// Teacher from the course mapping; `None` if the mapping is missing.
    pub teacher: Option<TeacherIdx>,
    pub room: RoomIdx,
    pub slot: SlotIdx,
}

/// A complete assignment of sessions to rooms and slots.
///
/// Cloning is a deep copy; two schedules never share session storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Schedule {
    sessions: Vec<Session>,
}

impl Schedule {
    /// Builds a schedule from explicit sessions, in any order.
    ///
    /// Intended for hand-built schedules (tests, warm starts). Fails with
    /// `MalformedProblem` unless the sessions cover every required
    /// `(course, occurrence)` of `problem` exactly once, with in-range room
    /// and slot indices and the teacher given by the course mapping.
    pub fn from_sessions(problem: &ProblemDefinition, sessions: Vec<Session>) -> Result<Self> {
        check_sessions(problem, &sessions)?;
        Ok(Self { sessions })
    }

    /// Builds a schedule from `(room, slot)` pairs, one per session key of
    /// `problem`, in session-key order. Teachers come from the mapping.
    pub fn from_placements(
        problem: &ProblemDefinition,
        placements: &[(RoomIdx, SlotIdx)],
    ) -> Result<Self> {
        if placements.len() != problem.total_sessions() {
            return Err(TimetableError::malformed(format!(
                "expected {} placements, got {}",
                problem.total_sessions(),
                placements.len()
            )));
        }
        let sessions = problem
            .session_keys()
            .iter()
            .zip(placements)
            .map(|(&(course, occurrence), &(room, slot))| Session {
                course,
                occurrence,
                teacher: problem.teacher_of(course),
                room,
                slot,
            })
            .collect();
        Self::from_sessions(problem, sessions)
    }

    /// Uniform-random initialization: every session gets a uniformly random
    /// slot and room; the teacher is fixed by the course mapping.
    pub fn random<R: Rng>(problem: &ProblemDefinition, rng: &mut R) -> Self {
        Self::random_biased(problem, 0.0, rng)
    }

    /// Random initialization that draws the slot from the teacher's
    /// preferred set with probability `preference_bias`, when the teacher
    /// has preferences. `preference_bias == 0.0` is uniform.
    pub fn random_biased<R: Rng>(
        problem: &ProblemDefinition,
        preference_bias: f64,
        rng: &mut R,
    ) -> Self {
        let n_slots = problem.slots().len();
        let n_rooms = problem.rooms().len();

        let sessions = problem
            .session_keys()
            .iter()
            .map(|&(course, occurrence)| {
                let teacher = problem.teacher_of(course);
                let preferred = teacher.map(|t| problem.preferred_slots(t)).unwrap_or(&[]);
                let slot = if !preferred.is_empty()
                    && preference_bias > 0.0
                    && rng.random_range(0.0..1.0) < preference_bias
                {
                    preferred[rng.random_range(0..preferred.len())]
                } else {
                    rng.random_range(0..n_slots)
                };
                let room = rng.random_range(0..n_rooms);
                Session {
                    course,
                    occurrence,
                    teacher,
                    room,
                    slot,
                }
            })
            .collect();

        Self { sessions }
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn session(&self, idx: usize) -> &Session {
        &self.sessions[idx]
    }

    pub(crate) fn set_slot(&mut self, idx: usize, slot: SlotIdx) {
        self.sessions[idx].slot = slot;
    }

    pub(crate) fn set_room(&mut self, idx: usize, room: RoomIdx) {
        self.sessions[idx].room = room;
    }

    pub(crate) fn swap_slots(&mut self, a: usize, b: usize) {
        let slot_a = self.sessions[a].slot;
        self.sessions[a].slot = self.sessions[b].slot;
        self.sessions[b].slot = slot_a;
    }

    /// Resolves the schedule into display rows ordered by slot, then course
    /// id, then occurrence.
    pub fn to_table(&self, problem: &ProblemDefinition) -> Vec<TimetableRow> {
        table::build_table(self, problem)
    }
}

/// Checks that `sessions` is a valid schedule body for `problem`.
fn check_sessions(problem: &ProblemDefinition, sessions: &[Session]) -> Result<()> {
    let n_courses = problem.courses().len();
    let n_rooms = problem.rooms().len();
    let n_slots = problem.slots().len();

    // first session index of each course within the session-key order
    let mut offsets = Vec::with_capacity(n_courses);
    let mut next = 0;
    for course in problem.courses() {
        offsets.push(next);
        next += course.sessions;
    }
    let mut seen = vec![false; problem.total_sessions()];

    for session in sessions {
        let course = session.course;
        if course >= n_courses {
            return Err(TimetableError::malformed(format!(
                "session references unknown course index {course}"
            )));
        }
        let course_id = &problem.courses()[course].id;
        if session.occurrence >= problem.sessions_required(course) {
            return Err(TimetableError::malformed(format!(
                "course '{course_id}' has no occurrence {}",
                session.occurrence
            )));
        }
        if session.room >= n_rooms {
            return Err(TimetableError::malformed(format!(
                "session of course '{course_id}' uses unknown room index {}",
                session.room
            )));
        }
        if session.slot >= n_slots {
            return Err(TimetableError::malformed(format!(
                "session of course '{course_id}' uses unknown slot index {}",
                session.slot
            )));
        }
        if session.teacher != problem.teacher_of(course) {
            return Err(TimetableError::malformed(format!(
                "session of course '{course_id}' has teacher {:?}, mapping says {:?}",
                session.teacher,
                problem.teacher_of(course)
            )));
        }
        let key = offsets[course] + session.occurrence;
        if std::mem::replace(&mut seen[key], true) {
            return Err(TimetableError::malformed(format!(
                "course '{course_id}' occurrence {} is scheduled twice",
                session.occurrence
            )));
        }
    }

    if let Some(missing) = seen.iter().position(|&s| !s) {
        let (course, occurrence) = problem.session_keys()[missing];
        return Err(TimetableError::malformed(format!(
            "course '{}' occurrence {occurrence} is not scheduled",
            problem.courses()[course].id
        )));
    }
    Ok(())
}
