//! Validated, read-only problem definition.
//!
//! [`ProblemBuilder`] collects entities by id; [`ProblemBuilder::build`]
//! checks structural integrity and resolves every id to a dense index.
//! Detects:
//! - No rooms, no slots, or no course with a positive session count
//! - Duplicate ids within an entity kind
//! - Preferences naming an undeclared slot
//! - Mappings naming an undeclared course, or mapping a course twice
//!
//! A mapping to an undeclared teacher is tolerated: the course is left
//! unmapped and every one of its sessions is penalized as missing a teacher.

use super::types::{Course, CourseIdx, Room, RoomIdx, Slot, SlotIdx, Teacher, TeacherIdx};
use crate::cost::CostWeights;
use crate::error::{Result, TimetableError};
use log::warn;
use std::collections::HashMap;

/// Immutable description of a timetabling problem.
///
/// # Examples
///
/// ```
/// use u_timetable::problem::{Course, ProblemDefinition, Room, Slot, Teacher};
///
/// let problem = ProblemDefinition::builder()
///     .with_course(Course::new("Algebra", 2))
///     .with_teacher(Teacher::new("Smith"))
///     .with_room(Room::new("R1"))
///     .with_slot(Slot::new("Mon-0", 0, 0))
///     .with_slot(Slot::new("Mon-1", 0, 1))
///     .with_assignment("Algebra", "Smith")
///     .build()
///     .unwrap();
///
/// assert_eq!(problem.total_sessions(), 2);
/// assert_eq!(problem.teacher_of(0), Some(0));
/// ```
#[derive(Debug, Clone)]
pub struct ProblemDefinition {
    courses: Vec<Course>,
    teachers: Vec<Teacher>,
    rooms: Vec<Room>,
    slots: Vec<Slot>,
    course_teacher: Vec<Option<TeacherIdx>>,
    /// Sorted, deduplicated preferred slot indices per teacher.
    preferred: Vec<Vec<SlotIdx>>,
    /// `(course, occurrence)` for every required session, in course order.
    session_keys: Vec<(CourseIdx, usize)>,
    course_ids: HashMap<String, CourseIdx>,
    teacher_ids: HashMap<String, TeacherIdx>,
    room_ids: HashMap<String, RoomIdx>,
    slot_ids: HashMap<String, SlotIdx>,
    weights: CostWeights,
}

impl ProblemDefinition {
    /// Starts an empty builder.
    pub fn builder() -> ProblemBuilder {
        ProblemBuilder::default()
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn teachers(&self) -> &[Teacher] {
        &self.teachers
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn weights(&self) -> &CostWeights {
        &self.weights
    }

    /// Number of sessions the course must be held.
    pub fn sessions_required(&self, course: CourseIdx) -> usize {
        self.courses[course].sessions
    }

    /// The teacher mapped to `course`, or `None` if the mapping is missing.
    pub fn teacher_of(&self, course: CourseIdx) -> Option<TeacherIdx> {
        self.course_teacher[course]
    }

    /// Preferred slots of `teacher`, sorted. Empty means no preference.
    pub fn preferred_slots(&self, teacher: TeacherIdx) -> &[SlotIdx] {
        &self.preferred[teacher]
    }

    /// Whether `teacher` has stated any slot preference.
    pub fn has_preferences(&self, teacher: TeacherIdx) -> bool {
        !self.preferred[teacher].is_empty()
    }

    /// Whether `slot` is among the preferred slots of `teacher`.
    pub fn is_preferred(&self, teacher: TeacherIdx, slot: SlotIdx) -> bool {
        self.preferred[teacher].binary_search(&slot).is_ok()
    }

    /// Total number of sessions across all courses.
    pub fn total_sessions(&self) -> usize {
        self.session_keys.len()
    }

    /// `(course, occurrence)` pairs, one per required session.
    pub fn session_keys(&self) -> &[(CourseIdx, usize)] {
        &self.session_keys
    }

    pub fn course_index(&self, id: &str) -> Option<CourseIdx> {
        self.course_ids.get(id).copied()
    }

    pub fn teacher_index(&self, id: &str) -> Option<TeacherIdx> {
        self.teacher_ids.get(id).copied()
    }

    pub fn room_index(&self, id: &str) -> Option<RoomIdx> {
        self.room_ids.get(id).copied()
    }

    pub fn slot_index(&self, id: &str) -> Option<SlotIdx> {
        self.slot_ids.get(id).copied()
    }

    /// Returns a copy with different penalty weights.
    pub fn with_weights(mut self, weights: CostWeights) -> Result<Self> {
        weights.validate()?;
        self.weights = weights;
        Ok(self)
    }
}

/// Collects entities and mappings for a [`ProblemDefinition`].
#[derive(Debug, Clone, Default)]
pub struct ProblemBuilder {
    courses: Vec<Course>,
    teachers: Vec<Teacher>,
    rooms: Vec<Room>,
    slots: Vec<Slot>,
    assignments: Vec<(String, String)>,
    weights: CostWeights,
}

impl ProblemBuilder {
    pub fn with_course(mut self, course: Course) -> Self {
        self.courses.push(course);
        self
    }

    pub fn with_courses(mut self, courses: impl IntoIterator<Item = Course>) -> Self {
        self.courses.extend(courses);
        self
    }

    pub fn with_teacher(mut self, teacher: Teacher) -> Self {
        self.teachers.push(teacher);
        self
    }

    pub fn with_teachers(mut self, teachers: impl IntoIterator<Item = Teacher>) -> Self {
        self.teachers.extend(teachers);
        self
    }

    pub fn with_room(mut self, room: Room) -> Self {
        self.rooms.push(room);
        self
    }

    pub fn with_rooms(mut self, rooms: impl IntoIterator<Item = Room>) -> Self {
        self.rooms.extend(rooms);
        self
    }

    pub fn with_slot(mut self, slot: Slot) -> Self {
        self.slots.push(slot);
        self
    }

    pub fn with_slots(mut self, slots: impl IntoIterator<Item = Slot>) -> Self {
        self.slots.extend(slots);
        self
    }

    /// Maps a course to the teacher who delivers it.
    pub fn with_assignment(
        mut self,
        course: impl Into<String>,
        teacher: impl Into<String>,
    ) -> Self {
        self.assignments.push((course.into(), teacher.into()));
        self
    }

    pub fn with_weights(mut self, weights: CostWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Validates the collected input and freezes it.
    pub fn build(self) -> Result<ProblemDefinition> {
        self.weights.validate()?;

        if self.rooms.is_empty() {
            return Err(TimetableError::malformed("at least one room is required"));
        }
        if self.slots.is_empty() {
            return Err(TimetableError::malformed("at least one slot is required"));
        }
        if !self.courses.iter().any(|c| c.sessions > 0) {
            return Err(TimetableError::malformed(
                "at least one course with a positive session count is required",
            ));
        }

        let course_ids = index_ids("course", self.courses.iter().map(|c| c.id.as_str()))?;
        let teacher_ids = index_ids("teacher", self.teachers.iter().map(|t| t.id.as_str()))?;
        let room_ids = index_ids("room", self.rooms.iter().map(|r| r.id.as_str()))?;
        let slot_ids = index_ids("slot", self.slots.iter().map(|s| s.id.as_str()))?;

        let mut preferred = Vec::with_capacity(self.teachers.len());
        for teacher in &self.teachers {
            let mut resolved = Vec::with_capacity(teacher.preferred_slots.len());
            for slot in &teacher.preferred_slots {
                match slot_ids.get(slot) {
                    Some(&idx) => resolved.push(idx),
                    None => {
                        return Err(TimetableError::malformed(format!(
                            "teacher '{}' prefers unknown slot '{}'",
                            teacher.id, slot
                        )))
                    }
                }
            }
            resolved.sort_unstable();
            resolved.dedup();
            preferred.push(resolved);
        }

        let mut course_teacher: Vec<Option<TeacherIdx>> = vec![None; self.courses.len()];
        let mut mapped = vec![false; self.courses.len()];
        for (course, teacher) in &self.assignments {
            let Some(&c) = course_ids.get(course) else {
                return Err(TimetableError::malformed(format!(
                    "assignment references unknown course '{course}'"
                )));
            };
            let t = teacher_ids.get(teacher).copied();
            if mapped[c] && course_teacher[c] != t {
                return Err(TimetableError::malformed(format!(
                    "course '{course}' is assigned to more than one teacher"
                )));
            }
            if t.is_none() {
                warn!(
                    "course '{course}' maps to undeclared teacher '{teacher}'; treating as unmapped"
                );
            }
            mapped[c] = true;
            course_teacher[c] = t;
        }

        let session_keys = self
            .courses
            .iter()
            .enumerate()
            .flat_map(|(c, course)| (0..course.sessions).map(move |k| (c, k)))
            .collect();

        Ok(ProblemDefinition {
            courses: self.courses,
            teachers: self.teachers,
            rooms: self.rooms,
            slots: self.slots,
            course_teacher,
            preferred,
            session_keys,
            course_ids,
            teacher_ids,
            room_ids,
            slot_ids,
            weights: self.weights,
        })
    }
}

fn index_ids<'a>(
    kind: &str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<HashMap<String, usize>> {
    let mut map = HashMap::new();
    for (idx, id) in ids.enumerate() {
        if map.insert(id.to_string(), idx).is_some() {
            return Err(TimetableError::malformed(format!("duplicate {kind} id: {id}")));
        }
    }
    Ok(map)
}
