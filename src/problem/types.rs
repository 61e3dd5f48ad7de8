//! Timetabling entities: courses, teachers, rooms, slots.
//!
//! Entities are identified by string ids as they arrive from the loader.
//! Once a [`ProblemDefinition`](super::ProblemDefinition) is built, every
//! entity is addressed by its dense index in the corresponding list.

/// Dense index of a course within the problem definition.
pub type CourseIdx = usize;
/// Dense index of a teacher within the problem definition.
pub type TeacherIdx = usize;
/// Dense index of a room within the problem definition.
pub type RoomIdx = usize;
/// Dense index of a slot within the problem definition.
pub type SlotIdx = usize;

/// A course that must be held a fixed number of times per week.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Course {
    /// Unique course identifier.
    pub id: String,
    /// Required weekly session count. Zero is allowed and yields no sessions.
    pub sessions: usize,
    /// Session length in periods. Carried through to the output table.
    pub duration: u32,
}

impl Course {
    /// Creates a course with a duration of one period.
    pub fn new(id: impl Into<String>, sessions: usize) -> Self {
        Self {
            id: id.into(),
            sessions,
            duration: 1,
        }
    }

    pub fn with_duration(mut self, duration: u32) -> Self {
        self.duration = duration;
        self
    }
}

/// A teacher, optionally with a set of preferred slots.
///
/// An empty preference set means "no preference": such a teacher never
/// incurs the non-preferred-slot penalty.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Teacher {
    /// Unique teacher identifier.
    pub id: String,
    /// Ids of the slots this teacher prefers.
    pub preferred_slots: Vec<String>,
}

impl Teacher {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            preferred_slots: Vec::new(),
        }
    }

    /// Sets the preferred slots by slot id.
    pub fn with_preferred_slots<I, S>(mut self, slots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.preferred_slots = slots.into_iter().map(Into::into).collect();
        self
    }
}

/// A room sessions can be held in.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Room {
    /// Unique room identifier.
    pub id: String,
    /// Free-form type tag (e.g. "lab", "lecture").
    pub kind: Option<String>,
    /// Seat count, if known.
    pub capacity: Option<u32>,
}

impl Room {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: None,
            capacity: None,
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = Some(capacity);
        self
    }
}

/// A teaching period on a given day.
///
/// Slots are totally ordered by `(day, period)`. Two slots on the same day
/// whose periods differ by one are adjacent.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Slot {
    /// Unique slot identifier (e.g. "Mon 09:00-11:00").
    pub id: String,
    /// Day index, 0-based.
    pub day: u32,
    /// Period index within the day, 0-based.
    pub period: u32,
}

impl Slot {
    pub fn new(id: impl Into<String>, day: u32, period: u32) -> Self {
        Self {
            id: id.into(),
            day,
            period,
        }
    }

    /// Sort key: day first, then period.
    pub fn key(&self) -> (u32, u32) {
        (self.day, self.period)
    }
}

impl PartialOrd for Slot {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Slot {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.key()
            .cmp(&other.key())
            .then_with(|| self.id.cmp(&other.id))
    }
}
