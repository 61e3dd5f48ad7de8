//! Problem definition.
//!
//! Courses, teachers, rooms, and slots, the course-to-teacher mapping,
//! teacher slot preferences, and the penalty weights. Built once, read-only
//! for the rest of the run.

mod definition;
mod types;

pub use definition::{ProblemBuilder, ProblemDefinition};
pub use types::{Course, CourseIdx, Room, RoomIdx, Slot, SlotIdx, Teacher, TeacherIdx};
