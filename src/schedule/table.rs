//! Flat, id-resolved view of a schedule for export.

use super::Schedule;
use crate::problem::ProblemDefinition;

/// One row of the exported timetable.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimetableRow {
    pub course: String,
    pub occurrence: usize,
    /// `None` when the course has no teacher mapping.
    pub teacher: Option<String>,
    pub room: String,
    pub slot: String,
    pub day: u32,
    pub period: u32,
    pub duration: u32,
}

pub(super) fn build_table(schedule: &Schedule, problem: &ProblemDefinition) -> Vec<TimetableRow> {
    let mut rows: Vec<TimetableRow> = schedule
        .sessions()
        .iter()
        .map(|s| {
            let course = &problem.courses()[s.course];
            let slot = &problem.slots()[s.slot];
            TimetableRow {
                course: course.id.clone(),
                occurrence: s.occurrence,
                teacher: s.teacher.map(|t| problem.teachers()[t].id.clone()),
                room: problem.rooms()[s.room].id.clone(),
                slot: slot.id.clone(),
                day: slot.day,
                period: slot.period,
                duration: course.duration,
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        (a.day, a.period, &a.course, a.occurrence).cmp(&(b.day, b.period, &b.course, b.occurrence))
    });
    rows
}
