//! Course timetabling by simulated annealing.
//!
//! Assigns every session of every course to a room and a time slot, with
//! the teacher fixed by the course mapping, so that double-bookings are
//! eliminated and teacher preferences are respected as far as possible.
//!
//! - **Problem**: immutable courses, teachers, rooms, slots, mapping,
//!   preferences, and penalty weights ([`problem`]).
//! - **Schedule**: one session per required course occurrence; conflicts
//!   are representable so the search can cross infeasible states
//!   ([`schedule`]).
//! - **Cost**: hard penalties (double-booking, missing teacher) and soft
//!   penalties (preferences, back-to-back, gaps, overload) ([`cost`]).
//! - **Neighbor**: reassign-slot, reassign-room, and swap-slots moves
//!   ([`neighbor`]).
//! - **Anneal**: the Metropolis control loop, progress samples, and
//!   independent restarts ([`anneal`]).
//!
//! # Architecture
//!
//! Loading input, rendering progress, and exporting documents are left to
//! consumers: the crate takes a built [`problem::ProblemDefinition`] and
//! returns the best [`schedule::Schedule`], its [`cost::CostBreakdown`],
//! and a stream of [`anneal::ProgressSample`]s.

pub mod anneal;
pub mod cost;
mod error;
pub mod neighbor;
pub mod problem;
pub mod random;
pub mod schedule;

pub use error::{Result, TimetableError};
