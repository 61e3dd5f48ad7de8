//! Neighbor generation.
//!
//! A closed set of local moves ([`Move`]) and a generator that draws one
//! uniformly at random and applies it to a clone of the current schedule.

mod generator;
mod moves;

pub use generator::NeighborGenerator;
pub use moves::{Move, MoveKind};
