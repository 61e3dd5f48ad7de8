//! Local move variants.

use crate::problem::{RoomIdx, SlotIdx};
use crate::schedule::Schedule;

/// Kind of a local move, used for uniform kind selection and statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    ReassignSlot,
    ReassignRoom,
    SwapSlots,
}

impl MoveKind {
    pub const ALL: [MoveKind; 3] = [
        MoveKind::ReassignSlot,
        MoveKind::ReassignRoom,
        MoveKind::SwapSlots,
    ];
}

/// A single localized change to a schedule.
///
/// Each variant changes exactly one session's slot, one session's room,
/// or exchanges the slots of two sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    /// Move `session` to `slot`.
    ReassignSlot { session: usize, slot: SlotIdx },
    /// Move `session` to `room`.
    ReassignRoom { session: usize, room: RoomIdx },
    /// Exchange the slots of two sessions. Rooms stay put.
    SwapSlots { first: usize, second: usize },
}

impl Move {
    pub fn kind(&self) -> MoveKind {
        match self {
            Move::ReassignSlot { .. } => MoveKind::ReassignSlot,
            Move::ReassignRoom { .. } => MoveKind::ReassignRoom,
            Move::SwapSlots { .. } => MoveKind::SwapSlots,
        }
    }

    /// Applies the move in place.
    pub fn apply(&self, schedule: &mut Schedule) {
        match *self {
            Move::ReassignSlot { session, slot } => schedule.set_slot(session, slot),
            Move::ReassignRoom { session, room } => schedule.set_room(session, room),
            Move::SwapSlots { first, second } => schedule.swap_slots(first, second),
        }
    }

    /// The move that undoes this one when applied to the result of
    /// `self.apply(before)`.
    pub fn inverse(&self, before: &Schedule) -> Move {
        match *self {
            Move::ReassignSlot { session, .. } => Move::ReassignSlot {
                session,
                slot: before.session(session).slot,
            },
            Move::ReassignRoom { session, .. } => Move::ReassignRoom {
                session,
                room: before.session(session).room,
            },
            swap @ Move::SwapSlots { .. } => swap,
        }
    }
}
