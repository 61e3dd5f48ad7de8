//! Random neighbor proposal.

use super::moves::{Move, MoveKind};
use crate::problem::ProblemDefinition;
use crate::schedule::Schedule;
use log::trace;
use rand::Rng;

/// Proposes single-move neighbors of a schedule.
///
/// Each call picks a move kind uniformly among the kinds that can change
/// the schedule, then picks its targets uniformly:
/// - reassign slot: needs at least two slots
/// - reassign room: needs at least two rooms
/// - swap slots: needs two sessions in different slots
///
/// The new slot or room always differs from the current one, so every
/// proposal differs from its input in exactly one place.
#[derive(Debug, Clone, Copy)]
pub struct NeighborGenerator<'a> {
    problem: &'a ProblemDefinition,
}

impl<'a> NeighborGenerator<'a> {
    pub fn new(problem: &'a ProblemDefinition) -> Self {
        Self { problem }
    }

    /// Returns a modified clone of `schedule`; the input is not touched.
    ///
    /// If no move can change the schedule (one slot, one room, every
    /// session in the same slot) the clone is returned unchanged.
    pub fn propose<R: Rng>(&self, schedule: &Schedule, rng: &mut R) -> Schedule {
        self.propose_with_move(schedule, rng).0
    }

    /// Like [`propose`](Self::propose), also returning the applied move.
    pub fn propose_with_move<R: Rng>(
        &self,
        schedule: &Schedule,
        rng: &mut R,
    ) -> (Schedule, Option<Move>) {
        let mut candidate = schedule.clone();
        let mv = self.random_move(schedule, rng);
        if let Some(mv) = mv {
            trace!("proposing {mv:?}");
            mv.apply(&mut candidate);
        }
        (candidate, mv)
    }

    /// Draws a random move applicable to `schedule`.
    pub fn random_move<R: Rng>(&self, schedule: &Schedule, rng: &mut R) -> Option<Move> {
        let mut kinds = [MoveKind::ReassignSlot; 3];
        let mut n_kinds = 0;
        for kind in MoveKind::ALL {
            if self.is_applicable(kind, schedule) {
                kinds[n_kinds] = kind;
                n_kinds += 1;
            }
        }
        if n_kinds == 0 {
            return None;
        }

        let n_slots = self.problem.slots().len();
        let n_rooms = self.problem.rooms().len();

        let mv = match kinds[rng.random_range(0..n_kinds)] {
            MoveKind::ReassignSlot => {
                let session = rng.random_range(0..schedule.len());
                let slot = pick_other(schedule.session(session).slot, n_slots, rng);
                Move::ReassignSlot { session, slot }
            }
            MoveKind::ReassignRoom => {
                let session = rng.random_range(0..schedule.len());
                let room = pick_other(schedule.session(session).room, n_rooms, rng);
                Move::ReassignRoom { session, room }
            }
            MoveKind::SwapSlots => {
                let first = rng.random_range(0..schedule.len());
                let slot = schedule.session(first).slot;
                // Non-empty: some session sits in another slot, otherwise
                // the kind would not be applicable.
                let others: Vec<usize> = schedule
                    .sessions()
                    .iter()
                    .enumerate()
                    .filter(|(_, s)| s.slot != slot)
                    .map(|(i, _)| i)
                    .collect();
                let second = others[rng.random_range(0..others.len())];
                Move::SwapSlots { first, second }
            }
        };
        Some(mv)
    }

    /// Whether a move of `kind` can change `schedule`.
    pub fn is_applicable(&self, kind: MoveKind, schedule: &Schedule) -> bool {
        if schedule.is_empty() {
            return false;
        }
        match kind {
            MoveKind::ReassignSlot => self.problem.slots().len() > 1,
            MoveKind::ReassignRoom => self.problem.rooms().len() > 1,
            MoveKind::SwapSlots => {
                let first = schedule.session(0).slot;
                schedule.sessions().iter().any(|s| s.slot != first)
            }
        }
    }
}

/// Uniform draw from `0..n` excluding `current`. Requires `n >= 2`.
fn pick_other<R: Rng>(current: usize, n: usize, rng: &mut R) -> usize {
    let v = rng.random_range(0..n - 1);
    if v >= current {
        v + 1
    } else {
        v
    }
}
