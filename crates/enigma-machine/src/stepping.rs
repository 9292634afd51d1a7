// Stepping: which installed rotors advance on one keypress.
//
// Rotors are indexed left to right, slot 0 being the reflector and the last
// slot the fast rotor. The decision is made from a snapshot of the rotors
// taken before any of them moves, so advancing one rotor never changes how
// another is judged within the same keypress.
//
// The rule reproduces the historical double step:
//
// - the fast rotor always advances;
// - a rotor sitting at one of its notches whose left neighbor can rotate
//   advances together with that neighbor.
//
// A middle rotor that reaches its notch by being carried therefore moves
// again on the very next keypress, taking its left neighbor with it. Each
// rotor advances at most once per keypress.

use crate::rotor::Rotor;

/// Pre-step state of one installed rotor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pawl {
    /// The rotor has a ratchet.
    pub rotates: bool,
    /// The rotor currently sits at a notch.
    pub at_notch: bool,
}

impl Pawl {
    pub fn of(rotor: &Rotor) -> Self {
        Self {
            rotates: rotor.rotates(),
            at_notch: rotor.at_notch(),
        }
    }
}

/// Decide which rotors advance, given their pre-step states ordered left
/// (reflector) to right (fast). The result has one flag per rotor.
///
/// Slot 0 is only ever flagged if its rotor rotates, which a reflector does
/// not; advancing a non-rotating rotor is a no-op in any case.
pub fn advance_mask(pawls: &[Pawl]) -> Vec<bool> {
    let mut advanced = vec![false; pawls.len()];
    let Some(fast) = pawls.len().checked_sub(1) else {
        return advanced;
    };

    for i in (1..pawls.len()).rev() {
        if pawls[i].at_notch && pawls[i - 1].rotates {
            advanced[i] = true;
            advanced[i - 1] = true;
        }
    }
    if fast > 0 {
        advanced[fast] = true;
    }
    advanced
}
