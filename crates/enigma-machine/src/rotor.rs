// Rotor: one wired wheel of the machine.
//
// Kinds form a closed set, so behavior that differs between reflectors,
// fixed rotors and moving rotors is a match on `RotorKind` rather than a
// trait object.

use std::fmt;

use enigma_core::{Alphabet, CoreError, Permutation};

/// The three kinds of rotor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RotorKind {
    /// Sits in slot 0, turns the signal around, never moves.
    Reflector,
    /// Has no ratchet; never moves.
    Fixed,
    /// Advances when stepped. `notches` holds the alphabet indices of the
    /// positions at which it lets its left neighbor advance.
    Moving { notches: Vec<usize> },
}

/// A rotor: a named wiring plus its current position and ring offset.
///
/// The wiring is the permutation implemented at position 0 with no ring
/// offset. `setting` is the symbol index showing in the window; the ring
/// setting shifts the wiring relative to that indicator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rotor {
    name: String,
    kind: RotorKind,
    permutation: Permutation,
    setting: usize,
    ring: usize,
}

impl Rotor {
    /// A reflector named `name` with wiring `permutation`.
    pub fn reflector(name: impl Into<String>, permutation: Permutation) -> Self {
        Self::with_kind(name, RotorKind::Reflector, permutation)
    }

    /// A non-moving rotor named `name` with wiring `permutation`.
    pub fn fixed(name: impl Into<String>, permutation: Permutation) -> Self {
        Self::with_kind(name, RotorKind::Fixed, permutation)
    }

    /// A moving rotor named `name` whose notches sit at the symbols in
    /// `notches`. Fails if a notch symbol is not in the wiring's alphabet.
    pub fn moving(
        name: impl Into<String>,
        permutation: Permutation,
        notches: &str,
    ) -> Result<Self, CoreError> {
        let alphabet = permutation.alphabet();
        let notches = notches
            .chars()
            .map(|c| alphabet.to_int(c))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::with_kind(name, RotorKind::Moving { notches }, permutation))
    }

    fn with_kind(name: impl Into<String>, kind: RotorKind, permutation: Permutation) -> Self {
        Self {
            name: name.into(),
            kind,
            permutation,
            setting: 0,
            ring: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &RotorKind {
        &self.kind
    }

    pub fn alphabet(&self) -> &Alphabet {
        self.permutation.alphabet()
    }

    /// The wiring at position 0.
    pub fn permutation(&self) -> &Permutation {
        &self.permutation
    }

    pub fn size(&self) -> usize {
        self.permutation.size()
    }

    /// Returns `true` iff this rotor has a ratchet and can move.
    pub fn rotates(&self) -> bool {
        matches!(self.kind, RotorKind::Moving { .. })
    }

    /// Returns `true` iff this rotor is a reflector.
    pub fn reflecting(&self) -> bool {
        matches!(self.kind, RotorKind::Reflector)
    }

    /// Current position as an alphabet index.
    pub fn setting(&self) -> usize {
        self.setting
    }

    /// Current ring offset as an alphabet index.
    pub fn ring_setting(&self) -> usize {
        self.ring
    }

    /// Set the position to `posn`, wrapped into the alphabet.
    pub fn set(&mut self, posn: usize) {
        self.setting = posn % self.size();
    }

    /// Set the position to the symbol `cposn`.
    pub fn set_symbol(&mut self, cposn: char) -> Result<(), CoreError> {
        self.setting = self.alphabet().to_int(cposn)?;
        Ok(())
    }

    /// Set the ring offset to the index of the symbol `ring`.
    pub fn set_ring_setting(&mut self, ring: char) -> Result<(), CoreError> {
        self.ring = self.alphabet().to_int(ring)?;
        Ok(())
    }

    /// Set the ring offset to `ring`, wrapped into the alphabet.
    pub fn set_ring(&mut self, ring: usize) {
        self.ring = ring % self.size();
    }

    /// Return to position 0 with no ring offset.
    pub fn reset(&mut self) {
        self.setting = 0;
        self.ring = 0;
    }

    /// Net rotation of the wiring relative to the fixed contacts.
    #[inline]
    fn offset(&self) -> i64 {
        self.setting as i64 - self.ring as i64
    }

    /// Pass the contact index `p` through the wiring, right to left.
    pub fn convert_forward(&self, p: usize) -> usize {
        let d = self.offset();
        let entry = self.permutation.wrap(p as i64 + d);
        self.permutation
            .wrap(self.permutation.permute(entry) as i64 - d)
    }

    /// Pass the contact index `e` back through the wiring, left to right.
    pub fn convert_backward(&self, e: usize) -> usize {
        let d = self.offset();
        let entry = self.permutation.wrap(e as i64 + d);
        self.permutation
            .wrap(self.permutation.invert(entry) as i64 - d)
    }

    /// The notch positions as symbols; empty for non-moving rotors.
    pub fn notches(&self) -> String {
        match &self.kind {
            RotorKind::Moving { notches } => notches
                .iter()
                .map(|&i| self.alphabet().symbols()[i])
                .collect(),
            RotorKind::Reflector | RotorKind::Fixed => String::new(),
        }
    }

    /// Returns `true` iff the current position lets the left neighbor
    /// advance.
    pub fn at_notch(&self) -> bool {
        match &self.kind {
            RotorKind::Moving { notches } => notches.contains(&self.setting),
            RotorKind::Reflector | RotorKind::Fixed => false,
        }
    }

    /// Advance one position. Does nothing unless the rotor is moving.
    pub fn advance(&mut self) {
        if self.rotates() {
            self.setting = self.permutation.wrap(self.setting as i64 + 1);
        }
    }
}

impl fmt::Display for Rotor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rotor {}", self.name)
    }
}
