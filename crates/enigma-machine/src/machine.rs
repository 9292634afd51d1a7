// Machine: installed rotors, plugboard, and the per-keypress pipeline.
//
// Configuration calls validate everything before touching state, so a
// rejected call leaves the machine exactly as it was.

use std::sync::Arc;

use enigma_core::{Alphabet, CoreError, Permutation};
use tracing::{debug, trace};

use crate::MachineError;
use crate::catalog::{RotorCatalog, RotorId};
use crate::rotor::Rotor;
use crate::stepping::{self, Pawl};

/// A complete rotor machine.
///
/// Slot 0 holds the reflector and slot `num_rotors() - 1` the fast rotor.
/// Rotors are drawn from the machine's [`RotorCatalog`].
#[derive(Debug, Clone)]
pub struct Machine {
    alphabet: Arc<Alphabet>,
    num_rotors: usize,
    num_pawls: usize,
    catalog: RotorCatalog,
    /// Installed rotors, left to right.
    slots: Vec<RotorId>,
    plugboard: Permutation,
}

impl Machine {
    /// A machine over `alphabet` with `num_rotors` slots (more than one) and
    /// `num_pawls` pawls (at least one, at most `num_rotors`), drawing rotors
    /// from `catalog`.
    pub fn new(
        alphabet: Arc<Alphabet>,
        num_rotors: usize,
        num_pawls: usize,
        catalog: RotorCatalog,
    ) -> Result<Self, MachineError> {
        if num_rotors <= 1 || num_pawls == 0 || num_pawls > num_rotors {
            return Err(MachineError::MachineConfig {
                slots: num_rotors,
                pawls: num_pawls,
            });
        }
        if let Some(rotor) = catalog.iter().find(|r| r.alphabet() != alphabet.as_ref()) {
            return Err(MachineError::BadSetting(format!(
                "{rotor} is wired over a different alphabet"
            )));
        }

        debug!(
            alphabet = %alphabet,
            slots = num_rotors,
            pawls = num_pawls,
            rotors = catalog.len(),
            "machine built"
        );

        let plugboard = Permutation::identity(Arc::clone(&alphabet));
        Ok(Self {
            alphabet,
            num_rotors,
            num_pawls,
            catalog,
            slots: Vec::new(),
            plugboard,
        })
    }

    /// Number of rotor slots.
    pub fn num_rotors(&self) -> usize {
        self.num_rotors
    }

    /// Number of pawls (and thus rotating rotors).
    pub fn num_pawls(&self) -> usize {
        self.num_pawls
    }

    pub fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }

    pub fn catalog(&self) -> &RotorCatalog {
        &self.catalog
    }

    /// Installed rotor in slot `k`, if any.
    pub fn rotor(&self, k: usize) -> Option<&Rotor> {
        self.slots.get(k).map(|&id| self.catalog.get(id))
    }

    /// Installed rotors, left to right.
    pub fn installed(&self) -> impl DoubleEndedIterator<Item = &Rotor> {
        self.slots.iter().map(|&id| self.catalog.get(id))
    }

    /// Current positions of the non-reflector rotors, left to right.
    pub fn window(&self) -> String {
        let symbols = self.alphabet.symbols();
        self.installed()
            .skip(1)
            .map(|r| symbols[r.setting()])
            .collect()
    }

    pub fn plugboard(&self) -> &Permutation {
        &self.plugboard
    }

    /// Install the rotors named `names`, left to right; `names[0]` must name
    /// a reflector. Every installed rotor returns to position 0 with no ring
    /// offset.
    pub fn insert_rotors<S: AsRef<str>>(&mut self, names: &[S]) -> Result<(), MachineError> {
        if names.len() > self.num_rotors {
            return Err(MachineError::TooManyRotors {
                given: names.len(),
                slots: self.num_rotors,
            });
        }

        let mut selected: Vec<RotorId> = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            let id = self
                .catalog
                .lookup(name)
                .ok_or_else(|| MachineError::UnknownRotor(name.to_string()))?;
            if selected.contains(&id) {
                return Err(MachineError::DuplicateRotor(name.to_string()));
            }
            selected.push(id);
        }

        let Some(&first) = selected.first() else {
            return Err(MachineError::NoRotors);
        };
        if !self.catalog.get(first).reflecting() {
            return Err(MachineError::NotAReflector(
                self.catalog.get(first).name().to_string(),
            ));
        }

        for &id in &selected {
            self.catalog.get_mut(id).reset();
        }
        self.slots = selected;
        debug!(rotors = ?self.installed_names(), "rotors installed");
        Ok(())
    }

    /// Set the positions of the non-reflector rotors from `setting`, one
    /// symbol per rotor, left to right.
    pub fn set_rotors(&mut self, setting: &str) -> Result<(), MachineError> {
        let positions = self.parse_per_rotor(setting, "setting")?;
        for (&id, posn) in self.slots[1..].iter().zip(positions) {
            self.catalog.get_mut(id).set(posn);
        }
        debug!(window = %self.window(), "rotor positions set");
        Ok(())
    }

    /// Set the ring offsets of the non-reflector rotors from `ring`, one
    /// symbol per rotor, left to right.
    pub fn ringstellung(&mut self, ring: &str) -> Result<(), MachineError> {
        let rings = self.parse_per_rotor(ring, "ring setting")?;
        for (&id, offset) in self.slots[1..].iter().zip(rings) {
            self.catalog.get_mut(id).set_ring(offset);
        }
        debug!(ring, "ring settings applied");
        Ok(())
    }

    /// Install `plugboard`, which must act on this machine's alphabet.
    pub fn set_plugboard(&mut self, plugboard: Permutation) -> Result<(), MachineError> {
        if plugboard.alphabet().as_ref() != self.alphabet.as_ref() {
            return Err(MachineError::BadSetting(
                "plugboard is wired over a different alphabet".to_string(),
            ));
        }
        debug!(plugboard = %plugboard, "plugboard installed");
        self.plugboard = plugboard;
        Ok(())
    }

    /// Advance the machine one keypress, then convert the symbol index `c`.
    pub fn convert(&mut self, c: usize) -> Result<usize, MachineError> {
        if self.slots.is_empty() {
            return Err(MachineError::NoRotors);
        }
        let size = self.alphabet.size();
        if c >= size {
            return Err(CoreError::OutOfRange { index: c, size }.into());
        }

        self.advance_rotors();
        let plugged = self.plugboard.permute(c);
        let through = self.apply_rotors(plugged);
        let result = self.plugboard.permute(through);

        trace!(
            window = %self.window(),
            input = %self.alphabet.symbols()[c],
            plugged = %self.alphabet.symbols()[plugged],
            rotors = %self.alphabet.symbols()[through],
            output = %self.alphabet.symbols()[result],
            "converted"
        );
        Ok(result)
    }

    /// Convert a single symbol.
    pub fn convert_symbol(&mut self, c: char) -> Result<char, MachineError> {
        let index = self.alphabet.to_int(c)?;
        let out = self.convert(index)?;
        Ok(self.alphabet.to_char(out)?)
    }

    /// Convert every symbol of `msg` in order.
    ///
    /// All symbols are checked before the first keypress, so a message with
    /// a symbol outside the alphabet leaves the rotors untouched.
    pub fn convert_str(&mut self, msg: &str) -> Result<String, MachineError> {
        if self.slots.is_empty() {
            return Err(MachineError::NoRotors);
        }
        let indices = msg
            .chars()
            .map(|c| self.alphabet.to_int(c))
            .collect::<Result<Vec<_>, _>>()?;

        let mut out = String::with_capacity(msg.len());
        for index in indices {
            let converted = self.convert(index)?;
            out.push(self.alphabet.symbols()[converted]);
        }
        Ok(out)
    }

    /// Step the installed rotors for one keypress.
    fn advance_rotors(&mut self) {
        let pawls: Vec<Pawl> = self.installed().map(Pawl::of).collect();
        let mask = stepping::advance_mask(&pawls);
        for (&id, advance) in self.slots.iter().zip(mask) {
            if advance {
                self.catalog.get_mut(id).advance();
            }
        }
    }

    /// Pass `c` right to left through every rotor including the reflector,
    /// then back left to right through all but the reflector.
    fn apply_rotors(&self, c: usize) -> usize {
        let forward = self
            .installed()
            .rev()
            .fold(c, |c, rotor| rotor.convert_forward(c));
        self.installed()
            .skip(1)
            .fold(forward, |c, rotor| rotor.convert_backward(c))
    }

    /// Validate one symbol per non-reflector rotor and return their indices.
    fn parse_per_rotor(&self, text: &str, what: &str) -> Result<Vec<usize>, MachineError> {
        if self.slots.is_empty() {
            return Err(MachineError::NoRotors);
        }
        let expected = self.slots.len() - 1;
        let given = text.chars().count();
        if given != expected {
            return Err(MachineError::BadSetting(format!(
                "{what} {text:?} has {given} symbols, expected {expected}"
            )));
        }
        text.chars()
            .map(|c| {
                self.alphabet.to_int(c).map_err(|_| {
                    MachineError::BadSetting(format!("{what} symbol {c:?} is not in the alphabet"))
                })
            })
            .collect()
    }

    fn installed_names(&self) -> Vec<&str> {
        self.installed().map(Rotor::name).collect()
    }
}
