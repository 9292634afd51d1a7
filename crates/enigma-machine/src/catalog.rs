// Rotor catalog: every rotor a machine may use, indexed by name.
//
// The index is built as rotors are added, so selecting rotors for a setting
// line is a hash lookup per name. The machine refers to catalog entries by
// `RotorId` and never holds references into the catalog.

use hashbrown::HashMap;

use crate::MachineError;
use crate::rotor::Rotor;

/// Handle to a rotor stored in a [`RotorCatalog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RotorId(usize);

impl RotorId {
    /// Position of the rotor in catalog insertion order.
    pub fn index(self) -> usize {
        self.0
    }
}

/// The set of rotors available to a machine.
#[derive(Debug, Clone, Default)]
pub struct RotorCatalog {
    rotors: Vec<Rotor>,
    by_name: HashMap<String, RotorId>,
}

impl RotorCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `rotor`, failing if a rotor with the same name is present.
    pub fn insert(&mut self, rotor: Rotor) -> Result<RotorId, MachineError> {
        if self.by_name.contains_key(rotor.name()) {
            return Err(MachineError::DuplicateRotor(rotor.name().to_string()));
        }
        let id = RotorId(self.rotors.len());
        self.by_name.insert(rotor.name().to_string(), id);
        self.rotors.push(rotor);
        Ok(id)
    }

    /// Handle of the rotor named `name`.
    pub fn lookup(&self, name: &str) -> Option<RotorId> {
        self.by_name.get(name).copied()
    }

    /// The rotor behind `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not returned by this catalog's [`insert`](Self::insert).
    pub fn get(&self, id: RotorId) -> &Rotor {
        &self.rotors[id.0]
    }

    /// Mutable access to the rotor behind `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not returned by this catalog's [`insert`](Self::insert).
    pub fn get_mut(&mut self, id: RotorId) -> &mut Rotor {
        &mut self.rotors[id.0]
    }

    /// Rotor named `name`, if any.
    pub fn by_name(&self, name: &str) -> Option<&Rotor> {
        self.lookup(name).map(|id| self.get(id))
    }

    pub fn len(&self) -> usize {
        self.rotors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rotors.is_empty()
    }

    /// All rotors in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Rotor> {
        self.rotors.iter()
    }
}
