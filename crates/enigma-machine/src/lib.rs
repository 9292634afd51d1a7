//! Rotor cipher machine engine.
//!
//! This crate turns the permutations of `enigma-core` into a working
//! machine: rotors with rotational and ring offsets, a catalog of available
//! rotors indexed by name, the per-keypress stepping rule (including the
//! historical double step), and the full conversion pipeline
//! `plugboard -> rotors -> reflector -> rotors -> plugboard`.
//!
//! # Architecture
//!
//! - [`rotor`] -- A rotor: wiring, kind (reflector, fixed, moving), offsets
//! - [`catalog`] -- Name-indexed set of available rotors
//! - [`stepping`] -- Which rotors advance on a keypress
//! - [`machine`] -- Slot assignment, plugboard and conversion
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use enigma_core::{Alphabet, Permutation};
//! use enigma_machine::{Machine, Rotor, RotorCatalog};
//!
//! let alpha = Arc::new(Alphabet::default());
//! let perm = |cycles: &str| Permutation::new(cycles, Arc::clone(&alpha)).unwrap();
//!
//! let mut catalog = RotorCatalog::new();
//! catalog.insert(Rotor::reflector("B", perm(
//!     "(AE) (BN) (CK) (DQ) (FU) (GY) (HW) (IJ) (LO) (MP) (RX) (SZ) (TV)",
//! ))).unwrap();
//! catalog.insert(Rotor::moving("I", perm(
//!     "(AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)",
//! ), "Q").unwrap()).unwrap();
//! catalog.insert(Rotor::moving("III", perm(
//!     "(ABDHPEJT) (CFLVMZOYQIRWUKXSG) (N)",
//! ), "V").unwrap()).unwrap();
//!
//! let mut machine = Machine::new(Arc::clone(&alpha), 3, 2, catalog).unwrap();
//! machine.insert_rotors(&["B", "I", "III"]).unwrap();
//! machine.set_rotors("AA").unwrap();
//!
//! let ciphertext = machine.convert_str("HELLO").unwrap();
//!
//! machine.set_rotors("AA").unwrap();
//! assert_eq!(machine.convert_str(&ciphertext).unwrap(), "HELLO");
//! ```

pub mod catalog;
pub mod machine;
pub mod rotor;
pub mod stepping;

pub use catalog::{RotorCatalog, RotorId};
pub use machine::Machine;
pub use rotor::{Rotor, RotorKind};

use enigma_core::CoreError;

/// Error type for rotor and machine configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MachineError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("illegal machine shape: {slots} slots with {pawls} pawls")]
    MachineConfig { slots: usize, pawls: usize },
    #[error("unknown rotor {0:?}")]
    UnknownRotor(String),
    #[error("rotor {0:?} is named more than once")]
    DuplicateRotor(String),
    #[error("{given} rotors given for a machine with {slots} slots")]
    TooManyRotors { given: usize, slots: usize },
    #[error("first rotor {0:?} is not a reflector")]
    NotAReflector(String),
    #[error("bad setting: {0}")]
    BadSetting(String),
    #[error("no rotors are installed")]
    NoRotors,
}
