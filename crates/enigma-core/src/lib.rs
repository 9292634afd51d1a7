//! Symbol-level building blocks for rotor cipher machines.
//!
//! This crate holds the parts of the simulator that know nothing about
//! rotors or stepping: the ordered symbol set a machine encodes over and
//! the cycle-notation permutations that describe rotor wirings, reflectors
//! and plugboards.
//!
//! # Architecture
//!
//! - [`alphabet`] -- Ordered, duplicate-free symbol set (symbol <-> index)
//! - [`permutation`] -- Bijections over alphabet indices in cycle notation
//! - [`character`] -- Whitespace and case helpers used when feeding text in
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use enigma_core::{Alphabet, Permutation};
//!
//! let alphabet = Arc::new(Alphabet::new("ABCD").unwrap());
//! let perm = Permutation::new("(BACD)", Arc::clone(&alphabet)).unwrap();
//!
//! assert_eq!(perm.permute_symbol('A').unwrap(), 'C');
//! assert_eq!(perm.invert_symbol('A').unwrap(), 'B');
//! assert!(perm.derangement());
//! ```

pub mod alphabet;
pub mod character;
pub mod permutation;

pub use alphabet::Alphabet;
pub use permutation::Permutation;

/// Error type for alphabet and permutation construction and lookup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error("invalid alphabet: {0}")]
    InvalidAlphabet(String),
    #[error("index {index} is out of range for an alphabet of {size} symbols")]
    OutOfRange { index: usize, size: usize },
    #[error("symbol {0:?} is not in the alphabet")]
    UnknownSymbol(char),
    #[error("invalid cycle notation: {0}")]
    InvalidCycle(String),
}
