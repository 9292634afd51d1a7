// Alphabet: ordered symbol set with symbol <-> index mapping.

use std::fmt;

use hashbrown::HashMap;

use crate::CoreError;

/// The standard 26-letter upper-case alphabet.
pub const UPPER_LATIN: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// An ordered set of encodable symbols.
///
/// The K-th symbol has index K (numbering from 0). Every other component
/// works on these dense indices; symbols only appear at the edges.
#[derive(Debug, Clone)]
pub struct Alphabet {
    /// Maps index to symbol.
    symbols: Vec<char>,
    /// Maps symbol to index.
    index: HashMap<char, usize>,
}

impl Alphabet {
    /// Build an alphabet from the characters of `chars`, in order.
    ///
    /// Fails with [`CoreError::InvalidAlphabet`] when `chars` is empty or
    /// contains the same character twice.
    pub fn new(chars: &str) -> Result<Self, CoreError> {
        let symbols: Vec<char> = chars.chars().collect();
        if symbols.is_empty() {
            return Err(CoreError::InvalidAlphabet("alphabet is empty".to_string()));
        }

        let mut index = HashMap::with_capacity(symbols.len());
        for (i, &c) in symbols.iter().enumerate() {
            if index.insert(c, i).is_some() {
                return Err(CoreError::InvalidAlphabet(format!(
                    "symbol {c:?} appears more than once"
                )));
            }
        }

        Ok(Self { symbols, index })
    }

    /// Number of symbols.
    #[inline]
    pub fn size(&self) -> usize {
        self.symbols.len()
    }

    /// Returns `true` if `c` is one of the alphabet's symbols.
    #[inline]
    pub fn contains(&self, c: char) -> bool {
        self.index.contains_key(&c)
    }

    /// Symbol at `index`.
    pub fn to_char(&self, index: usize) -> Result<char, CoreError> {
        self.symbols.get(index).copied().ok_or(CoreError::OutOfRange {
            index,
            size: self.size(),
        })
    }

    /// Index of symbol `c`. This is the inverse of [`Alphabet::to_char`].
    pub fn to_int(&self, c: char) -> Result<usize, CoreError> {
        self.index.get(&c).copied().ok_or(CoreError::UnknownSymbol(c))
    }

    /// The symbols in index order.
    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        let symbols: Vec<char> = UPPER_LATIN.chars().collect();
        let index = symbols.iter().enumerate().map(|(i, &c)| (c, i)).collect();
        Self { symbols, index }
    }
}

impl PartialEq for Alphabet {
    fn eq(&self, other: &Self) -> bool {
        self.symbols == other.symbols
    }
}

impl Eq for Alphabet {}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in &self.symbols {
            write!(f, "{c}")?;
        }
        Ok(())
    }
}
