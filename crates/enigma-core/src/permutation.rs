// Permutation: a bijection over alphabet indices, given in cycle notation.
//
// The cycles are kept for display and introspection, but lookups go through
// two dense tables (forward and inverse) built once at construction.

use std::fmt;
use std::sync::Arc;

use crate::CoreError;
use crate::alphabet::Alphabet;
use crate::character::is_whitespace;

/// A permutation of the indices `0..alphabet.size()`.
///
/// Built from cycle notation such as `"(AELTPHQXRU) (BKNW) (S)"`: each
/// symbol maps to the next symbol of its cycle, the last symbol of a cycle
/// maps back to the first, and symbols that appear in no cycle map to
/// themselves.
///
/// Two permutations are equal when they map every index the same way over
/// equal alphabets, however their cycles were written.
#[derive(Debug, Clone)]
pub struct Permutation {
    alphabet: Arc<Alphabet>,
    /// Cycles as given, as alphabet indices.
    cycles: Vec<Vec<usize>>,
    /// `forward[i]` is the image of `i`.
    forward: Vec<usize>,
    /// `inverse[i]` is the preimage of `i`.
    inverse: Vec<usize>,
}

impl Permutation {
    /// Parse `cycles` (e.g. `"(AB) (CDE)"`) over `alphabet`.
    ///
    /// Whitespace between and inside cycles is ignored, and adjacent cycles
    /// need no separator (`"(AB)(CD)"`). An empty string is the identity.
    ///
    /// Fails with [`CoreError::InvalidCycle`] when a symbol is not in the
    /// alphabet, a symbol appears twice, a cycle is empty (`"()"`),
    /// parentheses are unbalanced, or a symbol appears outside any cycle.
    pub fn new(cycles: &str, alphabet: Arc<Alphabet>) -> Result<Self, CoreError> {
        let parsed = parse_cycles(cycles, &alphabet)?;
        Self::from_cycles(parsed, alphabet)
    }

    /// Build a permutation from cycles already expressed as indices.
    pub fn from_cycles(cycles: Vec<Vec<usize>>, alphabet: Arc<Alphabet>) -> Result<Self, CoreError> {
        let size = alphabet.size();
        let mut forward: Vec<usize> = (0..size).collect();
        let mut inverse: Vec<usize> = (0..size).collect();
        let mut seen = vec![false; size];

        for cycle in &cycles {
            if cycle.is_empty() {
                return Err(CoreError::InvalidCycle("empty cycle".to_string()));
            }
            for &i in cycle {
                if i >= size {
                    return Err(CoreError::InvalidCycle(format!(
                        "index {i} is outside an alphabet of {size} symbols"
                    )));
                }
                if seen[i] {
                    return Err(CoreError::InvalidCycle(format!(
                        "symbol {:?} appears more than once",
                        alphabet.symbols()[i]
                    )));
                }
                seen[i] = true;
            }
            for (k, &from) in cycle.iter().enumerate() {
                let to = cycle[(k + 1) % cycle.len()];
                forward[from] = to;
                inverse[to] = from;
            }
        }

        Ok(Self {
            alphabet,
            cycles,
            forward,
            inverse,
        })
    }

    /// The identity permutation over `alphabet`.
    pub fn identity(alphabet: Arc<Alphabet>) -> Self {
        let size = alphabet.size();
        Self {
            alphabet,
            cycles: Vec::new(),
            forward: (0..size).collect(),
            inverse: (0..size).collect(),
        }
    }

    /// Size of the alphabet this permutation acts on.
    #[inline]
    pub fn size(&self) -> usize {
        self.forward.len()
    }

    /// `p` modulo [`Permutation::size`], always in `0..size()`.
    #[inline]
    pub fn wrap(&self, p: i64) -> usize {
        p.rem_euclid(self.size() as i64) as usize
    }

    /// Image of `p` (taken modulo the alphabet size).
    #[inline]
    pub fn permute(&self, p: usize) -> usize {
        self.forward[p % self.size()]
    }

    /// Preimage of `c` (taken modulo the alphabet size).
    #[inline]
    pub fn invert(&self, c: usize) -> usize {
        self.inverse[c % self.size()]
    }

    /// Apply the permutation to a symbol.
    pub fn permute_symbol(&self, c: char) -> Result<char, CoreError> {
        let i = self.alphabet.to_int(c)?;
        self.alphabet.to_char(self.permute(i))
    }

    /// Apply the inverse permutation to a symbol.
    pub fn invert_symbol(&self, c: char) -> Result<char, CoreError> {
        let i = self.alphabet.to_int(c)?;
        self.alphabet.to_char(self.invert(i))
    }

    /// The alphabet this permutation was built over.
    pub fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }

    /// The cycles this permutation was built from, as indices.
    pub fn cycles(&self) -> &[Vec<usize>] {
        &self.cycles
    }

    /// Returns `true` iff no index maps to itself.
    pub fn derangement(&self) -> bool {
        self.forward.iter().enumerate().all(|(i, &p)| i != p)
    }

    /// Returns `true` iff the permutation is its own inverse, i.e. it is made
    /// of 2-cycles and fixed points only.
    pub fn is_involution(&self) -> bool {
        self.forward == self.inverse
    }
}

impl fmt::Display for Permutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbols = self.alphabet.symbols();
        for (n, cycle) in self.cycles.iter().enumerate() {
            if n > 0 {
                f.write_str(" ")?;
            }
            f.write_str("(")?;
            for &i in cycle {
                write!(f, "{}", symbols[i])?;
            }
            f.write_str(")")?;
        }
        Ok(())
    }
}

impl PartialEq for Permutation {
    fn eq(&self, other: &Self) -> bool {
        self.alphabet == other.alphabet && self.forward == other.forward
    }
}

impl Eq for Permutation {}

/// Split cycle notation into cycles of alphabet indices.
///
/// Duplicate detection is left to [`Permutation::from_cycles`].
fn parse_cycles(text: &str, alphabet: &Alphabet) -> Result<Vec<Vec<usize>>, CoreError> {
    let mut cycles = Vec::new();
    let mut open: Option<Vec<usize>> = None;

    for c in text.chars() {
        match c {
            '(' => {
                if open.is_some() {
                    return Err(CoreError::InvalidCycle("nested '('".to_string()));
                }
                open = Some(Vec::new());
            }
            ')' => {
                let Some(cycle) = open.take() else {
                    return Err(CoreError::InvalidCycle("unmatched ')'".to_string()));
                };
                if cycle.is_empty() {
                    return Err(CoreError::InvalidCycle("empty cycle \"()\"".to_string()));
                }
                cycles.push(cycle);
            }
            c if is_whitespace(c) => {}
            c => {
                let Some(cycle) = open.as_mut() else {
                    return Err(CoreError::InvalidCycle(format!(
                        "symbol {c:?} is outside of any cycle"
                    )));
                };
                let index = alphabet.to_int(c).map_err(|_| {
                    CoreError::InvalidCycle(format!("symbol {c:?} is not in the alphabet"))
                })?;
                cycle.push(index);
            }
        }
    }

    if open.is_some() {
        return Err(CoreError::InvalidCycle("unterminated cycle".to_string()));
    }
    Ok(cycles)
}
