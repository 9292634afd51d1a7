// Configuration text: alphabet, machine shape and rotor catalog.
//
// The text is a stream of whitespace-separated tokens, line breaks carry no
// meaning except for error reporting:
//
//   ALPHABET
//   SLOTS PAWLS
//   NAME TYPE (CYCLE) (CYCLE) ...
//   ...
//
// TYPE is `M` followed by notch symbols, `N` or `R`. A rotor's cycles are the
// tokens after its type that are parenthesized; `(AB)(CD)` counts as one
// token. Parsing and building are separate steps so a configuration can be
// inspected before any machine exists.

use std::str::FromStr;
use std::sync::Arc;

use enigma_core::character::{normalize_symbol, simple_upper};
use enigma_core::{Alphabet, Permutation};
use enigma_machine::{Machine, Rotor, RotorCatalog};
use tracing::debug;

use crate::SessionError;

/// Characters that may not appear in an alphabet.
const RESERVED: [char; 3] = ['(', ')', '*'];

/// Kind of rotor named by a descriptor's TYPE token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RotorType {
    Moving { notches: String },
    Fixed,
    Reflector,
}

/// One rotor as written in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotorDescriptor {
    pub name: String,
    pub rotor_type: RotorType,
    /// Cycle notation of the wiring, tokens joined by single spaces.
    pub cycles: String,
    /// Line on which the descriptor starts.
    pub line: usize,
}

/// A parsed configuration.
#[derive(Debug, Clone)]
pub struct Config {
    alphabet: Arc<Alphabet>,
    slots: usize,
    pawls: usize,
    rotors: Vec<RotorDescriptor>,
}

#[derive(Debug, Clone, Copy)]
struct Token<'a> {
    text: &'a str,
    line: usize,
}

impl Token<'_> {
    fn is_cycles(&self) -> bool {
        self.text.starts_with('(') && self.text.ends_with(')')
    }
}

/// Cursor over the tokens of a configuration text.
struct Tokens<'a> {
    tokens: Vec<Token<'a>>,
    pos: usize,
    last_line: usize,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        let tokens = text
            .lines()
            .enumerate()
            .flat_map(|(i, line)| {
                line.split_whitespace()
                    .map(move |text| Token { text, line: i + 1 })
            })
            .collect();
        Self {
            tokens,
            pos: 0,
            last_line: text.lines().count().max(1),
        }
    }

    fn peek(&self) -> Option<Token<'a>> {
        self.tokens.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<Token<'a>> {
        let token = self.peek()?;
        self.pos += 1;
        Some(token)
    }

    /// Next token, or a "truncated" error naming what was expected.
    fn require(&mut self, what: &str) -> Result<Token<'a>, SessionError> {
        self.bump().ok_or_else(|| SessionError::Config {
            line: self.last_line,
            message: format!("configuration truncated: expected {what}"),
        })
    }
}

fn config_error(line: usize, message: impl Into<String>) -> SessionError {
    SessionError::Config {
        line,
        message: message.into(),
    }
}

fn parse_count(token: Token<'_>, what: &str) -> Result<usize, SessionError> {
    token
        .text
        .parse()
        .map_err(|_| config_error(token.line, format!("expected {what}, found {:?}", token.text)))
}

fn to_upper(text: &str) -> String {
    text.chars().map(simple_upper).collect()
}

impl Config {
    /// Parse configuration text.
    pub fn parse(text: &str) -> Result<Self, SessionError> {
        let mut tokens = Tokens::new(text);

        let alpha = tokens.require("an alphabet")?;
        if let Some(c) = alpha.text.chars().find(|c| RESERVED.contains(c)) {
            return Err(config_error(
                alpha.line,
                format!("alphabet may not contain {c:?}"),
            ));
        }
        let alphabet =
            Alphabet::new(alpha.text).map_err(|e| config_error(alpha.line, e.to_string()))?;

        let slots_token = tokens.require("the number of rotor slots")?;
        let slots = parse_count(slots_token, "the number of rotor slots")?;
        let pawls_token = tokens.require("the number of pawls")?;
        let pawls = parse_count(pawls_token, "the number of pawls")?;
        if slots <= 1 || pawls == 0 || pawls >= slots {
            return Err(config_error(
                pawls_token.line,
                format!("illegal machine shape: {slots} slots with {pawls} pawls"),
            ));
        }

        let mut rotors = Vec::new();
        while let Some(name) = tokens.bump() {
            rotors.push(parse_rotor(name, &mut tokens, &alphabet)?);
        }

        debug!(
            alphabet = %alphabet,
            slots,
            pawls,
            rotors = rotors.len(),
            "configuration parsed"
        );
        Ok(Self {
            alphabet: Arc::new(alphabet),
            slots,
            pawls,
            rotors,
        })
    }

    pub fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }

    /// Number of rotor slots.
    pub fn slots(&self) -> usize {
        self.slots
    }

    /// Number of pawls.
    pub fn pawls(&self) -> usize {
        self.pawls
    }

    /// Rotor descriptors in the order written.
    pub fn rotors(&self) -> &[RotorDescriptor] {
        &self.rotors
    }

    /// Build the rotor catalog and an unconfigured machine.
    ///
    /// Wiring and catalog errors are reported against the line of the
    /// offending descriptor.
    pub fn build(&self) -> Result<Machine, SessionError> {
        let mut catalog = RotorCatalog::new();
        for desc in &self.rotors {
            let rotor = build_rotor(desc, &self.alphabet)
                .map_err(|message| config_error(desc.line, message))?;
            catalog
                .insert(rotor)
                .map_err(|e| config_error(desc.line, e.to_string()))?;
        }
        Ok(Machine::new(
            Arc::clone(&self.alphabet),
            self.slots,
            self.pawls,
            catalog,
        )?)
    }
}

impl FromStr for Config {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn parse_rotor(
    name: Token<'_>,
    tokens: &mut Tokens<'_>,
    alphabet: &Alphabet,
) -> Result<RotorDescriptor, SessionError> {
    if name.text.starts_with('(') {
        return Err(config_error(
            name.line,
            format!("expected a rotor name, found {:?}", name.text),
        ));
    }
    let name_text = to_upper(name.text);
    let kind = tokens.require(&format!("a type for rotor {name_text}"))?;

    let mut chars = kind.text.chars();
    let first = chars.next().map(simple_upper);
    let rest = chars.as_str();
    let rotor_type = match first {
        Some('M') => RotorType::Moving {
            notches: rest
                .chars()
                .map(|c| normalize_symbol(alphabet, c).unwrap_or(c))
                .collect(),
        },
        Some('N') if rest.is_empty() => RotorType::Fixed,
        Some('R') if rest.is_empty() => RotorType::Reflector,
        _ => {
            return Err(config_error(
                kind.line,
                format!("rotor {name_text} has illegal type {:?}", kind.text),
            ));
        }
    };

    let mut cycles = Vec::new();
    while let Some(token) = tokens.peek() {
        if !token.is_cycles() {
            break;
        }
        cycles.push(token.text);
        tokens.bump();
    }

    Ok(RotorDescriptor {
        name: name_text,
        rotor_type,
        cycles: cycles.join(" "),
        line: name.line,
    })
}

fn build_rotor(desc: &RotorDescriptor, alphabet: &Arc<Alphabet>) -> Result<Rotor, String> {
    let perm = Permutation::new(&desc.cycles, Arc::clone(alphabet))
        .map_err(|e| format!("rotor {}: {e}", desc.name))?;
    let rotor = match &desc.rotor_type {
        RotorType::Moving { notches } => Rotor::moving(desc.name.as_str(), perm, notches)
            .map_err(|e| format!("rotor {} notches: {e}", desc.name))?,
        RotorType::Fixed => Rotor::fixed(desc.name.as_str(), perm),
        RotorType::Reflector => {
            if !perm.derangement() {
                return Err(format!("reflector {} has a fixed point", desc.name));
            }
            Rotor::reflector(desc.name.as_str(), perm)
        }
    };
    Ok(rotor)
}
