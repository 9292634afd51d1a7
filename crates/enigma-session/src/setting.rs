// Setting lines: `* REFLECTOR ROTOR... POSITIONS [RINGS] [(XY) ...]`.
//
// A setting line names exactly one rotor per slot, then gives one position
// symbol per non-reflector rotor, optionally one ring symbol per
// non-reflector rotor, and finally the plugboard as disjoint pairs. The
// plugboard is rebuilt from every setting line; a line without pairs leaves
// the plugboard empty.
//
// Everything that can be checked without touching the machine is checked
// in `Setting::parse`, so `Setting::apply` only fails on rotor selection.

use std::sync::Arc;

use enigma_core::character::{normalize_symbol, simple_upper};
use enigma_core::{Alphabet, Permutation};
use enigma_machine::{Machine, RotorCatalog, RotorKind};
use tracing::debug;

use crate::SessionError;

/// A parsed setting line.
#[derive(Debug, Clone)]
pub struct Setting {
    rotors: Vec<String>,
    positions: String,
    rings: Option<String>,
    plugboard: Permutation,
}

fn setting_error(message: impl Into<String>) -> SessionError {
    SessionError::Setting {
        message: message.into(),
    }
}

/// Returns `true` iff `line` is a setting line rather than a message.
pub fn is_setting_line(line: &str) -> bool {
    line.trim_start().starts_with('*')
}

/// Fold each character of `text` onto `alphabet` where possible.
fn normalize(alphabet: &Alphabet, text: &str) -> String {
    text.chars()
        .map(|c| normalize_symbol(alphabet, c).unwrap_or(c))
        .collect()
}

/// Check that `text` holds exactly `expected` alphabet symbols.
fn check_symbols(
    alphabet: &Alphabet,
    text: &str,
    expected: usize,
    what: &str,
) -> Result<(), SessionError> {
    let given = text.chars().count();
    if given != expected {
        return Err(setting_error(format!(
            "{what} {text:?} has {given} symbols, expected {expected}"
        )));
    }
    if let Some(c) = text.chars().find(|&c| !alphabet.contains(c)) {
        return Err(setting_error(format!(
            "{what} symbol {c:?} is not in the alphabet"
        )));
    }
    Ok(())
}

/// Parse plugboard pairs. Every cycle must be a pair of distinct symbols
/// and no symbol may be plugged twice.
fn parse_plugboard(text: &str, alphabet: &Arc<Alphabet>) -> Result<Permutation, SessionError> {
    let plugboard = Permutation::new(&normalize(alphabet, text), Arc::clone(alphabet))
        .map_err(|e| setting_error(format!("plugboard: {e}")))?;
    let symbols = alphabet.symbols();
    if let Some(cycle) = plugboard.cycles().iter().find(|c| c.len() < 2) {
        return Err(setting_error(format!(
            "plugboard: ({}) plugs a symbol to itself",
            symbols[cycle[0]]
        )));
    }
    if !plugboard.is_involution() {
        return Err(setting_error(format!(
            "plugboard: {plugboard} is not a set of pairs"
        )));
    }
    Ok(plugboard)
}

/// Check the rotor placement rule for a machine with `pawls` pawls.
///
/// The rightmost `pawls` slots must hold moving rotors and the slots
/// between the reflector and them must hold fixed rotors. Names missing
/// from `catalog` are skipped.
pub fn check_placement(
    catalog: &RotorCatalog,
    names: &[String],
    pawls: usize,
) -> Result<(), SessionError> {
    let first_moving = names.len().saturating_sub(pawls);
    for (slot, name) in names.iter().enumerate().skip(1) {
        let Some(rotor) = catalog.by_name(name) else {
            continue;
        };
        let misplaced = match rotor.kind() {
            RotorKind::Reflector => true,
            RotorKind::Fixed => slot >= first_moving,
            RotorKind::Moving { .. } => slot < first_moving,
        };
        if misplaced {
            return Err(SessionError::MisplacedRotor {
                slot,
                name: name.clone(),
            });
        }
    }
    Ok(())
}

impl Setting {
    /// Parse `line` for `machine`'s slot count and alphabet.
    ///
    /// Rotor names are folded to upper case; position, ring and plugboard
    /// symbols are folded onto the alphabet.
    pub fn parse(line: &str, machine: &Machine) -> Result<Self, SessionError> {
        let Some(body) = line.trim_start().strip_prefix('*') else {
            return Err(setting_error("setting lines start with '*'"));
        };
        let alphabet = machine.alphabet();
        let slots = machine.num_rotors();

        let tokens: Vec<&str> = body.split_whitespace().collect();
        if tokens.len() <= slots {
            return Err(setting_error(format!(
                "expected {slots} rotor names and the rotor positions, found {} tokens",
                tokens.len()
            )));
        }
        let (names, rest) = tokens.split_at(slots);
        let rotors: Vec<String> = names
            .iter()
            .map(|name| name.chars().map(simple_upper).collect())
            .collect();

        let positions = normalize(alphabet, rest[0]);
        check_symbols(alphabet, &positions, slots - 1, "positions")?;

        let mut rest = &rest[1..];
        let rings = match rest.first() {
            Some(token) if !token.starts_with('(') => {
                let rings = normalize(alphabet, token);
                check_symbols(alphabet, &rings, slots - 1, "ring setting")?;
                rest = &rest[1..];
                Some(rings)
            }
            _ => None,
        };

        let plugboard = parse_plugboard(&rest.join(" "), alphabet)?;

        Ok(Self {
            rotors,
            positions,
            rings,
            plugboard,
        })
    }

    /// Rotor names, reflector first.
    pub fn rotors(&self) -> &[String] {
        &self.rotors
    }

    pub fn positions(&self) -> &str {
        &self.positions
    }

    pub fn rings(&self) -> Option<&str> {
        self.rings.as_deref()
    }

    pub fn plugboard(&self) -> &Permutation {
        &self.plugboard
    }

    /// Configure `machine`: placement check, rotors, positions, rings and
    /// plugboard, in that order. On error the machine is unchanged.
    pub fn apply(&self, machine: &mut Machine) -> Result<(), SessionError> {
        check_placement(machine.catalog(), &self.rotors, machine.num_pawls())?;
        machine.insert_rotors(&self.rotors)?;
        machine.set_rotors(&self.positions)?;
        if let Some(rings) = &self.rings {
            machine.ringstellung(rings)?;
        }
        machine.set_plugboard(self.plugboard.clone())?;

        debug!(
            rotors = ?self.rotors,
            positions = %self.positions,
            rings = ?self.rings,
            plugboard = %self.plugboard,
            "setting applied"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use enigma_machine::MachineError;

    use super::*;
    use crate::config::Config;

    const NAVAL: &str = "\
ABCDEFGHIJKLMNOPQRSTUVWXYZ
5 3
I MQ      (AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)
III MV    (ABDHPEJT) (CFLVMZOYQIRWUKXSG) (N)
IV MJ     (AEPLIYWCOXMRFZBSTGJQNH) (DV) (KU)
Beta N    (ALBEVFCYODJWUGNMQTZSKPR) (HIX)
Gamma N   (AFNIRLBSQWVXGUZDKMTPCOYJHE)
B R       (AE) (BN) (CK) (DQ) (FU) (GY) (HW) (IJ) (LO) (MP) (RX) (SZ) (TV)
C R       (AR) (BD) (CO) (EJ) (FN) (GT) (HK) (IV) (LM) (PW) (QZ) (SX) (UY)
";

    fn machine() -> Machine {
        Config::parse(NAVAL).unwrap().build().unwrap()
    }

    fn parse_err(line: &str) -> SessionError {
        Setting::parse(line, &machine()).unwrap_err()
    }

    #[test]
    fn parse_full_line() {
        let setting =
            Setting::parse("* B Beta III IV I AXLE BCDE (HQ) (EX) (IP)(TR) (BY)", &machine())
                .unwrap();
        assert_eq!(setting.rotors(), ["B", "BETA", "III", "IV", "I"]);
        assert_eq!(setting.positions(), "AXLE");
        assert_eq!(setting.rings(), Some("BCDE"));
        assert_eq!(setting.plugboard().permute_symbol('H').unwrap(), 'Q');
        assert_eq!(setting.plugboard().permute_symbol('R').unwrap(), 'T');
        assert_eq!(setting.plugboard().cycles().len(), 5);
    }

    #[test]
    fn parse_minimal_line() {
        let setting = Setting::parse("   *B BETA III IV I AXLE", &machine()).unwrap();
        assert_eq!(setting.rotors()[0], "B");
        assert_eq!(setting.rings(), None);
        assert!(setting.plugboard().cycles().is_empty());
    }

    #[test]
    fn fold_case_of_symbols() {
        let setting = Setting::parse("* b beta iii iv i axle bbbb (hq)", &machine()).unwrap();
        assert_eq!(setting.positions(), "AXLE");
        assert_eq!(setting.rings(), Some("BBBB"));
        assert_eq!(setting.plugboard().permute_symbol('Q').unwrap(), 'H');
    }

    #[test]
    fn is_setting_line_checks_first_symbol() {
        assert!(is_setting_line("* B BETA"));
        assert!(is_setting_line("  \t*"));
        assert!(!is_setting_line("HELLO * WORLD"));
        assert!(!is_setting_line(""));
    }

    #[test]
    fn reject_malformed_lines() {
        for line in [
            "B BETA III IV I AXLE",
            "* B BETA III IV I",
            "* B BETA III IV",
            "* B BETA III IV I AXL",
            "* B BETA III IV I AXLEE",
            "* B BETA III IV I AX!E",
            "* B BETA III IV I AXLE BBB",
            "* B BETA III IV I AXLE BBBB (HQ) EX",
            "* B BETA III IV I AXLE (H)",
            "* B BETA III IV I AXLE (HQE)",
            "* B BETA III IV I AXLE (HQ) (QE)",
            "* B BETA III IV I AXLE (H!)",
            "* B BETA III IV I AXLE (HQ",
        ] {
            assert!(
                matches!(parse_err(line), SessionError::Setting { .. }),
                "{line}"
            );
        }
    }

    #[test]
    fn apply_configures_machine() {
        let mut m = machine();
        let setting = Setting::parse("* B BETA III IV I AXLE (HQ) (EX)", &m).unwrap();
        setting.apply(&mut m).unwrap();
        assert_eq!(m.window(), "AXLE");
        assert_eq!(m.rotor(0).unwrap().name(), "B");
        assert_eq!(m.plugboard().permute_symbol('E').unwrap(), 'X');
    }

    #[test]
    fn plugboard_is_rebuilt_each_line() {
        let mut m = machine();
        Setting::parse("* B BETA III IV I AXLE (HQ)", &m)
            .unwrap()
            .apply(&mut m)
            .unwrap();
        Setting::parse("* B BETA III IV I AXLE", &m)
            .unwrap()
            .apply(&mut m)
            .unwrap();
        assert_eq!(m.plugboard().permute_symbol('H').unwrap(), 'H');
    }

    #[test]
    fn reject_misplaced_rotors() {
        let mut m = machine();
        let cases = [
            ("* B III BETA IV I AAAA", 1, "III"),
            ("* B BETA GAMMA IV I AAAA", 2, "GAMMA"),
            ("* B BETA III IV C AAAA", 4, "C"),
        ];
        for (line, slot, name) in cases {
            let setting = Setting::parse(line, &m).unwrap();
            match setting.apply(&mut m) {
                Err(SessionError::MisplacedRotor { slot: s, name: n }) => {
                    assert_eq!((s, n.as_str()), (slot, name), "{line}");
                }
                other => panic!("{line}: expected MisplacedRotor, got {other:?}"),
            }
        }
    }

    #[test]
    fn rotor_selection_errors_come_from_machine() {
        let mut m = machine();
        let unknown = Setting::parse("* B BETA III IV V AAAA", &m).unwrap();
        assert!(matches!(
            unknown.apply(&mut m),
            Err(SessionError::Machine(MachineError::UnknownRotor(name))) if name == "V"
        ));
        let duplicate = Setting::parse("* B BETA III I I AAAA", &m).unwrap();
        assert!(matches!(
            duplicate.apply(&mut m),
            Err(SessionError::Machine(MachineError::DuplicateRotor(_)))
        ));
        let not_reflector = Setting::parse("* BETA GAMMA III IV I AAAA", &m).unwrap();
        assert!(matches!(
            not_reflector.apply(&mut m),
            Err(SessionError::Machine(MachineError::NotAReflector(_)))
        ));
    }

    #[test]
    fn failed_apply_keeps_previous_setting() {
        let mut m = machine();
        Setting::parse("* B BETA III IV I AXLE (HQ)", &m)
            .unwrap()
            .apply(&mut m)
            .unwrap();
        let bad = Setting::parse("* B III BETA IV I QQQQ", &m).unwrap();
        assert!(bad.apply(&mut m).is_err());
        assert_eq!(m.window(), "AXLE");
        assert_eq!(m.rotor(2).unwrap().name(), "III");
        assert_eq!(m.plugboard().permute_symbol('H').unwrap(), 'Q');
    }
}
