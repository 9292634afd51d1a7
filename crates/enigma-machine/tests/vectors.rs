//! Known-answer tests: run the machines described in `tests/data/vectors.json`
//! and compare ciphertext and final window positions.
//!
//! Run: cargo test -p enigma-machine --test vectors

use std::path::PathBuf;
use std::sync::Arc;

use enigma_core::{Alphabet, Permutation};
use enigma_machine::{Machine, Rotor, RotorCatalog};
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Fixture types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct Fixture {
    rotors: Vec<RotorSpec>,
    cases: Vec<Case>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Kind {
    Moving,
    Fixed,
    Reflector,
}

#[derive(Debug, Deserialize)]
struct RotorSpec {
    name: String,
    kind: Kind,
    wiring: String,
    #[serde(default)]
    notches: String,
}

#[derive(Debug, Deserialize)]
struct Case {
    name: String,
    slots: usize,
    pawls: usize,
    rotors: Vec<String>,
    setting: String,
    rings: Option<String>,
    plugboard: Option<String>,
    input: String,
    output: String,
    window: String,
}

fn load_fixture() -> Fixture {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/vectors.json");
    let contents = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read {}: {}", path.display(), e));
    serde_json::from_str(&contents)
        .unwrap_or_else(|e| panic!("failed to parse {}: {}", path.display(), e))
}

fn build_catalog(specs: &[RotorSpec], alpha: &Arc<Alphabet>) -> RotorCatalog {
    let mut catalog = RotorCatalog::new();
    for spec in specs {
        let perm = Permutation::new(&spec.wiring, Arc::clone(alpha))
            .unwrap_or_else(|e| panic!("bad wiring for {}: {}", spec.name, e));
        let rotor = match spec.kind {
            Kind::Moving => Rotor::moving(spec.name.as_str(), perm, &spec.notches).unwrap(),
            Kind::Fixed => Rotor::fixed(spec.name.as_str(), perm),
            Kind::Reflector => Rotor::reflector(spec.name.as_str(), perm),
        };
        catalog.insert(rotor).unwrap();
    }
    catalog
}

fn build_machine(fixture: &Fixture, case: &Case) -> Machine {
    let alpha = Arc::new(Alphabet::default());
    let catalog = build_catalog(&fixture.rotors, &alpha);
    let mut machine = Machine::new(Arc::clone(&alpha), case.slots, case.pawls, catalog)
        .unwrap_or_else(|e| panic!("{}: {}", case.name, e));
    machine.insert_rotors(&case.rotors).unwrap();
    machine.set_rotors(&case.setting).unwrap();
    if let Some(rings) = &case.rings {
        machine.ringstellung(rings).unwrap();
    }
    if let Some(plugs) = &case.plugboard {
        machine
            .set_plugboard(Permutation::new(plugs, alpha).unwrap())
            .unwrap();
    }
    machine
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn encipher_known_vectors() {
    let fixture = load_fixture();
    assert!(!fixture.cases.is_empty());
    for case in &fixture.cases {
        let mut machine = build_machine(&fixture, case);
        let output = machine.convert_str(&case.input).unwrap();
        assert_eq!(output, case.output, "{}: ciphertext", case.name);
        assert_eq!(machine.window(), case.window, "{}: final window", case.name);
    }
}

#[test]
fn decipher_known_vectors() {
    let fixture = load_fixture();
    for case in &fixture.cases {
        let mut machine = build_machine(&fixture, case);
        let plain = machine.convert_str(&case.output).unwrap();
        assert_eq!(plain, case.input, "{}: plaintext", case.name);
    }
}

#[test]
fn symbol_at_a_time_matches_whole_message() {
    let fixture = load_fixture();
    for case in &fixture.cases {
        let mut machine = build_machine(&fixture, case);
        let output: String = case
            .input
            .chars()
            .map(|c| machine.convert_symbol(c).unwrap())
            .collect();
        assert_eq!(output, case.output, "{}", case.name);
    }
}

#[test]
fn reinserting_rotors_restarts_the_machine() {
    let fixture = load_fixture();
    let case = &fixture.cases[0];
    let mut machine = build_machine(&fixture, case);
    machine.convert_str(&case.input).unwrap();

    machine.insert_rotors(&case.rotors).unwrap();
    assert_eq!(machine.window(), "AAAA");
    machine.set_rotors(&case.setting).unwrap();
    // The plugboard survives a change of rotors.
    assert_eq!(machine.convert_str(&case.input).unwrap(), case.output);
}
