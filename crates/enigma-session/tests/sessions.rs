//! Stream tests: run whole input files through a session and compare the
//! output with the expected files listed in `tests/data/sessions.json`.
//!
//! Run: cargo test -p enigma-session --test sessions

use std::path::PathBuf;

use enigma_session::{Session, SessionError};
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct Manifest {
    streams: Vec<Stream>,
    failures: Vec<Failure>,
}

#[derive(Debug, Deserialize)]
struct Stream {
    name: String,
    config: String,
    input: String,
    expected: String,
}

#[derive(Debug, Deserialize)]
struct Failure {
    name: String,
    config: String,
    input: String,
    error: String,
    lines_written: usize,
}

fn data_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data")
        .join(name)
}

fn read_data(name: &str) -> String {
    let path = data_path(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read {}: {}", path.display(), e))
}

fn load_manifest() -> Manifest {
    serde_json::from_str(&read_data("sessions.json"))
        .unwrap_or_else(|e| panic!("failed to parse sessions.json: {}", e))
}

fn error_kind(err: &SessionError) -> &'static str {
    match err {
        SessionError::Core(_) => "core",
        SessionError::Machine(_) => "machine",
        SessionError::Config { .. } => "config",
        SessionError::Setting { .. } => "setting",
        SessionError::MisplacedRotor { .. } => "misplaced_rotor",
        SessionError::MissingSetting => "missing_setting",
        SessionError::Io(_) => "io",
    }
}

fn run(config: &str, input: &str) -> (Result<(), SessionError>, String) {
    let mut session = Session::from_config(&read_data(config))
        .unwrap_or_else(|e| panic!("{config}: {e}"));
    let mut out = Vec::new();
    let result = session.process(input.as_bytes(), &mut out);
    (result, String::from_utf8(out).unwrap())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn streams_match_expected_output() {
    let manifest = load_manifest();
    for stream in &manifest.streams {
        let (result, output) = run(&stream.config, &read_data(&stream.input));
        result.unwrap_or_else(|e| panic!("{}: {}", stream.name, e));
        assert_eq!(output, read_data(&stream.expected), "{}", stream.name);
    }
}

#[test]
fn failures_stop_the_stream() {
    let manifest = load_manifest();
    for failure in &manifest.failures {
        let (result, output) = run(&failure.config, &failure.input);
        let err = result.expect_err(&failure.name);
        assert_eq!(error_kind(&err), failure.error, "{}: {}", failure.name, err);
        assert_eq!(output.lines().count(), failure.lines_written, "{}", failure.name);
    }
}

/// Decrypting the expected output with the same setting lines gives back
/// the input messages, stripped and folded to upper case.
#[test]
fn expected_output_deciphers_to_input() {
    let manifest = load_manifest();
    for stream in &manifest.streams {
        let input = read_data(&stream.input);
        let expected = read_data(&stream.expected);
        let mut ciphertext = expected.lines();
        let reversed: String = input
            .lines()
            .map(|line| {
                if line.trim_start().starts_with('*') {
                    line.to_string()
                } else {
                    ciphertext.next().unwrap_or_default().to_string()
                }
            })
            .map(|line| line + "\n")
            .collect();

        let (result, output) = run(&stream.config, &reversed);
        result.unwrap();
        let plain: Vec<String> = input
            .lines()
            .filter(|line| !line.trim_start().starts_with('*'))
            .map(|line| {
                line.chars()
                    .filter(|c| !c.is_whitespace())
                    .flat_map(char::to_uppercase)
                    .collect()
            })
            .collect();
        let decoded: Vec<String> = output.lines().map(|l| l.replace(' ', "")).collect();
        assert_eq!(decoded, plain, "{}", stream.name);
    }
}

#[test]
fn config_errors_carry_line_numbers() {
    let cases = [
        ("ABC(D\n3 2\n", 1),
        ("ABCD\n3\n3\n", 3),
        ("ABCD\n3 2\nR R (AB) (CD)\nF MX (ABC)\nG N (AB)\n", 4),
        ("ABCD\n3 2\nR R (AB) (CD)\nF MA (ABC)\nG Q (AB)\n", 5),
        ("ABCD\n3 2\nR R (AB) (CD)\nF MA (ABC)\nf MB (ABCD)\n", 5),
    ];
    for (text, line) in cases {
        match Session::from_config(text) {
            Err(SessionError::Config { line: got, .. }) => assert_eq!(got, line, "{text:?}"),
            Err(other) => panic!("{text:?}: expected a configuration error, got {other}"),
            Ok(_) => panic!("{text:?}: expected a configuration error"),
        }
    }
}
