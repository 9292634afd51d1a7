//! Configuration and message processing for the Enigma simulator.
//!
//! A session reads a machine description (alphabet, slot and pawl counts,
//! rotor catalog) from configuration text, then consumes a stream of lines:
//! setting lines starting with `*` choose rotors, positions, ring settings
//! and plugboard; every other line is a message to convert.
//!
//! # Architecture
//!
//! - [`config`] -- Configuration text -> [`Machine`](enigma_machine::Machine)
//! - [`setting`] -- `*` setting lines and the rotor placement rule
//! - [`session`] -- Line-by-line message processing
//! - [`format`] -- Output grouping
//!
//! # Examples
//!
//! ```
//! use enigma_session::Session;
//!
//! let config = "
//!     ABCDEFGHIJKLMNOPQRSTUVWXYZ
//!     5 3
//!     I    MQ (AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)
//!     III  MV (ABDHPEJT) (CFLVMZOYQIRWUKXSG) (N)
//!     IV   MJ (AEPLIYWCOXMRFZBSTGJQNH) (DV) (KU)
//!     Beta N  (ALBEVFCYODJWUGNMQTZSKPR) (HIX)
//!     B    R  (AE) (BN) (CK) (DQ) (FU) (GY) (HW) (IJ) (LO) (MP) (RX) (SZ) (TV)
//! ";
//! let mut session = Session::from_config(config).unwrap();
//! session.apply_setting("* B Beta III IV I AXLE (HQ) (EX) (IP) (TR) (BY)").unwrap();
//!
//! let out = session.process_line("FROM his shoulder Hiawatha").unwrap();
//! assert_eq!(out.as_deref(), Some("QVPQS OKOIL PUBKJ ZPISF XDW"));
//! ```

pub mod config;
pub mod format;
pub mod session;
pub mod setting;

pub use config::{Config, RotorDescriptor, RotorType};
pub use session::Session;
pub use setting::Setting;

use enigma_core::CoreError;
use enigma_machine::MachineError;

/// Error type for configuration, setting lines and message processing.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Machine(#[from] MachineError),
    #[error("configuration line {line}: {message}")]
    Config { line: usize, message: String },
    #[error("bad setting line: {message}")]
    Setting { message: String },
    #[error("rotor {name:?} cannot sit in slot {slot}")]
    MisplacedRotor { slot: usize, name: String },
    #[error("message text before the first setting line")]
    MissingSetting,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
