// Session: a configured machine fed one line at a time.
//
// Setting lines reconfigure the machine; every other line is a message.
// Messages are stripped of whitespace and case-folded onto the alphabet
// before conversion, and the output is written in groups.

use std::io::{BufRead, Write};

use enigma_core::character::{normalize_symbol, strip_whitespace};
use enigma_machine::Machine;
use tracing::trace;

use crate::SessionError;
use crate::config::Config;
use crate::format::{GROUP_SIZE, group};
use crate::setting::{Setting, is_setting_line};

/// A machine plus the state of the message stream.
#[derive(Debug, Clone)]
pub struct Session {
    machine: Machine,
    configured: bool,
}

impl Session {
    /// Start a session on `machine`. Messages are refused until the first
    /// setting line has been applied.
    pub fn new(machine: Machine) -> Self {
        Self {
            machine,
            configured: false,
        }
    }

    /// Parse configuration text and start a session on the machine it
    /// describes.
    pub fn from_config(text: &str) -> Result<Self, SessionError> {
        Ok(Self::new(Config::parse(text)?.build()?))
    }

    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    /// Returns `true` once a setting line has been applied.
    pub fn is_configured(&self) -> bool {
        self.configured
    }

    /// Parse and apply one setting line.
    pub fn apply_setting(&mut self, line: &str) -> Result<(), SessionError> {
        let setting = Setting::parse(line, &self.machine)?;
        setting.apply(&mut self.machine)?;
        self.configured = true;
        Ok(())
    }

    /// Convert one message line, returning the converted symbols ungrouped.
    ///
    /// A line with nothing but whitespace converts to the empty string, even
    /// before the first setting line.
    pub fn convert_message(&mut self, line: &str) -> Result<String, SessionError> {
        let alphabet = self.machine.alphabet();
        let text: String = strip_whitespace(line)
            .chars()
            .map(|c| normalize_symbol(alphabet, c).unwrap_or(c))
            .collect();
        if text.is_empty() {
            return Ok(text);
        }
        if !self.configured {
            return Err(SessionError::MissingSetting);
        }
        let converted = self.machine.convert_str(&text)?;
        trace!(symbols = converted.len(), window = %self.machine.window(), "message converted");
        Ok(converted)
    }

    /// Handle one input line. Returns `None` for a setting line and the
    /// grouped conversion for a message line.
    pub fn process_line(&mut self, line: &str) -> Result<Option<String>, SessionError> {
        if is_setting_line(line) {
            self.apply_setting(line)?;
            return Ok(None);
        }
        let converted = self.convert_message(line)?;
        Ok(Some(group(&converted, GROUP_SIZE)))
    }

    /// Process every line of `input`, writing one output line per message
    /// line. Stops at the first error.
    pub fn process<R: BufRead, W: Write>(
        &mut self,
        input: R,
        mut output: W,
    ) -> Result<(), SessionError> {
        for line in input.lines() {
            let line = line?;
            if let Some(out) = self.process_line(&line)? {
                writeln!(output, "{out}")?;
            }
        }
        output.flush()?;
        Ok(())
    }
}
