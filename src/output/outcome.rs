//! Per-command soft error accounting

use std::fmt::Display;
use std::process::ExitCode;

/// Exit status accumulated while a command keeps processing items.
///
/// Each reported failure is written to stderr immediately; the highest
/// level seen becomes the process exit code.
#[derive(Debug, Default)]
pub struct Outcome {
    exit_code: u8,
    failures: Vec<String>,
}

impl Outcome {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report a per-item failure with exit level 1
    pub fn report(&mut self, message: impl Display) {
        self.report_with_level(1, message);
    }

    pub fn report_with_level(&mut self, level: u8, message: impl Display) {
        let message = message.to_string();
        super::error(&message);
        self.failures.push(message);
        self.exit_code = self.exit_code.max(level);
    }

    /// Reported messages, in order
    pub fn failures(&self) -> &[String] {
        &self.failures
    }

    pub fn code(&self) -> u8 {
        self.exit_code
    }

    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.code())
    }
}
