//! Exit status codes for the CLI
//!
//! - 0: every conversion succeeded
//! - 1: at least one conversion failed, or the input could not be read

use std::process::{ExitCode, Termination};

/// Exit status codes following standard Unix conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitStatus {
    Success = 0,
    Error = 1,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        ExitCode::from(status as u8)
    }
}

impl Termination for ExitStatus {
    fn report(self) -> ExitCode {
        ExitCode::from(self as u8)
    }
}

impl ExitStatus {
    /// Success only when every conversion in the run succeeded
    pub fn from_outcomes(all_succeeded: bool) -> Self {
        if all_succeeded {
            ExitStatus::Success
        } else {
            ExitStatus::Error
        }
    }
}
