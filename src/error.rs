use std::ffi::NulError;

use crate::trace::TraceMask;


pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Incorrect input: {0}")]
    Usage(#[from] UsageError),

    #[error("Could not enable tracing with mask = {mask}")]
    Trace {
        mask: TraceMask,
        source: nix::Error,
    },

    #[error("exec {program} failed")]
    Exec { program: String, source: nix::Error },

    #[error("Argument contains an interior NUL byte")]
    Nul(#[from] NulError),

    #[error("Command exe required")]
    EmptyCommand,
}

impl Error {
    /// Status the launcher exits with when `run()` fails.
    pub fn exit_code(&self) -> i32 {
        1
    }
}

/// Reasons an invocation is rejected before anything is traced or executed.
#[derive(thiserror::Error, Clone, Debug, Eq, PartialEq)]
pub enum UsageError {
    #[error("expected at least 3 arguments, got {count}")]
    TooFewArguments { count: usize },

    #[error("mask {token:?} is not a decimal number")]
    NonNumericMask { token: String },

    #[error("mask {token:?} does not fit in 64 bits")]
    MaskOverflow { token: String },
}
