pub mod cmd;
pub mod error;
pub mod launcher;
pub mod trace;

#[cfg(target_arch = "aarch64")]
pub mod aarch64;

#[cfg(target_arch = "x86_64")]
pub mod x86;

pub use cmd::{Command, Exec, ReplaceImage, MAX_ARGS};
pub use error::{Error, UsageError};
pub use launcher::{Invocation, Launcher, TRACE_FAILED, USAGE};
pub use trace::{SeccompTrace, TraceController, TraceMask};
