//! Validate the launcher's arguments, enable tracing, and exec the traced command.

use std::convert::Infallible;
use std::ffi::OsString;
use std::io::{self, Write};
use std::os::unix::ffi::OsStringExt;

use tracing::debug;

use crate::cmd::{Command, Exec};
use crate::error::{Result, UsageError};
use crate::trace::{TraceController, TraceMask};


/// Printed to the error stream when the arguments are rejected.
pub const USAGE: &str = "Incorrect Input !\nCorrect usage: strace <mask> <command>\n";

/// Printed to the error stream when tracing could not be enabled. Not fatal.
pub const TRACE_FAILED: &str = "strace: trace failed\n";

/// Returns `true` iff `token` is non-empty and made only of ASCII decimal digits.
pub fn is_numeric(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit())
}

/// Validated launcher arguments: `strace <mask> <command> [args...]`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Invocation {
    mask: TraceMask,
    command: Vec<OsString>,
}

impl Invocation {
    /// Validate a full argument list, including the launcher's own name in `args[0]`.
    ///
    /// The argument count is checked before the mask token is looked at.
    pub fn parse<I, S>(args: I) -> std::result::Result<Self, UsageError>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let mut args: Vec<OsString> = args.into_iter().map(Into::into).collect();

        if args.len() < 3 {
            return Err(UsageError::TooFewArguments { count: args.len() });
        }

        let command = args.split_off(2);

        let token = &args[1];
        let token = token
            .to_str()
            .filter(|t| is_numeric(t))
            .ok_or_else(|| UsageError::NonNumericMask {
                token: token.to_string_lossy().into_owned(),
            })?;

        // All digits, so the only possible failure is overflow.
        let mask = token
            .parse::<TraceMask>()
            .map_err(|_| UsageError::MaskOverflow { token: token.to_owned() })?;

        Ok(Self { mask, command })
    }

    pub fn mask(&self) -> TraceMask {
        self.mask
    }

    /// Command and its arguments, exactly as given.
    pub fn command_args(&self) -> &[OsString] {
        &self.command
    }

    /// Argument vector for the replacement image, capped at [`MAX_ARGS`](crate::cmd::MAX_ARGS).
    pub fn command(&self) -> Result<Command> {
        Command::new(self.command.iter().cloned().map(OsStringExt::into_vec))
    }
}

/// Runs one invocation: Validating, then TraceRequested, then Exec.
///
/// Diagnostics go to `diagnostics`, which is stderr unless replaced.
#[derive(Debug)]
pub struct Launcher<T, E, W = io::Stderr> {
    tracer: T,
    exec: E,
    diagnostics: W,
}

impl<T, E> Launcher<T, E> {
    pub fn new(tracer: T, exec: E) -> Self {
        let diagnostics = io::stderr();

        Self { tracer, exec, diagnostics }
    }
}

impl<T, E, W> Launcher<T, E, W>
where
    T: TraceController,
    E: Exec,
    W: Write,
{
    /// Replace the diagnostics sink.
    pub fn with_diagnostics<V: Write>(self, diagnostics: V) -> Launcher<T, E, V> {
        let Self { tracer, exec, .. } = self;

        Launcher { tracer, exec, diagnostics }
    }

    /// Validate `args`, then [`launch()`](Self::launch) it.
    ///
    /// On success the process image is replaced and this never returns.
    pub fn run<I, S>(&mut self, args: I) -> Result<Infallible>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let invocation = match Invocation::parse(args) {
            Ok(invocation) => invocation,
            Err(err) => {
                debug!(%err, "rejecting invocation");
                self.report(USAGE);
                return Err(err.into());
            },
        };

        self.launch(&invocation)
    }

    /// Enable tracing for `invocation.mask()`, then exec its command.
    ///
    /// A failure to enable tracing is reported and otherwise ignored.
    pub fn launch(&mut self, invocation: &Invocation) -> Result<Infallible> {
        let mask = invocation.mask();

        if let Err(err) = self.tracer.enable(mask) {
            debug!(%err, "continuing without trace");
            self.report(TRACE_FAILED);
        }

        let res = invocation
            .command()
            .and_then(|cmd| self.exec.exec(&cmd));

        let err = match res {
            Ok(never) => match never {},
            Err(err) => err,
        };

        debug!(?err, "launch failed");
        self.report(&format!("strace: {}\n", err));

        Err(err)
    }

    // Diagnostics are best-effort: a closed stderr must not change the outcome.
    fn report(&mut self, msg: &str) {
        let _ = self.diagnostics.write_all(msg.as_bytes());
        let _ = self.diagnostics.flush();
    }
}
