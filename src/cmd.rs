use std::convert::Infallible;
use std::ffi::{CStr, CString};

use nix::unistd;
use tracing::debug;

use crate::error::{Error, Result};


/// Maximum number of tokens handed to the replacement program, including its name.
pub const MAX_ARGS: usize = 32;

/// Command that replaces the launcher's process image.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Command {
    /// Argument vector to pass to `execvp()`. Never empty.
    argv: Vec<CString>,
}

impl Command {
    /// Build a command from `argv`, keeping at most [`MAX_ARGS`] leading tokens.
    ///
    /// Tokens past the cap are dropped without notice.
    pub fn new<I, S>(argv: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<Vec<u8>>,
    {
        // Ensure we own NUL-terminated strings for the foreign exec call.
        let argv: std::result::Result<Vec<_>, _> = argv
            .into_iter()
            .take(MAX_ARGS)
            .map(CString::new)
            .collect();
        let argv = argv?;

        if argv.is_empty() {
            return Err(Error::EmptyCommand);
        }

        Ok(Self { argv })
    }

    /// Program to execute, `argv[0]`.
    pub fn program(&self) -> &CStr {
        &self.argv[0]
    }

    /// Full argument vector, including the program name.
    pub fn argv(&self) -> &[CString] {
        &self.argv
    }

    pub fn len(&self) -> usize {
        self.argv.len()
    }

    pub fn is_empty(&self) -> bool {
        self.argv.is_empty()
    }

    pub(crate) fn program_lossy(&self) -> String {
        self.program().to_string_lossy().into_owned()
    }
}

/// Replaces the current process image.
pub trait Exec {
    /// Replace the running image with `cmd`. Only returns if the replacement failed.
    fn exec(&mut self, cmd: &Command) -> Result<Infallible>;
}

impl<E: Exec + ?Sized> Exec for &mut E {
    fn exec(&mut self, cmd: &Command) -> Result<Infallible> {
        (**self).exec(cmd)
    }
}

/// [`Exec`] backed by `execvp(3)`.
///
/// A program name without a `/` is searched for in `PATH`, never in the current directory:
/// run a program from there as `./prog`. The environment is inherited unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReplaceImage;

impl Exec for ReplaceImage {
    fn exec(&mut self, cmd: &Command) -> Result<Infallible> {
        debug!(program = %cmd.program_lossy(), argc = cmd.len(), "replacing process image");

        unistd::execvp(cmd.program(), cmd.argv()).map_err(|source| Error::Exec {
            program: cmd.program_lossy(),
            source,
        })
    }
}
