use std::convert::Infallible;

use nix::errno::Errno;
use tracelaunch::{Command, Error, Exec, TraceController, TraceMask};

/// Build an owned argument list from string literals.
#[allow(unused)]
macro_rules! args {
    ($($arg: expr),* $(,)?) => {
        vec![$(String::from($arg)),*]
    };
}

/// Records every mask it is asked to enable, optionally failing each request.
#[derive(Debug, Default)]
pub struct FakeTrace {
    pub fail: bool,
    pub calls: Vec<TraceMask>,
}

impl FakeTrace {
    #[allow(unused)]
    pub fn failing() -> Self {
        Self { fail: true, ..Self::default() }
    }
}

impl TraceController for FakeTrace {
    fn enable(&mut self, mask: TraceMask) -> tracelaunch::error::Result<()> {
        self.calls.push(mask);

        if self.fail {
            return Err(Error::Trace { mask, source: Errno::EPERM });
        }

        Ok(())
    }
}

/// Records every argument vector it is asked to exec, then fails like a missing program.
#[derive(Debug, Default)]
pub struct FakeExec {
    pub calls: Vec<Vec<String>>,
}

impl Exec for FakeExec {
    fn exec(&mut self, cmd: &Command) -> tracelaunch::error::Result<Infallible> {
        let argv = cmd
            .argv()
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        self.calls.push(argv);

        Err(Error::Exec {
            program: cmd.program().to_string_lossy().into_owned(),
            source: Errno::ENOENT,
        })
    }
}
