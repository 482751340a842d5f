use std::env;
use std::io;
use std::process;

use tracelaunch::{Launcher, ReplaceImage, SeccompTrace};
use tracing_subscriber::EnvFilter;


/// Environment variable holding the log filter, e.g. `STRACE_LOG=debug`.
const LOG_ENV: &str = "STRACE_LOG";

fn main() {
    init_logging();

    let mut launcher = Launcher::new(SeccompTrace::new(), ReplaceImage);

    match launcher.run(env::args_os()) {
        Ok(never) => match never {},
        Err(err) => process::exit(err.exit_code()),
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();
}
