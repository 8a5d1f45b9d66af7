//! Abstract process-spawning capability used by [`crate::trigger`]. The
//! core never calls `std::process::Command` itself; see `mced::spawn` for
//! the concrete daemon-side implementation.

use std::process::ExitStatus;

pub trait Spawner {
    /// Runs `command` with `args` and `env`, blocking until it exits.
    fn run_sync(
        &self,
        command: &str,
        args: &[String],
        env: &[(String, String)],
    ) -> std::io::Result<ExitStatus>;

    /// Hands `command` off to run in the background; the core does not
    /// wait on it and never observes its exit status.
    fn run_async(&self, command: &str, args: &[String], env: &[(String, String)]);
}
