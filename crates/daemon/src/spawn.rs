//! Real process-spawning implementation of [`mce_core::spawn::Spawner`].
//! `run_sync` blocks the calling accounting pipeline on
//! `std::process::Command`; `run_async` detaches a plain OS thread that
//! waits on the child and logs its exit status, so the accounting core
//! never has to run inside a Tokio reactor to dispatch a trigger.

use mce_core::spawn::Spawner;
use std::process::{Command, ExitStatus};

#[derive(Default)]
pub struct ProcessSpawner;

impl Spawner for ProcessSpawner {
    fn run_sync(
        &self,
        command: &str,
        args: &[String],
        env: &[(String, String)],
    ) -> std::io::Result<ExitStatus> {
        Command::new(command)
            .args(args)
            .envs(env.iter().cloned())
            .status()
    }

    fn run_async(&self, command: &str, args: &[String], env: &[(String, String)]) {
        let mut cmd = Command::new(command);
        cmd.args(args).envs(env.iter().cloned());
        let command = command.to_string();
        std::thread::spawn(move || match cmd.status() {
            Ok(status) => {
                tracing::debug!(%command, %status, "trigger finished");
            }
            Err(err) => {
                tracing::warn!(%command, error = %err, "failed to spawn trigger");
            }
        });
    }
}
