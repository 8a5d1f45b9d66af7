//! Builds the environment block for a trigger invocation and dispatches it
//! through the abstract [`crate::spawn::Spawner`], synchronously or
//! asynchronously.

use crate::bucket::Timestamp;
use crate::error::TriggerError;
use crate::spawn::Spawner;

/// Everything a trigger command needs to know about the event that fired
/// it, rendered into the environment block described in §6.
#[derive(Debug, Clone)]
pub struct TriggerMessage {
    pub threshold: u64,
    pub total_count: u64,
    pub last_event: Option<Timestamp>,
    pub agetime_secs: u64,
    pub message: String,
    pub threshold_count: u64,
}

impl TriggerMessage {
    fn env_block(&self) -> Vec<(String, String)> {
        let mut env = vec![
            ("THRESHOLD".to_string(), self.threshold.to_string()),
            ("TOTALCOUNT".to_string(), self.total_count.to_string()),
            ("AGETIME".to_string(), self.agetime_secs.to_string()),
            ("MESSAGE".to_string(), self.message.clone()),
            (
                "THRESHOLD_COUNT".to_string(),
                self.threshold_count.to_string(),
            ),
        ];
        if let Some(last_event) = self.last_event {
            if last_event != 0 {
                env.push(("LASTEVENT".to_string(), last_event.to_string()));
            }
        }
        env
    }
}

pub struct TriggerRunner<'a> {
    spawner: &'a dyn Spawner,
    command: &'a str,
}

impl<'a> TriggerRunner<'a> {
    pub fn new(spawner: &'a dyn Spawner, command: &'a str) -> Self {
        Self { spawner, command }
    }

    /// Dispatches the trigger asynchronously; the core never waits on its
    /// exit status.
    pub fn fire_async(&self, msg: &TriggerMessage) {
        self.spawner.run_async(self.command, &[], &msg.env_block());
    }

    /// Dispatches the trigger synchronously with positional `args`,
    /// blocking the calling pipeline until it exits.
    pub fn fire_sync(
        &self,
        args: &[String],
        msg: &TriggerMessage,
    ) -> Result<std::process::ExitStatus, TriggerError> {
        self.spawner
            .run_sync(self.command, args, &msg.env_block())
            .map_err(|source| TriggerError::Spawn {
                path: self.command.to_string(),
                source,
            })
    }
}
