//! Fake collaborator implementations shared by the integration tests:
//! record calls instead of touching a real filesystem or spawning real
//! processes.

use mce_core::dimm::{DimmHandle, DimmKey, DimmTopology};
use mce_core::spawn::Spawner;
use mce_core::sysfs::SysfsWriter;
use std::cell::RefCell;
use std::os::unix::process::ExitStatusExt;
use std::process::ExitStatus;
use std::rc::Rc;

#[derive(Default)]
pub struct FakeSysfs {
    pub writable_paths: RefCell<Vec<String>>,
    pub fail_paths: RefCell<Vec<String>>,
    pub writes: RefCell<Vec<(String, String)>>,
}

impl FakeSysfs {
    pub fn allow(&self, path: &str) {
        self.writable_paths.borrow_mut().push(path.to_string());
    }

    pub fn fail(&self, path: &str) {
        self.fail_paths.borrow_mut().push(path.to_string());
    }
}

impl SysfsWriter for FakeSysfs {
    fn write(&self, path: &str, payload: &str) -> std::io::Result<()> {
        self.writes
            .borrow_mut()
            .push((path.to_string(), payload.to_string()));
        if self.fail_paths.borrow().iter().any(|p| p == path) {
            Err(std::io::Error::other("EIO"))
        } else {
            Ok(())
        }
    }

    fn writable(&self, path: &str) -> bool {
        self.writable_paths.borrow().iter().any(|p| p == path)
    }
}

/// Lets a test keep an `Rc` handle to inspect `writes` after handing a
/// clone of it into a `Box<dyn SysfsWriter>` owned by the core.
impl SysfsWriter for Rc<FakeSysfs> {
    fn write(&self, path: &str, payload: &str) -> std::io::Result<()> {
        (**self).write(path, payload)
    }

    fn writable(&self, path: &str) -> bool {
        (**self).writable(path)
    }
}

#[derive(Default)]
pub struct FakeSpawner {
    pub sync_calls: RefCell<Vec<String>>,
    pub async_calls: RefCell<Vec<String>>,
}

impl Spawner for FakeSpawner {
    fn run_sync(
        &self,
        command: &str,
        _args: &[String],
        _env: &[(String, String)],
    ) -> std::io::Result<ExitStatus> {
        self.sync_calls.borrow_mut().push(command.to_string());
        Ok(ExitStatus::from_raw(0))
    }

    fn run_async(&self, command: &str, _args: &[String], _env: &[(String, String)]) {
        self.async_calls.borrow_mut().push(command.to_string());
    }
}

pub struct NullDimm;

impl DimmTopology for NullDimm {
    fn lookup(&self, _key: DimmKey) -> Option<DimmHandle> {
        None
    }
}
