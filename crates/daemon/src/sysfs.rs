//! Real filesystem-backed implementation of [`mce_core::sysfs::SysfsWriter`].

use mce_core::sysfs::SysfsWriter;
use std::fs;
use std::io;

#[derive(Default)]
pub struct FsSysfsWriter;

impl SysfsWriter for FsSysfsWriter {
    fn write(&self, path: &str, payload: &str) -> io::Result<()> {
        fs::write(path, payload)
    }

    fn writable(&self, path: &str) -> bool {
        fs::metadata(path)
            .map(|metadata| !metadata.permissions().readonly())
            .unwrap_or(false)
    }
}
