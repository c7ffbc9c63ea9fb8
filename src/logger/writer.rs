//! Log writer module
//!
//! Opens the optional log file the subscriber writes to. Without one,
//! logs go to stderr.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;

/// Open the configured log file for appending, if one is configured
pub fn open(path: Option<&str>) -> io::Result<Option<Mutex<File>>> {
    path.map(|p| open_log_file(p).map(Mutex::new)).transpose()
}

/// Open or create a log file for appending
fn open_log_file(path: &str) -> io::Result<File> {
    // Create parent directories if they don't exist
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new().create(true).append(true).open(path)
}
