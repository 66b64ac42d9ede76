//! The boundary between a session and the outside world.
//!
//! Everything a script can observe or change outside its own symbols goes
//! through [`Host`]: console output, input, the filesystem, the shell, the
//! environment, the clock and the random number generator. [`SystemHost`]
//! talks to the real machine; [`MemoryHost`] keeps everything in memory
//! and is what the tests drive.

/// An in-memory host with captured output.
pub mod memory;
/// The host backed by the process environment.
pub mod system;

use std::{io,
          path::{Path, PathBuf}};

pub use memory::MemoryHost;
pub use system::SystemHost;

pub trait Host {
    /// Writes `text` to standard output as-is.
    fn write(&mut self, text: &str);

    /// Writes one diagnostic line to standard error.
    fn error(&mut self, text: &str);

    /// Shows `prompt` and reads a line without its terminator. `None` at end
    /// of input.
    fn read_line(&mut self, prompt: &str) -> Option<String>;

    /// Runs `command` through the platform shell and returns its exit code.
    fn shell(&mut self, command: &str) -> io::Result<i32>;

    fn env_var(&self, name: &str) -> Option<String>;

    fn read_file(&self, path: &Path) -> io::Result<String>;

    /// Creates or truncates `path`.
    fn write_file(&mut self, path: &Path, contents: &str) -> io::Result<()>;

    /// Appends to `path`, creating it when missing.
    fn append_file(&mut self, path: &Path, contents: &str) -> io::Result<()>;

    /// Entry names of a directory, sorted.
    fn list_dir(&self, path: &Path) -> io::Result<Vec<String>>;

    fn is_file(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    /// Creates an empty file; fails with `AlreadyExists` if it exists.
    fn create_file(&mut self, path: &Path) -> io::Result<()>;

    fn remove_file(&mut self, path: &Path) -> io::Result<()>;

    fn create_dir(&mut self, path: &Path) -> io::Result<()>;

    /// Removes an empty directory.
    fn remove_dir(&mut self, path: &Path) -> io::Result<()>;

    fn current_dir(&self) -> PathBuf;

    fn set_current_dir(&mut self, path: &Path) -> io::Result<()>;

    /// A random integer in `low..=high`; callers guarantee `low <= high`.
    fn random(&mut self, low: i64, high: i64) -> i64;

    /// The local time formatted with a `strftime` pattern.
    fn now(&self, format: &str) -> String;

    fn user_name(&self) -> String;

    fn machine_name(&self) -> String;
}
