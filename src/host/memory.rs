use std::{collections::{BTreeMap, BTreeSet, HashMap, VecDeque},
          fmt::Write as _,
          io::{self, ErrorKind},
          path::{Component, Path, PathBuf}};

use chrono::NaiveDateTime;

use super::Host;

/// A [`Host`] that keeps its filesystem, console and environment in memory.
///
/// Output is captured for inspection, input is scripted up front, shell
/// commands are recorded instead of run, `random` always yields its lower
/// bound and the clock is fixed.
///
/// # Example
/// ```
/// use quill::host::{Host, MemoryHost};
///
/// let mut host = MemoryHost::new().with_input(["yes"]);
/// host.write("hello\n");
///
/// assert_eq!(host.read_line("? "), Some("yes".to_string()));
/// assert_eq!(host.read_line("? "), None);
/// assert_eq!(host.stdout(), "hello\n? ? ");
/// ```
#[derive(Debug, Clone)]
pub struct MemoryHost {
    stdout:      String,
    stderr:      String,
    input:       VecDeque<String>,
    files:       BTreeMap<PathBuf, String>,
    directories: BTreeSet<PathBuf>,
    cwd:         PathBuf,
    env:         HashMap<String, String>,
    commands:    Vec<String>,
    clock:       NaiveDateTime,
}

impl Default for MemoryHost {
    fn default() -> Self {
        let root = PathBuf::from("/");
        Self { stdout:      String::new(),
               stderr:      String::new(),
               input:       VecDeque::new(),
               files:       BTreeMap::new(),
               directories: BTreeSet::from([root.clone()]),
               cwd:         root,
               env:         HashMap::new(),
               commands:    Vec::new(),
               clock:       NaiveDateTime::default(), }
    }
}

impl MemoryHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues lines returned by `read_line`, in order.
    #[must_use]
    pub fn with_input<I, S>(mut self, lines: I) -> Self
        where I: IntoIterator<Item = S>,
              S: Into<String>
    {
        self.input.extend(lines.into_iter().map(Into::into));
        self
    }

    /// Adds a file, creating its parent directories.
    #[must_use]
    pub fn with_file(mut self, path: impl AsRef<Path>, contents: impl Into<String>) -> Self {
        let path = self.absolute(path.as_ref());
        for ancestor in path.ancestors().skip(1) {
            self.directories.insert(ancestor.to_path_buf());
        }
        self.files.insert(path, contents.into());
        self
    }

    #[must_use]
    pub fn with_env(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub const fn with_clock(mut self, clock: NaiveDateTime) -> Self {
        self.clock = clock;
        self
    }

    /// Everything written to standard output so far.
    #[must_use]
    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    /// Every diagnostic line so far, newline terminated.
    #[must_use]
    pub fn stderr(&self) -> &str {
        &self.stderr
    }

    /// Shell commands in the order they were requested.
    #[must_use]
    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    /// Contents of a file, if it exists.
    #[must_use]
    pub fn file(&self, path: impl AsRef<Path>) -> Option<&str> {
        self.files.get(&self.absolute(path.as_ref())).map(String::as_str)
    }

    /// Drains captured standard output.
    pub fn take_stdout(&mut self) -> String {
        std::mem::take(&mut self.stdout)
    }

    fn absolute(&self, path: &Path) -> PathBuf {
        let mut resolved = PathBuf::new();
        for component in self.cwd.join(path).components() {
            match component {
                Component::ParentDir => {
                    resolved.pop();
                },
                Component::CurDir => {},
                other => resolved.push(other),
            }
        }
        resolved
    }

    fn require_parent(&self, path: &Path) -> io::Result<()> {
        match path.parent() {
            Some(parent) if !self.directories.contains(parent) => {
                Err(io::Error::from(ErrorKind::NotFound))
            },
            _ => Ok(()),
        }
    }
}

impl Host for MemoryHost {
    fn write(&mut self, text: &str) {
        self.stdout.push_str(text);
    }

    fn error(&mut self, text: &str) {
        self.stderr.push_str(text);
        self.stderr.push('\n');
    }

    fn read_line(&mut self, prompt: &str) -> Option<String> {
        self.stdout.push_str(prompt);
        self.input.pop_front()
    }

    fn shell(&mut self, command: &str) -> io::Result<i32> {
        self.commands.push(command.to_string());
        Ok(0)
    }

    fn env_var(&self, name: &str) -> Option<String> {
        self.env.get(name).cloned()
    }

    fn read_file(&self, path: &Path) -> io::Result<String> {
        self.files
            .get(&self.absolute(path))
            .cloned()
            .ok_or_else(|| io::Error::from(ErrorKind::NotFound))
    }

    fn write_file(&mut self, path: &Path, contents: &str) -> io::Result<()> {
        let path = self.absolute(path);
        self.require_parent(&path)?;
        self.files.insert(path, contents.to_string());
        Ok(())
    }

    fn append_file(&mut self, path: &Path, contents: &str) -> io::Result<()> {
        let path = self.absolute(path);
        self.require_parent(&path)?;
        self.files.entry(path).or_default().push_str(contents);
        Ok(())
    }

    fn list_dir(&self, path: &Path) -> io::Result<Vec<String>> {
        let dir = self.absolute(path);
        if !self.directories.contains(&dir) {
            return Err(io::Error::from(ErrorKind::NotFound));
        }
        let children = self.files
                           .keys()
                           .chain(self.directories.iter())
                           .filter(|p| p.parent() == Some(dir.as_path()))
                           .filter_map(|p| p.file_name())
                           .map(|n| n.to_string_lossy().into_owned())
                           .collect::<BTreeSet<_>>();
        Ok(children.into_iter().collect())
    }

    fn is_file(&self, path: &Path) -> bool {
        self.files.contains_key(&self.absolute(path))
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.directories.contains(&self.absolute(path))
    }

    fn create_file(&mut self, path: &Path) -> io::Result<()> {
        let path = self.absolute(path);
        if self.files.contains_key(&path) || self.directories.contains(&path) {
            return Err(io::Error::from(ErrorKind::AlreadyExists));
        }
        self.require_parent(&path)?;
        self.files.insert(path, String::new());
        Ok(())
    }

    fn remove_file(&mut self, path: &Path) -> io::Result<()> {
        self.files
            .remove(&self.absolute(path))
            .map(drop)
            .ok_or_else(|| io::Error::from(ErrorKind::NotFound))
    }

    fn create_dir(&mut self, path: &Path) -> io::Result<()> {
        let path = self.absolute(path);
        if self.directories.contains(&path) || self.files.contains_key(&path) {
            return Err(io::Error::from(ErrorKind::AlreadyExists));
        }
        self.require_parent(&path)?;
        self.directories.insert(path);
        Ok(())
    }

    fn remove_dir(&mut self, path: &Path) -> io::Result<()> {
        let path = self.absolute(path);
        if !self.directories.contains(&path) {
            return Err(io::Error::from(ErrorKind::NotFound));
        }
        let occupied = self.files
                           .keys()
                           .chain(self.directories.iter())
                           .any(|p| p.parent() == Some(path.as_path()));
        if occupied {
            return Err(io::Error::other("directory not empty"));
        }
        self.directories.remove(&path);
        Ok(())
    }

    fn current_dir(&self) -> PathBuf {
        self.cwd.clone()
    }

    fn set_current_dir(&mut self, path: &Path) -> io::Result<()> {
        let path = self.absolute(path);
        if !self.directories.contains(&path) {
            return Err(io::Error::from(ErrorKind::NotFound));
        }
        self.cwd = path;
        Ok(())
    }

    fn random(&mut self, low: i64, _high: i64) -> i64 {
        low
    }

    fn now(&self, format: &str) -> String {
        let mut out = String::new();
        match write!(out, "{}", self.clock.format(format)) {
            Ok(()) => out,
            Err(_) => format.to_string(),
        }
    }

    fn user_name(&self) -> String {
        "user".to_string()
    }

    fn machine_name(&self) -> String {
        "localhost".to_string()
    }
}
