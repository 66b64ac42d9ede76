use std::{fmt::Write as _,
          fs::{self, OpenOptions},
          io::{self, BufRead, Write},
          path::{Path, PathBuf},
          process::Command};

use rand::Rng;

use super::Host;

/// A [`Host`] backed by the real console, filesystem and shell.
#[derive(Debug, Default)]
pub struct SystemHost;

impl SystemHost {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Host for SystemHost {
    fn write(&mut self, text: &str) {
        let mut stdout = io::stdout().lock();
        let _ = stdout.write_all(text.as_bytes());
        let _ = stdout.flush();
    }

    fn error(&mut self, text: &str) {
        eprintln!("{text}");
    }

    fn read_line(&mut self, prompt: &str) -> Option<String> {
        self.write(prompt);
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\n', '\r']).to_string()),
        }
    }

    fn shell(&mut self, command: &str) -> io::Result<i32> {
        let status = if cfg!(windows) {
            Command::new("cmd").args(["/C", command]).status()?
        } else {
            Command::new("sh").args(["-c", command]).status()?
        };
        Ok(status.code().unwrap_or(-1))
    }

    fn env_var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn read_file(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }

    fn write_file(&mut self, path: &Path, contents: &str) -> io::Result<()> {
        fs::write(path, contents)
    }

    fn append_file(&mut self, path: &Path, contents: &str) -> io::Result<()> {
        OpenOptions::new().create(true)
                          .append(true)
                          .open(path)?
                          .write_all(contents.as_bytes())
    }

    fn list_dir(&self, path: &Path) -> io::Result<Vec<String>> {
        let mut names = fs::read_dir(path)?.map(|entry| {
                                                 entry.map(|e| {
                                                          e.file_name()
                                                           .to_string_lossy()
                                                           .into_owned()
                                                      })
                                             })
                                             .collect::<io::Result<Vec<_>>>()?;
        names.sort();
        Ok(names)
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn create_file(&mut self, path: &Path) -> io::Result<()> {
        OpenOptions::new().write(true).create_new(true).open(path).map(drop)
    }

    fn remove_file(&mut self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn create_dir(&mut self, path: &Path) -> io::Result<()> {
        fs::create_dir(path)
    }

    fn remove_dir(&mut self, path: &Path) -> io::Result<()> {
        fs::remove_dir(path)
    }

    fn current_dir(&self) -> PathBuf {
        std::env::current_dir().unwrap_or_default()
    }

    fn set_current_dir(&mut self, path: &Path) -> io::Result<()> {
        std::env::set_current_dir(path)
    }

    fn random(&mut self, low: i64, high: i64) -> i64 {
        rand::thread_rng().gen_range(low..=high)
    }

    fn now(&self, format: &str) -> String {
        let mut out = String::new();
        match write!(out, "{}", chrono::Local::now().format(format)) {
            Ok(()) => out,
            Err(_) => format.to_string(),
        }
    }

    fn user_name(&self) -> String {
        ["USER", "USERNAME"].iter()
                            .find_map(|key| std::env::var(key).ok())
                            .unwrap_or_else(|| "user".to_string())
    }

    fn machine_name(&self) -> String {
        ["HOSTNAME", "COMPUTERNAME"].iter()
                                    .find_map(|key| std::env::var(key).ok())
                                    .or_else(|| {
                                        fs::read_to_string("/etc/hostname").ok()
                                                                           .map(|h| {
                                                                               h.trim().to_string()
                                                                           })
                                    })
                                    .unwrap_or_else(|| "localhost".to_string())
    }
}
