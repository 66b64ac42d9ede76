use std::{collections::HashMap,
          path::{Path, PathBuf}};

/// A loaded script: its lines and the `name::` marks `goto` can jump to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    pub path:  PathBuf,
    pub lines: Vec<String>,
    marks:     HashMap<String, usize>,
}

impl Script {
    /// Splits `source` into lines and indexes its marks.
    ///
    /// # Example
    /// ```
    /// use quill::interpreter::store::script::Script;
    ///
    /// let script = Script::new("demo.ql", "say 1\n  top::\nsay 2\n");
    /// assert_eq!(script.lines.len(), 3);
    /// assert_eq!(script.mark("top"), Some(1));
    /// assert_eq!(script.mark("bottom"), None);
    /// ```
    #[must_use]
    pub fn new(path: impl AsRef<Path>, source: &str) -> Self {
        let lines: Vec<String> = source.lines().map(str::to_string).collect();
        let marks = lines.iter()
                         .enumerate()
                         .filter_map(|(i, line)| mark_name(line).map(|name| (name.to_string(), i)))
                         .collect();
        Self { path: path.as_ref().to_path_buf(),
               lines,
               marks }
    }

    /// Line index of the mark called `name`.
    #[must_use]
    pub fn mark(&self, name: &str) -> Option<usize> {
        self.marks.get(name).copied()
    }
}

/// The mark a line declares, if it is a lone `name::` token.
#[must_use]
pub fn mark_name(line: &str) -> Option<&str> {
    let name = line.trim().strip_suffix("::")?;
    let valid = !name.is_empty()
                && name.chars().all(|c| c.is_alphanumeric() || c == '_');
    valid.then_some(name)
}
