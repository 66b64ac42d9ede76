//! The interactive loop and its prompt.

use tracing::debug;

use crate::{host::Host,
            interpreter::session::{Session, Signal}};

/// How the REPL prompt is drawn.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Prompt {
    /// `> `
    #[default]
    Default,
    /// No prompt at all.
    Empty,
    /// A template where `\u`, `\m` and `\w` stand for the user, the machine
    /// and the current directory.
    Custom(String),
}

impl Prompt {
    /// Parses the argument of a `prompt` statement.
    #[must_use]
    pub fn parse(style: &str) -> Self {
        match style {
            "empty" => Self::Empty,
            "default" => Self::Default,
            template => Self::Custom(template.to_string()),
        }
    }

    /// Renders the prompt with facts from `host`.
    ///
    /// # Example
    /// ```
    /// use quill::{host::MemoryHost, repl::Prompt};
    ///
    /// let host = MemoryHost::new();
    /// assert_eq!(Prompt::parse(r"\u@\m:\w$ ").render(&host), "user@localhost:/$ ");
    /// assert_eq!(Prompt::parse("empty").render(&host), "");
    /// assert_eq!(Prompt::default().render(&host), "> ");
    /// ```
    #[must_use]
    pub fn render<H: Host + ?Sized>(&self, host: &H) -> String {
        let template = match self {
            Self::Default => return "> ".to_string(),
            Self::Empty => return String::new(),
            Self::Custom(template) => template,
        };

        let mut out = String::new();
        let mut chars = template.chars().peekable();
        while let Some(c) = chars.next() {
            if c != '\\' {
                out.push(c);
                continue;
            }
            match chars.peek() {
                Some('u') => out.push_str(&host.user_name()),
                Some('m') => out.push_str(&host.machine_name()),
                Some('w') => out.push_str(&host.current_dir().display().to_string()),
                _ => {
                    out.push(c);
                    continue;
                },
            }
            chars.next();
        }
        out
    }
}

impl<H: Host> Session<H> {
    /// Reads and executes lines until end of input or `exit`.
    ///
    /// # Returns
    /// The exit code: the `exit` argument, or the last error code.
    pub fn repl(&mut self) -> i32 {
        debug!("repl started");
        loop {
            let prompt = self.state.prompt.render(&self.host);
            let Some(line) = self.host.read_line(&prompt) else {
                break;
            };
            self.state.line = None;
            if let Signal::Exit(code) = self.execute_source(&line) {
                self.reset();
                return code;
            }
        }
        self.exit_code()
    }
}
