//! Text substitution behind method, template and loop execution.
//!
//! Substitution is purely textual: a parameter name is replaced wherever it
//! appears as a whole word, string literals included. Each body line is
//! scanned once, so text that came from an argument is never rewritten again.

/// Whether `c` continues a word for the purpose of whole-word replacement.
const fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == '$'
}

/// What the words of a method body stand for during one invocation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bindings<'a> {
    /// Parameter names with their current text.
    pub named:      &'a [(String, String)],
    /// `$0`, `$1`, ... in order.
    pub positional: &'a [String],
    /// Class whose name replaces `self` in `self.member`.
    pub owner:      Option<&'a str>,
}

impl Bindings<'_> {
    /// Rewrites one body line.
    ///
    /// # Example
    /// ```
    /// use quill::interpreter::executor::substitute::Bindings;
    ///
    /// let named = vec![("msg".to_string(), "n".to_string()), ("n".to_string(), "3".to_string())];
    /// let positional = vec!["n".to_string(), "3".to_string()];
    /// let bindings = Bindings { named: &named, positional: &positional, owner: Some("Point") };
    ///
    /// assert_eq!(bindings.apply("say msg n nn \"n\""), "say n 3 nn \"3\"");
    /// assert_eq!(bindings.apply("say [$0] $1 $7"), "say [n] 3 $7");
    /// assert_eq!(bindings.apply("self.n = n"), "Point.n = 3");
    /// ```
    #[must_use]
    pub fn apply(&self, line: &str) -> String {
        let mut out = String::with_capacity(line.len());
        let mut word_start = None;

        for (i, c) in line.char_indices() {
            match (is_word_char(c), word_start) {
                (true, None) => word_start = Some(i),
                (false, Some(start)) => {
                    self.push_word(&mut out, &line[start..i]);
                    word_start = None;
                    out.push(c);
                },
                (false, None) => out.push(c),
                (true, Some(_)) => {},
            }
        }
        if let Some(start) = word_start {
            self.push_word(&mut out, &line[start..]);
        }
        out
    }

    fn push_word(&self, out: &mut String, word: &str) {
        if let Some((_, value)) = self.named.iter().find(|(name, _)| name == word) {
            out.push_str(value);
            return;
        }
        let word = match (self.owner, word.strip_prefix("self.")) {
            (Some(owner), Some(member)) => {
                out.push_str(owner);
                out.push('.');
                member
            },
            _ => word,
        };
        self.push_positional(out, word);
    }

    /// Copies `word`, replacing each `$` followed by digits whose index has
    /// an argument.
    fn push_positional(&self, out: &mut String, word: &str) {
        let mut rest = word;
        while let Some(dollar) = rest.find('$') {
            out.push_str(&rest[..dollar]);
            let after = &rest[dollar + 1..];
            let digits = after.find(|c: char| !c.is_ascii_digit()).unwrap_or(after.len());
            let argument = after[..digits].parse::<usize>()
                                          .ok()
                                          .and_then(|i| self.positional.get(i));
            match argument {
                Some(argument) => out.push_str(argument),
                None => out.push_str(&rest[dollar..=dollar + digits]),
            }
            rest = &after[digits..];
        }
        out.push_str(rest);
    }
}
