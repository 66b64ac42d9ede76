/// Where the lexer is relative to quotes and parentheses.
///
/// Parenthesis nesting is a single flag: a second `(` does not deepen it and
/// the first `)` always leaves it, so `f(g(1), 2)` splits after the comma.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LexState {
    /// Outside quotes and parentheses.
    #[default]
    Plain,
    /// Inside a `"..."` literal.
    Quoted,
    /// Inside a parenthesized group.
    Grouped,
    /// Inside a quoted literal that is itself inside a group.
    GroupedQuoted,
}

/// What the lexer does with the character it just read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    /// Append the (possibly rewritten) character to the current token.
    Push(char),
    /// End the current token.
    Split,
    /// Drop the character from the token.
    Drop,
    /// Ignore the rest of the line.
    LineComment,
    /// Enter a block comment (consumes the second `#`).
    OpenBlock,
    /// End the statement; the rest of the line is a new statement.
    EndStatement,
}

/// A single statement cut from a source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    /// The statement source with comments removed. Re-tokenizing it yields
    /// `tokens` again, which is what buffered bodies rely on.
    pub text:   String,
    /// Whitespace separated tokens, quotes and parentheses preserved.
    pub tokens: Vec<String>,
}

impl Statement {
    /// Number of arguments after the leading keyword.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.tokens.len().saturating_sub(1)
    }

    /// The first token.
    #[must_use]
    pub fn keyword(&self) -> &str {
        self.tokens.first().map_or("", String::as_str)
    }
}

/// Splits source lines into statements and tokens.
///
/// The only state kept between lines is whether a `##` block comment is
/// open; quote and parenthesis state always resets at the end of a line and
/// after every `;`.
#[derive(Debug, Default, Clone)]
pub struct Tokenizer {
    in_block_comment: bool,
}

#[derive(Default)]
struct StatementBuilder {
    text:   String,
    tokens: Vec<String>,
    token:  String,
}

impl StatementBuilder {
    fn push(&mut self, c: char, original: char) {
        self.token.push(c);
        self.text.push(original);
    }

    fn split(&mut self, original: char) {
        self.flush();
        self.text.push(original);
    }

    fn flush(&mut self) {
        if !self.token.is_empty() {
            self.tokens.push(std::mem::take(&mut self.token));
        }
    }

    fn finish(mut self) -> Option<Statement> {
        self.flush();
        if self.tokens.is_empty() {
            return None;
        }
        Some(Statement { text:   self.text.trim().to_string(),
                         tokens: self.tokens, })
    }
}

/// The transition table of the lexer.
///
/// `next` is the character after `ch`, used to recognise `##` and `#{`.
const fn transition(state: LexState, ch: char, next: Option<char>) -> (LexState, Action) {
    use LexState::{Grouped, GroupedQuoted, Plain, Quoted};

    match (state, ch) {
        (Plain, ' ' | '\t') => (Plain, Action::Split),
        (Plain, '"') => (Quoted, Action::Push('"')),
        (Plain, '(') => (Grouped, Action::Push('(')),
        (Plain, '\\') => (Plain, Action::Drop),
        (Plain, '#') => match next {
            Some('#') => (Plain, Action::OpenBlock),
            Some('{') => (Plain, Action::Push('#')),
            _ => (Plain, Action::LineComment),
        },
        (Plain | Grouped, ';') => (Plain, Action::EndStatement),

        (Quoted, '"') => (Plain, Action::Push('"')),
        (Grouped, '"') => (GroupedQuoted, Action::Push('"')),
        (GroupedQuoted, '"') => (Grouped, Action::Push('"')),
        (Grouped, ')') => (Plain, Action::Push(')')),
        (Quoted | Grouped | GroupedQuoted, '\'') => (state, Action::Push('"')),

        (_, c) => (state, Action::Push(c)),
    }
}

impl Tokenizer {
    /// Creates a tokenizer with no open block comment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a `##` block comment is still open after the last line.
    #[must_use]
    pub const fn in_block_comment(&self) -> bool {
        self.in_block_comment
    }

    /// Tokenizes one source line into zero or more statements.
    ///
    /// Leading indentation is ignored. Malformed quoting or parenthesization
    /// is never rejected; it only moves token boundaries.
    ///
    /// # Example
    /// ```
    /// use quill::interpreter::lexer::Tokenizer;
    ///
    /// let mut tokenizer = Tokenizer::new();
    /// let statements = tokenizer.tokenize("\tsay \"a b\" # note; ignored");
    ///
    /// assert_eq!(statements.len(), 1);
    /// assert_eq!(statements[0].tokens, vec!["say", "\"a b\""]);
    /// ```
    pub fn tokenize(&mut self, line: &str) -> Vec<Statement> {
        let mut statements = Vec::new();
        let mut current = StatementBuilder::default();
        let mut state = LexState::Plain;
        let mut chars = line.trim_start().chars().peekable();

        while let Some(ch) = chars.next() {
            if self.in_block_comment {
                if ch == '#' && chars.peek() == Some(&'#') {
                    chars.next();
                    self.in_block_comment = false;
                }
                continue;
            }

            let (next_state, action) = transition(state, ch, chars.peek().copied());
            state = next_state;
            match action {
                Action::Push(c) => current.push(c, ch),
                Action::Split => current.split(ch),
                Action::Drop => current.text.push(ch),
                Action::LineComment => break,
                Action::OpenBlock => {
                    chars.next();
                    self.in_block_comment = true;
                    current.split(' ');
                },
                Action::EndStatement => {
                    statements.extend(std::mem::take(&mut current).finish());
                },
            }
        }

        statements.extend(current.finish());
        statements
    }
}

/// Tokenizes buffered statement text with a fresh tokenizer.
///
/// Bodies of methods and loops are stored as comment-free text, so they are
/// re-read without touching the block comment state of the session.
#[must_use]
pub fn tokenize_text(text: &str) -> Vec<Statement> {
    Tokenizer::new().tokenize(text)
}

/// Whether `token` is a double-quoted literal.
#[must_use]
pub fn is_quoted(token: &str) -> bool {
    token.len() >= 2 && token.starts_with('"') && token.ends_with('"')
}

/// Strips one pair of surrounding double quotes, if present.
#[must_use]
pub fn unquote(token: &str) -> &str {
    if is_quoted(token) { &token[1..token.len() - 1] } else { token }
}
