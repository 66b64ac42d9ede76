use super::{Closer, Nesting};
use crate::interpreter::{condition::Condition, lexer::Statement};

/// One `if`, `unless`, `elsif` or `else` arm.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub condition: Condition,
    /// Set for `unless`.
    pub negated:   bool,
    pub body:      Vec<String>,
}

impl Candidate {
    #[must_use]
    pub const fn new(condition: Condition, negated: bool) -> Self {
        Self { condition,
               negated,
               body: Vec::new() }
    }
}

/// An `if` chain collected up to its `endif`.
///
/// Conditions are evaluated only after the chain closes, in declaration
/// order; the first true candidate runs and the rest are skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct IfChain {
    pub candidates: Vec<Candidate>,
    nesting:        Nesting,
}

impl IfChain {
    #[must_use]
    pub fn new(first: Candidate) -> Self {
        Self { candidates: vec![first],
               nesting:    Nesting::default(), }
    }

    pub(super) fn feed(&mut self, statement: &Statement) -> bool {
        if self.nesting.is_top() {
            match (statement.keyword(), statement.arity()) {
                ("elsif", _) => {
                    let condition = Condition::parse(&statement.tokens[1..]);
                    self.candidates.push(Candidate::new(condition, false));
                    return false;
                },
                ("else", 0) => {
                    self.candidates.push(Candidate::new(Condition::Always, false));
                    return false;
                },
                _ => {},
            }
        }
        if self.nesting.closes(statement, &Closer::EndIf) {
            return true;
        }
        if let Some(candidate) = self.candidates.last_mut() {
            candidate.body.push(statement.text.clone());
        }
        false
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bucket {
    /// Lines before the first `case` are dropped.
    Preamble,
    Case(usize),
    Default,
}

/// A `switch` block: case labels and their lines.
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchBlock {
    /// The operand whose value selects the case.
    pub subject: String,
    /// Label tokens, resolved only when the switch runs, and their lines.
    pub cases:   Vec<(Vec<String>, Vec<String>)>,
    pub default: Option<Vec<String>>,
    bucket:      Bucket,
    nesting:     Nesting,
}

impl SwitchBlock {
    #[must_use]
    pub fn new(subject: impl Into<String>) -> Self {
        Self { subject: subject.into(),
               cases:   Vec::new(),
               default: None,
               bucket:  Bucket::Preamble,
               nesting: Nesting::default(), }
    }

    pub(super) fn feed(&mut self, statement: &Statement) -> bool {
        if self.nesting.is_top() {
            match (statement.keyword(), statement.arity()) {
                ("case", n) if n > 0 => {
                    self.cases.push((statement.tokens[1..].to_vec(), Vec::new()));
                    self.bucket = Bucket::Case(self.cases.len() - 1);
                    return false;
                },
                ("default", 0) => {
                    self.default.get_or_insert_with(Vec::new);
                    self.bucket = Bucket::Default;
                    return false;
                },
                _ => {},
            }
        }
        if self.nesting.closes(statement, &Closer::End) {
            return true;
        }
        let text = statement.text.clone();
        match self.bucket {
            Bucket::Preamble => {},
            Bucket::Case(i) => self.cases[i].1.push(text),
            Bucket::Default => self.default.get_or_insert_with(Vec::new).push(text),
        }
        false
    }
}

/// A `try` block with an optional `catch` handler.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TryBlock {
    pub body:      Vec<String>,
    pub handler:   Vec<String>,
    /// Variable that receives the error message in `catch e`.
    pub error_var: Option<String>,
    in_handler:    bool,
    nesting:       Nesting,
}

impl TryBlock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(super) fn feed(&mut self, statement: &Statement) -> bool {
        if self.nesting.is_top() && statement.keyword() == "catch" && statement.arity() <= 1 {
            self.in_handler = true;
            self.error_var = statement.tokens.get(1).cloned();
            return false;
        }
        if self.nesting.closes(statement, &Closer::End) {
            return true;
        }
        let lines = if self.in_handler { &mut self.handler } else { &mut self.body };
        lines.push(statement.text.clone());
        false
    }
}
