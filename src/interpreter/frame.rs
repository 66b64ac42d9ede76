//! Definition frames.
//!
//! When a block opener such as `if`, `for` or `method` is executed, the
//! session opens a [`Frame`] and every following statement is fed to it
//! instead of being run. The frame closes on its matching terminator, and
//! only then is the collected block executed or stored.
//!
//! Nested blocks are buffered verbatim. A [`Nesting`] tracker keeps a stack
//! of the terminators it expects so that an inner `endif` or `end` never
//! closes the outer frame.

/// `if` chains, `switch` and `try` blocks.
pub mod branch;
/// Methods, classes, modules and embedded scripts.
pub mod definition;
/// `for` and `while` loops.
pub mod looping;

pub use branch::{Candidate, IfChain, SwitchBlock, TryBlock};
pub use definition::{ClassBuilder, MethodBuilder, ModuleBuilder, ScriptBuilder};
pub use looping::{ForLoop, ForSource, WhileLoop};

use crate::interpreter::lexer::Statement;

/// The terminator a block opener expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Closer {
    /// `endif`
    EndIf,
    /// `next` or `endfor`
    Next,
    /// `end` or `}`
    End,
    /// `[/Name]`
    Module(String),
    /// `__end__`
    Script,
}

/// The terminator `statement` expects, if it opens a block.
#[must_use]
pub fn opener(statement: &Statement) -> Option<Closer> {
    let tokens = &statement.tokens;
    match statement.keyword() {
        "if" | "unless" => Some(Closer::EndIf),
        "for" => Some(Closer::Next),
        "while" | "switch" | "method" | "template" | "class" | "try" => Some(Closer::End),
        "object" if tokens.len() == 2 => Some(Closer::End),
        "__begin__" => Some(Closer::Script),
        word => module_name(word).map(|name| Closer::Module(name.to_string())),
    }
}

/// The terminator `statement` is, if it is one.
#[must_use]
pub fn closer(statement: &Statement) -> Option<Closer> {
    if statement.tokens.len() != 1 {
        return None;
    }
    match statement.keyword() {
        "endif" => Some(Closer::EndIf),
        "next" | "endfor" => Some(Closer::Next),
        "end" | "}" => Some(Closer::End),
        "__end__" => Some(Closer::Script),
        word => word.strip_prefix("[/")
                    .and_then(|rest| rest.strip_suffix(']'))
                    .map(|name| Closer::Module(name.to_string())),
    }
}

/// The name in a `[Name]` module header.
#[must_use]
pub fn module_name(token: &str) -> Option<&str> {
    let name = token.strip_prefix('[')?.strip_suffix(']')?;
    let valid = !name.is_empty() && !name.starts_with('/');
    valid.then_some(name)
}

/// Tracks blocks opened inside a frame's body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Nesting {
    open: Vec<Closer>,
}

impl Nesting {
    /// Records `statement`; returns true when it is `target` at the top
    /// level, which closes the frame.
    ///
    /// A terminator that does not match the innermost open block is treated
    /// as an ordinary body line.
    pub fn closes(&mut self, statement: &Statement, target: &Closer) -> bool {
        if let Some(found) = closer(statement) {
            if self.open.last() == Some(&found) {
                self.open.pop();
            } else if self.open.is_empty() && found == *target {
                return true;
            }
            return false;
        }
        if let Some(expected) = opener(statement) {
            self.open.push(expected);
        }
        false
    }

    /// Whether no nested block is open.
    #[must_use]
    pub fn is_top(&self) -> bool {
        self.open.is_empty()
    }
}

/// What the session should do after feeding a statement to the frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feed {
    /// The statement was buffered.
    Buffered,
    /// The statement closed the frame.
    Close,
    /// A class body member declaration to be evaluated by the session.
    Member(Statement),
}

/// The open definition frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    If(IfChain),
    For(ForLoop),
    While(WhileLoop),
    Switch(SwitchBlock),
    Try(TryBlock),
    Method(MethodBuilder),
    Class(ClassBuilder),
    Module(ModuleBuilder),
    Script(ScriptBuilder),
}

impl Frame {
    /// Feeds one statement to the frame.
    pub fn feed(&mut self, statement: &Statement) -> Feed {
        let closed = match self {
            Self::If(chain) => chain.feed(statement),
            Self::For(for_loop) => for_loop.feed(statement),
            Self::While(while_loop) => while_loop.feed(statement),
            Self::Switch(switch) => switch.feed(statement),
            Self::Try(block) => block.feed(statement),
            Self::Method(builder) => builder.feed(statement),
            Self::Module(builder) => builder.feed(statement),
            Self::Script(builder) => builder.feed(statement),
            Self::Class(builder) => return builder.feed(statement),
        };
        if closed { Feed::Close } else { Feed::Buffered }
    }

    /// Short name used in diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::If(_) => "if",
            Self::For(_) => "for",
            Self::While(_) => "while",
            Self::Switch(_) => "switch",
            Self::Try(_) => "try",
            Self::Method(_) => "method",
            Self::Class(_) => "class",
            Self::Module(_) => "module",
            Self::Script(_) => "script",
        }
    }
}
