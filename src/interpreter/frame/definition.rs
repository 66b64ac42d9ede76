use super::{Closer, Feed, Nesting};
use crate::interpreter::{lexer::Statement,
                         store::{class::{Class, Method, Visibility},
                                 entity::Module}};

/// A method or template body being collected.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodBuilder {
    pub method: Method,
    nesting:    Nesting,
}

impl MethodBuilder {
    #[must_use]
    pub fn new(method: Method) -> Self {
        Self { method,
               nesting: Nesting::default() }
    }

    pub(super) fn feed(&mut self, statement: &Statement) -> bool {
        if self.nesting.closes(statement, &Closer::End) {
            return true;
        }
        self.method.lines.push(statement.text.clone());
        false
    }
}

/// A class body being collected.
///
/// Inside the body only `public`, `private`, member declarations and nested
/// `method`/`template` blocks are meaningful.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassBuilder {
    pub class:  Class,
    visibility: Visibility,
    cursor:     Option<MethodBuilder>,
}

impl ClassBuilder {
    #[must_use]
    pub fn new(class: Class) -> Self {
        Self { class,
               visibility: Visibility::Public,
               cursor: None }
    }

    pub(super) fn feed(&mut self, statement: &Statement) -> Feed {
        if let Some(cursor) = self.cursor.as_mut() {
            if cursor.feed(statement) {
                self.finish_method();
            }
            return Feed::Buffered;
        }

        match (statement.keyword(), statement.arity()) {
            ("public", 0) => self.visibility = Visibility::Public,
            ("private", 0) => self.visibility = Visibility::Private,
            (keyword @ ("method" | "template"), 1) => {
                let method = Method::parse(&statement.tokens[1], keyword == "template");
                self.cursor = Some(MethodBuilder::new(method));
            },
            ("end" | "}", 0) => return Feed::Close,
            _ => return Feed::Member(statement.clone()),
        }
        Feed::Buffered
    }

    fn finish_method(&mut self) {
        if let Some(builder) = self.cursor.take() {
            let mut method = builder.method;
            method.owner = Some(self.class.name.clone());
            method.visibility = self.visibility;
            self.class.methods.insert(method);
        }
    }
}

/// A `[Name]` module body being collected.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleBuilder {
    pub module: Module,
    nesting:    Nesting,
}

impl ModuleBuilder {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { module:  Module { name: name.into(),
                                 ..Module::default() },
               nesting: Nesting::default(), }
    }

    pub(super) fn feed(&mut self, statement: &Statement) -> bool {
        let closer = Closer::Module(self.module.name.clone());
        if self.nesting.closes(statement, &closer) {
            return true;
        }
        self.module.lines.push(statement.text.clone());
        false
    }
}

/// An embedded script between `__begin__ path` and `__end__`, written to
/// `path` when the block closes.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptBuilder {
    pub path:  String,
    pub lines: Vec<String>,
    nesting:   Nesting,
}

impl ScriptBuilder {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self { path:    path.into(),
               lines:   Vec::new(),
               nesting: Nesting::default(), }
    }

    pub(super) fn feed(&mut self, statement: &Statement) -> bool {
        if self.nesting.closes(statement, &Closer::Script) {
            return true;
        }
        self.lines.push(statement.text.clone());
        false
    }

    /// The file contents, one statement per line.
    #[must_use]
    pub fn contents(&self) -> String {
        self.lines.iter().map(|l| format!("{l}\n")).collect()
    }
}
