use super::{entity::Variable,
            registry::{Named, Registry}};
use crate::interpreter::value::Value;

/// Whether a class method can be called from outside the class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Public,
    /// Callable only while a method of the same class is executing.
    Private,
}

/// How a method receives its arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum MethodKind {
    /// Named parameters that keep their last bound value between calls.
    Parameterized(Vec<Variable>),
    /// A template taking exactly this many positional arguments, referenced
    /// in the body as `$0`, `$1`, and so on.
    Template(usize),
}

/// A user-defined method or template.
#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    pub name:           String,
    pub lines:          Vec<String>,
    pub kind:           MethodKind,
    /// The class or object the method belongs to. `self.` in the body is
    /// rewritten to this name.
    pub owner:          Option<String>,
    pub visibility:     Visibility,
    pub indestructible: bool,
}

impl Named for Method {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Method {
    /// Builds an empty method from the token after `method` or `template`.
    ///
    /// Signatures are never rejected: a missing parameter list means no
    /// parameters, and a template arity that is not a number is taken from
    /// the number of comma separated entries.
    ///
    /// # Example
    /// ```
    /// use quill::interpreter::store::class::{Method, MethodKind};
    ///
    /// let greet = Method::parse("greet(who, times)", false);
    /// assert_eq!(greet.name, "greet");
    /// assert!(matches!(greet.kind, MethodKind::Parameterized(ref p) if p.len() == 2));
    ///
    /// let pair = Method::parse("pair(2)", true);
    /// assert_eq!(pair.kind, MethodKind::Template(2));
    /// ```
    #[must_use]
    pub fn parse(signature: &str, template: bool) -> Self {
        let (name, inner) = match signature.split_once('(') {
            Some((name, rest)) => (name, rest.trim_end_matches(')')),
            None => (signature, ""),
        };
        let entries: Vec<&str> = inner.split(',')
                                      .map(str::trim)
                                      .filter(|p| !p.is_empty())
                                      .collect();

        let kind = if template {
            let arity = match entries.as_slice() {
                [single] => single.parse().unwrap_or(1),
                other => other.len(),
            };
            MethodKind::Template(arity)
        } else {
            let params = entries.iter()
                                .map(|p| {
                                    let mut param = Variable::new(*p, Value::Absent);
                                    param.collectable = true;
                                    param
                                })
                                .collect();
            MethodKind::Parameterized(params)
        };

        Self { name: name.trim().to_string(),
               lines: Vec::new(),
               kind,
               owner: None,
               visibility: Visibility::Public,
               indestructible: false }
    }
}

/// A class: methods and member variables addressed as `Class.member`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Class {
    pub name:           String,
    pub methods:        Registry<Method>,
    pub variables:      Registry<Variable>,
    pub collectable:    bool,
    pub indestructible: bool,
}

impl Named for Class {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Class {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(),
               ..Self::default() }
    }

    /// Copies this class under a new name, re-owning every method so that
    /// `self.` in their bodies refers to the copy.
    #[must_use]
    pub fn instantiate(&self, name: &str) -> Self {
        let mut object = Self::new(name);
        for method in self.methods.iter() {
            let mut method = method.clone();
            method.owner = Some(name.to_string());
            object.methods.insert(method);
        }
        for variable in self.variables.iter() {
            object.variables.insert(variable.clone());
        }
        object
    }
}
