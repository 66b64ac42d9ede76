//! The symbol store: every named entity a session knows about.
//!
//! Variables, lists, classes, methods, constants and modules each live in
//! their own [`Registry`]. Dotted names such as `Point.x` are resolved
//! against class membership first and only then as flat global names.

/// Classes, methods and their visibility.
pub mod class;
/// Variables, lists, constants and modules.
pub mod entity;
/// The ordered name-keyed collection behind every namespace.
pub mod registry;
/// Loaded script text and its `goto` marks.
pub mod script;

use class::{Class, Method};
use entity::{Constant, List, Module, Variable};
use registry::Registry;
use script::Script;

use crate::{error::RuntimeError,
            interpreter::{frame::Frame, session::EvalResult, value::Value}};

/// What kind of entity a name referred to, as reported by `remove`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Variable,
    List,
    Class,
    Method,
    Module,
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Variable => "variable",
            Self::List => "list",
            Self::Class => "class",
            Self::Method => "method",
            Self::Module => "module",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Default)]
pub struct Store {
    pub variables: Registry<Variable>,
    pub lists:     Registry<List>,
    pub classes:   Registry<Class>,
    pub methods:   Registry<Method>,
    pub constants: Registry<Constant>,
    pub modules:   Registry<Module>,
    /// The script being run, if any; `goto` looks up its marks.
    pub script:    Option<Script>,
    /// The definition frame collecting lines, if one is open.
    pub frame:     Option<Frame>,
}

/// Splits `Class.member` at the first dot.
#[must_use]
pub fn split_member(name: &str) -> Option<(&str, &str)> {
    name.split_once('.')
        .filter(|(owner, member)| !owner.is_empty() && !member.is_empty())
}

impl Store {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks a variable up, trying class membership before the flat name.
    #[must_use]
    pub fn variable(&self, name: &str) -> Option<&Variable> {
        if let Some((owner, member)) = split_member(name)
           && let Some(variable) = self.classes.get(owner).and_then(|c| c.variables.get(member))
        {
            return Some(variable);
        }
        self.variables.get(name)
    }

    pub fn variable_mut(&mut self, name: &str) -> Option<&mut Variable> {
        if let Some((owner, member)) = split_member(name)
           && self.classes.get(owner).is_some_and(|c| c.variables.contains(member))
        {
            return self.classes
                       .get_mut(owner)
                       .and_then(|c| c.variables.get_mut(member));
        }
        self.variables.get_mut(name)
    }

    #[must_use]
    pub fn has_variable(&self, name: &str) -> bool {
        self.variable(name).is_some()
    }

    /// Looks a method up; `Class.method` only matches class methods.
    #[must_use]
    pub fn method(&self, name: &str) -> Option<&Method> {
        match split_member(name) {
            Some((owner, member)) => self.classes.get(owner).and_then(|c| c.methods.get(member)),
            None => self.methods.get(name),
        }
    }

    pub fn method_mut(&mut self, name: &str) -> Option<&mut Method> {
        match split_member(name) {
            Some((owner, member)) => self.classes
                                         .get_mut(owner)
                                         .and_then(|c| c.methods.get_mut(member)),
            None => self.methods.get_mut(name),
        }
    }

    #[must_use]
    pub fn has_method(&self, name: &str) -> bool {
        self.method(name).is_some()
    }

    /// Assigns `value` to `name`, creating the variable when needed.
    ///
    /// A dotted name whose prefix is a class becomes a class member. New
    /// variables take the `collectable` flag; existing ones keep theirs.
    ///
    /// # Errors
    /// `AlreadyDefined` when `name` is a constant.
    pub fn set_variable(&mut self, name: &str, value: Value, collectable: bool) -> EvalResult<()> {
        if self.constants.contains(name) {
            return Err(RuntimeError::AlreadyDefined { name: name.to_string() });
        }
        if let Some(variable) = self.variable_mut(name) {
            variable.value = value;
            return Ok(());
        }

        let target = match split_member(name) {
            Some((owner, member)) if self.classes.contains(owner) => {
                self.classes
                    .get_mut(owner)
                    .map(|c| (&mut c.variables, member))
            },
            _ => None,
        };
        let (registry, name) = target.unwrap_or((&mut self.variables, name));
        let mut variable = Variable::new(name, value);
        variable.collectable = collectable;
        registry.insert(variable);
        Ok(())
    }

    /// Defines a write-once constant.
    ///
    /// # Errors
    /// `AlreadyDefined` when a constant or variable of that name exists.
    pub fn define_constant(&mut self, name: &str, value: Value) -> EvalResult<()> {
        if self.constants.contains(name) || self.has_variable(name) {
            return Err(RuntimeError::AlreadyDefined { name: name.to_string() });
        }
        self.constants.insert(Constant { name: name.to_string(),
                                         value });
        Ok(())
    }

    /// # Errors
    /// `UndefinedList` when no list is called `name`.
    pub fn list(&self, name: &str) -> EvalResult<&List> {
        self.lists
            .get(name)
            .ok_or_else(|| RuntimeError::UndefinedList { name: name.to_string() })
    }

    /// # Errors
    /// `UndefinedList` when no list is called `name`.
    pub fn list_mut(&mut self, name: &str) -> EvalResult<&mut List> {
        self.lists
            .get_mut(name)
            .ok_or_else(|| RuntimeError::UndefinedList { name: name.to_string() })
    }

    /// # Errors
    /// `UndefinedClass` when no class is called `name`.
    pub fn class(&self, name: &str) -> EvalResult<&Class> {
        self.classes
            .get(name)
            .ok_or_else(|| RuntimeError::UndefinedClass { name: name.to_string() })
    }

    /// Whether `name` is taken by any entity that cannot share it.
    #[must_use]
    pub fn is_defined(&self, name: &str) -> bool {
        self.has_variable(name)
        || self.lists.contains(name)
        || self.classes.contains(name)
        || self.has_method(name)
        || self.constants.contains(name)
        || self.modules.contains(name)
    }

    /// Removes whatever entity `name` refers to.
    ///
    /// # Errors
    /// `InvalidOperation` for constants and indestructible entities,
    /// `UndefinedVariable` when nothing matches.
    pub fn remove(&mut self, name: &str) -> EvalResult<Kind> {
        if self.constants.contains(name) {
            return Err(RuntimeError::invalid(format!("constant '{name}' cannot be removed")));
        }
        if self.is_locked(name) {
            return Err(RuntimeError::invalid(format!("'{name}' is locked")));
        }

        if let Some((owner, member)) = split_member(name)
           && let Some(class) = self.classes.get_mut(owner)
        {
            if class.variables.remove(member).is_some() {
                return Ok(Kind::Variable);
            }
            if class.methods.remove(member).is_some() {
                return Ok(Kind::Method);
            }
        }
        if self.variables.remove(name).is_some() {
            return Ok(Kind::Variable);
        }
        if self.lists.remove(name).is_some() {
            return Ok(Kind::List);
        }
        if self.classes.remove(name).is_some() {
            return Ok(Kind::Class);
        }
        if self.methods.remove(name).is_some() {
            return Ok(Kind::Method);
        }
        if self.modules.remove(name).is_some() {
            return Ok(Kind::Module);
        }
        Err(RuntimeError::UndefinedVariable { name: name.to_string() })
    }

    /// Marks `name` as (in)destructible.
    ///
    /// # Errors
    /// `UndefinedVariable` when nothing of that name can be locked.
    pub fn set_locked(&mut self, name: &str, locked: bool) -> EvalResult<()> {
        if let Some(variable) = self.variable_mut(name) {
            variable.indestructible = locked;
        } else if let Some(list) = self.lists.get_mut(name) {
            list.indestructible = locked;
        } else if let Some(class) = self.classes.get_mut(name) {
            class.indestructible = locked;
        } else if let Some(method) = self.method_mut(name) {
            method.indestructible = locked;
        } else if let Some(module) = self.modules.get_mut(name) {
            module.indestructible = locked;
        } else {
            return Err(RuntimeError::UndefinedVariable { name: name.to_string() });
        }
        Ok(())
    }

    fn is_locked(&self, name: &str) -> bool {
        self.variable(name).is_some_and(|v| v.indestructible)
        || self.lists.get(name).is_some_and(|l| l.indestructible)
        || self.classes.get(name).is_some_and(|c| c.indestructible)
        || self.method(name).is_some_and(|m| m.indestructible)
        || self.modules.get(name).is_some_and(|m| m.indestructible)
    }

    /// Drops every unlocked variable; returns how many went.
    pub fn clear_variables(&mut self) -> usize {
        self.variables.retain(|v| v.indestructible)
    }

    pub fn clear_lists(&mut self) -> usize {
        self.lists.retain(|l| l.indestructible)
    }

    pub fn clear_classes(&mut self) -> usize {
        self.classes.retain(|c| c.indestructible)
    }

    pub fn clear_methods(&mut self) -> usize {
        self.methods.retain(|m| m.indestructible)
    }

    pub fn clear_constants(&mut self) -> usize {
        let count = self.constants.len();
        self.constants.clear();
        count
    }

    pub fn clear_modules(&mut self) -> usize {
        self.modules.retain(|m| m.indestructible)
    }

    /// Clears every namespace, the open frame and the script.
    pub fn clear_all(&mut self) {
        self.variables.clear();
        self.lists.clear();
        self.classes.clear();
        self.methods.clear();
        self.constants.clear();
        self.modules.clear();
        self.script = None;
        self.frame = None;
    }
}
