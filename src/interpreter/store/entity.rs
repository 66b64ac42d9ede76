use ordered_float::OrderedFloat;

use super::registry::Named;
use crate::{error::RuntimeError,
            interpreter::{session::EvalResult, value::Value},
            util::num::{f64_to_usize_checked, parse_number}};

/// A named value.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name:           String,
    pub value:          Value,
    /// Swept after the method, template or try body that created it ends.
    pub collectable:    bool,
    /// Survives `clear_*!` and `remove`.
    pub indestructible: bool,
}

impl Variable {
    #[must_use]
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self { name: name.into(),
               value,
               collectable: false,
               indestructible: false }
    }
}

impl Named for Variable {
    fn name(&self) -> &str {
        &self.name
    }
}

/// An ordered list of strings.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct List {
    pub name:           String,
    pub items:          Vec<String>,
    pub collectable:    bool,
    pub indestructible: bool,
    /// Order before the last `sort` or `reverse`, restored by `revert`.
    snapshot:           Option<Vec<String>>,
}

impl Named for List {
    fn name(&self) -> &str {
        &self.name
    }
}

impl List {
    #[must_use]
    pub fn new(name: impl Into<String>, items: Vec<String>) -> Self {
        Self { name: name.into(),
               items,
               ..Self::default() }
    }

    /// Element at `index`, which must be a non-negative number below the size.
    ///
    /// # Errors
    /// `OutOfBounds` when the index is negative or past the end.
    pub fn get(&self, index: f64) -> EvalResult<&str> {
        let i = f64_to_usize_checked(index, self.items.len())?;
        self.items
            .get(i)
            .map(String::as_str)
            .ok_or_else(|| self.out_of_bounds(index))
    }

    /// Replaces the element at `index`.
    ///
    /// # Errors
    /// `OutOfBounds` when the index is negative or past the end.
    pub fn set(&mut self, index: f64, item: String) -> EvalResult<()> {
        let i = f64_to_usize_checked(index, self.items.len())?;
        let error = self.out_of_bounds(index);
        let slot = self.items.get_mut(i).ok_or(error)?;
        *slot = item;
        Ok(())
    }

    pub fn push(&mut self, item: String) {
        self.items.push(item);
    }

    /// Removes the first element equal to `item`; returns whether one was found.
    pub fn remove_first(&mut self, item: &str) -> bool {
        match self.items.iter().position(|x| x == item) {
            Some(i) => {
                self.items.remove(i);
                true
            },
            None => false,
        }
    }

    /// Sorts numerically when every element is a number, lexically otherwise.
    pub fn sort(&mut self) {
        self.snapshot = Some(self.items.clone());
        let keys: Option<Vec<f64>> = self.items.iter().map(|x| parse_number(x)).collect();
        match keys {
            Some(keys) => {
                let mut keyed: Vec<(OrderedFloat<f64>, String)> =
                    keys.into_iter().map(OrderedFloat).zip(self.items.drain(..)).collect();
                keyed.sort_by(|a, b| a.0.cmp(&b.0));
                self.items = keyed.into_iter().map(|(_, item)| item).collect();
            },
            None => self.items.sort(),
        }
    }

    pub fn reverse(&mut self) {
        self.snapshot = Some(self.items.clone());
        self.items.reverse();
    }

    /// Restores the order from before the last `sort` or `reverse`.
    ///
    /// # Errors
    /// `InvalidOperation` when the list was never reordered.
    pub fn revert(&mut self) -> EvalResult<()> {
        match self.snapshot.take() {
            Some(items) => {
                self.items = items;
                Ok(())
            },
            None => Err(RuntimeError::invalid(format!("list '{}' has no order to revert to",
                                                       self.name))),
        }
    }

    fn out_of_bounds(&self, index: f64) -> RuntimeError {
        RuntimeError::OutOfBounds { index: Value::Num(index).to_string(),
                                    size:  self.items.len(), }
    }
}

/// A write-once value.
#[derive(Debug, Clone, PartialEq)]
pub struct Constant {
    pub name:  String,
    pub value: Value,
}

impl Named for Constant {
    fn name(&self) -> &str {
        &self.name
    }
}

/// A named block of lines run by writing its name as a statement.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Module {
    pub name:           String,
    pub lines:          Vec<String>,
    pub indestructible: bool,
}

impl Named for Module {
    fn name(&self) -> &str {
        &self.name
    }
}
