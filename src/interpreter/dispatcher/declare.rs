use tracing::debug;

use crate::{error::RuntimeError,
            host::Host,
            interpreter::{condition::Predicate,
                          operand::{is_name, split_arguments, split_index},
                          session::{EvalResult, Session, Signal},
                          stack::{Operator, fold, strip_group},
                          store::entity::List,
                          value::Value}};

impl<H: Host> Session<H> {
    /// `x = v` and the compound forms `x += v`, `x -= v`, ...
    ///
    /// On a list, `+=` appends and `-=` removes the first equal element.
    pub(super) fn assign(&mut self, target: &str, op: &str, token: &str) -> EvalResult<Signal> {
        if let Some((list, index)) = split_index(target) {
            if op != "=" {
                return Err(RuntimeError::InvalidOperator { operator: op.to_string() });
            }
            let index = self.resolve(index)?;
            let position =
                index.as_number()
                     .ok_or_else(|| RuntimeError::ConversionError { value: index.to_string() })?;
            let item = self.resolve(token)?.to_string();
            self.store.list_mut(list)?.set(position, item)?;
            return Ok(Signal::Continue);
        }

        if self.store.lists.contains(target) {
            let item = self.resolve(token)?.to_string();
            let list = self.store.list_mut(target)?;
            match op {
                "+=" => list.push(item),
                "-=" if list.remove_first(&item) => {},
                "-=" => {
                    return Err(RuntimeError::invalid(format!("'{item}' is not in list '{target}'")));
                },
                _ => return Err(RuntimeError::InvalidOperator { operator: op.to_string() }),
            }
            return Ok(Signal::Continue);
        }

        if !is_name(target) {
            return Err(RuntimeError::invalid(format!("cannot assign to '{target}'")));
        }
        let value = self.resolve(token)?;
        let value = match op.strip_suffix('=').filter(|symbol| !symbol.is_empty()) {
            Some(symbol) => {
                let operator = symbol.parse::<Operator>()?;
                let current = self.resolve(target)?;
                fold(&[current, value], &[operator])?
            },
            None => value,
        };
        let collectable = self.collectable();
        self.store.set_variable(target, value, collectable)?;
        Ok(Signal::Continue)
    }

    /// `x = a OP b`.
    pub(super) fn assign_folded(&mut self,
                                target: &str,
                                left: &str,
                                op: &str,
                                right: &str)
                                -> EvalResult<Signal> {
        if !is_name(target) {
            return Err(RuntimeError::invalid(format!("cannot assign to '{target}'")));
        }
        let value = self.fold_operands(left, op, right)?;
        let collectable = self.collectable();
        self.store.set_variable(target, value, collectable)?;
        Ok(Signal::Continue)
    }

    /// `var x`: declares `x` holding no value.
    pub(super) fn declare(&mut self, name: &str) -> EvalResult<Signal> {
        if !is_name(name) {
            return Err(RuntimeError::invalid(format!("'{name}' is not a valid name")));
        }
        let collectable = self.collectable();
        self.store.set_variable(name, Value::Absent, collectable)?;
        Ok(Signal::Continue)
    }

    pub(super) fn define_constant(&mut self, name: &str, token: &str) -> EvalResult<Signal> {
        if !is_name(name) {
            return Err(RuntimeError::invalid(format!("'{name}' is not a valid name")));
        }
        let value = self.resolve(token)?;
        self.store.define_constant(name, value)?;
        Ok(Signal::Continue)
    }

    /// `list L` or `list L = (a, b)`. A list name as initializer copies it.
    pub(super) fn declare_list(&mut self, name: &str, items: Option<&str>) -> EvalResult<Signal> {
        if !is_name(name) {
            return Err(RuntimeError::invalid(format!("'{name}' is not a valid name")));
        }
        if self.store.has_variable(name) || self.store.constants.contains(name) {
            return Err(RuntimeError::AlreadyDefined { name: name.to_string() });
        }

        let items = match items {
            None => Vec::new(),
            Some(source) if source.starts_with('(') => {
                let mut items = Vec::new();
                for argument in split_arguments(strip_group(source)) {
                    items.push(self.resolve_lenient(&argument)?.to_string());
                }
                items
            },
            Some(source) => match self.store.lists.get(source) {
                Some(list) => list.items.clone(),
                None => vec![self.resolve(source)?.to_string()],
            },
        };

        let mut list = List::new(name, items);
        list.collectable = self.collectable();
        self.store.lists.insert(list);
        Ok(Signal::Continue)
    }

    /// `sort L`, `reverse L` and `revert L`.
    pub(super) fn reorder(&mut self, order: &str, name: &str) -> EvalResult<Signal> {
        let list = self.store.list_mut(name)?;
        match order {
            "sort" => list.sort(),
            "reverse" => list.reverse(),
            _ => list.revert()?,
        }
        Ok(Signal::Continue)
    }

    pub(super) fn remove(&mut self, name: &str) -> EvalResult<Signal> {
        let kind = self.store.remove(name)?;
        debug!(name, %kind, "removed");
        Ok(Signal::Continue)
    }

    pub(super) fn set_locked(&mut self, name: &str, locked: bool) -> EvalResult<Signal> {
        self.store.set_locked(name, locked)?;
        Ok(Signal::Continue)
    }

    /// The `clear_*!` family. Locked entities survive.
    pub(super) fn clear(&mut self, command: &str) -> EvalResult<Signal> {
        let store = &mut self.store;
        let cleared = match command {
            "clear_all!" => {
                store.clear_variables()
                + store.clear_lists()
                + store.clear_classes()
                + store.clear_methods()
                + store.clear_constants()
                + store.clear_modules()
            },
            "clear_variables!" => store.clear_variables(),
            "clear_lists!" => store.clear_lists(),
            "clear_classes!" => store.clear_classes(),
            "clear_methods!" => store.clear_methods(),
            "clear_constants!" => store.clear_constants(),
            "clear_modules!" => store.clear_modules(),
            other => return Err(RuntimeError::invalid(format!("unknown command '{other}'"))),
        };
        debug!(command, cleared, "cleared");
        Ok(Signal::Continue)
    }

    /// `variables`, `lists`, `methods`, ...: prints what is registered.
    pub(super) fn list_names(&mut self, listing: &str) -> EvalResult<Signal> {
        let store = &self.store;
        let mut lines: Vec<String> = match listing {
            "variables" => store.variables
                                .iter()
                                .map(|v| format!("{} = {}", v.name, v.value))
                                .collect(),
            "constants" => store.constants
                                .iter()
                                .map(|c| format!("{} = {}", c.name, c.value))
                                .collect(),
            "lists" => store.lists
                            .iter()
                            .map(|l| format!("{} = ({})", l.name, l.items.join(", ")))
                            .collect(),
            "methods" => store.methods.sorted_names().iter().map(ToString::to_string).collect(),
            "classes" => store.classes.sorted_names().iter().map(ToString::to_string).collect(),
            _ => store.modules.sorted_names().iter().map(ToString::to_string).collect(),
        };
        lines.sort();
        for line in lines {
            self.host.write(&format!("{line}\n"));
        }
        Ok(Signal::Continue)
    }

    /// `x is_number?` and friends: prints `true` or `false`.
    pub(super) fn inspect(&mut self, subject: &str, predicate: &str) -> EvalResult<Signal> {
        let predicate = predicate.parse::<Predicate>()
                                 .map_err(|()| RuntimeError::InvalidOperator {
                                     operator: predicate.to_string(),
                                 })?;
        let verdict = Value::from(self.check(subject, predicate)?);
        self.host.write(&format!("{verdict}\n"));
        self.state.last_value = verdict;
        Ok(Signal::Continue)
    }
}
