use tracing::debug;

use super::{builtin, substitute::Bindings};
use crate::{error::RuntimeError,
            host::Host,
            interpreter::{operand::split_arguments,
                          session::{EvalResult, MAX_CALL_DEPTH, Session, Signal},
                          store::class::{MethodKind, Visibility},
                          value::Value}};

impl<H: Host> Session<H> {
    /// Calls `name` with the raw argument text of a call token.
    ///
    /// Arguments are resolved left to right before anything runs. User
    /// methods shadow builtins of the same name.
    ///
    /// # Parameters
    /// - `name`: Method, `Class.method` or builtin name.
    /// - `arguments`: The text between the call parentheses.
    ///
    /// # Returns
    /// The signal the body ended with; the result is in LastValue.
    pub(crate) fn call(&mut self, name: &str, arguments: &str) -> EvalResult<Signal> {
        let mut values = Vec::new();
        for argument in split_arguments(arguments) {
            values.push(self.resolve(&argument)?);
        }

        if self.store.has_method(name) {
            return self.invoke(name, &values);
        }
        match builtin::call(&mut self.host, name, &values) {
            Some(result) => {
                self.state.last_value = result?;
                Ok(Signal::Continue)
            },
            None => Err(RuntimeError::UndefinedMethod { name: name.to_string() }),
        }
    }

    /// Invokes a user method or template by textual substitution.
    ///
    /// Every body line is rewritten with the argument values and then run as
    /// if it had been typed. `Break` and `Return` end the body; the sweep
    /// runs once the outermost invocation has returned.
    pub(crate) fn invoke(&mut self, name: &str, arguments: &[Value]) -> EvalResult<Signal> {
        let method = self.store
                         .method(name)
                         .cloned()
                         .ok_or_else(|| RuntimeError::UndefinedMethod { name: name.to_string() })?;

        if method.visibility == Visibility::Private
           && self.state.class_context.last() != method.owner.as_ref()
        {
            return Err(RuntimeError::invalid(format!("method '{name}' is private")));
        }
        if self.state.call_depth >= MAX_CALL_DEPTH {
            return Err(RuntimeError::invalid(format!("'{name}' nested deeper than {MAX_CALL_DEPTH} calls")));
        }

        let (named, positional): (Vec<(String, String)>, Vec<String>) = match &method.kind {
            MethodKind::Parameterized(params) => {
                if arguments.len() > params.len() {
                    return Err(RuntimeError::invalid(format!("'{name}' takes {} arguments, got {}",
                                                             params.len(),
                                                             arguments.len())));
                }
                let named = self.bind_parameters(name, arguments);
                let positional = named.iter().map(|(_, value)| value.clone()).collect();
                (named, positional)
            },
            MethodKind::Template(arity) => {
                if arguments.len() != *arity {
                    return Err(RuntimeError::invalid(format!("template '{name}' takes {arity} arguments, got {}",
                                                             arguments.len())));
                }
                (Vec::new(), arguments.iter().map(ToString::to_string).collect())
            },
        };
        let bindings = Bindings { named:      &named,
                                  positional: &positional,
                                  owner:      method.owner.as_deref() };
        let lines: Vec<String> = method.lines.iter().map(|line| bindings.apply(line)).collect();

        debug!(method = name, arguments = arguments.len(), "invoke");
        self.state.last_value = Value::Absent;
        self.enter(name, method.owner.clone());
        let signal = self.run_block(&lines);
        self.leave(method.owner.is_some());
        self.collect_garbage();

        Ok(match signal {
            Signal::Break | Signal::Return => Signal::Continue,
            signal => signal,
        })
    }

    /// Stores `arguments` in the method's parameters and returns every
    /// parameter's name with its current text. Parameters without an
    /// argument keep the value of the previous call.
    fn bind_parameters(&mut self, name: &str, arguments: &[Value]) -> Vec<(String, String)> {
        let Some(method) = self.store.method_mut(name) else {
            return Vec::new();
        };
        let MethodKind::Parameterized(params) = &mut method.kind else {
            return Vec::new();
        };
        params.iter_mut()
              .enumerate()
              .map(|(i, param)| {
                  if let Some(argument) = arguments.get(i) {
                      param.value = argument.clone();
                  }
                  (param.name.clone(), param.value.to_string())
              })
              .collect()
    }

    fn enter(&mut self, name: &str, owner: Option<String>) {
        let state = &mut self.state;
        state.call_depth += 1;
        state.executions += 1;
        state.method_stack.push(name.to_string());
        if let Some(owner) = owner {
            state.class_context.push(owner);
        }
    }

    fn leave(&mut self, owned: bool) {
        let state = &mut self.state;
        state.call_depth = state.call_depth.saturating_sub(1);
        state.executions = state.executions.saturating_sub(1);
        state.method_stack.pop();
        if owned {
            state.class_context.pop();
        }
    }
}
