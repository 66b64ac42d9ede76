//! The statement dispatcher.
//!
//! A statement is routed on its keyword and the number of arguments that
//! follow it. While a definition frame is open every statement goes to the
//! frame instead; see [`crate::interpreter::frame`]. Anything that matches
//! no form is handed to the host shell.

/// Block openers: `if`, `for`, `while`, `switch`, `method`, `class`, ...
mod blocks;
/// Assignments, declarations and symbol management.
mod declare;
/// Console, filesystem, shell and script control.
mod io;

use tracing::trace;

use crate::{error::RuntimeError,
            host::Host,
            interpreter::{frame::{Feed, Frame, module_name},
                          lexer::Statement,
                          operand::split_call,
                          session::{EvalResult, Session, Signal},
                          stack::Operator,
                          store::entity::Variable,
                          value::Value}};

/// Whether `op` is `=` or a compound assignment such as `+=`.
#[must_use]
pub fn is_assignment(op: &str) -> bool {
    matches!(op, "=" | "+=" | "-=" | "*=" | "/=" | "%=" | "^=")
}

impl<H: Host> Session<H> {
    /// Executes one statement, or feeds it to the open frame.
    pub(crate) fn dispatch(&mut self, statement: &Statement) -> EvalResult<Signal> {
        if self.store.frame.is_some() {
            return self.feed_frame(statement);
        }
        trace!(statement = %statement.text, "dispatch");

        let tokens: Vec<&str> = statement.tokens.iter().map(String::as_str).collect();
        match tokens.as_slice() {
            [] => Ok(Signal::Continue),

            [target, op, value] if is_assignment(op) => self.assign(target, op, value),
            [target, "=", left, op, right] if op.parse::<Operator>().is_ok() => {
                self.assign_folded(target, left, op, right)
            },

            ["say", operands @ ..] => self.say(operands, true),
            ["print", operands @ ..] => self.say(operands, false),

            ["if", condition @ ..] => self.open_if(condition, false),
            ["unless", condition @ ..] => self.open_if(condition, true),
            ["for", header @ ..] => self.open_for(header),
            ["while", condition @ ..] => self.open_while(condition),
            ["switch", subject] => self.open_switch(subject),
            ["method", signature] => self.open_method(signature, false),
            ["template", signature] => self.open_method(signature, true),
            ["class" | "object", name] => self.open_class(name),
            ["object", name, "=", class] => self.instantiate(name, class),
            ["try"] => self.open_try(),
            ["__begin__", path] => self.open_script(path),
            [header] if module_name(header).is_some() => self.open_module(header),
            [keyword @ ("elsif" | "else" | "endif" | "case" | "default" | "catch" | "next"
                        | "endfor" | "end" | "}" | "__end__" | "public" | "private"),
             ..] => Err(RuntimeError::invalid(format!("'{keyword}' outside of a matching block"))),
            [closer] if closer.starts_with("[/") => {
                Err(RuntimeError::invalid(format!("'{closer}' outside of a matching module")))
            },

            ["break" | "leave!"] => Ok(Signal::Break),
            ["return"] => Ok(Signal::Return),
            ["return", value] => {
                self.state.last_value = self.resolve(value)?;
                Ok(Signal::Return)
            },
            ["exit"] => Ok(Signal::Exit(self.state.error_code)),
            ["exit", code] => self.exit_with(code),
            ["goto", mark] => self.goto(mark),
            ["load", path] => self.load(path),

            ["var", name] => self.declare(name),
            ["const", name, "=", value] => self.define_constant(name, value),
            ["list", name] => self.declare_list(name, None),
            ["list", name, "=", items] => self.declare_list(name, Some(items)),
            [order @ ("sort" | "reverse" | "revert"), name] => self.reorder(order, name),
            ["remove", name] => self.remove(name),
            ["lock", name] => self.set_locked(name, true),
            ["unlock", name] => self.set_locked(name, false),
            [command] if command.starts_with("clear_") && command.ends_with('!') => {
                self.clear(command)
            },
            [listing @ ("variables" | "lists" | "methods" | "classes" | "constants" | "modules")] => {
                self.list_names(listing)
            },
            [subject, predicate] if predicate.ends_with('?') => self.inspect(subject, predicate),

            ["ask", name] => self.ask(name),
            ["prompt", style] => self.set_prompt(style),
            ["cd", dir] => self.change_dir(dir),
            ["pwd"] => self.print_dir(),
            ["ls"] => self.list_dir("."),
            ["ls", dir] => self.list_dir(dir),
            ["mkdir", dir] => self.make_dir(dir),
            ["rmdir", dir] => self.remove_dir(dir),
            ["touch", file] => self.touch(file),
            ["rm", file] => self.remove_file(file),
            ["cat", file] => self.cat(file),
            ["write", file, value] => self.write_file(file, value, false),
            ["append", file, value] => self.write_file(file, value, true),

            [expression] if expression.starts_with('(') => {
                self.state.last_value = self.evaluate_stack(expression)?;
                Ok(Signal::Continue)
            },
            [call] if split_call(call).is_some() => self.call_statement(call),
            [word] => self.run_named(word, statement),
            _ => self.shell(&statement.text),
        }
    }

    /// Feeds `statement` to the open frame, closing it when it ends.
    fn feed_frame(&mut self, statement: &Statement) -> EvalResult<Signal> {
        let Some(frame) = self.store.frame.as_mut() else {
            return Ok(Signal::Continue);
        };
        match frame.feed(statement) {
            Feed::Buffered => Ok(Signal::Continue),
            Feed::Member(member) => self.declare_member(&member),
            Feed::Close => match self.store.frame.take() {
                Some(frame) => self.close_frame(frame),
                None => Ok(Signal::Continue),
            },
        }
    }

    /// A member declaration inside a `class` body.
    ///
    /// The class frame is set aside while the value resolves, so a call in
    /// the initializer runs normally instead of being buffered.
    fn declare_member(&mut self, statement: &Statement) -> EvalResult<Signal> {
        let (name, initializer) = match statement.tokens.as_slice() {
            [name, op, value] if op == "=" => (name, Some(value)),
            [var, name] if var == "var" => (name, None),
            _ => {
                return Err(RuntimeError::invalid(format!("'{}' is not allowed in a class body",
                                                         statement.text)));
            },
        };

        let frame = self.store.frame.take();
        let value = initializer.map_or(Ok(Value::Absent), |token| self.resolve(token));
        self.store.frame = frame;
        let value = value?;

        let collectable = self.collectable();
        if let Some(Frame::Class(builder)) = self.store.frame.as_mut() {
            let mut variable = Variable::new(name.as_str(), value);
            variable.collectable = collectable;
            builder.class.variables.insert(variable);
        }
        Ok(Signal::Continue)
    }

    /// A lone word: a module, a method, a mark, a variable or a command.
    fn run_named(&mut self, word: &str, statement: &Statement) -> EvalResult<Signal> {
        if let Some(module) = self.store.modules.get(word) {
            let lines = module.lines.clone();
            return Ok(self.run_block(&lines));
        }
        if self.store.has_method(word) {
            return self.invoke(word, &[]);
        }
        if crate::interpreter::store::script::mark_name(word).is_some() {
            return Ok(Signal::Continue);
        }
        if let Some(variable) = self.store.variable(word) {
            self.state.last_value = variable.value.clone();
            return Ok(Signal::Continue);
        }
        self.shell(&statement.text)
    }
}
