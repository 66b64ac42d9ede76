//! Running closed frames.
//!
//! When a frame's terminator arrives the session takes the frame out of the
//! store and hands it here: control-flow frames run their buffered lines,
//! definition frames register what they collected.

/// Built-in functions callable like methods.
pub mod builtin;
/// Method and template invocation.
mod invoke;
/// Textual substitution of parameters, placeholders and loop markers.
pub mod substitute;

use std::path::Path;

use tracing::debug;

use crate::{error::RuntimeError,
            host::Host,
            interpreter::{condition::Condition,
                          frame::{ForLoop, Frame, IfChain, ScriptBuilder, SwitchBlock, TryBlock,
                                  WhileLoop},
                          operand::is_name,
                          session::{EvalResult, Session, Signal},
                          store::{class::{Class, Method},
                                  entity::Module},
                          value::Value}};

impl<H: Host> Session<H> {
    /// Executes or registers a frame whose terminator was just read.
    pub(crate) fn close_frame(&mut self, frame: Frame) -> EvalResult<Signal> {
        debug!(kind = frame.kind(), "frame closed");
        match frame {
            Frame::If(chain) => Ok(self.execute_if(&chain)),
            Frame::For(for_loop) => Ok(self.execute_for(&for_loop)),
            Frame::While(while_loop) => Ok(self.execute_while(&while_loop)),
            Frame::Switch(switch) => self.execute_switch(&switch),
            Frame::Try(block) => Ok(self.execute_try(&block)),
            Frame::Method(builder) => self.define_method(builder.method),
            Frame::Class(builder) => self.define_class(builder.class),
            Frame::Module(builder) => self.define_module(builder.module),
            Frame::Script(builder) => self.write_script(&builder),
        }
    }

    /// Runs the first candidate whose condition holds.
    ///
    /// Conditions are evaluated in order and evaluation stops at the first
    /// true one, so nothing in a later candidate, nested blocks included,
    /// is ever looked at.
    fn execute_if(&mut self, chain: &IfChain) -> Signal {
        self.state.if_depth += 1;
        let signal = self.select_candidate(chain);
        self.state.if_depth -= 1;
        self.collect_garbage();
        signal
    }

    fn select_candidate(&mut self, chain: &IfChain) -> Signal {
        for candidate in &chain.candidates {
            if candidate.condition == Condition::Failed {
                continue;
            }
            let holds = match self.evaluate_condition(&candidate.condition) {
                Ok(holds) => holds != candidate.negated,
                Err(error) => match self.report(error) {
                    Signal::Continue => false,
                    signal => return signal,
                },
            };
            if holds {
                return self.run_block(&candidate.body);
            }
        }
        Signal::Continue
    }

    fn execute_for(&mut self, for_loop: &ForLoop) -> Signal {
        let marker = for_loop.marker();
        for value in for_loop.source.values() {
            if let Some(signal) = self.iterate(&marker, &value, &for_loop.body) {
                return signal;
            }
        }
        Signal::Continue
    }

    /// Runs one pass of a loop body with `marker` replaced by `value`.
    /// Returns the signal that ends the loop, if any.
    fn iterate(&mut self, marker: &str, value: &Value, body: &[String]) -> Option<Signal> {
        let text = value.to_string();
        let lines: Vec<String> = body.iter().map(|line| line.replace(marker, &text)).collect();
        match self.run_block(&lines) {
            Signal::Continue => None,
            Signal::Break => Some(Signal::Continue),
            signal => Some(signal),
        }
    }

    fn execute_while(&mut self, while_loop: &WhileLoop) -> Signal {
        loop {
            match self.evaluate_condition(&while_loop.condition) {
                Ok(true) => {},
                Ok(false) => return Signal::Continue,
                Err(error) => return self.report(error),
            }
            match self.run_block(&while_loop.body) {
                Signal::Continue => {},
                Signal::Break => return Signal::Continue,
                signal => return signal,
            }
        }
    }

    fn execute_switch(&mut self, switch: &SwitchBlock) -> EvalResult<Signal> {
        let subject = self.resolve(&switch.subject)?.to_string();
        for (label, lines) in &switch.cases {
            if self.case_label(label)? == subject {
                return Ok(self.run_block(lines));
            }
        }
        Ok(match &switch.default {
            Some(lines) => self.run_block(lines),
            None => Signal::Continue,
        })
    }

    /// A case label's text. Each token resolves leniently, so a label may
    /// name a variable, a literal or a bare word.
    fn case_label(&mut self, tokens: &[String]) -> EvalResult<String> {
        let mut parts = Vec::with_capacity(tokens.len());
        for token in tokens {
            parts.push(self.resolve_lenient(token)?.to_string());
        }
        Ok(parts.join(" "))
    }

    /// Runs the body; on the first error runs the handler instead of the
    /// rest of the body. Entities created inside are swept afterwards.
    fn execute_try(&mut self, block: &TryBlock) -> Signal {
        self.state.executions += 1;
        self.state.try_depth += 1;
        let mut signal = self.run_block(&block.body);
        self.state.try_depth -= 1;

        if signal == Signal::Raise {
            debug!(error = ?self.state.last_error, "caught");
            signal = self.handle(block);
        }

        self.state.executions -= 1;
        self.collect_garbage();
        signal
    }

    fn handle(&mut self, block: &TryBlock) -> Signal {
        if let Some(name) = &block.error_var {
            let message = self.state
                              .last_error
                              .as_ref()
                              .map_or_else(String::new, ToString::to_string);
            if let Err(error) = self.store.set_variable(name, Value::from(message), true) {
                return self.report(error);
            }
        }
        self.run_block(&block.handler)
    }

    fn define_method(&mut self, method: Method) -> EvalResult<Signal> {
        if !is_name(&method.name) {
            return Err(RuntimeError::invalid(format!("'{}' is not a valid method name",
                                                     method.name)));
        }
        if self.store.methods.contains(&method.name) {
            return Err(RuntimeError::AlreadyDefined { name: method.name });
        }
        debug!(method = %method.name, lines = method.lines.len(), "method defined");
        self.store.methods.insert(method);
        Ok(Signal::Continue)
    }

    fn define_class(&mut self, mut class: Class) -> EvalResult<Signal> {
        if !is_name(&class.name) {
            return Err(RuntimeError::invalid(format!("'{}' is not a valid class name", class.name)));
        }
        if self.store.classes.contains(&class.name) {
            return Err(RuntimeError::AlreadyDefined { name: class.name });
        }
        class.collectable = self.collectable();
        debug!(class = %class.name, methods = class.methods.len(), "class defined");
        self.store.classes.insert(class);
        Ok(Signal::Continue)
    }

    fn define_module(&mut self, module: Module) -> EvalResult<Signal> {
        if self.store.modules.contains(&module.name) {
            return Err(RuntimeError::AlreadyDefined { name: module.name });
        }
        self.store.modules.insert(module);
        Ok(Signal::Continue)
    }

    fn write_script(&mut self, builder: &ScriptBuilder) -> EvalResult<Signal> {
        let path = Path::new(&builder.path);
        self.host
            .write_file(path, &builder.contents())
            .map_err(|e| RuntimeError::from_io(&e, path, false))?;
        Ok(Signal::Continue)
    }
}
