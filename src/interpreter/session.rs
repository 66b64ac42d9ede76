use std::path::Path;

use tracing::{debug, warn};

use crate::{error::RuntimeError,
            host::Host,
            interpreter::{lexer::{Statement, Tokenizer, tokenize_text},
                          store::{Store, entity::Variable, script::Script},
                          value::Value},
            repl::Prompt};

/// The result of evaluating one statement or expression.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// Deepest allowed nesting of method and template invocations.
pub const MAX_CALL_DEPTH: usize = 256;

/// How control leaves a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Carry on with the next statement.
    Continue,
    /// `break` or `leave!`: leave the nearest loop.
    Break,
    /// `return`: leave the running method.
    Return,
    /// An error inside a `try` body: run the handler.
    Raise,
    /// `goto`: continue the running script at this line index.
    Jump(usize),
    /// `exit`: stop the session with this code.
    Exit(i32),
}

/// Registers and counters of a running session.
#[derive(Debug, Default)]
pub struct State {
    /// The result of the most recent call, `return` or expression statement.
    pub last_value:    Value,
    /// The most recently reported error.
    pub last_error:    Option<RuntimeError>,
    /// Code of the most recent error, `0` if none. The process exit code.
    pub error_code:    i32,
    /// Script arguments; `args[0]` is the script path.
    pub args:          Vec<String>,
    pub prompt:        Prompt,
    /// 1-based line of the running script, for diagnostics.
    pub line:          Option<usize>,
    /// Method, template and try bodies currently running. Entities created
    /// while this is non-zero are collectable.
    pub executions:    usize,
    pub call_depth:    usize,
    /// If-chains being evaluated or run. Sweeps wait until this is zero.
    pub if_depth:      usize,
    pub try_depth:     usize,
    /// Classes whose methods are running, innermost last.
    pub class_context: Vec<String>,
    /// Methods being run, innermost last.
    pub method_stack:  Vec<String>,
    /// `exit` reached from inside an operand; honored when the statement
    /// that resolved the operand finishes.
    pub pending_exit:  Option<i32>,
}

/// One interpreter session: symbols, registers and the host it talks to.
///
/// Sessions are independent of each other; nothing is process-global.
///
/// # Example
/// ```
/// use quill::{host::MemoryHost, interpreter::session::Session};
///
/// let mut session = Session::new(MemoryHost::new());
/// session.run_source("x = (2 + 3)\nsay \"x is\" x");
///
/// assert_eq!(session.host().stdout(), "x is 5\n");
/// ```
pub struct Session<H: Host> {
    pub store:     Store,
    pub state:     State,
    pub(crate) host: H,
    tokenizer:     Tokenizer,
}

impl<H: Host> Session<H> {
    #[must_use]
    pub fn new(host: H) -> Self {
        Self { store: Store::new(),
               state: State::default(),
               host,
               tokenizer: Tokenizer::new() }
    }

    pub const fn host(&self) -> &H {
        &self.host
    }

    pub const fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    /// Current value of variable `name`, class members included.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.store.variable(name).map(|v| &v.value)
    }

    #[must_use]
    pub const fn last_value(&self) -> &Value {
        &self.state.last_value
    }

    /// The code the process should exit with: the last error code.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        self.state.error_code
    }

    /// Defines an indestructible variable from a `-X name=value` option.
    pub fn define_argument(&mut self, name: &str, value: &str) {
        let mut variable = Variable::new(name, Value::infer(value));
        variable.indestructible = true;
        self.store.variables.insert(variable);
    }

    /// Whether new entities should be swept after the running body ends.
    pub(crate) const fn collectable(&self) -> bool {
        self.state.executions > 0
    }

    /// Tokenizes and executes one line of source.
    ///
    /// Block comment state carries over to the next call.
    pub fn execute_source(&mut self, line: &str) -> Signal {
        let statements = self.tokenizer.tokenize(line);
        self.execute_statements(&statements)
    }

    /// Executes buffered statement text with a fresh tokenizer.
    pub fn execute_text(&mut self, text: &str) -> Signal {
        self.execute_statements(&tokenize_text(text))
    }

    fn execute_statements(&mut self, statements: &[Statement]) -> Signal {
        for statement in statements {
            let signal = self.execute_statement(statement);
            if signal != Signal::Continue {
                return signal;
            }
        }
        Signal::Continue
    }

    /// Executes one statement, reporting any error it raises.
    pub fn execute_statement(&mut self, statement: &Statement) -> Signal {
        let signal = match self.dispatch(statement) {
            Ok(signal) => signal,
            Err(error) => self.report(error),
        };
        match self.state.pending_exit.take() {
            Some(code) => Signal::Exit(code),
            None => signal,
        }
    }

    /// Runs buffered lines until one of them signals something other than
    /// [`Signal::Continue`].
    ///
    /// A block left open by the lines is dropped with an error rather than
    /// swallowing the statements that follow.
    pub fn run_block(&mut self, lines: &[String]) -> Signal {
        let framed = self.store.frame.is_some();
        let mut signal = Signal::Continue;
        for line in lines {
            signal = self.execute_text(line);
            if signal != Signal::Continue {
                break;
            }
        }
        if !framed && let Some(frame) = self.store.frame.take() {
            let error = RuntimeError::invalid(format!("unterminated {} block", frame.kind()));
            let reported = self.report(error);
            if signal == Signal::Continue {
                signal = reported;
            }
        }
        signal
    }

    /// Records an error and prints it, or raises it inside a `try` body.
    pub fn report(&mut self, error: RuntimeError) -> Signal {
        debug!(code = error.code(), %error, "statement failed");
        self.state.error_code = error.code();
        self.state.last_error = Some(error.clone());
        if self.state.try_depth > 0 {
            return Signal::Raise;
        }
        let message = match (self.state.line, self.state.method_stack.last()) {
            (Some(line), Some(method)) => format!("Error on line {line} in {method}: {error}"),
            (Some(line), None) => format!("Error on line {line}: {error}"),
            (None, _) => format!("Error: {error}"),
        };
        self.host.error(&message);
        Signal::Continue
    }

    /// Clears every symbol and register, as `exit` does.
    pub fn reset(&mut self) {
        debug!("session reset");
        self.store.clear_all();
        self.state = State::default();
        self.tokenizer = Tokenizer::new();
    }

    /// Runs `source` as an anonymous script and returns the exit code.
    pub fn run_source(&mut self, source: &str) -> i32 {
        let signal = self.run_loaded(Script::new("<source>", source));
        self.finish(signal)
    }

    /// Loads and runs a script file with `args` as `args[1..]`.
    ///
    /// # Errors
    /// Fails only when the script cannot be read; errors inside the script
    /// are reported and reflected in the returned exit code.
    pub fn run_script(&mut self, path: &Path, args: &[String]) -> EvalResult<i32> {
        let source = self.host
                         .read_file(path)
                         .map_err(|e| RuntimeError::from_io(&e, path, false))?;
        self.state.args = std::iter::once(path.display().to_string()).chain(args.iter().cloned())
                                                                     .collect();
        let signal = self.run_loaded(Script::new(path, &source));
        Ok(self.finish(signal))
    }

    /// Runs `script` in place of the current one, restoring it afterwards.
    pub(crate) fn run_loaded(&mut self, script: Script) -> Signal {
        debug!(path = %script.path.display(), lines = script.lines.len(), "running script");
        let lines = script.lines.clone();
        let outer_script = self.store.script.replace(script);
        let outer_line = self.state.line;

        let mut cursor = 0;
        let mut signal = Signal::Continue;
        while let Some(line) = lines.get(cursor) {
            self.state.line = Some(cursor + 1);
            match self.execute_source(line) {
                Signal::Jump(target) => cursor = target,
                Signal::Exit(code) => {
                    signal = Signal::Exit(code);
                    break;
                },
                _ => cursor += 1,
            }
        }

        if signal == Signal::Continue && let Some(frame) = self.store.frame.take() {
            warn!(kind = frame.kind(), "script ended inside a block");
            self.state.line = None;
            self.report(RuntimeError::invalid(format!("unterminated {} block", frame.kind())));
        }
        self.state.line = outer_line;
        self.store.script = outer_script;
        signal
    }

    fn finish(&mut self, signal: Signal) -> i32 {
        match signal {
            Signal::Exit(code) => {
                self.reset();
                code
            },
            _ => self.state.error_code,
        }
    }
}
