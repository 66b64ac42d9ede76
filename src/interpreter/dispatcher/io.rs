use std::path::PathBuf;

use tracing::debug;

use crate::{error::RuntimeError,
            host::Host,
            interpreter::{lexer::unquote,
                          operand::split_call,
                          session::{EvalResult, Session, Signal},
                          store::script::Script,
                          value::Value},
            repl::Prompt,
            util::num::f64_to_i64_checked};

impl<H: Host> Session<H> {
    /// `say` and `print`: operands joined by single spaces.
    pub(super) fn say(&mut self, operands: &[&str], newline: bool) -> EvalResult<Signal> {
        let mut parts = Vec::with_capacity(operands.len());
        for operand in operands {
            parts.push(self.resolve_lenient(operand)?.to_string());
        }
        let mut text = parts.join(" ");
        if newline {
            text.push('\n');
        }
        self.host.write(&text);
        Ok(Signal::Continue)
    }

    /// `ask x`: reads a line into `x`; end of input leaves it absent.
    pub(super) fn ask(&mut self, name: &str) -> EvalResult<Signal> {
        let value = self.host
                        .read_line("")
                        .map_or(Value::Absent, |line| Value::infer(&line));
        let collectable = self.collectable();
        self.store.set_variable(name, value, collectable)?;
        Ok(Signal::Continue)
    }

    pub(super) fn set_prompt(&mut self, style: &str) -> EvalResult<Signal> {
        self.state.prompt = Prompt::parse(unquote(style));
        Ok(Signal::Continue)
    }

    /// Resolves a path operand; unresolved bare words are taken literally.
    fn path(&mut self, token: &str) -> EvalResult<PathBuf> {
        Ok(PathBuf::from(self.resolve_lenient(token)?.to_string()))
    }

    pub(super) fn change_dir(&mut self, dir: &str) -> EvalResult<Signal> {
        let path = self.path(dir)?;
        self.host
            .set_current_dir(&path)
            .map_err(|e| RuntimeError::from_io(&e, &path, true))?;
        Ok(Signal::Continue)
    }

    pub(super) fn print_dir(&mut self) -> EvalResult<Signal> {
        let cwd = self.host.current_dir();
        self.host.write(&format!("{}\n", cwd.display()));
        Ok(Signal::Continue)
    }

    pub(super) fn list_dir(&mut self, dir: &str) -> EvalResult<Signal> {
        let path = self.path(dir)?;
        let names = self.host
                        .list_dir(&path)
                        .map_err(|e| RuntimeError::from_io(&e, &path, true))?;
        for name in names {
            self.host.write(&format!("{name}\n"));
        }
        Ok(Signal::Continue)
    }

    pub(super) fn make_dir(&mut self, dir: &str) -> EvalResult<Signal> {
        let path = self.path(dir)?;
        self.host
            .create_dir(&path)
            .map_err(|e| RuntimeError::from_io(&e, &path, true))?;
        Ok(Signal::Continue)
    }

    pub(super) fn remove_dir(&mut self, dir: &str) -> EvalResult<Signal> {
        let path = self.path(dir)?;
        self.host
            .remove_dir(&path)
            .map_err(|e| RuntimeError::from_io(&e, &path, true))?;
        Ok(Signal::Continue)
    }

    pub(super) fn touch(&mut self, file: &str) -> EvalResult<Signal> {
        let path = self.path(file)?;
        self.host
            .create_file(&path)
            .map_err(|e| RuntimeError::from_io(&e, &path, false))?;
        Ok(Signal::Continue)
    }

    pub(super) fn remove_file(&mut self, file: &str) -> EvalResult<Signal> {
        let path = self.path(file)?;
        self.host
            .remove_file(&path)
            .map_err(|e| RuntimeError::from_io(&e, &path, false))?;
        Ok(Signal::Continue)
    }

    pub(super) fn cat(&mut self, file: &str) -> EvalResult<Signal> {
        let path = self.path(file)?;
        let mut contents = self.host
                               .read_file(&path)
                               .map_err(|e| RuntimeError::from_io(&e, &path, false))?;
        if !contents.is_empty() && !contents.ends_with('\n') {
            contents.push('\n');
        }
        self.host.write(&contents);
        Ok(Signal::Continue)
    }

    /// `write f v` replaces the file with `v`; `append f v` adds to it.
    pub(super) fn write_file(&mut self, file: &str, token: &str, append: bool) -> EvalResult<Signal> {
        let path = self.path(file)?;
        let line = format!("{}\n", self.resolve_lenient(token)?);
        let written = if append {
            self.host.append_file(&path, &line)
        } else {
            self.host.write_file(&path, &line)
        };
        written.map_err(|e| RuntimeError::from_io(&e, &path, false))?;
        Ok(Signal::Continue)
    }

    /// Hands a statement nothing else claimed to the host shell.
    pub(super) fn shell(&mut self, command: &str) -> EvalResult<Signal> {
        debug!(command, "shell");
        let status = self.host.shell(command).map_err(|e| {
                                                  RuntimeError::ReadFailure { path:    command.to_string(),
                                                                              details: e.to_string(), }
                                              })?;
        self.state.last_value = Value::Num(f64::from(status));
        Ok(Signal::Continue)
    }

    pub(super) fn exit_with(&mut self, code: &str) -> EvalResult<Signal> {
        let value = self.resolve(code)?;
        let number =
            value.as_number()
                 .ok_or_else(|| RuntimeError::ConversionError { value: value.to_string() })?;
        let code = i32::try_from(f64_to_i64_checked(number)?)
            .map_err(|_| RuntimeError::ConversionError { value: value.to_string() })?;
        Ok(Signal::Exit(code))
    }

    /// `goto mark`: continues the running script after `mark::`.
    pub(super) fn goto(&mut self, mark: &str) -> EvalResult<Signal> {
        let script = self.store
                         .script
                         .as_ref()
                         .ok_or_else(|| RuntimeError::invalid("goto needs a running script"))?;
        script.mark(mark)
              .map(Signal::Jump)
              .ok_or_else(|| RuntimeError::invalid(format!("no mark named '{mark}'")))
    }

    /// `load path`: runs another script in this session.
    pub(super) fn load(&mut self, file: &str) -> EvalResult<Signal> {
        let path = self.path(file)?;
        let source = self.host
                         .read_file(&path)
                         .map_err(|e| RuntimeError::from_io(&e, &path, false))?;
        match self.run_loaded(Script::new(&path, &source)) {
            Signal::Exit(code) => Ok(Signal::Exit(code)),
            _ => Ok(Signal::Continue),
        }
    }

    /// A call in statement position: `greet("ann")`.
    pub(super) fn call_statement(&mut self, token: &str) -> EvalResult<Signal> {
        match split_call(token) {
            Some((name, arguments)) => self.call(name, arguments),
            None => Err(RuntimeError::UndefinedMethod { name: token.to_string() }),
        }
    }
}
