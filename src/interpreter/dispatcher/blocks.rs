use tracing::debug;

use crate::{error::RuntimeError,
            host::Host,
            interpreter::{condition::Condition,
                          frame::{Candidate, ClassBuilder, ForLoop, ForSource, Frame, IfChain,
                                  MethodBuilder, ModuleBuilder, ScriptBuilder, SwitchBlock,
                                  TryBlock, WhileLoop, module_name},
                          operand::split_arguments,
                          session::{EvalResult, Session, Signal},
                          stack::strip_group,
                          store::class::{Class, Method}}};

/// The marker symbol named in `for x in ...`; a leading `$` is optional.
fn loop_symbol(token: &str) -> String {
    token.strip_prefix('$')
         .filter(|rest| !rest.is_empty())
         .unwrap_or(token)
         .to_string()
}

impl<H: Host> Session<H> {
    fn open(&mut self, frame: Frame) -> EvalResult<Signal> {
        debug!(kind = frame.kind(), "frame opened");
        self.store.frame = Some(frame);
        Ok(Signal::Continue)
    }

    /// `if c` or `unless c`. The condition is only parsed here; it is
    /// evaluated when the chain closes.
    pub(super) fn open_if(&mut self, condition: &[&str], negated: bool) -> EvalResult<Signal> {
        let candidate = Candidate::new(Condition::parse(condition), negated);
        self.open(Frame::If(IfChain::new(candidate)))
    }

    pub(super) fn open_while(&mut self, condition: &[&str]) -> EvalResult<Signal> {
        self.open(Frame::While(WhileLoop::new(Condition::parse(condition))))
    }

    /// The four `for` forms. An initializer that does not resolve opens a
    /// loop that runs zero times.
    pub(super) fn open_for(&mut self, header: &[&str]) -> EvalResult<Signal> {
        let (symbol, source) = match header {
            ["infinity"] => ("$".to_string(), ForSource::Infinite),
            [source] => ("$".to_string(), self.for_source(source, None)),
            [symbol, "in", source] => (loop_symbol(symbol), self.for_source(source, None)),
            [symbol, "in", source, "step", step] => {
                (loop_symbol(symbol), self.for_source(source, Some(*step)))
            },
            _ => ("$".to_string(), ForSource::Failed),
        };
        if source == ForSource::Failed {
            debug!(?header, "for loop initializer failed");
        }
        self.open(Frame::For(ForLoop::new(symbol, source)))
    }

    fn for_source(&mut self, token: &str, step: Option<&str>) -> ForSource {
        let step = match step {
            None => 1.0,
            Some(token) => match self.number(token) {
                Some(step) if step > 0.0 => step,
                _ => return ForSource::Failed,
            },
        };
        if token.starts_with('(') {
            return self.range_source(strip_group(token), step);
        }
        self.store
            .lists
            .get(token)
            .map_or(ForSource::Failed, |list| ForSource::Items(list.items.clone()))
    }

    /// `a..b` is inclusive both ways; `a<b` and `a>b` exclude `b`. A
    /// comma separated group is iterated as literal items.
    fn range_source(&mut self, inner: &str, step: f64) -> ForSource {
        let (start, end, adjust) = if let Some((a, b)) = inner.split_once("..") {
            (a, b, 0.0)
        } else if let Some((a, b)) = inner.split_once('<') {
            (a, b, -1.0)
        } else if let Some((a, b)) = inner.split_once('>') {
            (a, b, 1.0)
        } else if inner.contains(',') {
            return self.literal_items(inner);
        } else {
            return ForSource::Failed;
        };

        let (Some(start), Some(end)) = (self.number(start), self.number(end)) else {
            return ForSource::Failed;
        };
        let end = end + adjust;
        let empty = (adjust < 0.0 && start > end) || (adjust > 0.0 && start < end);
        if empty {
            return ForSource::Failed;
        }
        ForSource::Range { start, end, step }
    }

    fn literal_items(&mut self, inner: &str) -> ForSource {
        let mut items = Vec::new();
        for argument in split_arguments(inner) {
            match self.resolve_lenient(&argument) {
                Ok(value) => items.push(value.to_string()),
                Err(_) => return ForSource::Failed,
            }
        }
        ForSource::Items(items)
    }

    fn number(&mut self, token: &str) -> Option<f64> {
        self.resolve(token.trim()).ok().and_then(|v| v.as_number())
    }

    pub(super) fn open_switch(&mut self, subject: &str) -> EvalResult<Signal> {
        self.open(Frame::Switch(SwitchBlock::new(subject)))
    }

    pub(super) fn open_method(&mut self, signature: &str, template: bool) -> EvalResult<Signal> {
        let method = Method::parse(signature, template);
        self.open(Frame::Method(MethodBuilder::new(method)))
    }

    pub(super) fn open_class(&mut self, name: &str) -> EvalResult<Signal> {
        self.open(Frame::Class(ClassBuilder::new(Class::new(name))))
    }

    /// `object o = C`: a new class `o` holding copies of `C`'s members.
    pub(super) fn instantiate(&mut self, name: &str, class: &str) -> EvalResult<Signal> {
        if self.store.is_defined(name) {
            return Err(RuntimeError::AlreadyDefined { name: name.to_string() });
        }
        let mut object = self.store.class(class)?.instantiate(name);
        object.collectable = self.collectable();
        self.store.classes.insert(object);
        Ok(Signal::Continue)
    }

    pub(super) fn open_try(&mut self) -> EvalResult<Signal> {
        self.open(Frame::Try(TryBlock::new()))
    }

    pub(super) fn open_module(&mut self, header: &str) -> EvalResult<Signal> {
        let name = module_name(header).unwrap_or(header);
        self.open(Frame::Module(ModuleBuilder::new(name)))
    }

    pub(super) fn open_script(&mut self, path: &str) -> EvalResult<Signal> {
        let path = self.resolve_lenient(path)?.to_string();
        self.open(Frame::Script(ScriptBuilder::new(path)))
    }
}
