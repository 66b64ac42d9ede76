//! Operand resolution.
//!
//! Every argument of every statement is an operand token. Resolution tries,
//! in order: a quoted string, a number, a parenthesized stack, a call, an
//! indexed element, a dotted member or property, a variable and finally a
//! constant.

use crate::{error::RuntimeError,
            host::Host,
            interpreter::{lexer::{is_quoted, unquote},
                          session::{EvalResult, Session, Signal},
                          store::split_member,
                          value::Value},
            util::num::{f64_to_usize_checked, parse_number}};

/// Whether `text` can name a variable, list, method or class.
///
/// # Example
/// ```
/// use quill::interpreter::operand::is_name;
///
/// assert!(is_name("point.x"));
/// assert!(is_name("_tmp2"));
/// assert!(!is_name("2fast"));
/// assert!(!is_name("a b"));
/// ```
#[must_use]
pub fn is_name(text: &str) -> bool {
    let mut chars = text.chars();
    chars.next()
         .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
    && chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '.' | '$'))
}

/// Splits `name(args)` into the name and the raw argument text.
#[must_use]
pub fn split_call(token: &str) -> Option<(&str, &str)> {
    split_suffix(token, '(', ')')
}

/// Splits `name[index]` into the name and the raw index text.
#[must_use]
pub fn split_index(token: &str) -> Option<(&str, &str)> {
    split_suffix(token, '[', ']')
}

fn split_suffix(token: &str, open: char, close: char) -> Option<(&str, &str)> {
    let start = token.find(open)?;
    let inner = token[start + 1..].strip_suffix(close)?;
    let name = &token[..start];
    is_name(name).then_some((name, inner))
}

/// Splits call arguments at top-level commas.
///
/// Commas inside quotes, parentheses or brackets do not split.
///
/// # Example
/// ```
/// use quill::interpreter::operand::split_arguments;
///
/// assert_eq!(split_arguments(r#""a, b", f(1, 2), 3"#),
///            vec![r#""a, b""#, "f(1, 2)", "3"]);
/// assert!(split_arguments("  ").is_empty());
/// ```
#[must_use]
pub fn split_arguments(text: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let mut arguments = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut quoted = false;

    for c in text.chars() {
        match c {
            '"' => quoted = !quoted,
            '(' | '[' if !quoted => depth += 1,
            ')' | ']' if !quoted => depth = depth.saturating_sub(1),
            ',' if !quoted && depth == 0 => {
                arguments.push(current.trim().to_string());
                current.clear();
                continue;
            },
            _ => {},
        }
        current.push(c);
    }
    arguments.push(current.trim().to_string());
    arguments
}

impl<H: Host> Session<H> {
    /// Resolves an operand token to a value.
    ///
    /// # Errors
    /// `UndefinedVariable` when nothing matches, plus whatever a call, stack
    /// or index raises.
    pub fn resolve(&mut self, token: &str) -> EvalResult<Value> {
        if is_quoted(token) {
            return Ok(Value::from(unquote(token)));
        }
        if let Some(number) = parse_number(token) {
            return Ok(Value::Num(number));
        }
        if token.starts_with('(') {
            return self.evaluate_stack(token);
        }
        if let Some((name, arguments)) = split_call(token) {
            return self.call_value(name, arguments);
        }
        if let Some((name, index)) = split_index(token) {
            return self.element(name, index);
        }

        if let Some((owner, member)) = split_member(token) {
            if let Some(variable) = self.store
                                        .classes
                                        .get(owner)
                                        .and_then(|c| c.variables.get(member))
            {
                return Ok(variable.value.clone());
            }
            if let Some(value) = self.property(owner, member)? {
                return Ok(value);
            }
        }
        if let Some(variable) = self.store.variables.get(token) {
            return Ok(variable.value.clone());
        }
        if let Some(constant) = self.store.constants.get(token) {
            return Ok(constant.value.clone());
        }
        Err(RuntimeError::UndefinedVariable { name: token.to_string() })
    }

    /// Like [`Session::resolve`], but an undefined bare word stands for its
    /// own text.
    pub fn resolve_lenient(&mut self, token: &str) -> EvalResult<Value> {
        match self.resolve(token) {
            Err(RuntimeError::UndefinedVariable { name })
                if name == token && !token.contains(['(', ')', '[', ']', '"']) =>
            {
                Ok(Value::from(token))
            },
            other => other,
        }
    }

    /// Calls a method or builtin in operand position and yields LastValue.
    ///
    /// An `exit` inside the call is deferred to the end of the statement;
    /// an error raised inside a `try` body is raised again here.
    fn call_value(&mut self, name: &str, arguments: &str) -> EvalResult<Value> {
        match self.call(name, arguments)? {
            Signal::Exit(code) => self.state.pending_exit = Some(code),
            Signal::Raise => {
                let error = self.state
                                .last_error
                                .clone()
                                .unwrap_or_else(|| RuntimeError::invalid("error in call"));
                return Err(error);
            },
            _ => {},
        }
        Ok(self.state.last_value.clone())
    }

    /// `name[index]`: a list element or a script argument.
    fn element(&mut self, name: &str, index: &str) -> EvalResult<Value> {
        let index = self.resolve(index)?;
        let position =
            index.as_number()
                 .ok_or_else(|| RuntimeError::ConversionError { value: index.to_string() })?;

        if name == "args" && !self.store.lists.contains(name) {
            let args = &self.state.args;
            let i = f64_to_usize_checked(position, args.len())?;
            return args.get(i)
                       .map(|arg| Value::from(arg.as_str()))
                       .ok_or_else(|| RuntimeError::OutOfBounds { index: i.to_string(),
                                                                  size:  args.len(), });
        }
        Ok(Value::from(self.store.list(name)?.get(position)?))
    }

    /// A built-in property such as `L.size` or `name.length`.
    fn property(&self, owner: &str, member: &str) -> EvalResult<Option<Value>> {
        #[allow(clippy::cast_precision_loss)]
        let count = |n: usize| Some(Value::Num(n as f64));

        if let Some(list) = self.store.lists.get(owner) {
            let empty = || RuntimeError::OutOfBounds { index: "0".to_string(),
                                                       size:  0, };
            return Ok(match member {
                "size" | "length" => count(list.items.len()),
                "first" => Some(Value::from(list.items.first().ok_or_else(empty)?.as_str())),
                "last" => Some(Value::from(list.items.last().ok_or_else(empty)?.as_str())),
                _ => None,
            });
        }
        if owner == "args" && matches!(member, "size" | "length") {
            return Ok(count(self.state.args.len()));
        }
        let value = self.store
                        .variables
                        .get(owner)
                        .map(|v| &v.value)
                        .or_else(|| self.store.constants.get(owner).map(|c| &c.value));
        Ok(match (value, member) {
            (Some(value), "length" | "size") => count(value.to_string().chars().count()),
            _ => None,
        })
    }
}
