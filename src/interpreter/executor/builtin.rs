use std::path::Path;

use crate::{error::RuntimeError,
            host::Host,
            interpreter::{session::EvalResult, value::Value},
            util::num::f64_to_i64_checked};

/// Type alias for builtin function handlers.
///
/// A builtin receives the host and the resolved argument values.
type BuiltinFn = fn(&mut dyn Host, &[Value]) -> EvalResult<Value>;

/// Specifies the allowed number of arguments for a builtin.
#[derive(Clone, Copy)]
enum Arity {
    Exact(usize),
    OneOf(&'static [usize]),
}

impl Arity {
    fn check(self, n: usize) -> bool {
        match self {
            Self::Exact(m) => n == m,
            Self::OneOf(counts) => counts.contains(&n),
        }
    }
}

/// Defines builtin functions by generating a lookup table.
macro_rules! builtin_functions {
    (
        $(
            $name:literal => {
                arity: $arity:expr,
                func: $func:expr $(,)?
            }
        ),* $(,)?
    ) => {
        struct BuiltinDef {
            name:  &'static str,
            arity: Arity,
            func:  BuiltinFn,
        }
        static BUILTIN_TABLE: &[BuiltinDef] = &[
            $(
                BuiltinDef { name: $name, arity: $arity, func: $func },
            )*
        ];
    };
}

builtin_functions! {
    "env"    => { arity: Arity::Exact(1), func: env },
    "random" => { arity: Arity::Exact(2), func: random },
    "date"   => { arity: Arity::OneOf(&[0, 1]), func: |host, args| clock(host, args, "%Y-%m-%d") },
    "time"   => { arity: Arity::OneOf(&[0, 1]), func: |host, args| clock(host, args, "%H:%M:%S") },
    "read"   => { arity: Arity::Exact(1), func: read },
    "length" => { arity: Arity::Exact(1), func: length },
    "upper"  => { arity: Arity::Exact(1), func: |_, args| Ok(text(args).to_uppercase().into()) },
    "lower"  => { arity: Arity::Exact(1), func: |_, args| Ok(text(args).to_lowercase().into()) },
}

/// Runs the builtin `name`, or returns `None` if there is no such builtin.
///
/// # Example
/// ```
/// use quill::{host::MemoryHost,
///             interpreter::{executor::builtin, value::Value}};
///
/// let mut host = MemoryHost::new();
/// let result = builtin::call(&mut host, "upper", &[Value::from("quill")]);
/// assert_eq!(result, Some(Ok(Value::from("QUILL"))));
/// assert_eq!(builtin::call(&mut host, "nope", &[]), None);
/// ```
pub fn call(host: &mut dyn Host, name: &str, args: &[Value]) -> Option<EvalResult<Value>> {
    let builtin = BUILTIN_TABLE.iter().find(|b| b.name == name)?;
    if !builtin.arity.check(args.len()) {
        return Some(Err(RuntimeError::invalid(format!("'{name}' does not take {} arguments",
                                                      args.len()))));
    }
    Some((builtin.func)(host, args))
}

fn text(args: &[Value]) -> String {
    args.first().map(ToString::to_string).unwrap_or_default()
}

fn env(host: &mut dyn Host, args: &[Value]) -> EvalResult<Value> {
    Ok(host.env_var(&text(args)).map_or(Value::Absent, Value::from))
}

#[allow(clippy::cast_precision_loss)]
fn random(host: &mut dyn Host, args: &[Value]) -> EvalResult<Value> {
    let bound = |value: &Value| {
        value.as_number()
             .ok_or_else(|| RuntimeError::ConversionError { value: value.to_string() })
             .and_then(|n| f64_to_i64_checked(n.trunc()))
    };
    let (low, high) = (bound(&args[0])?, bound(&args[1])?);
    let (low, high) = if low <= high { (low, high) } else { (high, low) };
    Ok(Value::Num(host.random(low, high) as f64))
}

fn clock(host: &mut dyn Host, args: &[Value], default: &str) -> EvalResult<Value> {
    let format = args.first().map_or_else(|| default.to_string(), ToString::to_string);
    Ok(Value::from(host.now(&format)))
}

fn read(host: &mut dyn Host, args: &[Value]) -> EvalResult<Value> {
    let path = text(args);
    let path = Path::new(&path);
    host.read_file(path)
        .map(Value::from)
        .map_err(|e| RuntimeError::from_io(&e, path, false))
}

#[allow(clippy::cast_precision_loss)]
fn length(_: &mut dyn Host, args: &[Value]) -> EvalResult<Value> {
    Ok(Value::Num(text(args).chars().count() as f64))
}
