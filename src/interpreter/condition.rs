//! Conditions of `if`, `unless`, `elsif` and `while`.
//!
//! A condition is parsed once, when its line is read, and evaluated later
//! against the session; see [`Session::evaluate_condition`].
//!
//! [`Session::evaluate_condition`]: crate::interpreter::session::Session::evaluate_condition

use std::{path::Path, str::FromStr};

use crate::{host::Host,
            interpreter::{session::{EvalResult, Session},
                          value::Value}};

/// A binary comparison between two operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Equal,
    NotEqual,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    Contains,
    BeginsWith,
    EndsWith,
}

impl FromStr for Comparison {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "==" => Self::Equal,
            "!=" => Self::NotEqual,
            "<" => Self::Less,
            ">" => Self::Greater,
            "<=" => Self::LessEqual,
            ">=" => Self::GreaterEqual,
            "contains" => Self::Contains,
            "begins_with" => Self::BeginsWith,
            "ends_with" => Self::EndsWith,
            _ => return Err(()),
        })
    }
}

/// A `name pred?` test on a single operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    IsString,
    IsNumber,
    IsAbsent,
    IsVariable,
    IsList,
    IsMethod,
    IsClass,
    IsFile,
    IsDirectory,
}

impl FromStr for Predicate {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "is_string?" => Self::IsString,
            "is_number?" => Self::IsNumber,
            "is_absent?" => Self::IsAbsent,
            "is_variable?" => Self::IsVariable,
            "is_list?" => Self::IsList,
            "is_method?" => Self::IsMethod,
            "is_class?" => Self::IsClass,
            "is_file?" => Self::IsFile,
            "is_dir?" => Self::IsDirectory,
            _ => return Err(()),
        })
    }
}

/// A parsed condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// The `else` branch.
    Always,
    /// The condition did not parse; it is false forever, negated or not.
    Failed,
    /// A single operand judged by [`Value::is_truthy`].
    Truthy(String),
    Check(String, Predicate),
    Compare(String, Comparison, String),
}

impl Condition {
    /// Parses the tokens after the keyword.
    ///
    /// # Example
    /// ```
    /// use quill::interpreter::condition::{Comparison, Condition};
    ///
    /// assert_eq!(Condition::parse(&["x", "<", "10"]),
    ///            Condition::Compare("x".into(), Comparison::Less, "10".into()));
    /// assert_eq!(Condition::parse::<&str>(&[]), Condition::Failed);
    /// ```
    #[must_use]
    pub fn parse<S: AsRef<str>>(args: &[S]) -> Self {
        match args {
            [operand] => Self::Truthy(operand.as_ref().to_string()),
            [operand, predicate] => {
                predicate.as_ref()
                         .parse()
                         .map_or(Self::Failed, |p| Self::Check(operand.as_ref().to_string(), p))
            },
            [left, op, right] => op.as_ref().parse().map_or(Self::Failed, |op| {
                                                        Self::Compare(left.as_ref().to_string(),
                                                                      op,
                                                                      right.as_ref().to_string())
                                                    }),
            _ => Self::Failed,
        }
    }
}

/// Compares two resolved operands.
///
/// Two numeric operands compare as numbers. Otherwise both are compared as
/// text: equality is exact and ordering compares lengths in characters.
///
/// # Example
/// ```
/// use quill::interpreter::{condition::{compare, Comparison},
///                          value::Value};
///
/// assert!(compare(&Value::Num(5.0), Comparison::Equal, &Value::from("5")));
/// assert!(compare(&Value::from("abc"), Comparison::Greater, &Value::from("zz")));
/// assert!(compare(&Value::from("quill"), Comparison::BeginsWith, &Value::from("qu")));
/// ```
#[must_use]
#[allow(clippy::float_cmp)]
pub fn compare(left: &Value, op: Comparison, right: &Value) -> bool {
    if let (Some(l), Some(r)) = (left.as_number(), right.as_number())
       && !matches!(op, Comparison::Contains | Comparison::BeginsWith | Comparison::EndsWith)
    {
        return match op {
            Comparison::Equal => l == r,
            Comparison::NotEqual => l != r,
            Comparison::Less => l < r,
            Comparison::Greater => l > r,
            Comparison::LessEqual => l <= r,
            _ => l >= r,
        };
    }

    let (l, r) = (left.to_string(), right.to_string());
    let (ll, rl) = (l.chars().count(), r.chars().count());
    match op {
        Comparison::Equal => l == r,
        Comparison::NotEqual => l != r,
        Comparison::Less => ll < rl,
        Comparison::Greater => ll > rl,
        Comparison::LessEqual => ll <= rl,
        Comparison::GreaterEqual => ll >= rl,
        Comparison::Contains => l.contains(&r),
        Comparison::BeginsWith => l.starts_with(&r),
        Comparison::EndsWith => l.ends_with(&r),
    }
}

impl<H: Host> Session<H> {
    /// Evaluates a parsed condition against the current symbols.
    ///
    /// Operands are resolved leniently, so `if answer == yes` compares with
    /// the text `yes` when no such variable exists.
    pub fn evaluate_condition(&mut self, condition: &Condition) -> EvalResult<bool> {
        match condition {
            Condition::Always => Ok(true),
            Condition::Failed => Ok(false),
            Condition::Truthy(operand) => Ok(self.resolve_lenient(operand)?.is_truthy()),
            Condition::Check(operand, predicate) => self.check(operand, *predicate),
            Condition::Compare(left, op, right) => {
                let left = self.resolve_lenient(left)?;
                let right = self.resolve_lenient(right)?;
                Ok(compare(&left, *op, &right))
            },
        }
    }

    /// Applies an inspection predicate to `operand`.
    ///
    /// Value predicates resolve the operand; symbol predicates look the name
    /// up; file predicates ask the host about the resolved path.
    pub fn check(&mut self, operand: &str, predicate: Predicate) -> EvalResult<bool> {
        Ok(match predicate {
            Predicate::IsString => self.resolve(operand)?.is_string(),
            Predicate::IsNumber => self.resolve(operand)?.is_numeric(),
            Predicate::IsAbsent => self.resolve(operand)?.is_absent(),
            Predicate::IsVariable => self.store.has_variable(operand),
            Predicate::IsList => self.store.lists.contains(operand),
            Predicate::IsMethod => self.store.has_method(operand),
            Predicate::IsClass => self.store.classes.contains(operand),
            Predicate::IsFile => {
                let path = self.resolve_lenient(operand)?.to_string();
                self.host.is_file(Path::new(&path))
            },
            Predicate::IsDirectory => {
                let path = self.resolve_lenient(operand)?.to_string();
                self.host.is_dir(Path::new(&path))
            },
        })
    }
}
