//! The expression stack evaluator.
//!
//! A stack is a parenthesized sequence of operands and operators such as
//! `(3 + x * 2)`. Operands are resolved left to right and folded with the
//! operator that follows them; there is no precedence, so the example is
//! `(3 + x) * 2`.
//!
//! When every operand is numeric the fold is arithmetic. Otherwise it works
//! on text: `+` concatenates, `-` removes the first occurrence of the right
//! operand and `*` repeats the left operand.

use std::{ops::Range, str::FromStr};

use logos::Logos;

use crate::{error::RuntimeError,
            host::Host,
            interpreter::{session::{EvalResult, Session},
                          value::Value},
            util::num::f64_to_usize_checked};

/// Longest text a stack may build by repetition.
pub const MAX_TEXT_LEN: usize = 1 << 24;

/// Tokens inside a stack.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t]+")]
enum StackToken {
    #[regex(r"[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?")]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?")]
    Number,
    #[regex(r#""[^"]*""#)]
    Text,
    /// Names, including dotted members and `$n` placeholders.
    #[regex(r"[A-Za-z_$][A-Za-z0-9_$.]*")]
    Word,
    #[token("(")]
    Open,
    #[token(")")]
    Close,
    #[token("[")]
    OpenBracket,
    #[token("]")]
    CloseBracket,
    #[token(",")]
    Comma,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("^")]
    Caret,
}

/// A stack operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Remainder,
    Power,
}

impl FromStr for Operator {
    type Err = RuntimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "+" => Self::Add,
            "-" => Self::Subtract,
            "*" => Self::Multiply,
            "/" => Self::Divide,
            "%" => Self::Remainder,
            "^" => Self::Power,
            other => return Err(RuntimeError::InvalidOperator { operator: other.to_string() }),
        })
    }
}

impl Operator {
    const fn from_token(token: StackToken) -> Option<Self> {
        Some(match token {
            StackToken::Plus => Self::Add,
            StackToken::Minus => Self::Subtract,
            StackToken::Star => Self::Multiply,
            StackToken::Slash => Self::Divide,
            StackToken::Percent => Self::Remainder,
            StackToken::Caret => Self::Power,
            _ => return None,
        })
    }

    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Remainder => "%",
            Self::Power => "^",
        }
    }

    fn apply_numeric(self, left: f64, right: f64) -> EvalResult<f64> {
        match self {
            Self::Add => Ok(left + right),
            Self::Subtract => Ok(left - right),
            Self::Multiply => Ok(left * right),
            Self::Divide | Self::Remainder if right == 0.0 => Err(RuntimeError::DivideByZero),
            Self::Divide => Ok(left / right),
            Self::Remainder => Ok(left % right),
            Self::Power => Ok(left.powf(right)),
        }
    }

    fn apply_text(self, mut left: String, right: &Value) -> EvalResult<String> {
        match self {
            Self::Add => {
                left.push_str(&right.to_string());
                Ok(left)
            },
            Self::Subtract => {
                let right = right.to_string();
                if let Some(start) = left.find(&right) {
                    left.replace_range(start..start + right.len(), "");
                }
                Ok(left)
            },
            Self::Multiply => {
                let count = right.as_number()
                                 .filter(|n| *n >= 0.0)
                                 .ok_or_else(|| {
                                     RuntimeError::mismatch(format!("cannot repeat text '{right}' times"))
                                 })?;
                let count = f64_to_usize_checked(count.trunc(), 0)?;
                match left.len().checked_mul(count) {
                    Some(size) if size <= MAX_TEXT_LEN => Ok(left.repeat(count)),
                    _ => Err(RuntimeError::invalid(format!("repeating text {count} times exceeds \
                                                            {MAX_TEXT_LEN} bytes"))),
                }
            },
            op => Err(RuntimeError::InvalidOperator { operator: op.symbol().to_string() }),
        }
    }
}

/// An operand of a stack: its source text and whether a unary minus
/// preceded it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operand {
    pub text:    String,
    pub negated: bool,
}

/// Splits the inside of a stack into operands and operators.
///
/// Calls (`f(1, 2)`), indexing (`L[0]`) and nested groups are kept whole as
/// single operands.
///
/// # Errors
/// `InvalidOperator` for unknown characters, missing operators or operands,
/// and `InvalidOperation` for unbalanced parentheses.
///
/// # Example
/// ```
/// use quill::interpreter::stack::{Operator, split_stack};
///
/// let (operands, operators) = split_stack("f(1, 2) - -x").unwrap();
/// assert_eq!(operands[0].text, "f(1, 2)");
/// assert!(operands[1].negated);
/// assert_eq!(operators, vec![Operator::Subtract]);
/// ```
pub fn split_stack(source: &str) -> EvalResult<(Vec<Operand>, Vec<Operator>)> {
    let mut tokens = Vec::new();
    for (token, span) in StackToken::lexer(source).spanned() {
        match token {
            Ok(token) => tokens.push((token, span)),
            Err(()) => {
                return Err(RuntimeError::InvalidOperator { operator: source[span].to_string() });
            },
        }
    }

    let mut operands = Vec::new();
    let mut operators = Vec::new();
    let mut negated = false;
    let mut i = 0;

    while let Some((token, span)) = tokens.get(i) {
        let expecting_operand = operands.len() == operators.len();
        let text = &source[span.clone()];

        if let Some(operator) = Operator::from_token(*token) {
            match (expecting_operand, operator) {
                (true, Operator::Subtract) => negated = !negated,
                (true, _) => {
                    return Err(RuntimeError::InvalidOperator { operator: text.to_string() });
                },
                (false, _) => operators.push(operator),
            }
            i += 1;
            continue;
        }

        let operand_span: Range<usize> = match token {
            StackToken::Number | StackToken::Text => span.clone(),
            StackToken::Word => match tokens.get(i + 1) {
                Some((StackToken::Open | StackToken::OpenBracket, _)) => {
                    let end = matching(&tokens, i + 1)?;
                    let range = span.start..tokens[end].1.end;
                    i = end;
                    range
                },
                _ => span.clone(),
            },
            StackToken::Open => {
                let end = matching(&tokens, i)?;
                let range = span.start..tokens[end].1.end;
                i = end;
                range
            },
            _ => return Err(RuntimeError::InvalidOperator { operator: text.to_string() }),
        };

        if !expecting_operand {
            return Err(RuntimeError::InvalidOperator { operator: source[operand_span].to_string() });
        }
        operands.push(Operand { text: source[operand_span].to_string(),
                                negated });
        negated = false;
        i += 1;
    }

    if operands.len() != operators.len() + 1 {
        let dangling = operators.last().map_or("", |op| op.symbol());
        return Err(RuntimeError::InvalidOperator { operator: dangling.to_string() });
    }
    Ok((operands, operators))
}

/// Index of the bracket closing the one at `open`.
fn matching(tokens: &[(StackToken, Range<usize>)], open: usize) -> EvalResult<usize> {
    let mut depth = 0usize;
    for (i, (token, _)) in tokens.iter().enumerate().skip(open) {
        match token {
            StackToken::Open | StackToken::OpenBracket => depth += 1,
            StackToken::Close | StackToken::CloseBracket => {
                depth -= 1;
                if depth == 0 {
                    return Ok(i);
                }
            },
            _ => {},
        }
    }
    Err(RuntimeError::invalid("unbalanced parentheses"))
}

/// Folds resolved operands left to right.
///
/// # Errors
/// `DivideByZero`, `InvalidOperator` for `/`, `%` or `^` on text,
/// `TypeMismatch` when text is repeated by a non-number, and
/// `InvalidOperation` when a repetition would exceed [`MAX_TEXT_LEN`].
///
/// # Example
/// ```
/// use quill::interpreter::{stack::{Operator, fold},
///                          value::Value};
///
/// let values = [Value::from("abcabc"), Value::from("bc")];
/// assert_eq!(fold(&values, &[Operator::Subtract]).unwrap(), Value::from("aabc"));
///
/// let values = [Value::Num(3.0), Value::Num(4.0), Value::Num(2.0)];
/// let ops = [Operator::Add, Operator::Multiply];
/// assert_eq!(fold(&values, &ops).unwrap(), Value::Num(14.0));
/// ```
pub fn fold(values: &[Value], operators: &[Operator]) -> EvalResult<Value> {
    let Some((first, rest)) = values.split_first() else {
        return Ok(Value::Absent);
    };

    let numbers: Option<Vec<f64>> = values.iter().map(Value::as_number).collect();
    if let Some(numbers) = numbers {
        let mut result = numbers[0];
        for (op, right) in operators.iter().zip(&numbers[1..]) {
            result = op.apply_numeric(result, *right)?;
        }
        return Ok(Value::Num(result));
    }

    let mut result = first.to_string();
    for (op, right) in operators.iter().zip(rest) {
        result = op.apply_text(result, right)?;
    }
    Ok(Value::Str(result))
}

/// The text between a stack's outer parentheses.
#[must_use]
pub fn strip_group(token: &str) -> &str {
    let inner = token.strip_prefix('(').unwrap_or(token);
    inner.strip_suffix(')').unwrap_or(inner)
}

impl<H: Host> Session<H> {
    /// Evaluates a parenthesized stack token such as `(a + 1)`.
    pub fn evaluate_stack(&mut self, token: &str) -> EvalResult<Value> {
        let inner = strip_group(token);
        if inner.trim().is_empty() {
            return Err(RuntimeError::invalid("empty expression"));
        }
        let (operands, operators) = split_stack(inner)?;

        let mut values = Vec::with_capacity(operands.len());
        for operand in &operands {
            let value = self.resolve(&operand.text)?;
            values.push(if operand.negated { negate(&value)? } else { value });
        }
        fold(&values, &operators)
    }

    /// Folds two operand tokens with one operator, as in `x = a + b`.
    pub(crate) fn fold_operands(&mut self, left: &str, op: &str, right: &str) -> EvalResult<Value> {
        let operator = op.parse::<Operator>()?;
        let values = [self.resolve(left)?, self.resolve(right)?];
        fold(&values, &[operator])
    }
}

fn negate(value: &Value) -> EvalResult<Value> {
    value.as_number()
         .map(|n| Value::Num(-n))
         .ok_or_else(|| RuntimeError::mismatch(format!("cannot negate '{value}'")))
}
