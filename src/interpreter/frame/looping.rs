use std::iter;

use super::{Closer, Nesting};
use crate::interpreter::{condition::Condition, lexer::Statement, value::Value};

/// What a `for` loop iterates over, resolved when the loop is declared.
#[derive(Debug, Clone, PartialEq)]
pub enum ForSource {
    /// Inclusive bounds; counts down when `start > end`.
    Range { start: f64, end: f64, step: f64 },
    /// Elements of a list or a literal, copied at declaration.
    Items(Vec<String>),
    /// `for infinity`, counting from zero until `break`.
    Infinite,
    /// The initializer did not resolve. The body is buffered and skipped.
    Failed,
}

impl ForSource {
    /// The values the loop marker takes, produced one pass at a time.
    ///
    /// # Example
    /// ```
    /// use quill::interpreter::{frame::ForSource, value::Value};
    ///
    /// let down = ForSource::Range { start: 5.0, end: 3.0, step: 1.0 };
    /// assert_eq!(down.values().collect::<Vec<_>>(),
    ///            [Value::Num(5.0), Value::Num(4.0), Value::Num(3.0)]);
    /// assert_eq!(ForSource::Infinite.values().nth(1_000_000), Some(Value::Num(1_000_000.0)));
    /// assert_eq!(ForSource::Failed.values().next(), None);
    /// ```
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn values(&self) -> Box<dyn Iterator<Item = Value> + '_> {
        match self {
            Self::Range { start, end, step } => Box::new(RangeValues::new(*start, *end, *step)),
            Self::Items(items) => Box::new(items.iter().map(|i| Value::from(i.as_str()))),
            Self::Infinite => Box::new((0u64..).map(|i| Value::Num(i as f64))),
            Self::Failed => Box::new(iter::empty()),
        }
    }
}

/// Tolerance for reaching the end of a fractional range.
const RANGE_EPSILON: f64 = 1e-9;

/// An inclusive range walked from `start` towards `end`.
///
/// The i-th value is `start ± i * step`, so rounding error never
/// accumulates across passes.
#[derive(Debug, Clone)]
pub struct RangeValues {
    start: f64,
    step:  f64,
    count: u64,
    index: u64,
}

impl RangeValues {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    #[must_use]
    pub fn new(start: f64, end: f64, step: f64) -> Self {
        let passes = ((end - start).abs() / step + RANGE_EPSILON).floor();
        let step = if start <= end { step } else { -step };
        Self { start,
               step,
               count: (passes as u64).saturating_add(1),
               index: 0 }
    }
}

impl Iterator for RangeValues {
    type Item = Value;

    #[allow(clippy::cast_precision_loss)]
    fn next(&mut self) -> Option<Value> {
        if self.index >= self.count {
            return None;
        }
        let value = self.start + self.index as f64 * self.step;
        self.index += 1;
        Some(Value::Num(snap(value)))
    }
}

/// Drops the last-digit noise of `value`, so `3 * 0.1` reads as `0.3`.
fn snap(value: f64) -> f64 {
    let rounded = (value * 1e9).round() / 1e9;
    if (rounded - value).abs() < value.abs().max(1.0) * 1e-14 { rounded } else { value }
}

/// A `for` loop collected up to `next` or `endfor`.
#[derive(Debug, Clone, PartialEq)]
pub struct ForLoop {
    /// Body lines replace `#{symbol}` with the current value.
    pub symbol: String,
    pub source: ForSource,
    pub body:   Vec<String>,
    nesting:    Nesting,
}

impl ForLoop {
    #[must_use]
    pub fn new(symbol: impl Into<String>, source: ForSource) -> Self {
        Self { symbol: symbol.into(),
               source,
               body: Vec::new(),
               nesting: Nesting::default() }
    }

    /// The placeholder replaced in each iteration.
    #[must_use]
    pub fn marker(&self) -> String {
        format!("#{{{}}}", self.symbol)
    }

    pub(super) fn feed(&mut self, statement: &Statement) -> bool {
        if self.nesting.closes(statement, &Closer::Next) {
            return true;
        }
        self.body.push(statement.text.clone());
        false
    }
}

/// A `while` loop collected up to `end`.
#[derive(Debug, Clone, PartialEq)]
pub struct WhileLoop {
    pub condition: Condition,
    pub body:      Vec<String>,
    nesting:       Nesting,
}

impl WhileLoop {
    #[must_use]
    pub fn new(condition: Condition) -> Self {
        Self { condition,
               body: Vec::new(),
               nesting: Nesting::default() }
    }

    pub(super) fn feed(&mut self, statement: &Statement) -> bool {
        if self.nesting.closes(statement, &Closer::End) {
            return true;
        }
        self.body.push(statement.text.clone());
        false
    }
}
