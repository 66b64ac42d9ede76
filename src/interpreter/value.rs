use crate::util::num::{format_number, parse_number};

/// Represents a runtime value in the interpreter.
///
/// A quill binding holds exactly one of a string, a number or nothing at all.
/// There is no boolean type: predicates produce the strings `true` and
/// `false`, and conditions use [`Value::is_truthy`].
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// A string value.
    Str(String),
    /// A numeric value (double precision floating-point).
    Num(f64),
    /// No value. Produced by `var x` declarations and by calls that never set
    /// a result.
    #[default]
    Absent,
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Num(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Str(if v { "true" } else { "false" }.to_string())
    }
}

impl Value {
    /// Builds a value from user input, preferring a number when the text
    /// parses as one.
    ///
    /// # Example
    /// ```
    /// use quill::interpreter::value::Value;
    ///
    /// assert_eq!(Value::infer("42"), Value::Num(42.0));
    /// assert_eq!(Value::infer("forty"), Value::Str("forty".into()));
    /// ```
    #[must_use]
    pub fn infer(text: &str) -> Self {
        parse_number(text).map_or_else(|| Self::Str(text.to_string()), Self::Num)
    }

    /// Returns the numeric reading of this value, if it has one.
    ///
    /// Numbers are returned as-is, strings only when their whole text is a
    /// number literal, and `Absent` never.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Num(n) => Some(*n),
            Self::Str(s) => parse_number(s),
            Self::Absent => None,
        }
    }

    /// Whether this value takes part in numeric comparison and arithmetic.
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        self.as_number().is_some()
    }

    /// Whether this value is a non-numeric string.
    #[must_use]
    pub fn is_string(&self) -> bool {
        matches!(self, Self::Str(_)) && !self.is_numeric()
    }

    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Condition truth value.
    ///
    /// Non-zero numbers and non-empty strings other than `false` are true.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Num(n) => *n != 0.0,
            Self::Str(s) => !s.is_empty() && s != "false",
            Self::Absent => false,
        }
    }

    /// Short type name used in diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Str(_) => "string",
            Self::Num(_) => "number",
            Self::Absent => "absent",
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Str(s) => write!(f, "{s}"),
            Self::Num(n) => write!(f, "{}", format_number(*n)),
            Self::Absent => Ok(()),
        }
    }
}
