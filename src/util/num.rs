use crate::{error::RuntimeError, interpreter::session::EvalResult};

/// Largest magnitude printed without a decimal point or exponent.
pub const MAX_PLAIN_INTEGER: f64 = 1e15;

/// Parses `text` as a quill number literal.
///
/// A number starts with a digit, a sign or a dot and must be finite, so words
/// such as `inf` or `NaN` that `f64::from_str` would accept are rejected.
///
/// # Example
/// ```
/// use quill::util::num::parse_number;
///
/// assert_eq!(parse_number("-2.5"), Some(-2.5));
/// assert_eq!(parse_number("1e3"), Some(1000.0));
/// assert_eq!(parse_number("inf"), None);
/// assert_eq!(parse_number("12abc"), None);
/// ```
#[must_use]
pub fn parse_number(text: &str) -> Option<f64> {
    let first = text.chars().next()?;
    if !(first.is_ascii_digit() || matches!(first, '-' | '+' | '.')) {
        return None;
    }
    if !text.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Formats a number the way quill prints it.
///
/// Integral values print without a fractional part; everything else uses the
/// shortest representation that round-trips.
///
/// # Example
/// ```
/// use quill::util::num::format_number;
///
/// assert_eq!(format_number(14.0), "14");
/// assert_eq!(format_number(-0.0), "0");
/// assert_eq!(format_number(2.5), "2.5");
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < MAX_PLAIN_INTEGER {
        return format!("{}", value as i64);
    }
    format!("{value}")
}

/// Converts an `f64` to `i64` if the value is finite, within range, and not
/// fractional.
///
/// # Errors
/// Returns `RuntimeError::ConversionError` for non-finite, out-of-range or
/// fractional values.
///
/// # Example
/// ```
/// use quill::{error::RuntimeError, util::num::f64_to_i64_checked};
///
/// assert_eq!(f64_to_i64_checked(1000.0).unwrap(), 1000);
/// assert!(matches!(f64_to_i64_checked(1.5), Err(RuntimeError::ConversionError { .. })));
/// ```
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_precision_loss)]
pub fn f64_to_i64_checked(value: f64) -> EvalResult<i64> {
    if !value.is_finite()
       || value < i64::MIN as f64
       || value > i64::MAX as f64
       || value.fract() != 0.0
    {
        return Err(RuntimeError::ConversionError { value: format_number(value) });
    }
    Ok(value as i64)
}

/// Converts an `f64` to a `usize` index or count.
///
/// # Errors
/// Returns `RuntimeError::ConversionError` for fractional values and
/// `RuntimeError::OutOfBounds` for negative ones.
pub fn f64_to_usize_checked(value: f64, size: usize) -> EvalResult<usize> {
    let integer = f64_to_i64_checked(value)?;
    usize::try_from(integer).map_err(|_| RuntimeError::OutOfBounds { index: integer.to_string(),
                                                                    size })
}
