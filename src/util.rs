/// Numeric conversion and formatting helpers.
///
/// All quill numbers are `f64`. This module owns the rules for recognising a
/// numeric literal in source text, for printing a number back as text, and for
/// converting a number to an index or repeat count without silent truncation.
pub mod num;
