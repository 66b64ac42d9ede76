//! # quill
//!
//! quill is a line-oriented scripting language runtime written in Rust.
//! Scripts are read one line at a time; blocks such as `if`, `for` and
//! `method` are collected as text and run when they close, and methods are
//! invoked by substituting their arguments into that text.
//!
//! Everything lives in a [`Session`](interpreter::session::Session), which
//! talks to the outside world through a [`Host`](host::Host).

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
)]
#![allow(clippy::missing_errors_doc, clippy::module_name_repetitions)]

use crate::{host::MemoryHost, interpreter::session::Session};

/// Provides the runtime error type.
///
/// Every failure a statement can hit is one variant of
/// [`RuntimeError`](error::RuntimeError). Errors are reported and execution
/// continues with the next statement.
pub mod error;
/// The boundary between a session and the machine it runs on.
///
/// # Responsibilities
/// - Defines the `Host` trait for console, filesystem, shell, environment,
///   clock and randomness.
/// - Provides `SystemHost` for real use and `MemoryHost` for tests and
///   embedding.
pub mod host;
/// Orchestrates tokenizing, dispatching and executing statements.
pub mod interpreter;
/// The interactive loop and prompt rendering.
pub mod repl;
/// General utilities for numbers.
///
/// Parsing and printing of quill numbers and checked conversions from `f64`
/// to integer types.
pub mod util;

/// Runs `source` in a fresh in-memory session and returns what it printed.
///
/// Errors are reported to the captured error stream and do not stop the
/// script.
///
/// # Examples
/// ```
/// use quill::get_output;
///
/// let output = get_output("for (1..3)\n\tprint #{$}\nnext");
/// assert_eq!(output, "123");
///
/// let output = get_output("say (3 + 4 * 2)");
/// assert_eq!(output, "14\n");
/// ```
#[must_use]
pub fn get_output(source: &str) -> String {
    let mut session = Session::new(MemoryHost::new());
    session.run_source(source);
    session.into_host().stdout().to_string()
}
