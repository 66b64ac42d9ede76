/// Runtime errors.
///
/// Contains the closed set of error kinds a statement can raise while it is
/// dispatched or executed: undefined names, type mismatches, arithmetic
/// faults, out-of-bounds indexing, redefinitions and host I/O failures.
/// Every error is local to the statement that raised it; the executor reports
/// it and moves on to the next line.
pub mod runtime_error;

pub use runtime_error::RuntimeError;
