/// Conditions of `if`, `unless`, `elsif` and `while`.
///
/// Conditions are parsed when their line is read and evaluated later, which
/// is what lets an untaken branch stay completely unevaluated.
pub mod condition;
/// The statement dispatcher.
///
/// Routes a tokenized statement by keyword and arity to its handler, or
/// feeds it to the open definition frame.
pub mod dispatcher;
/// Runs closed frames and invokes methods and templates.
///
/// # Responsibilities
/// - Executes if-chains, loops, switches and try blocks.
/// - Registers methods, classes and modules.
/// - Rewrites method bodies by textual substitution before running them.
pub mod executor;
/// Definition frames: blocks being collected until their terminator.
pub mod frame;
/// Sweeping of entities created by method, template and try bodies.
pub mod gc;
/// The statement tokenizer.
///
/// An explicit state machine that splits a line into statements and
/// tokens, honouring quotes, one level of parentheses and comments.
pub mod lexer;
/// Resolution of operand tokens to values.
pub mod operand;
/// The session: symbols, registers and the line executor.
pub mod session;
/// The expression stack evaluator.
pub mod stack;
/// The symbol store.
///
/// # Responsibilities
/// - Owns every registry: variables, lists, classes, methods, constants and
///   modules.
/// - Resolves dotted names against class membership before flat names.
/// - Holds the running script and the open definition frame.
pub mod store;
/// The runtime value type.
pub mod value;
