//! Core pipeline for the wires circuit evaluator.
//!
//! The pipeline is:
//!
//!   circuit text
//!     -> lexer      (tokens, by elimination of candidate kinds)
//!     -> parser     (schematic AST)
//!     -> evaluator  (wire graph, lazy memoized 16-bit resolution)
//!
//! Reading files and printing results belongs to the callers (see the
//! `wires-cli` crate); every stage here returns a typed error instead.

// ---------------------------------------------------------------------
// Error handling and diagnostics
// ---------------------------------------------------------------------

pub mod span;
pub mod diagnostic;
pub mod error;

// ---------------------------------------------------------------------
// Front-end: lexing and parsing
// ---------------------------------------------------------------------

pub mod lexer;
pub mod parser;
pub mod ast;

// ---------------------------------------------------------------------
// Evaluation and pipeline orchestration
// ---------------------------------------------------------------------

pub mod evaluator;
pub mod circuit;

// ---------------------------------------------------------------------
// Public API re-exports
// ---------------------------------------------------------------------

pub use circuit::{Circuit, evaluate};
pub use diagnostic::Diagnostic;
pub use error::{CoreError, EvalError, LexError, ParseError};
pub use evaluator::{Graph, Order};
