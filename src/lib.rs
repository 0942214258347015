//! Parser, evaluator and renderer for textual arithmetic expressions.
//!
//! An expression like `(pow(2,2)*cos(3.14*2)+3)*x` is parsed into an
//! [`Expr`] tree that can be evaluated at three numeric widths, constant
//! folded, rendered back to text, and re-bound through named variables.
//! Malformed input never aborts a parse; problems are collected as
//! [`StructuralError`] diagnostics next to the best-effort tree.

pub mod lexer;
pub mod node;
pub mod parser;

pub use crate::node::{Expr, Literal};
pub use crate::parser::{parse, Parsed, StructuralError};
