//! libtrellis is a toolkit for parsing expression grammars.
//!
//! A grammar goes through three stages:
//!
//! 1. Grammar text is [parsed](parse_grammar) into a [`RuleSet`], the raw rule definitions.
//! 2. The rule set is [normalized](normalize) into an executable [`Grammar`]. Normalization
//!    validates the grammar, resolves left recursion, and binds implicit positional variables.
//! 3. The grammar is [interpreted](interpret) against input text, producing a [`Value`] or a
//!    single-line error message pointing at the furthest failure.
//!
//! ```
//! use libtrellis::{interpret, normalize, parse_grammar, Value};
//!
//! let rules = parse_grammar("sum = sum:a '+' num:b -> a + b | num, num = {digit+}:n -> number(n)")
//!     .expect("grammar parses");
//! let grammar = normalize(&rules).expect("grammar is valid");
//! let outcome = interpret(&grammar, "1+20+300", "<input>");
//! assert_eq!(outcome.into_result(), Ok(Value::Int(321)));
//! ```
//!
//! A [`Grammar`] is immutable, and may be shared by any number of concurrent interpretations.

#[macro_use]
pub mod diagnostics;
pub use diagnostics::Diagnostic;

pub mod common;

pub mod grammar;
pub use grammar::interchange::AstError;
pub use grammar::{Grammar, Node, PostOp, RuleDef, RuleSet, SemExpr};

pub mod scanner;
pub use scanner::scan;

mod parser;
pub use parser::parse_grammar;

pub mod normalizer;
pub use normalizer::{normalize, normalize_with, GrammarError, NormalizeOptions};

pub mod interpreter;
pub use interpreter::errors::EvalError;
pub use interpreter::value::Value;
pub use interpreter::{interpret, Interpreter, ParseOutcome};

mod emit;
pub use emit::{Emit, EmitFormat};

mod linter;
pub use linter::{lint_rules, LintConfig};

mod utils;
