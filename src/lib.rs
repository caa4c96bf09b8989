//! Minimal recursive-descent parser combinators.
//!
//! ```
//! use descent::{Grammar, Value};
//!
//! let mut grammar = Grammar::<Value>::new();
//! let digits = grammar.pattern(r"\d+").unwrap();
//! let comma = grammar.terminal(",");
//! let pair = grammar.sequence([digits, comma, digits]);
//! assert_eq!(
//!     grammar.parse(pair, "1,23 rest").map(|(remaining, _)| remaining),
//!     Ok(" rest")
//! );
//! ```

pub mod parse;

pub use parse::boolean::BoolExpr;
pub use parse::combinators::{Describe, Grammar, Parser, Rule, RuleParser, DEFAULT_DEPTH_LIMIT};
pub use parse::error::{GrammarError, Mismatch, ParseError};
pub use parse::value::{ParseValue, Value};
