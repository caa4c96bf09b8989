//! Parser-combinator engine.
//!
//! A [Grammar](combinators::Grammar) is an arena of rules: terminals, anchored
//! regex patterns, sequences, ordered choices, bounded repeats and forward
//! references for recursion. Every rule may carry a transform that turns its
//! raw value into the caller's value. Rules are parsed by plain recursive
//! descent with first-match-wins backtracking.

pub mod boolean;
pub mod combinators;
pub mod error;
pub mod value;
