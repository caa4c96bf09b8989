//! Boolean expressions: `t`, `f`, `!(<expr>)`, `&(<expr>, ...)`, `|(<expr>, ...)`.
//!
//! Whitespace is allowed anywhere inside the parentheses, nowhere else.

use super::combinators::{Grammar, Parser, Rule};
use super::error::{GrammarError, ParseError};
use super::value::Value;

/// How an n-ary operator folds its operands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Connective {
    All,
    Any,
}
impl Connective {
    fn fold(self, mut operands: impl Iterator<Item = bool>) -> bool {
        match self {
            Connective::All => operands.all(|operand| operand),
            Connective::Any => operands.any(|operand| operand),
        }
    }
}

/// Parser of boolean expressions, built on a [Grammar] of [Value]s
#[derive(Debug)]
pub struct BoolExpr {
    grammar: Grammar,
    root: Rule,
}

impl BoolExpr {
    pub fn new() -> Result<Self, GrammarError> {
        let mut grammar = Grammar::new();
        let expr = grammar.forward();
        let spaces = grammar.pattern(r"\s*")?;

        let t = grammar.terminal("t");
        let t = grammar.map(t, |_| Value::Bool(true));
        let f = grammar.terminal("f");
        let f = grammar.map(f, |_| Value::Bool(false));

        let (bang, open, close) = (
            grammar.terminal("!"),
            grammar.terminal("("),
            grammar.terminal(")"),
        );
        let not = grammar.sequence([bang, open, spaces, expr, spaces, close]);
        let not = grammar.map(not, |parts| Value::Bool(!parts.into_item(3).truthy()));

        let and = n_ary(&mut grammar, "&", expr, spaces, Connective::All)?;
        let or = n_ary(&mut grammar, "|", expr, spaces, Connective::Any)?;

        let any = grammar.choice([t, f, not, and, or]);
        grammar.define(expr, any)?;
        Ok(BoolExpr {
            grammar,
            root: expr,
        })
    }

    /// Evaluate the whole of `input`
    pub fn evaluate(&self, input: &str) -> Result<bool, ParseError> {
        self.grammar
            .parse_complete(self.root, input)
            .map(|value| value.truthy())
    }

    pub fn set_depth_limit(&mut self, limit: usize) {
        self.grammar.set_depth_limit(limit);
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// Forward rule standing for `<expr>`
    pub fn root(&self) -> Rule {
        self.root
    }
}

impl Parser for BoolExpr {
    type Dest = bool;
    fn parse<'a>(&self, input: &'a str) -> Result<(&'a str, Self::Dest), ParseError> {
        self.grammar
            .parse(self.root, input)
            .map(|(remaining, value)| (remaining, value.truthy()))
    }
}

/// `<operator>(<expr>, ..., <expr>)` with at least one operand
fn n_ary(
    grammar: &mut Grammar,
    operator: &str,
    expr: Rule,
    spaces: Rule,
    connective: Connective,
) -> Result<Rule, GrammarError> {
    let comma = grammar.terminal(",");
    // `<expr> , ` -> `<expr>`
    let leading = grammar.sequence([expr, spaces, comma, spaces]);
    let leading = grammar.map(leading, |parts| parts.into_item(0));
    let leading = grammar.repeat(leading, 0, None)?;

    let (operator, open, close) = (
        grammar.terminal(operator),
        grammar.terminal("("),
        grammar.terminal(")"),
    );
    let list = grammar.sequence([operator, open, spaces, leading, expr, spaces, close]);
    Ok(grammar.map(list, move |parts| {
        let mut parts = parts.into_list().into_iter().skip(3);
        let leading = parts.next().unwrap_or_default().into_list();
        let last = parts.next().unwrap_or_default();
        Value::Bool(connective.fold(leading.iter().chain([&last]).map(Value::truthy)))
    }))
}
