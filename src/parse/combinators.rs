use std::fmt;
use std::rc::Rc;

use regex::Regex;

use super::error::{GrammarError, Mismatch, ParseError};
use super::value::{ParseValue, Value};

/// Nesting depth a fresh [Grammar] allows before giving up
/// (fits the 2 MiB stack of a spawned thread)
pub const DEFAULT_DEPTH_LIMIT: usize = 256;

/// Trait to **implement** and **require** the "parse, and show what is left
/// to parse" method
pub trait Parser {
    type Dest;
    fn parse<'a>(&self, input: &'a str) -> Result<(&'a str, Self::Dest), ParseError>;
}

/// Handle of a node inside the [Grammar] that created it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rule(usize);
impl Rule {
    pub fn index(self) -> usize {
        self.0
    }
}

type Transform<V> = Rc<dyn Fn(V) -> V>;

#[derive(Debug, Clone)]
enum Kind {
    Terminal(String),
    /// `regex` is `source` anchored at the start of the input
    Pattern { source: String, regex: Regex },
    Sequence(Vec<Rule>),
    Choice(Vec<Rule>),
    Repeat {
        child: Rule,
        lower: usize,
        upper: Option<usize>,
    },
    /// Index into [Grammar::forwards]
    Forward(usize),
}

struct Node<V> {
    kind: Kind,
    transform: Option<Transform<V>>,
}
impl<V> fmt::Debug for Node<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("kind", &self.kind)
            .field("mapped", &self.transform.is_some())
            .finish()
    }
}

/// Arena of parser nodes.
///
/// Rules are built with `&mut self` and parsed with `&self`, so a grammar is
/// complete before anything runs against it. The only node that changes after
/// creation is a forward rule, bound exactly once by [Grammar::define].
#[derive(Debug)]
pub struct Grammar<V = Value> {
    nodes: Vec<Node<V>>,
    forwards: Vec<Option<Rule>>,
    depth_limit: usize,
}

impl<V> Default for Grammar<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Grammar<V> {
    pub fn new() -> Self {
        Grammar {
            nodes: Vec::new(),
            forwards: Vec::new(),
            depth_limit: DEFAULT_DEPTH_LIMIT,
        }
    }

    pub fn depth_limit(&self) -> usize {
        self.depth_limit
    }

    pub fn set_depth_limit(&mut self, limit: usize) {
        self.depth_limit = limit;
    }

    fn push(&mut self, kind: Kind) -> Rule {
        self.nodes.push(Node {
            kind,
            transform: None,
        });
        Rule(self.nodes.len() - 1)
    }

    /// Matches `literal` exactly, yields the literal
    pub fn terminal(&mut self, literal: impl Into<String>) -> Rule {
        self.push(Kind::Terminal(literal.into()))
    }

    /// Matches `pattern` at the start of the input, yields the matched text
    pub fn pattern(&mut self, pattern: &str) -> Result<Rule, GrammarError> {
        let invalid = |source| GrammarError::InvalidPattern {
            pattern: pattern.to_owned(),
            source,
        };
        // must stand alone, or `a)|(b` would escape the anchor below
        Regex::new(pattern).map_err(invalid)?;
        let regex = Regex::new(&format!("^(?:{pattern})")).map_err(invalid)?;
        Ok(self.push(Kind::Pattern {
            source: pattern.to_owned(),
            regex,
        }))
    }

    /// All `children` one after another, yields the list of their values
    pub fn sequence(&mut self, children: impl IntoIterator<Item = Rule>) -> Rule {
        self.push(Kind::Sequence(children.into_iter().collect()))
    }

    /// First of `alternatives` that matches the input
    /// (analog of `alt` from `nom`)
    pub fn choice(&mut self, alternatives: impl IntoIterator<Item = Rule>) -> Rule {
        self.push(Kind::Choice(alternatives.into_iter().collect()))
    }

    /// `child` as many times as it matches, but at least `lower` and at most
    /// `upper` times. `None` leaves the upper bound open.
    pub fn repeat(
        &mut self,
        child: Rule,
        lower: usize,
        upper: Option<usize>,
    ) -> Result<Rule, GrammarError> {
        if let Some(upper) = upper.filter(|&upper| upper < lower) {
            return Err(GrammarError::InvertedBounds { lower, upper });
        }
        Ok(self.push(Kind::Repeat {
            child,
            lower,
            upper,
        }))
    }

    /// `child` zero or one time
    pub fn optional(&mut self, child: Rule) -> Rule {
        self.push(Kind::Repeat {
            child,
            lower: 0,
            upper: Some(1),
        })
    }

    /// Matches nothing, consumes nothing
    pub fn empty(&mut self) -> Rule {
        self.sequence([])
    }

    /// Placeholder for a rule that is only known later, see [Grammar::define]
    pub fn forward(&mut self) -> Rule {
        self.forwards.push(None);
        let slot = self.forwards.len() - 1;
        self.push(Kind::Forward(slot))
    }

    /// Bind `forward` to `target`. A forward rule is bound once and for all.
    pub fn define(&mut self, forward: Rule, target: Rule) -> Result<(), GrammarError> {
        if target.0 >= self.nodes.len() {
            return Err(GrammarError::UnknownRule { rule: target.0 });
        }
        let slot = match self.nodes.get(forward.0).map(|node| &node.kind) {
            Some(Kind::Forward(slot)) => *slot,
            _ => return Err(GrammarError::NotForward { rule: forward.0 }),
        };
        let binding = self
            .forwards
            .get_mut(slot)
            .ok_or(GrammarError::NotForward { rule: forward.0 })?;
        if binding.is_some() {
            return Err(GrammarError::AlreadyDefined { slot });
        }
        *binding = Some(target);
        log::debug!("forward #{slot} bound to rule #{}", target.0);
        Ok(())
    }

    /// Rule a forward is bound to, if any
    pub fn target(&self, forward: Rule) -> Option<Rule> {
        match self.nodes.get(forward.0).map(|node| &node.kind) {
            Some(Kind::Forward(slot)) => self.forwards.get(*slot).copied().flatten(),
            _ => None,
        }
    }

    /// Copy of `rule` with `transform` in place of the one attached before.
    /// `rule` itself keeps its own transform; a copied forward rule shares
    /// the binding of the original. Rules of other grammars come back as they
    /// are and fail once parsed.
    pub fn map(&mut self, rule: Rule, transform: impl Fn(V) -> V + 'static) -> Rule {
        let Some(kind) = self.nodes.get(rule.0).map(|node| node.kind.clone()) else {
            return rule;
        };
        self.nodes.push(Node {
            kind,
            transform: Some(Rc::new(transform)),
        });
        Rule(self.nodes.len() - 1)
    }

    /// Render `rule` and everything below it, forward rules excluded
    pub fn describe(&self, rule: Rule) -> Describe<'_, V> {
        Describe {
            grammar: self,
            rule,
        }
    }
}

impl<V: ParseValue> Grammar<V> {
    /// Run `rule` against the start of `input`
    pub fn parse<'a>(&self, rule: Rule, input: &'a str) -> Result<(&'a str, V), ParseError> {
        log::debug!("parsing {} bytes with rule #{}", input.len(), rule.0);
        let result = self.apply(rule, input, 0);
        match &result {
            Ok((remaining, _)) => log::debug!(
                "rule #{} consumed {} bytes",
                rule.0,
                input.len() - remaining.len()
            ),
            Err(error) => log::debug!("rule #{} failed: {error}", rule.0),
        }
        result
    }

    /// Run `rule` against the whole of `input`
    pub fn parse_complete(&self, rule: Rule, input: &str) -> Result<V, ParseError> {
        let (remaining, value) = self.parse(rule, input)?;
        if !remaining.is_empty() {
            return Err(Mismatch::TrailingInput {
                remaining: remaining.to_owned(),
            }
            .into());
        }
        Ok(value)
    }

    /// `rule` bound to this grammar, as a [Parser]
    pub fn parser(&self, rule: Rule) -> RuleParser<'_, V> {
        RuleParser {
            grammar: self,
            rule,
        }
    }

    fn apply<'a>(
        &self,
        rule: Rule,
        input: &'a str,
        depth: usize,
    ) -> Result<(&'a str, V), ParseError> {
        if depth > self.depth_limit {
            return Err(GrammarError::DepthLimitExceeded {
                limit: self.depth_limit,
            }
            .into());
        }
        let node = self
            .nodes
            .get(rule.0)
            .ok_or(GrammarError::UnknownRule { rule: rule.0 })?;
        let (remaining, raw) = match &node.kind {
            Kind::Terminal(literal) => match input.strip_prefix(literal.as_str()) {
                Some(remaining) => (remaining, V::from_match(literal)),
                None => {
                    return Err(Mismatch::Literal {
                        expected: literal.clone(),
                        found: preview(input, literal.chars().count()),
                    }
                    .into())
                }
            },
            Kind::Pattern { source, regex } => match regex.find(input) {
                Some(found) if found.start() == 0 => {
                    (&input[found.end()..], V::from_match(found.as_str()))
                }
                _ => {
                    return Err(Mismatch::Pattern {
                        pattern: source.clone(),
                        found: preview(input, source.chars().count()),
                    }
                    .into())
                }
            },
            Kind::Sequence(children) => self.sequence_from(children, input, depth)?,
            Kind::Choice(alternatives) => self.choice_from(alternatives, input, depth)?,
            Kind::Repeat {
                child,
                lower,
                upper,
            } => self.repeat_from(rule, *child, (*lower, *upper), input, depth)?,
            Kind::Forward(slot) => {
                let target = self
                    .forwards
                    .get(*slot)
                    .copied()
                    .flatten()
                    .ok_or(GrammarError::UndefinedForward { slot: *slot })?;
                self.apply(target, input, depth + 1)?
            }
        };
        let value = match &node.transform {
            Some(transform) => transform(raw),
            None => raw,
        };
        Ok((remaining, value))
    }

    fn sequence_from<'a>(
        &self,
        children: &[Rule],
        input: &'a str,
        depth: usize,
    ) -> Result<(&'a str, V), ParseError> {
        let mut remaining = input;
        let mut values = Vec::with_capacity(children.len());
        for &child in children {
            let (new_remaining, value) = self.apply(child, remaining, depth + 1)?;
            values.push(value);
            remaining = new_remaining;
        }
        Ok((remaining, V::from_list(values)))
    }

    fn choice_from<'a>(
        &self,
        alternatives: &[Rule],
        input: &'a str,
        depth: usize,
    ) -> Result<(&'a str, V), ParseError> {
        for &alternative in alternatives {
            match self.apply(alternative, input, depth + 1) {
                Err(ParseError::Mismatch(mismatch)) => {
                    log::trace!("alternative #{} rejected: {mismatch}", alternative.0)
                }
                result => return result,
            }
        }
        Err(Mismatch::NoAlternative {
            remaining: input.to_owned(),
        }
        .into())
    }

    fn repeat_from<'a>(
        &self,
        rule: Rule,
        child: Rule,
        (lower, upper): (usize, Option<usize>),
        input: &'a str,
        depth: usize,
    ) -> Result<(&'a str, V), ParseError> {
        let mut remaining = input;
        let mut values = Vec::new();
        while upper.map_or(true, |upper| values.len() < upper) {
            match self.apply(child, remaining, depth + 1) {
                Ok((new_remaining, value)) => {
                    // the same empty match would come back on every later round
                    let room_left = upper.map_or(true, |upper| values.len() + 1 < upper);
                    if room_left && new_remaining.len() == remaining.len() {
                        return Err(GrammarError::ZeroWidthRepetition { rule: rule.0 }.into());
                    }
                    values.push(value);
                    remaining = new_remaining;
                }
                Err(ParseError::Mismatch(mismatch)) => {
                    log::trace!(
                        "repeat #{} stopped after {} items: {mismatch}",
                        rule.0,
                        values.len()
                    );
                    break;
                }
                Err(error) => return Err(error),
            }
        }
        if values.len() < lower {
            return Err(Mismatch::TooFewRepetitions {
                lower,
                count: values.len(),
            }
            .into());
        }
        Ok((remaining, V::from_list(values)))
    }
}

/// First `chars` characters of `input`, for error messages
fn preview(input: &str, chars: usize) -> String {
    input
        .char_indices()
        .nth(chars)
        .map_or(input, |(idx, _)| &input[..idx])
        .to_owned()
}

/// A [Rule] together with its [Grammar]
#[derive(Debug)]
pub struct RuleParser<'g, V> {
    grammar: &'g Grammar<V>,
    rule: Rule,
}
impl<V: ParseValue> Parser for RuleParser<'_, V> {
    type Dest = V;
    fn parse<'a>(&self, input: &'a str) -> Result<(&'a str, Self::Dest), ParseError> {
        self.grammar.parse(self.rule, input)
    }
}

/// Printable form of a rule, see [Grammar::describe]
pub struct Describe<'g, V> {
    grammar: &'g Grammar<V>,
    rule: Rule,
}
impl<V> Describe<'_, V> {
    fn write_list(&self, f: &mut fmt::Formatter<'_>, name: &str, rules: &[Rule]) -> fmt::Result {
        write!(f, "{name}(")?;
        for (idx, &rule) in rules.iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", self.grammar.describe(rule))?;
        }
        write!(f, ")")
    }
}
impl<V> fmt::Display for Describe<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(node) = self.grammar.nodes.get(self.rule.0) else {
            return write!(f, "Unknown(#{})", self.rule.0);
        };
        match &node.kind {
            Kind::Terminal(literal) => write!(f, "Terminal({literal:?})"),
            Kind::Pattern { source, .. } => write!(f, "Pattern(/{source}/)"),
            Kind::Sequence(children) => self.write_list(f, "Sequence", children),
            Kind::Choice(alternatives) => self.write_list(f, "Choice", alternatives),
            Kind::Repeat {
                child,
                lower,
                upper,
            } => {
                write!(f, "Repeat({}, {lower}, ", self.grammar.describe(*child))?;
                match upper {
                    Some(upper) => write!(f, "{upper})"),
                    None => write!(f, "*)"),
                }
            }
            Kind::Forward(slot) => write!(f, "Forward(#{slot})"),
        }
    }
}
