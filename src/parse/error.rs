/// Any failure a [rule](super::combinators::Rule) can report.
///
/// Only [`ParseError::Mismatch`] takes part in backtracking: a choice moves
/// on to its next alternative and a repeat stops collecting. A
/// [`ParseError::Grammar`] always reaches the caller.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    /// Input did not match here; another alternative may.
    #[error(transparent)]
    Mismatch(#[from] Mismatch),
    /// The grammar itself is broken or was misused.
    #[error(transparent)]
    Grammar(#[from] GrammarError),
}

impl ParseError {
    /// `true` for input mismatches, `false` for grammar defects.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Mismatch(_))
    }
}

/// Recoverable failure: what was expected against what was found.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Mismatch {
    #[error("expected \"{expected}\", got \"{found}\"")]
    Literal { expected: String, found: String },
    #[error("expected a match for /{pattern}/, got \"{found}\"")]
    Pattern { pattern: String, found: String },
    #[error("none of the alternatives matched \"{remaining}\"")]
    NoAlternative { remaining: String },
    #[error("expected at least {lower} repetitions, got {count}")]
    TooFewRepetitions { lower: usize, count: usize },
    #[error("unconsumed input \"{remaining}\"")]
    TrailingInput { remaining: String },
}

/// Unrecoverable failure: a grammar-authoring or usage defect.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GrammarError {
    #[error("forward rule #{slot} is used before being defined")]
    UndefinedForward { slot: usize },
    #[error("forward rule #{slot} is already defined")]
    AlreadyDefined { slot: usize },
    #[error("rule #{rule} is not a forward rule")]
    NotForward { rule: usize },
    #[error("rule #{rule} does not belong to this grammar")]
    UnknownRule { rule: usize },
    #[error("repeat bounds are inverted: lower {lower} > upper {upper}")]
    InvertedBounds { lower: usize, upper: usize },
    #[error("invalid pattern /{pattern}/: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("rule #{rule} would repeat without consuming input")]
    ZeroWidthRepetition { rule: usize },
    #[error("nesting depth limit of {limit} exceeded")]
    DepthLimitExceeded { limit: usize },
}
