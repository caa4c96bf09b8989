use std::fmt;

/// Values a [grammar](super::combinators::Grammar) can produce.
///
/// Terminals and patterns build their raw value with [`from_match`](Self::from_match),
/// sequences and repeats with [`from_list`](Self::from_list). A transform
/// attached to a rule then turns the raw value into whatever the caller wants.
pub trait ParseValue: Sized {
    fn from_match(text: &str) -> Self;
    fn from_list(items: Vec<Self>) -> Self;
}

/// General-purpose parse value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Text matched by a terminal or a pattern.
    Text(String),
    /// Ordered results of a sequence or a repeat.
    List(Vec<Value>),
    /// Produced by transforms, e.g. the boolean grammar.
    Bool(bool),
}

impl Value {
    /// `Bool` is itself, `Text` and `List` are truthy when non-empty.
    pub fn truthy(&self) -> bool {
        match self {
            Value::Bool(value) => *value,
            Value::Text(text) => !text.is_empty(),
            Value::List(items) => !items.is_empty(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Items of a `List`; any other value becomes a one-element list.
    pub fn into_list(self) -> Vec<Value> {
        match self {
            Value::List(items) => items,
            other => vec![other],
        }
    }

    /// Take the `index`-th item of a `List`, or an empty list if there is none.
    pub fn into_item(self, index: usize) -> Value {
        match self {
            Value::List(items) => items.into_iter().nth(index).unwrap_or_default(),
            _ => Value::default(),
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::List(Vec::new())
    }
}

impl ParseValue for Value {
    fn from_match(text: &str) -> Self {
        Value::Text(text.to_owned())
    }
    fn from_list(items: Vec<Self>) -> Self {
        Value::List(items)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(text) => write!(f, "{text:?}"),
            Value::Bool(value) => write!(f, "{value}"),
            Value::List(items) => {
                write!(f, "[")?;
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}

/// Recognizer values: whatever text the rule consumed
impl ParseValue for String {
    fn from_match(text: &str) -> Self {
        text.to_owned()
    }
    fn from_list(items: Vec<Self>) -> Self {
        items.concat()
    }
}
