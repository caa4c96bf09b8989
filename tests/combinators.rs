use descent::{Grammar, GrammarError, Mismatch, ParseError, Value};

/// `<group>*` where `<group> = ( <group>* )`
fn parens() -> (Grammar<String>, descent::Rule) {
    let mut grammar = Grammar::new();
    let nested = grammar.forward();
    let open = grammar.terminal("(");
    let close = grammar.terminal(")");
    let group = grammar.sequence([open, nested, close]);
    let groups = grammar.repeat(group, 0, None).unwrap();
    grammar.define(nested, groups).unwrap();
    (grammar, nested)
}

#[test]
fn test_nested_parens() {
    let (grammar, parens) = parens();
    assert_eq!(grammar.parse(parens, "(()())"), Ok(("", "(()())".to_string())));
    assert_eq!(grammar.parse(parens, "()(())x"), Ok(("x", "()(())".to_string())));
    assert_eq!(grammar.parse_complete(parens, ""), Ok(String::new()));
    assert!(grammar.parse_complete(parens, "(()").is_err());
}

#[test]
fn test_unbound_forward_is_not_a_mismatch() {
    let mut grammar = Grammar::<Value>::new();
    let unbound = grammar.forward();
    let error = grammar.parse(unbound, "anything").unwrap_err();
    assert!(!error.is_recoverable());
    assert_eq!(error, ParseError::Grammar(GrammarError::UndefinedForward { slot: 0 }));
}

#[test]
fn test_sequence_failure_leaks_no_remainder() {
    let mut grammar = Grammar::<Value>::new();
    let a = grammar.terminal("a");
    let b = grammar.terminal("b");
    let c = grammar.terminal("c");
    let abc = grammar.sequence([a, b, c]);
    // the failing sequence contributes nothing, the choice restarts from "abd"
    let ab = grammar.sequence([a, b]);
    let either = grammar.choice([abc, ab]);
    assert_eq!(
        grammar.parse(abc, "abd"),
        Err(Mismatch::Literal {
            expected: "c".into(),
            found: "d".into()
        }
        .into())
    );
    assert_eq!(
        grammar.parse(either, "abd"),
        Ok((
            "d",
            Value::List(vec![Value::Text("a".into()), Value::Text("b".into())])
        ))
    );
}

#[test]
fn test_first_match_wins() {
    let mut grammar = Grammar::<Value>::new();
    let t = grammar.terminal("t");
    let t2 = grammar.terminal("t2");
    let choice = grammar.choice([t, t2]);
    assert_eq!(
        grammar.parse(choice, "t2"),
        Ok(("2", Value::Text("t".into())))
    );
}

#[test]
fn test_repeat_bounds() {
    let mut grammar = Grammar::<Value>::new();
    let a = grammar.terminal("a");
    let repeat = grammar.repeat(a, 2, Some(3)).unwrap();
    let (remaining, value) = grammar.parse(repeat, "aaaa").unwrap();
    assert_eq!(remaining, "a");
    assert_eq!(value.as_list().map(<[Value]>::len), Some(3));
    assert_eq!(
        grammar.parse(repeat, "a"),
        Err(Mismatch::TooFewRepetitions { lower: 2, count: 1 }.into())
    );
}

#[test]
fn test_transform_sees_transformed_children() {
    let mut grammar = Grammar::<Value>::new();
    let digits = grammar.pattern(r"[0-9]+").unwrap();
    let digits = grammar.map(digits, |v| Value::Bool(v.as_text() != Some("0")));
    let plus = grammar.terminal("+");
    let sum = grammar.sequence([digits, plus, digits]);
    let sum = grammar.map(sum, |v| {
        let parts = v.into_list();
        Value::Bool(parts[0].as_bool() == Some(true) && parts[2].as_bool() == Some(true))
    });
    assert_eq!(grammar.parse(sum, "12+7"), Ok(("", Value::Bool(true))));
    assert_eq!(grammar.parse(sum, "12+0"), Ok(("", Value::Bool(false))));
}
