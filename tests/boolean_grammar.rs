use descent::{BoolExpr, GrammarError, ParseError, Parser, DEFAULT_DEPTH_LIMIT};
use rstest::rstest;

#[rstest]
#[case("t", true)]
#[case("f", false)]
#[case("!(t)", false)]
#[case("&(t, f)", false)]
#[case("|(t, f)", true)]
#[case("&(  t, f  , f)", false)]
#[case("!(&(f,t))", true)]
#[case("&(|(f))", false)]
#[case("|(f, !(f), f)", true)]
#[case("&(t, |(f, t), !(!(t)))", true)]
fn test_evaluate(#[case] input: &str, #[case] expected: bool) {
    let expr = BoolExpr::new().unwrap();
    assert_eq!(expr.evaluate(input), Ok(expected));
}

#[rstest]
#[case("")]
#[case("T")]
#[case("!t")]
#[case("&(t f)")]
#[case("|(t,,f)")]
#[case("&(t, f")]
fn test_malformed(#[case] input: &str) {
    let expr = BoolExpr::new().unwrap();
    let error = expr.evaluate(input).unwrap_err();
    assert!(error.is_recoverable(), "{input}: {error}");
}

#[test]
fn test_repeated_evaluation() {
    let expr = BoolExpr::new().unwrap();
    let first = expr.evaluate("|(&(t, f), !(f))");
    assert_eq!(first, Ok(true));
    assert_eq!(expr.evaluate("|(&(t, f), !(f))"), first);
    assert_eq!(expr.parse("t, f"), Ok((", f", true)));
}

#[test]
fn test_deep_nesting_hits_depth_limit() {
    let mut expr = BoolExpr::new().unwrap();
    expr.set_depth_limit(100);
    let input = format!("{}t{}", "!(".repeat(200), ")".repeat(200));
    assert_eq!(
        expr.evaluate(&input),
        Err(ParseError::Grammar(GrammarError::DepthLimitExceeded { limit: 100 }))
    );
    let shallow = format!("{}t{}", "!(".repeat(4), ")".repeat(4));
    assert_eq!(expr.evaluate(&shallow), Ok(true));
}

#[test]
fn test_default_depth_limit_fits_test_thread_stack() {
    let expr = BoolExpr::new().unwrap();
    let input = format!("{}t{}", "!(".repeat(2000), ")".repeat(2000));
    assert_eq!(
        expr.evaluate(&input),
        Err(ParseError::Grammar(GrammarError::DepthLimitExceeded {
            limit: DEFAULT_DEPTH_LIMIT
        }))
    );
    let nested = format!("{}t{}", "!(".repeat(60), ")".repeat(60));
    assert_eq!(expr.evaluate(&nested), Ok(true));
}
