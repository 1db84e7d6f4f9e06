use canonlr::{
    collection::StateID, BuildError, GrammarError, NoTrace, ParseError, TraceEvent,
};
use canonlr_lexer::tokenize;

fn rule_text(parser: &canonlr::Parser, event: &TraceEvent) -> Option<String> {
    match event {
        TraceEvent::Reduce { reduce, .. } => Some(
            parser
                .grammar()
                .rule(*reduce)
                .display(parser.grammar())
                .to_string(),
        ),
        _ => None,
    }
}

#[test]
fn single_identifier_is_accepted() {
    let parser = canonlr::build("S -> id").unwrap();
    let tokens = tokenize("x");
    let accepted = parser.parse_with(&tokens, &mut NoTrace).unwrap();
    assert_eq!(accepted.shifts, 1);
    assert_eq!(accepted.reductions, 0);
}

#[test]
fn left_recursive_sum() {
    let parser = canonlr::build("E -> E + T\nE -> T\nT -> id").unwrap();
    let mut events = vec![];
    let accepted = parser
        .parse_with(["id", "+", "id"], &mut events)
        .unwrap();
    assert_eq!(accepted.shifts, 3);
    assert_eq!(accepted.reductions, 3);

    let steps: Vec<String> = events
        .iter()
        .map(|event| match event {
            TraceEvent::Shift { symbol, .. } => format!("shift {}", symbol),
            TraceEvent::Reduce { .. } => format!("reduce {}", rule_text(&parser, event).unwrap()),
            TraceEvent::Accept { .. } => "accept".to_owned(),
            TraceEvent::Reject { symbol, .. } => format!("reject {}", symbol),
        })
        .collect();
    assert_eq!(
        steps,
        [
            "shift id",
            "reduce T -> id",
            "reduce E -> T",
            "shift +",
            "shift id",
            "reduce T -> id",
            "accept",
        ]
    );
}

#[test]
fn accept_requires_the_start_production() {
    // `E -> T` never completes the start production `E -> E + T`
    let parser = canonlr::build("E -> E + T\nE -> T\nT -> id").unwrap();
    let err = parser.parse_with(["id"], &mut NoTrace).unwrap_err();
    assert!(matches!(
        err,
        ParseError::Syntax(ref err) if err.symbol == "$" && err.symbols == ["E".to_owned()]
    ));
}

#[test]
fn unexpected_number() {
    let parser = canonlr::build("S -> id").unwrap();
    let tokens = tokenize("42");
    let mut events = vec![];
    let err = parser.parse_with(&tokens, &mut events).unwrap_err();
    match err {
        ParseError::Syntax(err) => {
            assert_eq!(err.state, StateID::START);
            assert_eq!(err.symbol, "num");
            assert_eq!(err.states, [StateID::START]);
            assert!(err.symbols.is_empty());
        }
        err => panic!("unexpected error: {}", err),
    }
    assert!(matches!(
        events.as_slice(),
        [TraceEvent::Reject { state: StateID::START, .. }]
    ));
}

#[test]
fn malformed_only_grammar_is_not_an_empty_language() {
    let err = canonlr::build("S => id").unwrap_err();
    assert!(matches!(err, BuildError::Grammar(GrammarError::NoProductions)));
}

#[test]
fn epsilon_reduction_pushes_without_popping() {
    let parser = canonlr::build("S -> L\nL -> a L\nL -> ε").unwrap();

    let mut events = vec![];
    let accepted = parser.parse_with(["a", "a"], &mut events).unwrap();
    assert_eq!(accepted.shifts, 2);
    assert_eq!(accepted.reductions, 3);

    let pops: Vec<(String, usize)> = events
        .iter()
        .filter_map(|event| match event {
            TraceEvent::Reduce { popped, .. } => {
                Some((rule_text(&parser, event).unwrap(), *popped))
            }
            _ => None,
        })
        .collect();
    assert_eq!(
        pops,
        [
            ("L -> ε".to_owned(), 0),
            ("L -> a L".to_owned(), 2),
            ("L -> a L".to_owned(), 2),
        ]
    );

    let accepted = parser.parse_with(Vec::<&str>::new(), &mut NoTrace).unwrap();
    assert_eq!(accepted.shifts, 0);
    assert_eq!(accepted.reductions, 1);
}

#[test]
fn end_marker_token_does_not_end_the_input() {
    let parser = canonlr::build("S -> id").unwrap();
    let err = parser
        .parse_with(["id", "$", "id", "id"], &mut NoTrace)
        .unwrap_err();
    match err {
        ParseError::Syntax(err) => {
            assert_eq!(err.symbol, "$");
            assert_eq!(err.symbols, ["id".to_owned()]);
        }
        err => panic!("unexpected error: {}", err),
    }
}
