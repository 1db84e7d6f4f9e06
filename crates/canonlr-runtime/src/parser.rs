//! Parser.

use crate::{
    definition::{ParseAction, ParseTable},
    trace::{TraceEvent, TraceSink},
};
use std::fmt;

/// A trait for abstracting token symbols.
pub trait Token<TSym> {
    /// Return the grammar terminal this token stands for.
    fn as_symbol(&self) -> TSym;
}

impl Token<String> for &str {
    fn as_symbol(&self) -> String {
        (*self).to_owned()
    }
}

impl Token<String> for String {
    fn as_symbol(&self) -> String {
        self.clone()
    }
}

/// The outcome of a single transition of the automaton.
#[derive(Debug, Clone, PartialEq)]
pub enum Step<TState, TReduce> {
    /// The lookahead was pushed and the input must advance.
    Shifted(TState),

    /// `popped` entries were replaced with the left-hand side of `reduce`.
    Reduced {
        reduce: TReduce,
        popped: usize,
        goto: TState,
    },

    Accepted,
}

/// Statistics of a successful parse.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Accepted {
    pub shifts: usize,
    pub reductions: usize,
}

/// The LR(1) parser engine driven by a parse table.
///
/// The engine owns the state and symbol stacks of one parse; the table is
/// only ever read, so many engines may share it.
pub struct ParseEngine<TDef>
where
    TDef: ParseTable,
{
    definition: TDef,
    states_stack: Vec<TDef::State>,
    symbols_stack: Vec<TDef::Symbol>,
}

impl<TDef> fmt::Debug for ParseEngine<TDef>
where
    TDef: ParseTable,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseEngine")
            .field("states_stack", &self.states_stack)
            .field("symbols_stack", &self.symbols_stack)
            .finish_non_exhaustive()
    }
}

impl<TDef> ParseEngine<TDef>
where
    TDef: ParseTable,
{
    /// Create a parser engine using the specified parse table.
    pub fn new(definition: TDef) -> Self {
        let initial_state = definition.initial_state();
        Self {
            definition,
            states_stack: vec![initial_state],
            symbols_stack: vec![],
        }
    }

    pub fn states(&self) -> &[TDef::State] {
        &self.states_stack
    }

    pub fn symbols(&self) -> &[TDef::Symbol] {
        &self.symbols_stack
    }

    /// Perform exactly one transition for the given lookahead symbol.
    ///
    /// A shift pushes `lookahead`; the caller is responsible for advancing
    /// the input afterwards. A reduce never consumes the lookahead.
    pub fn step(
        &mut self,
        lookahead: &TDef::Symbol,
    ) -> Result<Step<TDef::State, TDef::Reduce>, ParseError<TDef::State, TDef::Symbol>> {
        let current = *self.states_stack.last().ok_or(ParseError::EmptyStack)?;

        match self.definition.action(current, lookahead) {
            Some(ParseAction::Shift(next)) => {
                self.states_stack.push(next);
                self.symbols_stack.push(lookahead.clone());
                Ok(Step::Shifted(next))
            }

            Some(ParseAction::Reduce(reduce, lhs, n)) => {
                if n >= self.states_stack.len() || n > self.symbols_stack.len() {
                    return Err(ParseError::EmptyStack);
                }
                self.states_stack.truncate(self.states_stack.len() - n);
                self.symbols_stack.truncate(self.symbols_stack.len() - n);

                let top = *self.states_stack.last().ok_or(ParseError::EmptyStack)?;
                let goto = self
                    .definition
                    .goto(top, &lhs)
                    .ok_or_else(|| ParseError::MissingGoto {
                        state: top,
                        symbol: lhs.clone(),
                    })?;
                self.symbols_stack.push(lhs);
                self.states_stack.push(goto);

                Ok(Step::Reduced {
                    reduce,
                    popped: n,
                    goto,
                })
            }

            Some(ParseAction::Accept) => Ok(Step::Accepted),

            None => Err(self.syntax_error(current, lookahead)),
        }
    }

    fn syntax_error(
        &self,
        state: TDef::State,
        symbol: &TDef::Symbol,
    ) -> ParseError<TDef::State, TDef::Symbol> {
        ParseError::Syntax(SyntaxError {
            state,
            symbol: symbol.clone(),
            states: self.states_stack.clone(),
            symbols: self.symbols_stack.clone(),
        })
    }

    /// Drive the automaton over the whole token sequence until it accepts
    /// or rejects, reporting every transition to `sink`.
    ///
    /// An input token spelled like the end-of-input marker is rejected where
    /// it appears, so acceptance always covers the entire input.
    pub fn run<I, S>(
        &mut self,
        tokens: I,
        sink: &mut S,
    ) -> Result<Accepted, ParseError<TDef::State, TDef::Symbol>>
    where
        I: IntoIterator,
        I::Item: Token<TDef::Symbol>,
        S: TraceSink<TDef::State, TDef::Symbol, TDef::Reduce> + ?Sized,
    {
        let eoi = self.definition.end_of_input();
        let mut input = tokens.into_iter().map(|t| t.as_symbol()).fuse();
        let (mut lookahead, mut in_band) = next_lookahead(&mut input, &eoi);
        let mut stats = Accepted::default();

        loop {
            let current = *self.states_stack.last().ok_or(ParseError::EmptyStack)?;

            let result = if in_band && lookahead == eoi {
                Err(self.syntax_error(current, &lookahead))
            } else {
                self.step(&lookahead)
            };
            let step = match result {
                Ok(step) => step,
                Err(err) => {
                    if let ParseError::Syntax(ref syntax) = err {
                        sink.event(
                            &TraceEvent::Reject {
                                state: syntax.state,
                                symbol: syntax.symbol.clone(),
                            },
                            &self.states_stack,
                            &self.symbols_stack,
                        );
                    }
                    return Err(err);
                }
            };

            match step {
                Step::Shifted(target) => {
                    stats.shifts += 1;
                    let (next, from_input) = next_lookahead(&mut input, &eoi);
                    in_band = from_input;
                    let symbol = std::mem::replace(&mut lookahead, next);
                    sink.event(
                        &TraceEvent::Shift {
                            state: current,
                            symbol,
                            target,
                        },
                        &self.states_stack,
                        &self.symbols_stack,
                    );
                }

                Step::Reduced {
                    reduce,
                    popped,
                    goto,
                } => {
                    stats.reductions += 1;
                    let lhs = self
                        .symbols_stack
                        .last()
                        .cloned()
                        .ok_or(ParseError::EmptyStack)?;
                    sink.event(
                        &TraceEvent::Reduce {
                            state: current,
                            reduce,
                            lhs,
                            popped,
                            goto,
                        },
                        &self.states_stack,
                        &self.symbols_stack,
                    );
                }

                Step::Accepted => {
                    sink.event(
                        &TraceEvent::Accept { state: current },
                        &self.states_stack,
                        &self.symbols_stack,
                    );
                    return Ok(stats);
                }
            }
        }
    }
}

/// The next lookahead, and whether it was read from the input.
fn next_lookahead<TSym: Clone>(input: &mut impl Iterator<Item = TSym>, eoi: &TSym) -> (TSym, bool) {
    match input.next() {
        Some(symbol) => (symbol, true),
        None => (eoi.clone(), false),
    }
}

/// No action exists for the current state and lookahead.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("no action in state {state:?} for symbol {symbol:?} (states: {states:?}, symbols: {symbols:?})")]
pub struct SyntaxError<TState: fmt::Debug, TSym: fmt::Debug> {
    pub state: TState,
    pub symbol: TSym,
    pub states: Vec<TState>,
    pub symbols: Vec<TSym>,
}

#[derive(Debug, thiserror::Error)]
pub enum ParseError<TState: fmt::Debug, TSym: fmt::Debug> {
    #[error("syntax error: {}", _0)]
    Syntax(SyntaxError<TState, TSym>),

    #[error("missing goto entry in state {state:?} for {symbol:?}")]
    MissingGoto { state: TState, symbol: TSym },

    #[error("the state stack has been exhausted")]
    EmptyStack,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::NoTrace;

    // A hand-written table for `S -> ( S ) | x`:
    //   0: S -> ( S )   1: S -> x
    #[derive(Debug)]
    struct Parens;

    impl ParseTable for Parens {
        type State = u8;
        type Symbol = String;
        type Reduce = u8;

        fn initial_state(&self) -> u8 {
            0
        }

        fn end_of_input(&self) -> String {
            "$".into()
        }

        fn action(&self, current: u8, lookahead: &String) -> Option<ParseAction<u8, String, u8>> {
            use ParseAction::*;
            match (current, lookahead.as_str()) {
                (0 | 2, "(") => Some(Shift(2)),
                (0 | 2, "x") => Some(Shift(3)),
                (1, "$") => Some(Accept),
                (3, ")" | "$") => Some(Reduce(1, "S".into(), 1)),
                (4, ")") => Some(Shift(5)),
                (5, ")" | "$") => Some(Reduce(0, "S".into(), 3)),
                _ => None,
            }
        }

        fn goto(&self, current: u8, symbol: &String) -> Option<u8> {
            match (current, symbol.as_str()) {
                (0, "S") => Some(1),
                (2, "S") => Some(4),
                _ => None,
            }
        }
    }

    #[test]
    fn accepts_nested_input() {
        let mut engine = ParseEngine::new(Parens);
        let mut events = vec![];
        let accepted = engine
            .run(["(", "(", "x", ")", ")"], &mut events)
            .unwrap();
        assert_eq!(accepted.shifts, 5);
        assert_eq!(accepted.reductions, 3);
        assert!(matches!(events.last(), Some(TraceEvent::Accept { state: 1 })));
        assert_eq!(engine.symbols(), ["S".to_owned()]);
        assert_eq!(engine.states(), [0, 1]);
    }

    #[test]
    fn reduce_pops_exactly_the_right_side() {
        let mut engine = ParseEngine::new(Parens);
        for tok in ["(", "x"] {
            assert!(matches!(engine.step(&tok.to_owned()), Ok(Step::Shifted(..))));
        }
        assert_eq!(engine.states().len(), 3);

        let step = engine.step(&")".to_owned()).unwrap();
        assert_eq!(
            step,
            Step::Reduced {
                reduce: 1,
                popped: 1,
                goto: 4
            }
        );
        assert_eq!(engine.states(), [0, 2, 4]);
        assert_eq!(engine.symbols(), ["(".to_owned(), "S".to_owned()]);
    }

    #[test]
    fn reports_offending_symbol_with_stacks() {
        let mut engine = ParseEngine::new(Parens);
        let mut events = vec![];
        let err = engine.run(["(", ")"], &mut events).unwrap_err();
        match err {
            ParseError::Syntax(err) => {
                assert_eq!(err.state, 2);
                assert_eq!(err.symbol, ")");
                assert_eq!(err.states, [0, 2]);
                assert_eq!(err.symbols, ["(".to_owned()]);
            }
            err => panic!("unexpected error: {}", err),
        }
        assert!(matches!(events.last(), Some(TraceEvent::Reject { state: 2, .. })));
    }

    #[test]
    fn end_marker_in_the_input_is_rejected() {
        let mut engine = ParseEngine::new(Parens);
        let mut events = vec![];
        let err = engine.run(["x", "$", "x"], &mut events).unwrap_err();
        match err {
            ParseError::Syntax(err) => {
                assert_eq!(err.state, 3);
                assert_eq!(err.symbol, "$");
                assert_eq!(err.states, [0, 3]);
                assert_eq!(err.symbols, ["x".to_owned()]);
            }
            err => panic!("unexpected error: {}", err),
        }
        assert!(!events.iter().any(|e| matches!(e, TraceEvent::Accept { .. })));
        assert!(matches!(events.last(), Some(TraceEvent::Reject { state: 3, .. })));
    }

    #[test]
    fn end_of_input_is_the_reserved_symbol() {
        let mut engine = ParseEngine::new(Parens);
        let err = engine.run(["("], &mut NoTrace).unwrap_err();
        assert!(matches!(err, ParseError::Syntax(SyntaxError { ref symbol, .. }) if symbol == "$"));
    }
}
