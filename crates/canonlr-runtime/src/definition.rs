//! Parser definition.

use std::fmt;

/// The trait for abstracting the generated LR(1) parse table.
pub trait ParseTable {
    /// The number to identify the state of LR(1) automaton.
    type State: Copy + fmt::Debug;

    /// The grammar symbols, both as lookaheads and on the symbol stack.
    type Symbol: Clone + PartialEq + fmt::Debug;

    /// The context value corresponding to the matched production rule.
    type Reduce: Copy + fmt::Debug;

    /// Return the initial state number.
    fn initial_state(&self) -> Self::State;

    /// Return the symbol used as the lookahead once the input is exhausted.
    ///
    /// This symbol is never a valid input token.
    fn end_of_input(&self) -> Self::Symbol;

    /// Return the action corresponding to the specified state number and
    /// lookahead symbol, or `None` if the table has no entry for them.
    fn action(
        &self,
        current: Self::State,
        lookahead: &Self::Symbol,
    ) -> Option<ParseAction<Self::State, Self::Symbol, Self::Reduce>>;

    /// Return the successor state after reducing to `symbol` in `current`.
    fn goto(&self, current: Self::State, symbol: &Self::Symbol) -> Option<Self::State>;
}

impl<T: ?Sized> ParseTable for &T
where
    T: ParseTable,
{
    type State = T::State;
    type Symbol = T::Symbol;
    type Reduce = T::Reduce;

    fn initial_state(&self) -> Self::State {
        (**self).initial_state()
    }

    fn end_of_input(&self) -> Self::Symbol {
        (**self).end_of_input()
    }

    fn action(
        &self,
        current: Self::State,
        lookahead: &Self::Symbol,
    ) -> Option<ParseAction<Self::State, Self::Symbol, Self::Reduce>> {
        (**self).action(current, lookahead)
    }

    fn goto(&self, current: Self::State, symbol: &Self::Symbol) -> Option<Self::State> {
        (**self).goto(current, symbol)
    }
}

#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ParseAction<TState, TSymbol, TReduce> {
    /// Push the lookahead and move to the specified state.
    Shift(TState),

    /// Pop `n` entries from both stacks and push the left-hand side symbol.
    Reduce(TReduce, TSymbol, usize),

    Accept,
}
