//! Structured trace events emitted while driving the automaton.

use std::fmt;

/// A single observable transition of the parser engine.
#[derive(Debug, Clone, PartialEq)]
pub enum TraceEvent<TState, TSym, TReduce> {
    Shift {
        state: TState,
        symbol: TSym,
        target: TState,
    },
    Reduce {
        state: TState,
        reduce: TReduce,
        lhs: TSym,
        popped: usize,
        goto: TState,
    },
    Accept {
        state: TState,
    },
    Reject {
        state: TState,
        symbol: TSym,
    },
}

/// A consumer of trace events.
///
/// `states` and `symbols` are the stacks as they are right after the event.
pub trait TraceSink<TState, TSym, TReduce> {
    fn event(
        &mut self,
        event: &TraceEvent<TState, TSym, TReduce>,
        states: &[TState],
        symbols: &[TSym],
    );
}

impl<TState, TSym, TReduce> TraceSink<TState, TSym, TReduce> for Vec<TraceEvent<TState, TSym, TReduce>>
where
    TState: Clone,
    TSym: Clone,
    TReduce: Clone,
{
    fn event(&mut self, event: &TraceEvent<TState, TSym, TReduce>, _: &[TState], _: &[TSym]) {
        self.push(event.clone());
    }
}

/// Discards every event.
#[derive(Debug, Copy, Clone, Default)]
pub struct NoTrace;

impl<TState, TSym, TReduce> TraceSink<TState, TSym, TReduce> for NoTrace {
    fn event(&mut self, _: &TraceEvent<TState, TSym, TReduce>, _: &[TState], _: &[TSym]) {}
}

/// Forwards every event to `tracing` at the debug level.
#[derive(Debug, Copy, Clone, Default)]
pub struct TracingSink;

impl<TState, TSym, TReduce> TraceSink<TState, TSym, TReduce> for TracingSink
where
    TState: fmt::Debug,
    TSym: fmt::Debug,
    TReduce: fmt::Debug,
{
    fn event(
        &mut self,
        event: &TraceEvent<TState, TSym, TReduce>,
        states: &[TState],
        symbols: &[TSym],
    ) {
        match event {
            TraceEvent::Reject { state, symbol } => {
                tracing::debug!(?state, ?symbol, ?states, ?symbols, "reject");
            }
            event => {
                tracing::debug!(?event, ?states, ?symbols);
            }
        }
    }
}
