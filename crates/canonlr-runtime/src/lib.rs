//! Runtime implementation of the table-driven LR(1) parsing driver.

pub mod definition;
pub mod parser;
pub mod trace;

pub use crate::{
    definition::{ParseAction, ParseTable},
    parser::{Accepted, ParseEngine, ParseError, Step, SyntaxError, Token},
    trace::{NoTrace, TraceEvent, TraceSink, TracingSink},
};
