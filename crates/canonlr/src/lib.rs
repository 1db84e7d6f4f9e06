//! Canonical LR(1) parser construction from plain-text grammars.

pub mod collection;
pub mod config;
pub mod first_sets;
pub mod grammar;
pub mod lr1;
pub mod parser;
pub mod table;
pub mod types;
pub mod util;

pub use crate::{
    config::Config,
    grammar::{Grammar, GrammarError, Leniency},
    parser::{BuildError, ParseError, Parser, SyntaxError, TraceEvent},
    table::{ConflictPolicy, Conflict},
};
pub use canonlr_runtime::{Accepted, NoTrace, Token, TraceSink, TracingSink};

/// Build a parser from grammar text with the default configuration.
pub fn build(source: &str) -> Result<Parser, BuildError> {
    Config::new().build(source)
}
