//! The built LR(1) parser.

use crate::{
    collection::{CanonicalCollection, CollectionError, StateID},
    config::Config,
    first_sets::FirstSets,
    grammar::{Grammar, GrammarError, RuleID, TerminalID, END_OF_INPUT},
    table::{Action, ParsingTables, TableError},
};
use canonlr_runtime::{Accepted, ParseAction, ParseEngine, ParseTable, Token, TraceSink, TracingSink};
use std::fmt;

pub type SyntaxError = canonlr_runtime::SyntaxError<StateID, String>;
pub type ParseError = canonlr_runtime::ParseError<StateID, String>;
pub type TraceEvent = canonlr_runtime::TraceEvent<StateID, String, RuleID>;

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("invalid grammar: {}", _0)]
    Grammar(
        #[from]
        #[source]
        GrammarError,
    ),

    #[error("while building the canonical collection: {}", _0)]
    Collection(
        #[from]
        #[source]
        CollectionError,
    ),

    #[error("while building the parsing table: {}", _0)]
    Table(
        #[from]
        #[source]
        TableError,
    ),
}

/// A grammar together with its canonical collection and parsing tables.
///
/// Building is done once; parsing only reads the tables, so one `Parser`
/// can run any number of parses.
#[derive(Debug)]
pub struct Parser {
    grammar: Grammar,
    first_sets: FirstSets,
    collection: CanonicalCollection,
    tables: ParsingTables,
}

impl Parser {
    pub fn new(grammar: Grammar, config: &Config) -> Result<Self, BuildError> {
        let first_sets = FirstSets::new(&grammar);
        let collection = CanonicalCollection::build(&grammar, &first_sets, config.max_states)?;
        let mut tables = ParsingTables::build(&grammar, &collection, config.conflict_policy);
        if config.deny_conflicts {
            tables = tables.deny_conflicts()?;
        }
        tracing::debug!(
            "built parser: {} rule(s), {} state(s), {} conflict(s)",
            grammar.rules.len(),
            collection.len(),
            tables.conflicts().len()
        );
        Ok(Self {
            grammar,
            first_sets,
            collection,
            tables,
        })
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn first_sets(&self) -> &FirstSets {
        &self.first_sets
    }

    pub fn collection(&self) -> &CanonicalCollection {
        &self.collection
    }

    pub fn tables(&self) -> &ParsingTables {
        &self.tables
    }

    /// Run the automaton over `tokens`, logging every transition at `debug`.
    pub fn parse<I>(&self, tokens: I) -> Result<Accepted, ParseError>
    where
        I: IntoIterator,
        I::Item: Token<String>,
    {
        self.parse_with(tokens, &mut TracingSink)
    }

    /// Run the automaton over `tokens`, reporting every transition to `sink`.
    pub fn parse_with<I, S>(&self, tokens: I, sink: &mut S) -> Result<Accepted, ParseError>
    where
        I: IntoIterator,
        I::Item: Token<String>,
        S: TraceSink<StateID, String, RuleID> + ?Sized,
    {
        ParseEngine::new(self).run(tokens, sink)
    }

    /// The item-set dump of every state.
    pub fn display_items(&self) -> impl fmt::Display + '_ {
        self.collection.display(&self.grammar)
    }

    /// The ACTION and GOTO dump.
    pub fn display_tables(&self) -> impl fmt::Display + '_ {
        self.tables.display(&self.grammar)
    }
}

impl ParseTable for Parser {
    type State = StateID;
    type Symbol = String;
    type Reduce = RuleID;

    fn initial_state(&self) -> StateID {
        StateID::START
    }

    fn end_of_input(&self) -> String {
        END_OF_INPUT.to_owned()
    }

    fn action(&self, current: StateID, lookahead: &String) -> Option<ParseAction<StateID, String, RuleID>> {
        let terminal: TerminalID = self.grammar.terminal(lookahead)?;
        match self.tables.action(current, terminal)? {
            Action::Shift(next) => Some(ParseAction::Shift(next)),
            Action::Reduce(id) => {
                let rule = self.grammar.rule(id);
                let lhs = self.grammar.nonterminals[&rule.left()].name().to_owned();
                Some(ParseAction::Reduce(id, lhs, rule.right().len()))
            }
            Action::Accept => Some(ParseAction::Accept),
        }
    }

    fn goto(&self, current: StateID, symbol: &String) -> Option<StateID> {
        let n = self.grammar.nonterminal(symbol)?;
        self.tables.goto(current, n)
    }
}
