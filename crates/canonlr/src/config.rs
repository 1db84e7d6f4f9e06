//! Build configuration.

use crate::{
    grammar::Leniency,
    parser::{BuildError, Parser},
    table::ConflictPolicy,
};

/// The default ceiling on the number of LR(1) states.
pub const DEFAULT_MAX_STATES: usize = 10_000;

#[derive(Debug, Clone)]
pub struct Config {
    pub(crate) leniency: Leniency,
    pub(crate) conflict_policy: ConflictPolicy,
    pub(crate) deny_conflicts: bool,
    pub(crate) max_states: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub const fn new() -> Self {
        Self {
            leniency: Leniency::Lenient,
            conflict_policy: ConflictPolicy::Legacy,
            deny_conflicts: false,
            max_states: DEFAULT_MAX_STATES,
        }
    }

    /// Fail on grammar lines that are not productions instead of skipping them.
    pub fn strict(&mut self, enabled: bool) -> &mut Self {
        self.leniency = if enabled {
            Leniency::Strict
        } else {
            Leniency::Lenient
        };
        self
    }

    pub fn conflict_policy(&mut self, policy: ConflictPolicy) -> &mut Self {
        self.conflict_policy = policy;
        self
    }

    /// Fail the build if any ACTION cell had more than one candidate.
    pub fn deny_conflicts(&mut self, enabled: bool) -> &mut Self {
        self.deny_conflicts = enabled;
        self
    }

    pub fn max_states(&mut self, limit: usize) -> &mut Self {
        self.max_states = limit;
        self
    }

    pub fn leniency(&self) -> Leniency {
        self.leniency
    }

    /// Load the grammar text and build a parser from it.
    pub fn build(&self, source: &str) -> Result<Parser, BuildError> {
        let grammar = crate::grammar::Grammar::parse(source, self.leniency)?;
        Parser::new(grammar, self)
    }
}
