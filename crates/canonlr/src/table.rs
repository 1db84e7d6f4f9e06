//! ACTION and GOTO tables derived from the canonical collection.

use crate::{
    collection::{CanonicalCollection, StateID},
    grammar::{Grammar, NonterminalID, RuleID, SymbolID, TerminalID},
    types::Map,
    util::display_fn,
};
use std::fmt;

/// The action that the LR automaton in a state performs on a particular
/// lookahead symbol.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Action {
    /// Read a lookahead symbol and transition to the specified state.
    Shift(StateID),

    /// Reduce to the specified production rule.
    Reduce(RuleID),

    Accept,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Shift(n) => write!(f, "s{}", n),
            Action::Reduce(r) => write!(f, "r{}", r),
            Action::Accept => f.write_str("accept"),
        }
    }
}

/// How a cell with several derivable actions is resolved.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum ConflictPolicy {
    /// A shift or accept beats any reduce, and the first reduce found in the
    /// state's item order beats the later ones.
    #[default]
    Legacy,

    /// A shift beats any reduce, and among reduces the lowest production
    /// index wins.
    PreferShift,
}

/// A cell of the ACTION table that more than one action was derived for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub state: StateID,
    pub terminal: TerminalID,
    pub chosen: Action,
    pub discarded: Vec<Action>,
}

impl Conflict {
    pub fn is_shift_reduce(&self) -> bool {
        self.discarded
            .iter()
            .chain(Some(&self.chosen))
            .any(|a| matches!(a, Action::Shift(..)))
    }

    pub fn display<'g>(&'g self, g: &'g Grammar) -> impl fmt::Display + 'g {
        display_fn(move |f| {
            let kind = if self.is_shift_reduce() {
                "shift/reduce"
            } else {
                "reduce/reduce"
            };
            write!(
                f,
                "{} conflict in state {} on {}: chose {}",
                kind, self.state, g.terminals[&self.terminal], self.chosen,
            )?;
            for action in &self.discarded {
                write!(f, ", discarded {}", action)?;
                if let Action::Reduce(r) = action {
                    write!(f, " ({})", g.rule(*r).display(g))?;
                }
            }
            Ok(())
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("{} conflict(s) detected in the parsing table", _0.len())]
    Conflicts(Vec<Conflict>),
}

/// The ACTION and GOTO tables, one row per state.
#[derive(Debug)]
pub struct ParsingTables {
    actions: Vec<Map<TerminalID, Action>>,
    gotos: Vec<Map<NonterminalID, StateID>>,
    conflicts: Vec<Conflict>,
}

impl ParsingTables {
    pub fn build(
        g: &Grammar,
        collection: &CanonicalCollection,
        policy: ConflictPolicy,
    ) -> Self {
        let mut actions = Vec::with_capacity(collection.len());
        let mut gotos = Vec::with_capacity(collection.len());
        let mut conflicts = vec![];

        for state in collection.states() {
            // 各セルで導出可能なアクションを発見順に集める
            let mut candidates: Map<TerminalID, Vec<Action>> = Map::default();
            let mut row_gotos: Map<NonterminalID, StateID> = Map::default();

            for item in state.items() {
                let (terminal, action) = match item.next_symbol(g) {
                    Some(symbol) => {
                        let Some(target) = state.transition(symbol) else {
                            continue;
                        };
                        match symbol {
                            SymbolID::T(t) => (t, Action::Shift(target)),
                            SymbolID::N(n) => {
                                row_gotos.insert(n, target);
                                continue;
                            }
                        }
                    }
                    None if item.rule == RuleID::START && item.lookahead == TerminalID::EOI => {
                        (TerminalID::EOI, Action::Accept)
                    }
                    None => (item.lookahead, Action::Reduce(item.rule)),
                };

                let cell = candidates.entry(terminal).or_default();
                if !cell.contains(&action) {
                    cell.push(action);
                }
            }

            let mut row = Map::default();
            for (terminal, cell) in candidates {
                let chosen = resolve(policy, &cell);
                if cell.len() > 1 {
                    let conflict = Conflict {
                        state: state.id(),
                        terminal,
                        chosen,
                        discarded: cell.into_iter().filter(|a| *a != chosen).collect(),
                    };
                    tracing::debug!("{}", conflict.display(g));
                    conflicts.push(conflict);
                }
                row.insert(terminal, chosen);
            }

            actions.push(row);
            gotos.push(row_gotos);
        }

        if !conflicts.is_empty() {
            tracing::warn!(
                "{} conflict(s) resolved by the {:?} policy",
                conflicts.len(),
                policy
            );
        }

        Self {
            actions,
            gotos,
            conflicts,
        }
    }

    /// Fail if any cell had more than one derivable action.
    pub fn deny_conflicts(self) -> Result<Self, TableError> {
        if self.conflicts.is_empty() {
            Ok(self)
        } else {
            Err(TableError::Conflicts(self.conflicts))
        }
    }

    pub fn action(&self, state: StateID, terminal: TerminalID) -> Option<Action> {
        self.actions.get(state.index())?.get(&terminal).copied()
    }

    pub fn goto(&self, state: StateID, symbol: NonterminalID) -> Option<StateID> {
        self.gotos.get(state.index())?.get(&symbol).copied()
    }

    /// The ACTION row of `state`, in discovery order.
    pub fn actions(&self, state: StateID) -> impl Iterator<Item = (TerminalID, Action)> + '_ {
        self.actions
            .get(state.index())
            .into_iter()
            .flat_map(|row| row.iter().map(|(t, a)| (*t, *a)))
    }

    pub fn gotos(&self, state: StateID) -> impl Iterator<Item = (NonterminalID, StateID)> + '_ {
        self.gotos
            .get(state.index())
            .into_iter()
            .flat_map(|row| row.iter().map(|(n, s)| (*n, *s)))
    }

    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }

    pub fn display<'g>(&'g self, g: &'g Grammar) -> impl fmt::Display + 'g {
        display_fn(move |f| {
            writeln!(f, "ACTION TABLE:")?;
            for (i, row) in self.actions.iter().enumerate() {
                writeln!(f, "State {}:", i)?;
                for (terminal, action) in row {
                    writeln!(f, "    {} -> {}", g.terminals[terminal], action)?;
                }
            }

            writeln!(f, "\nGOTO TABLE:")?;
            for (i, row) in self.gotos.iter().enumerate() {
                writeln!(f, "State {}:", i)?;
                for (symbol, target) in row {
                    writeln!(f, "    {} -> {}", g.nonterminals[symbol], target)?;
                }
            }
            Ok(())
        })
    }
}

/// Pick one action from the candidates of a cell, given in discovery order.
fn resolve(policy: ConflictPolicy, cell: &[Action]) -> Action {
    let shift = cell
        .iter()
        .rev()
        .find(|a| matches!(a, Action::Shift(..) | Action::Accept));
    if let Some(shift) = shift {
        return *shift;
    }

    let mut reduces = cell.iter().filter_map(|a| match a {
        Action::Reduce(r) => Some(*r),
        _ => None,
    });
    let reduce = match policy {
        ConflictPolicy::Legacy => reduces.next(),
        ConflictPolicy::PreferShift => reduces.min(),
    };
    match reduce {
        Some(r) => Action::Reduce(r),
        None => cell[0],
    }
}
