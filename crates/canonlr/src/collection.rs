//! The canonical collection of LR(1) item sets.

use crate::{
    first_sets::FirstSets,
    grammar::{Grammar, SymbolID},
    lr1::{closure, goto, ItemSet, LRItem},
    types::Map,
    util::display_fn,
};
use std::fmt;

#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct StateID {
    raw: u32,
}

impl StateID {
    pub const START: Self = Self::new(0);

    const fn new(raw: u32) -> Self {
        Self { raw }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.raw as usize
    }
}

impl fmt::Debug for StateID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.raw, f)
    }
}

impl fmt::Display for StateID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.raw, f)
    }
}

/// A parser state: a closed item set and its outgoing transitions.
#[derive(Debug)]
pub struct State {
    id: StateID,
    items: ItemSet,
    transitions: Map<SymbolID, StateID>,
}

impl State {
    pub fn id(&self) -> StateID {
        self.id
    }

    pub fn items(&self) -> &ItemSet {
        &self.items
    }

    /// The successor states, keyed by the symbol after the marker in
    /// first-appearance order.
    pub fn transitions(&self) -> impl Iterator<Item = (SymbolID, StateID)> + '_ {
        self.transitions.iter().map(|(symbol, target)| (*symbol, *target))
    }

    pub fn transition(&self, symbol: SymbolID) -> Option<StateID> {
        self.transitions.get(&symbol).copied()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CollectionError {
    #[error("the canonical collection exceeds {limit} states")]
    TooManyStates { limit: usize },
}

/// All states reachable from the closure of the start item.
///
/// The position of a state in the collection is its id.
#[derive(Debug)]
pub struct CanonicalCollection {
    states: Vec<State>,
}

impl CanonicalCollection {
    pub fn build(
        g: &Grammar,
        first_sets: &FirstSets,
        max_states: usize,
    ) -> Result<Self, CollectionError> {
        let initial = closure(g, first_sets, ItemSet::from_iter([LRItem::START]));
        let mut index: Map<Vec<LRItem>, StateID> = Map::default();
        index.insert(initial.canonical_key(), StateID::START);
        let mut states = vec![State {
            id: StateID::START,
            items: initial,
            transitions: Map::default(),
        }];

        // 新規に状態が生成されなくなるまで繰り返す
        let mut current = 0;
        while current < states.len() {
            let mut transitions = Map::default();
            for symbol in states[current].items.transition_symbols(g) {
                let next = goto(g, first_sets, &states[current].items, symbol);
                if next.is_empty() {
                    continue;
                }

                let key = next.canonical_key();
                let target = match index.get(&key) {
                    Some(id) => *id,
                    None => {
                        if states.len() >= max_states {
                            return Err(CollectionError::TooManyStates { limit: max_states });
                        }
                        let id = StateID::new(states.len() as u32);
                        tracing::trace!("I{}: {} item(s)", id, next.len());
                        index.insert(key, id);
                        states.push(State {
                            id,
                            items: next,
                            transitions: Map::default(),
                        });
                        id
                    }
                };
                transitions.insert(symbol, target);
            }
            states[current].transitions = transitions;
            current += 1;
        }

        tracing::debug!("discovered {} LR(1) state(s)", states.len());
        Ok(Self { states })
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn states(&self) -> impl Iterator<Item = &State> + '_ {
        self.states.iter()
    }

    pub fn state(&self, id: StateID) -> &State {
        &self.states[id.index()]
    }

    /// Find the state whose item set equals `items`.
    pub fn find(&self, items: &ItemSet) -> Option<StateID> {
        self.states.iter().find(|s| s.items == *items).map(|s| s.id)
    }

    /// The item-set dump, one `I<n>:` block per state.
    pub fn display<'g>(&'g self, g: &'g Grammar) -> impl fmt::Display + 'g {
        display_fn(move |f| {
            for state in &self.states {
                writeln!(f, "I{}:", state.id)?;
                for item in &state.items {
                    writeln!(f, "    {}", item.display(g))?;
                }
                writeln!(f)?;
            }
            Ok(())
        })
    }
}
