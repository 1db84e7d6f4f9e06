//! The implementation of LR(1) items and their closure.

use crate::{
    first_sets::FirstSets,
    grammar::{Grammar, RuleID, SymbolID, TerminalID, EPSILON},
    types::Set,
    util::display_fn,
};
use std::fmt;

// LR(1) item
// X -> Y1 Y2 ... Yn という構文規則にマーカ位置と先読み記号を付与したもの
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LRItem {
    pub rule: RuleID,
    pub marker: usize,
    pub lookahead: TerminalID,
}

impl LRItem {
    /// The item `(start production, 0, $)` that state 0 is closed from.
    pub const START: Self = Self {
        rule: RuleID::START,
        marker: 0,
        lookahead: TerminalID::EOI,
    };

    /// The symbol right after the marker, if any.
    pub fn next_symbol(&self, g: &Grammar) -> Option<SymbolID> {
        g.rule(self.rule).right().get(self.marker).copied()
    }

    pub fn is_complete(&self, g: &Grammar) -> bool {
        self.marker >= g.rule(self.rule).right().len()
    }

    // `"LHS -> a · b, la"`
    pub fn display<'g>(&'g self, g: &'g Grammar) -> impl fmt::Display + 'g {
        display_fn(move |f| {
            let rule = g.rule(self.rule);
            write!(f, "{} ->", g.nonterminals[&rule.left()])?;
            if rule.is_epsilon() {
                write!(f, " {}", EPSILON)?;
            }
            for (i, symbol) in rule.right().iter().enumerate() {
                if i == self.marker {
                    f.write_str(" ·")?;
                }
                write!(f, " {}", g.symbol_name(*symbol))?;
            }
            if self.marker >= rule.right().len() {
                f.write_str(" ·")?;
            }
            write!(f, ", {}", g.terminals[&self.lookahead])
        })
    }
}

/// A set of LR(1) items.
///
/// Items keep the order they were added in; equality ignores that order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemSet {
    items: Set<LRItem>,
}

impl ItemSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an item, returning `false` if an equal item was already present.
    pub fn insert(&mut self, item: LRItem) -> bool {
        self.items.insert(item)
    }

    pub fn contains(&self, item: &LRItem) -> bool {
        self.items.contains(item)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LRItem> + '_ {
        self.items.iter()
    }

    /// The items in sorted order, used to find structurally equal sets.
    pub fn canonical_key(&self) -> Vec<LRItem> {
        let mut key: Vec<LRItem> = self.items.iter().copied().collect();
        key.sort_unstable();
        key
    }

    /// The symbols that appear right after a marker, in order of first
    /// appearance.
    pub fn transition_symbols(&self, g: &Grammar) -> Vec<SymbolID> {
        let symbols: Set<SymbolID> = self.items.iter().filter_map(|item| item.next_symbol(g)).collect();
        symbols.into_iter().collect()
    }
}

impl FromIterator<LRItem> for ItemSet {
    fn from_iter<T: IntoIterator<Item = LRItem>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ItemSet {
    type Item = &'a LRItem;
    type IntoIter = indexmap::set::Iter<'a, LRItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// クロージャ展開
///
/// Each pass visits the items present when the pass starts. For an item
/// `[X -> ... · Y beta, a]` every production `Y -> gamma` is added with each
/// lookahead in `First(beta a)`. Passes repeat until nothing is added.
pub fn closure(g: &Grammar, first_sets: &FirstSets, mut items: ItemSet) -> ItemSet {
    let mut changed = true;
    while changed {
        changed = false;

        let size = items.len();
        for i in 0..size {
            let item = match items.items.get_index(i) {
                Some(item) => *item,
                None => break,
            };

            // [X -> ... · Y beta, a]
            //  Y: one nonterminal symbol
            let (y_symbol, beta) = match &g.rule(item.rule).right()[item.marker..] {
                [SymbolID::N(y_symbol), beta @ ..] => (*y_symbol, beta),
                _ => continue,
            };

            let lookaheads = first_sets.get(beta, item.lookahead);
            for rule in g.rules_of(y_symbol) {
                for lookahead in &lookaheads {
                    changed |= items.insert(LRItem {
                        rule: rule.id(),
                        marker: 0,
                        lookahead: *lookahead,
                    });
                }
            }
        }
    }
    items
}

/// Advance the marker over `symbol` and close the result.
///
/// Returns an empty set when no item in `items` expects `symbol`.
pub fn goto(g: &Grammar, first_sets: &FirstSets, items: &ItemSet, symbol: SymbolID) -> ItemSet {
    let kernel: ItemSet = items
        .iter()
        .filter(|item| item.next_symbol(g) == Some(symbol))
        .map(|item| LRItem {
            marker: item.marker + 1,
            ..*item
        })
        .collect();

    if kernel.is_empty() {
        return kernel;
    }
    closure(g, first_sets, kernel)
}
