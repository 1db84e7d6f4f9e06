//! Calculation of first set function.

use crate::{
    grammar::{Grammar, NonterminalID, SymbolID, TerminalID},
    types::Set,
};
use bit_set::BitSet;
use bit_vec::BitVec;

/// Lookahead sets used while closing LR(1) items.
///
/// Only a direct `X -> ε` production makes `X` nullable; nullability is not
/// propagated through right-hand sides consisting of nullable symbols.
#[derive(Debug)]
pub struct FirstSets {
    nullable: BitVec,
    firsts: Vec<Set<TerminalID>>,
}

impl FirstSets {
    pub fn new(grammar: &Grammar) -> Self {
        let mut nullable = BitVec::from_elem(grammar.nonterminals.len(), false);
        for rule in grammar.rules.values() {
            if rule.is_epsilon() {
                nullable.set(rule.left().index(), true);
            }
        }

        let mut firsts = vec![Set::default(); grammar.nonterminals.len()];

        // 変更のあった非終端記号を参照する規則だけを再計算する
        let mut changed: BitSet = (0..grammar.nonterminals.len()).collect();
        let mut round = 0;
        while !changed.is_empty() {
            round += 1;
            let mut next = BitSet::new();
            for rule in grammar.rules.values() {
                if rule.is_epsilon() {
                    continue;
                }
                let prefix = scanned_prefix(&nullable, rule.right());
                let depends_on_changed = prefix
                    .iter()
                    .any(|s| matches!(s, SymbolID::N(n) if changed.contains(n.index())));
                if round > 1 && !depends_on_changed {
                    continue;
                }

                let mut added = vec![];
                for symbol in prefix {
                    match symbol {
                        SymbolID::T(t) => added.push(*t),
                        SymbolID::N(n) => added.extend(firsts[n.index()].iter().copied()),
                    }
                }

                let target = &mut firsts[rule.left().index()];
                for t in added {
                    if target.insert(t) {
                        next.insert(rule.left().index());
                    }
                }
            }
            changed = next;
        }
        tracing::trace!("first sets settled after {} round(s)", round);

        Self { nullable, firsts }
    }

    /// Whether `n` has a production `n -> ε`.
    pub fn is_nullable(&self, n: NonterminalID) -> bool {
        self.nullable.get(n.index()).unwrap_or(false)
    }

    /// The terminals that the non-ε productions of `n` can begin with.
    pub fn first_of(&self, n: NonterminalID) -> &Set<TerminalID> {
        &self.firsts[n.index()]
    }

    /// `First(sequence fallback)`
    ///
    /// `fallback` is always part of the result and comes last unless it was
    /// already derived from `sequence`.
    pub fn get(&self, sequence: &[SymbolID], fallback: TerminalID) -> Set<TerminalID> {
        let mut res = Set::default();
        for symbol in scanned_prefix(&self.nullable, sequence) {
            match symbol {
                SymbolID::T(t) => {
                    res.insert(*t);
                }
                SymbolID::N(n) => res.extend(self.firsts[n.index()].iter().copied()),
            }
        }
        res.insert(fallback);
        res
    }
}

/// The leading symbols of `sequence` up to and including the first one that
/// is not a nullable nonterminal.
fn scanned_prefix<'s>(nullable: &BitVec, sequence: &'s [SymbolID]) -> &'s [SymbolID] {
    let end = sequence
        .iter()
        .position(|s| match s {
            SymbolID::T(..) => true,
            SymbolID::N(n) => !nullable.get(n.index()).unwrap_or(false),
        })
        .map_or(sequence.len(), |i| i + 1);
    &sequence[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(g: &Grammar, set: &Set<TerminalID>) -> Vec<String> {
        set.iter()
            .map(|t| g.terminals[t].name().to_owned())
            .collect()
    }

    fn seq(g: &Grammar, symbols: &[&str]) -> Vec<SymbolID> {
        symbols.iter().map(|s| g.symbol(s).unwrap()).collect()
    }

    #[test]
    fn terminal_stops_the_scan() {
        let g: Grammar = "S -> a b".parse().unwrap();
        let first = FirstSets::new(&g);
        let got = first.get(&seq(&g, &["a", "b"]), TerminalID::EOI);
        assert_eq!(names(&g, &got), ["a", "$"]);
    }

    #[test]
    fn fallback_is_always_added() {
        let g: Grammar = "S -> A b\nA -> a".parse().unwrap();
        let first = FirstSets::new(&g);
        let b = g.terminal("b").unwrap();
        let got = first.get(&seq(&g, &["A"]), b);
        assert_eq!(names(&g, &got), ["a", "b"]);
        assert_eq!(names(&g, &first.get(&[], b)), ["b"]);
    }

    #[test]
    fn direct_epsilon_continues_the_scan() {
        let g: Grammar = "S -> A B c\nA -> ε\nA -> a\nB -> b".parse().unwrap();
        let first = FirstSets::new(&g);
        assert!(first.is_nullable(g.nonterminal("A").unwrap()));
        assert!(!first.is_nullable(g.nonterminal("B").unwrap()));
        let got = first.get(&seq(&g, &["A", "B", "c"]), TerminalID::EOI);
        assert_eq!(names(&g, &got), ["a", "b", "$"]);
    }

    #[test]
    fn nullability_is_not_propagated() {
        // `B` only derives ε through `A`, so it stops the scan.
        let g: Grammar = "S -> B c\nB -> A\nA -> ε".parse().unwrap();
        let first = FirstSets::new(&g);
        assert!(!first.is_nullable(g.nonterminal("B").unwrap()));
        let got = first.get(&seq(&g, &["B", "c"]), TerminalID::EOI);
        assert_eq!(names(&g, &got), ["$"]);
    }

    #[test]
    fn left_recursion_terminates() {
        let g: Grammar = "E -> E + T\nE -> T\nT -> T * F\nT -> F\nF -> ( E )\nF -> id"
            .parse()
            .unwrap();
        let first = FirstSets::new(&g);
        for n in ["E", "T", "F"] {
            let got = first.first_of(g.nonterminal(n).unwrap());
            let mut got = names(&g, got);
            got.sort();
            assert_eq!(got, ["(", "id"], "First({})", n);
        }
    }

    #[test]
    fn mutual_recursion_without_terminal_start() {
        let g: Grammar = "S -> A\nA -> B x\nB -> A y".parse().unwrap();
        let first = FirstSets::new(&g);
        assert!(first.first_of(g.nonterminal("A").unwrap()).is_empty());
        let got = first.get(&seq(&g, &["A"]), TerminalID::EOI);
        assert_eq!(names(&g, &got), ["$"]);
    }
}
