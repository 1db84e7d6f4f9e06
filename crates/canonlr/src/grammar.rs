//! Grammar types.

use crate::{
    types::Map,
    util::{display_fn, write_spaced},
};
use std::{fmt, fs, io, path::Path, str::FromStr};

/// The right-hand side spelling of an empty derivation.
pub const EPSILON: &str = "ε";

/// The reserved terminal that means the end of input.
pub const END_OF_INPUT: &str = "$";

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TerminalID {
    raw: u16,
}
impl TerminalID {
    /// Reserved symbol used as a terminal symbol that means the end of input.
    pub const EOI: Self = Self::new(0);

    const OFFSET: u16 = 1;

    #[inline]
    const fn new(raw: u16) -> Self {
        Self { raw }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.raw as usize
    }
}

#[derive(Debug)]
pub struct Terminal {
    id: TerminalID,
    name: String,
}
impl Terminal {
    pub fn id(&self) -> TerminalID {
        self.id
    }
    pub fn name(&self) -> &str {
        &self.name
    }
}
impl fmt::Display for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct NonterminalID {
    raw: u16,
}
impl NonterminalID {
    #[inline]
    const fn new(raw: u16) -> Self {
        Self { raw }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.raw as usize
    }
}

#[derive(Debug)]
pub struct Nonterminal {
    id: NonterminalID,
    name: String,
}
impl Nonterminal {
    pub fn id(&self) -> NonterminalID {
        self.id
    }
    pub fn name(&self) -> &str {
        &self.name
    }
}
impl fmt::Display for Nonterminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SymbolID {
    T(TerminalID),
    N(NonterminalID),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct RuleID {
    raw: u16,
}

impl RuleID {
    /// The first production of the grammar text.
    pub const START: Self = Self::new(0);

    #[inline]
    const fn new(raw: u16) -> Self {
        Self { raw }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.raw as usize
    }
}

impl fmt::Display for RuleID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.raw, f)
    }
}

/// The type that represents a production rule in grammar.
#[derive(Debug)]
pub struct Rule {
    id: RuleID,
    left: NonterminalID,
    right: Vec<SymbolID>,
    epsilon: bool,
}
impl Rule {
    pub fn id(&self) -> RuleID {
        self.id
    }

    /// Return the left-hand side of this production.
    pub fn left(&self) -> NonterminalID {
        self.left
    }

    /// Return the right-hand side of this production.
    ///
    /// An `ε` production has an empty right-hand side.
    pub fn right(&self) -> &[SymbolID] {
        &self.right[..]
    }

    /// Whether this production was written as `LHS -> ε`.
    pub fn is_epsilon(&self) -> bool {
        self.epsilon
    }

    // `"LHS -> R1 R2 R3"`
    pub fn display<'g>(&'g self, g: &'g Grammar) -> impl fmt::Display + 'g {
        display_fn(move |f| {
            write!(f, "{} -> ", g.nonterminals[&self.left])?;
            if self.epsilon {
                return f.write_str(EPSILON);
            }
            write_spaced(f, self.right.iter().map(|s| g.symbol_name(*s)))
        })
    }
}

/// How to treat grammar lines that are not productions.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum Leniency {
    /// Skip them silently.
    #[default]
    Lenient,
    /// Fail on the first non-blank line that is not a production.
    Strict,
}

/// The grammar definition used to derive the parser tables.
///
/// A symbol is a nonterminal iff it is the left-hand side of some rule.
#[derive(Debug)]
#[non_exhaustive]
pub struct Grammar {
    pub terminals: Map<TerminalID, Terminal>,
    pub nonterminals: Map<NonterminalID, Nonterminal>,
    pub rules: Map<RuleID, Rule>,
    names: Map<String, SymbolID>,
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## terminals:")?;
        for terminal in self.terminals.values() {
            writeln!(f, "{}", terminal)?;
        }

        writeln!(f, "\n## nonterminals:")?;
        for nonterminal in self.nonterminals.values() {
            write!(f, "{}", nonterminal)?;
            if nonterminal.id() == self.start_rule().left() {
                write!(f, " (start)")?;
            }
            writeln!(f)?;
        }

        writeln!(f, "\n## rules:")?;
        for rule in self.rules.values() {
            writeln!(f, "{}: {}", rule.id(), rule.display(self))?;
        }

        Ok(())
    }
}

impl FromStr for Grammar {
    type Err = GrammarError;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        Self::parse(source, Leniency::Lenient)
    }
}

impl Grammar {
    pub fn from_file(path: impl AsRef<Path>, leniency: Leniency) -> Result<Grammar, GrammarError> {
        let source = fs::read_to_string(path).map_err(GrammarError::Io)?;
        Self::parse(&source, leniency)
    }

    /// Load the productions of a grammar text, one `LHS -> sym1 sym2 ...`
    /// per line, in order.
    pub fn parse(source: &str, leniency: Leniency) -> Result<Grammar, GrammarError> {
        Grammar::define(|g| {
            for (i, line) in source.lines().enumerate() {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                match match_production(line) {
                    Some((left, right)) => g.rule(left, right.split_whitespace())?,
                    None if leniency == Leniency::Strict => {
                        return Err(GrammarError::MalformedLine {
                            line: i + 1,
                            text: line.to_owned(),
                        });
                    }
                    None => {
                        tracing::trace!("skip line {}: {:?}", i + 1, line);
                    }
                }
            }
            Ok(())
        })
    }

    /// Define a grammar using the specified function.
    pub fn define<F>(f: F) -> Result<Self, GrammarError>
    where
        F: FnOnce(&mut GrammarDef) -> Result<(), GrammarError>,
    {
        let mut def = GrammarDef {
            productions: vec![],
        };
        f(&mut def)?;
        def.end()
    }

    /// The start production, i.e. the first one defined.
    pub fn start_rule(&self) -> &Rule {
        &self.rules[&RuleID::START]
    }

    pub fn rule(&self, id: RuleID) -> &Rule {
        &self.rules[&id]
    }

    /// Iterate the productions of `left` in definition order.
    pub fn rules_of(&self, left: NonterminalID) -> impl Iterator<Item = &Rule> + '_ {
        self.rules.values().filter(move |rule| rule.left == left)
    }

    /// Look up a symbol by its name.
    pub fn symbol(&self, name: &str) -> Option<SymbolID> {
        self.names.get(name).copied()
    }

    pub fn terminal(&self, name: &str) -> Option<TerminalID> {
        match self.symbol(name)? {
            SymbolID::T(t) => Some(t),
            SymbolID::N(..) => None,
        }
    }

    pub fn nonterminal(&self, name: &str) -> Option<NonterminalID> {
        match self.symbol(name)? {
            SymbolID::N(n) => Some(n),
            SymbolID::T(..) => None,
        }
    }

    pub fn symbol_name(&self, symbol: SymbolID) -> &str {
        match symbol {
            SymbolID::T(t) => self.terminals[&t].name(),
            SymbolID::N(n) => self.nonterminals[&n].name(),
        }
    }
}

/// Match a line against `(\w+)\s*->\s*(.+)`, anywhere in the line.
///
/// Returns the left-hand side word and the raw right-hand side text.
fn match_production(line: &str) -> Option<(&str, &str)> {
    let is_word = |c: char| c.is_ascii_alphanumeric() || c == '_';

    let mut from = 0;
    while let Some(pos) = line[from..].find("->") {
        let arrow = from + pos;
        from = arrow + 1;

        let head = line[..arrow].trim_end_matches(|c: char| c.is_ascii_whitespace());
        let start = head
            .char_indices()
            .rev()
            .take_while(|(_, c)| is_word(*c))
            .last()
            .map(|(i, _)| i);
        let right = &line[arrow + 2..];
        match start {
            Some(start) if !right.is_empty() => return Some((&head[start..], right)),
            _ => continue,
        }
    }
    None
}

/// The contextural values for building a `Grammar`.
#[derive(Debug)]
pub struct GrammarDef {
    productions: Vec<(String, Vec<String>)>,
}

impl GrammarDef {
    /// Append a production rule to this grammar.
    ///
    /// A right-hand side consisting of the single symbol `ε` denotes an empty
    /// derivation. Duplicate productions are ignored, so every production
    /// after a duplicate is numbered one lower than its position in the text.
    pub fn rule<I>(&mut self, left: &str, right: I) -> Result<(), GrammarError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        if left.is_empty() || left == END_OF_INPUT || left == EPSILON {
            return Err(GrammarError::InvalidSymbol(left.to_owned()));
        }
        let right: Vec<String> = right.into_iter().map(|s| s.as_ref().to_owned()).collect();
        for symbol in &right {
            if symbol.is_empty() {
                return Err(GrammarError::InvalidSymbol(symbol.clone()));
            }
            if symbol == END_OF_INPUT {
                return Err(GrammarError::ReservedSymbol {
                    production: format!("{} -> {}", left, right.join(" ")),
                });
            }
        }

        if self
            .productions
            .iter()
            .any(|(l, r)| l == left && *r == right)
        {
            tracing::warn!(
                "duplicate production ignored: {} -> {} (later productions are renumbered from {})",
                left,
                right.join(" "),
                self.productions.len()
            );
            return Ok(());
        }

        self.productions.push((left.to_owned(), right));
        Ok(())
    }

    fn end(self) -> Result<Grammar, GrammarError> {
        if self.productions.is_empty() {
            return Err(GrammarError::NoProductions);
        }

        let mut names: Map<String, SymbolID> = Map::default();
        let mut terminals = Map::default();
        let mut nonterminals = Map::default();

        names.insert(END_OF_INPUT.to_owned(), SymbolID::T(TerminalID::EOI));
        terminals.insert(
            TerminalID::EOI,
            Terminal {
                id: TerminalID::EOI,
                name: END_OF_INPUT.to_owned(),
            },
        );

        // 左辺に現れる記号はすべて非終端記号
        for (left, _) in &self.productions {
            if names.contains_key(left) {
                continue;
            }
            let id = NonterminalID::new(to_raw(nonterminals.len())?);
            names.insert(left.clone(), SymbolID::N(id));
            nonterminals.insert(
                id,
                Nonterminal {
                    id,
                    name: left.clone(),
                },
            );
        }

        let mut rules = Map::default();
        for (i, (left, right)) in self.productions.into_iter().enumerate() {
            let id = RuleID::new(to_raw(i)?);
            let left = match names[&left] {
                SymbolID::N(n) => n,
                SymbolID::T(..) => unreachable!("left-hand sides are registered first"),
            };

            let epsilon = matches!(&right[..], [s] if s == EPSILON);
            let mut symbols = vec![];
            if !epsilon {
                for name in right {
                    let symbol = match names.get(&name) {
                        Some(symbol) => *symbol,
                        None => {
                            let t = TerminalID::new(to_raw(terminals.len())?);
                            debug_assert!(t.raw >= TerminalID::OFFSET);
                            terminals.insert(
                                t,
                                Terminal {
                                    id: t,
                                    name: name.clone(),
                                },
                            );
                            names.insert(name, SymbolID::T(t));
                            SymbolID::T(t)
                        }
                    };
                    symbols.push(symbol);
                }
            }

            rules.insert(
                id,
                Rule {
                    id,
                    left,
                    right: symbols,
                    epsilon,
                },
            );
        }

        Ok(Grammar {
            terminals,
            nonterminals,
            rules,
            names,
        })
    }
}

fn to_raw(n: usize) -> Result<u16, GrammarError> {
    u16::try_from(n).map_err(|_| GrammarError::TooLarge)
}

#[derive(Debug, thiserror::Error)]
pub enum GrammarError {
    #[error("IO error: {}", _0)]
    Io(io::Error),

    #[error("line {line}: malformed production {text:?}")]
    MalformedLine { line: usize, text: String },

    #[error("the grammar defines no productions")]
    NoProductions,

    #[error("`$' is reserved for the end of input: {production}")]
    ReservedSymbol { production: String },

    #[error("invalid symbol name: {:?}", _0)]
    InvalidSymbol(String),

    #[error("too many symbols or productions")]
    TooLarge,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_symbols() {
        let g: Grammar = "E -> E + T\nE -> T\nT -> id".parse().unwrap();
        assert_eq!(g.rules.len(), 3);
        assert!(matches!(g.symbol("E"), Some(SymbolID::N(..))));
        assert!(matches!(g.symbol("T"), Some(SymbolID::N(..))));
        assert!(matches!(g.symbol("+"), Some(SymbolID::T(..))));
        assert!(matches!(g.symbol("id"), Some(SymbolID::T(..))));
        assert_eq!(g.terminal("$"), Some(TerminalID::EOI));
        assert_eq!(g.symbol("F"), None);

        let start = g.start_rule();
        assert_eq!(start.id(), RuleID::START);
        assert_eq!(start.display(&g).to_string(), "E -> E + T");
    }

    #[test]
    fn nonterminal_used_before_its_definition() {
        let g: Grammar = "S -> A b\nA -> a".parse().unwrap();
        assert!(matches!(g.symbol("A"), Some(SymbolID::N(..))));
        let rule = g.start_rule();
        assert!(matches!(rule.right()[0], SymbolID::N(..)));
    }

    #[test]
    fn epsilon_production() {
        let g: Grammar = "S -> A x\nA -> ε\nA -> a".parse().unwrap();
        let rule = g.rule(RuleID::new(1));
        assert!(rule.is_epsilon());
        assert!(rule.right().is_empty());
        assert_eq!(rule.display(&g).to_string(), "A -> ε");
        assert_eq!(g.symbol(EPSILON), None);
    }

    #[test]
    fn epsilon_inside_longer_right_side_is_a_terminal() {
        let g: Grammar = "S -> ε x".parse().unwrap();
        assert!(matches!(g.symbol(EPSILON), Some(SymbolID::T(..))));
        assert_eq!(g.start_rule().right().len(), 2);
    }

    #[test]
    fn lenient_mode_skips_malformed_lines() {
        let g: Grammar = "# comment\nS => x\n\nS -> id\n   \n-> y".parse().unwrap();
        assert_eq!(g.rules.len(), 1);
        assert_eq!(g.start_rule().display(&g).to_string(), "S -> id");
    }

    #[test]
    fn strict_mode_rejects_malformed_lines() {
        let err = Grammar::parse("S -> id\n\nS => x", Leniency::Strict).unwrap_err();
        match err {
            GrammarError::MalformedLine { line, text } => {
                assert_eq!(line, 3);
                assert_eq!(text, "S => x");
            }
            err => panic!("unexpected error: {}", err),
        }
    }

    #[test]
    fn only_malformed_lines_is_not_an_empty_language() {
        let err = "S => id".parse::<Grammar>().unwrap_err();
        assert!(matches!(err, GrammarError::NoProductions));
    }

    #[test]
    fn reserved_end_marker() {
        let err = "S -> id $".parse::<Grammar>().unwrap_err();
        assert!(matches!(err, GrammarError::ReservedSymbol { .. }));
    }

    #[test]
    fn production_pattern_is_unanchored() {
        assert_eq!(match_production("S -> a b"), Some(("S", " a b")));
        assert_eq!(match_production("S->a"), Some(("S", "a")));
        assert_eq!(match_production("x y -> z"), Some(("y", " z")));
        assert_eq!(match_production("S -> a -> b"), Some(("S", " a -> b")));
        assert_eq!(match_production("S ->"), None);
        assert_eq!(match_production("-> a"), None);
        assert_eq!(match_production("S => a"), None);
    }

    #[test]
    fn duplicate_productions_are_dropped() {
        let g = Grammar::define(|g| {
            g.rule("S", ["a"])?;
            g.rule("S", ["a"])?;
            g.rule("S", ["b"])?;
            Ok(())
        })
        .unwrap();
        assert_eq!(g.rules.len(), 2);
        let shown = g.to_string();
        assert!(shown.contains("0: S -> a"));
        assert!(shown.contains("1: S -> b"));
    }

    #[test]
    fn display_lists_everything() {
        let g: Grammar = "S -> id".parse().unwrap();
        let shown = g.to_string();
        assert!(shown.contains("S (start)"));
        assert!(shown.contains("0: S -> id"));
    }
}
