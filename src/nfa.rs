//! Lambda-NFA with a single start state `0` and a single accepting state `1`.

use std::fmt::{self, Display, Formatter};
use indexmap::{IndexMap, IndexSet};
use crate::error::Result;
use crate::tree::Tree;

mod bitset;
mod builder;

use bitset::BitSet;

pub type StateId = usize;

pub const START: StateId = 0;
pub const ACCEPT: StateId = 1;

#[derive(Debug, Clone)]
pub struct Nfa {
  alphabet: IndexSet<char>,
  lambda: char,
  /// state -> states reachable by one lambda edge
  epsilon: Vec<BitSet>,
  /// state -> symbol -> destination
  transitions: Vec<IndexMap<char, StateId>>,
}

impl Nfa {
  /// A two-state automaton over `alphabet` with no edges.
  pub fn new(alphabet: impl IntoIterator<Item = char>) -> Self {
    let alphabet = alphabet.into_iter().collect::<IndexSet<_>>();
    let lambda = select_lambda(&alphabet);
    let mut nfa = Nfa {
      alphabet,
      lambda,
      epsilon: vec![],
      transitions: vec![],
    };
    nfa.add_state();
    nfa.add_state();
    nfa
  }

  /// Compiles a fully rewritten regex tree over `alphabet`.
  pub fn compile(
    tree: &Tree,
    alphabet: impl IntoIterator<Item = char>,
  ) -> Result<Self> {
    let mut nfa = Nfa::new(alphabet);
    builder::Builder::new(&mut nfa, tree).wrap(START, ACCEPT, tree.root())?;
    Ok(nfa)
  }

  pub fn add_state(&mut self) -> StateId {
    self.epsilon.push(BitSet::new());
    self.transitions.push(IndexMap::new());
    self.transitions.len() - 1
  }

  pub fn add_lambda(&mut self, src: StateId, dest: StateId) {
    self.epsilon[src].insert(dest);
  }

  /// Sets the `symbol` edge out of `src`, replacing any earlier one.
  pub fn add_edge(&mut self, src: StateId, dest: StateId, symbol: char) {
    self.transitions[src].insert(symbol, dest);
  }

  pub fn num_states(&self) -> usize {
    self.transitions.len()
  }

  pub fn alphabet(&self) -> &IndexSet<char> {
    &self.alphabet
  }

  pub fn lambda_marker(&self) -> char {
    self.lambda
  }

  pub fn has_lambda(&self, src: StateId, dest: StateId) -> bool {
    self.epsilon.get(src).map_or(false, |row| row.contains(dest))
  }

  pub fn edge(&self, src: StateId, symbol: char) -> Option<StateId> {
    self.transitions.get(src)?.get(&symbol).copied()
  }

  /// All lambda edges in row-major order.
  pub fn lambda_edges(&self) -> impl Iterator<Item = (StateId, StateId)> + '_ {
    self.epsilon.iter()
      .enumerate()
      .flat_map(|(src, row)| row.iter().map(move |dest| (src, dest)))
  }

  /// All symbol edges, by source state and then alphabet order.
  pub fn symbol_edges(&self) -> impl Iterator<Item = (StateId, StateId, char)> + '_ {
    self.transitions.iter()
      .enumerate()
      .flat_map(move |(src, row)| {
        self.alphabet.iter()
          .filter_map(move |c| row.get(c).map(|&dest| (src, dest, *c)))
      })
  }
}

/// Smallest code point not in `alphabet`.
fn select_lambda(alphabet: &IndexSet<char>) -> char {
  (0..=char::MAX as u32)
    .filter_map(char::from_u32)
    .find(|c| !alphabet.contains(c))
    .unwrap_or(char::REPLACEMENT_CHARACTER)
}

/// `x` followed by the lowercase hex code point, e.g. `x61` for `a`.
pub fn encode(c: char) -> String {
  format!("x{:x}", c as u32)
}

impl Display for Nfa {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    write!(f, "{} {}", self.num_states(), encode(self.lambda))?;
    for &c in &self.alphabet {
      write!(f, " {}", encode(c))?;
    }
    writeln!(f)?;

    for (src, dest, c) in self.symbol_edges() {
      writeln!(f, "- {} {} {}", src, dest, encode(c))?;
    }
    for (src, dest) in self.lambda_edges() {
      writeln!(f, "- {} {} {}", src, dest, encode(self.lambda))?;
    }
    write!(f, "+ {} {}", ACCEPT, ACCEPT)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::tree::Kind;
  use pretty_assertions::assert_eq;

  fn char_leaf(c: char) -> Tree {
    let mut tree = Tree::new(Kind::Root);
    let id = tree.add_node(Kind::Char, Some(c.to_string()));
    tree.set_root(id);
    tree
  }

  #[test]
  fn lambda_marker_skips_alphabet() {
    assert_eq!(Nfa::new("abc".chars()).lambda_marker(), '\0');
    assert_eq!(Nfa::new(['\0', '\u{1}', 'a']).lambda_marker(), '\u{2}');
  }

  #[test]
  fn encoding() {
    assert_eq!(encode('a'), "x61");
    assert_eq!(encode('\0'), "x0");
    assert_eq!(encode(' '), "x20");
    assert_eq!(encode('λ'), "x3bb");
  }

  #[test]
  fn single_char() {
    let nfa = Nfa::compile(&char_leaf('a'), "abc".chars()).unwrap();

    assert_eq!(nfa.num_states(), 4);
    assert_eq!(nfa.symbol_edges().collect::<Vec<_>>(), vec![(2, 3, 'a')]);
    assert_eq!(nfa.lambda_edges().collect::<Vec<_>>(), vec![(0, 2), (3, 1)]);
    insta::assert_snapshot!(nfa.to_string(), @r###"
    4 x0 x61 x62 x63
    - 2 3 x61
    - 0 2 x0
    - 3 1 x0
    + 1 1
    "###);
  }

  #[test]
  fn char_outside_alphabet() {
    let nfa = Nfa::compile(&char_leaf('z'), "abc".chars()).unwrap();
    assert_eq!(nfa.symbol_edges().count(), 0);
    assert_eq!(nfa.lambda_edges().count(), 2);
  }

  #[test]
  fn edges_replace() {
    let mut nfa = Nfa::new("ab".chars());
    let s = nfa.add_state();
    nfa.add_edge(START, s, 'a');
    nfa.add_edge(START, ACCEPT, 'a');
    assert_eq!(nfa.edge(START, 'a'), Some(ACCEPT));
    assert_eq!(nfa.edge(START, 'b'), None);
  }
}
