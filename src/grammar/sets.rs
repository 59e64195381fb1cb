//! Nullability, FIRST, FOLLOW and PREDICT sets.
//!
//! Every query recurses over the rule graph directly and threads its own
//! visited set, so cyclic and left-recursive grammars terminate. Nothing is
//! cached between top-level queries.

use std::collections::HashSet;
use indexmap::IndexSet;
use log::debug;
use super::*;

pub type SymbolSet = IndexSet<String>;

/// A terminal predicted by two alternatives of the same nonterminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
  pub nonterminal: String,
  pub terminal: String,
}

impl Grammar {
  pub fn derives_to_lambda(&self, sym: &str) -> bool {
    if is_terminal(sym) {
      return false;
    }
    self.derives_to_lambda_with(sym, &mut vec![])
  }

  /// `visited` holds the alternatives, as `(lhs, index)`, currently being
  /// explored on this path.
  fn derives_to_lambda_with<'a>(
    &'a self,
    nonterm: &'a str,
    visited: &mut Vec<(&'a str, usize)>,
  ) -> bool {
    for (i, prod) in self.productions(nonterm).iter().enumerate() {
      if visited.contains(&(nonterm, i)) {
        continue;
      }
      if prod.is_empty() {
        return true;
      }
      if prod.iter().any(|sym| is_terminal(sym)) {
        continue;
      }

      visited.push((nonterm, i));
      let all = prod.iter().all(|sym| self.derives_to_lambda_with(sym, visited));
      visited.pop();

      if all {
        return true;
      }
    }
    false
  }

  pub fn first_set(&self, sym: &str) -> SymbolSet {
    let first = self.first_of(&[sym]);
    debug!("FIRST({}) = {:?}", sym, first);
    first
  }

  pub fn first_of<S: AsRef<str>>(&self, seq: &[S]) -> SymbolSet {
    let mut result = SymbolSet::new();
    self.first_with(&mut result, seq, &mut HashSet::new());
    result
  }

  fn first_with<S: AsRef<str>>(
    &self,
    result: &mut SymbolSet,
    seq: &[S],
    visited: &mut HashSet<String>,
  ) {
    let (head, rest) = match seq {
      [] => return,
      [head, rest @ ..] => (head.as_ref(), rest),
    };

    if is_terminal(head) {
      result.insert(head.to_owned());
      return;
    }

    if !rest.is_empty() && self.derives_to_lambda(head) {
      self.first_with(result, rest, visited);
    }

    if visited.insert(head.to_owned()) {
      for prod in self.productions(head) {
        self.first_with(result, prod, visited);
      }
    }
  }

  pub fn follow_set(&self, nonterm: &str) -> SymbolSet {
    let mut result = SymbolSet::new();
    self.follow_with(&mut result, nonterm, &mut HashSet::new());
    debug!("FOLLOW({}) = {:?}", nonterm, result);
    result
  }

  fn follow_with<'a>(
    &'a self,
    result: &mut SymbolSet,
    nonterm: &'a str,
    visited: &mut HashSet<&'a str>,
  ) {
    if !visited.insert(nonterm) {
      return;
    }

    for (lhs, rest) in self.occurrences(nonterm) {
      for sym in rest {
        result.extend(self.first_set(sym));
        if !self.derives_to_lambda(sym) {
          break;
        }
      }

      if rest.iter().all(|sym| self.derives_to_lambda(sym)) {
        self.follow_with(result, lhs, visited);
      }
    }
  }

  /// Every place `nonterm` appears on a right-hand side, as the enclosing
  /// left-hand side and the symbols after the occurrence.
  fn occurrences<'a>(
    &'a self,
    nonterm: &'a str,
  ) -> impl Iterator<Item = (&'a str, &'a [String])> + 'a {
    self.rules().flat_map(move |(lhs, prods)| {
      prods.iter().flat_map(move |prod| {
        prod.iter()
          .enumerate()
          .filter(move |(_, sym)| *sym == nonterm)
          .map(move |(i, _)| (lhs, &prod[i + 1..]))
      })
    })
  }

  pub fn predict_set<S: AsRef<str>>(&self, lhs: &str, prod: &[S]) -> SymbolSet {
    let mut result = SymbolSet::new();
    let nullable = prod.iter().all(|sym| {
      let sym = sym.as_ref();
      result.extend(self.first_set(sym));
      self.derives_to_lambda(sym)
    });
    if nullable {
      result.extend(self.follow_set(lhs));
    }
    debug!("PREDICT({} -> {}) = {:?}", lhs, display_rhs(prod), result);
    result
  }

  /// First terminal predicted by more than one alternative of the same
  /// nonterminal, if any.
  pub fn conflict(&self) -> Option<Conflict> {
    for (lhs, prods) in self.rules() {
      let mut seen = HashSet::new();
      for prod in prods {
        for terminal in self.predict_set(lhs, prod) {
          if seen.contains(&terminal) {
            return Some(Conflict {
              nonterminal: lhs.to_owned(),
              terminal,
            });
          }
          seen.insert(terminal);
        }
      }
    }
    None
  }

  pub fn is_ll1(&self) -> bool {
    self.conflict().is_none()
  }
}

fn display_rhs<S: AsRef<str>>(prod: &[S]) -> String {
  if prod.is_empty() {
    return LAMBDA.to_owned();
  }
  let syms: Vec<&str> = prod.iter().map(|s| s.as_ref()).collect();
  syms.join(" ")
}
