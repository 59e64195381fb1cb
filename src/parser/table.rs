use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};
use log::debug;
use crate::error::{Error, Result};
use crate::grammar::{Grammar, Production};

/// 1-based production number, in rule-discovery order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleId(pub u32);

impl Display for RuleId {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
  pub lhs: String,
  pub rhs: Production,
}

/// LL(1) table: (nonterminal, lookahead terminal) -> production.
#[derive(Debug, Clone)]
pub struct ParseTable {
  /// indexed by `RuleId - 1`
  rules: Vec<Rule>,
  table: HashMap<String, HashMap<String, RuleId>>,
}

impl ParseTable {
  pub fn new(grammar: &Grammar) -> Result<Self> {
    if let Some(conflict) = grammar.conflict() {
      return Err(Error::NotLl1 {
        nonterminal: conflict.nonterminal,
        terminal: conflict.terminal,
      });
    }

    let mut rules = Vec::with_capacity(grammar.num_productions());
    let mut table = HashMap::<String, HashMap<String, RuleId>>::new();

    for (lhs, prods) in grammar.rules() {
      for prod in prods {
        let id = RuleId(rules.len() as u32 + 1);
        let row = table.entry(lhs.to_owned()).or_default();
        for terminal in grammar.predict_set(lhs, prod) {
          debug!("table[{}][{}] = {}", lhs, terminal, id);
          row.insert(terminal, id);
        }
        rules.push(Rule {
          lhs: lhs.to_owned(),
          rhs: prod.clone(),
        });
      }
    }

    Ok(ParseTable {
      rules,
      table,
    })
  }

  pub fn get(&self, nonterm: &str, terminal: &str) -> Option<RuleId> {
    self.table.get(nonterm)?.get(terminal).copied()
  }

  pub fn rule(&self, id: RuleId) -> Option<&Rule> {
    (id.0 as usize).checked_sub(1).and_then(|i| self.rules.get(i))
  }

  /// All productions with their ids, in id order.
  pub fn rules(&self) -> impl Iterator<Item = (RuleId, &Rule)> {
    self.rules.iter()
      .enumerate()
      .map(|(i, rule)| (RuleId(i as u32 + 1), rule))
  }
}

impl Display for ParseTable {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    let mut entries = self.table.iter()
      .flat_map(|(nt, row)| row.iter().map(move |(t, &id)| (nt, t, id)))
      .collect::<Vec<_>>();
    entries.sort_by(|a, b| (a.2, a.1).cmp(&(b.2, b.1)));

    for (nt, t, id) in entries {
      writeln!(f, "[{}, {}] = {}", nt, t, id)?;
    }
    Ok(())
  }
}
