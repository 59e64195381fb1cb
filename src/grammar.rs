use std::fmt::{self, Display, Formatter};
use indexmap::{IndexMap, IndexSet};
use crate::bnf::GrammarBuilder;
use crate::error::{Error, Result};

mod sets;

pub use sets::Conflict;

/// End-of-input marker.
pub const END: &str = "$";

/// Spelling of the empty alternative in rule text, and the value carried by
/// lambda leaves in parse trees.
pub const LAMBDA: &str = "lambda";

/// An alternative: an ordered sequence of symbols, empty for lambda.
pub type Production = Vec<String>;

/// A symbol is a nonterminal iff it contains an uppercase character.
pub fn is_terminal(sym: &str) -> bool {
  !sym.chars().any(char::is_uppercase)
}

#[derive(Debug, Clone, Default)]
pub struct Grammar {
  pub(crate) rules: IndexMap<String, Vec<Production>>,
  pub(crate) terminals: IndexSet<String>,
  pub(crate) nonterminals: IndexSet<String>,
  pub(crate) start: Option<String>,
}

impl Grammar {
  /// Reads a grammar from rule text, one rule or continuation per line.
  pub fn parse(text: &str) -> Result<Grammar> {
    let mut builder = GrammarBuilder::new();
    for line in text.lines() {
      builder.add_rule(line)?;
    }
    builder.build()
  }

  pub fn rules(&self) -> impl Iterator<Item = (&str, &[Production])> {
    self.rules.iter().map(|(lhs, prods)| (lhs.as_str(), prods.as_slice()))
  }

  /// Alternatives of `nonterm`, empty if it has none.
  pub fn productions(&self, nonterm: &str) -> &[Production] {
    self.rules.get(nonterm).map(Vec::as_slice).unwrap_or(&[])
  }

  pub fn terminals(&self) -> &IndexSet<String> {
    &self.terminals
  }

  pub fn nonterminals(&self) -> &IndexSet<String> {
    &self.nonterminals
  }

  pub fn is_nonterminal(&self, sym: &str) -> bool {
    self.nonterminals.contains(sym)
  }

  pub fn start(&self) -> &str {
    self.start.as_deref().unwrap_or_default()
  }

  /// Total number of alternatives across all nonterminals.
  pub fn num_productions(&self) -> usize {
    self.rules.values().map(Vec::len).sum()
  }

  pub(crate) fn validate(&self) -> Result<()> {
    match &self.start {
      Some(start) if self.rules.contains_key(start) => {}
      _ => return Err(Error::MissingStart),
    }

    for nonterm in &self.nonterminals {
      if self.productions(nonterm).is_empty() {
        return Err(Error::UndefinedNonterminal(nonterm.clone()));
      }
    }

    Ok(())
  }
}

impl Display for Grammar {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    let mut nonterms = self.nonterminals.iter().collect::<Vec<_>>();
    nonterms.sort();
    let mut terms = self.terminals.iter().collect::<Vec<_>>();
    terms.sort();

    writeln!(f, "Grammar Non-Terminals")?;
    writeln!(f, "{}", join(&nonterms))?;
    writeln!(f, "Grammar Symbols")?;
    terms.extend(nonterms);
    writeln!(f, "{}", join(&terms))?;
    writeln!(f)?;

    writeln!(f, "Grammar Rules")?;
    let mut id = 1;
    for (lhs, prods) in &self.rules {
      for prod in prods {
        if prod.is_empty() {
          writeln!(f, "({})\t{} -> {}", id, lhs, LAMBDA)?;
        } else {
          writeln!(f, "({})\t{} -> {}", id, lhs, prod.join(" "))?;
        }
        id += 1;
      }
    }
    writeln!(f)?;

    write!(f, "Grammar Start Symbol or Goal: {}", self.start())
  }
}

fn join(syms: &[&String]) -> String {
  syms.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(", ")
}
