use log::debug;
use crate::error::{Error, Result};
use crate::grammar::*;

const ARROW: &str = "->";

/// Accumulates rule lines into a [`Grammar`].
///
/// A line is either `LHS -> alt | alt | ...` or a continuation `| alt | ...`
/// that extends the most recently declared left-hand side.
#[derive(Default)]
pub(crate) struct GrammarBuilder {
  grammar: Grammar,
  last_lhs: Option<String>,
}

impl GrammarBuilder {
  pub(crate) fn new() -> Self {
    Self::default()
  }

  pub(crate) fn add_rule(&mut self, line: &str) -> Result<()> {
    let line = line.trim();
    if line.is_empty() {
      return Ok(());
    }

    let malformed = |reason| Error::MalformedRule {
      line: line.to_owned(),
      reason,
    };

    let parts = line.split(ARROW).collect::<Vec<_>>();
    let (lhs, alts, explicit) = match parts[..] {
      [lhs, rhs] => {
        let lhs = lhs.trim();
        if lhs.is_empty() || lhs.split_whitespace().count() != 1 {
          return Err(malformed("left-hand side must be a single symbol"));
        }
        if is_terminal(lhs) {
          return Err(malformed("left-hand side must be a nonterminal"));
        }
        self.last_lhs = Some(lhs.to_owned());
        (lhs.to_owned(), rhs.split('|').collect::<Vec<_>>(), true)
      }
      [rest] => {
        let rest = rest
          .strip_prefix('|')
          .ok_or_else(|| malformed("expected `->` or a leading `|`"))?;
        let lhs = self.last_lhs.clone()
          .ok_or_else(|| malformed("continuation without a preceding rule"))?;
        (lhs, rest.split('|').collect(), false)
      }
      _ => return Err(malformed("more than one `->`")),
    };

    let prods = alts.iter()
      .map(|alt| {
        let syms = alt.split_whitespace().collect::<Vec<_>>();
        if syms == [LAMBDA] {
          vec![]
        } else {
          syms.into_iter().map(str::to_owned).collect()
        }
      })
      .collect::<Vec<Production>>();

    // only a full `LHS ->` line can declare the start symbol
    let ends_input = prods.last()
      .map_or(false, |prod| prod.iter().any(|s| s == END));
    if explicit && ends_input {
      self.grammar.start = Some(lhs.clone());
    }

    self.grammar.nonterminals.insert(lhs.clone());
    for sym in prods.iter().flatten() {
      if is_terminal(sym) {
        self.grammar.terminals.insert(sym.clone());
      } else {
        self.grammar.nonterminals.insert(sym.clone());
      }
    }

    debug!("rule {} -> {:?}", lhs, prods);
    self.grammar.rules.entry(lhs).or_default().extend(prods);

    Ok(())
  }

  pub(crate) fn build(self) -> Result<Grammar> {
    self.grammar.validate()?;
    Ok(self.grammar)
  }
}
