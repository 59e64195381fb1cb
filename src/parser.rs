use log::{debug, info, trace};
use crate::error::{Error, Result};
use crate::grammar::{Grammar, LAMBDA};
use crate::lexer::TokenStream;
use crate::tree::{Kind, Tree};

mod table;
mod sdt;

pub use table::{ParseTable, Rule, RuleId};

/// Table-driven LL(1) parser. Immutable once built; one instance can serve
/// any number of parses.
pub struct Parser {
  grammar: Grammar,
  table: ParseTable,
}

#[derive(Debug, Clone, Copy)]
enum Item<'a> {
  Symbol(&'a str),
  Lambda,
  /// Marks the point where the nonterminal above has been fully parsed.
  Reduce,
}

impl Parser {
  pub fn new(grammar: Grammar) -> Result<Self> {
    grammar.validate()?;
    let table = ParseTable::new(&grammar)?;
    info!(
      "LL(1) table built: {} productions, {} nonterminals, {} terminals",
      table.rules().count(),
      grammar.nonterminals().len(),
      grammar.terminals().len(),
    );
    Ok(Parser {
      grammar,
      table,
    })
  }

  pub fn grammar(&self) -> &Grammar {
    &self.grammar
  }

  pub fn table(&self) -> &ParseTable {
    &self.table
  }

  /// Parses `tokens`, rewriting each nonterminal's subtree as soon as it is
  /// complete. The returned tree is rooted at the rewritten derivation.
  pub fn parse(&self, mut tokens: TokenStream) -> Result<Tree> {
    let mut tree = Tree::new(Kind::Root);
    let mut current = tree.root();
    let mut stack = vec![Item::Symbol(self.grammar.start())];

    while let Some(item) = stack.pop() {
      trace!("pop {:?}, lookahead `{}`", item, tokens.peek());
      match item {
        Item::Symbol(sym) if self.grammar.is_nonterminal(sym) => {
          let id = self.table.get(sym, tokens.peek())
            .ok_or_else(|| Error::UnexpectedToken {
              nonterminal: sym.to_owned(),
              found: tokens.peek().to_owned(),
            })?;
          let rule = self.table.rule(id)
            .ok_or_else(|| Error::MalformedNode(sym.to_owned()))?;

          stack.push(Item::Reduce);
          if rule.rhs.is_empty() {
            stack.push(Item::Lambda);
          }
          stack.extend(rule.rhs.iter().rev().map(|s| Item::Symbol(s)));

          current = tree.push_child(current, Kind::nonterm(sym), None);
        }
        Item::Symbol(sym) => {
          if sym != tokens.peek() {
            return Err(Error::TokenMismatch {
              expected: sym.to_owned(),
              found: tokens.peek().to_owned(),
            });
          }
          let token = tokens.pop();
          tree.push_child(current, Kind::Term(token.kind), Some(token.value));
        }
        Item::Lambda => {
          tree.push_child(current, Kind::Lambda, Some(LAMBDA.to_owned()));
        }
        Item::Reduce => {
          // the completed node may be replaced or detached by its rewrite;
          // its parent slot is not
          let parent = tree.parent(current)
            .ok_or_else(|| Error::MalformedNode(tree.kind(current).to_string()))?;
          sdt::rewrite(&mut tree, current)?;
          current = parent;
        }
      }
    }

    if !tokens.is_empty() {
      debug!("{} tokens left after parse", tokens.len());
    }

    let root = tree.root();
    let ast = match tree.children(root) {
      &[ast] => ast,
      _ => return Err(Error::MalformedNode(Kind::Root.to_string())),
    };
    tree.set_root(ast);
    info!("parse finished: {}", tree);
    Ok(tree)
  }
}
