pub mod error;
pub mod grammar;
pub mod lexer;
pub mod tree;
pub mod parser;
pub mod nfa;
mod bnf;

pub use error::{Error, Result};
pub use grammar::Grammar;
pub use nfa::Nfa;
pub use parser::Parser;

/// LL(1) grammar for regular expressions, in rule-text form.
pub const REGEX_GRAMMAR: &str = include_str!("../grammars/regex.cfg");

pub fn build(grammar: Grammar) -> Result<Parser> {
  Parser::new(grammar)
}

/// Lexes, parses and rewrites `regex`, then compiles it over `alphabet`.
pub fn compile(
  parser: &Parser,
  regex: &str,
  alphabet: impl IntoIterator<Item = char>,
) -> Result<Nfa> {
  let tree = parser.parse(lexer::lex(regex))?;
  let nfa = Nfa::compile(&tree, alphabet)?;
  log::info!("compiled `{}` into {} states", regex, nfa.num_states());
  Ok(nfa)
}
