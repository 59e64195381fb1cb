//! Token stream and the lexer for regular-expression source.

use std::collections::VecDeque;
use std::fmt::{self, Display, Formatter};
use logos::Logos;
use crate::grammar::END;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
  pub kind: String,
  pub value: String,
}

impl Token {
  pub fn new(kind: impl Into<String>, value: impl Into<String>) -> Self {
    Self {
      kind: kind.into(),
      value: value.into(),
    }
  }

  fn end() -> Self {
    Self::new(END, END)
  }
}

/// Ordered tokens consumed front to back by the parser.
#[derive(Debug, Clone, Default)]
pub struct TokenStream {
  tokens: VecDeque<Token>,
}

impl TokenStream {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn push(&mut self, token: Token) {
    self.tokens.push_back(token);
  }

  /// Type of the next token, or `$` once exhausted.
  pub fn peek(&self) -> &str {
    self.tokens.front().map_or(END, |token| token.kind.as_str())
  }

  /// Removes the next token, or returns `($, $)` once exhausted.
  pub fn pop(&mut self) -> Token {
    self.tokens.pop_front().unwrap_or_else(Token::end)
  }

  pub fn len(&self) -> usize {
    self.tokens.len()
  }

  pub fn is_empty(&self) -> bool {
    self.tokens.is_empty()
  }
}

impl FromIterator<Token> for TokenStream {
  fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
    Self {
      tokens: iter.into_iter().collect(),
    }
  }
}

impl Display for TokenStream {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    for token in &self.tokens {
      writeln!(f, "{} {}", token.kind, token.value)?;
    }
    Ok(())
  }
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum RawToken {
  #[regex(r"\\[|*+.()\-sn\\]")]
  Escape,
  #[token("\\")]
  Backslash,
  #[token("(")]
  Open,
  #[token(")")]
  Close,
  #[token("-")]
  Dash,
  #[token("+")]
  Plus,
  #[token("*")]
  Kleene,
  #[token(".")]
  Dot,
  #[token("|")]
  Pipe,
  #[regex(r"[^()\-+*.|\\]")]
  Char,
}

/// Token type of a literal character.
pub const CHAR: &str = "char";

/// Splits a regular expression into operator and `char` tokens.
///
/// Two-character escapes produce `char` tokens for the escaped character;
/// `\s` and `\n` stand for a space and a newline.
pub fn lex(source: &str) -> TokenStream {
  let mut lexer = RawToken::lexer(source);
  let mut stream = TokenStream::new();

  while let Some(result) = lexer.next() {
    let slice = lexer.slice();
    let token = match result {
      Ok(RawToken::Escape) => Token::new(CHAR, unescape(&slice[1..])),
      Ok(RawToken::Backslash) | Ok(RawToken::Char) | Err(()) => {
        Token::new(CHAR, slice)
      }
      Ok(RawToken::Open) => Token::new("open", slice),
      Ok(RawToken::Close) => Token::new("close", slice),
      Ok(RawToken::Dash) => Token::new("dash", slice),
      Ok(RawToken::Plus) => Token::new("plus", slice),
      Ok(RawToken::Kleene) => Token::new("kleene", slice),
      Ok(RawToken::Dot) => Token::new("dot", slice),
      Ok(RawToken::Pipe) => Token::new("pipe", slice),
    };
    stream.push(token);
  }

  stream
}

fn unescape(escaped: &str) -> &str {
  match escaped {
    "s" => " ",
    "n" => "\n",
    other => other,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  fn kinds(stream: &TokenStream) -> Vec<&str> {
    stream.tokens.iter().map(|t| t.kind.as_str()).collect()
  }

  #[test]
  fn operators() {
    let stream = lex("a-d.g+(x|y)*");
    assert_eq!(kinds(&stream), vec![
      "char", "dash", "char", "dot", "char", "plus", "open", "char", "pipe",
      "char", "close", "kleene",
    ]);
  }

  #[test]
  fn escapes() {
    let mut stream = lex(r"\|\*\+\.\(\)\-\s\n\\");
    let mut values = vec![];
    while !stream.is_empty() {
      values.push(stream.pop());
    }

    assert!(values.iter().all(|t| t.kind == CHAR));
    assert_eq!(
      values.iter().map(|t| t.value.as_str()).collect::<Vec<_>>(),
      vec!["|", "*", "+", ".", "(", ")", "-", " ", "\n", "\\"]);
  }

  #[test]
  fn unknown_escape_is_two_chars() {
    let stream = lex(r"\q");
    assert_eq!(stream.to_string(), "char \\\nchar q\n");
  }

  #[test]
  fn exhausted_stream() {
    let mut stream = lex("a");
    assert_eq!(stream.peek(), "char");
    assert_eq!(stream.pop(), Token::new("char", "a"));
    assert_eq!(stream.peek(), "$");
    assert_eq!(stream.pop(), Token::new("$", "$"));
    assert_eq!(stream.len(), 0);
  }

  #[test]
  fn multibyte_chars() {
    let stream = lex("λé");
    assert_eq!(stream.to_string(), "char λ\nchar é\n");
  }
}
