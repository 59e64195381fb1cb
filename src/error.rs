use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  #[error("malformed grammar rule `{line}`: {reason}")]
  MalformedRule {
    line: String,
    reason: &'static str,
  },

  #[error("grammar has no start symbol (no rule ends with `$`)")]
  MissingStart,

  #[error("nonterminal `{0}` is used but has no productions")]
  UndefinedNonterminal(String),

  #[error("grammar is not LL(1): `{nonterminal}` predicts `{terminal}` from more than one alternative")]
  NotLl1 {
    nonterminal: String,
    terminal: String,
  },

  #[error("unexpected token `{found}` while expanding `{nonterminal}`")]
  UnexpectedToken {
    nonterminal: String,
    found: String,
  },

  #[error("expected token `{expected}` but found `{found}`")]
  TokenMismatch {
    expected: String,
    found: String,
  },

  #[error("semantic error: {0}")]
  Semantic(String),

  #[error("no automaton fragment for node `{0}`")]
  UnrecognizedNode(String),

  #[error("malformed `{0}` node")]
  MalformedNode(String),
}

impl Error {
  /// Process exit code for this error category.
  pub fn exit_code(&self) -> u8 {
    match self {
      Error::UnexpectedToken { .. } => 1,
      Error::TokenMismatch { .. } => 2,
      Error::Semantic(_) => 3,
      Error::NotLl1 { .. } => 4,
      Error::UnrecognizedNode(_) | Error::MalformedNode(_) => 5,
      Error::MalformedRule { .. }
      | Error::MissingStart
      | Error::UndefinedNonterminal(_) => 6,
    }
  }
}
