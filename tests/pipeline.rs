use pretty_assertions::assert_eq;
use wreck::grammar::Grammar;
use wreck::lexer::lex;
use wreck::nfa::{ACCEPT, START};
use wreck::{Error, Nfa, Parser, REGEX_GRAMMAR};

fn parser() -> Parser {
  wreck::build(Grammar::parse(REGEX_GRAMMAR).unwrap()).unwrap()
}

fn printable() -> Vec<char> {
  (' '..='~').collect()
}

/// Every state mentioned by an edge line must be below the declared count.
fn check_indices(nfa: &Nfa) {
  let text = nfa.to_string();
  let mut lines = text.lines();
  let header = lines.next().unwrap();
  let count = header.split(' ').next().unwrap().parse::<usize>().unwrap();
  assert_eq!(count, nfa.num_states());
  assert_eq!(header.split(' ').count(), 2 + nfa.alphabet().len());

  for line in lines {
    let fields = line.split(' ').collect::<Vec<_>>();
    assert!(fields[0] == "-" || fields[0] == "+", "bad line `{}`", line);
    let src = fields[1].parse::<usize>().unwrap();
    let dest = fields[2].parse::<usize>().unwrap();
    assert!(src < count && dest < count, "bad line `{}`", line);
  }
  assert_eq!(text.lines().last(), Some("+ 1 1"));
}

#[test]
fn regex_grammar_is_ll1() {
  let grammar = Grammar::parse(REGEX_GRAMMAR).unwrap();
  assert!(grammar.is_ll1());
  assert_eq!(grammar.start(), "RE");
  assert_eq!(grammar.num_productions(), 17);
}

#[test]
fn single_char() {
  let nfa = wreck::compile(&parser(), "a", "abc".chars()).unwrap();
  insta::assert_snapshot!(nfa.to_string(), @r###"
  4 x0 x61 x62 x63
  - 2 3 x61
  - 0 2 x0
  - 3 1 x0
  + 1 1
  "###);
}

#[test]
fn compiles_assorted_expressions() {
  let parser = parser();
  for regex in [
    "a-d.g+",
    "ab|c(d|e)*",
    "(ab)+c",
    "a|b|c",
    "x\\s\\n",
    "\\(\\)\\*\\|",
    "((a))",
    "",
  ] {
    let nfa = wreck::compile(&parser, regex, printable()).unwrap();
    check_indices(&nfa);
  }
}

#[test]
fn range_is_limited_to_alphabet() {
  let nfa = wreck::compile(&parser(), "a-z", "amz0".chars()).unwrap();
  let symbols = nfa.symbol_edges().map(|(_, _, c)| c).collect::<String>();
  assert_eq!(symbols, "amz");
}

#[test]
fn plus_repeats_its_operand() {
  let nfa = wreck::compile(&parser(), "a+", "a".chars()).unwrap();
  // the operand and its copy inside the kleene each get an `a` edge
  assert_eq!(nfa.symbol_edges().count(), 2);
  assert!(nfa.lambda_edges().any(|(src, _)| src == START));
  assert!(nfa.lambda_edges().any(|(_, dest)| dest == ACCEPT));
}

#[test]
fn escapes_reach_the_automaton() {
  let nfa = wreck::compile(&parser(), "\\s\\n", [' ', '\n']).unwrap();
  let symbols = nfa.symbol_edges().map(|(_, _, c)| c).collect::<String>();
  assert_eq!(symbols, " \n");
  assert!(nfa.to_string().contains(" x20"));
  assert!(nfa.to_string().contains(" xa"));
}

#[test]
fn lambda_marker_avoids_alphabet() {
  let alphabet = ['\0', '\u{1}', 'a'];
  let nfa = wreck::compile(&parser(), "a", alphabet).unwrap();
  assert_eq!(nfa.lambda_marker(), '\u{2}');
  assert!(nfa.to_string().starts_with("4 x2 x0 x1 x61\n"));
}

#[test]
fn errors() {
  let parser = parser();
  let compile = |regex| wreck::compile(&parser, regex, printable()).unwrap_err();

  assert!(matches!(compile("z-a"), Error::Semantic(_)));
  assert_eq!(compile("*"), Error::UnexpectedToken {
    nonterminal: "RE".to_owned(),
    found: "kleene".to_owned(),
  });
  assert_eq!(compile("(ab"), Error::TokenMismatch {
    expected: "close".to_owned(),
    found: "$".to_owned(),
  });
  assert_eq!(compile("z-a").exit_code(), 3);
  assert_eq!(compile("(ab").exit_code(), 2);
}

#[test]
fn parser_is_reusable() {
  let parser = parser();
  let first = parser.parse(lex("a|b")).unwrap();
  let second = parser.parse(lex("a|b")).unwrap();
  assert_eq!(first.to_string(), second.to_string());
  assert_eq!(first.to_string(), "(alt char:a char:b)");
}

#[test]
fn non_ll1_grammar_is_rejected() {
  let grammar = Grammar::parse("S -> A $\nA -> a b | a c\n").unwrap();
  let err = wreck::build(grammar).err().unwrap();
  assert_eq!(err, Error::NotLl1 {
    nonterminal: "A".to_owned(),
    terminal: "a".to_owned(),
  });
  assert_eq!(err.exit_code(), 4);
}
