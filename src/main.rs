//! Command-line front end: reads a grammar file, then compiles a regular
//! expression into a serialized lambda-NFA.
//!
//! `wreck GRAMMAR` alone reads the expression from the first line of standard
//! input.

#[macro_use]
extern crate log;

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use anyhow::{Context, Result};
use clap::Parser as _;
use wreck::Grammar;

const IO_EXIT_CODE: u8 = 7;
const USAGE_EXIT_CODE: u8 = 8;

#[derive(clap::Parser)]
#[command(version, about = "Compile a regular expression into a lambda-NFA")]
struct Args {
  /// Grammar file, one `LHS -> alt | alt` rule or `| alt` continuation per line
  grammar: PathBuf,

  /// Regular expression to compile [default: first line of stdin]
  #[arg(short, long)]
  regex: Option<String>,

  /// Characters of the automaton's alphabet [default: printable ASCII]
  #[arg(short, long)]
  alphabet: Option<String>,

  /// Write the automaton here instead of standard output
  #[arg(short, long)]
  output: Option<PathBuf>,

  /// Print the grammar, its PREDICT sets and the LL(1) table
  #[arg(long)]
  dump_grammar: bool,
}

fn main() -> ExitCode {
  let args = match Args::try_parse() {
    Ok(args) => args,
    // help and version requests are not failures
    Err(err) if !err.use_stderr() => {
      print!("{}", err);
      return ExitCode::SUCCESS;
    }
    Err(err) => {
      print!("{}", err);
      return ExitCode::from(USAGE_EXIT_CODE);
    }
  };

  env_logger::Builder::from_default_env()
    .format_timestamp(None)
    .init();

  match run(&args) {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      println!("error: {:#}", err);
      let code = err.downcast_ref::<wreck::Error>()
        .map_or(IO_EXIT_CODE, wreck::Error::exit_code);
      ExitCode::from(code)
    }
  }
}

fn run(args: &Args) -> Result<()> {
  let text = std::fs::read_to_string(&args.grammar)
    .with_context(|| format!("cannot read grammar file `{}`", args.grammar.display()))?;
  let grammar = Grammar::parse(&text)?;
  info!(
    "Grammar has {} productions, {} nonterminals, {} terminals",
    grammar.num_productions(),
    grammar.nonterminals().len(),
    grammar.terminals().len(),
  );

  if args.dump_grammar {
    dump_grammar(&grammar);
  }

  let parser = wreck::build(grammar)?;
  if args.dump_grammar {
    println!("\nLL(1) Table");
    print!("{}", parser.table());
  }

  let regex = match &args.regex {
    Some(regex) => regex.clone(),
    None if args.dump_grammar => return Ok(()),
    None => read_regex()?,
  };
  let alphabet = match &args.alphabet {
    Some(chars) => chars.chars().collect::<Vec<_>>(),
    None => (' '..='~').collect(),
  };

  let nfa = wreck::compile(&parser, &regex, alphabet)?;
  match &args.output {
    Some(path) => {
      info!("Writing automaton to `{}`", path.display());
      std::fs::write(path, format!("{}\n", nfa))
        .with_context(|| format!("cannot write `{}`", path.display()))?;
    }
    None => println!("{}", nfa),
  }
  Ok(())
}

fn read_regex() -> Result<String> {
  let mut input = String::new();
  std::io::stdin().read_to_string(&mut input)
    .context("cannot read the expression from standard input")?;
  let regex = input.lines().next().unwrap_or_default().to_owned();
  info!("Read `{}` from standard input", regex);
  Ok(regex)
}

fn dump_grammar(grammar: &Grammar) {
  println!("{}", grammar);
  println!("\nPredict Sets");
  for (lhs, prods) in grammar.rules() {
    for prod in prods {
      let predict = grammar.predict_set(lhs, prod)
        .into_iter()
        .collect::<Vec<_>>();
      let rhs = if prod.is_empty() {
        wreck::grammar::LAMBDA.to_owned()
      } else {
        prod.join(" ")
      };
      println!("{} -> {}: {{{}}}", lhs, rhs, predict.join(", "));
    }
  }
}
