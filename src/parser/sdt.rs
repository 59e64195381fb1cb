//! Syntax-directed rewrites run as each nonterminal of the regex grammar is
//! completed. A rewrite only touches the completed node, its subtree and its
//! slot under the parent, so the parent stays where the parser left it.

use log::trace;
use crate::error::{Error, Result};
use crate::tree::{Kind, NodeId, Tree};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rewrite {
  Re,
  Alt,
  AltList,
  Seq,
  SeqList,
  Atom,
  Nucleus,
}

impl Rewrite {
  fn for_nonterm(name: &str) -> Option<Rewrite> {
    Some(match name {
      "RE" => Rewrite::Re,
      "ALT" => Rewrite::Alt,
      "ALTLIST" => Rewrite::AltList,
      "SEQ" => Rewrite::Seq,
      "SEQLIST" => Rewrite::SeqList,
      "ATOM" => Rewrite::Atom,
      "NUCLEUS" => Rewrite::Nucleus,
      _ => return None,
    })
  }
}

pub(crate) fn rewrite(tree: &mut Tree, id: NodeId) -> Result<()> {
  let rule = match tree.kind(id) {
    Kind::Nonterm(name) => Rewrite::for_nonterm(name),
    _ => None,
  };

  let result = match rule {
    None => id,
    Some(Rewrite::Re) => root(tree, id)?,
    Some(Rewrite::Alt) => aggregate(tree, id, "ALTLIST", Kind::Alternation),
    Some(Rewrite::Seq) => aggregate(tree, id, "SEQLIST", Kind::Sequence),
    Some(Rewrite::AltList) => list(tree, id, "ALTLIST"),
    Some(Rewrite::SeqList) => list(tree, id, "SEQLIST"),
    Some(Rewrite::Atom) => atom(tree, id)?,
    Some(Rewrite::Nucleus) => nucleus(tree, id)?,
  };

  if let Some(rule) = rule {
    trace!("{:?} rewrite -> {}", rule, tree.kind(result));
  }
  Ok(())
}

fn malformed(tree: &Tree, id: NodeId) -> Error {
  Error::MalformedNode(tree.kind(id).to_string())
}

fn child(tree: &Tree, id: NodeId, i: usize) -> Result<NodeId> {
  tree.children(id).get(i).copied().ok_or_else(|| malformed(tree, id))
}

/// `RE -> ALT $`: promote the expression, dropping the end marker.
fn root(tree: &mut Tree, id: NodeId) -> Result<NodeId> {
  let expr = child(tree, id, 0)?;
  tree.replace(id, expr);
  Ok(expr)
}

/// `NUCLEUS`: grouping, character or range, wildcard.
fn nucleus(tree: &mut Tree, id: NodeId) -> Result<NodeId> {
  let first = child(tree, id, 0)?;

  if tree.kind(first).is_term("open") {
    let inner = child(tree, id, 1)?;
    tree.replace(id, inner);
    return Ok(inner);
  }

  if tree.kind(first).is_term("dot") {
    tree.set_kind(first, Kind::Dot);
    tree.replace(id, first);
    return Ok(first);
  }

  let range = match tree.find_child(id, |k| k.is_nonterm("CHARRNG")) {
    Some(range) => range,
    None => return Ok(id),
  };
  let left = tree.find_child(id, |k| k.is_term("char"))
    .ok_or_else(|| malformed(tree, id))?;
  tree.set_kind(left, Kind::Char);

  let right = match tree.find_child(range, |k| k.is_term("char")) {
    Some(right) => right,
    None => {
      tree.replace(id, left);
      return Ok(left);
    }
  };
  tree.set_kind(right, Kind::Char);

  let (lo, hi) = (bound(tree, left)?, bound(tree, right)?);
  if hi < lo {
    return Err(Error::Semantic(format!("invalid character range {}-{}", lo, hi)));
  }

  let node = tree.add_node(Kind::Range, None);
  tree.add_child(node, left);
  tree.add_child(node, right);
  tree.replace(id, node);
  Ok(node)
}

fn bound(tree: &Tree, id: NodeId) -> Result<char> {
  tree.value(id)
    .and_then(|v| v.chars().next())
    .ok_or_else(|| malformed(tree, id))
}

/// `ATOM -> NUCLEUS ATOMMOD`: apply the postfix modifier.
fn atom(tree: &mut Tree, id: NodeId) -> Result<NodeId> {
  let modifier = match tree.find_child(id, |k| k.is_nonterm("ATOMMOD")) {
    Some(modifier) => modifier,
    None => return Ok(id),
  };
  let operand = child(tree, id, 0)?;

  let op = tree.children(modifier).first().map(|&c| tree.kind(c).clone());
  let result = match op {
    Some(Kind::Term(op)) if op == "kleene" => {
      let star = tree.add_node(Kind::Kleene, None);
      tree.add_child(star, operand);
      star
    }
    // X+ becomes X X*, the starred X a deep copy.
    Some(Kind::Term(op)) if op == "plus" => {
      let list = tree.add_node(Kind::nonterm("SEQLIST"), None);
      let copy = tree.deep_copy(operand);
      tree.add_child(list, operand);
      let star = tree.push_child(list, Kind::Kleene, None);
      tree.add_child(star, copy);
      list
    }
    Some(Kind::Lambda) => operand,
    _ => return Err(malformed(tree, modifier)),
  };

  tree.replace(id, result);
  Ok(result)
}

fn is_empty_marker(tree: &Tree, id: NodeId) -> bool {
  matches!(tree.children(id), &[only] if *tree.kind(only) == Kind::Lambda)
}

/// Right-recursive list tails: drop empty tails, and fold a tail into an
/// enclosing list of the same kind.
fn list(tree: &mut Tree, id: NodeId, name: &str) -> NodeId {
  if is_empty_marker(tree, id) {
    tree.detach(id);
    return id;
  }

  let nested = tree.parent(id).map_or(false, |p| tree.kind(p).is_nonterm(name));
  if nested {
    tree.splice(id);
  }
  id
}

/// `SEQ`/`ALT`: flatten remaining list nodes, strip separators and unwrap a
/// single remaining child.
fn aggregate(tree: &mut Tree, id: NodeId, list: &str, kind: Kind) -> NodeId {
  while let Some(nested) = tree.find_child(id, |k| k.is_nonterm(list)) {
    tree.splice(nested);
  }
  while let Some(sep) = tree.find_child(id, |k| k.is_term("pipe")) {
    tree.detach(sep);
  }

  if let &[only] = tree.children(id) {
    tree.replace(id, only);
    return only;
  }
  tree.set_kind(id, kind);
  id
}
