use log::debug;
use crate::error::{Error, Result};
use crate::tree::{Kind, NodeId, Tree};
use super::{Nfa, StateId};

/// Compiles tree nodes into NFA fragments with one entry and one exit.
pub(super) struct Builder<'a> {
  nfa: &'a mut Nfa,
  tree: &'a Tree,
}

impl<'a> Builder<'a> {
  pub(super) fn new(nfa: &'a mut Nfa, tree: &'a Tree) -> Self {
    Builder {
      nfa,
      tree,
    }
  }

  /// Builds `node` between two fresh states lambda-linked from `src` and to
  /// `dest`.
  pub(super) fn wrap(
    &mut self,
    src: StateId,
    dest: StateId,
    node: NodeId,
  ) -> Result<()> {
    let before = self.nfa.add_state();
    let after = self.nfa.add_state();
    self.nfa.add_lambda(src, before);
    self.nfa.add_lambda(after, dest);
    self.fragment(before, after, node)
  }

  fn fragment(
    &mut self,
    src: StateId,
    dest: StateId,
    node: NodeId,
  ) -> Result<()> {
    let tree = self.tree;
    let children = tree.children(node);
    match tree.kind(node) {
      Kind::Sequence => {
        let mut src = src;
        for &child in children {
          let join = self.nfa.add_state();
          self.wrap(src, join, child)?;
          src = join;
        }
        self.nfa.add_lambda(src, dest);
      }
      Kind::Alternation => {
        for &child in children {
          let join = self.nfa.add_state();
          self.wrap(src, join, child)?;
          self.nfa.add_lambda(join, dest);
        }
      }
      Kind::Range => {
        let (lo, hi) = match children {
          &[lo, hi] => (self.symbol(lo)?, self.symbol(hi)?),
          _ => return Err(Error::MalformedNode(Kind::Range.to_string())),
        };
        if hi < lo {
          return Err(Error::Semantic(
            format!("invalid character range {}-{}", lo, hi)));
        }
        let symbols = self.nfa.alphabet.iter()
          .copied()
          .filter(|c| (lo..=hi).contains(c))
          .collect::<Vec<_>>();
        for c in symbols {
          self.nfa.add_edge(src, dest, c);
        }
      }
      Kind::Kleene => {
        let body = match children {
          &[body] => body,
          _ => return Err(Error::MalformedNode(Kind::Kleene.to_string())),
        };
        self.wrap(src, dest, body)?;
        self.nfa.add_lambda(src, dest);
        self.nfa.add_lambda(dest, src);
      }
      Kind::Lambda => {
        self.nfa.add_lambda(src, dest);
      }
      Kind::Dot => {
        let symbols = self.nfa.alphabet.iter().copied().collect::<Vec<_>>();
        for c in symbols {
          self.nfa.add_edge(src, dest, c);
        }
      }
      Kind::Char => {
        let c = self.symbol(node)?;
        if self.nfa.alphabet.contains(&c) {
          self.nfa.add_edge(src, dest, c);
        } else {
          debug!("`{}` is not in the alphabet, no edge added", c);
        }
      }
      kind @ (Kind::Root | Kind::Nonterm(_) | Kind::Term(_)) => {
        return Err(Error::UnrecognizedNode(kind.to_string()));
      }
    }
    Ok(())
  }

  fn symbol(&self, node: NodeId) -> Result<char> {
    self.tree.value(node)
      .and_then(|v| v.chars().next())
      .ok_or_else(|| Error::MalformedNode(self.tree.kind(node).to_string()))
  }
}

#[cfg(test)]
mod tests {
  use crate::error::Error;
  use crate::nfa::{Nfa, ACCEPT, START};
  use crate::tree::{Kind, NodeId, Tree};
  use pretty_assertions::assert_eq;

  fn chr(tree: &mut Tree, parent: NodeId, c: char) -> NodeId {
    tree.push_child(parent, Kind::Char, Some(c.to_string()))
  }

  fn range(lo: char, hi: char) -> Tree {
    let mut tree = Tree::new(Kind::Range);
    let root = tree.root();
    chr(&mut tree, root, lo);
    chr(&mut tree, root, hi);
    tree
  }

  #[test]
  fn kleene_skip_and_repeat() {
    let mut tree = Tree::new(Kind::Kleene);
    let root = tree.root();
    chr(&mut tree, root, 'a');

    let nfa = Nfa::compile(&tree, "ab".chars()).unwrap();

    // 0 -> 2 .. 3 -> 1 around the kleene, 4 -a-> 5 inside it
    assert_eq!(nfa.num_states(), 6);
    assert_eq!(nfa.edge(4, 'a'), Some(5));
    assert!(nfa.has_lambda(START, 2));
    assert!(nfa.has_lambda(3, ACCEPT));
    assert!(nfa.has_lambda(2, 4));
    assert!(nfa.has_lambda(5, 3));
    assert!(nfa.has_lambda(2, 3));
    assert!(nfa.has_lambda(3, 2));
    assert_eq!(nfa.lambda_edges().count(), 6);
  }

  #[test]
  fn range_edges() {
    let nfa = Nfa::compile(&range('b', 'd'), "abcde".chars()).unwrap();

    assert_eq!(
      nfa.symbol_edges().collect::<Vec<_>>(),
      vec![(2, 3, 'b'), (2, 3, 'c'), (2, 3, 'd')]);
  }

  #[test]
  fn reversed_range() {
    let err = Nfa::compile(&range('d', 'b'), "abcde".chars()).unwrap_err();
    assert!(matches!(err, Error::Semantic(_)));
  }

  #[test]
  fn dot_covers_alphabet() {
    let tree = Tree::new(Kind::Dot);
    let nfa = Nfa::compile(&tree, "xyz".chars()).unwrap();
    assert_eq!(
      nfa.symbol_edges().map(|(_, _, c)| c).collect::<String>(),
      "xyz");
  }

  #[test]
  fn sequence_chains_through_joins() {
    let mut tree = Tree::new(Kind::Sequence);
    let root = tree.root();
    chr(&mut tree, root, 'a');
    chr(&mut tree, root, 'b');

    let nfa = Nfa::compile(&tree, "ab".chars()).unwrap();

    // outer wrap 2,3; join 4 with a on 5->6; join 7 with b on 8->9
    assert_eq!(nfa.num_states(), 10);
    assert_eq!(nfa.edge(5, 'a'), Some(6));
    assert_eq!(nfa.edge(8, 'b'), Some(9));
    assert_eq!(nfa.lambda_edges().collect::<Vec<_>>(), vec![
      (0, 2), (2, 5), (3, 1), (4, 8), (6, 4), (7, 3), (9, 7),
    ]);
  }

  #[test]
  fn alternation_branches_share_ends() {
    let mut tree = Tree::new(Kind::Alternation);
    let root = tree.root();
    chr(&mut tree, root, 'a');
    chr(&mut tree, root, 'b');

    let nfa = Nfa::compile(&tree, "ab".chars()).unwrap();

    // branch a: join 4, states 5 -a-> 6; branch b: join 7, 8 -b-> 9
    assert_eq!(nfa.num_states(), 10);
    assert_eq!(nfa.edge(5, 'a'), Some(6));
    assert_eq!(nfa.edge(8, 'b'), Some(9));
    assert!(nfa.has_lambda(2, 5));
    assert!(nfa.has_lambda(2, 8));
    assert!(nfa.has_lambda(4, 3));
    assert!(nfa.has_lambda(7, 3));
  }

  #[test]
  fn lambda_leaf() {
    let tree = Tree::new(Kind::Lambda);
    let nfa = Nfa::compile(&tree, "a".chars()).unwrap();
    assert!(nfa.has_lambda(2, 3));
    assert_eq!(nfa.symbol_edges().count(), 0);
  }

  #[test]
  fn unrewritten_node() {
    let tree = Tree::new(Kind::nonterm("SEQLIST"));
    let err = Nfa::compile(&tree, "a".chars()).unwrap_err();
    assert_eq!(err, Error::UnrecognizedNode("SEQLIST".to_owned()));
  }
}
