//! Arena-backed parse tree with in-place rewriting.
//!
//! Nodes own their children by index and keep a non-owning parent index.
//! Rewrites only re-point indices; a detached subtree simply becomes
//! unreachable from the root.

use std::fmt::{self, Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
  fn index(self) -> usize {
    self.0 as usize
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Kind {
  /// Synthetic root the parser hangs the derivation from.
  Root,
  Nonterm(String),
  /// Token leaf, labeled by token type.
  Term(String),
  Lambda,
  Sequence,
  Alternation,
  Range,
  Kleene,
  Dot,
  Char,
}

impl Kind {
  pub fn nonterm(name: &str) -> Self {
    Kind::Nonterm(name.to_owned())
  }

  pub fn term(name: &str) -> Self {
    Kind::Term(name.to_owned())
  }

  pub fn is_nonterm(&self, name: &str) -> bool {
    matches!(self, Kind::Nonterm(n) if n == name)
  }

  pub fn is_term(&self, name: &str) -> bool {
    matches!(self, Kind::Term(t) if t == name)
  }
}

impl Display for Kind {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    match self {
      Kind::Root => f.write_str("root"),
      Kind::Nonterm(name) | Kind::Term(name) => f.write_str(name),
      Kind::Lambda => f.write_str("lambda"),
      Kind::Sequence => f.write_str("seq"),
      Kind::Alternation => f.write_str("alt"),
      Kind::Range => f.write_str("range"),
      Kind::Kleene => f.write_str("kleene"),
      Kind::Dot => f.write_str("dot"),
      Kind::Char => f.write_str("char"),
    }
  }
}

#[derive(Debug, Clone)]
pub struct Node {
  pub kind: Kind,
  pub value: Option<String>,
  children: Vec<NodeId>,
  parent: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct Tree {
  nodes: Vec<Node>,
  root: NodeId,
}

impl Tree {
  pub fn new(root: Kind) -> Self {
    let mut tree = Tree {
      nodes: vec![],
      root: NodeId(0),
    };
    tree.root = tree.add_node(root, None);
    tree
  }

  pub fn root(&self) -> NodeId {
    self.root
  }

  /// Makes `id` the root, detaching it from its parent.
  pub fn set_root(&mut self, id: NodeId) {
    self.detach(id);
    self.root = id;
  }

  /// Allocates a detached node.
  pub fn add_node(&mut self, kind: Kind, value: Option<String>) -> NodeId {
    let id = NodeId(self.nodes.len() as u32);
    self.nodes.push(Node {
      kind,
      value,
      children: vec![],
      parent: None,
    });
    id
  }

  /// Allocates a node and appends it as the last child of `parent`.
  pub fn push_child(
    &mut self,
    parent: NodeId,
    kind: Kind,
    value: Option<String>,
  ) -> NodeId {
    let id = self.add_node(kind, value);
    self.add_child(parent, id);
    id
  }

  /// Moves `child` to the end of `parent`'s children.
  pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
    self.detach(child);
    self.nodes[parent.index()].children.push(child);
    self.nodes[child.index()].parent = Some(parent);
  }

  pub fn node(&self, id: NodeId) -> &Node {
    &self.nodes[id.index()]
  }

  pub fn kind(&self, id: NodeId) -> &Kind {
    &self.nodes[id.index()].kind
  }

  pub fn set_kind(&mut self, id: NodeId, kind: Kind) {
    self.nodes[id.index()].kind = kind;
  }

  pub fn value(&self, id: NodeId) -> Option<&str> {
    self.nodes[id.index()].value.as_deref()
  }

  pub fn children(&self, id: NodeId) -> &[NodeId] {
    &self.nodes[id.index()].children
  }

  pub fn parent(&self, id: NodeId) -> Option<NodeId> {
    self.nodes[id.index()].parent
  }

  /// First child of `id` whose kind satisfies `pred`.
  pub fn find_child(
    &self,
    id: NodeId,
    pred: impl Fn(&Kind) -> bool,
  ) -> Option<NodeId> {
    self.children(id).iter().copied().find(|&c| pred(self.kind(c)))
  }

  /// Unlinks `id` from its parent, if any.
  pub fn detach(&mut self, id: NodeId) {
    if let Some(parent) = self.nodes[id.index()].parent.take() {
      self.nodes[parent.index()].children.retain(|&c| c != id);
    }
  }

  /// Puts `new` in `old`'s place under `old`'s parent and detaches `old`.
  /// `new` may currently be anywhere, including below `old`.
  pub fn replace(&mut self, old: NodeId, new: NodeId) {
    if old == new {
      return;
    }
    self.detach(new);
    if old == self.root {
      self.root = new;
      return;
    }
    let parent = match self.nodes[old.index()].parent.take() {
      Some(parent) => parent,
      None => return,
    };
    for child in self.nodes[parent.index()].children.iter_mut() {
      if *child == old {
        *child = new;
      }
    }
    self.nodes[new.index()].parent = Some(parent);
  }

  /// Replaces `id` under its parent with its own children, in order.
  pub fn splice(&mut self, id: NodeId) {
    let parent = match self.nodes[id.index()].parent.take() {
      Some(parent) => parent,
      None => return,
    };
    let children = std::mem::take(&mut self.nodes[id.index()].children);
    for &child in &children {
      self.nodes[child.index()].parent = Some(parent);
    }
    let siblings = &mut self.nodes[parent.index()].children;
    if let Some(pos) = siblings.iter().position(|&c| c == id) {
      siblings.splice(pos..=pos, children);
    }
  }

  /// Copies the subtree at `id` into fresh, detached nodes.
  pub fn deep_copy(&mut self, id: NodeId) -> NodeId {
    let node = &self.nodes[id.index()];
    let (kind, value, children) =
      (node.kind.clone(), node.value.clone(), node.children.clone());
    let copy = self.add_node(kind, value);
    for child in children {
      let child_copy = self.deep_copy(child);
      self.add_child(copy, child_copy);
    }
    copy
  }

  /// Compares two subtrees by kind, value and shape, ignoring identity.
  pub fn structurally_eq(&self, a: NodeId, b: NodeId) -> bool {
    let (x, y) = (self.node(a), self.node(b));
    x.kind == y.kind
      && x.value == y.value
      && x.children.len() == y.children.len()
      && x.children.iter()
        .zip(&y.children)
        .all(|(&a, &b)| self.structurally_eq(a, b))
  }

  fn fmt_node(&self, f: &mut Formatter, id: NodeId) -> fmt::Result {
    let node = self.node(id);
    if node.children.is_empty() {
      return match (&node.kind, &node.value) {
        (Kind::Lambda, _) | (Kind::Dot, _) | (_, None) => {
          write!(f, "{}", node.kind)
        }
        (kind, Some(value)) => write!(f, "{}:{}", kind, value),
      };
    }

    write!(f, "({}", node.kind)?;
    for &child in &node.children {
      f.write_str(" ")?;
      self.fmt_node(f, child)?;
    }
    f.write_str(")")
  }
}

/// S-expression rendering from the root, e.g. `(seq char:a (kleene char:b))`.
impl Display for Tree {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    self.fmt_node(f, self.root)
  }
}
