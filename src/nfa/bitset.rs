use std::fmt::{self, Debug, Formatter};

type BitBlock = u64;

const BLOCK_NBITS: usize = std::mem::size_of::<BitBlock>() * 8;

/// Bit set that grows on insertion; bits past the end read as unset.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct BitSet {
  blocks: Vec<BitBlock>,
}

impl BitSet {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn insert(&mut self, bit: usize) {
    let block = bit / BLOCK_NBITS;
    if block >= self.blocks.len() {
      self.blocks.resize(block + 1, 0);
    }
    self.blocks[block] |= 1 << (bit % BLOCK_NBITS);
  }

  pub fn contains(&self, bit: usize) -> bool {
    self.blocks.get(bit / BLOCK_NBITS)
      .map_or(false, |&b| b & (1 << (bit % BLOCK_NBITS)) != 0)
  }

  /// Set bits in ascending order.
  pub fn iter(&self) -> Iter<'_> {
    Iter {
      blocks: self.blocks.iter().enumerate(),
      base: 0,
      word: 0,
    }
  }
}

pub struct Iter<'a> {
  blocks: std::iter::Enumerate<std::slice::Iter<'a, BitBlock>>,
  base: usize,
  /// unvisited bits of the current block
  word: BitBlock,
}

impl Iterator for Iter<'_> {
  type Item = usize;

  fn next(&mut self) -> Option<usize> {
    while self.word == 0 {
      let (i, &word) = self.blocks.next()?;
      self.base = i * BLOCK_NBITS;
      self.word = word;
    }
    let bit = self.word.trailing_zeros() as usize;
    self.word &= self.word - 1;
    Some(self.base + bit)
  }
}

impl Debug for BitSet {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    f.debug_set().entries(self.iter()).finish()
  }
}
