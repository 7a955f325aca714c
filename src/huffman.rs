//! Huffman trie construction and code assignment
//!
//! The trie is built from a [`FrequencyTable`] by repeatedly merging the two
//! lightest nodes. The first node popped always becomes the left child, so
//! the resulting codes depend only on the table contents.

use crate::error::CompressError;
use crate::frequency::FrequencyTable;
use crate::queue::{HeapQueue, MinQueue};
use crate::symbol::Symbol;
use std::collections::BTreeMap;
use std::fmt;

/// Longest code a [`Code`] can hold.
pub const MAX_CODE_BITS: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrieNode {
    Leaf {
        symbol: Symbol,
        freq: u64,
    },
    Internal {
        left: Option<Box<TrieNode>>,
        right: Option<Box<TrieNode>>,
        freq: u64,
    },
}

impl TrieNode {
    pub fn leaf(symbol: Symbol, freq: u64) -> Self {
        TrieNode::Leaf { symbol, freq }
    }

    pub fn internal(left: Option<TrieNode>, right: Option<TrieNode>) -> Self {
        let freq = left.as_ref().map_or(0, TrieNode::freq) + right.as_ref().map_or(0, TrieNode::freq);
        TrieNode::Internal {
            left: left.map(Box::new),
            right: right.map(Box::new),
            freq,
        }
    }

    pub fn freq(&self) -> u64 {
        match self {
            TrieNode::Leaf { freq, .. } | TrieNode::Internal { freq, .. } => *freq,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, TrieNode::Leaf { .. })
    }

    /// Follow one edge: `false` is left, `true` is right.
    pub fn child(&self, bit: bool) -> Option<&TrieNode> {
        match self {
            TrieNode::Leaf { .. } => None,
            TrieNode::Internal { left, right, .. } => {
                if bit {
                    right.as_deref()
                } else {
                    left.as_deref()
                }
            }
        }
    }
}

/// A Huffman trie whose root is always an internal node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTrie {
    root: TrieNode,
}

impl HuffmanTrie {
    /// Build the trie for `table`. A single-symbol table gets an internal
    /// root with the leaf on its left, so the symbol's code is `0`.
    pub fn from_frequencies(table: &FrequencyTable) -> Result<Self, CompressError> {
        let mut queue = HeapQueue::with_capacity(table.len());
        for (symbol, count) in table.iter() {
            queue.push(count, TrieNode::leaf(*symbol, count));
        }
        Self::from_queue(queue)
    }

    fn from_queue<Q: MinQueue<TrieNode>>(mut queue: Q) -> Result<Self, CompressError> {
        while queue.len() > 1 {
            let (_, x) = queue.pop()?;
            let (_, y) = queue.pop()?;
            let merged = TrieNode::internal(Some(x), Some(y));
            queue.push(merged.freq(), merged);
        }

        let (_, root) = queue.pop()?;
        let root = if root.is_leaf() {
            TrieNode::internal(Some(root), None)
        } else {
            root
        };
        Ok(Self { root })
    }

    /// Wrap an already-shaped root. Returns `None` if `root` is a leaf.
    pub fn from_root(root: TrieNode) -> Option<Self> {
        if root.is_leaf() {
            None
        } else {
            Some(Self { root })
        }
    }

    pub fn root(&self) -> &TrieNode {
        &self.root
    }

    pub fn leaf_count(&self) -> usize {
        fn count(node: &TrieNode) -> usize {
            match node {
                TrieNode::Leaf { .. } => 1,
                TrieNode::Internal { left, right, .. } => {
                    left.as_deref().map_or(0, count) + right.as_deref().map_or(0, count)
                }
            }
        }
        count(&self.root)
    }

    /// Depth-first code assignment: `0` on left descent, `1` on right.
    pub fn code_table(&self) -> Result<CodeTable, CompressError> {
        let mut codes = BTreeMap::new();
        build_codes(&self.root, Code::default(), &mut codes)?;
        Ok(CodeTable { codes })
    }

    pub fn walker(&self) -> TrieWalker<'_> {
        TrieWalker {
            root: &self.root,
            current: &self.root,
        }
    }
}

fn build_codes(
    node: &TrieNode,
    prefix: Code,
    codes: &mut BTreeMap<Symbol, Code>,
) -> Result<(), CompressError> {
    match node {
        TrieNode::Leaf { symbol, .. } => {
            codes.insert(*symbol, prefix);
        }
        TrieNode::Internal { left, right, .. } => {
            if prefix.len() as usize >= MAX_CODE_BITS {
                return Err(CompressError::CodeTooLong(prefix.len() as usize + 1));
            }
            if let Some(left) = left {
                build_codes(left, prefix.child(false), codes)?;
            }
            if let Some(right) = right {
                build_codes(right, prefix.child(true), codes)?;
            }
        }
    }
    Ok(())
}

/// A root-to-leaf path, stored right-aligned in a `u128`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Code {
    bits: u128,
    len: u8,
}

impl Code {
    /// This code extended by one bit.
    pub fn child(self, bit: bool) -> Self {
        debug_assert!((self.len as usize) < MAX_CODE_BITS);
        Self {
            bits: (self.bits << 1) | bit as u128,
            len: self.len + 1,
        }
    }

    pub fn bits(&self) -> u128 {
        self.bits
    }

    pub fn len(&self) -> u32 {
        self.len as u32
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bit at `index`, counting from the first (root-side) bit.
    pub fn bit(&self, index: u32) -> bool {
        debug_assert!(index < self.len());
        (self.bits >> (self.len() - 1 - index)) & 1 == 1
    }

    pub fn is_prefix_of(&self, other: &Code) -> bool {
        if self.len == 0 {
            return true;
        }
        self.len <= other.len && (other.bits >> (other.len - self.len)) == self.bits
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.len() {
            f.write_str(if self.bit(i) { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Symbol to code mapping derived from a [`HuffmanTrie`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: BTreeMap<Symbol, Code>,
}

impl CodeTable {
    pub fn get(&self, symbol: &Symbol) -> Option<&Code> {
        self.codes.get(symbol)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, &Code)> {
        self.codes.iter()
    }

    /// Total encoded length of the symbols counted in `table`.
    pub fn encoded_bits(&self, table: &FrequencyTable) -> u64 {
        table
            .iter()
            .map(|(symbol, count)| self.get(symbol).map_or(0, |c| c.len() as u64) * count)
            .sum()
    }

    pub fn is_prefix_free(&self) -> bool {
        let codes: Vec<&Code> = self.codes.values().collect();
        codes.iter().enumerate().all(|(i, a)| {
            codes
                .iter()
                .enumerate()
                .all(|(j, b)| i == j || !a.is_prefix_of(b))
        })
    }
}

/// Bit-at-a-time decoder state over a trie.
pub struct TrieWalker<'a> {
    root: &'a TrieNode,
    current: &'a TrieNode,
}

impl<'a> TrieWalker<'a> {
    /// Advance by one bit. Returns the symbol when a leaf is reached and
    /// resets to the root.
    pub fn step(&mut self, bit: bool) -> Result<Option<Symbol>, CompressError> {
        let next = self.current.child(bit).ok_or_else(|| {
            CompressError::CorruptStream(format!(
                "bit {} leads to a missing branch",
                bit as u8
            ))
        })?;
        match next {
            TrieNode::Leaf { symbol, .. } => {
                self.current = self.root;
                Ok(Some(*symbol))
            }
            TrieNode::Internal { .. } => {
                self.current = next;
                Ok(None)
            }
        }
    }

    /// Whether the walker sits at the root, i.e. not inside a code.
    pub fn at_root(&self) -> bool {
        std::ptr::eq(self.current, self.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(s: &str) -> Symbol {
        Symbol::from_bytes(s.as_bytes()).unwrap()
    }

    fn trie_for(text: &str) -> HuffmanTrie {
        HuffmanTrie::from_frequencies(&FrequencyTable::from_bytes(text.as_bytes()).unwrap())
            .unwrap()
    }

    #[test]
    fn test_huffman_code_lengths() {
        // a:5 b:2 c:1 d:1
        let codes = trie_for("aaaaabbcd").code_table().unwrap();
        assert_eq!(codes.get(&sym("a")).unwrap().len(), 1);
        assert_eq!(codes.get(&sym("b")).unwrap().len(), 2);
        assert_eq!(codes.get(&sym("c")).unwrap().len(), 3);
        assert_eq!(codes.get(&sym("d")).unwrap().len(), 3);
        assert!(codes.is_prefix_free());
    }

    #[test]
    fn test_first_popped_is_left() {
        // c and d tie at 1; c was inserted first so it pops first and goes left.
        let codes = trie_for("aaaaabbcd").code_table().unwrap();
        assert_eq!(codes.get(&sym("c")).unwrap().to_string(), "010");
        assert_eq!(codes.get(&sym("d")).unwrap().to_string(), "011");
        assert_eq!(codes.get(&sym("b")).unwrap().to_string(), "00");
        assert_eq!(codes.get(&sym("a")).unwrap().to_string(), "1");
    }

    #[test]
    fn test_single_symbol_trie() {
        let trie = trie_for(&"a".repeat(1000));
        match trie.root() {
            TrieNode::Internal { left, right, freq } => {
                assert_eq!(*freq, 1000);
                assert!(left.as_deref().unwrap().is_leaf());
                assert!(right.is_none());
            }
            TrieNode::Leaf { .. } => panic!("root must be internal"),
        }
        let codes = trie.code_table().unwrap();
        assert_eq!(codes.get(&sym("a")).unwrap().to_string(), "0");
    }

    #[test]
    fn test_empty_table_underflows() {
        let result = HuffmanTrie::from_frequencies(&FrequencyTable::new());
        assert!(matches!(result, Err(CompressError::QueueUnderflow)));
    }

    #[test]
    fn test_multibyte_alphabet_prefix_free() {
        let trie = trie_for("día ação über 😀😀 €uro — ünïcödé");
        let codes = trie.code_table().unwrap();
        assert_eq!(codes.len(), trie.leaf_count());
        assert!(codes.is_prefix_free());
        assert!(codes.iter().all(|(_, c)| !c.is_empty()));
    }

    #[test]
    fn test_walker_decodes_codes() {
        let trie = trie_for("aaaaabbcd");
        let codes = trie.code_table().unwrap();
        let mut walker = trie.walker();
        for (symbol, code) in codes.iter() {
            let mut found = None;
            for i in 0..code.len() {
                found = walker.step(code.bit(i)).unwrap();
            }
            assert_eq!(found, Some(*symbol));
            assert!(walker.at_root());
        }
    }

    #[test]
    fn test_walker_missing_branch() {
        let trie = trie_for("aaaa");
        let mut walker = trie.walker();
        assert!(matches!(walker.step(true), Err(CompressError::CorruptStream(_))));
    }

    #[test]
    fn test_encoded_bits() {
        let table = FrequencyTable::from_bytes(b"aaaaabbcd").unwrap();
        let codes = HuffmanTrie::from_frequencies(&table).unwrap().code_table().unwrap();
        assert_eq!(codes.encoded_bits(&table), 5 + 2 * 2 + 3 + 3);
    }

    #[test]
    fn test_code_prefix() {
        let a = Code::default().child(true);
        let b = a.child(false);
        assert!(a.is_prefix_of(&b));
        assert!(!b.is_prefix_of(&a));
        assert!(Code::default().is_prefix_of(&a));
    }
}
