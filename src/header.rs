//! Trie serialization for the container header.
//!
//! Pre-order bit encoding: an internal node writes `0` followed by its left
//! and right subtrees, a leaf writes `1` followed by the symbol's raw bits.
//! The symbol width is implied by its lead byte, so no length is stored.
//! The bit stream is zero-padded to a whole number of bytes.

use crate::bitpack::{BitPacker, BitUnpacker};
use crate::container::MAX_HEADER_LEN;
use crate::error::CompressError;
use crate::huffman::{HuffmanTrie, TrieNode, MAX_CODE_BITS};
use crate::symbol::{symbol_width, Symbol, MAX_SYMBOL_BYTES};

/// Smallest encoded node: a leaf flag plus a one-byte symbol.
const MIN_NODE_BITS: u64 = 9;

pub fn serialize(trie: &HuffmanTrie) -> Result<Vec<u8>, CompressError> {
    let mut packer = BitPacker::new(Vec::new());
    write_node(trie.root(), &mut packer)?;
    let (bytes, _) = packer.finish()?;
    if bytes.len() > MAX_HEADER_LEN {
        return Err(CompressError::HeaderTooLarge(bytes.len()));
    }
    Ok(bytes)
}

fn write_node(node: &TrieNode, packer: &mut BitPacker<Vec<u8>>) -> Result<(), CompressError> {
    match node {
        TrieNode::Leaf { symbol, .. } => {
            packer.write_bit(true)?;
            packer.write_symbol(symbol)
        }
        TrieNode::Internal { left, right, .. } => {
            packer.write_bit(false)?;
            if let Some(left) = left {
                write_node(left, packer)?;
            }
            if let Some(right) = right {
                write_node(right, packer)?;
            }
            Ok(())
        }
    }
}

/// Rebuild a trie from exactly `header.len()` bytes of serialized header.
/// Leaf frequencies are not stored and come back as zero.
pub fn rebuild(header: &[u8]) -> Result<HuffmanTrie, CompressError> {
    let mut bits = BitUnpacker::new(header, header.len() as u64 * 8);

    let root = rebuild_node(&mut bits, 0)?.ok_or_else(|| truncated(&bits))?;
    if bits.remaining() >= 8 {
        return Err(CompressError::MalformedHeader(format!(
            "{} unused bits after the trie",
            bits.remaining()
        )));
    }
    HuffmanTrie::from_root(root)
        .ok_or_else(|| CompressError::MalformedHeader("root is a leaf".into()))
}

fn truncated<R: std::io::Read>(bits: &BitUnpacker<R>) -> CompressError {
    CompressError::TruncatedHeader {
        expected: bits.consumed() + MIN_NODE_BITS,
        available: bits.consumed() + bits.remaining(),
    }
}

/// `None` means too few bits remain for any node, which is only valid as
/// the missing right child of a single-symbol root.
fn rebuild_node<R: std::io::Read>(
    bits: &mut BitUnpacker<R>,
    depth: usize,
) -> Result<Option<TrieNode>, CompressError> {
    if bits.remaining() < MIN_NODE_BITS {
        return Ok(None);
    }
    if depth > MAX_CODE_BITS {
        return Err(CompressError::MalformedHeader(format!(
            "trie deeper than {} levels",
            MAX_CODE_BITS
        )));
    }

    if bits.read_bits(1)? == 1 {
        let mut bytes = [0u8; MAX_SYMBOL_BYTES];
        bytes[0] = bits.read_bits(8)? as u8;
        let width = symbol_width(bytes[0]);
        for byte in bytes.iter_mut().take(width).skip(1) {
            *byte = bits.read_bits(8)? as u8;
        }
        let symbol = Symbol::from_bytes(&bytes[..width])
            .ok_or_else(|| CompressError::MalformedHeader("bad leaf symbol".into()))?;
        return Ok(Some(TrieNode::leaf(symbol, 0)));
    }

    let left = rebuild_node(bits, depth + 1)?.ok_or_else(|| truncated(bits))?;
    let right = match rebuild_node(bits, depth + 1)? {
        Some(node) => Some(node),
        None if depth == 0 && left.is_leaf() => None,
        None => return Err(truncated(bits)),
    };
    Ok(Some(TrieNode::internal(Some(left), right)))
}
