//! Variable-width symbols and the reader that splits a byte stream into them.
//!
//! A symbol is the raw byte pattern of one UTF-8 character, 1 to 4 bytes long.
//! The width is decided from the lead byte alone; continuation bytes are taken
//! as-is, validity having been checked before encoding.

use crate::error::CompressError;
use std::fmt;
use std::io::{ErrorKind, Read};

pub const MAX_SYMBOL_BYTES: usize = 4;

/// Number of bytes in the symbol introduced by `lead`.
///
/// Lead bytes UTF-8 never starts a sequence with (`10xxxxxx`, `11111xxx`)
/// count as single-byte symbols, so the width is defined for every byte.
pub fn symbol_width(lead: u8) -> usize {
    if lead & 0x80 == 0x00 {
        1
    } else if lead & 0xE0 == 0xC0 {
        2
    } else if lead & 0xF0 == 0xE0 {
        3
    } else if lead & 0xF8 == 0xF0 {
        4
    } else {
        1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol {
    bytes: [u8; MAX_SYMBOL_BYTES],
    len: u8,
}

impl Symbol {
    /// Build a symbol from its complete byte pattern. Returns `None` if the
    /// length does not match the width announced by the lead byte.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let lead = *bytes.first()?;
        if symbol_width(lead) != bytes.len() {
            return None;
        }
        let mut buf = [0u8; MAX_SYMBOL_BYTES];
        buf[..bytes.len()].copy_from_slice(bytes);
        Some(Self {
            bytes: buf,
            len: bytes.len() as u8,
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn bit_len(&self) -> u32 {
        self.len as u32 * 8
    }
}

impl fmt::Display for Symbol {
    /// Writes the symbol as its bit-string, MSB first.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.as_bytes() {
            write!(f, "{:08b}", byte)?;
        }
        Ok(())
    }
}

/// Pull-based reader yielding one [`Symbol`] per call.
///
/// Owns its lookahead buffer; a symbol straddling a refill is handled
/// internally. Stops after the first error.
pub struct SymbolReader<R> {
    inner: R,
    buf: Box<[u8]>,
    pos: usize,
    filled: usize,
    offset: u64,
    done: bool,
}

impl<R: Read> SymbolReader<R> {
    pub fn new(inner: R) -> Self {
        Self::with_capacity(crate::config::DEFAULT_BUFFER_SIZE, inner)
    }

    pub fn with_capacity(capacity: usize, inner: R) -> Self {
        Self {
            inner,
            buf: vec![0u8; capacity.max(MAX_SYMBOL_BYTES)].into_boxed_slice(),
            pos: 0,
            filled: 0,
            offset: 0,
            done: false,
        }
    }

    /// Bytes consumed so far.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    fn next_byte(&mut self) -> Result<Option<u8>, CompressError> {
        if self.pos == self.filled {
            self.filled = loop {
                match self.inner.read(&mut self.buf) {
                    Ok(n) => break n,
                    Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e.into()),
                }
            };
            self.pos = 0;
            if self.filled == 0 {
                return Ok(None);
            }
        }
        let byte = self.buf[self.pos];
        self.pos += 1;
        self.offset += 1;
        Ok(Some(byte))
    }

    fn read_symbol(&mut self) -> Result<Option<Symbol>, CompressError> {
        let start = self.offset;
        let lead = match self.next_byte()? {
            Some(b) => b,
            None => return Ok(None),
        };
        let width = symbol_width(lead);
        let mut bytes = [0u8; MAX_SYMBOL_BYTES];
        bytes[0] = lead;
        for i in 1..width {
            bytes[i] = self.next_byte()?.ok_or(CompressError::TruncatedSymbol {
                offset: start,
                expected: width,
                found: i,
            })?;
        }
        Ok(Some(Symbol {
            bytes,
            len: width as u8,
        }))
    }
}

impl<R: Read> Iterator for SymbolReader<R> {
    type Item = Result<Symbol, CompressError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.read_symbol() {
            Ok(Some(symbol)) => Some(Ok(symbol)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl<R: Read> std::iter::FusedIterator for SymbolReader<R> {}
