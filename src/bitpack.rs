//! MSB-first bit packing over byte streams.

use crate::error::CompressError;
use crate::huffman::Code;
use crate::symbol::Symbol;
use bitstream_io::{BigEndian, BitRead, BitReader, BitWrite, BitWriter};
use std::io::{Read, Write};

/// Accumulates bits and writes every completed byte to `W`.
///
/// A trailing partial byte is held until [`BitPacker::finish`], which pads
/// it with zero bits and reports how many were added.
pub struct BitPacker<W: Write> {
    writer: BitWriter<W, BigEndian>,
    bits_written: u64,
}

impl<W: Write> BitPacker<W> {
    /// Create a new packer writing MSB first into `inner`
    pub fn new(inner: W) -> Self {
        Self {
            writer: BitWriter::endian(inner, BigEndian),
            bits_written: 0,
        }
    }

    /// Append a single bit
    pub fn write_bit(&mut self, bit: bool) -> Result<(), CompressError> {
        self.writer.write_bit(bit)?;
        self.bits_written += 1;
        Ok(())
    }

    /// Write the low `count` bits of `value`, most significant first.
    pub fn write_bits(&mut self, count: u32, value: u64) -> Result<(), CompressError> {
        debug_assert!(count <= 64);
        if count == 0 {
            return Ok(());
        }
        let masked = if count == 64 {
            value
        } else {
            value & ((1u64 << count) - 1)
        };
        self.writer.write(count, masked)?;
        self.bits_written += count as u64;
        Ok(())
    }

    pub fn write_symbol(&mut self, symbol: &Symbol) -> Result<(), CompressError> {
        for &byte in symbol.as_bytes() {
            self.write_bits(8, byte as u64)?;
        }
        Ok(())
    }

    pub fn write_code(&mut self, code: &Code) -> Result<(), CompressError> {
        let len = code.len();
        let bits = code.bits();
        if len > 64 {
            self.write_bits(len - 64, (bits >> 64) as u64)?;
            self.write_bits(64, bits as u64)
        } else {
            self.write_bits(len, bits as u64)
        }
    }

    pub fn bits_written(&self) -> u64 {
        self.bits_written
    }

    /// Pad to a byte boundary with zeros. Returns the inner writer and the
    /// number of padding bits in the final byte.
    pub fn finish(mut self) -> Result<(W, u8), CompressError> {
        let junk = junk_bits(self.bits_written);
        self.writer.byte_align()?;
        Ok((self.writer.into_writer(), junk))
    }
}

/// Padding needed to complete the last byte of a `bit_len`-bit stream.
pub fn junk_bits(bit_len: u64) -> u8 {
    ((8 - bit_len % 8) % 8) as u8
}

/// Reads bits MSB-first from `R`, stopping after exactly `limit` bits.
pub struct BitUnpacker<R: Read> {
    reader: BitReader<R, BigEndian>,
    remaining: u64,
    limit: u64,
}

impl<R: Read> BitUnpacker<R> {
    /// Create a new unpacker that yields at most `limit` bits from `inner`
    pub fn new(inner: R, limit: u64) -> Self {
        Self {
            reader: BitReader::endian(inner, BigEndian),
            remaining: limit,
            limit,
        }
    }

    /// Next bit, or `None` once the limit is reached.
    pub fn read_bit(&mut self) -> Result<Option<bool>, CompressError> {
        if self.remaining == 0 {
            return Ok(None);
        }
        let bit = self.reader.read_bit()?;
        self.remaining -= 1;
        Ok(Some(bit))
    }

    /// Read `count` bits as an integer. Fails with `TruncatedHeader` if fewer
    /// than `count` bits are left.
    pub fn read_bits(&mut self, count: u32) -> Result<u64, CompressError> {
        debug_assert!(count <= 64);
        if (count as u64) > self.remaining {
            return Err(CompressError::TruncatedHeader {
                expected: self.consumed() + count as u64,
                available: self.limit,
            });
        }
        if count == 0 {
            return Ok(0);
        }
        let value = self.reader.read::<u64>(count)?;
        self.remaining -= count as u64;
        Ok(value)
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    pub fn consumed(&self) -> u64 {
        self.limit - self.remaining
    }
}
