//! Container layout for compressed files
//!
//! ```text
//! "HUFF" | junk bits (u8) | header length (u24 BE) | header | code stream
//! ```
//!
//! The junk-bit byte is written as zero first and patched once the code
//! stream is finished.

use crate::error::CompressError;
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::Path;

pub const SIGNATURE: [u8; 4] = *b"HUFF";

/// Signature, junk-bit byte and header length.
pub const PREAMBLE_LEN: u64 = 8;

pub const JUNK_BITS_OFFSET: u64 = SIGNATURE.len() as u64;

/// Largest header the 24-bit length field can describe.
pub const MAX_HEADER_LEN: usize = 0xFF_FFFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preamble {
    pub junk_bits: u8,
    pub header_len: u32,
}

impl Preamble {
    /// Create a preamble for a header of `header_len` bytes, junk count zero
    pub fn new(header_len: usize) -> Result<Self, CompressError> {
        if header_len > MAX_HEADER_LEN {
            return Err(CompressError::HeaderTooLarge(header_len));
        }
        Ok(Self {
            junk_bits: 0,
            header_len: header_len as u32,
        })
    }

    /// Write the 8 preamble bytes
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<(), CompressError> {
        writer.write_all(&SIGNATURE)?;
        writer.write_u8(self.junk_bits)?;
        writer.write_u24::<BigEndian>(self.header_len)?;
        Ok(())
    }

    /// Read and check the preamble. `source` names the file in errors.
    pub fn read<R: Read>(reader: &mut R, source: &Path) -> Result<Self, CompressError> {
        let mut signature = [0u8; 4];
        match reader.read_exact(&mut signature) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                return Err(CompressError::InvalidContainerSignature(source.to_path_buf()))
            }
            Err(e) => return Err(e.into()),
        }
        if signature != SIGNATURE {
            return Err(CompressError::InvalidContainerSignature(source.to_path_buf()));
        }

        let mut rest = [0u8; 4];
        match reader.read_exact(&mut rest) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                return Err(CompressError::TruncatedHeader {
                    expected: (PREAMBLE_LEN - SIGNATURE.len() as u64) * 8,
                    available: 0,
                })
            }
            Err(e) => return Err(e.into()),
        }
        let mut rest = &rest[..];
        let junk_bits = rest.read_u8()?;
        let header_len = rest.read_u24::<BigEndian>()?;
        Ok(Self {
            junk_bits,
            header_len,
        })
    }
}

/// Overwrite the junk-bit byte of an already written container.
pub fn patch_junk_bits<W: Write + Seek>(writer: &mut W, junk_bits: u8) -> Result<(), CompressError> {
    let end = writer.stream_position()?;
    writer.seek(SeekFrom::Start(JUNK_BITS_OFFSET))?;
    writer.write_u8(junk_bits)?;
    writer.seek(SeekFrom::Start(end))?;
    Ok(())
}

/// Read exactly `len` header bytes.
pub fn read_header<R: Read>(reader: &mut R, len: u32) -> Result<Vec<u8>, CompressError> {
    let mut header = Vec::with_capacity(len as usize);
    let read = reader.take(len as u64).read_to_end(&mut header)?;
    if read < len as usize {
        return Err(CompressError::TruncatedHeader {
            expected: len as u64 * 8,
            available: read as u64 * 8,
        });
    }
    Ok(header)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_preamble_layout() {
        let mut out = Vec::new();
        let preamble = Preamble {
            junk_bits: 3,
            header_len: 0x01_02_03,
        };
        preamble.write(&mut out).unwrap();
        assert_eq!(out, vec![b'H', b'U', b'F', b'F', 3, 0x01, 0x02, 0x03]);

        let read = Preamble::read(&mut Cursor::new(&out), Path::new("x")).unwrap();
        assert_eq!(read, preamble);
    }

    #[test]
    fn test_bad_signature() {
        let data = b"HUFX\0\0\0\x01";
        assert!(matches!(
            Preamble::read(&mut &data[..], Path::new("x")),
            Err(CompressError::InvalidContainerSignature(_))
        ));
    }

    #[test]
    fn test_short_file_is_bad_signature() {
        assert!(matches!(
            Preamble::read(&mut &b"HU"[..], Path::new("x")),
            Err(CompressError::InvalidContainerSignature(_))
        ));
    }

    #[test]
    fn test_missing_length_is_truncated() {
        assert!(matches!(
            Preamble::read(&mut &b"HUFF\0"[..], Path::new("x")),
            Err(CompressError::TruncatedHeader { .. })
        ));
    }

    #[test]
    fn test_header_too_large() {
        assert!(Preamble::new(MAX_HEADER_LEN).is_ok());
        assert!(matches!(
            Preamble::new(MAX_HEADER_LEN + 1),
            Err(CompressError::HeaderTooLarge(_))
        ));
    }

    #[test]
    fn test_patch_junk_bits() {
        let mut cursor = Cursor::new(Vec::new());
        Preamble::new(2).unwrap().write(&mut cursor).unwrap();
        cursor.write_all(&[0xAA, 0xBB, 0xCC]).unwrap();
        patch_junk_bits(&mut cursor, 5).unwrap();
        assert_eq!(cursor.position(), 11);
        assert_eq!(cursor.get_ref()[4], 5);
    }

    #[test]
    fn test_read_header_short() {
        let data = [1u8, 2];
        assert!(matches!(
            read_header(&mut &data[..], 4),
            Err(CompressError::TruncatedHeader {
                expected: 32,
                available: 16
            })
        ));
    }
}
