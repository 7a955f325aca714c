//! Input compatibility checks run before encoding or decoding.

use crate::error::CompressError;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

/// Whether the whole stream is valid UTF-8.
///
/// Reads in chunks of `buffer_size`, carrying an incomplete trailing
/// sequence over to the next chunk.
pub fn is_utf8<R: Read>(mut reader: R, buffer_size: usize) -> std::io::Result<bool> {
    let mut buf = vec![0u8; buffer_size.max(8)];
    let mut carry = 0usize;
    loop {
        let n = match reader.read(&mut buf[carry..]) {
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        if n == 0 {
            return Ok(carry == 0);
        }
        let filled = carry + n;
        match std::str::from_utf8(&buf[..filled]) {
            Ok(_) => carry = 0,
            Err(e) if e.error_len().is_some() => return Ok(false),
            Err(e) => {
                let valid = e.valid_up_to();
                buf.copy_within(valid..filled, 0);
                carry = filled - valid;
            }
        }
    }
}

fn open_regular(path: &Path) -> Result<File, CompressError> {
    if path.is_dir() {
        return Err(CompressError::not_openable(
            path,
            std::io::Error::new(ErrorKind::Other, "is a directory"),
        ));
    }
    File::open(path).map_err(|e| CompressError::not_openable(path, e))
}

/// Check that `path` can be encoded. Returns its length in bytes.
pub fn check_encode_compatibility(
    path: &Path,
    verify_utf8: bool,
    buffer_size: usize,
) -> Result<u64, CompressError> {
    let file = open_regular(path)?;
    let len = file.metadata()?.len();
    if verify_utf8 && !is_utf8(file, buffer_size)? {
        return Err(CompressError::NotValidInputEncoding(path.to_path_buf()));
    }
    if len == 0 {
        return Err(CompressError::EmptyInput(path.to_path_buf()));
    }
    Ok(len)
}

/// Check that `path` can be decoded. Returns its length in bytes.
pub fn check_decode_compatibility(path: &Path) -> Result<u64, CompressError> {
    let file = open_regular(path)?;
    let len = file.metadata()?.len();
    if len == 0 {
        return Err(CompressError::EmptyInput(path.to_path_buf()));
    }
    Ok(len)
}
