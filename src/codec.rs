//! Encode and decode over seekable streams.
//!
//! Encoding needs two passes over the input (frequencies, then codes) and
//! a seekable output for the junk-bit backpatch. [`compress`] and
//! [`decompress`] run the same code over in-memory buffers.

use crate::bitpack::{BitPacker, BitUnpacker};
use crate::config::CodecConfig;
use crate::container::{self, Preamble, PREAMBLE_LEN};
use crate::error::CompressError;
use crate::frequency::FrequencyTable;
use crate::header;
use crate::huffman::HuffmanTrie;
use crate::session::{Phase, Session};
use crate::symbol::SymbolReader;
use crate::{CompressionStats, DecompressionStats};
use std::io::{BufReader, BufWriter, Cursor, Read, Seek, SeekFrom, Write};
use std::path::Path;

/// Name used in errors for in-memory inputs.
pub const MEMORY_SOURCE: &str = "<memory>";

/// Encode all of `input` into `output`, starting at offset 0 of both.
/// `source` names the input in errors.
pub fn encode_stream<R, W>(
    input: &mut R,
    output: &mut W,
    config: &CodecConfig,
    source: &Path,
) -> Result<CompressionStats, CompressError>
where
    R: Read + Seek,
    W: Write + Seek,
{
    let mut session = Session::new();

    input.seek(SeekFrom::Start(0))?;
    let table = FrequencyTable::from_reader(&mut *input, config.buffer_size)?;
    if table.is_empty() {
        return Err(CompressError::EmptyInput(source.to_path_buf()));
    }
    session.complete(Phase::FrequencyPass);

    let trie = HuffmanTrie::from_frequencies(&table)?;
    session.complete(Phase::TrieBuilt);

    let codes = trie.code_table()?;
    session.complete(Phase::CodeTableBuilt);

    let header = header::serialize(&trie)?;
    let preamble = Preamble::new(header.len())?;
    output.seek(SeekFrom::Start(0))?;
    preamble.write(output)?;
    output.write_all(&header)?;

    input.seek(SeekFrom::Start(0))?;
    let mut packer = BitPacker::new(BufWriter::with_capacity(config.buffer_size, &mut *output));
    let mut symbol_count = 0u64;
    let mut original_size = 0u64;
    for symbol in SymbolReader::with_capacity(config.buffer_size, &mut *input) {
        let symbol = symbol?;
        let code = codes
            .get(&symbol)
            .ok_or_else(|| CompressError::SymbolNotInTable(symbol.to_string()))?;
        packer.write_code(code)?;
        symbol_count += 1;
        original_size += symbol.len() as u64;
    }
    let code_bits = packer.bits_written();
    let (writer, junk_bits) = packer.finish()?;
    writer.into_inner().map_err(|e| e.into_error())?;

    container::patch_junk_bits(output, junk_bits)?;
    output.flush()?;
    let compressed_size = output.stream_position()?;
    session.complete(Phase::Streaming);

    if symbol_count != table.total() {
        tracing::warn!(
            first_pass = table.total(),
            second_pass = symbol_count,
            "input changed between passes"
        );
    }
    tracing::debug!(
        distinct = table.len(),
        header_bytes = header.len(),
        code_bits,
        junk_bits,
        "code stream written"
    );

    Ok(CompressionStats::new(
        original_size,
        compressed_size,
        symbol_count,
        table.len(),
        header.len(),
        junk_bits,
        session.close(),
    ))
}

/// Decode a whole container from `input` into `output`.
pub fn decode_stream<R, W>(
    input: &mut R,
    output: &mut W,
    config: &CodecConfig,
    source: &Path,
) -> Result<DecompressionStats, CompressError>
where
    R: Read + Seek,
    W: Write,
{
    let mut session = Session::new();

    let total_len = input.seek(SeekFrom::End(0))?;
    input.seek(SeekFrom::Start(0))?;
    if total_len == 0 {
        return Err(CompressError::EmptyInput(source.to_path_buf()));
    }

    let preamble = Preamble::read(input, source)?;
    let header_bytes = container::read_header(input, preamble.header_len)?;
    let trie = header::rebuild(&header_bytes)?;
    session.complete(Phase::TrieBuilt);

    let data_len = total_len.saturating_sub(PREAMBLE_LEN + preamble.header_len as u64);
    if data_len == 0 {
        return Err(CompressError::CorruptStream("missing code stream".into()));
    }
    if preamble.junk_bits > 7 {
        return Err(CompressError::CorruptStream(format!(
            "junk bit count {} exceeds one byte",
            preamble.junk_bits
        )));
    }
    let data_bits = data_len * 8 - preamble.junk_bits as u64;

    let mut bits = BitUnpacker::new(
        BufReader::with_capacity(config.buffer_size, &mut *input),
        data_bits,
    );
    let mut out = BufWriter::with_capacity(config.buffer_size, output);
    let mut walker = trie.walker();
    let mut symbol_count = 0u64;
    let mut decompressed_size = 0u64;
    while let Some(bit) = bits.read_bit()? {
        if let Some(symbol) = walker.step(bit)? {
            out.write_all(symbol.as_bytes())?;
            symbol_count += 1;
            decompressed_size += symbol.len() as u64;
        }
    }
    if !walker.at_root() {
        return Err(CompressError::CorruptStream(
            "code stream ends inside a code".into(),
        ));
    }
    out.flush()?;
    session.complete(Phase::Streaming);

    Ok(DecompressionStats {
        compressed_size: total_len,
        decompressed_size,
        symbol_count,
        timings: session.close(),
    })
}

pub fn compress(data: &[u8]) -> Result<Vec<u8>, CompressError> {
    compress_with(data, &CodecConfig::default())
}

pub fn compress_with(data: &[u8], config: &CodecConfig) -> Result<Vec<u8>, CompressError> {
    let source = Path::new(MEMORY_SOURCE);
    if data.is_empty() {
        return Err(CompressError::EmptyInput(source.to_path_buf()));
    }
    if config.verify_utf8 && std::str::from_utf8(data).is_err() {
        return Err(CompressError::NotValidInputEncoding(source.to_path_buf()));
    }
    let mut output = Cursor::new(Vec::new());
    encode_stream(&mut Cursor::new(data), &mut output, config, source)?;
    Ok(output.into_inner())
}

pub fn decompress(data: &[u8]) -> Result<Vec<u8>, CompressError> {
    decompress_with(data, &CodecConfig::default())
}

pub fn decompress_with(data: &[u8], config: &CodecConfig) -> Result<Vec<u8>, CompressError> {
    let mut output = Vec::new();
    decode_stream(
        &mut Cursor::new(data),
        &mut output,
        config,
        Path::new(MEMORY_SOURCE),
    )?;
    Ok(output)
}
