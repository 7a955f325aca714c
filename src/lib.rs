//! huff-compress: Huffman file compression over UTF-8 character units.
//!
//! Symbols are whole UTF-8 sequences (1 to 4 bytes) rather than single
//! bytes, so text in any script gets one code per character.
//!
//! Compressed file layout:
//! - `HUFF` signature
//! - junk-bit count of the last byte (1 byte)
//! - serialized trie length (3 bytes, big-endian)
//! - serialized trie, pre-order, zero-padded to a byte boundary
//! - packed code stream, MSB first
//!
//! ```no_run
//! use huff_compress::Compressor;
//!
//! let compressor = Compressor::default();
//! let stats = compressor.encode("notes.txt")?; // writes notes.txt.bin
//! println!("ratio {:.2}", stats.ratio);
//! compressor.decode("notes.txt.bin")?; // writes notes-decompressed.txt
//! # Ok::<(), huff_compress::error::CompressError>(())
//! ```

pub mod bitpack;
pub mod codec;
pub mod config;
pub mod container;
pub mod error;
pub mod frequency;
pub mod header;
pub mod huffman;
pub mod output;
pub mod queue;
pub mod session;
pub mod symbol;
pub mod validate;

pub use crate::codec::{compress, decompress};
pub use crate::config::CodecConfig;
pub use crate::error::CompressError;
pub use crate::huffman::{CodeTable, HuffmanTrie};
pub use crate::session::{Phase, PhaseTimings};

use crate::output::PartialOutput;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Result of one encode call
#[derive(Debug, Clone, serde::Serialize)]
pub struct CompressionStats {
    pub original_size: u64,
    pub compressed_size: u64,
    /// compressed / original
    pub ratio: f64,
    pub symbol_count: u64,
    pub distinct_symbols: usize,
    pub header_size: usize,
    pub junk_bits: u8,
    pub timings: PhaseTimings,
}

impl CompressionStats {
    pub fn new(
        original_size: u64,
        compressed_size: u64,
        symbol_count: u64,
        distinct_symbols: usize,
        header_size: usize,
        junk_bits: u8,
        timings: PhaseTimings,
    ) -> Self {
        let ratio = if original_size == 0 {
            1.0
        } else {
            compressed_size as f64 / original_size as f64
        };
        Self {
            original_size,
            compressed_size,
            ratio,
            symbol_count,
            distinct_symbols,
            header_size,
            junk_bits,
            timings,
        }
    }

    /// Percentage of the input saved, or `None` if the output is not smaller.
    pub fn space_saving(&self) -> Option<f64> {
        if self.compressed_size < self.original_size {
            Some((1.0 - self.ratio) * 100.0)
        } else {
            None
        }
    }
}

/// Result of one decode call
#[derive(Debug, Clone, serde::Serialize)]
pub struct DecompressionStats {
    pub compressed_size: u64,
    pub decompressed_size: u64,
    pub symbol_count: u64,
    pub timings: PhaseTimings,
}

/// File-level compressor. Holds only configuration; every call builds its
/// own frequency table, trie and code table.
#[derive(Debug, Clone, Default)]
pub struct Compressor {
    config: CodecConfig,
}

impl Compressor {
    /// Create a new compressor with the given configuration
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    /// Get the current configuration
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Where [`Compressor::encode`] writes its output.
    pub fn compressed_path(&self, input: impl AsRef<Path>) -> PathBuf {
        output::compressed_path(input.as_ref(), &self.config.output_suffix)
    }

    /// Where [`Compressor::decode`] writes its output.
    pub fn decompressed_path(&self, input: impl AsRef<Path>) -> PathBuf {
        output::decompressed_path(
            input.as_ref(),
            &self.config.output_suffix,
            &self.config.decompressed_tag,
        )
    }

    /// Compress `input` next to itself, appending the output suffix.
    pub fn encode(&self, input: impl AsRef<Path>) -> Result<CompressionStats, CompressError> {
        let output = self.compressed_path(&input);
        self.encode_to(input, output)
    }

    /// Compress `input` into `output`; an existing `output` is replaced only on success.
    pub fn encode_to(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<CompressionStats, CompressError> {
        let (input, output) = (input.as_ref(), output.as_ref());
        self.check_distinct(input, output)?;
        validate::check_encode_compatibility(
            input,
            self.config.verify_utf8,
            self.config.buffer_size,
        )?;

        let mut source = File::open(input).map_err(|e| CompressError::not_openable(input, e))?;
        let mut target = PartialOutput::create(output, self.config.remove_partial_output)?;
        let stats = codec::encode_stream(&mut source, target.file(), &self.config, input)?;
        target.commit()?;

        tracing::info!(
            input = %input.display(),
            output = %output.display(),
            original = stats.original_size,
            compressed = stats.compressed_size,
            ms = stats.timings.total_ms,
            "compressed"
        );
        Ok(stats)
    }

    /// Decompress `input` next to itself, see [`Compressor::decompressed_path`].
    pub fn decode(&self, input: impl AsRef<Path>) -> Result<DecompressionStats, CompressError> {
        let output = self.decompressed_path(&input);
        self.decode_to(input, output)
    }

    /// Decompress `input` into `output`; an existing `output` is replaced only on success.
    pub fn decode_to(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<DecompressionStats, CompressError> {
        let (input, output) = (input.as_ref(), output.as_ref());
        self.check_distinct(input, output)?;
        validate::check_decode_compatibility(input)?;

        let mut source = File::open(input).map_err(|e| CompressError::not_openable(input, e))?;
        let mut target = PartialOutput::create(output, self.config.remove_partial_output)?;
        let stats = codec::decode_stream(&mut source, target.file(), &self.config, input)?;
        target.commit()?;

        tracing::info!(
            input = %input.display(),
            output = %output.display(),
            symbols = stats.symbol_count,
            ms = stats.timings.total_ms,
            "decompressed"
        );
        Ok(stats)
    }

    fn check_distinct(&self, input: &Path, output: &Path) -> Result<(), CompressError> {
        let same = match (input.canonicalize(), output.canonicalize()) {
            (Ok(a), Ok(b)) => a == b,
            _ => input == output,
        };
        if same {
            return Err(CompressError::Config(format!(
                "output would overwrite input {}",
                input.display()
            )));
        }
        Ok(())
    }
}
