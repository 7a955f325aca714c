//! Error types for huff-compress

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompressError {
    #[error("could not open file: {}", path.display())]
    FileNotOpenable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("file is not UTF-8 encoded: {}", .0.display())]
    NotValidInputEncoding(PathBuf),

    #[error("invalid signature, not a compressed file: {}", .0.display())]
    InvalidContainerSignature(PathBuf),

    #[error("file is empty: {}", .0.display())]
    EmptyInput(PathBuf),

    #[error("truncated header: expected {expected} bits, {available} available")]
    TruncatedHeader { expected: u64, available: u64 },

    #[error("malformed header: {0}")]
    MalformedHeader(String),

    #[error("priority queue is empty")]
    QueueUnderflow,

    #[error("input ends inside a symbol at byte {offset}: expected {expected} bytes, found {found}")]
    TruncatedSymbol {
        offset: u64,
        expected: usize,
        found: usize,
    },

    #[error("serialized trie is {0} bytes, exceeding the 24-bit length field")]
    HeaderTooLarge(usize),

    #[error("code of {0} bits exceeds the supported code length")]
    CodeTooLong(usize),

    #[error("symbol {0} has no code; input changed between passes")]
    SymbolNotInTable(String),

    #[error("corrupt code stream: {0}")]
    CorruptStream(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl CompressError {
    pub(crate) fn not_openable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileNotOpenable {
            path: path.into(),
            source,
        }
    }
}
