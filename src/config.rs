//! Configuration for huff-compress

use crate::error::CompressError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Read buffer size used by the symbol reader and the bit streams.
pub const DEFAULT_BUFFER_SIZE: usize = 16 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    pub buffer_size: usize,
    /// Reject inputs that are not valid UTF-8 before encoding.
    pub verify_utf8: bool,
    /// Discard staged output on failure; when false it is moved into place.
    pub remove_partial_output: bool,
    /// Appended to the input file name when compressing.
    pub output_suffix: String,
    /// Inserted between stem and extension when decompressing.
    pub decompressed_tag: String,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            verify_utf8: true,
            remove_partial_output: true,
            output_suffix: ".bin".to_string(),
            decompressed_tag: "-decompressed".to_string(),
        }
    }
}

impl CodecConfig {
    /// Load a configuration from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CompressError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| CompressError::not_openable(path, e))?;
        let config: CodecConfig = serde_json::from_str(&raw)
            .map_err(|e| CompressError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CompressError> {
        if self.buffer_size == 0 {
            return Err(CompressError::Config("buffer_size must be non-zero".into()));
        }
        if self.output_suffix.is_empty() {
            return Err(CompressError::Config("output_suffix must not be empty".into()));
        }
        Ok(())
    }
}
