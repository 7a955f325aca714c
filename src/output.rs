//! Output file naming and cleanup of partially written outputs.

use crate::error::CompressError;
use std::fs::File;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// `dir/name.ext` becomes `dir/name.ext<suffix>`.
pub fn compressed_path(input: &Path, suffix: &str) -> PathBuf {
    let mut name = input.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(suffix);
    input.with_file_name(name)
}

/// `dir/name.ext<suffix>` becomes `dir/name<tag>.ext`. The suffix is only
/// stripped when present.
pub fn decompressed_path(input: &Path, suffix: &str, tag: &str) -> PathBuf {
    let file_name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let original = file_name
        .strip_suffix(suffix)
        .filter(|s| !s.is_empty())
        .unwrap_or(&file_name);

    let original = Path::new(original);
    let stem = original
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match original.extension() {
        Some(ext) => format!("{}{}.{}", stem, tag, ext.to_string_lossy()),
        None => format!("{}{}", stem, tag),
    };
    input.with_file_name(name)
}

/// An output written to a hidden sibling file and renamed over `path` by
/// [`PartialOutput::commit`]. A file already at `path` is untouched until
/// then. Dropped without a commit, the staged file is discarded, or renamed
/// into place when `remove_on_drop` is off.
pub struct PartialOutput {
    path: PathBuf,
    staged: Option<NamedTempFile>,
    remove_on_drop: bool,
}

impl PartialOutput {
    /// Stage a new output for `path` in the same directory.
    pub fn create(path: &Path, remove_on_drop: bool) -> Result<Self, CompressError> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let staged = tempfile::Builder::new()
            .prefix(".huff-")
            .suffix(".partial")
            .tempfile_in(dir)
            .map_err(|e| CompressError::not_openable(path, e))?;
        Ok(Self {
            path: path.to_path_buf(),
            staged: Some(staged),
            remove_on_drop,
        })
    }

    pub fn file(&mut self) -> &mut File {
        self.staged
            .as_mut()
            .map(NamedTempFile::as_file_mut)
            .unwrap_or_else(|| unreachable!("staged file is only taken on commit or drop"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sync the staged file and move it to its final path.
    pub fn commit(mut self) -> Result<PathBuf, CompressError> {
        if let Some(staged) = self.staged.take() {
            staged.as_file().sync_all()?;
            staged.persist(&self.path).map_err(|e| e.error)?;
        }
        Ok(std::mem::take(&mut self.path))
    }
}

impl Drop for PartialOutput {
    fn drop(&mut self) {
        let Some(staged) = self.staged.take() else {
            return;
        };
        if self.remove_on_drop {
            match staged.close() {
                Ok(()) => tracing::warn!(path = %self.path.display(), "discarded partial output"),
                Err(e) => tracing::warn!(path = %self.path.display(), error = %e, "could not remove partial output"),
            }
        } else {
            match staged.persist(&self.path) {
                Ok(_) => tracing::warn!(path = %self.path.display(), "kept partial output"),
                Err(e) => tracing::warn!(path = %self.path.display(), error = %e.error, "could not keep partial output"),
            }
        }
    }
}
