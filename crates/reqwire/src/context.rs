//! Per-file transform context
//!
//! One context is built for every file fed through the transform and never
//! shared or cached across files. All resolution state the visitors need is
//! threaded through here explicitly.

use std::path::{Path, PathBuf};

use log::warn;

use crate::{
    config::Options,
    error::{Error, Result},
};

/// Immutable per-file state: the file being rewritten, where relative
/// requires resolve from, and the root every resolved file must stay under.
#[derive(Debug, Clone)]
pub struct TransformContext {
    /// Absolute path of the file being transformed, canonicalized when the
    /// file exists on disk.
    pub filename: PathBuf,
    /// Directory of `filename`; relative targets resolve against this.
    pub basedir: PathBuf,
    /// Canonicalized source root. Resolution never escapes it.
    pub source_root: PathBuf,
    /// Merged options for this file.
    pub options: Options,
}

impl TransformContext {
    /// Build the context for one file.
    ///
    /// Both the filename and the source root are canonicalized so that
    /// prefix checks and identifier derivation agree with the canonical
    /// paths the resolver produces. Canonicalization failures (for example
    /// in-memory sources that never touched disk) fall back to the path as
    /// given.
    pub fn new(
        filename: impl Into<PathBuf>,
        source_root: impl Into<PathBuf>,
        options: Options,
    ) -> Result<Self> {
        let filename = canonicalize_lenient(filename.into());
        let source_root = canonicalize_lenient(source_root.into());

        let basedir = filename
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .ok_or_else(|| Error::InvalidFilename {
                path: filename.clone(),
            })?;

        Ok(Self {
            filename,
            basedir,
            source_root,
            options,
        })
    }
}

/// Canonicalize a path, handling errors gracefully.
pub(crate) fn canonicalize_lenient(path: PathBuf) -> PathBuf {
    match path.canonicalize() {
        Ok(canonical) => canonical,
        Err(e) => {
            warn!("Failed to canonicalize path {}: {}", path.display(), e);
            path
        }
    }
}
