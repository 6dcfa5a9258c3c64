//! Per-file transform options
//!
//! The pipeline deserializes these from whatever configuration surface it
//! owns and hands them to [`crate::TransformContext::new`] per file. Option
//! discovery and merging happen outside this crate.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Options controlling resolution for a single file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Extension suffixes probed during resolution, in priority order. Each
    /// entry includes the leading dot and may be compound (".js.erb").
    pub extensions: Vec<String>,
    /// Targets resolved to a global reference instead of a file. The value
    /// is used verbatim and may be a dotted path ("window.jQuery").
    pub globals: IndexMap<String, String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            globals: IndexMap::new(),
        }
    }
}

/// The extension list probed when none is configured.
pub fn default_extensions() -> Vec<String> {
    [".js", ".json", ".coffee", ".js.erb", ".coffee.erb"]
        .iter()
        .map(|ext| (*ext).to_string())
        .collect()
}
