//! Shared type definitions for the reqwire crate
//!
//! Small data types passed between the resolver, the rewriting visitors and
//! the pipeline. Kept free of AST dependencies so the pipeline can consume
//! them without pulling in the parser stack.

use std::path::PathBuf;

/// What a require target resolved to.
///
/// A plain identifier comes from the deterministic path derivation or from a
/// single-word global override. A member path comes from a dotted override or
/// from a legacy declaration scan and is rebuilt as a real member-expression
/// chain when substituted into the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// A single identifier, e.g. `__reqwire_module__a$c_js` or `$`.
    Identifier(String),
    /// A dotted reference split into segments, e.g. `["window", "jQuery"]`.
    Member(Vec<String>),
}

impl Resolved {
    /// Classify a textual reference: anything containing a dot becomes a
    /// member path, everything else a plain identifier.
    pub fn from_reference(reference: &str) -> Self {
        if reference.contains('.') {
            Self::Member(reference.split('.').map(str::to_string).collect())
        } else {
            Self::Identifier(reference.to_string())
        }
    }
}

impl std::fmt::Display for Resolved {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Identifier(name) => f.write_str(name),
            Self::Member(segments) => f.write_str(&segments.join(".")),
        }
    }
}

/// Per-file facts the pipeline consumes after a transform.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileMetadata {
    /// Absolute paths of every filesystem-resolved require target, in
    /// traversal order. Duplicates are kept; dedup policy belongs to the
    /// pipeline.
    pub required: Vec<PathBuf>,
    /// Set once the file body has been wrapped. The bundle post-processor
    /// only runs over output that carries this flag.
    pub rewired: bool,
}

/// Result of running the whole per-file pipeline over raw source.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    /// The transformed file, printed back to JavaScript.
    pub code: String,
    /// Metadata accumulated while rewriting.
    pub metadata: FileMetadata,
}
