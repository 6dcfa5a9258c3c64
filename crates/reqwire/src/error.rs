//! Error types for the require-rewriting pipeline
//!
//! Every failure here is fatal for the file being processed: the caller
//! discards the partially transformed tree and decides whether to halt the
//! build or skip the file. Nothing is retried.

use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// All failure classes surfaced by the transform.
#[derive(Debug, Error)]
pub enum Error {
    /// No file matched the target under the configured extension list.
    #[error("cannot resolve '{target}' from {}", from.display())]
    Resolution { target: String, from: PathBuf },

    /// The target resolved to a real file that lives outside the source root.
    #[error("'{target}' required from {} resolved to {}, which is outside the source root {}", from.display(), path.display(), root.display())]
    OutOfRoot {
        target: String,
        from: PathBuf,
        path: PathBuf,
        root: PathBuf,
    },

    /// A legacy file declared no recognizable global.
    #[error("no global declaration found in {}", path.display())]
    MissingDeclaration { path: PathBuf },

    /// A legacy file declared more than one global, so there is no single
    /// reference to rewrite to.
    #[error("multiple global declarations found in {}: {}", path.display(), found.join(", "))]
    AmbiguousDeclaration { path: PathBuf, found: Vec<String> },

    /// The require argument statically evaluates to something other than a
    /// string. Arguments that cannot be evaluated at all are skipped, not
    /// rejected.
    #[error("invalid require call in {}: string expected", from.display())]
    InvalidRequireArgument { from: PathBuf },

    /// More than one expose directive in a single file.
    #[error("duplicate expose directive: '{first}' and '{second}'")]
    DuplicateExpose { first: String, second: String },

    /// Reading a file off disk failed.
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source could not be parsed as a script.
    #[error("failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// Code generation failed while printing the transformed tree.
    #[error("failed to emit transformed source: {0}")]
    Emit(String),

    /// The bundle post-processor was asked for a helper nobody registered.
    #[error("unknown helper '{0}'")]
    UnknownHelper(String),

    /// The input filename has no parent directory to resolve relative
    /// requires against.
    #[error("cannot determine base directory for {}", path.display())]
    InvalidFilename { path: PathBuf },
}
