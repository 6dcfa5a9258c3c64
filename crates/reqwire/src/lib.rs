//! Compile-time `require()` rewriting for asset-pipeline JavaScript builds.
//!
//! Sprockets-style pipelines concatenate files instead of linking them, so
//! CommonJS modules cannot rely on a runtime loader. reqwire closes that gap
//! at build time: each file is wrapped in a module closure, every statically
//! resolvable `require(...)` call is replaced with a direct reference to the
//! required module's binding, and the concatenated result is closed over by
//! [`bundle::wrap_bundle`].
//!
//! [`process_source`] is the entry point for a single file. Alongside the
//! rewritten code it reports which files were required, so the caller can
//! schedule those into the same bundle, and whether the file was rewritten
//! at all, so untouched bundles can skip the closing wrapper.

pub mod bundle;
pub mod config;
pub mod context;
pub mod error;
pub mod legacy;
pub mod naming;
pub mod resolver;
pub mod transform;
pub mod types;

mod ast_builder;
mod codegen;
mod parse;
mod static_eval;
mod visitors;
mod wrapper;

pub use config::Options;
pub use context::TransformContext;
pub use error::{Error, Result};
pub use transform::{process_source, rewrite_script};
pub use types::{FileMetadata, ProcessOutput, Resolved};
