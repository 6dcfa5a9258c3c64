//! Final bundle assembly
//!
//! Rewritten files are concatenated by the asset pipeline and then closed
//! over here: the bundle is wrapped in an IIFE that defines the module
//! initializer and a `global` alias, with any runtime helpers the files used
//! declared up front. Callers are expected to skip bundles in which no file
//! was actually rewritten.

use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::naming::HELPER_PREFIX;

/// Opens the bundle closure and defines the module initializer.
pub const PRELUDE: &str = "!function() {
var __reqwire_initialize_module__ = function(f) {
  var module = {exports: {}};
  f.call(module.exports, module, module.exports);
  return module.exports;
};
var global = window;
";

/// Closes the bundle closure.
pub const OUTRO: &str = "\n}();\n";

/// Runtime helper sources, keyed by helper name.
///
/// Helpers are declared in the bundle prelude under prefixed names so they
/// cannot collide with module code.
#[derive(Debug, Clone, Default)]
pub struct HelperRegistry {
    sources: IndexMap<String, String>,
}

impl HelperRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a helper source under `name`. Re-registering a name
    /// replaces the previous source.
    pub fn register(&mut self, name: impl Into<String>, source: impl Into<String>) {
        self.sources.insert(name.into(), source.into());
    }

    /// A single `var` statement declaring every used helper, in the order
    /// given, or an empty string when none were used.
    pub fn declarations(&self, used: &[String]) -> Result<String> {
        if used.is_empty() {
            return Ok(String::new());
        }
        let mut declarators = Vec::with_capacity(used.len());
        for name in used {
            let source = self
                .sources
                .get(name)
                .ok_or_else(|| Error::UnknownHelper(name.clone()))?;
            declarators.push(format!("{HELPER_PREFIX}{name} = {source}"));
        }
        Ok(format!("var {};", declarators.join(", ")))
    }
}

/// Wrap concatenated, rewritten output into the final bundle.
///
/// `helpers` is the declaration block from [`HelperRegistry::declarations`],
/// which may be empty.
pub fn wrap_bundle(data: &str, helpers: &str) -> String {
    format!("{PRELUDE}{helpers}\n{data}{OUTRO}")
}
