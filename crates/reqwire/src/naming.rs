//! Deterministic identifier derivation for module files
//!
//! Every file under the source root maps to exactly one JavaScript variable
//! name. The derivation is a pure function of the root-relative path, so any
//! file requiring the same target arrives at the same name without any
//! shared registry between compilations.

use std::path::Path;

/// Prefix for every derived module variable.
pub const MODULE_PREFIX: &str = "__reqwire_module__";

/// Runtime function each wrapped file calls to register itself. Defined by
/// the bundle prelude.
pub const INIT_HELPER: &str = "__reqwire_initialize_module__";

/// Prefix for shared helper variables emitted by the bundle post-processor.
pub const HELPER_PREFIX: &str = "__reqwire_helper__";

/// Derive the module identifier for an absolute file path.
///
/// The root prefix is stripped, path separators become `$`, and every other
/// character outside `[A-Za-z0-9_]` becomes `_`. The two fillers differ so
/// that distinct directory layouts cannot collapse into the same name
/// (`a/c.js` and `a_c.js` stay distinct). Paths outside the root keep the
/// full path in the derivation; resolution rejects those separately.
pub fn module_identifier(source_root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(source_root).unwrap_or(path);
    let relative = relative.to_string_lossy();

    let mut identifier = String::with_capacity(MODULE_PREFIX.len() + relative.len());
    identifier.push_str(MODULE_PREFIX);
    for ch in relative.chars() {
        if ch == '/' || ch == '\\' {
            identifier.push('$');
        } else if ch.is_ascii_alphanumeric() || ch == '_' {
            identifier.push(ch);
        } else {
            identifier.push('_');
        }
    }
    identifier
}
