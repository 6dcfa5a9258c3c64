//! Transitional declaration scanner for legacy CoffeeScript files
//!
//! Legacy `.coffee` files are not parsed; they are expected to assign a
//! single namespaced global (`Shopify.Cart = ...` or `class window.Foo`)
//! which newer code reaches through `require()`. This scanner extracts that
//! one dotted path by line-level pattern matching and refuses to guess when
//! the file declares zero or several. It is a text-level shim for the
//! migration period and must not grow into a parser.

use std::{fs, path::Path, sync::LazyLock};

use log::debug;
use regex::Regex;

use crate::error::{Error, Result};

/// Global namespaces a legacy file may declare under.
const GLOBAL_ROOTS: &str = "(?:window|Shopify|Sello)";

/// Matches an assignment (`window.Foo.Bar =`) or a class declaration
/// (`class Shopify.Cart`) at the start of a line. Capture 1 holds the
/// assignment path, capture 2 the class path.
static DECLARATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    let identifier = format!(r"{GLOBAL_ROOTS}(?:\.[A-Za-z][A-Za-z0-9_]*)+");
    Regex::new(&format!(r"(?m)^(?:({identifier})\s*=|class ({identifier}))"))
        .expect("declaration pattern is valid")
});

/// Find the single global path a legacy file declares.
///
/// Zero candidates or more than one (including the same path declared
/// twice) is an error; there is no fallback heuristic. The file is read
/// lossily, so stray non-UTF-8 bytes cannot abort the scan.
pub fn find_declaration(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let contents = String::from_utf8_lossy(&bytes);

    let mut found = Vec::new();
    for captures in DECLARATION_RE.captures_iter(&contents) {
        if let Some(m) = captures.get(1).or_else(|| captures.get(2)) {
            found.push(m.as_str().to_string());
        }
    }

    debug!(
        "Legacy scan of {} found {} declaration(s)",
        path.display(),
        found.len()
    );

    match found.len() {
        0 => Err(Error::MissingDeclaration {
            path: path.to_path_buf(),
        }),
        1 => Ok(found.remove(0)),
        _ => Err(Error::AmbiguousDeclaration {
            path: path.to_path_buf(),
            found,
        }),
    }
}
