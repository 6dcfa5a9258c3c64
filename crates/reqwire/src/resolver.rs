//! Require-target resolution
//!
//! Maps the raw string inside a `require()` call to either a configured
//! global reference or a file on disk. Filesystem lookup is deliberately
//! simple: relative targets resolve against the requiring file, bare
//! targets against the source root, with a Node-style extension and
//! directory-index probe. There is no package walking; everything a file
//! may require lives under the source root, and resolving outside it is an
//! error.

use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use log::debug;

use crate::{
    context::{TransformContext, canonicalize_lenient},
    error::{Error, Result},
    legacy, naming,
    types::{FileMetadata, Resolved},
};

/// Resolve one require target to the reference that replaces it.
///
/// Override hits bypass the filesystem entirely and leave no trace in the
/// metadata. Every filesystem hit is recorded in `metadata.required` before
/// the root boundary is enforced, so the pipeline learns about the
/// dependency even when the target is rejected.
pub fn resolve_target(
    ctx: &TransformContext,
    metadata: &mut FileMetadata,
    target: &str,
) -> Result<Resolved> {
    if let Some(reference) = ctx.options.globals.get(target) {
        debug!("Target '{target}' resolved by global override to '{reference}'");
        return Ok(Resolved::from_reference(reference));
    }

    let path = resolve_file(ctx, target)?;
    metadata.required.push(path.clone());

    if !path.starts_with(&ctx.source_root) {
        return Err(Error::OutOfRoot {
            target: target.to_string(),
            from: ctx.filename.clone(),
            path,
            root: ctx.source_root.clone(),
        });
    }

    // The final extension decides: a `.coffee.erb` file is not a legacy
    // CoffeeScript file.
    if path.extension().is_some_and(|ext| ext == "coffee") {
        let reference = legacy::find_declaration(&path)?;
        debug!("Legacy target '{target}' resolved to declaration '{reference}'");
        return Ok(Resolved::from_reference(&reference));
    }

    Ok(Resolved::Identifier(naming::module_identifier(
        &ctx.source_root,
        &path,
    )))
}

/// Probe the filesystem for a target and canonicalize the winner.
fn resolve_file(ctx: &TransformContext, target: &str) -> Result<PathBuf> {
    let base = if is_relative(target) {
        ctx.basedir.join(target)
    } else if Path::new(target).is_absolute() {
        PathBuf::from(target)
    } else {
        ctx.source_root.join(target)
    };

    for candidate in file_candidates(&base, &ctx.options.extensions) {
        if candidate.is_file() {
            debug!("Resolved '{}' to {}", target, candidate.display());
            return Ok(canonicalize_lenient(candidate));
        }
    }

    Err(Error::Resolution {
        target: target.to_string(),
        from: ctx.filename.clone(),
    })
}

/// Bare `.` and `..` count as relative, the same as their slashed forms.
fn is_relative(target: &str) -> bool {
    target == "."
        || target == ".."
        || target.starts_with("./")
        || target.starts_with("../")
}

/// Candidate order: the exact path, the path with each extension suffix
/// appended, then `index` files inside it when the path is a directory.
fn file_candidates(base: &Path, extensions: &[String]) -> Vec<PathBuf> {
    let mut candidates = Vec::with_capacity(2 * extensions.len() + 1);
    candidates.push(base.to_path_buf());
    for ext in extensions {
        candidates.push(append_suffix(base, ext));
    }
    if base.is_dir() {
        for ext in extensions {
            candidates.push(base.join(format!("index{ext}")));
        }
    }
    candidates
}

/// Append an extension suffix without interpreting existing dots, so
/// compound suffixes like ".js.erb" survive.
fn append_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut os: OsString = path.as_os_str().to_os_string();
    os.push(suffix);
    PathBuf::from(os)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use anyhow::Result;
    use indexmap::IndexMap;
    use tempfile::TempDir;

    use super::*;
    use crate::config::Options;

    fn create_test_file(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }

    fn context_for(root: &Path, file: &Path, options: Options) -> TransformContext {
        TransformContext::new(file, root, options).expect("context should build")
    }

    #[test]
    fn test_global_override_bypasses_filesystem() -> Result<()> {
        let dir = TempDir::new()?;
        let root = dir.path().join("src");
        create_test_file(&root.join("main.js"), "1;")?;

        let mut globals = IndexMap::new();
        globals.insert("jquery".to_string(), "$".to_string());
        let ctx = context_for(
            &root,
            &root.join("main.js"),
            Options {
                globals,
                ..Options::default()
            },
        );

        let mut metadata = FileMetadata::default();
        let resolved = resolve_target(&ctx, &mut metadata, "jquery")?;
        assert_eq!(resolved, Resolved::Identifier("$".to_string()));
        assert!(metadata.required.is_empty());
        Ok(())
    }

    #[test]
    fn test_dotted_override_becomes_member_path() -> Result<()> {
        let dir = TempDir::new()?;
        let root = dir.path().join("src");
        create_test_file(&root.join("main.js"), "1;")?;

        let mut globals = IndexMap::new();
        globals.insert("jquery".to_string(), "window.jQuery".to_string());
        let ctx = context_for(
            &root,
            &root.join("main.js"),
            Options {
                globals,
                ..Options::default()
            },
        );

        let mut metadata = FileMetadata::default();
        assert_eq!(
            resolve_target(&ctx, &mut metadata, "jquery")?,
            Resolved::Member(vec!["window".to_string(), "jQuery".to_string()])
        );
        Ok(())
    }

    #[test]
    fn test_relative_target_with_extension_probe() -> Result<()> {
        let dir = TempDir::new()?;
        let root = dir.path().join("src");
        create_test_file(&root.join("a/main.js"), "1;")?;
        create_test_file(&root.join("a/c.js"), "1;")?;

        let ctx = context_for(&root, &root.join("a/main.js"), Options::default());
        let mut metadata = FileMetadata::default();
        let resolved = resolve_target(&ctx, &mut metadata, "./c")?;
        assert_eq!(
            resolved,
            Resolved::Identifier("__reqwire_module__a$c_js".to_string())
        );
        assert_eq!(metadata.required, vec![root.join("a/c.js").canonicalize()?]);
        Ok(())
    }

    #[test]
    fn test_dot_targets_resolve_relative_to_the_requiring_file() -> Result<()> {
        let dir = TempDir::new()?;
        let root = dir.path().join("src");
        create_test_file(&root.join("nested/main.js"), "1;")?;
        create_test_file(&root.join("nested/index.js"), "1;")?;
        create_test_file(&root.join("index.js"), "1;")?;

        let ctx = context_for(&root, &root.join("nested/main.js"), Options::default());
        let mut metadata = FileMetadata::default();
        assert_eq!(
            resolve_target(&ctx, &mut metadata, ".")?,
            Resolved::Identifier("__reqwire_module__nested$index_js".to_string())
        );
        assert_eq!(
            resolve_target(&ctx, &mut metadata, "..")?,
            Resolved::Identifier("__reqwire_module__index_js".to_string())
        );
        Ok(())
    }

    #[test]
    fn test_exact_path_wins_over_extensions() -> Result<()> {
        let dir = TempDir::new()?;
        let root = dir.path().join("src");
        create_test_file(&root.join("main.js"), "1;")?;
        create_test_file(&root.join("data"), "exact")?;
        create_test_file(&root.join("data.js"), "1;")?;

        let ctx = context_for(&root, &root.join("main.js"), Options::default());
        let mut metadata = FileMetadata::default();
        let resolved = resolve_target(&ctx, &mut metadata, "./data")?;
        assert_eq!(
            resolved,
            Resolved::Identifier("__reqwire_module__data".to_string())
        );
        Ok(())
    }

    #[test]
    fn test_extension_priority_follows_configuration() -> Result<()> {
        let dir = TempDir::new()?;
        let root = dir.path().join("src");
        create_test_file(&root.join("main.js"), "1;")?;
        create_test_file(&root.join("dual.js"), "1;")?;
        create_test_file(&root.join("dual.json"), "{}")?;

        let ctx = context_for(&root, &root.join("main.js"), Options::default());
        let mut metadata = FileMetadata::default();
        assert_eq!(
            resolve_target(&ctx, &mut metadata, "./dual")?,
            Resolved::Identifier("__reqwire_module__dual_js".to_string())
        );
        Ok(())
    }

    #[test]
    fn test_directory_resolves_to_index() -> Result<()> {
        let dir = TempDir::new()?;
        let root = dir.path().join("src");
        create_test_file(&root.join("main.js"), "1;")?;
        create_test_file(&root.join("lib/index.js"), "1;")?;

        let ctx = context_for(&root, &root.join("main.js"), Options::default());
        let mut metadata = FileMetadata::default();
        assert_eq!(
            resolve_target(&ctx, &mut metadata, "./lib")?,
            Resolved::Identifier("__reqwire_module__lib$index_js".to_string())
        );
        Ok(())
    }

    #[test]
    fn test_bare_target_joins_source_root() -> Result<()> {
        let dir = TempDir::new()?;
        let root = dir.path().join("src");
        create_test_file(&root.join("nested/deep/main.js"), "1;")?;
        create_test_file(&root.join("shared/util.js"), "1;")?;

        let ctx = context_for(&root, &root.join("nested/deep/main.js"), Options::default());
        let mut metadata = FileMetadata::default();
        assert_eq!(
            resolve_target(&ctx, &mut metadata, "shared/util")?,
            Resolved::Identifier("__reqwire_module__shared$util_js".to_string())
        );
        Ok(())
    }

    #[test]
    fn test_missing_target_is_resolution_error() -> Result<()> {
        let dir = TempDir::new()?;
        let root = dir.path().join("src");
        create_test_file(&root.join("main.js"), "1;")?;

        let ctx = context_for(&root, &root.join("main.js"), Options::default());
        let mut metadata = FileMetadata::default();
        let err = resolve_target(&ctx, &mut metadata, "./missing").expect_err("no file");
        assert!(matches!(err, Error::Resolution { .. }));
        assert!(metadata.required.is_empty());
        Ok(())
    }

    #[test]
    fn test_escaping_the_root_is_rejected_but_recorded() -> Result<()> {
        let dir = TempDir::new()?;
        let root = dir.path().join("src");
        create_test_file(&root.join("main.js"), "1;")?;
        create_test_file(&dir.path().join("outside.js"), "1;")?;

        let ctx = context_for(&root, &root.join("main.js"), Options::default());
        let mut metadata = FileMetadata::default();
        let err = resolve_target(&ctx, &mut metadata, "../outside").expect_err("out of root");
        assert!(matches!(err, Error::OutOfRoot { .. }));
        // The dependency is still reported to the pipeline.
        assert_eq!(
            metadata.required,
            vec![dir.path().join("outside.js").canonicalize()?]
        );
        Ok(())
    }

    #[test]
    fn test_coffee_target_uses_declaration_scan() -> Result<()> {
        let dir = TempDir::new()?;
        let root = dir.path().join("src");
        create_test_file(&root.join("main.js"), "1;")?;
        create_test_file(&root.join("cart.coffee"), "Shopify.Cart = {}\n")?;

        let ctx = context_for(&root, &root.join("main.js"), Options::default());
        let mut metadata = FileMetadata::default();
        assert_eq!(
            resolve_target(&ctx, &mut metadata, "./cart")?,
            Resolved::Member(vec!["Shopify".to_string(), "Cart".to_string()])
        );
        assert_eq!(metadata.required.len(), 1);
        Ok(())
    }

    #[test]
    fn test_coffee_erb_is_not_scanned() -> Result<()> {
        let dir = TempDir::new()?;
        let root = dir.path().join("src");
        create_test_file(&root.join("main.js"), "1;")?;
        create_test_file(&root.join("template.coffee.erb"), "window.T = <%= 1 %>\n")?;

        let ctx = context_for(&root, &root.join("main.js"), Options::default());
        let mut metadata = FileMetadata::default();
        assert_eq!(
            resolve_target(&ctx, &mut metadata, "./template")?,
            Resolved::Identifier("__reqwire_module__template_coffee_erb".to_string())
        );
        Ok(())
    }

    #[test]
    fn test_required_paths_keep_duplicates_in_order() -> Result<()> {
        let dir = TempDir::new()?;
        let root = dir.path().join("src");
        create_test_file(&root.join("main.js"), "1;")?;
        create_test_file(&root.join("a.js"), "1;")?;
        create_test_file(&root.join("b.js"), "1;")?;

        let ctx = context_for(&root, &root.join("main.js"), Options::default());
        let mut metadata = FileMetadata::default();
        resolve_target(&ctx, &mut metadata, "./a")?;
        resolve_target(&ctx, &mut metadata, "./b")?;
        resolve_target(&ctx, &mut metadata, "./a")?;

        let a = root.join("a.js").canonicalize()?;
        let b = root.join("b.js").canonicalize()?;
        assert_eq!(metadata.required, vec![a.clone(), b, a]);
        Ok(())
    }
}
