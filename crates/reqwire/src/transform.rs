//! Per-file transform pipeline
//!
//! Wraps the script in its module closure first, then runs the swc resolver
//! so bindings carry syntax contexts, scans for mutations, rewrites require
//! calls and finally renames every reference to a dropped binding, moving
//! any colliding binding aside first. Each file gets a fresh `Globals` so
//! syntax contexts never leak between files.

use std::path::Path;

use swc_core::{
    common::{GLOBALS, Globals, Mark},
    ecma::{ast::Script, transforms::base::resolver, visit::VisitMutWith},
};

use crate::{
    codegen,
    config::Options,
    context::TransformContext,
    error::Result,
    naming, parse,
    types::{FileMetadata, ProcessOutput},
    visitors::{CallRewriter, MutationReport, Renamer, uniquify_collisions},
    wrapper,
};

/// Rewrite one parsed script in place and report what it required.
pub fn rewrite_script(ctx: &TransformContext, script: &mut Script) -> Result<FileMetadata> {
    let mut metadata = FileMetadata::default();
    wrapper::wrap_script(ctx, script, &mut metadata)?;

    GLOBALS.set(&Globals::new(), || {
        let unresolved_mark = Mark::new();
        let top_level_mark = Mark::new();
        script.visit_mut_with(&mut resolver(unresolved_mark, top_level_mark, false));

        let mutations = MutationReport::collect(script);
        let mut rewriter = CallRewriter::new(ctx, &mut metadata, &mutations);
        script.visit_mut_with(&mut rewriter);
        let mut renames = rewriter.finish()?;

        if !renames.is_empty() {
            let own = naming::module_identifier(&ctx.source_root, &ctx.filename);
            uniquify_collisions(script, &own, &mut renames);
            script.visit_mut_with(&mut Renamer::new(renames));
        }
        Ok(())
    })?;

    Ok(metadata)
}

/// Parse, rewrite and reprint one file's source.
///
/// `filename` is where the source lives on disk and anchors relative
/// requires; `source_root` anchors bare requires and module naming.
pub fn process_source(
    source: &str,
    filename: impl AsRef<Path>,
    source_root: impl AsRef<Path>,
    options: Options,
) -> Result<ProcessOutput> {
    let ctx = TransformContext::new(filename.as_ref(), source_root.as_ref(), options)?;
    let (mut script, cm) = parse::parse_script(&ctx.filename, source)?;
    let metadata = rewrite_script(&ctx, &mut script)?;
    let code = codegen::emit_script(&script, &cm)?;
    Ok(ProcessOutput { code, metadata })
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use anyhow::Result;
    use tempfile::TempDir;

    use super::process_source;
    use crate::config::Options;

    fn create_test_file(dir: &Path, name: &str, content: &str) -> Result<std::path::PathBuf> {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)?;
        Ok(path)
    }

    #[test]
    fn test_wrapped_output_renames_binding() -> Result<()> {
        let dir = TempDir::new()?;
        create_test_file(dir.path(), "cart.js", "module.exports = {};\n")?;
        let main = create_test_file(dir.path(), "main.js", "")?;

        let source = "var cart = require('./cart');\ncart.add(1);\n";
        let output = process_source(source, &main, dir.path(), Options::default())?;

        assert!(
            output
                .code
                .contains("var __reqwire_module__main_js = __reqwire_initialize_module__(function")
        );
        assert!(output.code.contains("(module, exports)"));
        assert!(output.code.contains("__reqwire_module__cart_js.add(1)"));
        assert!(!output.code.contains("require("));
        assert!(output.metadata.rewired);
        assert_eq!(output.metadata.required.len(), 1);
        Ok(())
    }

    #[test]
    fn test_reference_before_declaration_renamed() -> Result<()> {
        let dir = TempDir::new()?;
        create_test_file(dir.path(), "cart.js", "module.exports = {};\n")?;
        let main = create_test_file(dir.path(), "main.js", "")?;

        let source = "function f() {\n  return cart.total();\n}\nvar cart = require('./cart');\n";
        let output = process_source(source, &main, dir.path(), Options::default())?;

        assert!(output.code.contains("__reqwire_module__cart_js.total()"));
        assert!(!output.code.contains("var cart"));
        Ok(())
    }

    #[test]
    fn test_globals_override_used_verbatim() -> Result<()> {
        let dir = TempDir::new()?;
        let main = create_test_file(dir.path(), "main.js", "")?;

        let mut globals = indexmap::IndexMap::new();
        globals.insert("jquery".to_string(), "window.$".to_string());
        let options = Options {
            globals,
            ..Options::default()
        };
        let output = process_source("var $ = require('jquery');\n$(go);\n", &main, dir.path(), options)?;

        assert!(output.code.contains("window.$(go)"));
        assert!(output.metadata.required.is_empty());
        Ok(())
    }

    #[test]
    fn test_metadata_records_each_require_in_order() -> Result<()> {
        let dir = TempDir::new()?;
        create_test_file(dir.path(), "a.js", "1;\n")?;
        create_test_file(dir.path(), "b.js", "1;\n")?;
        let main = create_test_file(dir.path(), "main.js", "")?;

        let source = "require('./b');\nrequire('./a');\nrequire('./b');\n";
        let output = process_source(source, &main, dir.path(), Options::default())?;

        let root = dir.path().canonicalize()?;
        assert_eq!(
            output.metadata.required,
            vec![root.join("b.js"), root.join("a.js"), root.join("b.js")]
        );
        Ok(())
    }

    #[test]
    fn test_resolution_failure_surfaces_error() -> Result<()> {
        let dir = TempDir::new()?;
        let main = create_test_file(dir.path(), "main.js", "")?;

        let err = process_source("require('./missing');\n", &main, dir.path(), Options::default())
            .unwrap_err();
        assert!(matches!(err, crate::error::Error::Resolution { .. }));
        Ok(())
    }
}
