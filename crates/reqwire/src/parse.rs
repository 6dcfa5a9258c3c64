//! Script parsing
//!
//! Files fed through the preprocessor are CommonJS scripts, so parsing is
//! script-only and ES module syntax fails with a parse error.

use std::path::Path;

use swc_core::{
    common::{FileName, SourceMap, sync::Lrc},
    ecma::{
        ast::{EsVersion, Script},
        parser::{EsSyntax, Parser, StringInput, Syntax, lexer::Lexer},
    },
};

use crate::error::{Error, Result};

/// Parse source text into a script, keeping the source map for later
/// emission.
pub(crate) fn parse_script(path: &Path, source: &str) -> Result<(Script, Lrc<SourceMap>)> {
    let cm: Lrc<SourceMap> = Lrc::default();
    let fm = cm.new_source_file(
        FileName::Real(path.to_path_buf()).into(),
        source.to_string(),
    );

    let lexer = Lexer::new(
        Syntax::Es(EsSyntax::default()),
        EsVersion::Es2022,
        StringInput::from(&*fm),
        None,
    );
    let mut parser = Parser::new_from(lexer);

    let script = parser.parse_script().map_err(|e| Error::Parse {
        path: path.to_path_buf(),
        message: e.kind().msg().to_string(),
    })?;

    // Recoverable parse errors are still fatal for the file.
    if let Some(e) = parser.take_errors().into_iter().next() {
        return Err(Error::Parse {
            path: path.to_path_buf(),
            message: e.kind().msg().to_string(),
        });
    }

    Ok((script, cm))
}
