//! Code generation for transformed scripts

use swc_core::{
    common::{SourceMap, sync::Lrc},
    ecma::{
        ast::Script,
        codegen::{Config, Emitter, text_writer::JsWriter},
    },
};

use crate::error::{Error, Result};

/// Print a script back to JavaScript source.
pub(crate) fn emit_script(script: &Script, cm: &Lrc<SourceMap>) -> Result<String> {
    let mut buf = Vec::new();
    {
        let mut emitter = Emitter {
            cfg: Config::default(),
            cm: cm.clone(),
            comments: None,
            wr: JsWriter::new(cm.clone(), "\n", &mut buf, None),
        };
        emitter
            .emit_script(script)
            .map_err(|e| Error::Emit(e.to_string()))?;
    }
    String::from_utf8(buf).map_err(|e| Error::Emit(e.to_string()))
}
