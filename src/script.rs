//! Evaluation of JS module documents with the embedded Boa engine.
//!
//! Documents are ES modules (`export default { ... }`) or CommonJS
//! (`module.exports = { ... }`). The source is parsed and evaluated as a
//! module; `module` and `exports` are provided as globals so CommonJS documents
//! evaluate too. The exported value is pulled out through `JSON.stringify`.
//! Nothing here touches the filesystem, and `import` statements fail.

use boa_engine::builtins::promise::PromiseState;
use boa_engine::{js_string, Context, JsError, JsString, Module, Source};

use crate::document::ScriptLimits;
use crate::{Error, Result};

const DEFAULT_SLOT: &str = "__storepix_default";

// Evaluated as a separate script so module error positions match the document.
const PRELUDE: &str = "var module = { exports: {} }; var exports = module.exports;";

const EPILOGUE: &str = r#"
(function () {
  if (typeof globalThis.__storepix_default !== 'undefined') {
    return JSON.stringify(globalThis.__storepix_default);
  }
  if (Object.keys(module.exports).length > 0 || module.exports !== exports) {
    return JSON.stringify(module.exports);
  }
  return undefined;
})()
"#;

/// Evaluate a module document and return its exported value
pub fn evaluate_module(source: &str, origin: &str, limits: ScriptLimits) -> Result<serde_json::Value> {
    let parse_error = |message: String| Error::ParseError {
        origin: origin.to_string(),
        message,
    };
    let thrown = |e: JsError| parse_error(format!("Script thrown: {}", e));

    let mut ctx = Context::default();
    if limits.loop_iteration_limit > 0 {
        ctx.runtime_limits_mut()
            .set_loop_iteration_limit(limits.loop_iteration_limit);
    }
    if limits.recursion_limit < usize::MAX {
        ctx.runtime_limits_mut()
            .set_recursion_limit(limits.recursion_limit);
    }

    log::debug!("evaluating {} ({} bytes)", origin, source.len());
    ctx.eval(Source::from_bytes(PRELUDE.as_bytes())).map_err(thrown)?;

    let module = Module::parse(Source::from_bytes(source.as_bytes()), None, &mut ctx).map_err(thrown)?;
    let promise = module.load_link_evaluate(&mut ctx);
    ctx.run_jobs();
    match promise.state() {
        PromiseState::Fulfilled(_) => {}
        PromiseState::Rejected(err) => return Err(thrown(JsError::from_opaque(err))),
        PromiseState::Pending => {
            return Err(parse_error("module evaluation did not complete".to_string()));
        }
    }

    let default = module
        .namespace(&mut ctx)
        .get(js_string!("default"), &mut ctx)
        .map_err(thrown)?;
    ctx.global_object()
        .set(JsString::from(DEFAULT_SLOT), default, false, &mut ctx)
        .map_err(thrown)?;

    let value = ctx.eval(Source::from_bytes(EPILOGUE.as_bytes())).map_err(thrown)?;
    if value.is_undefined() {
        return Err(parse_error(
            "document has no `export default` or `module.exports` value".to_string(),
        ));
    }

    let json = value
        .to_string(&mut ctx)
        .map_err(|e| parse_error(format!("export is not serializable: {}", e)))?
        .to_std_string_escaped();

    serde_json::from_str(&json).map_err(|e| parse_error(format!("export is not serializable: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commented_out_export_is_ignored() {
        let src = "// export default { template: 'wrong' }\n/*\nexport default {}\n*/\nexport default { template: 'right' };\n";
        let v = evaluate_module(src, "t.js", ScriptLimits::default()).unwrap();
        assert_eq!(v["template"], "right");
    }

    #[test]
    fn export_after_comment_on_same_line() {
        let src = "/* storepix */ export default { template: 'default' };";
        let v = evaluate_module(src, "t.js", ScriptLimits::default()).unwrap();
        assert_eq!(v["template"], "default");
    }

    #[test]
    fn named_exports_before_default() {
        let src = "export const brand = '#014226';\nexport function size() { return 8; }\nexport default { theme: { primary: brand, size: size() } };";
        let v = evaluate_module(src, "t.mjs", ScriptLimits::default()).unwrap();
        assert_eq!(v["theme"]["primary"], "#014226");
        assert_eq!(v["theme"]["size"], 8);
        assert!(v.get("brand").is_none());
    }

    #[test]
    fn evaluates_default_export_object() {
        let src = r#"
// leading comment
export default {
  template: 'default',
  output: { dir: './output', format: 'png', },
  devices: ['iphone-6.5'],
};
"#;
        let v = evaluate_module(src, "t.js", ScriptLimits::default()).unwrap();
        assert_eq!(v["template"], "default");
        assert_eq!(v["output"]["dir"], "./output");
        assert_eq!(v["devices"][0], "iphone-6.5");
    }

    #[test]
    fn evaluates_commonjs_export() {
        let src = "module.exports = { template: 'default', screenshots: [] };";
        let v = evaluate_module(src, "t.cjs", ScriptLimits::default()).unwrap();
        assert_eq!(v["template"], "default");
    }

    #[test]
    fn computed_values_are_resolved() {
        let src = "const brand = '#014226';\nexport default { theme: { primary: brand, size: 4 * 4 } };";
        let v = evaluate_module(src, "t.js", ScriptLimits::default()).unwrap();
        assert_eq!(v["theme"]["primary"], "#014226");
        assert_eq!(v["theme"]["size"], 16);
    }

    #[test]
    fn syntax_error_is_parse_error() {
        let err = evaluate_module("export default { template: ", "bad.js", ScriptLimits::default()).unwrap_err();
        assert!(matches!(err, Error::ParseError { ref origin, .. } if origin == "bad.js"));
    }

    #[test]
    fn missing_export_is_parse_error() {
        let err = evaluate_module("const x = 1;", "none.js", ScriptLimits::default()).unwrap_err();
        assert!(err.to_string().contains("export default"));
    }

    #[test]
    fn runaway_loop_hits_limit() {
        let limits = ScriptLimits {
            loop_iteration_limit: 1000,
            ..Default::default()
        };
        let err = evaluate_module("while (true) {}\nexport default {};", "loop.js", limits).unwrap_err();
        assert!(matches!(err, Error::ParseError { .. }));
    }
}
