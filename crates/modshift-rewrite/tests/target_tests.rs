//! AMD and YUI output tests

use modshift_rewrite::{
    FormatOptions, IndentStyle, ModuleTarget, QuoteStyle, Rewriter, TargetKind, TranspileOptions,
    YuiTarget, transpile,
};

const EVEN: &str = "import odd from './odd';\n\nexport default function even(n) {\n  return n === 0 || odd(n - 1);\n}\n";

#[test]
fn test_amd_wraps_cjs_output() {
    let options = TranspileOptions::new("app/even").with_dir_path("app");
    let code = transpile(EVEN, "amd-cjs", options.clone()).unwrap().code;
    let cjs = transpile(EVEN, "cjs", options).unwrap().code;

    assert!(code.starts_with("define(function (require, exports, module) {\n"));
    assert!(code.ends_with("});\n"));
    assert!(code.contains(&cjs));
}

#[test]
fn test_amd_uses_module_name_as_id() {
    let options = TranspileOptions::new("app/even")
        .with_dir_path("app")
        .with_module_name("even");
    let code = transpile(EVEN, "amdWrappedCjs", options).unwrap().code;

    assert!(code.starts_with("define(\"even\", function (require, exports, module) {\n"));
}

#[test]
fn test_yui_module_shape() {
    let source = "import odd from './odd';\nimport Ember from 'ember';\nexport default function even(n) {\n  return n === 0 || odd(n - 1);\n}\n";
    let options = TranspileOptions::new("app/even").with_dir_path("app");
    let code = transpile(source, "yui", options).unwrap().code;

    assert!(code.starts_with(
        "YUI.add(\"app/even\", function (Y, NAME, __imports__, __exports__) {\nvar __es6_module__ = __exports__;\n"
    ));
    assert!(code.contains("var __imports_0__ = __imports__[\"app/odd\"];"));
    assert!(code.contains("var __imports_1__ = __imports__[\"ember\"];"));
    assert!(code.contains("return __es6_module__;\n}, \"@VERSION@\", { \"es\": true, \"requires\": [\"app/odd\", \"ember\"] });\n"));
    assert!(!code.contains("require("));
}

#[test]
fn test_yui_target_through_rewriter() {
    let target = YuiTarget;
    let output = Rewriter::new("export var answer = 42;\n", TranspileOptions::new("answer"))
        .unwrap()
        .rewrite(&target)
        .unwrap();

    assert_eq!(target.name(), "yui");
    assert!(output.code.contains("\"answer\": { enumerable: true, get: function () { return answer; } }"));
    assert!(output.code.contains("\"requires\": []"));
}

#[test]
fn test_format_options_apply_to_generated_code() {
    let format = FormatOptions {
        quote_style: QuoteStyle::Single,
        indent: IndentStyle::Spaces(4),
        ..Default::default()
    };
    let options = TranspileOptions::new("app/even")
        .with_dir_path("app")
        .with_format(format);
    let code = transpile(EVEN, TargetKind::Cjs.as_str(), options).unwrap().code;

    assert!(code.contains("var __imports_0__ = __es6_module_registry__['app/odd'] || require('./odd');"));
    assert!(code.contains("\n    globalThis.__es6_module_registry__ = {};\n"));
    assert!(code.contains("(__imports_0__['default'] || __imports_0__)(n - 1)"));
}

#[test]
fn test_amd_define_shape() {
    let source = "import odd from './odd';\nimport Ember from 'ember';\nexport default function even(n) {\n  return n === 0 || odd(n - 1);\n}\nexport * from './util';\n";
    let options = TranspileOptions::new("app/even").with_dir_path("app");
    let code = transpile(source, "amd", options).unwrap().code;

    assert!(code.starts_with(
        "define([\"exports\", \"app/odd\", \"ember\", \"app/util\"], function (__exports__, __imports_0__, __imports_1__, __imports_2__) {\nvar __es6_module__ = __exports__;\n"
    ));
    assert!(code.contains("\"default\": { enumerable: true, get: function () { return even; } }"));
    assert!(code.contains("return n === 0 || (__imports_0__[\"default\"] || __imports_0__)(n - 1);"));
    assert!(code.contains("Object.keys(__imports_2__).forEach("));
    assert!(code.ends_with("});\n"));
    assert!(!code.contains("require("));
    assert!(!code.contains("import "));
}

#[test]
fn test_amd_define_with_module_id() {
    let options = TranspileOptions::new("answer").with_module_name("answer");
    let code = transpile("export var answer = 42;\n", "amd", options).unwrap().code;

    assert!(code.starts_with("define(\"answer\", [\"exports\"], function (__exports__) {\n"));
}

#[test]
fn test_hashbang_stays_on_first_line() {
    let source = "#!/usr/bin/env node\nimport a from 'a';\na();\n";

    for target in ["amd", "amd-cjs", "yui"] {
        let code = transpile(source, target, TranspileOptions::new("bin/cli"))
            .unwrap()
            .code;
        assert!(code.starts_with("#!/usr/bin/env node\n"), "{target}: {code}");
        assert_eq!(code.matches("#!").count(), 1, "{target}");
        let second_line = code.lines().nth(1).unwrap();
        assert!(
            second_line.starts_with("define(") || second_line.starts_with("YUI.add("),
            "{target}: {second_line}"
        );
    }

    let cjs = transpile(source, "cjs", TranspileOptions::new("bin/cli")).unwrap().code;
    assert!(cjs.starts_with("#!/usr/bin/env node\n"));
    assert_eq!(cjs.matches("#!").count(), 1);
}
