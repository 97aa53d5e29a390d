//! CommonJS output tests

use oxc_allocator::Allocator;
use oxc_ast::ast::{BindingPatternKind, Statement};
use oxc_parser::{ParseOptions, Parser};
use oxc_span::{GetSpan, SourceType};

use modshift_rewrite::{TranspileError, TranspileOptions, transpile};

const SCOPE_CHECK: &str = r#"// Imports are correctly rewritten based on scope

import odd from './b';

export default function even(n) {
  // below should be rewritten...
  return n === 0 || odd(n - 1);
}

// below should not
function foo(odd) {
  odd = 1;
}

// nor should this
function bar() {
  var odd;
  console.log(odd);
}

// nor should this
var baz = { odd: 1 };

// nor should this
var qux;
qux.odd = 'very';

// but this should!
console.log(odd);
"#;

fn cjs(source: &str, registry_name: &str) -> String {
    let options = TranspileOptions::new(registry_name).with_dir_path("app");
    transpile(source, "cjs", options).unwrap().code
}

#[test]
fn test_scope_check_rewrites_only_module_references() {
    let code = cjs(SCOPE_CHECK, "scope_check");

    assert!(code.starts_with(
        "// Imports are correctly rewritten based on scope\n\nif (typeof __es6_module_registry__ === \"undefined\") {"
    ));
    assert!(code.contains(
        "var __imports_0__ = __es6_module_registry__[\"app/b\"] || require(\"./b\");"
    ));
    assert!(code.contains(
        "return n === 0 || (__imports_0__[\"default\"] || __imports_0__)(n - 1);"
    ));

    // parameter, local, object key and property assignment stay untouched
    assert!(code.contains("function foo(odd) {\n  odd = 1;\n}"));
    assert!(code.contains("  var odd;\n  console.log(odd);"));
    assert!(code.contains("var baz = { odd: 1 };"));
    assert!(code.contains("qux.odd = 'very';"));

    assert!(code.contains("console.log((__imports_0__[\"default\"] || __imports_0__));"));
    assert!(!code.contains("import "));
}

#[test]
fn test_named_default_function_keeps_declaration() {
    let code = cjs(SCOPE_CHECK, "scope_check");

    assert!(code.contains("\nfunction even(n) {"));
    assert!(!code.contains("export default"));
    assert!(code.contains(
        "\"default\": { enumerable: true, get: function () { return even; } }"
    ));
}

#[test]
fn test_registry_prologue() {
    let code = cjs("export function jQuery() { }\n", "export_function");

    let expected_prologue = r#"if (typeof __es6_module_registry__ === "undefined") {
  globalThis.__es6_module_registry__ = {};
}

if (__es6_module_registry__["export_function"]) {
  module.exports = __es6_module_registry__["export_function"];
  return;
}

var __es6_module__ = {
  "__es6_transpiled__": true
};

__es6_module_registry__["export_function"] = module.exports = __es6_module__;
Object.defineProperties(__es6_module__, {
  "jQuery": { enumerable: true, get: function () { return jQuery; } }
});
function jQuery() { }
"#;
    assert_eq!(code, expected_prologue);
}

#[test]
fn test_named_imports_with_aliases() {
    let source = r#"// Rewriting named imports works correctly (including aliases)

import { get, set } from 'ember';
import { defer as rsvpDefer } from 'rsvp';

// rewrite
console.log(get, set);

// don't rewrite
console.log(defer);

//rewrite
console.log(rsvpDefer);
"#;
    let code = cjs(source, "import_specifier_set");

    assert!(code.contains("var __imports_0__ = __es6_module_registry__[\"ember\"] || require(\"ember\");"));
    assert!(code.contains("var __imports_1__ = __es6_module_registry__[\"rsvp\"] || require(\"rsvp\");"));
    assert!(code.contains("console.log(__imports_0__.get, __imports_0__.set);"));
    assert!(code.contains("console.log(defer);"));
    assert!(code.contains("console.log(__imports_1__.defer);"));
}

#[test]
fn test_namespace_and_shorthand_references() {
    let source = "import * as utils from './utils';\nimport { odd } from './odd';\nvar o = { odd, utils };\nutils.run(odd);\n";
    let code = cjs(source, "ns");

    assert!(code.contains("var o = { odd: __imports_1__.odd, utils: __imports_0__ };"));
    assert!(code.contains("__imports_0__.run(__imports_1__.odd);"));
}

#[test]
fn test_repeated_source_loads_once() {
    let source = "import a from './x';\nimport { b } from './x';\nexport { c } from './x';\na(b);\n";
    let code = cjs(source, "repeat");

    assert_eq!(code.matches("require(\"./x\")").count(), 1);
    assert!(code.contains("(__imports_0__[\"default\"] || __imports_0__)(__imports_0__.b);"));
    assert!(code.contains("\"c\": { enumerable: true, get: function () { return __imports_0__.c; } }"));
}

#[test]
fn test_default_export_forms() {
    let code = cjs("export default function () { return 1; }\n", "anon_fn");
    assert!(code.contains("var __es6_default_export__ = function () { return 1; };"));
    assert!(code.contains("return __es6_default_export__;"));

    let code = cjs("export default 40 + 2;\n", "expr");
    assert!(code.contains("var __es6_default_export__ = 40 + 2;"));

    let code = cjs("var answer = 42;\nexport default answer;\n", "ident");
    assert!(code.contains("var answer = 42;\n"));
    assert!(!code.contains("export default"));
    assert!(code.contains("get: function () { return answer; }"));

    let code = cjs("export default class Widget {}\n", "klass");
    assert!(code.contains("\nclass Widget {}"));
    assert!(code.contains("get: function () { return Widget; }"));

    let code = cjs("export default class {}\n", "anon_class");
    assert!(code.contains("var __es6_default_export__ = class {};"));
}

/// Binding the `default` getter reads, and the text its top-level
/// declaration is initialized with. Fails unless the output parses and the
/// binding is declared exactly once at the top level.
fn default_binding(code: &str) -> (String, String) {
    let marker = "\"default\": { enumerable: true, get: function () { return ";
    let start = code.find(marker).unwrap() + marker.len();
    let binding = code[start..].split(';').next().unwrap().to_string();

    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, code, SourceType::cjs())
        .with_options(ParseOptions {
            allow_return_outside_function: true,
            ..ParseOptions::default()
        })
        .parse();
    assert!(ret.errors.is_empty(), "output does not parse: {:?}\n{code}", ret.errors);

    let mut values = Vec::new();
    for stmt in &ret.program.body {
        match stmt {
            Statement::VariableDeclaration(decl) => {
                for declarator in &decl.declarations {
                    if let BindingPatternKind::BindingIdentifier(id) = &declarator.id.kind {
                        if id.name.as_str() == binding {
                            let init = declarator.init.as_ref().unwrap().span();
                            values.push(code[init.start as usize..init.end as usize].to_string());
                        }
                    }
                }
            }
            Statement::FunctionDeclaration(func)
                if func.id.as_ref().is_some_and(|id| id.name.as_str() == binding) =>
            {
                values.push(code[func.span.start as usize..func.span.end as usize].to_string());
            }
            Statement::ClassDeclaration(class)
                if class.id.as_ref().is_some_and(|id| id.name.as_str() == binding) =>
            {
                values.push(code[class.span.start as usize..class.span.end as usize].to_string());
            }
            _ => {}
        }
    }
    assert_eq!(values.len(), 1, "'{binding}' declared {} times:\n{code}", values.len());
    (binding, values.remove(0))
}

#[test]
fn test_default_export_forms_bind_the_same_value() {
    let forms = [
        ("export default function () { return 1; }\n", "__es6_default_export__", "function () { return 1; }"),
        ("export default 40 + 2;\n", "__es6_default_export__", "40 + 2"),
        ("var answer = 42;\nexport default answer;\n", "answer", "42"),
        ("export default function named() { return 1; }\n", "named", "function named() { return 1; }"),
        ("export default class Widget {}\n", "Widget", "class Widget {}"),
        ("export default class {}\n", "__es6_default_export__", "class {}"),
    ];

    for (source, binding, value) in forms {
        let code = cjs(source, "form");
        assert_eq!(default_binding(&code), (binding.to_string(), value.to_string()), "{source}");
    }
}

#[test]
fn test_shorthand_assignment_target() {
    let source = "import { odd } from './m';\nfunction f() {\n  var o = {};\n  ({ odd } = o);\n  ({ odd = 1 } = o);\n}\n";
    let code = cjs(source, "assign");

    assert!(code.contains("  ({ odd: __imports_0__.odd } = o);\n"));
    assert!(code.contains("  ({ odd: __imports_0__.odd = 1 } = o);\n"));

    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, &code, SourceType::cjs())
        .with_options(ParseOptions {
            allow_return_outside_function: true,
            ..ParseOptions::default()
        })
        .parse();
    assert!(ret.errors.is_empty(), "{:?}", ret.errors);
}

#[test]
fn test_export_declarations_keep_position() {
    let source = "export var a = 1, b = 2;\nexport let { c, d: [e] } = obj;\nexport class K {}\n";
    let code = cjs(source, "decls");

    assert!(code.contains("\nvar a = 1, b = 2;\nlet { c, d: [e] } = obj;\nclass K {}\n"));
    for name in ["a", "b", "c", "e", "K"] {
        assert!(code.contains(&format!("\"{name}\": {{ enumerable: true")));
    }
    assert!(!code.contains("\"d\":"));
}

#[test]
fn test_local_export_list_is_removed() {
    let code = cjs("var x = 1, y = 2;\nexport { x, y as z };\n", "list");

    assert!(!code.contains("export {"));
    assert!(code.contains("\"x\": { enumerable: true, get: function () { return x; } }"));
    assert!(code.contains("\"z\": { enumerable: true, get: function () { return y; } }"));
}

#[test]
fn test_star_export_runtime_copy() {
    let code = cjs("export * from './all';\nexport var own = 1;\n", "star");

    assert!(code.contains("var __imports_0__ = __es6_module_registry__[\"app/all\"] || require(\"./all\");\nObject.keys(__imports_0__).forEach("));
    assert!(code.contains("\"own\": { enumerable: true"));
}

#[test]
fn test_relative_import_without_dir_path() {
    let err = transpile(
        "import a from './a';\n",
        "cjs",
        TranspileOptions::new("needs_dir"),
    )
    .unwrap_err();

    assert!(matches!(err, TranspileError::MissingConfiguration { ref option, .. } if option == "dirPath"));
}

#[test]
fn test_bare_imports_need_no_dir_path() {
    let output = transpile(
        "import Ember from 'ember';\nEmber.run();\n",
        "cjs",
        TranspileOptions::new("bare"),
    )
    .unwrap();

    assert!(output.code.contains("(__imports_0__[\"default\"] || __imports_0__).run();"));
}

#[test]
fn test_missing_registry_name() {
    let err = transpile("var a;\n", "cjs", TranspileOptions::default()).unwrap_err();
    assert!(matches!(err, TranspileError::MissingConfiguration { ref option, .. } if option == "registryName"));
}

#[test]
fn test_unknown_target() {
    let err = transpile("var a;\n", "umd", TranspileOptions::new("a")).unwrap_err();
    assert!(matches!(err, TranspileError::UnknownTarget { .. }));
}

#[test]
fn test_parse_error_is_reported() {
    let err = transpile("import {", "cjs", TranspileOptions::new("broken")).unwrap_err();
    assert!(matches!(err, TranspileError::Parse { .. }));
}

#[test]
fn test_use_strict_directive_stays_first() {
    let code = cjs("'use strict';\nimport a from 'a';\na();\n", "strict");
    assert!(code.starts_with("'use strict';\nif (typeof __es6_module_registry__"));
}
