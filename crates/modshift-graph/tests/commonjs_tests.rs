//! CommonJS graph formatting tests

use std::sync::Arc;

use modshift_graph::{CommonJsFormatter, Formatter, MemoryLoader, ModuleGraph, OutputProgram};

const EVEN: &str = "import odd from './odd';\n\nexport default function even(n) {\n  return n === 0 || odd(n - 1);\n}\n";
const ODD: &str = "import even from './even';\n\nexport default function odd(n) {\n  return n === 0 ? false : even(n - 1);\n}\n";

fn build(loader: MemoryLoader, entry: &str) -> Vec<OutputProgram> {
    let mut graph = ModuleGraph::new("/p", Arc::new(loader));
    graph.add_entry(entry).unwrap();
    CommonJsFormatter::default().build(&graph).unwrap()
}

fn program<'a>(programs: &'a [OutputProgram], name: &str) -> &'a str {
    programs
        .iter()
        .find(|program| program.name == name)
        .map(OutputProgram::code)
        .unwrap()
}

#[test]
fn test_even_module_shape() {
    let loader = MemoryLoader::new()
        .with_file("/p/app/even.js", EVEN)
        .with_file("/p/app/odd.js", ODD);
    let programs = build(loader, "app/even");

    let names: Vec<&str> = programs.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["app/odd", "app/even"]);

    let expected = r#""use strict";
var __es6_module__ = exports;
Object.defineProperties(__es6_module__, {
  "default": { enumerable: true, get: function () { return even; } }
});
var __imports_0__ = require("./odd");

function even(n) {
  return n === 0 || (__imports_0__["default"] || __imports_0__)(n - 1);
}
"#;
    assert_eq!(program(&programs, "app/even"), expected);
}

#[test]
fn test_require_paths_follow_the_graph() {
    let loader = MemoryLoader::new()
        .with_file(
            "/p/app/main.js",
            "import { helper } from '../lib/util';\nimport * as conf from './conf';\nimport Ember from 'ember';\nEmber.run(helper(conf.name));\n",
        )
        .with_file("/p/lib/util.js", "export function helper(x) {\n  return x;\n}\n")
        .with_file("/p/app/conf/index.js", "export var name = 'main';\n");
    let programs = build(loader, "app/main");

    let main = program(&programs, "app/main");
    assert!(main.contains("var __imports_0__ = require(\"../lib/util\");"));
    assert!(main.contains("var __imports_1__ = require(\"./conf/index\");"));
    assert!(main.contains("var __imports_2__ = require(\"ember\");"));
    assert!(main.contains(
        "(__imports_2__[\"default\"] || __imports_2__).run(__imports_0__.helper(__imports_1__.name));"
    ));
    assert!(!main.contains("__es6_module_registry__"));
    assert_eq!(programs.len(), 3);
}

#[test]
fn test_reexports_stay_live() {
    let loader = MemoryLoader::new()
        .with_file("/p/m.js", "export var x = 1;\nexport function bump() {\n  x++;\n}\n")
        .with_file("/p/re.js", "export { x } from './m';\nexport * from './m';\n");
    let programs = build(loader, "re");

    let re = program(&programs, "re");
    assert!(re.contains("\"x\": { enumerable: true, get: function () { return __imports_0__.x; } }"));
    assert!(re.contains("var __imports_0__ = require(\"./m\");"));
    assert!(re.contains("Object.keys(__imports_0__).forEach("));
    assert_eq!(re.matches("require(").count(), 1);
}

#[test]
fn test_source_maps_point_at_module_files() {
    let loader = MemoryLoader::new()
        .with_file("/p/app/even.js", EVEN)
        .with_file("/p/app/odd.js", ODD);
    let programs = build(loader, "app/even");
    let even = programs.iter().find(|p| p.name == "app/even").unwrap();

    assert!(even.output.map_json().contains("\"app/even.js\""));
    let reference = even
        .output
        .mappings
        .iter()
        .find(|m| m.name.as_deref() == Some("odd"))
        .unwrap();
    assert_eq!((reference.original_line, reference.original_column), (3, 20));
}
