//! Source map fidelity tests

use modshift_rewrite::{FormatOptions, Mapping, TranspileOptions, transpile};

const SOURCE: &str = r#"// header comment
import odd from './odd';

function bar() {
  return 1;
}

export default function even(n) {
  return n === 0 || odd(n - 1);
}

console.log(odd);
"#;

fn rewrite() -> (String, Vec<Mapping>) {
    let options = TranspileOptions::new("app/even").with_dir_path("app");
    let output = transpile(SOURCE, "cjs", options).unwrap();
    (output.code, output.mappings)
}

fn generated_line<'a>(code: &'a str, text: &str) -> (u32, &'a str) {
    code.lines()
        .enumerate()
        .find(|(_, line)| line.contains(text))
        .map(|(index, line)| (index as u32, line))
        .unwrap()
}

#[test]
fn test_unchanged_lines_map_one_to_one() {
    let (code, mappings) = rewrite();
    let (line, _) = generated_line(&code, "function bar() {");

    let mapping = mappings
        .iter()
        .find(|m| m.generated_line == line && m.generated_column == 0)
        .unwrap();
    assert_eq!((mapping.original_line, mapping.original_column), (3, 0));

    let (line, _) = generated_line(&code, "  return 1;");
    let mapping = mappings
        .iter()
        .find(|m| m.generated_line == line && m.generated_column == 0)
        .unwrap();
    assert_eq!(mapping.original_line, 4);
}

#[test]
fn test_import_replacement_maps_to_import() {
    let (code, mappings) = rewrite();
    let (line, _) = generated_line(&code, "var __imports_0__ =");

    let mapping = mappings
        .iter()
        .find(|m| m.generated_line == line && m.generated_column == 0)
        .unwrap();
    assert_eq!((mapping.original_line, mapping.original_column), (1, 0));
}

#[test]
fn test_rewritten_identifiers_map_to_original_occurrence() {
    let (code, mappings) = rewrite();
    let lines: Vec<&str> = code.lines().collect();

    let named: Vec<&Mapping> = mappings
        .iter()
        .filter(|m| m.name.as_deref() == Some("odd"))
        .collect();
    let originals: Vec<_> = named
        .iter()
        .map(|m| (m.original_line, m.original_column))
        .collect();
    assert_eq!(originals, vec![(8, 20), (11, 12)]);

    for mapping in named {
        let line = lines[mapping.generated_line as usize];
        assert!(line[mapping.generated_column as usize..].starts_with("(__imports_0__[\"default\"]"));
    }
}

#[test]
fn test_generated_prologue_is_unmapped() {
    let (code, mappings) = rewrite();
    let (line, _) = generated_line(&code, "globalThis.__es6_module_registry__");

    assert!(!mappings.iter().any(|m| m.generated_line == line));
}

#[test]
fn test_source_map_json_names() {
    let options = TranspileOptions::new("app/even")
        .with_dir_path("app")
        .with_format(FormatOptions {
            source_file_name: Some("even.es6.js".into()),
            source_map_name: Some("even.js".into()),
            ..Default::default()
        });
    let output = transpile(SOURCE, "cjs", options).unwrap();

    let json: serde_json::Value = serde_json::from_str(&output.map_json()).unwrap();
    assert_eq!(json["file"], "even.js");
    assert_eq!(json["sources"][0], "even.es6.js");
    assert_eq!(json["names"][0], "odd");
    assert!(output.code_with_inline_map().contains("//# sourceMappingURL=data:application/json"));
}
