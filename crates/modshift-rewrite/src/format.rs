//! Formatting options for generated wrapper code
//!
//! Only code the rewriter synthesizes (preambles, import statements, export
//! accessors, wrappers) is affected. Text copied from the input module is
//! emitted untouched.

use serde::{Deserialize, Serialize};

/// Quote style for string literals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStyle {
    /// Single quotes: `'hello'`
    Single,
    /// Double quotes: `"hello"`
    #[default]
    Double,
}

/// Indentation style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndentStyle {
    /// Tabs
    Tabs,
    /// Spaces with specified width
    Spaces(u8),
}

impl Default for IndentStyle {
    fn default() -> Self {
        IndentStyle::Spaces(2)
    }
}

/// Formatting options for generated code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormatOptions {
    /// Quote style for string literals
    pub quote_style: QuoteStyle,
    /// Indentation style
    pub indent: IndentStyle,
    /// Name recorded as the original source in the source map
    pub source_file_name: Option<String>,
    /// Name recorded as the `file` of the source map
    pub source_map_name: Option<String>,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            quote_style: QuoteStyle::default(),
            indent: IndentStyle::default(),
            source_file_name: None,
            source_map_name: None,
        }
    }
}

impl FormatOptions {
    /// One level of indentation.
    pub fn indent_unit(&self) -> String {
        match self.indent {
            IndentStyle::Tabs => "\t".to_string(),
            IndentStyle::Spaces(width) => " ".repeat(width as usize),
        }
    }

    /// `depth` levels of indentation.
    pub fn indent_by(&self, depth: usize) -> String {
        self.indent_unit().repeat(depth)
    }

    /// Render `value` as a JavaScript string literal in the configured quote style.
    pub fn quote(&self, value: &str) -> String {
        let quote = match self.quote_style {
            QuoteStyle::Single => '\'',
            QuoteStyle::Double => '"',
        };

        let mut out = String::with_capacity(value.len() + 2);
        out.push(quote);
        for ch in value.chars() {
            match ch {
                '\\' => out.push_str("\\\\"),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                '\u{2028}' => out.push_str("\\u2028"),
                '\u{2029}' => out.push_str("\\u2029"),
                c if c == quote => {
                    out.push('\\');
                    out.push(c);
                }
                c => out.push(c),
            }
        }
        out.push(quote);
        out
    }
}
