//! Single-module rewriter.
//!
//! Parses one module, catalogs its imports and exports, rewrites every
//! module-scope reference to an imported binding into an access on the
//! import's handle, and lets a [`ModuleTarget`] decide the surrounding code.

use std::fmt;

use indexmap::IndexMap;
use oxc_allocator::Allocator;
use oxc_ast::ast::{ExportDefaultDeclarationKind, ModuleDeclaration, Program};
use oxc_sourcemap::SourceMap;
use oxc_span::{GetSpan, Span};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, trace};

use crate::catalog::{DEFAULT_EXPORT_BINDING, ImportEntry, ModuleCatalog, access_expression};
use crate::editor::{Mapping, SourceEditor};
use crate::error::{Result, TranspileError};
use crate::line_index::LineIndex;
use crate::options::TranspileOptions;
use crate::parser::{ParseOptions, parse};
use crate::scope::ScopeTable;
use crate::target::{ImportRequest, ModuleTarget, TargetContext, Wrapper};

/// Rewritten module text and its source map
pub struct TranspileOutput {
    pub code: String,
    pub map: SourceMap,
    /// Decoded mappings the source map was built from
    pub mappings: Vec<Mapping>,
}

impl TranspileOutput {
    pub fn map_json(&self) -> String {
        self.map.to_json_string()
    }

    /// The code with the source map appended as an inline data URL comment.
    pub fn code_with_inline_map(&self) -> String {
        format!(
            "{}\n//# sourceMappingURL={}\n",
            self.code.trim_end_matches('\n'),
            self.map.to_data_url()
        )
    }
}

impl fmt::Debug for TranspileOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranspileOutput")
            .field("code", &self.code)
            .field("mappings", &self.mappings.len())
            .finish_non_exhaustive()
    }
}

/// Rewrites one module's source text
#[derive(Debug)]
pub struct Rewriter<'s> {
    source: &'s str,
    options: TranspileOptions,
    registry_name: String,
}

impl<'s> Rewriter<'s> {
    /// Fails when the options carry no registry name.
    pub fn new(source: &'s str, options: TranspileOptions) -> Result<Self> {
        let registry_name = options.registry_name()?.to_string();
        Ok(Self {
            source,
            options,
            registry_name,
        })
    }

    pub fn options(&self) -> &TranspileOptions {
        &self.options
    }

    fn file_name(&self) -> String {
        self.options
            .format
            .source_file_name
            .clone()
            .unwrap_or_else(|| format!("{}.js", basename(&self.registry_name)))
    }

    /// Rewrite the module for `target`.
    pub fn rewrite(&self, target: &dyn ModuleTarget) -> Result<TranspileOutput> {
        let file_name = self.file_name();
        let allocator = Allocator::default();
        let program = parse(&allocator, self.source, &ParseOptions::named(file_name.clone()))?;

        let mut editor = SourceEditor::new(self.source);
        let catalog = ModuleCatalog::build(&program, &LineIndex::new(self.source))?;
        let registry_keys = self.registry_keys(&catalog)?;
        let scopes = ScopeTable::build(&program);

        let ctx = TargetContext {
            registry_name: &self.registry_name,
            options: &self.options,
            catalog: &catalog,
            registry_keys: &registry_keys,
        };

        rewrite_module_declarations(&program, &ctx, target, &mut editor)?;
        let rewritten = rewrite_references(&scopes, &ctx, &mut editor)?;

        let prologue = target.prologue(&ctx)?;
        let (offset, prologue) = prologue_insertion(&program, self.source, prologue);
        editor.insert(offset, prologue);

        let mut wrapper = Wrapper::default();
        let epilogue = target.epilogue(&ctx)?;
        if !epilogue.is_empty() || !self.source.ends_with('\n') {
            wrapper.footer.push('\n');
        }
        wrapper.footer.push_str(&epilogue);
        target.wrap(&ctx, &mut wrapper)?;
        hoist_hashbang(&program, &mut editor, &mut wrapper);

        let rendered = editor.render(&wrapper.header, &wrapper.footer, &file_name)?;

        let map_file = self
            .options
            .format
            .source_map_name
            .clone()
            .unwrap_or_else(|| format!("{}.js", basename(&self.registry_name)));
        let mut map = rendered.map;
        map.set_file(&map_file);

        debug!(
            module = %self.registry_name,
            target = target.name(),
            imports = catalog.imports().len(),
            exports = catalog.exports().len(),
            references = rewritten,
            "rewrote module"
        );

        Ok(TranspileOutput {
            code: rendered.code,
            map,
            mappings: rendered.mappings,
        })
    }

    fn registry_keys(&self, catalog: &ModuleCatalog) -> Result<IndexMap<String, String>> {
        catalog
            .sources()
            .map(|source| Ok((source.to_string(), self.options.registry_key(source)?)))
            .collect()
    }
}

/// Replace import statements, strip `export` keywords and normalize default exports.
pub fn rewrite_module_declarations(
    program: &Program<'_>,
    ctx: &TargetContext<'_>,
    target: &dyn ModuleTarget,
    editor: &mut SourceEditor<'_>,
) -> Result<()> {
    let mut loaded = FxHashSet::default();

    // Statement loading `source` into its handle the first time it is seen.
    let mut load = |source: &str| -> Result<(String, String)> {
        let handle = ctx.catalog.handle(source).ok_or_else(|| {
            TranspileError::missing_catalog_entry(format!("handle for '{source}'"))
        })?;
        if !loaded.insert(source.to_string()) {
            return Ok((handle.to_string(), String::new()));
        }
        let key = ctx.registry_keys.get(source).ok_or_else(|| {
            TranspileError::missing_catalog_entry(format!("registry key for '{source}'"))
        })?;
        let statement = target.import_statement(
            ctx,
            &ImportRequest {
                handle,
                source,
                key,
            },
        );
        Ok((handle.to_string(), statement))
    };

    for stmt in &program.body {
        let Some(decl) = stmt.as_module_declaration() else {
            continue;
        };
        let span = decl.span();

        match decl {
            ModuleDeclaration::ImportDeclaration(import) => {
                let (_, statement) = load(import.source.value.as_str())?;
                replace_or_remove(editor, span, statement);
            }
            ModuleDeclaration::ExportNamedDeclaration(export) => {
                if let Some(declaration) = &export.declaration {
                    editor.remove(Span::new(span.start, declaration.span().start));
                } else if let Some(source) = &export.source {
                    let (_, statement) = load(source.value.as_str())?;
                    replace_or_remove(editor, span, statement);
                } else {
                    editor.remove(span);
                }
            }
            ModuleDeclaration::ExportDefaultDeclaration(export) => {
                let inner = export.declaration.span();
                let prefix = Span::new(span.start, inner.start);
                let assign = format!("var {DEFAULT_EXPORT_BINDING} = ");

                match &export.declaration {
                    ExportDefaultDeclarationKind::FunctionDeclaration(func) => {
                        if func.id.is_some() {
                            editor.remove(prefix);
                        } else {
                            editor.replace(prefix, assign);
                            editor.insert(inner.end, ";");
                        }
                    }
                    ExportDefaultDeclarationKind::ClassDeclaration(class) => {
                        if class.id.is_some() {
                            editor.remove(prefix);
                        } else {
                            editor.replace(prefix, assign);
                            editor.insert(inner.end, ";");
                        }
                    }
                    ExportDefaultDeclarationKind::Identifier(_) => editor.remove(span),
                    _ => editor.replace(prefix, assign),
                }
            }
            ModuleDeclaration::ExportAllDeclaration(export) => {
                let (handle, mut statement) = load(export.source.value.as_str())?;
                if export.exported.is_none() {
                    if !statement.is_empty() {
                        statement.push('\n');
                    }
                    statement.push_str(target.star_export(ctx, &handle).trim_end());
                }
                replace_or_remove(editor, span, statement);
            }
            _ => {
                return Err(TranspileError::missing_catalog_entry(
                    "module declaration without catalog record",
                ));
            }
        }
    }
    Ok(())
}

/// Rewrite every module-scope reference to an import. Returns the number of
/// rewritten references.
pub fn rewrite_references(
    scopes: &ScopeTable,
    ctx: &TargetContext<'_>,
    editor: &mut SourceEditor<'_>,
) -> Result<usize> {
    let imports: FxHashMap<&str, &ImportEntry> = ctx
        .catalog
        .imports()
        .iter()
        .map(|entry| (entry.local.as_str(), entry))
        .collect();

    let mut rewritten = 0;
    for reference in scopes.references() {
        let Some(import) = imports.get(reference.name.as_str()) else {
            continue;
        };
        if !scopes.resolves_to_module(&reference.name, reference.scope) {
            continue;
        }

        let handle = ctx.catalog.handle(&import.source).ok_or_else(|| {
            TranspileError::missing_catalog_entry(format!("handle for '{}'", import.source))
        })?;
        let access = access_expression(handle, &import.kind, ctx.format());
        let text = if reference.shorthand {
            format!("{}: {access}", reference.name)
        } else {
            access
        };

        trace!(name = %reference.name, handle, "rewrite reference");
        editor.replace_identifier(reference.span, text);
        rewritten += 1;
    }
    Ok(rewritten)
}

fn replace_or_remove(editor: &mut SourceEditor<'_>, span: Span, statement: String) {
    if statement.is_empty() {
        editor.remove(span);
    } else {
        editor.replace(span, statement);
    }
}

/// Where the target prologue goes: after the directive prologue, or before
/// the first statement so leading comments stay on top.
pub fn prologue_insertion(program: &Program<'_>, source: &str, prologue: String) -> (u32, String) {
    if prologue.is_empty() {
        return (0, prologue);
    }
    if let Some(directive) = program.directives.last() {
        return (directive.span.end, format!("\n{}", prologue.trim_end_matches('\n')));
    }
    match program.body.first() {
        Some(stmt) => (stmt.span().start, prologue),
        None => {
            let separator = if source.is_empty() || source.ends_with('\n') {
                ""
            } else {
                "\n"
            };
            (source.len() as u32, format!("{separator}{prologue}"))
        }
    }
}

/// A hashbang is only valid as the first line of the output, so it moves in
/// front of the wrapper header.
fn hoist_hashbang(program: &Program<'_>, editor: &mut SourceEditor<'_>, wrapper: &mut Wrapper) {
    let Some(hashbang) = &program.hashbang else {
        return;
    };
    if wrapper.header.is_empty() {
        return;
    }
    let line = editor.slice(hashbang.span).trim_end().to_string();
    let mut span = hashbang.span;
    if editor
        .source()
        .get(span.end as usize..)
        .is_some_and(|rest| rest.starts_with('\n'))
    {
        span.end += 1;
    }
    editor.remove(span);
    wrapper.header.insert_str(0, &format!("{line}\n"));
}

fn basename(registry_name: &str) -> &str {
    registry_name
        .rsplit('/')
        .next()
        .filter(|name| !name.is_empty())
        .unwrap_or(registry_name)
}
