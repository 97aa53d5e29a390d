//! Import/export catalog of a single module.
//!
//! The catalog is filled by one left-to-right pass over the top-level
//! statements. It records what a module imports, what it exports under which
//! public names, and which synthetic handle stands for each imported path.

use indexmap::IndexMap;
use oxc_ast::ast::{
    Declaration, ExportAllDeclaration, ExportDefaultDeclaration, ExportDefaultDeclarationKind,
    ExportNamedDeclaration, ImportDeclaration, ImportDeclarationSpecifier, ModuleDeclaration,
    ModuleExportName, Program, VariableDeclarationKind,
};
use oxc_span::GetSpan;
use rustc_hash::FxHashSet;

use crate::error::{Result, TranspileError};
use crate::format::FormatOptions;
use crate::line_index::LineIndex;
use crate::scope::binding_names;

/// Local binding that receives anonymous and expression default exports.
pub const DEFAULT_EXPORT_BINDING: &str = "__es6_default_export__";

/// How a binding is read from an imported module
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ImportKind {
    /// `import x from 'm'` or `import { default as x } from 'm'`
    Default,
    /// `import { name } from 'm'`
    Named(String),
    /// `import * as ns from 'm'`
    Namespace,
}

/// One imported local binding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportEntry {
    pub source: String,
    pub kind: ImportKind,
    pub local: String,
}

/// What a public export name is bound to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportBinding {
    /// A binding declared in this module
    Local(String),
    /// A binding of another module, read through that module's handle
    ReExport { source: String, kind: ImportKind },
}

/// One public export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportEntry {
    pub exported: String,
    pub binding: ExportBinding,
}

/// Surface form of an `export default` statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultExportForm {
    /// `export default function name() {}`
    NamedFunction,
    /// `export default class Name {}`
    NamedClass,
    /// `export default name;`
    Identifier,
    /// `export default function () {}`, `export default class {}` or `export default <expr>;`
    Expression,
}

/// The binding that holds a module's `export default` value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultExport {
    pub form: DefaultExportForm,
    pub local: String,
}

/// Imports and exports of one module
#[derive(Debug, Clone, Default)]
pub struct ModuleCatalog {
    imports: Vec<ImportEntry>,
    exports: Vec<ExportEntry>,
    star_exports: Vec<String>,
    handles: IndexMap<String, String>,
    default_export: Option<DefaultExport>,
}

impl ModuleCatalog {
    /// Catalog every module declaration of `program`.
    pub fn build(program: &Program<'_>, lines: &LineIndex<'_>) -> Result<Self> {
        let mut catalog = Self::default();
        let mut locals = FxHashSet::default();

        for stmt in &program.body {
            let Some(decl) = stmt.as_module_declaration() else {
                continue;
            };
            match decl {
                ModuleDeclaration::ImportDeclaration(import) => {
                    catalog.add_import(import, &mut locals)?;
                }
                ModuleDeclaration::ExportNamedDeclaration(export) => {
                    catalog.add_named_export(export, lines)?;
                }
                ModuleDeclaration::ExportDefaultDeclaration(export) => {
                    catalog.add_default_export(export, lines)?;
                }
                ModuleDeclaration::ExportAllDeclaration(export) => {
                    catalog.add_export_all(export)?;
                }
                other => {
                    let (line, column) = lines.line_col(other.span().start);
                    return Err(TranspileError::unsupported_declaration(
                        "TypeScript export",
                        line,
                        column,
                    ));
                }
            }
        }

        catalog.link_reexported_imports();
        Ok(catalog)
    }

    pub fn imports(&self) -> &[ImportEntry] {
        &self.imports
    }

    pub fn exports(&self) -> &[ExportEntry] {
        &self.exports
    }

    /// Sources of `export * from` statements, in order.
    pub fn star_exports(&self) -> &[String] {
        &self.star_exports
    }

    pub fn default_export(&self) -> Option<&DefaultExport> {
        self.default_export.as_ref()
    }

    /// Handle assigned to an imported path.
    pub fn handle(&self, source: &str) -> Option<&str> {
        self.handles.get(source).map(String::as_str)
    }

    /// `(source, handle)` pairs in first-occurrence order.
    pub fn handles(&self) -> impl Iterator<Item = (&str, &str)> {
        self.handles
            .iter()
            .map(|(source, handle)| (source.as_str(), handle.as_str()))
    }

    /// Every distinct imported or re-exported path in first-occurrence order.
    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.handles.keys().map(String::as_str)
    }

    pub fn import_for_local(&self, local: &str) -> Option<&ImportEntry> {
        self.imports.iter().find(|entry| entry.local == local)
    }

    pub fn export(&self, exported: &str) -> Option<&ExportEntry> {
        self.exports.iter().find(|entry| entry.exported == exported)
    }

    pub fn export_names(&self) -> impl Iterator<Item = &str> {
        self.exports.iter().map(|entry| entry.exported.as_str())
    }

    fn add_source(&mut self, source: &str) {
        if !self.handles.contains_key(source) {
            let handle = handle_name(self.handles.len());
            self.handles.insert(source.to_string(), handle);
        }
    }

    fn add_import(
        &mut self,
        import: &ImportDeclaration<'_>,
        locals: &mut FxHashSet<String>,
    ) -> Result<()> {
        let source = import.source.value.to_string();
        self.add_source(&source);

        for specifier in import.specifiers.iter().flatten() {
            let (kind, local) = match specifier {
                ImportDeclarationSpecifier::ImportSpecifier(s) => {
                    let imported = export_name(&s.imported);
                    let kind = if imported == "default" {
                        ImportKind::Default
                    } else {
                        ImportKind::Named(imported)
                    };
                    (kind, s.local.name.to_string())
                }
                ImportDeclarationSpecifier::ImportDefaultSpecifier(s) => {
                    (ImportKind::Default, s.local.name.to_string())
                }
                ImportDeclarationSpecifier::ImportNamespaceSpecifier(s) => {
                    (ImportKind::Namespace, s.local.name.to_string())
                }
            };

            if !locals.insert(local.clone()) {
                return Err(TranspileError::DuplicateBinding { name: local });
            }
            self.imports.push(ImportEntry {
                source: source.clone(),
                kind,
                local,
            });
        }
        Ok(())
    }

    fn add_named_export(
        &mut self,
        export: &ExportNamedDeclaration<'_>,
        lines: &LineIndex<'_>,
    ) -> Result<()> {
        if let Some(declaration) = &export.declaration {
            for name in declared_names(declaration, lines)? {
                self.add_export(name.clone(), ExportBinding::Local(name))?;
            }
            return Ok(());
        }

        match &export.source {
            Some(source) => {
                let source = source.value.to_string();
                self.add_source(&source);
                for specifier in &export.specifiers {
                    let imported = export_name(&specifier.local);
                    let kind = if imported == "default" {
                        ImportKind::Default
                    } else {
                        ImportKind::Named(imported)
                    };
                    self.add_export(
                        export_name(&specifier.exported),
                        ExportBinding::ReExport {
                            source: source.clone(),
                            kind,
                        },
                    )?;
                }
            }
            None => {
                for specifier in &export.specifiers {
                    self.add_export(
                        export_name(&specifier.exported),
                        ExportBinding::Local(export_name(&specifier.local)),
                    )?;
                }
            }
        }
        Ok(())
    }

    fn add_default_export(
        &mut self,
        export: &ExportDefaultDeclaration<'_>,
        lines: &LineIndex<'_>,
    ) -> Result<()> {
        let (form, local) = match &export.declaration {
            ExportDefaultDeclarationKind::FunctionDeclaration(func) => match &func.id {
                Some(id) => (DefaultExportForm::NamedFunction, id.name.to_string()),
                None => (DefaultExportForm::Expression, DEFAULT_EXPORT_BINDING.to_string()),
            },
            ExportDefaultDeclarationKind::ClassDeclaration(class) => match &class.id {
                Some(id) => (DefaultExportForm::NamedClass, id.name.to_string()),
                None => (DefaultExportForm::Expression, DEFAULT_EXPORT_BINDING.to_string()),
            },
            ExportDefaultDeclarationKind::TSInterfaceDeclaration(decl) => {
                let (line, column) = lines.line_col(decl.span.start);
                return Err(TranspileError::unsupported_declaration(
                    "TSInterfaceDeclaration",
                    line,
                    column,
                ));
            }
            ExportDefaultDeclarationKind::Identifier(ident) => {
                (DefaultExportForm::Identifier, ident.name.to_string())
            }
            _ => (DefaultExportForm::Expression, DEFAULT_EXPORT_BINDING.to_string()),
        };

        self.add_export("default".to_string(), ExportBinding::Local(local.clone()))?;
        self.default_export = Some(DefaultExport { form, local });
        Ok(())
    }

    fn add_export_all(&mut self, export: &ExportAllDeclaration<'_>) -> Result<()> {
        let source = export.source.value.to_string();
        self.add_source(&source);

        match &export.exported {
            Some(exported) => self.add_export(
                export_name(exported),
                ExportBinding::ReExport {
                    source,
                    kind: ImportKind::Namespace,
                },
            ),
            None => {
                if !self.star_exports.contains(&source) {
                    self.star_exports.push(source);
                }
                Ok(())
            }
        }
    }

    fn add_export(&mut self, exported: String, binding: ExportBinding) -> Result<()> {
        if self.export(&exported).is_some() {
            return Err(TranspileError::DuplicateExport { name: exported });
        }
        self.exports.push(ExportEntry { exported, binding });
        Ok(())
    }

    // An exported name that is itself an import has no local declaration left
    // after imports are removed, so it is served from the imported module.
    fn link_reexported_imports(&mut self) {
        let imports = &self.imports;
        for entry in &mut self.exports {
            let ExportBinding::Local(local) = &entry.binding else {
                continue;
            };
            if let Some(import) = imports.iter().find(|import| &import.local == local) {
                entry.binding = ExportBinding::ReExport {
                    source: import.source.clone(),
                    kind: import.kind.clone(),
                };
            }
        }
    }
}

/// Handle name for the `index`-th distinct imported path.
pub fn handle_name(index: usize) -> String {
    format!("__imports_{index}__")
}

/// Expression reading an imported binding through its module handle.
pub fn access_expression(handle: &str, kind: &ImportKind, format: &FormatOptions) -> String {
    match kind {
        ImportKind::Default => {
            format!("({handle}[{}] || {handle})", format.quote("default"))
        }
        ImportKind::Named(name) if is_identifier_name(name) => format!("{handle}.{name}"),
        ImportKind::Named(name) => format!("{handle}[{}]", format.quote(name)),
        ImportKind::Namespace => handle.to_string(),
    }
}

/// Whether `name` can be written after a `.` in a member expression.
pub fn is_identifier_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first == '_' || first == '$' || first.is_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c == '$' || c.is_alphanumeric())
}

fn export_name(name: &ModuleExportName<'_>) -> String {
    match name {
        ModuleExportName::IdentifierName(ident) => ident.name.to_string(),
        ModuleExportName::IdentifierReference(ident) => ident.name.to_string(),
        ModuleExportName::StringLiteral(lit) => lit.value.to_string(),
    }
}

/// Names bound by an exported declaration.
pub(crate) fn declared_names(
    declaration: &Declaration<'_>,
    lines: &LineIndex<'_>,
) -> Result<Vec<String>> {
    let unsupported = |kind: &str| {
        let (line, column) = lines.line_col(declaration.span().start);
        TranspileError::unsupported_declaration(kind, line, column)
    };

    match declaration {
        Declaration::VariableDeclaration(var) => match var.kind {
            VariableDeclarationKind::Var
            | VariableDeclarationKind::Let
            | VariableDeclarationKind::Const => Ok(var
                .declarations
                .iter()
                .flat_map(|declarator| binding_names(&declarator.id))
                .collect()),
            _ => Err(unsupported("using declaration")),
        },
        Declaration::FunctionDeclaration(func) => func
            .id
            .as_ref()
            .map(|id| vec![id.name.to_string()])
            .ok_or_else(|| TranspileError::missing_catalog_entry("exported function name")),
        Declaration::ClassDeclaration(class) => class
            .id
            .as_ref()
            .map(|id| vec![id.name.to_string()])
            .ok_or_else(|| TranspileError::missing_catalog_entry("exported class name")),
        Declaration::TSTypeAliasDeclaration(_) => Err(unsupported("TSTypeAliasDeclaration")),
        Declaration::TSInterfaceDeclaration(_) => Err(unsupported("TSInterfaceDeclaration")),
        Declaration::TSEnumDeclaration(_) => Err(unsupported("TSEnumDeclaration")),
        Declaration::TSModuleDeclaration(_) => Err(unsupported("TSModuleDeclaration")),
        _ => Err(unsupported("TypeScript declaration")),
    }
}
