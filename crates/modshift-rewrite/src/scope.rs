//! Scope tracking for import reference rewriting.
//!
//! A [`ScopeTable`] is built in a single pass over the program before any
//! reference is resolved. Because every binding of every scope is known up
//! front, a declaration that appears lexically after a reference still shadows
//! it (`var` hoisting, function declarations, `let`/`const` in the same block).
//!
//! The same pass records every identifier reference together with the scope it
//! occurs in. Identifiers in member-property or object-key position are
//! `IdentifierName`s in the syntax tree and are therefore never recorded.

use oxc_ast::ast::{
    ArrowFunctionExpression, AssignmentTargetPropertyIdentifier, BindingPattern, BindingPatternKind, BlockStatement, CatchClause,
    Class, ClassType, ExportAllDeclaration, ExportDefaultDeclaration,
    ExportDefaultDeclarationKind, ExportNamedDeclaration, ForInStatement, ForOfStatement,
    ForStatement, FormalParameters, Function, FunctionType, IdentifierReference,
    ImportDeclaration, ImportDeclarationSpecifier, ObjectProperty, Program, SwitchStatement,
    VariableDeclaration, VariableDeclarationKind,
};
use oxc_ast_visit::{walk, Visit};
use oxc_semantic::ScopeFlags;
use oxc_span::{GetSpan, Span};
use rustc_hash::{FxHashMap, FxHashSet};

/// Index of a scope inside a [`ScopeTable`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(u32);

impl ScopeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Syntactic construct that opened a scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    /// Module top level
    Module,
    /// Function declaration, function expression or arrow function
    Function,
    /// Class body
    Class,
    /// Block statement, loop head or switch body
    Block,
    /// Catch clause parameter scope
    Catch,
}

impl ScopeKind {
    /// Whether `var` declarations stop at this scope.
    pub fn is_var_scope(self) -> bool {
        matches!(self, ScopeKind::Module | ScopeKind::Function)
    }
}

#[derive(Debug, Clone)]
pub struct Scope {
    pub kind: ScopeKind,
    pub parent: Option<ScopeId>,
    pub depth: u32,
    bindings: FxHashSet<String>,
}

impl Scope {
    pub fn declares(&self, name: &str) -> bool {
        self.bindings.contains(name)
    }

    pub fn bindings(&self) -> impl Iterator<Item = &str> {
        self.bindings.iter().map(String::as_str)
    }
}

/// An identifier occurrence in reference position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub name: String,
    pub span: Span,
    pub scope: ScopeId,
    /// The identifier is the value of a shorthand object property (`{ name }`).
    pub shorthand: bool,
}

/// All scopes and references of one module
#[derive(Debug, Clone)]
pub struct ScopeTable {
    scopes: Vec<Scope>,
    index: FxHashMap<(Span, ScopeKind), ScopeId>,
    references: Vec<Reference>,
}

impl ScopeTable {
    /// Build the scope table for a whole program.
    pub fn build(program: &Program<'_>) -> Self {
        let mut table = Self {
            scopes: Vec::new(),
            index: FxHashMap::default(),
            references: Vec::new(),
        };
        let root = table.push_scope(program.span, ScopeKind::Module, None);

        let mut builder = ScopeBuilder {
            table,
            current: root,
            shorthand: false,
        };
        builder.visit_program(program);
        builder.table
    }

    /// The module scope.
    pub fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.index()]
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Scope opened by the node at `span`.
    pub fn scope_at(&self, span: Span, kind: ScopeKind) -> Option<ScopeId> {
        self.index.get(&(span, kind)).copied()
    }

    /// Nearest scope, starting at `from`, that declares `name`.
    ///
    /// `None` means the name is a global.
    pub fn resolve(&self, name: &str, from: ScopeId) -> Option<ScopeId> {
        let mut current = Some(from);
        while let Some(id) = current {
            let scope = self.scope(id);
            if scope.declares(name) {
                return Some(id);
            }
            current = scope.parent;
        }
        None
    }

    /// Whether `name` seen from `from` refers to the module-level binding.
    pub fn resolves_to_module(&self, name: &str, from: ScopeId) -> bool {
        self.resolve(name, from)
            .is_some_and(|id| self.scope(id).depth == 0)
    }

    /// Every reference in source order.
    pub fn references(&self) -> &[Reference] {
        &self.references
    }

    fn push_scope(&mut self, span: Span, kind: ScopeKind, parent: Option<ScopeId>) -> ScopeId {
        let depth = parent.map(|p| self.scope(p).depth + 1).unwrap_or(0);
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope {
            kind,
            parent,
            depth,
            bindings: FxHashSet::default(),
        });
        self.index.insert((span, kind), id);
        id
    }

    fn declare(&mut self, scope: ScopeId, name: &str) {
        self.scopes[scope.index()].bindings.insert(name.to_string());
    }
}

/// Names bound by a binding pattern, in source order.
pub fn binding_names(pattern: &BindingPattern<'_>) -> Vec<String> {
    let mut names = Vec::new();
    collect_binding_names(pattern, &mut names);
    names
}

fn collect_binding_names(pattern: &BindingPattern<'_>, names: &mut Vec<String>) {
    match &pattern.kind {
        BindingPatternKind::BindingIdentifier(ident) => names.push(ident.name.to_string()),
        BindingPatternKind::ObjectPattern(object) => {
            for property in &object.properties {
                collect_binding_names(&property.value, names);
            }
            if let Some(rest) = &object.rest {
                collect_binding_names(&rest.argument, names);
            }
        }
        BindingPatternKind::ArrayPattern(array) => {
            for element in array.elements.iter().flatten() {
                collect_binding_names(element, names);
            }
            if let Some(rest) = &array.rest {
                collect_binding_names(&rest.argument, names);
            }
        }
        BindingPatternKind::AssignmentPattern(assignment) => {
            collect_binding_names(&assignment.left, names);
        }
    }
}

struct ScopeBuilder {
    table: ScopeTable,
    current: ScopeId,
    shorthand: bool,
}

impl ScopeBuilder {
    fn enter(&mut self, span: Span, kind: ScopeKind) -> ScopeId {
        let id = self.table.push_scope(span, kind, Some(self.current));
        self.current = id;
        id
    }

    fn leave(&mut self) {
        if let Some(parent) = self.table.scope(self.current).parent {
            self.current = parent;
        }
    }

    fn hoist_target(&self) -> ScopeId {
        let mut id = self.current;
        loop {
            let scope = self.table.scope(id);
            if scope.kind.is_var_scope() {
                return id;
            }
            match scope.parent {
                Some(parent) => id = parent,
                None => return id,
            }
        }
    }

    fn declare_pattern(&mut self, scope: ScopeId, pattern: &BindingPattern<'_>) {
        for name in binding_names(pattern) {
            self.table.declare(scope, &name);
        }
    }

    fn declare_params(&mut self, scope: ScopeId, params: &FormalParameters<'_>) {
        for param in &params.items {
            self.declare_pattern(scope, &param.pattern);
        }
        if let Some(rest) = &params.rest {
            self.declare_pattern(scope, &rest.argument);
        }
    }
}

impl<'a> Visit<'a> for ScopeBuilder {
    fn visit_import_declaration(&mut self, decl: &ImportDeclaration<'a>) {
        let root = self.table.root();
        for specifier in decl.specifiers.iter().flatten() {
            let local = match specifier {
                ImportDeclarationSpecifier::ImportSpecifier(s) => &s.local,
                ImportDeclarationSpecifier::ImportDefaultSpecifier(s) => &s.local,
                ImportDeclarationSpecifier::ImportNamespaceSpecifier(s) => &s.local,
            };
            self.table.declare(root, &local.name);
        }
    }

    // Specifier lists are removed from the output; only the wrapped
    // declaration keeps its references.
    fn visit_export_named_declaration(&mut self, decl: &ExportNamedDeclaration<'a>) {
        if let Some(declaration) = &decl.declaration {
            self.visit_declaration(declaration);
        }
    }

    fn visit_export_default_declaration(&mut self, decl: &ExportDefaultDeclaration<'a>) {
        if matches!(decl.declaration, ExportDefaultDeclarationKind::Identifier(_)) {
            return;
        }
        walk::walk_export_default_declaration(self, decl);
    }

    fn visit_export_all_declaration(&mut self, _decl: &ExportAllDeclaration<'a>) {}

    fn visit_variable_declaration(&mut self, decl: &VariableDeclaration<'a>) {
        let target = if decl.kind == VariableDeclarationKind::Var {
            self.hoist_target()
        } else {
            self.current
        };
        for declarator in &decl.declarations {
            self.declare_pattern(target, &declarator.id);
        }
        walk::walk_variable_declaration(self, decl);
    }

    fn visit_function(&mut self, func: &Function<'a>, flags: ScopeFlags) {
        let is_declaration = func.r#type == FunctionType::FunctionDeclaration;
        let outer = self.current;
        let scope = self.enter(func.span, ScopeKind::Function);
        if let Some(id) = &func.id {
            let target = if is_declaration { outer } else { scope };
            self.table.declare(target, &id.name);
        }
        self.declare_params(scope, &func.params);

        walk::walk_function(self, func, flags);
        self.leave();
    }

    fn visit_arrow_function_expression(&mut self, arrow: &ArrowFunctionExpression<'a>) {
        let scope = self.enter(arrow.span, ScopeKind::Function);
        self.declare_params(scope, &arrow.params);
        walk::walk_arrow_function_expression(self, arrow);
        self.leave();
    }

    fn visit_class(&mut self, class: &Class<'a>) {
        let is_declaration = class.r#type == ClassType::ClassDeclaration;
        let outer = self.current;
        let scope = self.enter(class.span, ScopeKind::Class);
        if let Some(id) = &class.id {
            let target = if is_declaration { outer } else { scope };
            self.table.declare(target, &id.name);
        }

        walk::walk_class(self, class);
        self.leave();
    }

    fn visit_block_statement(&mut self, block: &BlockStatement<'a>) {
        self.enter(block.span, ScopeKind::Block);
        walk::walk_block_statement(self, block);
        self.leave();
    }

    fn visit_for_statement(&mut self, stmt: &ForStatement<'a>) {
        self.enter(stmt.span, ScopeKind::Block);
        walk::walk_for_statement(self, stmt);
        self.leave();
    }

    fn visit_for_in_statement(&mut self, stmt: &ForInStatement<'a>) {
        self.enter(stmt.span, ScopeKind::Block);
        walk::walk_for_in_statement(self, stmt);
        self.leave();
    }

    fn visit_for_of_statement(&mut self, stmt: &ForOfStatement<'a>) {
        self.enter(stmt.span, ScopeKind::Block);
        walk::walk_for_of_statement(self, stmt);
        self.leave();
    }

    fn visit_switch_statement(&mut self, stmt: &SwitchStatement<'a>) {
        // The discriminant is evaluated outside the case block.
        self.visit_expression(&stmt.discriminant);
        self.enter(stmt.span, ScopeKind::Block);
        for case in &stmt.cases {
            self.visit_switch_case(case);
        }
        self.leave();
    }

    fn visit_catch_clause(&mut self, clause: &CatchClause<'a>) {
        let scope = self.enter(clause.span, ScopeKind::Catch);
        if let Some(param) = &clause.param {
            self.declare_pattern(scope, &param.pattern);
        }
        walk::walk_catch_clause(self, clause);
        self.leave();
    }

    fn visit_object_property(&mut self, prop: &ObjectProperty<'a>) {
        if prop.shorthand {
            self.shorthand = true;
        }
        walk::walk_object_property(self, prop);
        self.shorthand = false;
    }

    // `({ odd } = o)` assigns through the same shorthand form as `{ odd }`.
    fn visit_assignment_target_property_identifier(
        &mut self,
        prop: &AssignmentTargetPropertyIdentifier<'a>,
    ) {
        self.shorthand = true;
        self.visit_identifier_reference(&prop.binding);
        if let Some(init) = &prop.init {
            self.visit_expression(init);
        }
    }

    fn visit_identifier_reference(&mut self, ident: &IdentifierReference<'a>) {
        self.table.references.push(Reference {
            name: ident.name.to_string(),
            span: ident.span(),
            scope: self.current,
            shorthand: std::mem::take(&mut self.shorthand),
        });
    }
}
