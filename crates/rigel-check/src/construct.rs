use std::collections::HashMap;

use rigel_resolve::{ClassRegistry, EnvId, NameType, SymbolTable};
use rigel_tree::{ClassId, Member, ProgramTree, Stmt, TopLevelItem};
use rigel_types::TypeDescriptor;

use crate::diagnostics::CheckDiagnostic;
use crate::scope::ScopeStack;

/// Output of the construction pass.
///
/// The symbol table and registry are complete once this is returned; the
/// inference pass only ever borrows them.
#[derive(Debug)]
pub struct ConstructionResult {
    pub symbol_table: SymbolTable,
    pub registry: ClassRegistry,
    pub diagnostics: Vec<CheckDiagnostic>,
}

/// Walk the tree's declarations once and populate the symbol table and class
/// registry.
///
/// Class names are declared ahead of member collection so that a type
/// reference may point at a class declared later in the source; member
/// collection then never depends on declaration order.
#[must_use]
pub fn build_symbol_table(tree: &ProgramTree) -> ConstructionResult {
    let mut collector = Collector {
        tree,
        table: SymbolTable::new(),
        registry: ClassRegistry::new(),
        scope: ScopeStack::new(),
        diagnostics: Vec::new(),
        fqns: HashMap::new(),
        envs: HashMap::new(),
        package: None,
    };
    collector.declare_classes();
    collector.collect_members();

    ConstructionResult {
        symbol_table: collector.table,
        registry: collector.registry,
        diagnostics: collector.diagnostics,
    }
}

struct Collector<'a> {
    tree: &'a ProgramTree,
    table: SymbolTable,
    registry: ClassRegistry,
    scope: ScopeStack,
    diagnostics: Vec<CheckDiagnostic>,
    fqns: HashMap<ClassId, String>,
    envs: HashMap<ClassId, EnvId>,
    package: Option<String>,
}

impl<'a> Collector<'a> {
    /// First sub-walk: assign qualified names and open environment nodes.
    fn declare_classes(&mut self) {
        for item in self.tree.items() {
            match item {
                TopLevelItem::Package(name) => self.enter_package(name),
                TopLevelItem::Import(qualified) => self.registry.register_import(qualified),
                TopLevelItem::Class(id) => self.declare_class(*id, None, None),
            }
        }
    }

    fn enter_package(&mut self, name: &str) {
        match &self.package {
            None => {
                self.package = Some(name.to_string());
                self.registry.set_package(name);
            }
            Some(current) if current == name => {}
            Some(current) => {
                tracing::warn!(
                    current = current.as_str(),
                    declared = name,
                    "conflicting package declaration; keeping the current package"
                );
                self.diagnostics.push(CheckDiagnostic::StructuralInconsistency {
                    message: format!(
                        "package declaration `{name}` conflicts with `{current}`; keeping `{current}`"
                    ),
                });
            }
        }
    }

    fn declare_class(&mut self, id: ClassId, enclosing: Option<&str>, parent_env: Option<EnvId>) {
        let decl = self.tree.class(id);
        let fqn = match (enclosing, &self.package) {
            (Some(outer), _) => format!("{outer}.{}", decl.name),
            (None, Some(package)) => format!("{package}.{}", decl.name),
            (None, None) => decl.name.clone(),
        };

        let env = self.registry.register_class(&decl.name, &fqn, parent_env);
        self.table.register_class(&fqn);
        self.fqns.insert(id, fqn.clone());
        self.envs.insert(id, env);

        for member in &decl.members {
            if let Member::Class(nested) = member {
                self.declare_class(*nested, Some(&fqn), Some(env));
            }
        }
    }

    /// Second sub-walk: record fields, methods, and pre-scanned locals, and
    /// validate every declared class-type reference.
    fn collect_members(&mut self) {
        for item in self.tree.items() {
            if let TopLevelItem::Class(id) = item {
                self.visit_class(*id);
            }
        }
    }

    fn visit_class(&mut self, id: ClassId) {
        let tree = self.tree;
        let decl = tree.class(id);
        let (fqn, env) = match (self.fqns.get(&id), self.envs.get(&id)) {
            (Some(fqn), Some(env)) => (fqn.clone(), *env),
            _ => {
                tracing::warn!(class = decl.name.as_str(), "class was never declared; skipping");
                return;
            }
        };
        self.scope.push_class(&decl.name, &fqn, env);

        for member in &decl.members {
            match member {
                Member::Field(field_id) => {
                    let field = tree.field(*field_id);
                    self.validate_type_ref(&field.ty);
                    for fragment in &field.fragments {
                        self.table
                            .add_field(&fqn, NameType::new(&fragment.name, field.ty.clone()));
                    }
                }
                Member::Method(method_id) => {
                    let method = tree.method(*method_id);
                    self.validate_type_ref(&method.return_type);

                    let params: Vec<NameType> = method
                        .params
                        .iter()
                        .map(|param| {
                            self.validate_type_ref(&param.ty);
                            NameType::new(&param.name, param.ty.clone())
                        })
                        .collect();

                    // Pre-scan the body's top-level declarations so locals are
                    // known before any expression analysis. Declarations inside
                    // nested blocks and multi-fragment declarations are not
                    // recorded.
                    let mut locals = Vec::new();
                    for stmt_id in &method.body {
                        if let Stmt::Local { ty, fragments } = tree.stmt(*stmt_id) {
                            if let [fragment] = fragments.as_slice() {
                                self.validate_type_ref(ty);
                                locals.push(NameType::new(&fragment.name, ty.clone()));
                            }
                        }
                    }

                    self.table.add_method(
                        &fqn,
                        &method.name,
                        method.return_type.clone(),
                        params,
                        locals,
                    );
                }
                Member::Class(nested) => self.visit_class(*nested),
            }
        }

        match self.scope.pop_class() {
            Some(popped) if popped.simple_name == decl.name => {}
            Some(popped) => {
                tracing::warn!(
                    entered = decl.name.as_str(),
                    exited = popped.simple_name.as_str(),
                    "scope exit does not match the class being left"
                );
                self.diagnostics.push(CheckDiagnostic::StructuralInconsistency {
                    message: format!(
                        "left scope `{}` while exiting class `{}`",
                        popped.simple_name, decl.name
                    ),
                });
            }
            None => {
                self.diagnostics.push(CheckDiagnostic::StructuralInconsistency {
                    message: format!("no open scope while exiting class `{}`", decl.name),
                });
            }
        }
    }

    /// Check a declared type against the registry. Primitive types are exempt;
    /// class references are recorded on the current environment, and the
    /// validated ones become queryable per class.
    fn validate_type_ref(&mut self, ty: &TypeDescriptor) {
        let TypeDescriptor::Class(name) = ty else {
            return;
        };
        let (env, fqn) = match self.scope.current() {
            Some(scope) => (scope.env, scope.fqn.clone()),
            None => return,
        };

        self.registry.record_type_reference(env, name);
        if self.registry.is_declared_type(name, env) {
            self.table.add_valid_type(&fqn, name);
        } else {
            tracing::warn!(ty = name.as_str(), class = fqn.as_str(), "invalid type reference");
            self.diagnostics.push(CheckDiagnostic::InvalidTypeReference {
                ty: name.clone(),
                class: fqn,
            });
        }
    }
}
