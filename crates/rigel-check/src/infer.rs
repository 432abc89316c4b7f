use std::collections::{BTreeSet, HashMap};

use rigel_resolve::{ClassRegistry, SymbolTable};
use rigel_tree::{
    BinaryOp, ClassId, Expr, ExprId, Member, ProgramTree, Stmt, StmtId, TopLevelItem,
};
use rigel_types::{classify_number_literal, TypeDescriptor};

use crate::diagnostics::CheckDiagnostic;
use crate::scope::ScopeStack;

/// Output of the inference pass.
#[derive(Debug)]
pub struct InferenceResult {
    /// One type per visited expression node, keyed by arena id.
    pub type_table: HashMap<ExprId, TypeDescriptor>,
    /// Rendered type-incompatibility findings, one string per widening
    /// failure, deterministic in iteration order.
    pub violations: BTreeSet<String>,
    pub diagnostics: Vec<CheckDiagnostic>,
}

/// Resolve identifier types and check arithmetic expressions against their
/// consuming context.
///
/// The symbol table and registry must come from a completed construction pass
/// over the same tree; both are only read here. Nothing in this pass aborts:
/// every failure mode lands in the type table as the unknown type, in the
/// diagnostics, or in the violation set.
#[must_use]
pub fn infer(
    tree: &ProgramTree,
    table: &SymbolTable,
    registry: &ClassRegistry,
) -> InferenceResult {
    let mut typer = Typer {
        tree,
        table,
        registry,
        scope: ScopeStack::new(),
        type_table: HashMap::new(),
        violations: BTreeSet::new(),
        diagnostics: Vec::new(),
    };

    for item in tree.items() {
        if let TopLevelItem::Class(id) = item {
            typer.visit_class(*id);
        }
    }

    InferenceResult {
        type_table: typer.type_table,
        violations: typer.violations,
        diagnostics: typer.diagnostics,
    }
}

struct Typer<'a> {
    tree: &'a ProgramTree,
    table: &'a SymbolTable,
    registry: &'a ClassRegistry,
    scope: ScopeStack,
    type_table: HashMap<ExprId, TypeDescriptor>,
    violations: BTreeSet<String>,
    diagnostics: Vec<CheckDiagnostic>,
}

impl<'a> Typer<'a> {
    fn visit_class(&mut self, id: ClassId) {
        let tree = self.tree;
        let decl = tree.class(id);

        let Some(fqn) = self.registry.resolve_qualified_name(&decl.name) else {
            tracing::warn!(class = decl.name.as_str(), "class was not registered; skipping");
            return;
        };
        let fqn = fqn.to_string();
        let Some(env) = self.registry.env_of(&fqn) else {
            tracing::warn!(class = fqn.as_str(), "class has no environment; skipping");
            return;
        };
        self.scope.push_class(&decl.name, &fqn, env);

        for member in &decl.members {
            match member {
                Member::Field(field_id) => {
                    let field = tree.field(*field_id);
                    for fragment in &field.fragments {
                        if let Some(init) = fragment.initializer {
                            // Field initializer: the declared field type is
                            // the consuming context.
                            self.visit_value(init, Some(&field.ty));
                        }
                    }
                }
                Member::Method(method_id) => {
                    let method = tree.method(*method_id);
                    self.scope.enter_method(&method.name);
                    for stmt in &method.body {
                        self.visit_stmt(*stmt);
                    }
                    self.scope.leave_method();
                }
                Member::Class(nested) => self.visit_class(*nested),
            }
        }

        self.scope.pop_class();
    }

    fn visit_stmt(&mut self, id: StmtId) {
        let tree = self.tree;
        match tree.stmt(id) {
            Stmt::Local { ty, fragments } => {
                for fragment in fragments {
                    if let Some(init) = fragment.initializer {
                        self.visit_value(init, Some(ty));
                    }
                }
            }
            Stmt::Assign { target, value } => {
                // The target resolves first; its type is the context the
                // right-hand side is checked against.
                let expected = self.visit_value(*target, None);
                self.visit_value(*value, Some(&expected));
            }
            Stmt::Expr { expr } => {
                // A bare expression statement consumes nothing.
                self.visit_value(*expr, None);
            }
            Stmt::Return { expr } => {
                let Some(expr) = expr else { return };
                let expected = self.enclosing_return_type();
                self.visit_value(*expr, Some(&expected));
            }
            Stmt::Block { statements } => {
                for stmt in statements {
                    self.visit_stmt(*stmt);
                }
            }
        }
    }

    /// The current method's declared return type, or unknown when the lookup
    /// fails (a return statement outside a registered method).
    fn enclosing_return_type(&self) -> TypeDescriptor {
        let fqn = self.scope.current().map(|scope| scope.fqn.clone());
        match (fqn, self.scope.current_method()) {
            (Some(fqn), Some(method)) => self
                .table
                .method_return_type(&fqn, method)
                .cloned()
                .unwrap_or(TypeDescriptor::Unknown),
            _ => TypeDescriptor::Unknown,
        }
    }

    /// Type one expression node, record it in the type table, and return the
    /// resolved type. `expected` is the type of the nearest enclosing
    /// consumer, when one exists.
    fn visit_value(
        &mut self,
        id: ExprId,
        expected: Option<&TypeDescriptor>,
    ) -> TypeDescriptor {
        let tree = self.tree;
        match tree.expr(id) {
            Expr::Name { name } => self.resolve_identifier(id, name),
            Expr::NumberLiteral { token } => {
                let ty = TypeDescriptor::Primitive(classify_number_literal(token));
                self.record(id, ty)
            }
            Expr::Binary { op, lhs, rhs } => self.visit_binary(id, *op, *lhs, *rhs, expected),
        }
    }

    fn visit_binary(
        &mut self,
        id: ExprId,
        op: BinaryOp,
        lhs: ExprId,
        rhs: ExprId,
        expected: Option<&TypeDescriptor>,
    ) -> TypeDescriptor {
        let tree = self.tree;

        // Operators outside the arithmetic set are rejected without looking
        // at the operands.
        if !op.is_arithmetic() {
            let expr = tree.render_expr(id);
            tracing::error!(operator = op.symbol(), expr = expr.as_str(), "unsupported operation");
            self.diagnostics.push(CheckDiagnostic::UnsupportedOperator {
                operator: op.symbol().to_string(),
                expr,
            });
            return self.record(id, TypeDescriptor::Unknown);
        }

        let Some(expected) = expected else {
            let expr = tree.render_expr(id);
            tracing::error!(expr = expr.as_str(), "unable to find context for expression");
            self.diagnostics
                .push(CheckDiagnostic::MissingExpressionContext { expr });
            return self.record(id, TypeDescriptor::Unknown);
        };

        // The left operand is checked first; a non-numeric left operand fails
        // fast and the right operand is never visited.
        let lhs_ty = self.visit_value(lhs, Some(expected));
        let Some(lhs_num) = lhs_ty.as_numeric() else {
            self.report_non_numeric(op, lhs, &lhs_ty);
            return self.record(id, TypeDescriptor::Unknown);
        };

        let rhs_ty = self.visit_value(rhs, Some(expected));
        let Some(rhs_num) = rhs_ty.as_numeric() else {
            self.report_non_numeric(op, rhs, &rhs_ty);
            return self.record(id, TypeDescriptor::Unknown);
        };

        // The expression takes the expected type exactly when both operands
        // widen to it. A non-numeric (or unknown) expected type never ranks
        // in the lattice and is conservatively incompatible.
        let compatible = expected
            .as_numeric()
            .is_some_and(|target| lhs_num.widens_to(target) && rhs_num.widens_to(target));

        if compatible {
            tracing::debug!(
                expr = tree.render_expr(id).as_str(),
                ty = %expected,
                "expression deemed valid"
            );
            return self.record(id, expected.clone());
        }

        let violation = CheckDiagnostic::TypeIncompatible {
            expr: tree.render_expr(id),
            expected: expected.to_string(),
            lhs: lhs_ty.to_string(),
            rhs: rhs_ty.to_string(),
        };
        tracing::error!("{violation}");
        self.violations.insert(violation.to_string());
        self.diagnostics.push(violation);
        self.record(id, TypeDescriptor::Unknown)
    }

    fn report_non_numeric(&mut self, op: BinaryOp, operand: ExprId, ty: &TypeDescriptor) {
        let rendered = self.tree.render_expr(operand);
        tracing::error!(
            operator = op.symbol(),
            operand = rendered.as_str(),
            ty = %ty,
            "non-numeric operand"
        );
        self.diagnostics.push(CheckDiagnostic::NonNumericOperand {
            operator: op.symbol().to_string(),
            operand: rendered,
            ty: ty.to_string(),
        });
    }

    /// Resolve an identifier through the scope tiers, first match wins:
    /// the enclosing class's own name, then its fields, methods (as values),
    /// the enclosing method's parameters and locals, and finally a type name
    /// known to the registry. Exhausting all six yields the unknown type.
    fn resolve_identifier(&mut self, id: ExprId, name: &str) -> TypeDescriptor {
        let Some(scope) = self.scope.current() else {
            return self.record(id, TypeDescriptor::Unknown);
        };
        let fqn = scope.fqn.clone();
        let simple = scope.simple_name.clone();
        let env = scope.env;
        let method = self.scope.current_method().map(str::to_string);

        if name == simple {
            let ty = TypeDescriptor::class(fqn);
            return self.record(id, ty);
        }
        if let Some(ty) = self.table.field_type(&fqn, name) {
            let ty = ty.clone();
            return self.record(id, ty);
        }
        if let Some(ty) = self.table.method_return_type(&fqn, name) {
            let ty = ty.clone();
            return self.record(id, ty);
        }
        if let Some(method) = &method {
            if let Some(ty) = self.table.parameter_type(&fqn, method, name) {
                let ty = ty.clone();
                return self.record(id, ty);
            }
            if let Some(ty) = self.table.local_variable_type(&fqn, method, name) {
                let ty = ty.clone();
                return self.record(id, ty);
            }
        }
        if self.registry.is_declared_type(name, env) {
            return self.record(id, TypeDescriptor::class(name));
        }

        tracing::debug!(name, class = fqn.as_str(), "unresolved identifier");
        self.record(id, TypeDescriptor::Unknown)
    }

    fn record(&mut self, id: ExprId, ty: TypeDescriptor) -> TypeDescriptor {
        self.type_table.insert(id, ty.clone());
        ty
    }
}
