use rigel_types::TypeDescriptor;

use crate::tree::{
    Arena, BinaryOp, ClassDecl, ClassId, Expr, ExprId, FieldDecl, FieldId, Member, MethodDecl,
    MethodId, Param, ProgramTree, Stmt, StmtId, TopLevelItem, VarFragment,
};

/// Materializes a [`ProgramTree`] declaration by declaration.
///
/// This is the parser-facing construction API. Scopes are opened and closed
/// explicitly (`begin_class`/`end_class`, `begin_method`/`end_method`,
/// `begin_block`/`end_block`); mismatched calls are programming errors on the
/// producer's side and panic, since a half-built tree must never reach the
/// analysis passes.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    items: Vec<TopLevelItem>,
    classes: Arena<ClassDecl>,
    fields: Arena<FieldDecl>,
    methods: Arena<MethodDecl>,
    stmts: Arena<Stmt>,
    exprs: Arena<Expr>,

    class_stack: Vec<PendingClass>,
    method: Option<PendingMethod>,
    block_stack: Vec<Vec<StmtId>>,
}

#[derive(Debug)]
struct PendingClass {
    name: String,
    members: Vec<Member>,
}

#[derive(Debug)]
struct PendingMethod {
    name: String,
    return_type: TypeDescriptor,
    params: Vec<Param>,
    body: Vec<StmtId>,
}

impl TreeBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn package(&mut self, name: &str) {
        self.items.push(TopLevelItem::Package(name.to_string()));
    }

    pub fn import(&mut self, qualified_name: &str) {
        self.items
            .push(TopLevelItem::Import(qualified_name.to_string()));
    }

    pub fn begin_class(&mut self, name: &str) {
        self.class_stack.push(PendingClass {
            name: name.to_string(),
            members: Vec::new(),
        });
    }

    pub fn end_class(&mut self) -> ClassId {
        let pending = self
            .class_stack
            .pop()
            .expect("end_class called with no open class");
        let id = ClassId::from_raw(self.classes.alloc(ClassDecl {
            name: pending.name,
            members: pending.members,
        }));
        match self.class_stack.last_mut() {
            Some(parent) => parent.members.push(Member::Class(id)),
            None => self.items.push(TopLevelItem::Class(id)),
        }
        id
    }

    /// Declare a field with a single fragment and no initializer.
    pub fn field(&mut self, ty: &str, name: &str) -> FieldId {
        self.field_fragments(ty, &[(name, None)])
    }

    pub fn field_with_init(&mut self, ty: &str, name: &str, init: ExprId) -> FieldId {
        self.field_fragments(ty, &[(name, Some(init))])
    }

    /// Declare a field whose fragments all share one declared type.
    pub fn field_fragments(&mut self, ty: &str, fragments: &[(&str, Option<ExprId>)]) -> FieldId {
        let decl = FieldDecl {
            ty: TypeDescriptor::from_source_text(ty),
            fragments: fragments
                .iter()
                .map(|(name, init)| VarFragment {
                    name: (*name).to_string(),
                    initializer: *init,
                })
                .collect(),
        };
        let id = FieldId::from_raw(self.fields.alloc(decl));
        self.current_class().members.push(Member::Field(id));
        id
    }

    pub fn begin_method(&mut self, name: &str, return_type: &str, params: &[(&str, &str)]) {
        assert!(
            self.method.is_none(),
            "begin_method called while another method is open"
        );
        self.method = Some(PendingMethod {
            name: name.to_string(),
            return_type: TypeDescriptor::from_source_text(return_type),
            params: params
                .iter()
                .map(|(name, ty)| Param {
                    name: (*name).to_string(),
                    ty: TypeDescriptor::from_source_text(ty),
                })
                .collect(),
            body: Vec::new(),
        });
    }

    pub fn end_method(&mut self) -> MethodId {
        assert!(
            self.block_stack.is_empty(),
            "end_method called with an open block"
        );
        let pending = self
            .method
            .take()
            .expect("end_method called with no open method");
        let id = MethodId::from_raw(self.methods.alloc(MethodDecl {
            name: pending.name,
            return_type: pending.return_type,
            params: pending.params,
            body: pending.body,
        }));
        self.current_class().members.push(Member::Method(id));
        id
    }

    /// Declare a local variable with a single fragment.
    pub fn local(&mut self, ty: &str, name: &str, init: Option<ExprId>) -> StmtId {
        self.local_fragments(ty, &[(name, init)])
    }

    pub fn local_fragments(&mut self, ty: &str, fragments: &[(&str, Option<ExprId>)]) -> StmtId {
        let stmt = Stmt::Local {
            ty: TypeDescriptor::from_source_text(ty),
            fragments: fragments
                .iter()
                .map(|(name, init)| VarFragment {
                    name: (*name).to_string(),
                    initializer: *init,
                })
                .collect(),
        };
        self.push_stmt(stmt)
    }

    pub fn assign(&mut self, target: ExprId, value: ExprId) -> StmtId {
        self.push_stmt(Stmt::Assign { target, value })
    }

    pub fn expr_stmt(&mut self, expr: ExprId) -> StmtId {
        self.push_stmt(Stmt::Expr { expr })
    }

    pub fn ret(&mut self, expr: Option<ExprId>) -> StmtId {
        self.push_stmt(Stmt::Return { expr })
    }

    pub fn begin_block(&mut self) {
        assert!(
            self.method.is_some(),
            "begin_block called outside a method body"
        );
        self.block_stack.push(Vec::new());
    }

    pub fn end_block(&mut self) -> StmtId {
        let statements = self
            .block_stack
            .pop()
            .expect("end_block called with no open block");
        self.push_stmt(Stmt::Block { statements })
    }

    pub fn name_expr(&mut self, name: &str) -> ExprId {
        ExprId::from_raw(self.exprs.alloc(Expr::Name {
            name: name.to_string(),
        }))
    }

    pub fn number_literal(&mut self, token: &str) -> ExprId {
        ExprId::from_raw(self.exprs.alloc(Expr::NumberLiteral {
            token: token.to_string(),
        }))
    }

    pub fn binary(&mut self, op: BinaryOp, lhs: ExprId, rhs: ExprId) -> ExprId {
        ExprId::from_raw(self.exprs.alloc(Expr::Binary { op, lhs, rhs }))
    }

    #[must_use]
    pub fn finish(self) -> ProgramTree {
        assert!(
            self.class_stack.is_empty() && self.method.is_none() && self.block_stack.is_empty(),
            "finish called with unclosed scopes"
        );
        ProgramTree {
            items: self.items,
            classes: self.classes,
            fields: self.fields,
            methods: self.methods,
            stmts: self.stmts,
            exprs: self.exprs,
        }
    }

    fn current_class(&mut self) -> &mut PendingClass {
        self.class_stack
            .last_mut()
            .expect("member declared outside a class")
    }

    fn push_stmt(&mut self, stmt: Stmt) -> StmtId {
        let id = StmtId::from_raw(self.stmts.alloc(stmt));
        match self.block_stack.last_mut() {
            Some(block) => block.push(id),
            None => {
                self.method
                    .as_mut()
                    .expect("statement declared outside a method body")
                    .body
                    .push(id);
            }
        }
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_classes_attach_to_their_enclosing_class() {
        let mut builder = TreeBuilder::new();
        builder.package("edu.example");
        builder.begin_class("Outer");
        builder.field("int", "num");
        builder.begin_class("Inner");
        builder.end_class();
        let outer = builder.end_class();
        let tree = builder.finish();

        let decl = tree.class(outer);
        assert_eq!(decl.name, "Outer");
        assert_eq!(decl.members.len(), 2);
        assert!(matches!(decl.members[0], Member::Field(_)));
        assert!(matches!(decl.members[1], Member::Class(_)));
        // Only the outer class appears at the top level.
        let top_classes: Vec<_> = tree
            .items()
            .iter()
            .filter(|item| matches!(item, TopLevelItem::Class(_)))
            .collect();
        assert_eq!(top_classes.len(), 1);
    }

    #[test]
    fn statements_land_in_the_innermost_open_block() {
        let mut builder = TreeBuilder::new();
        builder.begin_class("Foo");
        builder.begin_method("go", "void", &[]);
        builder.local("int", "outer_local", None);
        builder.begin_block();
        builder.local("int", "inner_local", None);
        let block = builder.end_block();
        builder.end_method();
        builder.end_class();
        let tree = builder.finish();

        let Stmt::Block { statements } = tree.stmt(block) else {
            panic!("expected a block statement");
        };
        assert_eq!(statements.len(), 1);
        assert!(matches!(tree.stmt(statements[0]), Stmt::Local { .. }));
    }
}
