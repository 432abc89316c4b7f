use std::fmt;

use rigel_types::TypeDescriptor;

macro_rules! tree_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u32);

        impl $name {
            pub(crate) fn from_raw(raw: u32) -> Self {
                $name(raw)
            }

            #[must_use]
            pub fn idx(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }
    };
}

tree_id!(
    /// Identity of a class declaration.
    ClassId
);
tree_id!(
    /// Identity of a field declaration.
    FieldId
);
tree_id!(
    /// Identity of a method declaration.
    MethodId
);
tree_id!(
    /// Identity of a statement.
    StmtId
);
tree_id!(
    /// Identity of an expression node. Keys the inference pass's type table.
    ExprId
);

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Arena<T> {
    data: Vec<T>,
}

impl<T> Arena<T> {
    pub(crate) fn alloc(&mut self, value: T) -> u32 {
        let idx = self.data.len() as u32;
        self.data.push(value);
        idx
    }

    pub(crate) fn get(&self, idx: usize) -> &T {
        &self.data[idx]
    }

    pub(crate) fn len(&self) -> usize {
        self.data.len()
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Arena { data: Vec::new() }
    }
}

/// One item at the root of the tree, in source order.
///
/// Sources are analyzed as a single concatenated unit, so several package
/// declarations may appear; the construction pass warns about conflicts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopLevelItem {
    Package(String),
    Import(String),
    Class(ClassId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDecl {
    pub name: String,
    pub members: Vec<Member>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Member {
    Field(FieldId),
    Method(MethodId),
    Class(ClassId),
}

/// A field declaration: one declared type shared by one or more fragments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    pub ty: TypeDescriptor,
    pub fragments: Vec<VarFragment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarFragment {
    pub name: String,
    pub initializer: Option<ExprId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDecl {
    pub name: String,
    pub return_type: TypeDescriptor,
    pub params: Vec<Param>,
    pub body: Vec<StmtId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub ty: TypeDescriptor,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    /// A local-variable declaration; like fields, one declared type may be
    /// shared by several fragments.
    Local {
        ty: TypeDescriptor,
        fragments: Vec<VarFragment>,
    },
    Assign {
        target: ExprId,
        value: ExprId,
    },
    Expr {
        expr: ExprId,
    },
    Return {
        expr: Option<ExprId>,
    },
    Block {
        statements: Vec<StmtId>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Name {
        name: String,
    },
    /// A numeric literal, kept as its raw token text.
    NumberLiteral {
        token: String,
    },
    Binary {
        op: BinaryOp,
        lhs: ExprId,
        rhs: ExprId,
    },
}

/// The full infix operator set the parser can produce.
///
/// The analysis only types the arithmetic subset; everything else is carried
/// so unsupported uses can be reported instead of silently dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Mul,
    Div,
    Rem,
    Add,
    Sub,
    Shl,
    Shr,
    UShr,
    Lt,
    Gt,
    Le,
    Ge,
    EqEq,
    Ne,
    BitAnd,
    BitXor,
    BitOr,
    AndAnd,
    OrOr,
}

impl BinaryOp {
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::UShr => ">>>",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::Le => "<=",
            BinaryOp::Ge => ">=",
            BinaryOp::EqEq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitXor => "^",
            BinaryOp::BitOr => "|",
            BinaryOp::AndAnd => "&&",
            BinaryOp::OrOr => "||",
        }
    }

    /// The operators the inference pass knows how to type.
    #[must_use]
    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            BinaryOp::Mul
                | BinaryOp::Div
                | BinaryOp::Rem
                | BinaryOp::Add
                | BinaryOp::Sub
                | BinaryOp::Shl
                | BinaryOp::Shr
                | BinaryOp::UShr
        )
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// An immutable parsed program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramTree {
    pub(crate) items: Vec<TopLevelItem>,
    pub(crate) classes: Arena<ClassDecl>,
    pub(crate) fields: Arena<FieldDecl>,
    pub(crate) methods: Arena<MethodDecl>,
    pub(crate) stmts: Arena<Stmt>,
    pub(crate) exprs: Arena<Expr>,
}

impl ProgramTree {
    #[must_use]
    pub fn items(&self) -> &[TopLevelItem] {
        &self.items
    }

    #[must_use]
    pub fn class(&self, id: ClassId) -> &ClassDecl {
        self.classes.get(id.idx())
    }

    #[must_use]
    pub fn field(&self, id: FieldId) -> &FieldDecl {
        self.fields.get(id.idx())
    }

    #[must_use]
    pub fn method(&self, id: MethodId) -> &MethodDecl {
        self.methods.get(id.idx())
    }

    #[must_use]
    pub fn stmt(&self, id: StmtId) -> &Stmt {
        self.stmts.get(id.idx())
    }

    #[must_use]
    pub fn expr(&self, id: ExprId) -> &Expr {
        self.exprs.get(id.idx())
    }

    #[must_use]
    pub fn expr_count(&self) -> usize {
        self.exprs.len()
    }

    /// Render an expression back to source-like text for diagnostics.
    #[must_use]
    pub fn render_expr(&self, id: ExprId) -> String {
        match self.expr(id) {
            Expr::Name { name } => name.clone(),
            Expr::NumberLiteral { token } => token.clone(),
            Expr::Binary { op, lhs, rhs } => format!(
                "{} {} {}",
                self.render_expr(*lhs),
                op.symbol(),
                self.render_expr(*rhs)
            ),
        }
    }
}
