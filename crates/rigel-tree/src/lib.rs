//! The program tree the analysis passes consume.
//!
//! An external parser materializes one immutable [`ProgramTree`] per analysis
//! run through the [`TreeBuilder`] API; the passes only ever borrow it.
//! Nodes live in arenas and are addressed by copyable `u32` ids, so node
//! identity is an index rather than a pointer.

mod builder;
mod tree;

pub use builder::TreeBuilder;
pub use tree::{
    BinaryOp, ClassDecl, ClassId, Expr, ExprId, FieldDecl, FieldId, Member, MethodDecl, MethodId,
    Param, ProgramTree, Stmt, StmtId, TopLevelItem, VarFragment,
};
