//! The two analysis passes over a program tree.
//!
//! The construction pass ([`build_symbol_table`]) walks declarations and
//! populates the symbol table and class registry; the inference pass
//! ([`infer`]) walks expressions, resolves identifiers through the scope
//! tiers, and checks arithmetic expressions against their consuming context
//! under the numeric widening lattice. [`analyze`] runs both in order.
//!
//! Diagnostics are accumulated on the pass results rather than emitted
//! through shared state, so the passes stay re-entrant; `tracing` carries the
//! same findings as log events for embedders that want them live.

mod construct;
mod diagnostics;
mod infer;
mod scope;

pub use construct::{build_symbol_table, ConstructionResult};
pub use diagnostics::CheckDiagnostic;
pub use infer::{infer, InferenceResult};
pub use scope::{ClassScope, ScopeStack};

use std::collections::{BTreeSet, HashMap};

use rigel_resolve::{ClassRegistry, SymbolTable};
use rigel_tree::{ExprId, ProgramTree};
use rigel_types::TypeDescriptor;

/// Everything one analysis run produces.
#[derive(Debug)]
pub struct AnalysisResult {
    pub symbol_table: SymbolTable,
    pub registry: ClassRegistry,
    pub type_table: HashMap<ExprId, TypeDescriptor>,
    pub violations: BTreeSet<String>,
    /// Construction-pass findings followed by inference-pass findings.
    pub diagnostics: Vec<CheckDiagnostic>,
}

/// Run the construction pass to completion, then the inference pass over the
/// finished symbol table.
///
/// The ordering is a hard precondition of identifier resolution, and the API
/// enforces it: [`infer`] can only borrow a table a finished
/// [`ConstructionResult`] hands out.
#[must_use]
pub fn analyze(tree: &ProgramTree) -> AnalysisResult {
    let construction = build_symbol_table(tree);
    let inference = infer(tree, &construction.symbol_table, &construction.registry);

    let mut diagnostics = construction.diagnostics;
    diagnostics.extend(inference.diagnostics);

    AnalysisResult {
        symbol_table: construction.symbol_table,
        registry: construction.registry,
        type_table: inference.type_table,
        violations: inference.violations,
        diagnostics,
    }
}
