//! Symbol storage and type-name resolution.
//!
//! The [`SymbolTable`] is the single source of truth for "does X exist, and
//! what is its type" queries, scoped by class and, within a class, by method.
//! The [`ClassRegistry`] maps simple class names to qualified ones and
//! validates type references against the declaration-environment tree built
//! while classes are entered.
//!
//! Everything here is populated by the construction pass and read-only
//! afterwards; queries are total and never panic on missing input.

mod registry;
mod table;

pub use registry::{ClassRegistry, DeclEnv, EnvId};
pub use table::{ClassEntry, MethodEntry, NameType, SymbolTable};
