use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;

use rigel_types::TypeDescriptor;
use serde::{Deserialize, Serialize};

/// An (identifier, type) pair, the atomic unit of symbol storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameType {
    pub name: String,
    pub ty: TypeDescriptor,
}

impl NameType {
    #[must_use]
    pub fn new(name: impl Into<String>, ty: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// A method's signature plus the locals pre-scanned from its body.
///
/// The parameter list is fixed when the method is registered; locals are
/// collected in the same registration because the construction pass scans a
/// method body's top-level declarations before any expression analysis runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodEntry {
    pub return_type: TypeDescriptor,
    pub params: Vec<NameType>,
    pub locals: Vec<NameType>,
}

/// Everything known about one declared class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassEntry {
    fqn: String,
    fields: Vec<NameType>,
    methods: BTreeMap<String, MethodEntry>,
}

impl ClassEntry {
    fn new(fqn: String) -> Self {
        Self {
            fqn,
            fields: Vec::new(),
            methods: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn fqn(&self) -> &str {
        &self.fqn
    }

    #[must_use]
    pub fn fields(&self) -> &[NameType] {
        &self.fields
    }

    #[must_use]
    pub fn methods(&self) -> &BTreeMap<String, MethodEntry> {
        &self.methods
    }
}

/// Per-class storage of fields, methods, parameters, and locals.
///
/// All queries are total: asking about a class that was never registered is a
/// negative answer, not an error, and no query looks further once the class
/// is missing. Duplicate member names within one scope replace the earlier
/// entry (last declaration wins); see DESIGN.md.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolTable {
    classes: BTreeMap<String, ClassEntry>,
    valid_types: BTreeMap<String, BTreeSet<String>>,
}

impl SymbolTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // === Queries ===

    #[must_use]
    pub fn class_exists(&self, fqn: &str) -> bool {
        self.classes.contains_key(fqn)
    }

    #[must_use]
    pub fn field_exists(&self, fqn: &str, field: &str) -> bool {
        self.field_type(fqn, field).is_some()
    }

    #[must_use]
    pub fn field_type(&self, fqn: &str, field: &str) -> Option<&TypeDescriptor> {
        let entry = self.classes.get(fqn)?;
        entry
            .fields
            .iter()
            .find(|pair| pair.name == field)
            .map(|pair| &pair.ty)
    }

    #[must_use]
    pub fn method_exists(&self, fqn: &str, method: &str) -> bool {
        self.classes
            .get(fqn)
            .is_some_and(|entry| entry.methods.contains_key(method))
    }

    #[must_use]
    pub fn method_return_type(&self, fqn: &str, method: &str) -> Option<&TypeDescriptor> {
        let entry = self.classes.get(fqn)?;
        entry.methods.get(method).map(|m| &m.return_type)
    }

    #[must_use]
    pub fn parameter_exists(&self, fqn: &str, method: &str, param: &str) -> bool {
        self.parameter_type(fqn, method, param).is_some()
    }

    #[must_use]
    pub fn parameter_type(&self, fqn: &str, method: &str, param: &str) -> Option<&TypeDescriptor> {
        let entry = self.classes.get(fqn)?.methods.get(method)?;
        entry
            .params
            .iter()
            .find(|pair| pair.name == param)
            .map(|pair| &pair.ty)
    }

    #[must_use]
    pub fn local_variable_exists(&self, fqn: &str, method: &str, local: &str) -> bool {
        self.local_variable_type(fqn, method, local).is_some()
    }

    #[must_use]
    pub fn local_variable_type(
        &self,
        fqn: &str,
        method: &str,
        local: &str,
    ) -> Option<&TypeDescriptor> {
        let entry = self.classes.get(fqn)?.methods.get(method)?;
        entry
            .locals
            .iter()
            .find(|pair| pair.name == local)
            .map(|pair| &pair.ty)
    }

    /// Whether `ty` was recorded as a validated type reference for `fqn`.
    #[must_use]
    pub fn valid_type_exists(&self, fqn: &str, ty: &str) -> bool {
        self.valid_types
            .get(fqn)
            .is_some_and(|types| types.contains(ty))
    }

    #[must_use]
    pub fn classes(&self) -> impl Iterator<Item = &ClassEntry> {
        self.classes.values()
    }

    // === Mutators (construction pass only) ===

    pub fn register_class(&mut self, fqn: &str) {
        self.classes
            .entry(fqn.to_string())
            .or_insert_with(|| ClassEntry::new(fqn.to_string()));
    }

    pub fn add_field(&mut self, fqn: &str, field: NameType) {
        let Some(entry) = self.classes.get_mut(fqn) else {
            tracing::error!(class = fqn, field = %field.name, "class not registered; dropping field");
            return;
        };
        match entry.fields.iter_mut().find(|pair| pair.name == field.name) {
            Some(existing) => *existing = field,
            None => entry.fields.push(field),
        }
    }

    /// Register a method's return type, parameter list, and pre-scanned
    /// locals in one call. Re-registering a method name replaces the earlier
    /// entry.
    pub fn add_method(
        &mut self,
        fqn: &str,
        method: &str,
        return_type: TypeDescriptor,
        params: Vec<NameType>,
        locals: Vec<NameType>,
    ) {
        let Some(entry) = self.classes.get_mut(fqn) else {
            tracing::error!(class = fqn, method, "class not registered; dropping method");
            return;
        };
        entry.methods.insert(
            method.to_string(),
            MethodEntry {
                return_type,
                params: dedup_last_wins(params),
                locals: dedup_last_wins(locals),
            },
        );
    }

    pub fn add_valid_type(&mut self, fqn: &str, ty: &str) {
        self.valid_types
            .entry(fqn.to_string())
            .or_default()
            .insert(ty.to_string());
    }

    /// A stable, human-readable listing of every class with its fields,
    /// methods, parameters, and locals.
    #[must_use]
    pub fn dump(&self) -> String {
        let mut out = String::from("SymbolTable {\n");
        for entry in self.classes.values() {
            let _ = writeln!(out, "  class {} {{", entry.fqn);
            for field in &entry.fields {
                let _ = writeln!(out, "    field {}: {}", field.name, field.ty);
            }
            for (name, method) in &entry.methods {
                let params = method
                    .params
                    .iter()
                    .map(|pair| format!("{}: {}", pair.name, pair.ty))
                    .collect::<Vec<_>>()
                    .join(", ");
                let _ = writeln!(out, "    method {name}({params}) -> {}", method.return_type);
                for local in &method.locals {
                    let _ = writeln!(out, "      local {}: {}", local.name, local.ty);
                }
            }
            if let Some(types) = self.valid_types.get(&entry.fqn) {
                let list = types.iter().cloned().collect::<Vec<_>>().join(", ");
                let _ = writeln!(out, "    valid types: [{list}]");
            }
            out.push_str("  }\n");
        }
        out.push('}');
        out
    }
}

/// Collapse duplicate names so the later declaration wins, preserving the
/// position of the first occurrence.
fn dedup_last_wins(pairs: Vec<NameType>) -> Vec<NameType> {
    let mut out: Vec<NameType> = Vec::with_capacity(pairs.len());
    for pair in pairs {
        match out.iter_mut().find(|existing| existing.name == pair.name) {
            Some(existing) => *existing = pair,
            None => out.push(pair),
        }
    }
    out
}
