use std::collections::{BTreeMap, BTreeSet};

pub type EnvId = usize;

/// One node of the declaration-environment tree.
///
/// The tree mirrors the lexical nesting of class declarations; parents are
/// non-owning indices so independent walks never share mutable state. Each
/// node remembers the type references observed while its scope was current.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclEnv {
    name: String,
    parent: Option<EnvId>,
    observed_types: Vec<String>,
}

impl DeclEnv {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn parent(&self) -> Option<EnvId> {
        self.parent
    }

    #[must_use]
    pub fn observed_types(&self) -> &[String] {
        &self.observed_types
    }
}

/// Maps simple class names to qualified ones and validates that a referenced
/// type name is legal in a given declaration environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassRegistry {
    package: Option<String>,
    simple_to_qualified: BTreeMap<String, String>,
    /// Base names usable from inside the analyzed sources: a declared class's
    /// qualified name with the package prefix stripped, or an import's last
    /// segment.
    declared_base_names: BTreeSet<String>,
    envs: Vec<DeclEnv>,
    env_by_fqn: BTreeMap<String, EnvId>,
}

impl ClassRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn package(&self) -> Option<&str> {
        self.package.as_deref()
    }

    pub fn set_package(&mut self, package: &str) {
        self.package = Some(package.to_string());
    }

    /// Register a declared class and open its environment node as a child of
    /// the lexically enclosing class's node (or as a root when top-level).
    pub fn register_class(
        &mut self,
        simple_name: &str,
        fqn: &str,
        parent: Option<EnvId>,
    ) -> EnvId {
        self.simple_to_qualified
            .insert(simple_name.to_string(), fqn.to_string());
        self.declared_base_names
            .insert(self.base_name(fqn).to_string());

        let env = self.envs.len();
        self.envs.push(DeclEnv {
            name: simple_name.to_string(),
            parent,
            observed_types: Vec::new(),
        });
        self.env_by_fqn.insert(fqn.to_string(), env);
        env
    }

    /// Register an imported type: its last segment becomes usable as a base
    /// name, and resolves to the full import path.
    pub fn register_import(&mut self, qualified_name: &str) {
        let simple = qualified_name
            .rsplit('.')
            .next()
            .unwrap_or(qualified_name)
            .to_string();
        self.declared_base_names.insert(simple.clone());
        self.simple_to_qualified
            .insert(simple, qualified_name.to_string());
    }

    #[must_use]
    pub fn resolve_qualified_name(&self, simple_name: &str) -> Option<&str> {
        self.simple_to_qualified
            .get(simple_name)
            .map(String::as_str)
    }

    #[must_use]
    pub fn env(&self, id: EnvId) -> Option<&DeclEnv> {
        self.envs.get(id)
    }

    #[must_use]
    pub fn env_of(&self, fqn: &str) -> Option<EnvId> {
        self.env_by_fqn.get(fqn).copied()
    }

    /// Remember that `type_ref` was seen while `env` was the current scope.
    pub fn record_type_reference(&mut self, env: EnvId, type_ref: &str) {
        if let Some(node) = self.envs.get_mut(env) {
            node.observed_types.push(type_ref.to_string());
        }
    }

    /// Whether `type_ref` is legal in the scope of `env`: either it matches a
    /// declared/imported base name directly, or prefixing it with the
    /// enclosing environment chain produces one (a nested class referenced
    /// without qualification). Classes nested more than one level deep are
    /// assumed usable; no instantiation check is made for the levels between.
    #[must_use]
    pub fn is_declared_type(&self, type_ref: &str, env: EnvId) -> bool {
        if self.declared_base_names.contains(type_ref) {
            return true;
        }

        let chain = self.environment_chain(env, type_ref);
        if chain.is_empty() {
            return false;
        }
        let qualified = format!("{}.{type_ref}", chain.join("."));
        self.declared_base_names.contains(&qualified)
    }

    /// Enclosing environment names, outermost first, skipping any segment
    /// that equals the referenced type itself.
    fn environment_chain(&self, env: EnvId, type_ref: &str) -> Vec<&str> {
        let mut names = Vec::new();
        let mut current = self.envs.get(env);
        while let Some(node) = current {
            if node.name != type_ref {
                names.push(node.name.as_str());
            }
            current = node.parent.and_then(|id| self.envs.get(id));
        }
        names.reverse();
        names
    }

    /// `fqn` with the registry's package prefix stripped, when it applies.
    fn base_name<'a>(&self, fqn: &'a str) -> &'a str {
        match &self.package {
            Some(package) => fqn
                .strip_prefix(package.as_str())
                .and_then(|rest| rest.strip_prefix('.'))
                .unwrap_or(fqn),
            None => fqn,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_simple_names_to_qualified_ones() {
        let mut registry = ClassRegistry::new();
        registry.set_package("edu.example");
        registry.register_class("Foo", "edu.example.Foo", None);

        assert_eq!(
            registry.resolve_qualified_name("Foo"),
            Some("edu.example.Foo")
        );
        assert_eq!(registry.resolve_qualified_name("Bar"), None);
    }

    #[test]
    fn nested_references_resolve_through_the_enclosing_chain() {
        let mut registry = ClassRegistry::new();
        registry.set_package("edu.example");
        let outer = registry.register_class("Outer", "edu.example.Outer", None);
        let inner = registry.register_class("Inner", "edu.example.Outer.Inner", Some(outer));

        // Base-name match from anywhere.
        assert!(registry.is_declared_type("Outer", outer));
        assert!(registry.is_declared_type("Outer.Inner", outer));
        // `Inner` written without qualification resolves from inside `Outer`
        // (the chain skips the segment equal to the reference itself).
        assert!(registry.is_declared_type("Inner", inner));
        assert!(registry.is_declared_type("Inner", outer));
        assert!(!registry.is_declared_type("Elsewhere", inner));
    }

    #[test]
    fn imports_expose_their_last_segment() {
        let mut registry = ClassRegistry::new();
        registry.set_package("edu.example");
        let env = registry.register_class("Foo", "edu.example.Foo", None);
        registry.register_import("java.util.List");

        assert!(registry.is_declared_type("List", env));
        assert_eq!(
            registry.resolve_qualified_name("List"),
            Some("java.util.List")
        );
    }
}
