use rigel_resolve::EnvId;

/// The class scope a traversal is currently inside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassScope {
    pub simple_name: String,
    pub fqn: String,
    pub env: EnvId,
    method: Option<String>,
}

/// Tracks the enclosing class and method while a traversal is in progress.
///
/// A pure stack discipline owned by the pass that created it, so re-entrant
/// or parallel analysis runs never share traversal state. The three traversal
/// states fall out of the stack shape: empty (outside any class), a top entry
/// without a method (inside a class), a top entry with one (inside a method).
#[derive(Debug, Default)]
pub struct ScopeStack {
    classes: Vec<ClassScope>,
}

impl ScopeStack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_class(&mut self, simple_name: &str, fqn: &str, env: EnvId) {
        self.classes.push(ClassScope {
            simple_name: simple_name.to_string(),
            fqn: fqn.to_string(),
            env,
            method: None,
        });
    }

    pub fn pop_class(&mut self) -> Option<ClassScope> {
        self.classes.pop()
    }

    pub fn enter_method(&mut self, name: &str) {
        if let Some(scope) = self.classes.last_mut() {
            scope.method = Some(name.to_string());
        }
    }

    pub fn leave_method(&mut self) {
        if let Some(scope) = self.classes.last_mut() {
            scope.method = None;
        }
    }

    #[must_use]
    pub fn current(&self) -> Option<&ClassScope> {
        self.classes.last()
    }

    #[must_use]
    pub fn current_method(&self) -> Option<&str> {
        self.classes.last().and_then(|scope| scope.method.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stack_states_track_class_and_method_nesting() {
        let mut scope = ScopeStack::new();
        assert!(scope.current().is_none());

        scope.push_class("Outer", "edu.example.Outer", 0);
        assert_eq!(scope.current().map(|s| s.fqn.as_str()), Some("edu.example.Outer"));
        assert_eq!(scope.current_method(), None);

        scope.enter_method("go");
        assert_eq!(scope.current_method(), Some("go"));

        scope.push_class("Inner", "edu.example.Outer.Inner", 1);
        // The inner class shadows the outer method scope.
        assert_eq!(scope.current_method(), None);

        let popped = scope.pop_class().unwrap();
        assert_eq!(popped.simple_name, "Inner");
        assert_eq!(scope.current_method(), Some("go"));

        scope.leave_method();
        assert_eq!(scope.current_method(), None);
    }
}
