//! Class declaration builder.
//!
//! `ClassBuilder` collects the presented role, accepted fields, declared
//! methods, and delegation stubs for a presenter class, validates the
//! declaration as a whole, and produces an immutable [`PresenterClass`].
//! All validation errors are reported from [`ClassBuilder::build`], so a
//! declaration can be assembled in any order.

use std::sync::Arc;

use veneer_value::{
    role_redeclared, unknown_declaration_options, BlockFn, PresentError, PresentResult,
    SharedInterner, Value,
};

use crate::class::PresenterClass;
use crate::presenter::Presenter;
use crate::table::{is_setter, DeclaredFn, MethodTable};

/// Builder for a presenter class declaration.
pub struct ClassBuilder {
    name: String,
    interner: SharedInterner,
    parent: Option<Arc<PresenterClass>>,
    role: Option<String>,
    accepts: Vec<String>,
    methods: Vec<(String, DeclaredFn)>,
    delegates: Vec<String>,
    unknown_options: Vec<String>,
}

impl ClassBuilder {
    pub(crate) fn new(
        name: &str,
        interner: SharedInterner,
        parent: Option<Arc<PresenterClass>>,
    ) -> Self {
        ClassBuilder {
            name: name.to_string(),
            interner,
            parent,
            role: None,
            accepts: Vec::new(),
            methods: Vec::new(),
            delegates: Vec::new(),
            unknown_options: Vec::new(),
        }
    }

    /// Declare the presented role.
    ///
    /// Exactly one role per class hierarchy: a subtype inherits its
    /// parent's role and calling this on a subtype builder makes
    /// [`build`](Self::build) fail.
    #[must_use]
    pub fn presents_on(mut self, role: &str) -> Self {
        self.role = Some(role.to_string());
        self
    }

    /// Declare an additional accepted constructor field.
    #[must_use]
    pub fn accepts(mut self, field: &str) -> Self {
        self.accepts.push(field.to_string());
        self
    }

    /// Declare a presentation method.
    pub fn method(
        mut self,
        name: &str,
        f: impl Fn(&Presenter, &[Value], Option<&BlockFn>) -> PresentResult<Value>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        self.methods.push((name.to_string(), Arc::new(f)));
        self
    }

    /// Declare an explicit delegation stub that forwards to the subject.
    #[must_use]
    pub fn delegates(mut self, name: &str) -> Self {
        self.delegates.push(name.to_string());
        self
    }

    /// Apply a keyword-style declaration option.
    ///
    /// `"accepts"` adds an accepted field. `"requiring"` is the retired
    /// spelling of the same option; it still works but logs a deprecation
    /// warning. Anything else is recorded and rejected at build time.
    #[must_use]
    pub fn option(mut self, key: &str, field: &str) -> Self {
        match key {
            "accepts" => self.accepts.push(field.to_string()),
            "requiring" => {
                tracing::warn!(
                    class = %self.name,
                    field,
                    "the 'requiring' declaration option is deprecated, use 'accepts'"
                );
                self.accepts.push(field.to_string());
            }
            _ => self.unknown_options.push(key.to_string()),
        }
        self
    }

    /// Validate the declaration and produce the class.
    pub fn build(self) -> PresentResult<Arc<PresenterClass>> {
        if !self.unknown_options.is_empty() {
            return Err(unknown_declaration_options(&self.name, self.unknown_options));
        }

        let (role, mut table, mut accepts) = match &self.parent {
            Some(parent) => {
                if let Some(role) = &self.role {
                    return Err(role_redeclared(&self.name, role));
                }
                (
                    parent.presents(),
                    parent.table().read().clone_declared(),
                    parent.accepts().to_vec(),
                )
            }
            None => {
                let Some(role) = &self.role else {
                    return Err(PresentError::new(format!(
                        "class '{}' declares no presented role",
                        self.name
                    )));
                };
                (self.interner.intern(role), MethodTable::new(), Vec::new())
            }
        };

        for field in &self.accepts {
            let name = self.interner.intern(field);
            if !accepts.contains(&name) {
                accepts.push(name);
            }
        }

        // The role accessor returns the live subject and must never be
        // served from cache.
        table.declare(
            role,
            true,
            Arc::new(|p, _, _| Ok(p.subject().clone())),
        );

        // Own declarations override anything inherited under the same name.
        for (name, f) in self.methods {
            let method = self.interner.intern(&name);
            table.redeclare(method, is_setter(&name), f);
        }

        for name in self.delegates {
            let method = self.interner.intern(&name);
            let forwarded = name.clone();
            table.redeclare(
                method,
                is_setter(&name),
                Arc::new(move |p, args, block| p.subject_call(&forwarded, args, block)),
            );
        }

        let class_name = self.interner.intern(&self.name);
        Ok(PresenterClass::from_parts(
            class_name,
            role,
            accepts,
            table,
            self.interner,
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "test code uses unwrap for brevity")]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use veneer_value::PresentErrorKind;

    fn interner() -> SharedInterner {
        SharedInterner::default()
    }

    #[test]
    fn builds_class_with_role_and_accepts() {
        let interner = interner();
        let class = PresenterClass::declare("EmployeePresenter", &interner)
            .presents_on("employee")
            .accepts("department")
            .option("accepts", "badge")
            .build()
            .unwrap();

        assert_eq!(class.name_str(), "EmployeePresenter");
        assert_eq!(class.presents_str(), "employee");
        assert_eq!(class.accepts().len(), 2);
    }

    #[test]
    fn requiring_behaves_like_accepts() {
        let interner = interner();
        let class = PresenterClass::declare("ProjectPresenter", &interner)
            .presents_on("project")
            .option("requiring", "owner")
            .build()
            .unwrap();

        let owner = interner.get("owner").unwrap();
        assert!(class.accepts().contains(&owner));
    }

    #[test]
    fn unknown_options_are_rejected_sorted() {
        let interner = interner();
        let err = PresenterClass::declare("BadPresenter", &interner)
            .presents_on("thing")
            .option("zeta", "x")
            .option("alpha", "y")
            .build()
            .unwrap_err();

        match err.kind {
            PresentErrorKind::UnknownDeclarationOptions { class, options } => {
                assert_eq!(class, "BadPresenter");
                assert_eq!(options, vec!["alpha".to_string(), "zeta".to_string()]);
            }
            other => panic!("unexpected error kind: {other:?}"),
        }
    }

    #[test]
    fn missing_role_is_rejected() {
        let interner = interner();
        let err = PresenterClass::declare("RolelessPresenter", &interner)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("no presented role"));
    }

    #[test]
    fn subtype_cannot_redeclare_role() {
        let interner = interner();
        let parent = PresenterClass::declare("VehiclePresenter", &interner)
            .presents_on("vehicle")
            .build()
            .unwrap();

        let err = PresenterClass::subclass(&parent, "CarPresenter")
            .presents_on("car")
            .build()
            .unwrap_err();

        assert!(matches!(err.kind, PresentErrorKind::RoleRedeclared { .. }));
    }

    #[test]
    fn subtype_inherits_role_and_methods() {
        let interner = interner();
        let parent = PresenterClass::declare("VehiclePresenter", &interner)
            .presents_on("vehicle")
            .method("wheels", |_, _, _| Ok(Value::Int(4)))
            .build()
            .unwrap();

        let child = PresenterClass::subclass(&parent, "CarPresenter")
            .build()
            .unwrap();

        assert_eq!(child.presents_str(), "vehicle");
        let wheels = interner.get("wheels").unwrap();
        assert!(child.table().read().contains(wheels));
    }
}
