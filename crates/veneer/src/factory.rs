//! Convention-based presenter factory.
//!
//! Derives the presenter type name from the object's runtime type name
//! (`"{type_name}Presenter"`), resolves it in the registry, and
//! constructs the instance with the object bound to the class's declared
//! role. Collections are presented in place, element by element.

use veneer_value::{presenter_not_found, PresentResult, Subject, Value};

use crate::presenter::Presenter;
use crate::registry::PresenterRegistry;
use crate::shared::SharedRegistry;

/// Options for a factory call.
#[derive(Clone, Debug, Default)]
pub struct PresentOptions {
    as_type: Option<String>,
    fields: Vec<(String, Value)>,
}

impl PresentOptions {
    /// No overrides, no extra fields.
    pub fn new() -> Self {
        PresentOptions::default()
    }

    /// Override the base type name the presenter name is derived from.
    #[must_use]
    pub fn with_as(mut self, base: &str) -> Self {
        self.as_type = Some(base.to_string());
        self
    }

    /// Pass an extra constructor field through to the presenter class.
    #[must_use]
    pub fn with_field(mut self, name: &str, value: Value) -> Self {
        self.fields.push((name.to_string(), value));
        self
    }
}

/// Factory over a fully-populated registry.
#[derive(Clone, Debug)]
pub struct Factory {
    registry: SharedRegistry<PresenterRegistry>,
}

impl Factory {
    /// Create a factory over a populated registry.
    pub fn new(registry: PresenterRegistry) -> Self {
        Factory {
            registry: SharedRegistry::new(registry),
        }
    }

    /// Present one object.
    ///
    /// The presenter type name is `"{base}Presenter"`, where `base` is
    /// the object's runtime type name unless overridden through
    /// [`PresentOptions::with_as`]. The qualified name is appended as a
    /// whole, so namespaced type names resolve inside their namespace.
    pub fn present(&self, object: &Subject, options: PresentOptions) -> PresentResult<Presenter> {
        let base = match &options.as_type {
            Some(base) => base.clone(),
            None => object.type_name().to_string(),
        };
        let derived = format!("{base}Presenter");
        let Some(class) = self.registry.resolve(&derived) else {
            return Err(presenter_not_found(&derived));
        };

        let mut args = Vec::with_capacity(options.fields.len() + 1);
        args.push((
            class.presents_str().to_string(),
            Value::object(object.clone()),
        ));
        args.extend(options.fields);
        class.new_instance(args)
    }

    /// Present every element of a collection in place.
    ///
    /// Each slot is replaced with a presenter wrapping the element it
    /// held, so the caller's collection keeps its identity and order.
    /// Fails on the first unresolvable element, leaving earlier slots
    /// already presented.
    pub fn present_collection(
        &self,
        collection: &mut [Subject],
        options: &PresentOptions,
    ) -> PresentResult<()> {
        for slot in collection.iter_mut() {
            let presenter = self.present(slot, options.clone())?;
            *slot = Subject::new(presenter);
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "test code uses unwrap for brevity")]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use veneer_value::{MapSubject, PresentErrorKind, SharedInterner};

    use crate::class::PresenterClass;

    fn factory(interner: &SharedInterner) -> Factory {
        let employee = PresenterClass::declare("EmployeePresenter", interner)
            .presents_on("employee")
            .accepts("department")
            .build()
            .unwrap();
        let manager = PresenterClass::declare("ManagerPresenter", interner)
            .presents_on("manager")
            .build()
            .unwrap();
        let scoped = PresenterClass::declare("Scope::EmployeePresenter", interner)
            .presents_on("employee")
            .build()
            .unwrap();

        let mut registry = PresenterRegistry::new();
        registry.register("EmployeePresenter", employee);
        registry.register("ManagerPresenter", manager);
        registry.register("Scope::EmployeePresenter", scoped);
        Factory::new(registry)
    }

    #[test]
    fn derives_presenter_name_from_type_name() {
        let interner = SharedInterner::default();
        let factory = factory(&interner);
        let object = Subject::new(MapSubject::new("Employee"));

        let presenter = factory.present(&object, PresentOptions::new()).unwrap();
        assert_eq!(presenter.class().name_str(), "EmployeePresenter");
        assert_eq!(presenter.subject(), &Value::object(object));
    }

    #[test]
    fn as_override_changes_the_derived_name() {
        let interner = SharedInterner::default();
        let factory = factory(&interner);
        let object = Subject::new(MapSubject::new("Employee"));

        let presenter = factory
            .present(&object, PresentOptions::new().with_as("Manager"))
            .unwrap();
        assert_eq!(presenter.class().name_str(), "ManagerPresenter");
    }

    #[test]
    fn as_override_accepts_qualified_names() {
        let interner = SharedInterner::default();
        let factory = factory(&interner);
        let object = Subject::new(MapSubject::new("Employee"));

        let presenter = factory
            .present(&object, PresentOptions::new().with_as("Scope::Employee"))
            .unwrap();
        assert_eq!(presenter.class().name_str(), "Scope::EmployeePresenter");
    }

    #[test]
    fn namespaced_type_names_resolve() {
        let interner = SharedInterner::default();
        let factory = factory(&interner);
        let object = Subject::new(MapSubject::new("Scope::Employee"));

        let presenter = factory.present(&object, PresentOptions::new()).unwrap();
        assert_eq!(presenter.class().name_str(), "Scope::EmployeePresenter");
    }

    #[test]
    fn unresolvable_name_errors() {
        let interner = SharedInterner::default();
        let factory = factory(&interner);
        let object = Subject::new(MapSubject::new("Object"));

        let err = factory.present(&object, PresentOptions::new()).unwrap_err();
        assert!(matches!(
            err.kind,
            PresentErrorKind::PresenterNotFound { .. }
        ));
        assert_eq!(err.to_string(), "presenter type not found: ObjectPresenter");
    }

    #[test]
    fn extra_fields_pass_through_to_the_constructor() {
        let interner = SharedInterner::default();
        let factory = factory(&interner);
        let object = Subject::new(MapSubject::new("Employee"));

        let presenter = factory
            .present(
                &object,
                PresentOptions::new().with_field("department", Value::string("Platform")),
            )
            .unwrap();
        assert_eq!(
            presenter.field("department"),
            Some(&Value::string("Platform"))
        );
    }

    #[test]
    fn collection_is_presented_in_place() {
        let interner = SharedInterner::default();
        let factory = factory(&interner);
        let mut collection = vec![
            Subject::new(MapSubject::new("Employee")),
            Subject::new(MapSubject::new("Employee")),
        ];
        let originals: Vec<Subject> = collection.clone();

        factory
            .present_collection(&mut collection, &PresentOptions::new())
            .unwrap();

        for (slot, original) in collection.iter().zip(&originals) {
            assert_eq!(slot.type_name(), "EmployeePresenter");
            let wrapped = slot.call("employee", &[], None).unwrap();
            assert_eq!(wrapped, Value::object(original.clone()));
        }
    }
}
