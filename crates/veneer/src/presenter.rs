//! Presenter instances: memoizing dispatch and dynamic delegation.
//!
//! A `Presenter` wraps one subject value and dispatches method calls
//! through its class's method table. Results are memoized per instance
//! and per argument tuple; methods the class never declared are resolved
//! against the subject's capabilities and, on first success, promoted
//! into the class table so every instance dispatches them directly from
//! then on.

use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::Arc;

use veneer_value::{
    delegation_not_found, BlockFn, MemoCache, Name, PresentResult, SubjectImpl, Value,
};

use crate::class::PresenterClass;
use crate::table::{is_setter, MethodEntry};

/// A presenter instance: one subject, one private cache.
pub struct Presenter {
    class: Arc<PresenterClass>,
    subject: Value,
    fields: FxHashMap<Name, Value>,
    cache: MemoCache,
}

impl Presenter {
    pub(crate) fn from_parts(
        class: Arc<PresenterClass>,
        subject: Value,
        fields: FxHashMap<Name, Value>,
    ) -> Self {
        Presenter {
            class,
            subject,
            fields,
            cache: MemoCache::new(),
        }
    }

    /// The class this instance dispatches through.
    pub fn class(&self) -> &Arc<PresenterClass> {
        &self.class
    }

    /// The wrapped subject value.
    pub fn subject(&self) -> &Value {
        &self.subject
    }

    /// An accepted constructor field, if one was supplied.
    pub fn field(&self, name: &str) -> Option<&Value> {
        let name = self.class.interner().get(name)?;
        self.fields.get(&name)
    }

    /// Number of memoized results held by this instance.
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Invoke a method by name.
    ///
    /// Unknown names are only interned once the subject confirms it
    /// supports the method, so arbitrary unsupported names never grow
    /// the interner.
    #[tracing::instrument(level = "debug", skip(self, args, block), fields(class = self.class.name_str()))]
    pub fn call(
        &self,
        method: &str,
        args: &[Value],
        block: Option<&BlockFn>,
    ) -> PresentResult<Value> {
        if let Some(name) = self.class.interner().get(method) {
            if self.class.table().read().contains(name) {
                return self.call_name(name, args, block);
            }
        }
        if self.subject_responds_to(method) {
            let name = self.class.intern(method);
            return self.call_name(name, args, block);
        }
        Err(delegation_not_found(self.class.name_str(), method))
    }

    /// Invoke a method by interned name.
    pub fn call_name(
        &self,
        method: Name,
        args: &[Value],
        block: Option<&BlockFn>,
    ) -> PresentResult<Value> {
        let (entry, memoized) = self.resolve(method)?;
        // A block makes the call non-cacheable regardless of the entry.
        let memoize = memoized && block.is_none();

        if memoize {
            if let Some(hit) = self.cache.get(method, args) {
                return Ok(hit);
            }
        }

        let result = match entry {
            MethodEntry::Declared(f) => f(self, args, block),
            MethodEntry::Promoted => self.forward(method, args, block),
        }?;

        if memoize {
            self.cache.store(method, args, result.clone());
        }
        Ok(result)
    }

    /// Resolve a method name to a table entry, promoting a supported but
    /// uninstalled method on the way.
    ///
    /// Promotion takes the write lock and re-checks under it, so a race
    /// between two instances installs the entry exactly once.
    fn resolve(&self, method: Name) -> PresentResult<(MethodEntry, bool)> {
        {
            let table = self.class.table().read();
            if let Some(entry) = table.get(method) {
                return Ok((entry.clone(), table.is_memoized(method)));
            }
        }

        let name_str = self.class.lookup(method);
        if !self.subject_responds_to(name_str) {
            return Err(delegation_not_found(self.class.name_str(), name_str));
        }

        let mut table = self.class.table().write();
        if let Some(entry) = table.get(method) {
            return Ok((entry.clone(), table.is_memoized(method)));
        }
        let skip = is_setter(name_str);
        table.promote(method, skip);
        tracing::debug!(
            class = self.class.name_str(),
            method = name_str,
            "promoted delegated method"
        );
        Ok((MethodEntry::Promoted, !skip))
    }

    fn forward(
        &self,
        method: Name,
        args: &[Value],
        block: Option<&BlockFn>,
    ) -> PresentResult<Value> {
        self.subject_call(self.class.lookup(method), args, block)
    }

    /// Forward a call straight to the subject, bypassing the table and
    /// the cache. Declared delegation stubs route through here.
    pub fn subject_call(
        &self,
        method: &str,
        args: &[Value],
        block: Option<&BlockFn>,
    ) -> PresentResult<Value> {
        match self.subject.as_object() {
            Some(subject) => subject.call(method, args, block),
            None => Err(delegation_not_found(&self.subject.type_name(), method)),
        }
    }

    fn subject_responds_to(&self, method: &str) -> bool {
        self.subject
            .as_object()
            .is_some_and(|subject| subject.responds_to(method))
    }

    /// Whether this presenter understands `method`, either through an
    /// installed table entry or through its subject.
    pub fn understands(&self, method: &str) -> bool {
        if let Some(name) = self.class.interner().get(method) {
            if self.class.table().read().contains(name) {
                return true;
            }
        }
        self.subject_responds_to(method)
    }
}

/// Two presenters are equal when they share a class, wrap equal subjects,
/// and carry equal fields. Cache contents never participate.
impl PartialEq for Presenter {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.class, &other.class)
            && self.subject == other.subject
            && self.fields == other.fields
    }
}

impl SubjectImpl for Presenter {
    fn type_name(&self) -> &str {
        self.class.name_str()
    }

    fn responds_to(&self, method: &str) -> bool {
        self.understands(method)
    }

    fn call(
        &self,
        method: &str,
        args: &[Value],
        block: Option<&BlockFn>,
    ) -> PresentResult<Value> {
        Presenter::call(self, method, args, block)
    }
}

impl fmt::Debug for Presenter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Presenter")
            .field("class", &self.class.name_str())
            .field("subject", &self.subject)
            .field("cached", &self.cache.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "test code uses unwrap for brevity")]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use veneer_value::{MapSubject, SharedInterner, Subject};

    fn employee_class(interner: &SharedInterner) -> Arc<PresenterClass> {
        PresenterClass::declare("EmployeePresenter", interner)
            .presents_on("employee")
            .accepts("department")
            .method("title", |_, _, _| Ok(Value::string("Engineer")))
            .build()
            .unwrap()
    }

    fn wrap(class: &Arc<PresenterClass>, subject: MapSubject) -> Presenter {
        class
            .new_instance(vec![(
                "employee".to_string(),
                Value::object(Subject::new(subject)),
            )])
            .unwrap()
    }

    #[test]
    fn role_accessor_returns_live_subject_uncached() {
        let interner = SharedInterner::default();
        let class = employee_class(&interner);
        let presenter = wrap(&class, MapSubject::new("Employee"));

        let subject = presenter.call("employee", &[], None).unwrap();
        assert_eq!(&subject, presenter.subject());
        assert_eq!(presenter.cache_len(), 0);
    }

    #[test]
    fn declared_method_result_is_cached() {
        let interner = SharedInterner::default();
        let class = employee_class(&interner);
        let presenter = wrap(&class, MapSubject::new("Employee"));

        assert_eq!(
            presenter.call("title", &[], None).unwrap(),
            Value::string("Engineer")
        );
        assert_eq!(presenter.cache_len(), 1);
    }

    #[test]
    fn unsupported_method_errors_without_interning() {
        let interner = SharedInterner::default();
        let class = employee_class(&interner);
        let presenter = wrap(&class, MapSubject::new("Employee"));

        let before = interner.len();
        let err = presenter.call("levitate", &[], None).unwrap_err();
        assert_eq!(err.to_string(), "no method 'levitate' on EmployeePresenter");
        assert_eq!(interner.len(), before);
    }

    #[test]
    fn constructor_fields_are_retrievable() {
        let interner = SharedInterner::default();
        let class = employee_class(&interner);
        let presenter = class
            .new_instance(vec![
                (
                    "employee".to_string(),
                    Value::object(Subject::new(MapSubject::new("Employee"))),
                ),
                ("department".to_string(), Value::string("Platform")),
                ("ignored_extra".to_string(), Value::Int(7)),
            ])
            .unwrap();

        assert_eq!(presenter.field("department"), Some(&Value::string("Platform")));
        assert_eq!(presenter.field("ignored_extra"), None);
    }

    #[test]
    fn equality_ignores_cache_state() {
        let interner = SharedInterner::default();
        let class = employee_class(&interner);
        let shared = Subject::new(MapSubject::new("Employee"));

        let a = class
            .new_instance(vec![("employee".to_string(), Value::object(shared.clone()))])
            .unwrap();
        let b = class
            .new_instance(vec![("employee".to_string(), Value::object(shared))])
            .unwrap();

        a.call("title", &[], None).unwrap();
        assert_eq!(a, b);
    }
}
