//! Capability contract for wrapped domain objects.
//!
//! The engine never duck-types: a wrapped object states its capabilities
//! through [`SubjectImpl::responds_to`] and is invoked through
//! [`SubjectImpl::call`]. The engine itself never mutates the subject;
//! all mutation, if any, happens inside the subject's own methods.

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::Arc;

use crate::errors::{delegation_not_found, PresentResult};
use crate::value::Value;

/// Callback argument to a method invocation.
///
/// A supplied block makes the invocation non-cacheable: it can have side
/// effects or depend on external state between calls, so it must always
/// re-execute.
pub type BlockFn = dyn Fn(&[Value]) -> PresentResult<Value> + Send + Sync;

/// Contract a wrapped domain object exposes to the engine.
pub trait SubjectImpl: Send + Sync {
    /// Runtime type name, used by the factory to derive presenter type
    /// names (`"{type_name}Presenter"`).
    fn type_name(&self) -> &str;

    /// Capability probe: does the object support `method`?
    fn responds_to(&self, method: &str) -> bool;

    /// Invoke `method` with `args` and an optional block.
    ///
    /// Calling an unsupported method returns the object's own
    /// "not understood" error; callers propagate it unchanged.
    fn call(
        &self,
        method: &str,
        args: &[Value],
        block: Option<&BlockFn>,
    ) -> PresentResult<Value>;
}

/// Shared, non-owning handle to a wrapped domain object.
///
/// Handles compare by identity: two handles are the same subject iff they
/// point at the same object.
#[derive(Clone)]
pub struct Subject(Arc<dyn SubjectImpl>);

impl Subject {
    /// Wrap a domain object in a shared handle.
    pub fn new(inner: impl SubjectImpl + 'static) -> Self {
        Subject(Arc::new(inner))
    }

    /// Wrap an existing shared domain object.
    pub fn from_arc(inner: Arc<dyn SubjectImpl>) -> Self {
        Subject(inner)
    }

    /// Identity of two subject handles.
    pub fn ptr_eq(a: &Subject, b: &Subject) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }

    /// Stable identity token, usable for hashing.
    pub fn token(&self) -> usize {
        Arc::as_ptr(&self.0).cast::<()>() as usize
    }
}

impl std::ops::Deref for Subject {
    type Target = dyn SubjectImpl;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}

impl fmt::Debug for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Subject({})", self.type_name())
    }
}

/// Map-backed subject: each method name maps to a fixed return value.
///
/// Invocations are counted per method, which is what the caching tests
/// assert on ("invoked at most once"). When a block is supplied, the
/// method yields its value to the block and returns the block's result.
pub struct MapSubject {
    type_name: String,
    methods: FxHashMap<String, Value>,
    calls: Mutex<FxHashMap<String, usize>>,
}

impl MapSubject {
    /// Create an empty subject with the given runtime type name.
    pub fn new(type_name: impl Into<String>) -> Self {
        MapSubject {
            type_name: type_name.into(),
            methods: FxHashMap::default(),
            calls: Mutex::new(FxHashMap::default()),
        }
    }

    /// Add a method returning a fixed value.
    #[must_use]
    pub fn with_method(mut self, name: impl Into<String>, value: Value) -> Self {
        self.methods.insert(name.into(), value);
        self
    }

    /// Number of times `method` has been invoked.
    pub fn call_count(&self, method: &str) -> usize {
        self.calls.lock().get(method).copied().unwrap_or(0)
    }
}

impl SubjectImpl for MapSubject {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn responds_to(&self, method: &str) -> bool {
        self.methods.contains_key(method)
    }

    fn call(
        &self,
        method: &str,
        _args: &[Value],
        block: Option<&BlockFn>,
    ) -> PresentResult<Value> {
        let Some(result) = self.methods.get(method) else {
            return Err(delegation_not_found(&self.type_name, method));
        };
        *self.calls.lock().entry(method.to_string()).or_insert(0) += 1;
        match block {
            Some(block) => block(&[result.clone()]),
            None => Ok(result.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn map_subject_calls_and_counts() {
        let subject = MapSubject::new("Employee")
            .with_method("speak", Value::string("Speaking!"));

        assert!(subject.responds_to("speak"));
        assert!(!subject.responds_to("fly"));

        let first = subject.call("speak", &[], None);
        assert_eq!(first, Ok(Value::string("Speaking!")));
        assert_eq!(subject.call_count("speak"), 1);
    }

    #[test]
    fn unsupported_method_errors_with_own_type_name() {
        let subject = MapSubject::new("Employee");
        let err = subject.call("fly", &[], None);
        assert_eq!(
            err,
            Err(delegation_not_found("Employee", "fly"))
        );
        assert_eq!(subject.call_count("fly"), 0);
    }

    #[test]
    fn block_receives_the_method_value() {
        let subject = MapSubject::new("Employee")
            .with_method("speak", Value::string("Speaking!"));

        let result = subject.call(
            "speak",
            &[],
            Some(&|yielded: &[Value]| Ok(yielded[0].clone())),
        );
        assert_eq!(result, Ok(Value::string("Speaking!")));
    }

    #[test]
    fn subject_handles_compare_by_identity() {
        let a = Subject::new(MapSubject::new("Employee"));
        let b = a.clone();
        let c = Subject::new(MapSubject::new("Employee"));

        assert!(Subject::ptr_eq(&a, &b));
        assert!(!Subject::ptr_eq(&a, &c));
        assert_eq!(a.token(), b.token());
    }
}
