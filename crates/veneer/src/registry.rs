//! Presenter type registry.
//!
//! The factory resolves derived type names ("EmployeePresenter",
//! "Scope::EmployeePresenter") against an explicit registry instead of a
//! global constant table. Namespaces nest: each `::` segment walks one
//! level down.

use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::Arc;

use crate::class::PresenterClass;

/// One level of the registry's namespace tree.
#[derive(Default)]
struct Namespace {
    types: FxHashMap<String, Arc<PresenterClass>>,
    children: FxHashMap<String, Namespace>,
}

/// Registry mapping qualified presenter type names to classes.
///
/// Populated up front and then shared read-only; registration is not
/// thread-safe and happens before the registry is wrapped for sharing.
#[derive(Default)]
pub struct PresenterRegistry {
    root: Namespace,
    count: usize,
}

impl PresenterRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        PresenterRegistry::default()
    }

    /// Register a class under a qualified name such as
    /// `"Scope::EmployeePresenter"`. A leading `::` is tolerated.
    /// Re-registering a name replaces the previous class.
    pub fn register(&mut self, qualified: &str, class: Arc<PresenterClass>) {
        let mut segments = segments_of(qualified);
        let Some(type_name) = segments.pop() else {
            return;
        };
        let mut node = &mut self.root;
        for segment in segments {
            node = node.children.entry(segment.to_string()).or_default();
        }
        if node.types.insert(type_name.to_string(), class).is_none() {
            self.count += 1;
        }
    }

    /// Resolve a qualified name to its registered class.
    pub fn resolve(&self, qualified: &str) -> Option<&Arc<PresenterClass>> {
        let mut segments = segments_of(qualified);
        let type_name = segments.pop()?;
        let mut node = &self.root;
        for segment in segments {
            node = node.children.get(segment)?;
        }
        node.types.get(type_name)
    }

    /// Number of registered classes.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Check whether anything is registered.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

fn segments_of(qualified: &str) -> Vec<&str> {
    let trimmed = qualified.strip_prefix("::").unwrap_or(qualified);
    trimmed.split("::").collect()
}

impl fmt::Debug for PresenterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PresenterRegistry")
            .field("count", &self.count)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "test code uses unwrap for brevity")]
mod tests {
    use super::*;
    use veneer_value::SharedInterner;

    fn class(name: &str, interner: &SharedInterner) -> Arc<PresenterClass> {
        PresenterClass::declare(name, interner)
            .presents_on("thing")
            .build()
            .unwrap()
    }

    #[test]
    fn register_and_resolve_top_level() {
        let interner = SharedInterner::default();
        let mut registry = PresenterRegistry::new();
        registry.register("EmployeePresenter", class("EmployeePresenter", &interner));

        assert!(registry.resolve("EmployeePresenter").is_some());
        assert!(registry.resolve("ManagerPresenter").is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn nested_namespaces_resolve_per_level() {
        let interner = SharedInterner::default();
        let mut registry = PresenterRegistry::new();
        registry.register(
            "Scope::EmployeePresenter",
            class("Scope::EmployeePresenter", &interner),
        );

        assert!(registry.resolve("Scope::EmployeePresenter").is_some());
        assert!(registry.resolve("EmployeePresenter").is_none());
        assert!(registry.resolve("Other::EmployeePresenter").is_none());
    }

    #[test]
    fn leading_root_anchor_is_tolerated() {
        let interner = SharedInterner::default();
        let mut registry = PresenterRegistry::new();
        registry.register("EmployeePresenter", class("EmployeePresenter", &interner));

        assert!(registry.resolve("::EmployeePresenter").is_some());
    }
}
