//! Per-instance memoization store.
//!
//! Results are keyed by method name and the exact argument tuple, compared
//! by value equality (a documented contract, not reference identity). A
//! hit is key presence: `None` and `Void` results are stored and returned
//! like any other value. The store has no eviction; it lives and dies with
//! the presenter instance that owns it, and is never shared across
//! instances.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::interner::Name;
use crate::value::Value;

/// Cache key: the exact argument tuple of an invocation.
///
/// Implements `Borrow<[Value]>` so lookups take a `&[Value]` slice with no
/// allocation; the custom `Hash` matches the `[Value]` slice hash so the
/// `Borrow` contract holds.
#[derive(Clone, PartialEq, Eq)]
pub struct MemoKey(pub Vec<Value>);

impl Hash for MemoKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Vec<T>::hash delegates to the slice hash, matching Borrow<[Value]>.
        self.0.hash(state);
    }
}

impl Borrow<[Value]> for MemoKey {
    fn borrow(&self) -> &[Value] {
        &self.0
    }
}

/// Per-presenter-instance memoization cache.
///
/// The outer map is keyed by method name, the inner map by argument
/// tuple, so two methods invoked with identical arguments never share an
/// entry. Interior mutability via `RwLock` makes the read-check-write
/// cycle safe under concurrent first access to the same instance.
#[derive(Default)]
pub struct MemoCache {
    entries: RwLock<FxHashMap<Name, FxHashMap<MemoKey, Value>>>,
}

impl MemoCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        MemoCache::default()
    }

    /// Look up a cached result for `method` invoked with `args`.
    ///
    /// Zero-allocation: the argument slice is borrowed against the stored
    /// key via `Borrow<[Value]>`.
    pub fn get(&self, method: Name, args: &[Value]) -> Option<Value> {
        self.entries.read().get(&method)?.get(args).cloned()
    }

    /// Check whether an entry exists for `method` + `args`.
    pub fn contains(&self, method: Name, args: &[Value]) -> bool {
        self.entries
            .read()
            .get(&method)
            .is_some_and(|per_method| per_method.contains_key(args))
    }

    /// Store a result under `method` + `args`, overwriting any previous
    /// entry for the same key.
    pub fn store(&self, method: Name, args: &[Value], result: Value) {
        self.entries
            .write()
            .entry(method)
            .or_default()
            .insert(MemoKey(args.to_vec()), result);
    }

    /// Total number of cached entries across all methods.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .values()
            .map(FxHashMap::len)
            .sum()
    }

    /// Check if nothing has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for MemoCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoCache")
            .field("entries", &self.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests {
    use super::*;
    use crate::interner::StringInterner;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn store_then_get_hits() {
        let interner = StringInterner::new();
        let run = interner.intern("run");
        let cache = MemoCache::new();

        assert_eq!(cache.get(run, &[Value::Int(1)]), None);
        cache.store(run, &[Value::Int(1)], Value::string("far"));
        assert_eq!(cache.get(run, &[Value::Int(1)]), Some(Value::string("far")));
        assert_eq!(cache.get(run, &[Value::Int(2)]), None);
    }

    #[test]
    fn void_and_none_results_are_hits_by_key_presence() {
        let interner = StringInterner::new();
        let turkey = interner.intern("turkey");
        let find = interner.intern("find");
        let cache = MemoCache::new();

        cache.store(turkey, &[], Value::Void);
        cache.store(find, &[Value::Int(9)], Value::None);

        assert!(cache.contains(turkey, &[]));
        assert_eq!(cache.get(turkey, &[]), Some(Value::Void));
        assert_eq!(cache.get(find, &[Value::Int(9)]), Some(Value::None));
    }

    #[test]
    fn different_methods_never_share_entries() {
        let interner = StringInterner::new();
        let walk = interner.intern("walk");
        let run = interner.intern("run");
        let far = [Value::string("far")];
        let cache = MemoCache::new();

        cache.store(walk, &far, Value::string("Walking far!"));

        assert_eq!(cache.get(walk, &far), Some(Value::string("Walking far!")));
        assert_eq!(cache.get(run, &far), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn negative_zero_argument_hits_the_positive_zero_entry() {
        let interner = StringInterner::new();
        let scale = interner.intern("scale");
        let cache = MemoCache::new();

        cache.store(scale, &[Value::Float(0.0), Value::Int(7)], Value::Int(1));
        assert_eq!(
            cache.get(scale, &[Value::Float(-0.0), Value::Int(7)]),
            Some(Value::Int(1))
        );
    }

    #[test]
    fn keys_compare_by_value_not_identity() {
        let interner = StringInterner::new();
        let say = interner.intern("say");
        let cache = MemoCache::new();

        // Two separately-allocated but equal strings are the same key.
        cache.store(say, &[Value::string("apples")], Value::string("oranges"));
        assert_eq!(
            cache.get(say, &[Value::string("apples")]),
            Some(Value::string("oranges"))
        );
    }

    fn simple_value() -> impl Strategy<Value = Value> {
        prop_oneof![
            any::<i64>().prop_map(Value::Int),
            any::<bool>().prop_map(Value::Bool),
            ".{0,12}".prop_map(Value::string),
            Just(Value::Void),
            Just(Value::None),
        ]
    }

    proptest! {
        #[test]
        fn stored_tuples_always_hit(args in proptest::collection::vec(simple_value(), 0..4)) {
            let interner = StringInterner::new();
            let method = interner.intern("m");
            let cache = MemoCache::new();

            cache.store(method, &args, Value::Int(42));
            prop_assert_eq!(cache.get(method, &args), Some(Value::Int(42)));
        }
    }
}
