//! Per-class method dispatch table.
//!
//! Each presenter class owns one table mapping method names to entries:
//! either a hand-written `Declared` handler or a `Promoted` marker for a
//! method installed on first successful delegation. Tables of distinct
//! classes never interact — two classes declaring methods of the same
//! name on different roles keep fully independent promotion and
//! memoization-exclusion state.

use rustc_hash::{FxHashMap, FxHashSet};
use std::fmt;
use std::sync::Arc;

use veneer_value::{BlockFn, Name, PresentResult, Value};

use crate::presenter::Presenter;

/// A hand-written presentation method body.
pub type DeclaredFn =
    Arc<dyn Fn(&Presenter, &[Value], Option<&BlockFn>) -> PresentResult<Value> + Send + Sync>;

/// A dispatch table entry.
#[derive(Clone)]
pub enum MethodEntry {
    /// Hand-written presentation method.
    Declared(DeclaredFn),
    /// Forwarding method installed on first successful delegated call;
    /// forwards all arguments (including any block) to the subject.
    Promoted,
}

impl fmt::Debug for MethodEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MethodEntry::Declared(_) => write!(f, "Declared(..)"),
            MethodEntry::Promoted => write!(f, "Promoted"),
        }
    }
}

/// Mutation-marker suffix check.
///
/// `name=` style setters are never memoized: caching a write would turn
/// later writes into silent no-ops. Comparison operators that merely end
/// in `=` are not setters.
pub(crate) fn is_setter(name: &str) -> bool {
    name.ends_with('=') && !matches!(name, "==" | "!=" | "<=" | ">=" | "===")
}

/// Dispatch table for one presenter class.
#[derive(Default)]
pub struct MethodTable {
    entries: FxHashMap<Name, MethodEntry>,
    /// Methods excluded from memoization: the role accessor and setters.
    no_memo: FxHashSet<Name>,
}

impl MethodTable {
    /// Create an empty table.
    pub fn new() -> Self {
        MethodTable::default()
    }

    /// Register a declared method.
    ///
    /// Registering a name that is already present is a no-op and returns
    /// `false`; this keeps wrapping idempotent when declarations or
    /// promotions re-trigger registration.
    pub fn declare(&mut self, name: Name, skip_memo: bool, f: DeclaredFn) -> bool {
        if self.entries.contains_key(&name) {
            return false;
        }
        self.entries.insert(name, MethodEntry::Declared(f));
        if skip_memo {
            self.no_memo.insert(name);
        }
        true
    }

    /// Install or replace a declared method.
    ///
    /// Used for a class's own declarations, which override entries
    /// inherited from a supertype.
    pub fn redeclare(&mut self, name: Name, skip_memo: bool, f: DeclaredFn) {
        self.entries.insert(name, MethodEntry::Declared(f));
        if skip_memo {
            self.no_memo.insert(name);
        } else {
            self.no_memo.remove(&name);
        }
    }

    /// Install a forwarding entry for a delegated method.
    ///
    /// Idempotent: promoting an already-present name is a no-op and
    /// returns `false`.
    pub fn promote(&mut self, name: Name, skip_memo: bool) -> bool {
        if self.entries.contains_key(&name) {
            return false;
        }
        self.entries.insert(name, MethodEntry::Promoted);
        if skip_memo {
            self.no_memo.insert(name);
        }
        true
    }

    /// Look up an entry by method name.
    pub fn get(&self, name: Name) -> Option<&MethodEntry> {
        self.entries.get(&name)
    }

    /// Check whether the table has an entry for `name`.
    pub fn contains(&self, name: Name) -> bool {
        self.entries.contains_key(&name)
    }

    /// Whether an installed method participates in memoization.
    pub fn is_memoized(&self, name: Name) -> bool {
        self.entries.contains_key(&name) && !self.no_memo.contains(&name)
    }

    /// Exclude a method from memoization after installation.
    pub fn skip_memo(&mut self, name: Name) {
        self.no_memo.insert(name);
    }

    /// Number of installed methods.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no methods are installed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy the declared entries (and their exclusion flags) for a
    /// subtype's table. Promoted entries are not inherited: promotion
    /// state is per concrete type.
    pub(crate) fn clone_declared(&self) -> MethodTable {
        let mut table = MethodTable::new();
        for (&name, entry) in &self.entries {
            if let MethodEntry::Declared(f) = entry {
                table.entries.insert(name, MethodEntry::Declared(Arc::clone(f)));
                if self.no_memo.contains(&name) {
                    table.no_memo.insert(name);
                }
            }
        }
        table
    }
}

impl fmt::Debug for MethodTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodTable")
            .field("entries", &self.entries.len())
            .field("no_memo", &self.no_memo.len())
            .finish()
    }
}
