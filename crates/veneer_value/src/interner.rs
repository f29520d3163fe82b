//! String interner for method, class, and role names.
//!
//! Provides O(1) interning and lookup with thread-safe access. Interned
//! strings are leaked, so lookups return `&'static str` and a `Name` stays
//! valid for the life of the process.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::Arc;

/// Interned string handle.
///
/// Cheap to copy, compare, and hash; the backing string is resolved
/// through the interner that produced it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct Name(u32);

impl Name {
    /// The pre-interned empty string.
    pub const EMPTY: Name = Name(0);

    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Error when interning a string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternError {
    /// Interner exceeded capacity (over 4 billion strings).
    Overflow { count: usize },
}

impl fmt::Display for InternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InternError::Overflow { count } => write!(
                f,
                "interner exceeded capacity: {count} strings, max is {}",
                u32::MAX
            ),
        }
    }
}

impl std::error::Error for InternError {}

struct InternInner {
    /// Map from string content to index.
    map: FxHashMap<&'static str, u32>,
    /// Storage for string contents.
    strings: Vec<&'static str>,
}

impl InternInner {
    fn with_empty() -> Self {
        let mut inner = InternInner {
            map: FxHashMap::default(),
            strings: Vec::with_capacity(64),
        };
        // Pre-intern the empty string at index 0
        let empty: &'static str = "";
        inner.map.insert(empty, 0);
        inner.strings.push(empty);
        inner
    }

    fn insert_leaked(&mut self, leaked: &'static str) -> Result<Name, InternError> {
        let idx = u32::try_from(self.strings.len()).map_err(|_| InternError::Overflow {
            count: self.strings.len(),
        })?;
        self.strings.push(leaked);
        self.map.insert(leaked, idx);
        Ok(Name(idx))
    }
}

/// Thread-safe string interner.
///
/// Uses an `RwLock` so the common already-interned case takes only a read
/// lock; insertion takes the write lock and re-checks before inserting.
pub struct StringInterner {
    inner: RwLock<InternInner>,
}

impl StringInterner {
    /// Create a new interner with the empty string pre-interned.
    pub fn new() -> Self {
        StringInterner {
            inner: RwLock::new(InternInner::with_empty()),
        }
    }

    /// Try to intern a string, returning its `Name` or an error on overflow.
    #[inline]
    pub fn try_intern(&self, s: &str) -> Result<Name, InternError> {
        // Fast path: check if already interned
        {
            let guard = self.inner.read();
            if let Some(&idx) = guard.map.get(s) {
                return Ok(Name(idx));
            }
        }

        let mut guard = self.inner.write();

        // Double-check after acquiring the write lock
        if let Some(&idx) = guard.map.get(s) {
            return Ok(Name(idx));
        }

        // Leak the string to get a 'static lifetime
        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        guard.insert_leaked(leaked)
    }

    /// Intern a string, returning its `Name`.
    ///
    /// # Panics
    /// Panics if the interner exceeds capacity. Use `try_intern` for
    /// fallible interning.
    #[inline]
    pub fn intern(&self, s: &str) -> Name {
        self.try_intern(s).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Intern an owned `String`, avoiding the extra allocation that
    /// `intern(&s)` would perform when the string is new.
    ///
    /// # Panics
    /// Panics if the interner exceeds capacity.
    pub fn intern_owned(&self, s: String) -> Name {
        {
            let guard = self.inner.read();
            if let Some(&idx) = guard.map.get(s.as_str()) {
                return Name(idx);
            }
        }

        let mut guard = self.inner.write();

        if let Some(&idx) = guard.map.get(s.as_str()) {
            return Name(idx);
        }

        let leaked: &'static str = Box::leak(s.into_boxed_str());
        guard
            .insert_leaked(leaked)
            .unwrap_or_else(|e| panic!("{e}"))
    }

    /// Look up a string's `Name` without interning it.
    ///
    /// Returns `None` if the string has never been interned. Useful for
    /// probing names that may not exist without growing the interner.
    pub fn get(&self, s: &str) -> Option<Name> {
        self.inner.read().map.get(s).copied().map(Name)
    }

    /// Look up the string for a `Name`.
    ///
    /// The reference is `'static` because interned strings are leaked and
    /// never deallocated.
    pub fn lookup(&self, name: Name) -> &'static str {
        let guard = self.inner.read();
        guard.strings[name.index()]
    }

    /// Get the number of interned strings.
    pub fn len(&self) -> usize {
        self.inner.read().strings.len()
    }

    /// Check if the interner only holds the empty string.
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

/// Trait for looking up interned string names.
///
/// Exists to avoid tight coupling: callers can accept any `StringLookup`
/// implementor without depending directly on `StringInterner`.
pub trait StringLookup {
    /// Look up the string for an interned name.
    fn lookup(&self, name: Name) -> &str;
}

impl StringLookup for StringInterner {
    fn lookup(&self, name: Name) -> &str {
        StringInterner::lookup(self, name)
    }
}

/// Shared interner for thread-safe name interning across the engine.
///
/// This newtype enforces that all shared interner handles go through this
/// type rather than a raw `Arc<StringInterner>`.
#[derive(Clone)]
pub struct SharedInterner(Arc<StringInterner>);

impl SharedInterner {
    /// Create a new shared interner.
    pub fn new() -> Self {
        SharedInterner(Arc::new(StringInterner::new()))
    }
}

impl Default for SharedInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Deref for SharedInterner {
    type Target = StringInterner;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
