//! Presenter class descriptors.
//!
//! A `PresenterClass` is the per-type half of the engine: the declared
//! role, the accepted constructor fields, and the shared method table
//! that declared and promoted methods live in. Instances are created
//! through [`PresenterClass::new_instance`] or the factory.

use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::Arc;

use veneer_value::{missing_constructor_args, Name, PresentResult, SharedInterner, Value};

use crate::declare::ClassBuilder;
use crate::presenter::Presenter;
use crate::shared::SharedMutableRegistry;
use crate::table::MethodTable;

/// Immutable descriptor of a presenter type.
///
/// The role name is fixed at declaration time and inherited unchanged by
/// subtypes. The method table is shared by all instances of the class,
/// which is what makes promotion type-wide.
pub struct PresenterClass {
    name: Name,
    role: Name,
    accepts: Vec<Name>,
    table: SharedMutableRegistry<MethodTable>,
    interner: SharedInterner,
}

impl PresenterClass {
    /// Start declaring a new presenter class.
    pub fn declare(name: &str, interner: &SharedInterner) -> ClassBuilder {
        ClassBuilder::new(name, interner.clone(), None)
    }

    /// Start declaring a subtype of `parent`.
    ///
    /// The subtype inherits the presented role, the accepted fields, and
    /// the declared methods; it gets its own method table, so promotion
    /// state stays per concrete type.
    pub fn subclass(parent: &Arc<PresenterClass>, name: &str) -> ClassBuilder {
        ClassBuilder::new(name, parent.interner.clone(), Some(Arc::clone(parent)))
    }

    pub(crate) fn from_parts(
        name: Name,
        role: Name,
        accepts: Vec<Name>,
        table: MethodTable,
        interner: SharedInterner,
    ) -> Arc<Self> {
        Arc::new(PresenterClass {
            name,
            role,
            accepts,
            table: SharedMutableRegistry::new(table),
            interner,
        })
    }

    /// The class name.
    pub fn name(&self) -> Name {
        self.name
    }

    /// The class name as a string.
    pub fn name_str(&self) -> &'static str {
        self.interner.lookup(self.name)
    }

    /// The declared role name (class-level, inherited by subtypes).
    pub fn presents(&self) -> Name {
        self.role
    }

    /// The declared role name as a string.
    pub fn presents_str(&self) -> &'static str {
        self.interner.lookup(self.role)
    }

    /// Additional accepted constructor field names, in declaration order.
    pub fn accepts(&self) -> &[Name] {
        &self.accepts
    }

    /// The shared method table.
    pub(crate) fn table(&self) -> &SharedMutableRegistry<MethodTable> {
        &self.table
    }

    /// The interner this class resolves names through.
    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    /// Intern a method or field name.
    pub fn intern(&self, s: &str) -> Name {
        self.interner.intern(s)
    }

    /// Resolve an interned name back to its string.
    pub fn lookup(&self, name: Name) -> &'static str {
        self.interner.lookup(name)
    }

    /// Construct a presenter instance from a field-name/value bundle.
    ///
    /// The presented-role value is mandatory; construction fails naming
    /// the role if it is absent. Accepted fields are optional, and
    /// entries for names the class does not accept are ignored.
    pub fn new_instance(
        self: &Arc<Self>,
        args: Vec<(String, Value)>,
    ) -> PresentResult<Presenter> {
        let role_str = self.presents_str();
        let mut subject = None;
        let mut fields = FxHashMap::default();

        for (key, value) in args {
            if key == role_str {
                subject = Some(value);
                continue;
            }
            if let Some(&name) = self.accepts.iter().find(|n| self.lookup(**n) == key) {
                fields.insert(name, value);
            }
        }

        let Some(subject) = subject else {
            return Err(missing_constructor_args(vec![role_str.to_string()]));
        };

        Ok(Presenter::from_parts(Arc::clone(self), subject, fields))
    }
}

impl fmt::Debug for PresenterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PresenterClass")
            .field("name", &self.name_str())
            .field("presents", &self.presents_str())
            .field("accepts", &self.accepts.len())
            .finish_non_exhaustive()
    }
}
