//! Runtime values flowing through the presenter engine.
//!
//! `Value` is the argument and result currency of presenter method calls.
//! Equality is deep/by value everywhere except `Object`, which compares by
//! identity of the wrapped subject (opaque domain objects expose no
//! structural equality surface). `Hash` agrees with `Eq`, so argument
//! tuples can key memoization caches.
//!
//! All heap allocations go through factory methods on `Value`; the
//! `Heap<T>` wrapper has a private constructor, so external code cannot
//! create heap values directly.

mod heap;

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

pub use heap::Heap;

use crate::interner::Name;
use crate::subject::Subject;

/// Runtime value in the presenter engine.
#[derive(Clone)]
pub enum Value {
    // Primitives (inline, no heap allocation)
    /// Integer value.
    Int(i64),
    /// Floating-point value.
    Float(f64),
    /// Boolean value.
    Bool(bool),
    /// Interned atom, used for role, option, and field names.
    Symbol(Name),
    /// Void (unit) value.
    Void,

    // Heap types (use Heap<T> for enforced sharing)
    /// String value.
    Str(Heap<String>),
    /// List of values.
    List(Heap<Vec<Value>>),
    /// Map from string keys to values.
    Map(Heap<HashMap<String, Value>>),
    /// Tuple of values.
    Tuple(Heap<Vec<Value>>),

    // Algebraic types
    /// Option: Some(value).
    Some(Heap<Value>),
    /// Option: None.
    None,

    /// Opaque wrapped domain object.
    Object(Subject),
}

// Factory methods (the ONLY way to construct heap values)

impl Value {
    /// Create a string value.
    #[inline]
    pub fn string(s: impl Into<String>) -> Self {
        Value::Str(Heap::new(s.into()))
    }

    /// Create a list value.
    #[inline]
    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Heap::new(items))
    }

    /// Create a map value with String keys.
    #[inline]
    pub fn map(entries: HashMap<String, Value>) -> Self {
        Value::Map(Heap::new(entries))
    }

    /// Create a tuple value.
    #[inline]
    pub fn tuple(items: Vec<Value>) -> Self {
        Value::Tuple(Heap::new(items))
    }

    /// Create a Some value.
    #[inline]
    pub fn some(v: Value) -> Self {
        Value::Some(Heap::new(v))
    }

    /// Create an object value from a subject handle.
    #[inline]
    pub fn object(subject: Subject) -> Self {
        Value::Object(subject)
    }
}

// Accessors

impl Value {
    /// The value's runtime type name. For objects this is the subject's
    /// own type name, which the factory uses to derive presenter names.
    pub fn type_name(&self) -> Cow<'_, str> {
        match self {
            Value::Int(_) => Cow::Borrowed("int"),
            Value::Float(_) => Cow::Borrowed("float"),
            Value::Bool(_) => Cow::Borrowed("bool"),
            Value::Symbol(_) => Cow::Borrowed("symbol"),
            Value::Void => Cow::Borrowed("void"),
            Value::Str(_) => Cow::Borrowed("str"),
            Value::List(_) => Cow::Borrowed("list"),
            Value::Map(_) => Cow::Borrowed("map"),
            Value::Tuple(_) => Cow::Borrowed("tuple"),
            Value::Some(_) | Value::None => Cow::Borrowed("Option"),
            Value::Object(subject) => Cow::Borrowed(subject.type_name()),
        }
    }

    /// Borrow the string payload, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// The interned name, if this is a symbol.
    pub fn as_symbol(&self) -> Option<Name> {
        match self {
            Value::Symbol(name) => Some(*name),
            _ => None,
        }
    }

    /// Borrow the list payload, if this is a list.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Borrow the subject handle, if this is an object.
    pub fn as_object(&self) -> Option<&Subject> {
        match self {
            Value::Object(subject) => Some(subject),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Void, Value::Void) | (Value::None, Value::None) => true,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) | (Value::Tuple(a), Value::Tuple(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Some(a), Value::Some(b)) => a == b,
            // Opaque domain objects compare by identity of the handle.
            (Value::Object(a), Value::Object(b)) => Subject::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Eq for Value {}

impl std::hash::Hash for Value {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        // Discriminant tags distinguish variants
        std::mem::discriminant(self).hash(state);

        match self {
            Value::Int(n) => n.hash(state),
            // 0.0 == -0.0 under PartialEq, so both must hash alike
            Value::Float(f) => {
                let bits = f.to_bits();
                let bits = if bits == (-0.0_f64).to_bits() {
                    0.0_f64.to_bits()
                } else {
                    bits
                };
                bits.hash(state);
            }
            Value::Bool(b) => b.hash(state),
            Value::Symbol(name) => name.hash(state),
            Value::Void | Value::None => {}
            Value::Str(s) => s.hash(state),
            Value::List(items) | Value::Tuple(items) => {
                for item in items.iter() {
                    item.hash(state);
                }
            }
            Value::Map(m) => {
                m.len().hash(state);
                // Map iteration order varies, so sort keys for determinism
                let mut keys: Vec<_> = m.keys().collect();
                keys.sort();
                for k in keys {
                    k.hash(state);
                    m.get(k).hash(state);
                }
            }
            Value::Some(v) => v.hash(state),
            Value::Object(subject) => subject.token().hash(state),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "Int({n})"),
            Value::Float(x) => write!(f, "Float({x})"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Symbol(name) => write!(f, "Symbol({name:?})"),
            Value::Void => write!(f, "Void"),
            Value::Str(s) => write!(f, "Str({s:?})"),
            Value::List(items) => write!(f, "List({items:?})"),
            Value::Map(m) => write!(f, "Map({} entries)", m.len()),
            Value::Tuple(items) => write!(f, "Tuple({items:?})"),
            Value::Some(v) => write!(f, "Some({v:?})"),
            Value::None => write!(f, "None"),
            Value::Object(subject) => write!(f, "Object({})", subject.type_name()),
        }
    }
}
