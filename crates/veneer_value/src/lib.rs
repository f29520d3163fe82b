//! Veneer value layer - runtime values, interning, and errors.
//!
//! This crate provides the leaf types of the veneer presenter engine:
//!
//! - `StringInterner` / `Name`: interned method, class, and role names
//! - `Value`: the dynamic argument/result currency of presenter calls,
//!   with value equality and hashing suitable for cache keys
//! - `MemoCache` / `MemoKey`: the per-instance memoization store
//! - `PresentError`: the structured error taxonomy
//! - `Subject` / `SubjectImpl`: the capability contract wrapped domain
//!   objects expose to the engine

pub mod errors;
mod interner;
mod memo;
mod subject;
mod value;

pub use errors::{
    delegation_not_found, missing_constructor_args, presenter_not_found, role_redeclared,
    unknown_declaration_options, PresentError, PresentErrorKind, PresentResult,
};
pub use interner::{InternError, Name, SharedInterner, StringInterner, StringLookup};
pub use memo::{MemoCache, MemoKey};
pub use subject::{BlockFn, MapSubject, Subject, SubjectImpl};
pub use value::{Heap, Value};
