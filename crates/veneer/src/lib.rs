//! Veneer - a caching presenter engine.
//!
//! Presenters wrap domain objects behind a declared role and dispatch
//! method calls through an explicit per-class method table. Three things
//! happen on the way through:
//!
//! - results are memoized per instance, keyed by method name and the
//!   exact argument tuple
//! - methods the class never declared but the subject supports are
//!   promoted into the class table on first use, type-wide
//! - everything else is forwarded to the subject, with its errors
//!   propagated unchanged
//!
//! The [`Factory`] resolves presenter classes by naming convention
//! (`"{type_name}Presenter"`) against an explicit [`PresenterRegistry`].
//!
//! ```
//! use veneer::{MapSubject, PresenterClass, SharedInterner, Subject, Value};
//!
//! let interner = SharedInterner::default();
//! let class = PresenterClass::declare("EmployeePresenter", &interner)
//!     .presents_on("employee")
//!     .method("title", |_, _, _| Ok(Value::string("Engineer")))
//!     .build()?;
//!
//! let employee = Subject::new(MapSubject::new("Employee"));
//! let presenter = class.new_instance(vec![
//!     ("employee".to_string(), Value::object(employee)),
//! ])?;
//!
//! assert_eq!(presenter.call("title", &[], None)?, Value::string("Engineer"));
//! # Ok::<(), veneer::PresentError>(())
//! ```

mod class;
mod declare;
mod factory;
mod presenter;
mod registry;
mod shared;
mod table;

pub use class::PresenterClass;
pub use declare::ClassBuilder;
pub use factory::{Factory, PresentOptions};
pub use presenter::Presenter;
pub use registry::PresenterRegistry;
pub use shared::{SharedMutableRegistry, SharedRegistry};
pub use table::{DeclaredFn, MethodEntry, MethodTable};

pub use veneer_value::{
    delegation_not_found, missing_constructor_args, presenter_not_found, role_redeclared,
    unknown_declaration_options, BlockFn, Heap, MapSubject, MemoCache, MemoKey, Name,
    PresentError, PresentErrorKind, PresentResult, SharedInterner, StringInterner, StringLookup,
    Subject, SubjectImpl, Value,
};
