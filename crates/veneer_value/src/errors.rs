//! Structured errors for declaration, construction, delegation, and
//! resolution.
//!
//! `PresentErrorKind` provides typed error categories; factory functions
//! (e.g. `delegation_not_found()`) are the public API and populate both
//! `kind` and `message`. Every error here is fail-fast: the engine
//! performs no retries and no partial-failure recovery, and errors coming
//! back from a wrapped subject are propagated unchanged.

use std::fmt;

/// Result of a presenter operation.
pub type PresentResult<T> = Result<T, PresentError>;

/// Typed error category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PresentErrorKind {
    /// Unknown option passed to a presents-on declaration. Fatal at
    /// type-declaration time.
    UnknownDeclarationOptions {
        class: String,
        /// Sorted by the factory function.
        options: Vec<String>,
    },
    /// A required constructor argument was absent.
    MissingConstructorArgs {
        /// Sorted by the factory function.
        fields: Vec<String>,
    },
    /// A subtype attempted to re-declare the role inherited from its
    /// supertype.
    RoleRedeclared { class: String, role: String },
    /// Neither the presenter nor the wrapped subject supports the method.
    DelegationNotFound { type_name: String, method: String },
    /// The factory could not resolve a derived or overridden type name.
    PresenterNotFound { type_name: String },
    /// Catch-all for errors raised inside subject or handler code.
    Custom { message: String },
}

impl fmt::Display for PresentErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownDeclarationOptions { class, options } => {
                write!(
                    f,
                    "unknown declaration options for {class}: {}",
                    options.join(", ")
                )
            }
            Self::MissingConstructorArgs { fields } => {
                write!(f, "missing arguments: {}", fields.join(", "))
            }
            Self::RoleRedeclared { class, role } => {
                write!(f, "{class} cannot redeclare inherited role {role}")
            }
            Self::DelegationNotFound { type_name, method } => {
                write!(f, "no method '{method}' on {type_name}")
            }
            Self::PresenterNotFound { type_name } => {
                write!(f, "presenter type not found: {type_name}")
            }
            Self::Custom { message } => write!(f, "{message}"),
        }
    }
}

/// Presenter engine error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PresentError {
    /// Structured error category.
    pub kind: PresentErrorKind,
    /// Human-readable error message; for factory-created errors this
    /// equals `kind.to_string()`.
    pub message: String,
}

impl PresentError {
    /// Create an error with just a message.
    ///
    /// Uses `Custom` kind. Prefer the specific factory functions when a
    /// structured kind is available.
    pub fn new(message: impl Into<String>) -> Self {
        let msg = message.into();
        Self {
            kind: PresentErrorKind::Custom {
                message: msg.clone(),
            },
            message: msg,
        }
    }

    fn from_kind(kind: PresentErrorKind) -> Self {
        let message = kind.to_string();
        Self { kind, message }
    }
}

impl fmt::Display for PresentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for PresentError {}

/// Unknown option(s) passed to a presents-on declaration.
///
/// Options are reported sorted, comma-joined, all at once.
#[cold]
pub fn unknown_declaration_options(class: &str, mut options: Vec<String>) -> PresentError {
    options.sort();
    PresentError::from_kind(PresentErrorKind::UnknownDeclarationOptions {
        class: class.to_string(),
        options,
    })
}

/// Required constructor argument(s) absent, reported sorted in one error.
#[cold]
pub fn missing_constructor_args(mut fields: Vec<String>) -> PresentError {
    fields.sort();
    PresentError::from_kind(PresentErrorKind::MissingConstructorArgs { fields })
}

/// A subtype tried to re-declare its inherited presented role.
#[cold]
pub fn role_redeclared(class: &str, role: &str) -> PresentError {
    PresentError::from_kind(PresentErrorKind::RoleRedeclared {
        class: class.to_string(),
        role: role.to_string(),
    })
}

/// Method not understood by the receiver or its wrapped subject.
#[cold]
pub fn delegation_not_found(type_name: &str, method: &str) -> PresentError {
    PresentError::from_kind(PresentErrorKind::DelegationNotFound {
        type_name: type_name.to_string(),
        method: method.to_string(),
    })
}

/// Presenter type name could not be resolved by the factory.
#[cold]
pub fn presenter_not_found(type_name: &str) -> PresentError {
    PresentError::from_kind(PresentErrorKind::PresenterNotFound {
        type_name: type_name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_args_sorted_comma_joined() {
        let err = missing_constructor_args(vec!["baz".into(), "bar".into()]);
        assert_eq!(err.message, "missing arguments: bar, baz");
    }

    #[test]
    fn unknown_options_sorted() {
        let err = unknown_declaration_options(
            "EmployeePresenter",
            vec!["zeta".into(), "alpha".into()],
        );
        assert_eq!(
            err.message,
            "unknown declaration options for EmployeePresenter: alpha, zeta"
        );
    }

    #[test]
    fn delegation_and_resolution_errors_are_distinct() {
        let a = delegation_not_found("EmployeePresenter", "amount");
        let b = presenter_not_found("ObjectPresenter");
        assert_ne!(a.kind, b.kind);
        assert_eq!(a.message, "no method 'amount' on EmployeePresenter");
        assert_eq!(b.message, "presenter type not found: ObjectPresenter");
    }

    #[test]
    fn custom_error_round_trips_message() {
        let err = PresentError::new("boom");
        assert_eq!(err.to_string(), "boom");
        assert_eq!(
            err.kind,
            PresentErrorKind::Custom {
                message: "boom".into()
            }
        );
    }
}
