//! Error types for the translation pipeline.
//!
//! The hierarchy mirrors the propagation policy: [`ResolveError`] values are
//! localized to one class, converted to diagnostics, and never escape the
//! resolution pass; [`ExtractError`] values invalidate the whole unit and
//! propagate to the caller as [`TranspileError`], with no partial output.

use thiserror::Error;

/// Structural invalidity in the declaration tree. Fatal for the whole unit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    /// A member kind appeared outside the scope that owns it.
    #[error("{kind} '{name}' appears outside of a {expected} scope")]
    OrphanMember {
        /// What was found (e.g. "method", "enumerator").
        kind: &'static str,
        /// The declared name, or a placeholder when anonymous.
        name: String,
        /// The scope that should have contained it.
        expected: &'static str,
    },

    /// A declaration that requires a name arrived without one.
    #[error("{kind} declaration has no name")]
    MissingName {
        /// The nameless declaration's kind.
        kind: &'static str,
    },

    /// Two classes in one unit share a name.
    #[error("class '{name}' is declared more than once in this unit")]
    DuplicateClass { name: String },
}

/// A condition that aborts a single class during resolution.
///
/// These never fail the unit; the class transitions to its skipped state and
/// the condition is recorded as a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// Two members of one class produced the same emitted name. Usually two
    /// overloads whose source types map to the same target type.
    #[error("'{member}' on '{class}' mangles to '{mangled}', which is already taken")]
    NameCollision {
        class: String,
        member: String,
        mangled: String,
    },

    /// The class sits on a base chain that refers back to itself.
    #[error("'{class}' participates in an inheritance cycle")]
    InheritanceCycle { class: String },

    /// The class declared more than one base.
    #[error("'{class}' declares {count} bases; only single inheritance is supported")]
    MultipleInheritance { class: String, count: usize },

    /// The declared base is unknown or was itself skipped.
    #[error("'{class}' extends '{base}', which is not available in this unit")]
    UnavailableBase { class: String, base: String },
}

/// The unified error type returned by the per-unit pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranspileError {
    /// The declaration tree was structurally invalid.
    #[error("malformed declaration tree: {0}")]
    MalformedInput(#[from] ExtractError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_error_display() {
        let err = ExtractError::OrphanMember {
            kind: "method",
            name: "isOn".into(),
            expected: "class",
        };
        assert_eq!(
            err.to_string(),
            "method 'isOn' appears outside of a class scope"
        );
    }

    #[test]
    fn resolve_error_display() {
        let err = ResolveError::NameCollision {
            class: "MathUtils".into(),
            member: "add".into(),
            mangled: "MathUtils_add_int_int".into(),
        };
        assert_eq!(
            err.to_string(),
            "'add' on 'MathUtils' mangles to 'MathUtils_add_int_int', which is already taken"
        );
    }

    #[test]
    fn transpile_error_wraps_extract() {
        let err: TranspileError = ExtractError::DuplicateClass { name: "LED".into() }.into();
        assert_eq!(
            err.to_string(),
            "malformed declaration tree: class 'LED' is declared more than once in this unit"
        );
    }
}
