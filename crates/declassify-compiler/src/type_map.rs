//! Source-to-target type mapping.

use declassify_core::{
    normalize_spelling, DiagnosticCode, Diagnostics, Options, TargetType,
};
use rustc_hash::FxHashSet;

/// Maps source type spellings into the fixed target vocabulary.
///
/// The mapper consults the fixed primitive table first, then the set of
/// class names registered for this unit (self-referential struct types map
/// to themselves by identity). Anything else resolves to the configured
/// fallback integer and records a `TypeFallback` warning naming the
/// original spelling and the declaration site; mapping never fails.
#[derive(Debug)]
pub struct TypeMapper {
    classes: FxHashSet<String>,
    fallback: TargetType,
}

impl TypeMapper {
    /// Build a mapper over the unit's registered class names.
    pub fn new(classes: impl IntoIterator<Item = String>, options: &Options) -> Self {
        Self {
            classes: classes.into_iter().collect(),
            fallback: options.fallback_int.clone(),
        }
    }

    /// Whether a spelling names a registered class.
    pub fn is_class(&self, spelling: &str) -> bool {
        self.classes.contains(normalize_spelling(spelling))
    }

    /// The configured fallback integer type.
    pub fn fallback(&self) -> &TargetType {
        &self.fallback
    }

    /// Map a source spelling, attributing any fallback to `class`/`member`.
    pub fn map(
        &self,
        raw: &str,
        class: Option<&str>,
        member: Option<&str>,
        diags: &mut Diagnostics,
    ) -> TargetType {
        let spelling = normalize_spelling(raw);
        // Front-ends leave the return type blank on some callables.
        if spelling.is_empty() {
            return TargetType::Void;
        }
        if let Some(ty) = TargetType::from_source(spelling) {
            return ty;
        }
        if self.classes.contains(spelling) {
            return TargetType::Struct(spelling.to_string());
        }
        diags.report(
            DiagnosticCode::TypeFallback,
            class,
            member,
            format!(
                "unknown type '{raw}' defaulted to '{}'",
                self.fallback.c_name()
            ),
        );
        self.fallback.clone()
    }
}
