//! Class-to-procedural source translation.
//!
//! This crate is the facade over the pipeline: hand it a declaration tree
//! per translation unit (the shape produced by the external front-end) and
//! it returns the emitted C text plus the diagnostics gathered along the
//! way.
//!
//! ```
//! use declassify::{ParseNode, Transpiler};
//!
//! let tree = vec![ParseNode::class("LED")
//!     .with_member(ParseNode::field("pin", "int"))
//!     .with_member(ParseNode::field("state", "bool"))];
//!
//! let output = Transpiler::new().transpile_unit("led", &tree);
//! assert!(output.code.is_some());
//! assert!(!output.diagnostics.has_fatal());
//! ```
//!
//! Units are independent: [`Transpiler::transpile_units`] runs them on
//! worker threads, each with its own diagnostics sink, and returns the
//! outputs in input order.

use declassify_compiler::{build_model, CodeGenerator};
use declassify_core::TranspileError;

pub use declassify_compiler::{
    ClassModel, ClassState, ModelRegistry, SemanticModel, SignatureHash, SkipReason,
};
pub use declassify_core::{
    Declaration, DeclTraits, Diagnostic, DiagnosticCode, Diagnostics, NodeKind, Options, Param,
    ParseNode, Severity, SourceOperator, TargetType,
};

/// One translation unit's input: a name and its declaration tree.
#[derive(Debug, Clone)]
pub struct UnitSource {
    pub name: String,
    pub tree: Vec<ParseNode>,
}

impl UnitSource {
    pub fn new(name: impl Into<String>, tree: Vec<ParseNode>) -> Self {
        Self {
            name: name.into(),
            tree,
        }
    }
}

/// One translation unit's result.
///
/// `code` is either the complete emitted blob or `None` when the unit was
/// aborted; a partially emitted blob is never produced. The diagnostics
/// carry everything recorded for the unit, in order; callers decide exit
/// status from [`Diagnostics::has_fatal`].
#[derive(Debug)]
pub struct UnitOutput {
    pub name: String,
    pub code: Option<String>,
    pub diagnostics: Diagnostics,
}

impl UnitOutput {
    /// Whether the unit produced output without any fatal diagnostic.
    pub fn is_clean(&self) -> bool {
        self.code.is_some() && !self.diagnostics.has_fatal()
    }
}

/// The pipeline driver.
///
/// Holds the run configuration; each `transpile_unit` call is an
/// independent, side-effect-free run with its own registry and sink.
#[derive(Debug, Default, Clone)]
pub struct Transpiler {
    options: Options,
}

impl Transpiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: Options) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Run the full pipeline for one unit: extract, build, resolve, emit.
    pub fn transpile_unit(&self, name: &str, tree: &[ParseNode]) -> UnitOutput {
        let mut diagnostics = Diagnostics::new();
        let code = match build_model(tree, &self.options, &mut diagnostics) {
            Ok(mut model) => {
                let blob = CodeGenerator::new(&self.options).generate(&mut model);
                tracing::debug!(
                    unit = name,
                    classes = model.registry.len(),
                    bytes = blob.len(),
                    "unit emitted"
                );
                Some(blob)
            }
            Err(err) => {
                let err = TranspileError::from(err);
                tracing::debug!(unit = name, %err, "unit aborted");
                diagnostics.report(DiagnosticCode::MalformedInput, None, None, err.to_string());
                None
            }
        };
        UnitOutput {
            name: name.to_string(),
            code,
            diagnostics,
        }
    }

    /// Transpile several units, in parallel worker threads.
    ///
    /// Units never share state: each worker owns its unit's registry and
    /// diagnostics sink, so the only synchronization is joining the
    /// workers. Outputs come back in input order.
    pub fn transpile_units(&self, units: &[UnitSource]) -> Vec<UnitOutput> {
        std::thread::scope(|scope| {
            let handles: Vec<_> = units
                .iter()
                .map(|unit| scope.spawn(move || self.transpile_unit(&unit.name, &unit.tree)))
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().expect("transpile worker panicked"))
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_unit_produces_code_and_no_fatals() {
        let tree = vec![ParseNode::class("LED")
            .with_member(ParseNode::field("pin", "int"))
            .with_member(ParseNode::field("state", "bool"))];

        let output = Transpiler::new().transpile_unit("led", &tree);
        assert!(output.is_clean());
        assert!(output.code.unwrap().contains("typedef struct LED"));
    }

    #[test]
    fn malformed_unit_has_no_partial_output() {
        let tree = vec![ParseNode::method("stray", "void", vec![])];
        let output = Transpiler::new().transpile_unit("broken", &tree);
        assert!(output.code.is_none());
        assert!(output.diagnostics.has_fatal());
        assert!(output
            .diagnostics
            .fatals()
            .any(|d| d.code == DiagnosticCode::MalformedInput));
    }

    #[test]
    fn units_come_back_in_input_order() {
        let units: Vec<UnitSource> = (0..8)
            .map(|i| {
                UnitSource::new(
                    format!("unit{i}"),
                    vec![ParseNode::class(format!("Class{i}"))],
                )
            })
            .collect();

        let outputs = Transpiler::new().transpile_units(&units);
        assert_eq!(outputs.len(), 8);
        for (i, output) in outputs.iter().enumerate() {
            assert_eq!(output.name, format!("unit{i}"));
            assert!(output.code.as_deref().unwrap().contains(&format!("Class{i}")));
        }
    }

    #[test]
    fn one_bad_unit_does_not_fail_its_siblings() {
        let units = vec![
            UnitSource::new("good", vec![ParseNode::class("Fine")]),
            UnitSource::new("bad", vec![ParseNode::enumerator("loose", 0)]),
        ];

        let outputs = Transpiler::new().transpile_units(&units);
        assert!(outputs[0].is_clean());
        assert!(outputs[1].code.is_none());
    }
}
