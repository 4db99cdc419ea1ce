//! Semantic model builder and code generator.
//!
//! A clean 2-pass lowering of class-based declarations to procedural C.
//!
//! ## Architecture
//!
//! - **Extraction**: flatten the front-end tree into immutable declarations
//! - **Pass 1 (Registration)**: register every class name as a placeholder
//! - **Pass 2 (Resolution)**: resolve classes in dependency order, then free
//!   functions and file-scope variables
//! - **Emission**: deterministic text generation from the resolved model
//!
//! ## Modules
//!
//! - [`extract`]: declaration extraction from the parse tree
//! - [`model`]: resolved model types and the class state machine
//! - [`registry`]: the per-unit, append-only class model arena
//! - [`type_map`]: source-to-target type mapping with fallback
//! - [`mangle`]: emitted-name synthesis and overload signature identity
//! - [`passes`]: the two model builder passes
//! - [`emit`]: the code generator

pub mod emit;
pub mod extract;
pub mod mangle;
pub mod model;
pub mod passes;
pub mod registry;
pub mod type_map;

pub use emit::CodeGenerator;
pub use extract::extract;
pub use mangle::SignatureHash;
pub use model::{
    ClassModel, ClassState, CtorSlot, FunctionModel, GlobalModel, LayoutField, MethodSlot,
    ResolvedParam, SemanticModel, SignatureKey, SkipReason, StaticField,
};
pub use passes::{RegistrationPass, ResolutionPass};
pub use registry::ModelRegistry;
pub use type_map::TypeMapper;

use declassify_core::{Declaration, Diagnostics, ExtractError, Options, ParseNode};

/// Build the full semantic model for one unit's declaration tree.
///
/// Runs extraction and both builder passes. Localized failures (skipped
/// classes, dropped members) land in `diags`; only a structurally invalid
/// tree returns an error.
pub fn build_model(
    tree: &[ParseNode],
    options: &Options,
    diags: &mut Diagnostics,
) -> Result<SemanticModel, ExtractError> {
    let decls = extract::extract(tree, diags)?;
    build_from_declarations(&decls, options, diags)
}

/// Build the semantic model from already-extracted declarations.
pub fn build_from_declarations(
    decls: &[Declaration],
    options: &Options,
    diags: &mut Diagnostics,
) -> Result<SemanticModel, ExtractError> {
    let mut registry = ModelRegistry::new();
    RegistrationPass::new(&mut registry).run(decls)?;
    let mapper = ResolutionPass::new(decls, &mut registry, options).run(diags);

    let functions = passes::resolution::resolve_functions(decls, &registry, &mapper, diags);
    let globals = passes::resolution::resolve_globals(decls, &registry, &mapper, diags);
    let enums = decls
        .iter()
        .filter_map(|d| match d {
            Declaration::Enum(e) => Some(e.clone()),
            _ => None,
        })
        .collect();

    Ok(SemanticModel {
        registry,
        functions,
        enums,
        globals,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_model_runs_both_passes() {
        let mut diags = Diagnostics::new();
        let tree = vec![
            ParseNode::class("Sensor")
                .with_base("Device")
                .with_member(ParseNode::field("value", "float")),
            ParseNode::class("Device").with_member(ParseNode::field("id", "int")),
            ParseNode::enumeration("Mode").with_member(ParseNode::enumerator("OFF", 0)),
            ParseNode::variable("ticks", "int"),
        ];

        let model = build_model(&tree, &Options::default(), &mut diags).unwrap();
        assert_eq!(model.registry.len(), 2);
        assert!(model.registry.get("Sensor").unwrap().is_resolved());
        assert_eq!(model.enums.len(), 1);
        assert_eq!(model.globals.len(), 1);
        assert!(!diags.has_fatal());
    }

    #[test]
    fn malformed_tree_aborts_the_build() {
        let mut diags = Diagnostics::new();
        let tree = vec![ParseNode::class("LED"), ParseNode::class("LED")];
        // Extraction succeeds; registration rejects the duplicate.
        let err = build_model(&tree, &Options::default(), &mut diags).unwrap_err();
        assert_eq!(err, ExtractError::DuplicateClass { name: "LED".into() });
    }
}
