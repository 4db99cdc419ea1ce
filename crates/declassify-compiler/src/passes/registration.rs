//! Registration pass (pass 1).
//!
//! Walks the extracted declarations and registers a placeholder model for
//! every class name. No layouts or members are resolved here; the point is
//! that pass 2 can tell a forward reference from a name that does not exist
//! at all. Duplicate class names make the unit structurally invalid.

use declassify_core::{Declaration, ExtractError};

use crate::model::ClassModel;
use crate::registry::ModelRegistry;

/// Output of the registration pass.
#[derive(Debug, Default)]
pub struct RegistrationOutput {
    /// Number of classes registered.
    pub classes_registered: usize,
}

/// Pass 1: register every class name with an empty placeholder.
pub struct RegistrationPass<'a> {
    registry: &'a mut ModelRegistry,
}

impl<'a> RegistrationPass<'a> {
    pub fn new(registry: &'a mut ModelRegistry) -> Self {
        Self { registry }
    }

    /// Run the pass over the unit's declarations.
    pub fn run(self, decls: &[Declaration]) -> Result<RegistrationOutput, ExtractError> {
        let mut output = RegistrationOutput::default();

        for decl in decls {
            if let Declaration::Class(class) = decl {
                if !self.registry.register(ClassModel::placeholder(&class.name)) {
                    return Err(ExtractError::DuplicateClass {
                        name: class.name.clone(),
                    });
                }
                output.classes_registered += 1;
            }
        }

        tracing::debug!(
            classes = output.classes_registered,
            "registered class placeholders"
        );
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use declassify_core::{ClassDecl, Diagnostics, ParseNode};

    fn class_decl(name: &str) -> Declaration {
        Declaration::Class(ClassDecl {
            name: name.into(),
            bases: vec![],
            fields: vec![],
            methods: vec![],
            ctors: vec![],
            dtor: None,
        })
    }

    #[test]
    fn registers_every_class() {
        let mut registry = ModelRegistry::new();
        let decls = vec![class_decl("Device"), class_decl("Sensor")];

        let output = RegistrationPass::new(&mut registry).run(&decls).unwrap();
        assert_eq!(output.classes_registered, 2);
        assert!(registry.contains("Device"));
        assert!(registry.contains("Sensor"));
    }

    #[test]
    fn duplicate_class_is_malformed() {
        let mut registry = ModelRegistry::new();
        let decls = vec![class_decl("LED"), class_decl("LED")];

        let err = RegistrationPass::new(&mut registry).run(&decls).unwrap_err();
        assert_eq!(err, ExtractError::DuplicateClass { name: "LED".into() });
    }

    #[test]
    fn forward_base_reference_is_visible_after_pass_one() {
        // Derived declared before its base; after registration both names
        // resolve even though neither has a layout yet.
        let mut diags = Diagnostics::new();
        let tree = vec![
            ParseNode::class("Sensor").with_base("Device"),
            ParseNode::class("Device"),
        ];
        let decls = crate::extract::extract(&tree, &mut diags).unwrap();

        let mut registry = ModelRegistry::new();
        RegistrationPass::new(&mut registry).run(&decls).unwrap();
        assert!(registry.contains("Device"));
        assert!(registry.contains("Sensor"));
    }
}
