//! Declaration extraction from the front-end tree.
//!
//! Flattens the scoped [`ParseNode`] tree into `Vec<Declaration>`,
//! preserving source order within each scope. Unsupported constructs are
//! reported and dropped so one untranslatable declaration never blocks the
//! rest of the unit; structural invalidity aborts the whole unit.

use declassify_core::{
    ClassDecl, CtorDecl, Declaration, DeclTraits, DiagnosticCode, Diagnostics, DtorDecl, EnumDecl,
    ExtractError, FieldDecl, FunctionDecl, MethodDecl, NodeKind, ParseNode, VariableDecl,
};

/// Extract the flat declaration list for one unit.
pub fn extract(
    nodes: &[ParseNode],
    diags: &mut Diagnostics,
) -> Result<Vec<Declaration>, ExtractError> {
    let mut decls = Vec::new();

    for node in nodes {
        match node.kind {
            NodeKind::Class => decls.push(Declaration::Class(extract_class(node, diags)?)),
            NodeKind::Function => {
                if node.name.is_empty() {
                    return Err(ExtractError::MissingName { kind: "function" });
                }
                decls.push(Declaration::Function(FunctionDecl {
                    name: node.name.clone(),
                    params: node.params.clone(),
                    return_type: node.type_str.clone(),
                    body: node.body.clone(),
                }));
            }
            NodeKind::Variable | NodeKind::Field => {
                if node.name.is_empty() {
                    return Err(ExtractError::MissingName { kind: "variable" });
                }
                decls.push(Declaration::Variable(VariableDecl {
                    name: node.name.clone(),
                    type_str: node.type_str.clone(),
                }));
            }
            NodeKind::Enum => decls.push(Declaration::Enum(extract_enum(node, diags)?)),
            NodeKind::Method | NodeKind::Constructor | NodeKind::Destructor => {
                return Err(ExtractError::OrphanMember {
                    kind: node.kind.describe(),
                    name: display_name(node),
                    expected: "class",
                });
            }
            NodeKind::Enumerator => {
                return Err(ExtractError::OrphanMember {
                    kind: "enumerator",
                    name: display_name(node),
                    expected: "enum",
                });
            }
            NodeKind::Template | NodeKind::Lambda | NodeKind::Typedef | NodeKind::Using => {
                report_unsupported(node, None, diags);
            }
        }
    }

    tracing::debug!(declarations = decls.len(), "extracted unit declarations");
    Ok(decls)
}

fn extract_class(node: &ParseNode, diags: &mut Diagnostics) -> Result<ClassDecl, ExtractError> {
    if node.name.is_empty() {
        return Err(ExtractError::MissingName { kind: "class" });
    }

    let mut class = ClassDecl {
        name: node.name.clone(),
        bases: node.bases.clone(),
        fields: Vec::new(),
        methods: Vec::new(),
        ctors: Vec::new(),
        dtor: None,
    };

    for member in &node.members {
        match member.kind {
            NodeKind::Field | NodeKind::Variable => {
                if member.name.is_empty() {
                    return Err(ExtractError::MissingName { kind: "field" });
                }
                class.fields.push(FieldDecl {
                    name: member.name.clone(),
                    type_str: member.type_str.clone(),
                    is_static: member.traits.contains(DeclTraits::STATIC),
                });
            }
            NodeKind::Method => {
                if member.name.is_empty() {
                    return Err(ExtractError::MissingName { kind: "method" });
                }
                class.methods.push(MethodDecl {
                    name: member.name.clone(),
                    params: member.params.clone(),
                    return_type: member.type_str.clone(),
                    is_const: member.traits.contains(DeclTraits::CONST),
                    is_static: member.traits.contains(DeclTraits::STATIC),
                    body: member.body.clone(),
                });
            }
            NodeKind::Constructor => {
                class.ctors.push(CtorDecl {
                    params: member.params.clone(),
                    body: member.body.clone(),
                });
            }
            NodeKind::Destructor => {
                if class.dtor.is_some() {
                    diags.report(
                        DiagnosticCode::UnsupportedConstruct,
                        Some(&class.name),
                        None,
                        "duplicate destructor dropped",
                    );
                    continue;
                }
                class.dtor = Some(DtorDecl {
                    body: member.body.clone(),
                });
            }
            NodeKind::Enumerator => {
                return Err(ExtractError::OrphanMember {
                    kind: "enumerator",
                    name: display_name(member),
                    expected: "enum",
                });
            }
            NodeKind::Class
            | NodeKind::Function
            | NodeKind::Enum
            | NodeKind::Template
            | NodeKind::Lambda
            | NodeKind::Typedef
            | NodeKind::Using => {
                report_unsupported(member, Some(&class.name), diags);
            }
        }
    }

    Ok(class)
}

fn extract_enum(node: &ParseNode, diags: &mut Diagnostics) -> Result<EnumDecl, ExtractError> {
    if node.name.is_empty() {
        return Err(ExtractError::MissingName { kind: "enum" });
    }

    let mut values = Vec::new();
    let mut next_value = 0i64;
    for member in &node.members {
        match member.kind {
            NodeKind::Enumerator => {
                if member.name.is_empty() {
                    return Err(ExtractError::MissingName { kind: "enumerator" });
                }
                let value = member.value.unwrap_or(next_value);
                next_value = value + 1;
                values.push((member.name.clone(), value));
            }
            _ => report_unsupported(member, Some(&node.name), diags),
        }
    }

    Ok(EnumDecl {
        name: node.name.clone(),
        values,
    })
}

fn report_unsupported(node: &ParseNode, class: Option<&str>, diags: &mut Diagnostics) {
    diags.report(
        DiagnosticCode::UnsupportedConstruct,
        class,
        Some(&display_name(node)),
        format!("{} is not translated and was dropped", node.kind.describe()),
    );
}

fn display_name(node: &ParseNode) -> String {
    if node.name.is_empty() {
        format!("<anonymous {}>", node.kind.describe())
    } else {
        node.name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use declassify_core::Param;

    #[test]
    fn flattens_in_source_order() {
        let mut diags = Diagnostics::new();
        let tree = vec![
            ParseNode::class("LED")
                .with_member(ParseNode::field("pin", "int"))
                .with_member(ParseNode::field("state", "bool"))
                .with_member(ParseNode::constructor(vec![]))
                .with_member(ParseNode::method("isOn", "bool", vec![]).as_const()),
            ParseNode::function("helper", "void", vec![]),
        ];

        let decls = extract(&tree, &mut diags).unwrap();
        assert_eq!(decls.len(), 2);
        let Declaration::Class(class) = &decls[0] else {
            panic!("expected class first");
        };
        assert_eq!(class.fields[0].name, "pin");
        assert_eq!(class.fields[1].name, "state");
        assert_eq!(class.ctors.len(), 1);
        assert_eq!(class.methods[0].name, "isOn");
        assert!(class.methods[0].is_const);
        assert!(diags.is_empty());
    }

    #[test]
    fn unsupported_kinds_are_dropped_not_fatal() {
        let mut diags = Diagnostics::new();
        let tree = vec![
            ParseNode::other(NodeKind::Template, "Container"),
            ParseNode::class("Kept"),
        ];

        let decls = extract(&tree, &mut diags).unwrap();
        assert_eq!(decls.len(), 1);
        assert_eq!(diags.warning_count(), 1);
        let record = diags.iter().next().unwrap();
        assert_eq!(record.code, DiagnosticCode::UnsupportedConstruct);
        assert_eq!(record.member.as_deref(), Some("Container"));
    }

    #[test]
    fn orphan_method_is_malformed_input() {
        let mut diags = Diagnostics::new();
        let tree = vec![ParseNode::method("stray", "void", vec![])];

        let err = extract(&tree, &mut diags).unwrap_err();
        assert_eq!(
            err,
            ExtractError::OrphanMember {
                kind: "method",
                name: "stray".into(),
                expected: "class",
            }
        );
    }

    #[test]
    fn nameless_class_is_malformed_input() {
        let mut diags = Diagnostics::new();
        let tree = vec![ParseNode::class("")];
        assert_eq!(
            extract(&tree, &mut diags).unwrap_err(),
            ExtractError::MissingName { kind: "class" }
        );
    }

    #[test]
    fn static_fields_keep_their_flag() {
        let mut diags = Diagnostics::new();
        let tree = vec![ParseNode::class("Counter")
            .with_member(ParseNode::field("total", "int").as_static())
            .with_member(ParseNode::field("value", "int"))];

        let decls = extract(&tree, &mut diags).unwrap();
        let Declaration::Class(class) = &decls[0] else {
            panic!("expected class");
        };
        assert!(class.fields[0].is_static);
        assert!(!class.fields[1].is_static);
    }

    #[test]
    fn enums_infer_missing_values() {
        let mut diags = Diagnostics::new();
        let tree = vec![ParseNode::enumeration("Mode")
            .with_member(ParseNode::enumerator("OFF", 0))
            .with_member(ParseNode::other(NodeKind::Enumerator, "ON"))
            .with_member(ParseNode::enumerator("BLINK", 10))];

        let decls = extract(&tree, &mut diags).unwrap();
        let Declaration::Enum(e) = &decls[0] else {
            panic!("expected enum");
        };
        assert_eq!(
            e.values,
            vec![("OFF".into(), 0), ("ON".into(), 1), ("BLINK".into(), 10)]
        );
    }

    #[test]
    fn methods_keep_params_and_bodies() {
        let mut diags = Diagnostics::new();
        let tree = vec![ParseNode::class("Sensor").with_member(
            ParseNode::method(
                "setReading",
                "void",
                vec![Param::named("value", "float")],
            )
            .with_body("self->value = value;"),
        )];

        let decls = extract(&tree, &mut diags).unwrap();
        let Declaration::Class(class) = &decls[0] else {
            panic!("expected class");
        };
        assert_eq!(class.methods[0].params[0].type_str, "float");
        assert_eq!(
            class.methods[0].body.as_deref(),
            Some("self->value = value;")
        );
    }
}
