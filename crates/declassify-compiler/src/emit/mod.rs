//! Deterministic C text emission from the resolved model.
//!
//! Given the same model the output is byte-identical across runs: every
//! section iterates declaration or dependency order, never a hash map.

use std::fmt::Write;

use declassify_core::{EnumDecl, Options, TargetType};

use crate::model::{
    ClassModel, ClassState, FunctionModel, GlobalModel, MethodSlot, ResolvedParam, SemanticModel,
};
use crate::passes::resolution::EMBEDDED_BASE_FIELD;

/// Emits one translation unit as a single text blob.
pub struct CodeGenerator<'a> {
    options: &'a Options,
}

impl<'a> CodeGenerator<'a> {
    pub fn new(options: &'a Options) -> Self {
        Self { options }
    }

    /// Generate the unit's full output. Emitted classes transition to
    /// their terminal `Emitted` state.
    pub fn generate(&self, model: &mut SemanticModel) -> String {
        let mut out = String::new();
        self.emit_header(&mut out);

        for e in &model.enums {
            self.emit_enum(&mut out, e);
        }

        let class_names = model.registry.emission_names();
        for name in &class_names {
            let class = model.registry.get(name).expect("emission order is valid");
            self.emit_struct(&mut out, class);
        }

        self.emit_forward_decls(&mut out, &model.registry, &class_names, &model.functions);
        self.emit_static_storage(&mut out, &model.registry, &class_names);
        self.emit_globals(&mut out, &model.globals);

        for name in &class_names {
            let class = model.registry.get(name).expect("emission order is valid");
            self.emit_class_functions(&mut out, class);
        }

        let free: Vec<&FunctionModel> = model.functions.iter().filter(|f| !f.is_main).collect();
        if !free.is_empty() {
            out.push_str("// === Free functions ===\n\n");
            for function in free {
                self.emit_function(&mut out, function);
            }
        }
        if let Some(main) = model.functions.iter().find(|f| f.is_main) {
            out.push_str("// === Main function ===\n\n");
            self.emit_function(&mut out, main);
        }

        for name in &class_names {
            if let Some(class) = model.registry.get_mut(name) {
                class.state = ClassState::Emitted;
            }
        }
        out
    }

    fn emit_header(&self, out: &mut String) {
        out.push_str("/*\n");
        out.push_str(" * Procedural translation of class-based declarations.\n");
        out.push_str(" * Generated output; do not edit by hand.\n");
        out.push_str(" */\n\n");
        out.push_str("#include <stdint.h>\n");
        out.push_str("#include <stdbool.h>\n");
        out.push_str("#include <stddef.h>\n\n");
    }

    fn emit_enum(&self, out: &mut String, decl: &EnumDecl) {
        out.push_str("typedef enum {\n");
        for (name, value) in &decl.values {
            let _ = writeln!(out, "    {name} = {value},");
        }
        let _ = writeln!(out, "}} {};\n", decl.name);
    }

    fn emit_struct(&self, out: &mut String, class: &ClassModel) {
        let _ = writeln!(out, "typedef struct {} {{", class.name);
        for field in &class.layout_fields {
            let _ = writeln!(out, "    {} {};", field.ty.c_name(), field.name);
        }
        let _ = writeln!(out, "}} {};\n", class.name);
    }

    fn emit_forward_decls(
        &self,
        out: &mut String,
        registry: &crate::registry::ModelRegistry,
        class_names: &[String],
        functions: &[FunctionModel],
    ) {
        if class_names.is_empty() && functions.iter().all(|f| f.is_main) {
            return;
        }
        out.push_str("// === Forward declarations ===\n");
        for name in class_names {
            let class = registry.get(name).expect("emission order is valid");
            for line in self.class_signatures(class) {
                let _ = writeln!(out, "{line};");
            }
        }
        for function in functions.iter().filter(|f| !f.is_main) {
            let _ = writeln!(out, "{};", self.function_signature(function));
        }
        out.push('\n');
    }

    fn emit_static_storage(
        &self,
        out: &mut String,
        registry: &crate::registry::ModelRegistry,
        class_names: &[String],
    ) {
        let mut wrote_any = false;
        for name in class_names {
            let class = registry.get(name).expect("emission order is valid");
            for field in &class.static_fields {
                if !wrote_any {
                    out.push_str("// === Static storage ===\n");
                    wrote_any = true;
                }
                match field.ty.zero_literal() {
                    Some(zero) => {
                        let _ = writeln!(
                            out,
                            "static {} {} = {};",
                            field.ty.c_name(),
                            field.mangled,
                            zero
                        );
                    }
                    None => {
                        let _ = writeln!(out, "static {} {};", field.ty.c_name(), field.mangled);
                    }
                }
            }
        }
        if wrote_any {
            out.push('\n');
        }
    }

    fn emit_globals(&self, out: &mut String, globals: &[GlobalModel]) {
        if globals.is_empty() {
            return;
        }
        out.push_str("// === File-scope variables ===\n");
        for global in globals {
            match global.ty.zero_literal() {
                Some(zero) => {
                    let _ = writeln!(out, "{} {} = {};", global.ty.c_name(), global.name, zero);
                }
                None => {
                    let _ = writeln!(out, "{} {};", global.ty.c_name(), global.name);
                }
            }
        }
        out.push('\n');
    }

    fn emit_class_functions(&self, out: &mut String, class: &ClassModel) {
        let _ = writeln!(out, "// === Class {} ===\n", class.name);

        if class.ctors.is_empty() {
            self.emit_init(out, class, &format!("{}_init", class.name), &[], None);
        } else {
            for ctor in &class.ctors {
                self.emit_init(out, class, &ctor.mangled, &ctor.params, ctor.body.as_deref());
            }
        }

        for method in &class.methods {
            self.emit_method(out, class, method);
        }

        self.emit_cleanup(out, class);
    }

    /// The lifecycle opener: base init, zero-initialization of every field
    /// in declaration order, then the user constructor body.
    fn emit_init(
        &self,
        out: &mut String,
        class: &ClassModel,
        name: &str,
        params: &[ResolvedParam],
        body: Option<&str>,
    ) {
        let _ = writeln!(out, "void {name}({}) {{", self.instance_params(class, params));
        for field in &class.layout_fields {
            // The embedded base is the first layout field, so the base's own
            // init always runs before any derived field is touched.
            if let TargetType::Struct(field_class) = &field.ty {
                let _ = writeln!(
                    out,
                    "    {field_class}_init(&{}->{});",
                    self.options.instance_param, field.name
                );
            } else if let Some(zero) = field.ty.zero_literal() {
                let _ = writeln!(
                    out,
                    "    {}->{} = {};",
                    self.options.instance_param, field.name, zero
                );
            }
        }
        if let Some(body) = body {
            self.emit_body_lines(out, body);
        }
        out.push_str("}\n\n");
    }

    fn emit_method(&self, out: &mut String, class: &ClassModel, method: &MethodSlot) {
        let signature = self.method_signature(class, method);
        let _ = writeln!(out, "{signature} {{");
        match &method.body {
            Some(body) => self.emit_body_lines(out, body),
            None => self.emit_default_return(out, &method.return_type),
        }
        out.push_str("}\n\n");
    }

    /// The lifecycle closer: user body, owned struct fields in reverse
    /// declaration order, then the embedded base.
    fn emit_cleanup(&self, out: &mut String, class: &ClassModel) {
        let _ = writeln!(
            out,
            "void {}_cleanup({}) {{",
            class.name,
            self.instance_params(class, &[])
        );
        if let Some(body) = &class.dtor_body {
            self.emit_body_lines(out, body);
        }
        for field in class.layout_fields.iter().rev() {
            if field.name == EMBEDDED_BASE_FIELD && class.base.is_some() {
                continue;
            }
            if let TargetType::Struct(field_class) = &field.ty {
                let _ = writeln!(
                    out,
                    "    {field_class}_cleanup(&{}->{});",
                    self.options.instance_param, field.name
                );
            }
        }
        if let Some(base) = &class.base {
            let _ = writeln!(
                out,
                "    {base}_cleanup(&{}->{});",
                self.options.instance_param, EMBEDDED_BASE_FIELD
            );
        }
        out.push_str("}\n\n");
    }

    fn emit_function(&self, out: &mut String, function: &FunctionModel) {
        let _ = writeln!(out, "{} {{", self.function_signature(function));
        match &function.body {
            Some(body) => self.emit_body_lines(out, body),
            None => self.emit_default_return(out, &function.return_type),
        }
        out.push_str("}\n\n");
    }

    fn emit_body_lines(&self, out: &mut String, body: &str) {
        for line in body.lines() {
            let line = line.trim();
            if line.is_empty() {
                out.push('\n');
            } else {
                let _ = writeln!(out, "    {line}");
            }
        }
    }

    /// Functions without a body still return a value of their type.
    fn emit_default_return(&self, out: &mut String, return_type: &TargetType) {
        match return_type {
            TargetType::Void => {}
            TargetType::Struct(name) => {
                let _ = writeln!(out, "    {name} result;");
                let _ = writeln!(out, "    {name}_init(&result);");
                out.push_str("    return result;\n");
            }
            other => {
                let zero = other.zero_literal().unwrap_or("0");
                let _ = writeln!(out, "    return {zero};");
            }
        }
    }

    /// Every emitted signature of one class, in emission order.
    fn class_signatures(&self, class: &ClassModel) -> Vec<String> {
        let mut signatures = Vec::new();
        if class.ctors.is_empty() {
            signatures.push(format!(
                "void {}_init({})",
                class.name,
                self.instance_params(class, &[])
            ));
        } else {
            for ctor in &class.ctors {
                signatures.push(format!(
                    "void {}({})",
                    ctor.mangled,
                    self.instance_params(class, &ctor.params)
                ));
            }
        }
        for method in &class.methods {
            signatures.push(self.method_signature(class, method));
        }
        signatures.push(format!(
            "void {}_cleanup({})",
            class.name,
            self.instance_params(class, &[])
        ));
        signatures
    }

    fn method_signature(&self, class: &ClassModel, method: &MethodSlot) -> String {
        let params = if method.is_static {
            self.param_list(&method.params)
        } else {
            self.instance_params(class, &method.params)
        };
        format!(
            "{} {}({})",
            method.return_type.c_name(),
            method.mangled,
            params
        )
    }

    fn function_signature(&self, function: &FunctionModel) -> String {
        format!(
            "{} {}({})",
            function.return_type.c_name(),
            function.mangled,
            self.param_list(&function.params)
        )
    }

    /// Instance parameter first, then the declared parameters.
    fn instance_params(&self, class: &ClassModel, params: &[ResolvedParam]) -> String {
        let mut list = format!("{}* {}", class.name, self.options.instance_param);
        for param in params {
            let _ = write!(list, ", {} {}", param.ty.c_name(), param.name);
        }
        list
    }

    fn param_list(&self, params: &[ResolvedParam]) -> String {
        if params.is_empty() {
            return "void".to_string();
        }
        let mut list = String::new();
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                list.push_str(", ");
            }
            let _ = write!(list, "{} {}", param.ty.c_name(), param.name);
        }
        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_model;
    use declassify_core::{Diagnostics, Options, ParseNode};

    fn emit_tree(tree: Vec<ParseNode>) -> (String, Diagnostics) {
        let mut diags = Diagnostics::new();
        let options = Options::default();
        let mut model = build_model(&tree, &options, &mut diags).unwrap();
        let out = CodeGenerator::new(&options).generate(&mut model);
        (out, diags)
    }

    fn led_tree() -> Vec<ParseNode> {
        vec![ParseNode::class("LED")
            .with_member(ParseNode::field("pin", "int"))
            .with_member(ParseNode::field("state", "bool"))
            .with_member(ParseNode::constructor(vec![]))
            .with_member(
                ParseNode::method("isOn", "bool", vec![]).as_const().with_body("return self->state;"),
            )]
    }

    #[test]
    fn led_round_trip() {
        let (out, diags) = emit_tree(led_tree());
        assert!(!diags.has_fatal());

        assert!(out.contains("typedef struct LED {\n    int pin;\n    bool state;\n} LED;"));
        assert!(out.contains("void LED_init(LED* self) {\n    self->pin = 0;\n    self->state = false;\n}"));
        assert!(out.contains("bool LED_isOn(LED* self) {\n    return self->state;\n}"));
        assert!(out.contains("void LED_cleanup(LED* self) {\n}"));
    }

    #[test]
    fn derived_struct_embeds_base_first() {
        let (out, _) = emit_tree(vec![
            ParseNode::class("Device")
                .with_member(ParseNode::field("id", "int"))
                .with_member(ParseNode::field("enabled", "bool")),
            ParseNode::class("Sensor")
                .with_base("Device")
                .with_member(ParseNode::field("value", "float")),
        ]);

        assert!(out.contains("typedef struct Sensor {\n    Device base;\n    float value;\n} Sensor;"));
        assert!(out.contains("void Sensor_init(Sensor* self) {\n    Device_init(&self->base);\n    self->value = 0.0f;\n}"));
        assert!(out.contains("void Sensor_cleanup(Sensor* self) {\n    Device_cleanup(&self->base);\n}"));

        // Base struct is defined before the derived struct.
        let device_at = out.find("typedef struct Device").unwrap();
        let sensor_at = out.find("typedef struct Sensor").unwrap();
        assert!(device_at < sensor_at);
    }

    #[test]
    fn output_is_idempotent() {
        let (first, _) = emit_tree(led_tree());
        let (second, _) = emit_tree(led_tree());
        assert_eq!(first, second);
    }

    #[test]
    fn static_fields_become_file_scope_storage() {
        let (out, _) = emit_tree(vec![ParseNode::class("Counter")
            .with_member(ParseNode::field("total", "int").as_static())
            .with_member(ParseNode::field("value", "int"))
            .with_member(
                ParseNode::method("bump", "void", vec![])
                    .as_static()
                    .with_body("Counter_total++;"),
            )]);

        assert!(out.contains("static int Counter_total = 0;"));
        assert!(!out.contains("int total;"));
        // Static method takes no instance parameter.
        assert!(out.contains("void Counter_bump(void) {"));
    }

    #[test]
    fn enums_pass_through() {
        let (out, _) = emit_tree(vec![ParseNode::enumeration("Mode")
            .with_member(ParseNode::enumerator("OFF", 0))
            .with_member(ParseNode::enumerator("ON", 1))]);

        assert!(out.contains("typedef enum {\n    OFF = 0,\n    ON = 1,\n} Mode;"));
    }

    #[test]
    fn bodyless_method_returns_typed_default() {
        let (out, _) = emit_tree(vec![ParseNode::class("Probe")
            .with_member(ParseNode::method("read", "float", vec![]))]);

        assert!(out.contains("float Probe_read(Probe* self) {\n    return 0.0f;\n}"));
    }

    #[test]
    fn main_is_emitted_last_and_unmangled() {
        let (out, _) = emit_tree(vec![
            ParseNode::function("main", "int", vec![]).with_body("return 0;"),
            ParseNode::function("helper", "void", vec![]),
        ]);

        assert!(out.contains("int main(void) {\n    return 0;\n}"));
        let helper_at = out.rfind("void helper(void) {").unwrap();
        let main_at = out.rfind("int main(void) {").unwrap();
        assert!(helper_at < main_at);
    }

    #[test]
    fn skipped_classes_are_absent_from_output() {
        let (out, diags) = emit_tree(vec![
            ParseNode::class("Tangle").with_base("Tangle"),
            ParseNode::class("Fine"),
        ]);

        assert!(!out.contains("Tangle"));
        assert!(out.contains("typedef struct Fine"));
        assert!(diags.iter().any(|d| d.class.as_deref() == Some("Tangle")));
    }
}
