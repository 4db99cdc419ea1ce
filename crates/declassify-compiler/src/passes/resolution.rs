//! Resolution pass (pass 2).
//!
//! Resolves each registered class in dependency order: the base (and any
//! embedded value types) first, then the layout, then the method table.
//! Cycle detection rides on the in-progress stack; a cyclic chain skips
//! every class on it and nothing else. Free functions and file-scope
//! variables are resolved after all classes so availability of struct
//! types is final.

use declassify_core::{
    operator_symbol, ClassDecl, Declaration, DiagnosticCode, Diagnostics, Options, Param,
    ResolveError, SourceOperator, TargetType,
};
use rustc_hash::FxHashMap;

use crate::mangle::{self, SignatureHash};
use crate::model::{
    ClassState, CtorSlot, FunctionModel, GlobalModel, LayoutField, MethodSlot, ResolvedParam,
    SignatureKey, SkipReason, StaticField,
};
use crate::registry::ModelRegistry;
use crate::type_map::TypeMapper;

/// Name given to the embedded base field. It occupies the first layout
/// slot, which keeps the base layout at offset zero of the derived struct.
pub const EMBEDDED_BASE_FIELD: &str = "base";

/// Pass 2: resolve classes in dependency order.
pub struct ResolutionPass<'a> {
    classes: FxHashMap<&'a str, &'a ClassDecl>,
    registry: &'a mut ModelRegistry,
    mapper: TypeMapper,
    /// Classes currently being resolved, outermost first.
    stack: Vec<String>,
}

impl<'a> ResolutionPass<'a> {
    pub fn new(
        decls: &'a [Declaration],
        registry: &'a mut ModelRegistry,
        options: &Options,
    ) -> Self {
        let names: Vec<String> = registry.names().map(str::to_owned).collect();
        let classes = decls
            .iter()
            .filter_map(|d| match d {
                Declaration::Class(c) => Some((c.name.as_str(), c)),
                _ => None,
            })
            .collect();
        Self {
            classes,
            registry,
            mapper: TypeMapper::new(names, options),
            stack: Vec::new(),
        }
    }

    /// Resolve every registered class. Skipped classes stay in the registry
    /// with their terminal state; resolved ones are appended to the
    /// registry's emission order, base before derived.
    pub fn run(mut self, diags: &mut Diagnostics) -> TypeMapper {
        let names: Vec<String> = self.registry.names().map(str::to_owned).collect();
        for name in &names {
            self.resolve(name, diags);
        }
        tracing::debug!(
            resolved = self.registry.iter().filter(|m| m.is_resolved()).count(),
            skipped = self.registry.iter().filter(|m| m.is_skipped()).count(),
            "class resolution finished"
        );
        self.mapper
    }

    /// Resolve one class, recursing into its dependencies first.
    /// Returns whether the class is usable by dependents.
    fn resolve(&mut self, name: &str, diags: &mut Diagnostics) -> bool {
        let Some(state) = self.registry.get(name).map(|m| m.state) else {
            return false;
        };
        match state {
            ClassState::MethodsResolved | ClassState::Emitted => return true,
            ClassState::Skipped(_) => return false,
            ClassState::BaseResolving => {
                self.mark_cycle(name, diags);
                return false;
            }
            ClassState::Registered | ClassState::FieldsResolved => {}
        }

        let Some(decl) = self.classes.get(name).copied() else {
            return false;
        };

        if decl.bases.len() > 1 {
            diags.report(
                DiagnosticCode::MultipleInheritanceUnsupported,
                Some(name),
                None,
                format!(
                    "declares {} bases; only single inheritance is supported",
                    decl.bases.len()
                ),
            );
            self.skip(name, SkipReason::MultipleInheritance);
            return false;
        }

        self.set_state(name, ClassState::BaseResolving);
        self.stack.push(name.to_owned());
        let result = self.resolve_class(decl, diags);
        self.stack.pop();

        // Cycle marking may already have moved this class to its terminal
        // state while an inner frame unwound.
        if self.registry.get(name).is_some_and(|m| m.is_skipped()) {
            return false;
        }

        match result {
            Ok(()) => {
                self.set_state(name, ClassState::MethodsResolved);
                self.registry.push_emission(name);
                tracing::trace!(class = name, "class resolved");
                true
            }
            Err(err) => {
                let (code, reason) = match &err {
                    ResolveError::NameCollision { .. } => {
                        (DiagnosticCode::NameCollision, SkipReason::NameCollision)
                    }
                    ResolveError::InheritanceCycle { .. } => {
                        (DiagnosticCode::InheritanceCycle, SkipReason::InheritanceCycle)
                    }
                    ResolveError::MultipleInheritance { .. } => (
                        DiagnosticCode::MultipleInheritanceUnsupported,
                        SkipReason::MultipleInheritance,
                    ),
                    ResolveError::UnavailableBase { .. } => (
                        DiagnosticCode::UnsupportedConstruct,
                        SkipReason::UnavailableBase,
                    ),
                };
                diags.report(code, Some(name), None, err.to_string());
                self.skip(name, reason);
                false
            }
        }
    }

    fn resolve_class(
        &mut self,
        decl: &ClassDecl,
        diags: &mut Diagnostics,
    ) -> Result<(), ResolveError> {
        let name = decl.name.as_str();

        // Base first, recursively.
        let base = decl.bases.first().cloned();
        if let Some(base_name) = &base {
            if !self.registry.contains(base_name) {
                return Err(ResolveError::UnavailableBase {
                    class: name.to_owned(),
                    base: base_name.clone(),
                });
            }
            if !self.resolve(base_name, diags) {
                // The cycle marker may have skipped us while unwinding; the
                // caller checks for that. Everything else is an unavailable
                // base.
                return Err(ResolveError::UnavailableBase {
                    class: name.to_owned(),
                    base: base_name.clone(),
                });
            }
        }

        // Layout: embedded base, then own fields in declaration order.
        // Statics leave the layout for file-scope storage.
        let mut layout = Vec::new();
        let mut statics = Vec::new();
        if let Some(base_name) = &base {
            layout.push(LayoutField {
                name: EMBEDDED_BASE_FIELD.to_owned(),
                ty: TargetType::Struct(base_name.clone()),
            });
        }
        for field in &decl.fields {
            // The embedded base owns the first layout slot and its name.
            if base.is_some() && !field.is_static && field.name == EMBEDDED_BASE_FIELD {
                return Err(ResolveError::NameCollision {
                    class: name.to_owned(),
                    member: field.name.clone(),
                    mangled: EMBEDDED_BASE_FIELD.to_owned(),
                });
            }
            let ty = self.field_type(&field.type_str, name, &field.name, diags);
            if field.is_static {
                statics.push(StaticField {
                    name: field.name.clone(),
                    mangled: mangle::static_field_name(name, &field.name),
                    ty,
                });
            } else {
                layout.push(LayoutField {
                    name: field.name.clone(),
                    ty,
                });
            }
        }

        {
            let model = self.registry.get_mut(name).expect("registered in pass 1");
            model.base = base.clone();
            model.layout_fields = layout;
            model.static_fields = statics;
            model.state = ClassState::FieldsResolved;
        }

        // Emitted names must be unique within the class scope; the table
        // tracks every name the class will own, lifecycle pair included.
        let mut used: FxHashMap<String, String> = FxHashMap::default();
        used.insert(mangle::dtor_name(name), "destructor".to_owned());

        // Constructors. The default (or first declared) one owns the bare
        // init name, the rest carry parameter suffixes.
        let primary = decl
            .ctors
            .iter()
            .position(|c| c.params.is_empty())
            .unwrap_or(0);
        let mut ctors = Vec::new();
        for (i, ctor) in decl.ctors.iter().enumerate() {
            let params = self.signature_params(&ctor.params, name, "<constructor>", diags);
            let types: Vec<TargetType> = params.iter().map(|p| p.ty.clone()).collect();
            let mangled = mangle::ctor_name(name, i == primary, &types);
            if used
                .insert(mangled.clone(), "constructor".to_owned())
                .is_some()
            {
                return Err(ResolveError::NameCollision {
                    class: name.to_owned(),
                    member: "<constructor>".to_owned(),
                    mangled,
                });
            }
            ctors.push(CtorSlot {
                mangled,
                params,
                body: ctor.body.clone(),
            });
        }
        if decl.ctors.is_empty() {
            used.insert(
                mangle::ctor_name(name, true, &[]),
                "synthesized constructor".to_owned(),
            );
        }

        // Static field storage shares the class's emitted name scope.
        let static_names: Vec<String> = self
            .registry
            .get(name)
            .expect("registered in pass 1")
            .static_fields
            .iter()
            .map(|s| s.mangled.clone())
            .collect();
        for mangled in static_names {
            if used.insert(mangled.clone(), "static field".to_owned()).is_some() {
                return Err(ResolveError::NameCollision {
                    class: name.to_owned(),
                    member: mangled.clone(),
                    mangled,
                });
            }
        }

        // Methods. Operator methods translate through the fixed table; an
        // operator without an entry is dropped with a warning. Overload
        // detection groups by the emitted word, so `operator+` and a method
        // named `add` share one overload set.
        let mut words: Vec<Option<(String, Option<SourceOperator>)>> = Vec::new();
        let mut word_counts: FxHashMap<String, usize> = FxHashMap::default();
        for method in &decl.methods {
            let entry = if let Some(symbol) = operator_symbol(&method.name) {
                match SourceOperator::from_symbol(symbol) {
                    Some(op) => Some((op.c_name().to_owned(), Some(op))),
                    None => {
                        diags.report(
                            DiagnosticCode::UnsupportedConstruct,
                            Some(name),
                            Some(&method.name),
                            format!("operator '{symbol}' has no translation and was dropped"),
                        );
                        None
                    }
                }
            } else {
                Some((method.name.clone(), None))
            };
            if let Some((word, _)) = &entry {
                *word_counts.entry(word.clone()).or_default() += 1;
            }
            words.push(entry);
        }

        let mut methods = Vec::new();
        let mut method_table = FxHashMap::default();
        for (method, entry) in decl.methods.iter().zip(&words) {
            let Some((word, operator)) = entry else {
                continue;
            };
            let params = self.signature_params(&method.params, name, &method.name, diags);
            let types: Vec<TargetType> = params.iter().map(|p| p.ty.clone()).collect();
            let return_type =
                self.signature_type(&method.return_type, name, &method.name, diags);
            let overloaded = word_counts[word] > 1;
            let mangled = mangle::method_name(name, word, overloaded, &types);
            if used.insert(mangled.clone(), word.clone()).is_some() {
                return Err(ResolveError::NameCollision {
                    class: name.to_owned(),
                    member: word.clone(),
                    mangled,
                });
            }
            method_table.insert(
                SignatureKey {
                    name: method.name.clone(),
                    sig: SignatureHash::method(word, &types),
                },
                mangled.clone(),
            );
            methods.push(MethodSlot {
                source_name: method.name.clone(),
                operator: *operator,
                mangled,
                params,
                return_type,
                is_static: method.is_static,
                is_const: method.is_const,
                body: method.body.clone(),
            });
        }

        let model = self.registry.get_mut(name).expect("registered in pass 1");
        model.methods = methods;
        model.method_table = method_table;
        model.has_user_ctors = !decl.ctors.is_empty();
        model.ctors = ctors;
        model.has_destructor = decl.dtor.is_some();
        model.dtor_body = decl.dtor.as_ref().and_then(|d| d.body.clone());
        Ok(())
    }

    /// Map a field type. Struct-typed fields pull their class in as a
    /// dependency so the embedded definition is emitted first; a field that
    /// would embed a class currently being resolved cannot be laid out and
    /// falls back.
    fn field_type(
        &mut self,
        raw: &str,
        class: &str,
        member: &str,
        diags: &mut Diagnostics,
    ) -> TargetType {
        let spelling = declassify_core::normalize_spelling(raw);
        if self.mapper.is_class(spelling) {
            if self.stack.iter().any(|n| n == spelling) {
                diags.report(
                    DiagnosticCode::TypeFallback,
                    Some(class),
                    Some(member),
                    format!(
                        "field would recursively embed '{spelling}'; defaulted to '{}'",
                        self.mapper.fallback().c_name()
                    ),
                );
                return self.mapper.fallback().clone();
            }
            if !self.resolve(spelling, diags) {
                diags.report(
                    DiagnosticCode::TypeFallback,
                    Some(class),
                    Some(member),
                    format!(
                        "field type '{spelling}' is not available; defaulted to '{}'",
                        self.mapper.fallback().c_name()
                    ),
                );
                return self.mapper.fallback().clone();
            }
            return TargetType::Struct(spelling.to_owned());
        }
        self.mapper.map(raw, Some(class), Some(member), diags)
    }

    /// Map a parameter or return type. Unlike fields, signatures may refer
    /// to the class being resolved (`operator+` takes its own type).
    fn signature_type(
        &mut self,
        raw: &str,
        class: &str,
        member: &str,
        diags: &mut Diagnostics,
    ) -> TargetType {
        let spelling = declassify_core::normalize_spelling(raw);
        if self.mapper.is_class(spelling) {
            if self.stack.iter().any(|n| n == spelling) || self.resolve(spelling, diags) {
                return TargetType::Struct(spelling.to_owned());
            }
            diags.report(
                DiagnosticCode::TypeFallback,
                Some(class),
                Some(member),
                format!(
                    "type '{spelling}' is not available; defaulted to '{}'",
                    self.mapper.fallback().c_name()
                ),
            );
            return self.mapper.fallback().clone();
        }
        self.mapper.map(raw, Some(class), Some(member), diags)
    }

    fn signature_params(
        &mut self,
        params: &[Param],
        class: &str,
        member: &str,
        diags: &mut Diagnostics,
    ) -> Vec<ResolvedParam> {
        params
            .iter()
            .enumerate()
            .map(|(i, p)| ResolvedParam {
                name: p.name.clone().unwrap_or_else(|| default_param_name(i)),
                ty: self.signature_type(&p.type_str, class, member, diags),
            })
            .collect()
    }

    /// Skip every class on the cyclic segment of the in-progress stack.
    fn mark_cycle(&mut self, name: &str, diags: &mut Diagnostics) {
        let pos = self.stack.iter().position(|n| n == name).unwrap_or(0);
        let cycle: Vec<String> = self.stack[pos..].to_vec();
        let mut chain = cycle.join(" -> ");
        chain.push_str(" -> ");
        chain.push_str(name);
        tracing::debug!(%chain, "dependency cycle detected");
        for member in &cycle {
            diags.report(
                DiagnosticCode::InheritanceCycle,
                Some(member),
                None,
                format!("dependency cycle: {chain}"),
            );
            self.skip(member, SkipReason::InheritanceCycle);
        }
    }

    fn set_state(&mut self, name: &str, state: ClassState) {
        if let Some(model) = self.registry.get_mut(name) {
            model.state = state;
        }
    }

    fn skip(&mut self, name: &str, reason: SkipReason) {
        if let Some(model) = self.registry.get_mut(name) {
            model.skip(reason);
        }
    }
}

/// Parameter names fall back to positional letters when the front-end
/// did not preserve one.
fn default_param_name(index: usize) -> String {
    if index < 26 {
        char::from(b'a' + index as u8).to_string()
    } else {
        format!("arg{index}")
    }
}

/// Map a type for use outside class resolution, where availability of
/// struct types is already final.
fn available_type(
    raw: &str,
    registry: &ModelRegistry,
    mapper: &TypeMapper,
    member: &str,
    diags: &mut Diagnostics,
) -> TargetType {
    let ty = mapper.map(raw, None, Some(member), diags);
    if let TargetType::Struct(class) = &ty {
        if !registry.get(class).is_some_and(|m| m.is_resolved()) {
            diags.report(
                DiagnosticCode::TypeFallback,
                None,
                Some(member),
                format!(
                    "type '{class}' is not available; defaulted to '{}'",
                    mapper.fallback().c_name()
                ),
            );
            return mapper.fallback().clone();
        }
    }
    ty
}

/// Resolve free functions: overload grouping, mangling, and the injectivity
/// check. A colliding overload set is dropped whole with a fatal
/// diagnostic; the rest of the unit proceeds.
pub fn resolve_functions(
    decls: &[Declaration],
    registry: &ModelRegistry,
    mapper: &TypeMapper,
    diags: &mut Diagnostics,
) -> Vec<FunctionModel> {
    let mut counts: FxHashMap<&str, usize> = FxHashMap::default();
    for decl in decls {
        if let Declaration::Function(f) = decl {
            *counts.entry(f.name.as_str()).or_default() += 1;
        }
    }

    let mut models = Vec::new();
    for decl in decls {
        let Declaration::Function(f) = decl else {
            continue;
        };
        let is_main = f.name == "main";
        let params: Vec<ResolvedParam> = f
            .params
            .iter()
            .enumerate()
            .map(|(i, p)| ResolvedParam {
                name: p.name.clone().unwrap_or_else(|| default_param_name(i)),
                ty: available_type(&p.type_str, registry, mapper, &f.name, diags),
            })
            .collect();
        let types: Vec<TargetType> = params.iter().map(|p| p.ty.clone()).collect();
        let return_type = available_type(&f.return_type, registry, mapper, &f.name, diags);
        let overloaded = !is_main && counts[f.name.as_str()] > 1;
        models.push(FunctionModel {
            mangled: mangle::function_name(&f.name, overloaded, &types),
            source_name: f.name.clone(),
            params,
            return_type,
            body: f.body.clone(),
            is_main,
        });
    }

    // Injectivity over the whole file scope.
    let mut seen: FxHashMap<&str, &str> = FxHashMap::default();
    let mut collided: Vec<String> = Vec::new();
    for model in &models {
        if let Some(&other) = seen.get(model.mangled.as_str()) {
            diags.report(
                DiagnosticCode::NameCollision,
                None,
                Some(&model.source_name),
                format!(
                    "overloads of '{}' and '{}' both mangle to '{}'",
                    other, model.source_name, model.mangled
                ),
            );
            collided.push(other.to_owned());
            collided.push(model.source_name.clone());
        } else {
            seen.insert(&model.mangled, &model.source_name);
        }
    }
    if !collided.is_empty() {
        models.retain(|m| !collided.contains(&m.source_name));
    }
    models
}

/// Resolve file-scope variables.
pub fn resolve_globals(
    decls: &[Declaration],
    registry: &ModelRegistry,
    mapper: &TypeMapper,
    diags: &mut Diagnostics,
) -> Vec<GlobalModel> {
    decls
        .iter()
        .filter_map(|decl| match decl {
            Declaration::Variable(v) => Some(GlobalModel {
                name: v.name.clone(),
                ty: available_type(&v.type_str, registry, mapper, &v.name, diags),
            }),
            _ => None,
        })
        .collect()
}
