//! Resolved semantic model types.
//!
//! A [`ClassModel`] is the layout-complete view of one class: struct fields
//! in emission order, the mangled method table, promoted statics, and the
//! lifecycle pair. Models are created once per class, base before derived,
//! and are read-only once placed in the registry.

use declassify_core::{EnumDecl, SourceOperator, TargetType};
use rustc_hash::FxHashMap;

use crate::mangle::SignatureHash;

/// Why a class was excluded from emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The class used a construct the backend does not translate.
    UnsupportedConstruct,
    /// The class declared more than one base.
    MultipleInheritance,
    /// The class sits on a cyclic base chain.
    InheritanceCycle,
    /// Two of the class's overloads mangled identically.
    NameCollision,
    /// The declared base is unknown or was itself skipped.
    UnavailableBase,
}

/// Lifecycle of a class through the pipeline.
///
/// `Registered → BaseResolving → FieldsResolved → MethodsResolved → Emitted`,
/// with `Skipped` as the terminal failure state. Skipped classes are excluded
/// from emission but stay in the registry for diagnostics and dependents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassState {
    Registered,
    BaseResolving,
    FieldsResolved,
    MethodsResolved,
    Emitted,
    Skipped(SkipReason),
}

/// One entry of a struct layout.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutField {
    pub name: String,
    pub ty: TargetType,
}

/// A static field promoted to file-scope storage.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticField {
    /// Original member name.
    pub name: String,
    pub ty: TargetType,
    /// Emitted variable name, `Class_field`.
    pub mangled: String,
}

/// A resolved parameter with a guaranteed name.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedParam {
    pub name: String,
    pub ty: TargetType,
}

/// A resolved method, operator method, or static method.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodSlot {
    /// Name as declared, e.g. `isOn` or `operator+`.
    pub source_name: String,
    /// Operator translation, when this slot came from an operator method.
    pub operator: Option<SourceOperator>,
    /// Final emitted function name.
    pub mangled: String,
    pub params: Vec<ResolvedParam>,
    pub return_type: TargetType,
    pub is_static: bool,
    pub is_const: bool,
    pub body: Option<String>,
}

/// A resolved constructor.
#[derive(Debug, Clone, PartialEq)]
pub struct CtorSlot {
    /// `Class_init` for the primary constructor, suffixed for the rest.
    pub mangled: String,
    pub params: Vec<ResolvedParam>,
    pub body: Option<String>,
}

/// Key of the method table: declared name plus positional parameter-type
/// signature. Overloads of one name must be injective under this key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SignatureKey {
    pub name: String,
    pub sig: SignatureHash,
}

/// The resolved view of one class.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassModel {
    /// Class name, unique within the unit.
    pub name: String,
    /// Resolved base class, if any.
    pub base: Option<String>,
    /// Struct layout in emission order. When a base exists its embedded
    /// field named `base` occupies the first slot, keeping the base layout
    /// at offset zero.
    pub layout_fields: Vec<LayoutField>,
    /// Statics promoted out of the layout.
    pub static_fields: Vec<StaticField>,
    /// Methods in declaration order.
    pub methods: Vec<MethodSlot>,
    /// `(name, signature) → mangled name`; injective per class.
    pub method_table: FxHashMap<SignatureKey, String>,
    /// Constructors; the primary one first.
    pub ctors: Vec<CtorSlot>,
    /// User destructor body, when one was declared with a body.
    pub dtor_body: Option<String>,
    /// Whether a user destructor was declared.
    pub has_destructor: bool,
    /// Whether any user constructor was declared.
    pub has_user_ctors: bool,
    /// Where in the lifecycle this class is.
    pub state: ClassState,
}

impl ClassModel {
    /// The placeholder registered in pass 1.
    pub fn placeholder(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base: None,
            layout_fields: Vec::new(),
            static_fields: Vec::new(),
            methods: Vec::new(),
            method_table: FxHashMap::default(),
            ctors: Vec::new(),
            dtor_body: None,
            has_destructor: false,
            has_user_ctors: false,
            state: ClassState::Registered,
        }
    }

    /// Whether resolution completed for this class.
    pub fn is_resolved(&self) -> bool {
        matches!(self.state, ClassState::MethodsResolved | ClassState::Emitted)
    }

    /// Whether this class was excluded from emission.
    pub fn is_skipped(&self) -> bool {
        matches!(self.state, ClassState::Skipped(_))
    }

    /// Move to the terminal skipped state.
    pub fn skip(&mut self, reason: SkipReason) {
        self.state = ClassState::Skipped(reason);
    }
}

/// A resolved free function.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionModel {
    pub source_name: String,
    /// Emitted name; equals `source_name` unless overloaded. `main` is
    /// always passed through unchanged.
    pub mangled: String,
    pub params: Vec<ResolvedParam>,
    pub return_type: TargetType,
    pub body: Option<String>,
    pub is_main: bool,
}

/// A resolved file-scope variable.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalModel {
    pub name: String,
    pub ty: TargetType,
}

/// Everything the code generator consumes for one unit.
#[derive(Debug, Default)]
pub struct SemanticModel {
    pub registry: crate::registry::ModelRegistry,
    pub functions: Vec<FunctionModel>,
    pub enums: Vec<EnumDecl>,
    pub globals: Vec<GlobalModel>,
}
