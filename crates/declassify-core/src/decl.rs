//! Declaration records consumed and produced by the pipeline.
//!
//! Two layers live here:
//!
//! - [`ParseNode`]: the shape of the declaration tree handed over by the
//!   external front-end. Each node carries a kind tag, a declared name, a
//!   source type string, and ordered child members.
//! - [`Declaration`]: the flat, closed tagged variant the extractor produces
//!   from that tree. Declarations are created once and never mutated; all
//!   later stages read them through shared references.

use bitflags::bitflags;

/// Kind tag on a [`ParseNode`].
///
/// The front-end may hand over kinds the backend does not translate
/// (templates, lambdas, typedefs); those are reported and dropped rather
/// than aborting the unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A class definition with member children.
    Class,
    /// A data member inside a class, or a file-scope variable.
    Field,
    /// An instance or static method, including operator methods.
    Method,
    /// A constructor.
    Constructor,
    /// A destructor.
    Destructor,
    /// A free function at file scope.
    Function,
    /// A file-scope variable.
    Variable,
    /// An enumeration with enumerator children.
    Enum,
    /// A single enumerator inside an enum.
    Enumerator,
    /// A template definition (not translated).
    Template,
    /// A lambda expression (not translated).
    Lambda,
    /// A typedef or alias (not translated).
    Typedef,
    /// A using directive (not translated).
    Using,
}

impl NodeKind {
    /// Human-readable name used in diagnostics.
    pub fn describe(self) -> &'static str {
        match self {
            NodeKind::Class => "class",
            NodeKind::Field => "field",
            NodeKind::Method => "method",
            NodeKind::Constructor => "constructor",
            NodeKind::Destructor => "destructor",
            NodeKind::Function => "function",
            NodeKind::Variable => "variable",
            NodeKind::Enum => "enum",
            NodeKind::Enumerator => "enumerator",
            NodeKind::Template => "template",
            NodeKind::Lambda => "lambda",
            NodeKind::Typedef => "typedef",
            NodeKind::Using => "using directive",
        }
    }
}

bitflags! {
    /// Modifier flags on a declaration node.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct DeclTraits: u8 {
        /// Member is declared `static`.
        const STATIC = 1 << 0;
        /// Method is declared `const`.
        const CONST = 1 << 1;
    }
}

/// A parameter of a callable node or declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    /// Parameter name, when the front-end preserved one.
    pub name: Option<String>,
    /// Fully-qualified source type string.
    pub type_str: String,
}

impl Param {
    /// Create a named parameter.
    pub fn named(name: impl Into<String>, type_str: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            type_str: type_str.into(),
        }
    }

    /// Create an unnamed parameter.
    pub fn unnamed(type_str: impl Into<String>) -> Self {
        Self {
            name: None,
            type_str: type_str.into(),
        }
    }
}

/// A node in the declaration tree produced by the external front-end.
///
/// The backend does not care how this tree was obtained (AST dump, structured
/// API) as long as every node carries its kind, name, type string, and
/// ordered children. Builder constructors cover the shapes the pipeline
/// understands:
///
/// ```
/// use declassify_core::ParseNode;
///
/// let tree = ParseNode::class("LED")
///     .with_member(ParseNode::field("pin", "int"))
///     .with_member(ParseNode::field("state", "bool"))
///     .with_member(ParseNode::constructor(vec![]))
///     .with_member(ParseNode::method("isOn", "bool", vec![]).as_const());
/// assert_eq!(tree.members.len(), 4);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ParseNode {
    /// Kind tag.
    pub kind: NodeKind,
    /// Declared name. Empty for constructors, destructors, and lambdas.
    pub name: String,
    /// Source type string: field/variable type, or callable return type.
    pub type_str: String,
    /// Parameters, for callable nodes.
    pub params: Vec<Param>,
    /// Base-class references by name, for class nodes.
    pub bases: Vec<String>,
    /// Ordered child declarations, for class and enum nodes.
    pub members: Vec<ParseNode>,
    /// Modifier flags.
    pub traits: DeclTraits,
    /// Pre-lowered body text, for callables whose body survived the front-end.
    pub body: Option<String>,
    /// Explicit value, for enumerator nodes.
    pub value: Option<i64>,
}

impl ParseNode {
    fn new(kind: NodeKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            type_str: String::new(),
            params: Vec::new(),
            bases: Vec::new(),
            members: Vec::new(),
            traits: DeclTraits::default(),
            body: None,
            value: None,
        }
    }

    /// A class node with no members yet.
    pub fn class(name: impl Into<String>) -> Self {
        Self::new(NodeKind::Class, name)
    }

    /// A field node.
    pub fn field(name: impl Into<String>, type_str: impl Into<String>) -> Self {
        let mut node = Self::new(NodeKind::Field, name);
        node.type_str = type_str.into();
        node
    }

    /// A method node.
    pub fn method(
        name: impl Into<String>,
        return_type: impl Into<String>,
        params: Vec<Param>,
    ) -> Self {
        let mut node = Self::new(NodeKind::Method, name);
        node.type_str = return_type.into();
        node.params = params;
        node
    }

    /// A constructor node.
    pub fn constructor(params: Vec<Param>) -> Self {
        let mut node = Self::new(NodeKind::Constructor, "");
        node.params = params;
        node
    }

    /// A destructor node.
    pub fn destructor() -> Self {
        Self::new(NodeKind::Destructor, "")
    }

    /// A free function node.
    pub fn function(
        name: impl Into<String>,
        return_type: impl Into<String>,
        params: Vec<Param>,
    ) -> Self {
        let mut node = Self::new(NodeKind::Function, name);
        node.type_str = return_type.into();
        node.params = params;
        node
    }

    /// A file-scope variable node.
    pub fn variable(name: impl Into<String>, type_str: impl Into<String>) -> Self {
        let mut node = Self::new(NodeKind::Variable, name);
        node.type_str = type_str.into();
        node
    }

    /// An enum node with no enumerators yet.
    pub fn enumeration(name: impl Into<String>) -> Self {
        Self::new(NodeKind::Enum, name)
    }

    /// An enumerator node with an explicit value.
    pub fn enumerator(name: impl Into<String>, value: i64) -> Self {
        let mut node = Self::new(NodeKind::Enumerator, name);
        node.value = Some(value);
        node
    }

    /// A node of an arbitrary kind, for front-ends that surface constructs
    /// the backend does not translate.
    pub fn other(kind: NodeKind, name: impl Into<String>) -> Self {
        Self::new(kind, name)
    }

    /// Add a base-class reference.
    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.bases.push(base.into());
        self
    }

    /// Append a child member.
    pub fn with_member(mut self, member: ParseNode) -> Self {
        self.members.push(member);
        self
    }

    /// Attach a pre-lowered body.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Mark as `static`.
    pub fn as_static(mut self) -> Self {
        self.traits |= DeclTraits::STATIC;
        self
    }

    /// Mark as `const`.
    pub fn as_const(mut self) -> Self {
        self.traits |= DeclTraits::CONST;
        self
    }
}

/// A single extracted declaration.
///
/// The extractor flattens the [`ParseNode`] tree into a sequence of these,
/// preserving source order within each scope. Traversal downstream is
/// exhaustive matching over this closed set.
#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    /// A class with its members.
    Class(ClassDecl),
    /// A free function.
    Function(FunctionDecl),
    /// An enumeration.
    Enum(EnumDecl),
    /// A file-scope variable.
    Variable(VariableDecl),
}

/// An extracted class and its members, in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    /// Class name, unique within the translation unit.
    pub name: String,
    /// Declared bases by name. More than one is rejected during resolution.
    pub bases: Vec<String>,
    /// Data members in declaration order. Field order defines struct layout.
    pub fields: Vec<FieldDecl>,
    /// Methods in declaration order, including operator methods.
    pub methods: Vec<MethodDecl>,
    /// Constructors in declaration order.
    pub ctors: Vec<CtorDecl>,
    /// Destructor, at most one.
    pub dtor: Option<DtorDecl>,
}

/// A data member of a class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    pub name: String,
    pub type_str: String,
    /// Static fields are promoted to file scope instead of the layout.
    pub is_static: bool,
}

/// A method of a class.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDecl {
    pub name: String,
    pub params: Vec<Param>,
    pub return_type: String,
    pub is_const: bool,
    pub is_static: bool,
    pub body: Option<String>,
}

/// A constructor of a class.
#[derive(Debug, Clone, PartialEq)]
pub struct CtorDecl {
    pub params: Vec<Param>,
    pub body: Option<String>,
}

/// A destructor of a class.
#[derive(Debug, Clone, PartialEq)]
pub struct DtorDecl {
    pub body: Option<String>,
}

/// A free function.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: String,
    pub params: Vec<Param>,
    pub return_type: String,
    pub body: Option<String>,
}

/// An enumeration and its enumerators, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDecl {
    pub name: String,
    pub values: Vec<(String, i64)>,
}

/// A file-scope variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableDecl {
    pub name: String,
    pub type_str: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_builder_preserves_member_order() {
        let node = ParseNode::class("Device")
            .with_member(ParseNode::field("id", "int"))
            .with_member(ParseNode::field("enabled", "bool"))
            .with_member(ParseNode::method("isEnabled", "bool", vec![]).as_const());

        assert_eq!(node.kind, NodeKind::Class);
        assert_eq!(node.members[0].name, "id");
        assert_eq!(node.members[1].name, "enabled");
        assert!(node.members[2].traits.contains(DeclTraits::CONST));
    }

    #[test]
    fn static_trait_on_field() {
        let node = ParseNode::field("count", "int").as_static();
        assert!(node.traits.contains(DeclTraits::STATIC));
        assert!(!node.traits.contains(DeclTraits::CONST));
    }

    #[test]
    fn constructor_has_no_name() {
        let node = ParseNode::constructor(vec![Param::named("pin", "int")]);
        assert_eq!(node.kind, NodeKind::Constructor);
        assert!(node.name.is_empty());
        assert_eq!(node.params.len(), 1);
    }

    #[test]
    fn enumerator_carries_value() {
        let node = ParseNode::enumerator("ON", 1);
        assert_eq!(node.value, Some(1));
    }
}
