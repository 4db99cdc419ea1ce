//! Shared vocabulary for the class-to-procedural translation pipeline.
//!
//! This crate holds the types every stage agrees on:
//!
//! - [`decl`]: the front-end's declaration tree shape and the flat,
//!   immutable declaration records extracted from it
//! - [`target`]: the fixed target type vocabulary
//! - [`operator`]: the operator-to-name translation table
//! - [`diagnostics`]: the append-only per-unit diagnostics sink
//! - [`error`]: phase error types and the unified pipeline error
//! - [`options`]: run configuration

pub mod decl;
pub mod diagnostics;
pub mod error;
pub mod operator;
pub mod options;
pub mod target;

pub use decl::{
    ClassDecl, CtorDecl, Declaration, DeclTraits, DtorDecl, EnumDecl, FieldDecl, FunctionDecl,
    MethodDecl, NodeKind, Param, ParseNode, VariableDecl,
};
pub use diagnostics::{Diagnostic, DiagnosticCode, Diagnostics, Severity};
pub use error::{ExtractError, ResolveError, TranspileError};
pub use operator::{operator_symbol, SourceOperator};
pub use options::Options;
pub use target::{normalize_spelling, TargetType};
