//! Name mangling and overload signature identity.
//!
//! Every emitted identifier is derived here: `C_m` for a plain method,
//! `C_m_int_float` for overloads, `C_init`/`C_cleanup` for the lifecycle
//! pair, and the operator table's word for operator methods. The signature
//! hash gives method overload sets a deterministic table identity
//! independent of registration order.

use declassify_core::TargetType;
use std::fmt;
use xxhash_rust::xxh64::xxh64;

/// Seed and parameter-mixing constants for signature hashing.
mod hash_constants {
    pub const METHOD: u64 = 0x51c6b2a973d04e8f;
    pub const PARAM_SEP: u64 = 0x9e3779b97f4a7c15;
}

/// Deterministic 64-bit identity of a positional parameter-type signature.
///
/// The same name and mapped parameter types always produce the same hash,
/// so signatures computed in different passes agree without a shared
/// counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct SignatureHash(pub u64);

impl SignatureHash {
    /// Signature of a method overload.
    pub fn method(name: &str, params: &[TargetType]) -> Self {
        let mut acc = xxh64(name.as_bytes(), hash_constants::METHOD);
        for (i, ty) in params.iter().enumerate() {
            let param = xxh64(ty.suffix().as_bytes(), hash_constants::PARAM_SEP ^ i as u64);
            acc = acc.rotate_left(7) ^ param;
        }
        SignatureHash(acc)
    }
}

impl fmt::Display for SignatureHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// The `_int_float` style suffix for a parameter list. Empty for a
/// parameterless overload, which therefore keeps the bare name.
pub fn suffix_signature(params: &[TargetType]) -> String {
    let mut suffix = String::new();
    for ty in params {
        suffix.push('_');
        suffix.push_str(ty.suffix());
    }
    suffix
}

/// Emitted name for a method or operator word on a class.
///
/// `overloaded` is whether the declared name has more than one overload in
/// the class; only then is the parameter suffix appended.
pub fn method_name(class: &str, member: &str, overloaded: bool, params: &[TargetType]) -> String {
    if overloaded {
        format!("{class}_{member}{}", suffix_signature(params))
    } else {
        format!("{class}_{member}")
    }
}

/// Emitted name for a constructor. The primary constructor owns the bare
/// `C_init`; the rest carry the parameter suffix.
pub fn ctor_name(class: &str, primary: bool, params: &[TargetType]) -> String {
    if primary {
        format!("{class}_init")
    } else {
        format!("{class}_init{}", suffix_signature(params))
    }
}

/// Emitted name for the destructor.
pub fn dtor_name(class: &str) -> String {
    format!("{class}_cleanup")
}

/// Emitted variable name for a promoted static field.
pub fn static_field_name(class: &str, field: &str) -> String {
    format!("{class}_{field}")
}

/// Emitted name for a free function.
pub fn function_name(name: &str, overloaded: bool, params: &[TargetType]) -> String {
    if overloaded {
        format!("{name}{}", suffix_signature(params))
    } else {
        name.to_string()
    }
}
