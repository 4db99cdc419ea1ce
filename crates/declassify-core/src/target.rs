//! The fixed target type vocabulary for emitted C.

use std::fmt;

/// A type in the emitted language.
///
/// The vocabulary is closed over the boolean, character, fixed-width and
/// native integer families, the float family, `size_t`, `void`, and
/// user-defined struct types. Source spellings outside this set are mapped
/// to a configured fallback integer by the type mapper.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TargetType {
    Void,
    Bool,
    Char,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    /// The native `int`.
    Int,
    /// The native `unsigned int`.
    Uint,
    Float,
    Double,
    Size,
    /// A user-defined class lowered to a struct of the same name.
    Struct(String),
}

impl TargetType {
    /// Look up a normalized source spelling in the fixed table.
    ///
    /// Returns `None` for spellings outside the vocabulary; the caller
    /// decides between the class registry and the fallback type.
    pub fn from_source(spelling: &str) -> Option<TargetType> {
        let ty = match spelling {
            "void" => TargetType::Void,
            "bool" => TargetType::Bool,
            "char" => TargetType::Char,
            "int8_t" | "signed char" => TargetType::Int8,
            "int16_t" | "short" => TargetType::Int16,
            "int32_t" => TargetType::Int32,
            "int64_t" | "long long" => TargetType::Int64,
            "uint8_t" | "unsigned char" => TargetType::Uint8,
            "uint16_t" | "unsigned short" => TargetType::Uint16,
            "uint32_t" => TargetType::Uint32,
            "uint64_t" | "unsigned long long" => TargetType::Uint64,
            "int" => TargetType::Int,
            "unsigned int" | "unsigned" => TargetType::Uint,
            "float" => TargetType::Float,
            "double" => TargetType::Double,
            "size_t" => TargetType::Size,
            _ => return None,
        };
        Some(ty)
    }

    /// The spelling used in emitted C.
    pub fn c_name(&self) -> &str {
        match self {
            TargetType::Void => "void",
            TargetType::Bool => "bool",
            TargetType::Char => "char",
            TargetType::Int8 => "int8_t",
            TargetType::Int16 => "int16_t",
            TargetType::Int32 => "int32_t",
            TargetType::Int64 => "int64_t",
            TargetType::Uint8 => "uint8_t",
            TargetType::Uint16 => "uint16_t",
            TargetType::Uint32 => "uint32_t",
            TargetType::Uint64 => "uint64_t",
            TargetType::Int => "int",
            TargetType::Uint => "unsigned int",
            TargetType::Float => "float",
            TargetType::Double => "double",
            TargetType::Size => "size_t",
            TargetType::Struct(name) => name,
        }
    }

    /// The abbreviation appended to mangled names for overload
    /// disambiguation. Struct types abbreviate to their own name.
    pub fn suffix(&self) -> &str {
        match self {
            TargetType::Void => "void",
            TargetType::Bool => "bool",
            TargetType::Char => "char",
            TargetType::Int8 => "int8",
            TargetType::Int16 => "int16",
            TargetType::Int32 => "int32",
            TargetType::Int64 => "int64",
            TargetType::Uint8 => "uint8",
            TargetType::Uint16 => "uint16",
            TargetType::Uint32 => "uint32",
            TargetType::Uint64 => "uint64",
            TargetType::Int => "int",
            TargetType::Uint => "uint",
            TargetType::Float => "float",
            TargetType::Double => "double",
            TargetType::Size => "size",
            TargetType::Struct(name) => name,
        }
    }

    /// The literal used to zero a value of this type.
    ///
    /// Struct types have no literal; they are initialized through their
    /// own lifecycle function.
    pub fn zero_literal(&self) -> Option<&'static str> {
        match self {
            TargetType::Void | TargetType::Struct(_) => None,
            TargetType::Bool => Some("false"),
            TargetType::Float => Some("0.0f"),
            TargetType::Double => Some("0.0"),
            _ => Some("0"),
        }
    }

    /// Whether this is a user-defined struct type.
    pub fn is_struct(&self) -> bool {
        matches!(self, TargetType::Struct(_))
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.c_name())
    }
}

/// Strip the qualifiers the front-end leaves on type strings.
///
/// Leading `const` and trailing reference/pointer markers do not affect the
/// lowered value type; `LED&` and `const LED` both resolve to `LED`.
pub fn normalize_spelling(raw: &str) -> &str {
    let mut s = raw.trim();
    loop {
        if let Some(rest) = s.strip_prefix("const ") {
            s = rest.trim_start();
        } else if let Some(rest) = s.strip_suffix('&').or_else(|| s.strip_suffix('*')) {
            s = rest.trim_end();
        } else {
            return s;
        }
    }
}
