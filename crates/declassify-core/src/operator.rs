//! Operator translation table.
//!
//! Operator methods keep their semantics but lose their symbolic spelling:
//! `operator+` on class `C` becomes the free function `C_add`. The table is
//! fixed; symbols outside it are reported as unsupported and dropped.

use std::fmt;

/// A source operator the backend knows how to name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Equals,
    NotEquals,
    LessThan,
    GreaterThan,
    LessEqual,
    GreaterEqual,
    Assign,
    CompoundAdd,
    CompoundSubtract,
    CompoundMultiply,
    CompoundDivide,
    Increment,
    Decrement,
}

impl SourceOperator {
    /// Look up an operator symbol (the part after the `operator` keyword).
    pub fn from_symbol(symbol: &str) -> Option<SourceOperator> {
        let op = match symbol {
            "+" => SourceOperator::Add,
            "-" => SourceOperator::Subtract,
            "*" => SourceOperator::Multiply,
            "/" => SourceOperator::Divide,
            "%" => SourceOperator::Modulo,
            "==" => SourceOperator::Equals,
            "!=" => SourceOperator::NotEquals,
            "<" => SourceOperator::LessThan,
            ">" => SourceOperator::GreaterThan,
            "<=" => SourceOperator::LessEqual,
            ">=" => SourceOperator::GreaterEqual,
            "=" => SourceOperator::Assign,
            "+=" => SourceOperator::CompoundAdd,
            "-=" => SourceOperator::CompoundSubtract,
            "*=" => SourceOperator::CompoundMultiply,
            "/=" => SourceOperator::CompoundDivide,
            "++" => SourceOperator::Increment,
            "--" => SourceOperator::Decrement,
            _ => return None,
        };
        Some(op)
    }

    /// The word used in the emitted function name.
    pub fn c_name(self) -> &'static str {
        match self {
            SourceOperator::Add => "add",
            SourceOperator::Subtract => "subtract",
            SourceOperator::Multiply => "multiply",
            SourceOperator::Divide => "divide",
            SourceOperator::Modulo => "modulo",
            SourceOperator::Equals => "equals",
            SourceOperator::NotEquals => "not_equals",
            SourceOperator::LessThan => "less_than",
            SourceOperator::GreaterThan => "greater_than",
            SourceOperator::LessEqual => "less_equal",
            SourceOperator::GreaterEqual => "greater_equal",
            SourceOperator::Assign => "assign",
            SourceOperator::CompoundAdd => "compound_add",
            SourceOperator::CompoundSubtract => "compound_subtract",
            SourceOperator::CompoundMultiply => "compound_multiply",
            SourceOperator::CompoundDivide => "compound_divide",
            SourceOperator::Increment => "increment",
            SourceOperator::Decrement => "decrement",
        }
    }
}

impl fmt::Display for SourceOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.c_name())
    }
}

/// Split a method name of the form `operator<symbol>` into its symbol.
///
/// Returns `None` for ordinary method names, including identifiers that
/// merely start with the word (`operatorPrecedence` is a plain method).
pub fn operator_symbol(method_name: &str) -> Option<&str> {
    method_name
        .strip_prefix("operator")
        .map(str::trim)
        .filter(|sym| {
            !sym.is_empty()
                && !sym
                    .chars()
                    .next()
                    .is_some_and(|c| c.is_alphanumeric() || c == '_')
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_covers_spec_entries() {
        assert_eq!(SourceOperator::from_symbol("+"), Some(SourceOperator::Add));
        assert_eq!(SourceOperator::Add.c_name(), "add");
        assert_eq!(SourceOperator::Subtract.c_name(), "subtract");
        assert_eq!(SourceOperator::Equals.c_name(), "equals");
        assert_eq!(SourceOperator::Assign.c_name(), "assign");
        assert_eq!(SourceOperator::CompoundAdd.c_name(), "compound_add");
    }

    #[test]
    fn unmapped_symbols_are_rejected() {
        assert_eq!(SourceOperator::from_symbol("<<"), None);
        assert_eq!(SourceOperator::from_symbol("()"), None);
        assert_eq!(SourceOperator::from_symbol("->"), None);
    }

    #[test]
    fn operator_names_are_recognized() {
        assert_eq!(operator_symbol("operator+"), Some("+"));
        assert_eq!(operator_symbol("operator =="), Some("=="));
        assert_eq!(operator_symbol("isOn"), None);
        assert_eq!(operator_symbol("operator"), None);
        assert_eq!(operator_symbol("operatorPrecedence"), None);
    }
}
