//! Function signatures and overload matching

use std::fmt;

use smol_str::SmolStr;

/// Placeholder type of call-site signatures
pub const UNKNOWN: &str = "UNKNOWN";

/// Parameter type of functions without parameters
pub const VOID: &str = "void";

/// Coarse function signature: type names with their array dimensions
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionSignature {
    pub return_type: SmolStr,
    /// Parameter types, `["void"]` for functions without parameters
    pub parameter_types: Vec<SmolStr>,
}

impl FunctionSignature {
    /// Create the signature of a function declaration
    ///
    /// # Parameters
    ///
    /// * `return_type`: return type text, array dimensions included
    /// * `parameter_types`: parameter type texts. An empty list is stored as `["void"]`.
    pub fn new(return_type: impl Into<SmolStr>, parameter_types: Vec<SmolStr>) -> Self {
        let parameter_types = if parameter_types.is_empty() {
            vec![SmolStr::new(VOID)]
        } else {
            parameter_types
        };

        Self {
            return_type: return_type.into(),
            parameter_types,
        }
    }

    /// Create the signature of a call site with `argument_count` arguments.
    ///
    /// All types are [UNKNOWN], except for calls without arguments which get a single `void`
    /// parameter like their declarations.
    pub fn call(argument_count: usize) -> Self {
        let parameter_types = if argument_count == 0 {
            vec![SmolStr::new(VOID)]
        } else {
            vec![SmolStr::new(UNKNOWN); argument_count]
        };

        Self {
            return_type: SmolStr::new(UNKNOWN),
            parameter_types,
        }
    }

    /// Registry key of this signature, `"<return>: <p1>, <p2>"`
    pub fn key(&self) -> SmolStr {
        SmolStr::new(self.to_string())
    }

    fn flattened(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.return_type.as_str())
            .chain(self.parameter_types.iter().map(SmolStr::as_str))
    }

    /// Returns `true` if a call or declaration with signature `other` can refer to `self`
    pub fn matches(&self, other: &FunctionSignature) -> bool {
        signatures_match(self, other)
    }
}

impl fmt::Display for FunctionSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.return_type, self.parameter_types.join(", "))
    }
}

/// Compare two signatures, treating [UNKNOWN] as a wildcard.
///
/// Signatures with a single parameter slot never match when exactly one of them is `void`, so
/// that a call without arguments does not resolve to a one-parameter function.
pub fn signatures_match(a: &FunctionSignature, b: &FunctionSignature) -> bool {
    if a.key() == b.key() {
        return true;
    }

    if a.parameter_types.len() != b.parameter_types.len() {
        return false;
    }

    if a.parameter_types.len() == 1
        && (a.parameter_types[0] == VOID) != (b.parameter_types[0] == VOID)
    {
        return false;
    }

    a.flattened()
        .zip(b.flattened())
        .all(|(a, b)| a == b || a == UNKNOWN || b == UNKNOWN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn declared(return_type: &str, parameter_types: &[&str]) -> FunctionSignature {
        FunctionSignature::new(
            return_type,
            parameter_types.iter().copied().map(SmolStr::new).collect(),
        )
    }

    #[test]
    fn key_format() {
        assert_eq!(declared("float", &["float", "vec2[3]"]).key(), "float: float, vec2[3]");
        assert_eq!(declared("void", &[]).key(), "void: void");
        assert_eq!(FunctionSignature::call(2).key(), "UNKNOWN: UNKNOWN, UNKNOWN");
        assert_eq!(FunctionSignature::call(0).key(), "UNKNOWN: void");
    }

    #[test]
    fn call_matches_same_arity() {
        let foo = declared("float", &["float"]);
        assert!(signatures_match(&foo, &FunctionSignature::call(1)));
        assert!(!signatures_match(&foo, &FunctionSignature::call(2)));
    }

    #[test]
    fn void_slot_never_matches_argument() {
        let no_args = declared("float", &[]);
        assert!(signatures_match(&no_args, &FunctionSignature::call(0)));
        assert!(!signatures_match(&no_args, &FunctionSignature::call(1)));

        let one_arg = declared("float", &["int"]);
        assert!(!signatures_match(&one_arg, &FunctionSignature::call(0)));
    }

    #[test]
    fn declared_types_must_agree() {
        assert!(!signatures_match(
            &declared("float", &["int"]),
            &declared("float", &["float"])
        ));
        assert!(signatures_match(
            &declared("float", &["int"]),
            &declared("float", &["int"])
        ));
    }
}
