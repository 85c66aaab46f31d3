//! Enumeration type name matching.

use regex::Regex;

use crate::error::{EnumgenError, EnumgenResult};

/// Type names matching this pattern are treated as enumerations by default.
pub const DEFAULT_ENUM_PATTERN: &str = r"^.+Enum$";

/// Decides whether a declared type name marks an enumeration.
pub trait NameMatcher {
    fn matches(&self, name: &str) -> bool;
}

impl NameMatcher for Regex {
    fn matches(&self, name: &str) -> bool {
        self.is_match(name)
    }
}

/// Compiles a user-supplied pattern. An invalid pattern is an argument error.
pub fn compile_pattern(pattern: &str) -> EnumgenResult<Regex> {
    Regex::new(pattern).map_err(|e| {
        EnumgenError::invalid_argument(format!("invalid enum name pattern {:?}: {}", pattern, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pattern() {
        let matcher = compile_pattern(DEFAULT_ENUM_PATTERN).unwrap();
        assert!(matcher.matches("StatusEnum"));
        assert!(matcher.matches("Test1Enum"));
        assert!(!matcher.matches("Enum"));
        assert!(!matcher.matches("Status"));
        assert!(!matcher.matches("EnumStatus"));
    }

    #[test]
    fn test_custom_pattern() {
        let matcher = compile_pattern("^(Color|Shape)$").unwrap();
        assert!(matcher.matches("Color"));
        assert!(!matcher.matches("ColorEnum"));
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(matches!(
            compile_pattern("(unclosed"),
            Err(EnumgenError::InvalidArgument { .. })
        ));
    }
}
