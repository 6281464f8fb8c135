//! Common validation utilities

/// Field validators shared by request handlers and services
pub mod validators {
    use once_cell::sync::Lazy;
    use regex::Regex;

    /// Letters, digits, underscores and hyphens only
    pub static IDENTIFIER_PATTERN: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").expect("identifier pattern is valid"));

    /// Check if a string is not blank
    pub fn not_empty(value: &str) -> bool {
        !value.trim().is_empty()
    }

    /// Check if a string's byte length is within bounds (inclusive)
    pub fn length_between(value: &str, min: usize, max: usize) -> bool {
        let len = value.len();
        len >= min && len <= max
    }

    /// Check if a string matches a pattern
    pub fn matches_pattern(value: &str, pattern: &Regex) -> bool {
        pattern.is_match(value)
    }

    /// Check if a string is a valid identifier (see `IDENTIFIER_PATTERN`)
    pub fn is_identifier(value: &str) -> bool {
        matches_pattern(value, &IDENTIFIER_PATTERN)
    }

    pub fn has_uppercase(value: &str) -> bool {
        value.chars().any(|c| c.is_ascii_uppercase())
    }

    pub fn has_lowercase(value: &str) -> bool {
        value.chars().any(|c| c.is_ascii_lowercase())
    }

    pub fn has_digit(value: &str) -> bool {
        value.chars().any(|c| c.is_ascii_digit())
    }
}

#[cfg(test)]
mod tests {
    use super::validators::*;

    #[test]
    fn test_identifier() {
        assert!(is_identifier("user_name-1"));
        assert!(!is_identifier("user name"));
        assert!(!is_identifier("user@name"));
        assert!(!is_identifier(""));
    }

    #[test]
    fn test_length_between() {
        assert!(length_between("abc", 3, 50));
        assert!(!length_between("ab", 3, 50));
        assert!(!length_between(&"a".repeat(51), 3, 50));
    }

    #[test]
    fn test_character_classes() {
        assert!(has_uppercase("Valid1Pass"));
        assert!(!has_uppercase("alllowercase1"));
        assert!(has_lowercase("Valid1Pass"));
        assert!(has_digit("Valid1Pass"));
        assert!(!has_digit("NoDigitsHere"));
        assert!(!not_empty("   "));
    }
}
